//! Shared test fixtures: a small synthetic taxonomy, sample résumés and DOCX packaging.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::analysis::extractor::DOCX_MIME;
use crate::analysis::models::{Demand, RawDocument};
use crate::analysis::taxonomy::{SkillDefinition, Taxonomy, TaxonomyData};

/// Résumé with every canonical section except Certifications and Awards.
pub const SAMPLE_RESUME: &str = "Jane Doe
jane.doe@example.com | +1 (555) 123-4567 | linkedin.com/in/janedoe

Professional Summary
Backend engineer with 8 years of experience building data platforms. Expert in JavaScript and SQL with a focus on reliability.

Experience
Senior Engineer, Acme Corp, Jan 2019 - Present
- Reduced API latency by 45% by redesigning the caching layer for the checkout service
- Migrated 120 services to Docker, cutting deployment time from 2 hours to 15 minutes
- Led a team of 6 engineers delivering $2M in annual savings through automation

Education
B.Sc. Computer Science, University of Toronto, 2014 - 2018

Skills
JavaScript, React, SQL, Docker, Python, Git, REST APIs, Agile

Projects
Open source job board
- Built a React front end serving 5,000 monthly users
- Wrote 300 unit tests raising coverage to 92%
";

pub fn skill(name: &str, category: &str, demand: Demand, aliases: &[&str]) -> SkillDefinition {
    SkillDefinition {
        name: name.to_string(),
        category: category.to_string(),
        demand,
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

pub fn test_taxonomy_data() -> TaxonomyData {
    let mut category_reasons = BTreeMap::new();
    category_reasons.insert("DevOps".to_string(), "Required for scaling".to_string());
    category_reasons.insert("Database".to_string(), "Caching optimization".to_string());

    TaxonomyData {
        version: "test-1".to_string(),
        skills: vec![
            skill("JavaScript", "Programming", Demand::High, &["js"]),
            skill("React", "Frontend", Demand::High, &[]),
            skill("React Native", "Mobile", Demand::Medium, &[]),
            skill("SQL", "Database", Demand::High, &[]),
            skill("Python", "Programming", Demand::High, &[]),
            skill("REST APIs", "Backend", Demand::High, &["rest", "rest api"]),
            skill("Docker", "DevOps", Demand::Medium, &[]),
            skill("Kubernetes", "DevOps", Demand::High, &["k8s"]),
            skill("Redis", "Database", Demand::Medium, &[]),
            skill("Terraform", "Infrastructure", Demand::Low, &[]),
        ],
        baseline: vec!["JavaScript".into(), "React".into(), "SQL".into()],
        category_reasons,
        default_reason: "Requested for this role".to_string(),
    }
}

pub fn test_taxonomy() -> Taxonomy {
    Taxonomy::from_data(test_taxonomy_data()).expect("test taxonomy is valid")
}

/// Packages paragraphs into a minimal DOCX container.
pub fn docx_bytes(text: &str) -> Vec<u8> {
    let mut body = String::new();
    for paragraph in text.lines() {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&escape_xml(paragraph));
        body.push_str("</w:t></w:r></w:p>");
    }
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn docx_document(text: &str) -> RawDocument {
    RawDocument::new(docx_bytes(text), DOCX_MIME, "resume.docx")
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
