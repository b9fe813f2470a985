//! Section Classifier: scores each canonical section for presence and quality.
//!
//! A section's score is presence (30) plus word density (up to 20) plus
//! section-specific structural signals (up to 50). Text under unclassified
//! headings never contributes.

use crate::analysis::models::{ExtractedText, Section, SectionScore};
use crate::analysis::signals::{
    content_lines, has_credential_marker, has_date, has_degree, has_email, has_institution,
    has_link, has_phone, is_quantified, list_item_count, quantified_line_count, sentence_count,
    word_count,
};

const PRESENCE_POINTS: f64 = 30.0;
const DENSITY_POINTS: f64 = 20.0;
const STRUCTURE_POINTS: f64 = 50.0;

/// Words needed for full density credit.
const DENSITY_TARGETS: &[(Section, usize)] = &[
    (Section::ContactInformation, 6),
    (Section::ProfessionalSummary, 30),
    (Section::WorkExperience, 40),
    (Section::Education, 12),
    (Section::Skills, 8),
    (Section::Projects, 30),
    (Section::Certifications, 5),
    (Section::Awards, 5),
];

/// Scores all eight canonical sections, in canonical order.
pub fn classify_sections(extracted: &ExtractedText) -> Vec<SectionScore> {
    Section::ALL
        .iter()
        .map(|&section| {
            let body = extracted.bodies_of(section).join("\n");
            SectionScore::new(section, score_section(section, &body))
        })
        .collect()
}

/// Score for one section given the concatenated bodies of its spans.
/// A body without words scores 0.
pub fn score_section(section: Section, body: &str) -> u32 {
    let words = word_count(body);
    if words == 0 {
        return 0;
    }

    let density = (words as f64 / density_target(section) as f64).min(1.0) * DENSITY_POINTS;
    let structure = structural_points(section, body).min(STRUCTURE_POINTS);

    (PRESENCE_POINTS + density + structure)
        .round()
        .clamp(0.0, 100.0) as u32
}

fn density_target(section: Section) -> usize {
    DENSITY_TARGETS
        .iter()
        .find(|(s, _)| *s == section)
        .map(|(_, target)| *target)
        .unwrap_or(10)
}

fn points(signal: bool, value: f64) -> f64 {
    if signal {
        value
    } else {
        0.0
    }
}

fn ratio(count: usize, target: usize) -> f64 {
    (count as f64 / target as f64).min(1.0)
}

fn structural_points(section: Section, body: &str) -> f64 {
    match section {
        Section::ContactInformation => {
            points(has_email(body), 20.0)
                + points(has_phone(body), 15.0)
                + points(has_link(body), 15.0)
        }
        Section::ProfessionalSummary => {
            points(sentence_count(body) >= 2, 25.0) + points(is_quantified(body), 25.0)
        }
        Section::WorkExperience => {
            ratio(quantified_line_count(body), 3) * 40.0 + points(has_date(body), 10.0)
        }
        Section::Education => {
            points(has_date(body), 20.0)
                + points(has_institution(body), 20.0)
                + points(has_degree(body), 10.0)
        }
        Section::Skills => ratio(list_item_count(body), 8) * 50.0,
        Section::Projects => {
            ratio(quantified_line_count(body), 2) * 30.0
                + points(content_lines(body).count() >= 2, 20.0)
        }
        Section::Certifications => {
            points(has_date(body), 25.0) + points(has_credential_marker(body), 25.0)
        }
        Section::Awards => {
            points(has_date(body), 20.0) + points(content_lines(body).count() >= 2, 30.0)
        }
    }
}
