//! Document Extractor: uploaded bytes to normalized text with section spans.

use std::io::{Cursor, Read};
use std::path::Path;

use tracing::debug;

use crate::analysis::error::AnalysisError;
use crate::analysis::models::{ExtractedText, RawDocument, Section, SectionLabel, SectionSpan};
use crate::analysis::signals::{has_email, has_link, has_phone};

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const OLE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const OLE_HEADER_LEN: usize = 512;
const OLE_STREAM_NAMES: &[&str] = &[
    "Root Entry",
    "WordDocument",
    "SummaryInformation",
    "DocumentSummaryInformation",
    "CompObj",
    "ObjectPool",
    "0Table",
    "1Table",
    "Data",
];
const MIN_RECOVERED_RUN: usize = 4;

const BULLET_GLYPHS: &[char] = &[
    '•', '●', '▪', '■', '◦', '‣', '○', '►', '➢', '✓', '–', '—', '*', '·', '\u{f0b7}',
];

const MAX_HEADING_CHARS: usize = 48;
const MAX_HEADING_WORDS: usize = 6;

/// Heading phrases in normalized form (lowercase, `&` → `and`, punctuation dropped).
const SECTION_HEADINGS: &[(Section, &[&str])] = &[
    (
        Section::ContactInformation,
        &[
            "contact",
            "contact information",
            "contact info",
            "contact details",
            "personal information",
            "personal details",
        ],
    ),
    (
        Section::ProfessionalSummary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "executive summary",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "about",
            "about me",
            "overview",
        ],
    ),
    (
        Section::WorkExperience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    (
        Section::Education,
        &[
            "education",
            "academic background",
            "educational background",
            "academics",
            "academic qualifications",
            "education and training",
        ],
    ),
    (
        Section::Skills,
        &[
            "skills",
            "technical skills",
            "key skills",
            "core skills",
            "core competencies",
            "competencies",
            "technologies",
            "tech stack",
            "skills and tools",
            "tools and technologies",
            "skills and technologies",
            "areas of expertise",
            "expertise",
        ],
    ),
    (
        Section::Projects,
        &[
            "projects",
            "personal projects",
            "key projects",
            "selected projects",
            "side projects",
            "academic projects",
            "portfolio",
        ],
    ),
    (
        Section::Certifications,
        &[
            "certifications",
            "certification",
            "certificates",
            "licenses",
            "licenses and certifications",
            "certifications and licenses",
            "professional certifications",
        ],
    ),
    (
        Section::Awards,
        &[
            "awards",
            "honors",
            "honours",
            "awards and honors",
            "awards and honours",
            "honors and awards",
            "achievements",
            "accomplishments",
            "recognition",
        ],
    ),
];

/// Recognized headings outside the canonical taxonomy. Their text is never scored.
const UNCLASSIFIED_HEADINGS: &[&str] = &[
    "interests",
    "hobbies",
    "hobbies and interests",
    "references",
    "languages",
    "volunteer",
    "volunteering",
    "volunteer experience",
    "publications",
    "activities",
    "extracurricular activities",
    "additional information",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
}

impl DocumentFormat {
    /// Resolves the format from the declared MIME type, falling back to the
    /// filename extension when the MIME type is generic or absent.
    pub fn detect(mime_type: &str, filename: &str) -> Result<Self, AnalysisError> {
        let mime = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            PDF_MIME => Ok(DocumentFormat::Pdf),
            DOC_MIME => Ok(DocumentFormat::Doc),
            DOCX_MIME => Ok(DocumentFormat::Docx),
            "" | "application/octet-stream" => Self::from_extension(filename),
            other => Err(AnalysisError::UnsupportedFormat(other.to_string())),
        }
    }

    fn from_extension(filename: &str) -> Result<Self, AnalysisError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("doc") => Ok(DocumentFormat::Doc),
            Some("docx") => Ok(DocumentFormat::Docx),
            _ => Err(AnalysisError::UnsupportedFormat(format!(
                "unrecognized file '{filename}'"
            ))),
        }
    }
}

/// Rejects documents above `max_bytes` before any decoding happens.
pub fn ensure_within_limit(document: &RawDocument, max_bytes: usize) -> Result<(), AnalysisError> {
    if document.size > max_bytes {
        return Err(AnalysisError::OversizedDocument {
            size: document.size,
            max: max_bytes,
        });
    }
    Ok(())
}

/// Decodes, normalizes and segments a document.
pub fn extract(document: &RawDocument) -> Result<ExtractedText, AnalysisError> {
    let format = DocumentFormat::detect(&document.mime_type, &document.filename)?;
    let raw = match format {
        DocumentFormat::Pdf => decode_pdf(&document.bytes)?,
        DocumentFormat::Docx => decode_docx(&document.bytes)?,
        DocumentFormat::Doc => decode_doc(&document.bytes)?,
    };

    let text = normalize(&raw);
    if text.is_empty() {
        return Err(AnalysisError::EmptyDocument);
    }

    let extracted = segment(text);
    debug!(
        "Extracted {} chars in {} spans from {:?} '{}'",
        extracted.text.len(),
        extracted.spans.len(),
        format,
        document.filename
    );
    Ok(extracted)
}

// ────────────────────────────────────────────────────────────────────────────
// Decoders
// ────────────────────────────────────────────────────────────────────────────

fn corrupt(msg: impl Into<String>) -> AnalysisError {
    AnalysisError::CorruptDocument(msg.into())
}

fn decode_pdf(bytes: &[u8]) -> Result<String, AnalysisError> {
    let header_window = &bytes[..bytes.len().min(1024)];
    if !header_window.windows(5).any(|w| w == b"%PDF-") {
        return Err(corrupt("missing %PDF header"));
    }
    // pdf-extract panics on some malformed object streams instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(corrupt(format!("PDF could not be decoded: {e:?}"))),
        Err(_) => Err(corrupt("PDF decoder rejected the document structure")),
    }
}

fn decode_docx(bytes: &[u8]) -> Result<String, AnalysisError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| corrupt(format!("DOCX container unreadable: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| corrupt(format!("DOCX has no main document part: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| corrupt(format!("DOCX main document part unreadable: {e}")))?;
    Ok(wordprocessing_xml_to_text(&xml))
}

/// Collects `<w:t>` runs; paragraph ends and breaks become newlines, tabs become tabs.
fn wordprocessing_xml_to_text(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_text_run = false;
    let mut rest = xml;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => {
                let Some(close) = rest.find('>') else { break };
                let tag = &rest[1..close];
                let closing = tag.starts_with('/');
                let self_closing = tag.ends_with('/');
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or_default();
                match (name, closing) {
                    ("w:t", false) => in_text_run = !self_closing,
                    ("w:t", true) => in_text_run = false,
                    ("w:p", true) => out.push('\n'),
                    ("w:br", _) | ("w:cr", _) => out.push('\n'),
                    ("w:tab", _) => out.push('\t'),
                    _ => {}
                }
                rest = &rest[close + 1..];
            }
            Some(next) => {
                if in_text_run {
                    out.push_str(&decode_entities(&rest[..next]));
                }
                rest = &rest[next..];
            }
            None => {
                if in_text_run {
                    out.push_str(&decode_entities(rest));
                }
                break;
            }
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';').filter(|&i| i <= 10) else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };
        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Legacy Word binary: recovers printable UTF-16LE and 8-bit text runs from the
/// compound file body, in file order.
fn decode_doc(bytes: &[u8]) -> Result<String, AnalysisError> {
    if !bytes.starts_with(&OLE_SIGNATURE) {
        return Err(corrupt("missing OLE2 compound document signature"));
    }
    let body = &bytes[OLE_HEADER_LEN.min(bytes.len())..];

    let mut runs: Vec<(usize, String)> = Vec::new();
    collect_utf16_runs(body, &mut runs);
    collect_ansi_runs(body, &mut runs);
    runs.sort_by_key(|(offset, _)| *offset);

    Ok(runs
        .into_iter()
        .map(|(_, run)| run)
        .filter(|run| !OLE_STREAM_NAMES.contains(&run.trim()))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn is_text_byte(b: u8) -> bool {
    matches!(b, 0x20..=0x7e | b'\r' | b'\n' | b'\t')
}

fn collect_ansi_runs(bytes: &[u8], runs: &mut Vec<(usize, String)>) {
    let mut start = None;
    for (i, &b) in bytes.iter().enumerate() {
        if is_text_byte(b) {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            push_recovered_run(runs, s, bytes[s..i].iter().map(|&b| b as char).collect());
        }
    }
    if let Some(s) = start {
        push_recovered_run(runs, s, bytes[s..].iter().map(|&b| b as char).collect());
    }
}

fn collect_utf16_runs(bytes: &[u8], runs: &mut Vec<(usize, String)>) {
    let mut start = None;
    let mut buf = String::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let (lo, hi) = (bytes[i], bytes[i + 1]);
        if hi == 0 && is_text_byte(lo) {
            start.get_or_insert(i);
            buf.push(lo as char);
            i += 2;
        } else {
            if let Some(s) = start.take() {
                push_recovered_run(runs, s, std::mem::take(&mut buf));
            }
            i += 1;
        }
    }
    if let Some(s) = start {
        push_recovered_run(runs, s, buf);
    }
}

/// Keeps runs long enough and letter-dense enough to be prose rather than binary noise.
fn push_recovered_run(runs: &mut Vec<(usize, String)>, offset: usize, run: String) {
    let run = run.trim().replace('\r', "\n");
    let visible: Vec<char> = run.chars().filter(|c| !c.is_whitespace()).collect();
    if visible.len() < MIN_RECOVERED_RUN {
        return;
    }
    let letters = visible.iter().filter(|c| c.is_alphabetic()).count();
    if letters * 2 >= visible.len() {
        runs.push((offset, run));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Unifies line endings and whitespace, drops control characters, rewrites
/// bullet glyphs to `- ` and keeps at most one blank line between blocks.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();
    for line in unified.split('\n') {
        // bullet glyph with nothing after it
        let Some(cleaned) = clean_line(line) else {
            continue;
        };
        if cleaned.is_empty() {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
            continue;
        }
        lines.push(cleaned);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn clean_line(line: &str) -> Option<String> {
    let mut out = String::with_capacity(line.len());
    let mut after_space = true;
    for c in line.chars() {
        if c.is_whitespace() {
            if !after_space {
                out.push(' ');
            }
            after_space = true;
        } else if c.is_control() || matches!(c, '\u{feff}' | '\u{200b}' | '\u{00ad}') {
            continue;
        } else {
            out.push(c);
            after_space = false;
        }
    }
    let trimmed = out.trim_end();

    let mut chars = trimmed.chars();
    match chars.next() {
        Some(glyph) if BULLET_GLYPHS.contains(&glyph) => {
            let rest = chars.as_str().trim_start();
            (!rest.is_empty()).then(|| format!("- {rest}"))
        }
        _ => Some(trimmed.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section detection
// ────────────────────────────────────────────────────────────────────────────

struct OpenSpan {
    label: SectionLabel,
    start: usize,
    body_start: usize,
}

impl OpenSpan {
    fn close(self, end: usize) -> SectionSpan {
        SectionSpan {
            label: self.label,
            range: self.start..end,
            body_start: self.body_start,
        }
    }
}

/// Splits normalized text into labelled spans.
///
/// The block before the first heading is Contact Information. Every heading
/// opens a span that runs to the next heading, so spans are contiguous and
/// cover the text.
pub fn segment(text: String) -> ExtractedText {
    let mut spans = Vec::new();
    let mut current = OpenSpan {
        label: SectionLabel::Canonical(Section::ContactInformation),
        start: 0,
        body_start: 0,
    };

    let mut offset = 0;
    for line in text.split('\n') {
        if let Some((label, body_offset)) = detect_heading(line) {
            let next = OpenSpan {
                label,
                start: offset,
                body_start: offset + body_offset,
            };
            let finished = std::mem::replace(&mut current, next);
            if offset > finished.start {
                spans.push(finished.close(offset));
            }
        }
        offset += line.len() + 1;
    }
    spans.push(current.close(text.len()));

    ExtractedText { text, spans }
}

/// Returns the heading's label and the byte offset within `line` where body text begins.
fn detect_heading(line: &str) -> Option<(SectionLabel, usize)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("- ") {
        return None;
    }
    if let Some(label) = heading_label(trimmed) {
        return Some((label, line.len()));
    }
    // Inline form, e.g. "Skills: Rust, Go". Only canonical headings qualify so
    // that list labels such as "Languages:" stay inside their section, and a
    // contact value ("Portfolio: https://...") is a label, not a heading.
    let (prefix, rest) = line.split_once(':')?;
    if has_link(rest) || has_email(rest) || has_phone(rest) {
        return None;
    }
    match heading_label(prefix)? {
        label @ SectionLabel::Canonical(_) => Some((label, prefix.len() + 1)),
        SectionLabel::Unclassified => None,
    }
}

fn heading_label(candidate: &str) -> Option<SectionLabel> {
    if candidate.chars().count() > MAX_HEADING_CHARS {
        return None;
    }
    let key = heading_key(candidate);
    if key.is_empty() || key.split(' ').count() > MAX_HEADING_WORDS {
        return None;
    }
    SECTION_HEADINGS
        .iter()
        .find(|(_, phrases)| phrases.contains(&key.as_str()))
        .map(|(section, _)| SectionLabel::Canonical(*section))
        .or_else(|| {
            UNCLASSIFIED_HEADINGS
                .contains(&key.as_str())
                .then_some(SectionLabel::Unclassified)
        })
}

fn heading_key(candidate: &str) -> String {
    candidate
        .to_lowercase()
        .replace('&', " and ")
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
