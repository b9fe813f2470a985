//! Textual signals used by the section classifier: quantified impact, dates,
//! contact details and education markers.

use std::sync::LazyLock;

use regex::Regex;

static MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z]{3,9})\.?,?\s+(19[5-9]\d|20\d\d)\b").expect("valid regex")
});
static NUMERIC_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(0?[1-9]|1[0-2])[/.](19[5-9]\d|20\d\d)\b").expect("valid regex"));
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19[5-9]\d|20\d\d)\b").expect("valid regex"));
static ONGOING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(present|current|now|ongoing)\b").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{7,}\d").expect("valid regex"));
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://\S+|www\.\S+|linkedin\.com/\S*|github\.com/\S*|gitlab\.com/\S*)")
        .expect("valid regex")
});

static INSTITUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(university|college|institute|school|academy|polytechnic|universit[ée])\b")
        .expect("valid regex")
});
static DEGREE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(bachelor|master|doctorate|ph\.?\s?d|mba|diploma|degree|b\.?\s?sc|m\.?\s?sc|b\.?\s?tech|m\.?\s?tech|b\.?\s?eng|m\.?\s?eng|b\.s\.|m\.s\.|b\.a\.|m\.a\.)",
    )
    .expect("valid regex")
});
static CREDENTIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(certified|certification|certificate|credential|licen[cs]e[d]?|issued|accredited)\b")
        .expect("valid regex")
});

/// Month-year, `MM/YYYY`, bare years and "Present"-style markers.
pub fn has_date(text: &str) -> bool {
    MONTH_YEAR_RE
        .captures_iter(text)
        .any(|c| is_month_name(&c[1]))
        || NUMERIC_DATE_RE.is_match(text)
        || YEAR_RE.is_match(text)
        || ONGOING_RE.is_match(text)
}

/// Removes date expressions so their digits are not mistaken for metrics.
pub fn strip_dates(text: &str) -> String {
    let without_month_years = MONTH_YEAR_RE.replace_all(text, |caps: &regex::Captures| {
        if is_month_name(&caps[1]) {
            " ".to_string()
        } else {
            caps[0].to_string()
        }
    });
    let without_numeric = NUMERIC_DATE_RE.replace_all(&without_month_years, " ");
    YEAR_RE.replace_all(&without_numeric, " ").into_owned()
}

fn is_month_name(word: &str) -> bool {
    word.parse::<chrono::Month>().is_ok()
}

/// A line carries quantified impact when a digit survives date removal.
///
/// Counts, percentages, currency amounts, `~N` estimates and `Nx` multipliers
/// all carry one; a bare currency sign (`Saved $ on hosting`) does not.
pub fn is_quantified(line: &str) -> bool {
    strip_dates(line).chars().any(|c| c.is_ascii_digit())
}

/// Number of non-empty lines in `body` carrying quantified impact.
pub fn quantified_line_count(body: &str) -> usize {
    content_lines(body).filter(|l| is_quantified(l)).count()
}

/// Non-empty trimmed lines with any leading bullet marker removed.
pub fn content_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines()
        .map(|l| l.trim().trim_start_matches("- ").trim())
        .filter(|l| !l.is_empty())
}

pub fn word_count(body: &str) -> usize {
    body.split_whitespace()
        .filter(|w| w.chars().any(|c| c.is_alphanumeric()))
        .count()
}

/// Sentences of at least three words.
pub fn sentence_count(body: &str) -> usize {
    body.split(['.', '!', '?'])
        .filter(|s| word_count(s) >= 3)
        .count()
}

pub fn has_email(text: &str) -> bool {
    EMAIL_RE.is_match(text)
}

pub fn has_phone(text: &str) -> bool {
    PHONE_RE
        .find_iter(text)
        .any(|m| m.as_str().chars().filter(|c| c.is_ascii_digit()).count() >= 8)
}

pub fn has_link(text: &str) -> bool {
    LINK_RE.is_match(text)
}

pub fn has_institution(text: &str) -> bool {
    INSTITUTION_RE.is_match(text)
}

pub fn has_degree(text: &str) -> bool {
    DEGREE_RE.is_match(text)
}

pub fn has_credential_marker(text: &str) -> bool {
    CREDENTIAL_RE.is_match(text)
}

/// Items in a skills listing: separated by commas, semicolons, pipes, slashes,
/// bullets or newlines. A leading `Group:` label is dropped from each line.
pub fn list_item_count(body: &str) -> usize {
    content_lines(body)
        .map(|line| match line.split_once(':') {
            Some((_, rest)) => rest,
            None => line,
        })
        .flat_map(|line| line.split([',', ';', '|', '/', '•']))
        .filter(|item| item.chars().any(|c| c.is_alphanumeric()))
        .count()
}
