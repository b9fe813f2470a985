//! Skill & keyword extraction.
//!
//! Keywords are counted from the text alone. Skills come from a longest-match
//! walk over the same tokens against the taxonomy's phrase index; a matched
//! phrase consumes its tokens, so every skill mention owns at least one counted
//! keyword occurrence.

use std::collections::HashMap;

use crate::analysis::models::{KeywordFrequency, Proficiency, SkillRecord};
use crate::analysis::taxonomy::Taxonomy;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or",
    "other", "our", "ours", "out", "over", "own", "per", "same", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "us", "very", "via", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
    "within", "would", "you", "your", "yours",
];

const ADVANCED_MODIFIERS: &[&str] = &[
    "expert", "expertise", "advanced", "proficient", "extensive", "strong", "deep", "senior",
    "mastery", "lead",
];

const BEGINNER_MODIFIERS: &[&str] = &[
    "basic", "basics", "beginner", "familiar", "familiarity", "exposure", "learning",
    "introductory", "novice",
];

const MODIFIER_WINDOW_BEFORE: usize = 3;
const MODIFIER_WINDOW_AFTER: usize = 2;

/// Output of the keyword stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordExtraction {
    pub keywords: KeywordFrequency,
    pub candidate_skills: Vec<SkillRecord>,
}

/// A single taxonomy phrase occurrence on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillMention {
    pub skill: usize,
    pub line: usize,
    pub start: usize,
    pub len: usize,
}

/// Splits a line into lowercase tokens.
///
/// A token starts at an alphanumeric character and continues over
/// alphanumerics and `+ # .`, so `C++`, `C#` and `Node.js` survive intact.
/// Hyphens split (`Python-based` is `python based`). Trailing `.` is trimmed.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in line.chars() {
        let continues =
            c.is_alphanumeric() || (!current.is_empty() && matches!(c, '+' | '#' | '.'));
        if continues {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            push_token(&mut tokens, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, current);
    }
    tokens
}

fn push_token(tokens: &mut Vec<String>, token: String) {
    let trimmed = token.trim_end_matches('.');
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
}

/// Light plural stemming: `apis` → `api`, but `aws`, `express` and `css` stay.
pub fn stem(token: &str) -> &str {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        &token[..token.len() - 1]
    } else {
        token
    }
}

/// Tokens that enter the keyword table: contain a letter and are not stopwords.
pub fn is_countable(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic()) && !STOPWORDS.contains(&token)
}

pub fn keyword_frequency(text: &str) -> KeywordFrequency {
    let mut keywords = KeywordFrequency::new();
    for line in text.lines() {
        for token in tokenize(line) {
            if is_countable(&token) {
                *keywords.entry(token).or_insert(0) += 1;
            }
        }
    }
    keywords
}

/// All taxonomy phrase occurrences, in document order.
pub fn find_skill_mentions(text: &str, taxonomy: &Taxonomy) -> Vec<SkillMention> {
    let mut mentions = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let tokens = tokenize(line);
        let stems: Vec<&str> = tokens.iter().map(|t| stem(t)).collect();
        let mut i = 0;
        while i < stems.len() {
            match taxonomy.match_at(&stems[i..]) {
                Some((skill, len)) => {
                    mentions.push(SkillMention {
                        skill,
                        line: line_no,
                        start: i,
                        len,
                    });
                    i += len;
                }
                None => i += 1,
            }
        }
    }
    mentions
}

/// Distinct taxonomy skills mentioned in `text`, in order of first mention.
pub fn skills_in(text: &str, taxonomy: &Taxonomy) -> Vec<usize> {
    let mut seen = Vec::new();
    for mention in find_skill_mentions(text, taxonomy) {
        if !seen.contains(&mention.skill) {
            seen.push(mention.skill);
        }
    }
    seen
}

#[derive(Default)]
struct ProficiencySignals {
    advanced: bool,
    beginner: bool,
}

impl ProficiencySignals {
    fn level(&self) -> Proficiency {
        if self.advanced {
            Proficiency::Advanced
        } else if self.beginner {
            Proficiency::Beginner
        } else {
            Proficiency::Intermediate
        }
    }
}

/// Builds the keyword table and the candidate skill set from extracted text.
pub fn extract_keywords(text: &str, taxonomy: &Taxonomy) -> KeywordExtraction {
    let keywords = keyword_frequency(text);

    let lines: Vec<Vec<String>> = text.lines().map(tokenize).collect();
    let mut order: Vec<usize> = Vec::new();
    let mut signals: HashMap<usize, ProficiencySignals> = HashMap::new();

    for mention in find_skill_mentions(text, taxonomy) {
        let tokens = &lines[mention.line];
        let before = &tokens[mention.start.saturating_sub(MODIFIER_WINDOW_BEFORE)..mention.start];
        let after_start = mention.start + mention.len;
        let after = &tokens[after_start..(after_start + MODIFIER_WINDOW_AFTER).min(tokens.len())];

        let entry = signals.entry(mention.skill).or_insert_with(|| {
            order.push(mention.skill);
            ProficiencySignals::default()
        });
        for token in before.iter().chain(after) {
            if ADVANCED_MODIFIERS.contains(&token.as_str()) {
                entry.advanced = true;
            } else if BEGINNER_MODIFIERS.contains(&token.as_str()) {
                entry.beginner = true;
            }
        }
    }

    let candidate_skills = order
        .into_iter()
        .map(|idx| {
            let def = taxonomy.skill(idx);
            SkillRecord {
                name: def.name.clone(),
                category: def.category.clone(),
                proficiency: signals
                    .get(&idx)
                    .map(ProficiencySignals::level)
                    .unwrap_or(Proficiency::Intermediate),
                demand: def.demand,
            }
        })
        .collect();

    KeywordExtraction {
        keywords,
        candidate_skills,
    }
}
