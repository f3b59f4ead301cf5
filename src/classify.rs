//! Keyword-based subject classification and grade-based difficulty tiers.
//!
//! Matching is plain substring presence on the lower-cased text, so
//! "address" counts as "add". Subjects are tried in a fixed
//! priority order and the first hit wins.

use crate::domain::{Difficulty, Subject};

const MATH_KEYWORDS: &[&str] = &["math", "number", "add", "subtract", "multiply"];
const READING_KEYWORDS: &[&str] = &["read", "word", "story", "book", "letter"];
const SCIENCE_KEYWORDS: &[&str] = &["science", "experiment", "nature", "animal", "plant"];

/// Priority order matters: math, then reading, then science.
const SUBJECT_KEYWORDS: &[(Subject, &[&str])] = &[
    (Subject::Math, MATH_KEYWORDS),
    (Subject::Reading, READING_KEYWORDS),
    (Subject::Science, SCIENCE_KEYWORDS),
];

pub fn classify_subject(content: &str) -> Subject {
    let lower = content.to_lowercase();
    SUBJECT_KEYWORDS
        .iter()
        .find(|(_, keys)| keys.iter().any(|k| lower.contains(k)))
        .map(|(subject, _)| *subject)
        .unwrap_or(Subject::General)
}

/// No range validation: any integer lands in one of the three buckets.
pub fn classify_difficulty(grade: i64) -> Difficulty {
    match grade {
        g if g <= 2 => Difficulty::Beginner,
        3..=4 => Difficulty::Intermediate,
        _ => Difficulty::Advanced,
    }
}
