//! Alias resolution table for analysis payloads.
//!
//! The analysis collaborators do not agree on one field name per concept.
//! Each [`Concept`] lists its candidate keys in priority order; the first key
//! holding a present, non-null, coercible value wins.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
pub struct Concept {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

pub const YEARS: Concept = Concept {
    name: "years_experience",
    keys: &["years", "years_experience"],
};

pub const SCORE: Concept = Concept {
    name: "strength_score",
    keys: &["summary_rating", "score", "ats_score"],
};

pub const SKILLS: Concept = Concept {
    name: "top_skills",
    keys: &["skills", "top_skills"],
};

pub const FEEDBACK: Concept = Concept {
    name: "feedback",
    keys: &["feedback", "feedback_list"],
};

pub const TITLE: Concept = Concept {
    name: "top_experience_title",
    keys: &["top_experience"],
};

pub const POSTS: Concept = Concept {
    name: "posts_created",
    keys: &["posts", "posts_created"],
};

/// Present when the collaborator managed to read the document at all.
pub const EXTRACTED_TEXT_KEY: &str = "extracted_text";

/// Returns the first candidate value that is present, non-null, and accepted
/// by `coerce`. A value `coerce` rejects counts as absent.
pub fn first_present<T>(
    payload: &Map<String, Value>,
    concept: &Concept,
    coerce: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    concept
        .keys
        .iter()
        .filter_map(|key| payload.get(*key))
        .filter(|value| !value.is_null())
        .find_map(coerce)
}

/// JSON numbers, or strings that parse as a finite number.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Non-blank string, trimmed.
pub fn as_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// An array keeps its string items in order; a lone string becomes a
/// one-item list. Non-string items are dropped.
pub fn as_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        Value::String(s) if !s.trim().is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}

/// Like [`as_string_list`], but an empty result counts as absent.
pub fn as_non_empty_list(value: &Value) -> Option<Vec<String>> {
    as_string_list(value).filter(|items| !items.is_empty())
}
