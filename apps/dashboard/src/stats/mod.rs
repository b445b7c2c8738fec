//! Stats normalizer: reconciles heterogeneous analysis payloads into the
//! one canonical [`ProfileStats`] record every view reads.
//!
//! Normalization never fails. A payload that is malformed, empty, or not an
//! object still produces a complete record built from zero values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub mod resolve;

use resolve::{
    as_non_empty_list, as_number, as_string_list, as_text, first_present, EXTRACTED_TEXT_KEY,
    FEEDBACK, POSTS, SCORE, SKILLS, TITLE, YEARS,
};

pub const MAX_SKILLS: usize = 10;

/// Shown instead of skills when the document was read but no structured
/// skills came back.
pub const SCANNED_SKILLS_SENTINEL: [&str; 3] = ["PDF Scanned", "Data Ready", "AI Active"];

/// Scores above this mark a strong profile in the audit view.
pub const STRONG_PROFILE_THRESHOLD: u32 = 70;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileStats {
    pub years_experience: f64,
    /// 0..=100
    pub strength_score: u32,
    pub posts_created: usize,
    /// At most [`MAX_SKILLS`] entries.
    pub top_skills: Vec<String>,
    pub top_experience_title: Option<String>,
    pub feedback: Vec<String>,
    /// Set when `feedback` was synthesized from the years rather than
    /// supplied by the collaborator. Synthesized feedback is rebuilt on every
    /// reconcile instead of carried over.
    #[serde(default)]
    pub feedback_generated: bool,
}

impl ProfileStats {
    /// Same record with `posts_created` recomputed for a new history length.
    pub fn with_history_len(&self, history_len: usize, reported_posts: usize) -> Self {
        Self {
            posts_created: history_len.max(reported_posts),
            ..self.clone()
        }
    }

    pub fn is_strong(&self) -> bool {
        self.strength_score > STRONG_PROFILE_THRESHOLD
    }
}

/// Every concept the payload actually supplied. `None` means "lacking".
#[derive(Debug, Default)]
struct Resolved {
    years: Option<f64>,
    score: Option<u32>,
    skills: Option<Vec<String>>,
    feedback: Option<Vec<String>>,
    title: Option<String>,
}

fn resolve_payload(payload: &Map<String, Value>) -> Resolved {
    let skills = first_present(payload, &SKILLS, as_non_empty_list)
        .map(|mut skills| {
            skills.truncate(MAX_SKILLS);
            skills
        })
        .or_else(|| {
            payload
                .get(EXTRACTED_TEXT_KEY)
                .and_then(as_text)
                .map(|_| SCANNED_SKILLS_SENTINEL.iter().map(|s| s.to_string()).collect())
        });

    Resolved {
        years: first_present(payload, &YEARS, as_number).map(|y| y.max(0.0)),
        score: first_present(payload, &SCORE, as_number)
            .map(|s| s.round().clamp(0.0, 100.0) as u32),
        skills,
        feedback: first_present(payload, &FEEDBACK, as_string_list),
        title: first_present(payload, &TITLE, as_text),
    }
}

/// Post count the payload claims (`posts`, then `posts_created`), or 0.
pub fn reported_posts(payload: &Value) -> usize {
    payload
        .as_object()
        .and_then(|map| first_present(map, &POSTS, as_number))
        .map(|n| n.max(0.0) as usize)
        .unwrap_or(0)
}

/// Feedback synthesized when the payload carries none.
pub fn fallback_feedback(years: f64) -> Vec<String> {
    vec![
        "Resume length is optimal.".to_string(),
        format!("Detected approx. {years} years of experience."),
        "Consider adding more quantifiable metrics.".to_string(),
    ]
}

/// Normalizes one payload into a complete record, using zero values for
/// every concept the payload lacks.
pub fn normalize(payload: &Value, history_len: usize) -> ProfileStats {
    reconcile(None, payload, history_len)
}

/// Builds a full replacement for `previous`. Concepts the payload lacks are
/// carried over from `previous` when there is one, zero-valued otherwise.
/// `posts_created` is always recomputed from the history length and the
/// payload's own post count.
pub fn reconcile(previous: Option<&ProfileStats>, payload: &Value, history_len: usize) -> ProfileStats {
    let empty = Map::new();
    let map = payload.as_object().unwrap_or(&empty);
    let resolved = resolve_payload(map);

    debug!(
        years = resolved.years.is_some(),
        score = resolved.score.is_some(),
        skills = resolved.skills.is_some(),
        feedback = resolved.feedback.is_some(),
        "Resolved analysis payload"
    );

    let years_experience = resolved
        .years
        .or(previous.map(|p| p.years_experience))
        .unwrap_or(0.0);

    let supplied = resolved.feedback.or_else(|| {
        previous
            .filter(|p| !p.feedback_generated)
            .map(|p| p.feedback.clone())
    });
    let feedback_generated = supplied.is_none();
    let feedback = supplied.unwrap_or_else(|| fallback_feedback(years_experience));

    ProfileStats {
        years_experience,
        strength_score: resolved
            .score
            .or(previous.map(|p| p.strength_score))
            .unwrap_or(0),
        posts_created: history_len.max(reported_posts(payload)),
        top_skills: resolved
            .skills
            .or_else(|| previous.map(|p| p.top_skills.clone()))
            .unwrap_or_default(),
        top_experience_title: resolved
            .title
            .or_else(|| previous.and_then(|p| p.top_experience_title.clone())),
        feedback,
        feedback_generated,
    }
}
