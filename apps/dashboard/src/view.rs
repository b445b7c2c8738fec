//! Read-only view models derived from [`DashboardState`].
//!
//! Views never hold their own copies of shared data. Each model is rebuilt
//! from the current state snapshot whenever `revision` moves.

use std::sync::Arc;

use crate::coordinator::DashboardState;
use crate::search::JobListing;
use crate::session::DEFAULT_DISPLAY_NAME;

/// Posts shown in the Overview's recent activity list.
pub const RECENT_POSTS_LIMIT: usize = 3;

/// Shown in the skills panel until a profile has been analyzed.
pub const SKILLS_PLACEHOLDER: [&str; 3] = ["Upload PDF", "To See", "Your Skills"];

const UNKNOWN: &str = "--";

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewModel {
    pub greeting_name: String,
    pub avatar_url: Option<String>,
    pub experience: String,
    pub strength: String,
    pub posts_created: usize,
    pub top_skills: Vec<String>,
    pub recent_posts: Vec<String>,
    pub synced: bool,
    pub uploading: bool,
}

impl OverviewModel {
    pub fn from_state(state: &DashboardState) -> Self {
        let identity = state.identity();
        let stats = state.stats();
        let history = state.history();

        let greeting_name = identity
            .as_deref()
            .map(|i| i.first_name().to_string())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

        let (experience, strength, posts_created, top_skills) = match stats.as_deref() {
            Some(stats) => (
                format!("{} Years", stats.years_experience),
                format!("{}/100", stats.strength_score),
                stats.posts_created,
                stats.top_skills.clone(),
            ),
            None => (
                UNKNOWN.to_string(),
                UNKNOWN.to_string(),
                history.len(),
                SKILLS_PLACEHOLDER.iter().map(|s| s.to_string()).collect(),
            ),
        };

        Self {
            greeting_name,
            avatar_url: identity.and_then(|i| i.avatar_url.clone()),
            experience,
            strength,
            posts_created,
            top_skills,
            recent_posts: history.iter().take(RECENT_POSTS_LIMIT).cloned().collect(),
            synced: stats.is_some(),
            uploading: state.pending().analyses > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsModel {
    pub query: String,
    pub loading: bool,
    pub listings: Arc<Vec<JobListing>>,
}

impl JobsModel {
    pub fn from_state(state: &DashboardState) -> Self {
        let search = state.search();
        Self {
            query: search.query.clone(),
            loading: search.loading,
            listings: Arc::clone(&search.results),
        }
    }

    /// True once a search finished with nothing to show.
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.listings.is_empty()
    }
}

/// Profile Audit report; `None` until an analysis has landed.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditModel {
    pub score: u32,
    pub strong: bool,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub feedback: Vec<String>,
    pub analyzing: bool,
}

impl AuditModel {
    pub fn from_state(state: &DashboardState) -> Option<Self> {
        let stats = state.stats()?;
        Some(Self {
            score: stats.strength_score,
            strong: stats.is_strong(),
            headline: stats.top_experience_title.clone(),
            skills: stats.top_skills.clone(),
            feedback: stats.feedback.clone(),
            analyzing: state.pending().analyses > 0,
        })
    }
}
