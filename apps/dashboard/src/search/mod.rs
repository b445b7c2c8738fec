//! Job search: tolerant listing parsing and the query runner.
//!
//! The runner holds no lock and serializes nothing: overlapping searches are
//! allowed and whichever response is applied last wins.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api_client::{ApiError, Collaborator};

/// Term searched when the Jobs view mounts for the first time.
pub const DEFAULT_QUERY: &str = "Python";

const DEFAULT_PLATFORM: &str = "Job Board";
const DEFAULT_LOCATION: &str = "Remote";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub platform: String,
    pub link: String,
}

/// Lenient mirror of one element of the collaborator's `jobs` array.
#[derive(Debug, Deserialize)]
struct RawJob {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl From<RawJob> for JobListing {
    fn from(raw: RawJob) -> Self {
        let id = match raw.id {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        JobListing {
            id,
            title: raw.title.unwrap_or_default(),
            company: raw.company.unwrap_or_default(),
            location: non_empty_or(raw.location, DEFAULT_LOCATION),
            platform: non_empty_or(raw.platform, DEFAULT_PLATFORM),
            link: raw.link.unwrap_or_default(),
        }
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Extracts listings from a `{ jobs: [...] }` body.
///
/// A missing or non-array `jobs` yields an empty list. Elements that are not
/// objects, or whose fields have the wrong types, are skipped.
pub fn parse_job_listings(body: &Value) -> Vec<JobListing> {
    let Some(items) = body.get("jobs").and_then(Value::as_array) else {
        debug!("Job search response has no jobs array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<RawJob>(item.clone()) {
            Ok(raw) if item.is_object() => Some(JobListing::from(raw)),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping malformed job listing: {e}");
                None
            }
        })
        .collect()
}

/// Snapshot of the Jobs view. Replaced wholesale on every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: Arc<Vec<JobListing>>,
    pub loading: bool,
}

#[derive(Debug, Default)]
pub struct SearchRunner {
    state: Arc<SearchState>,
}

impl SearchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<SearchState> {
        Arc::clone(&self.state)
    }

    /// Marks a search as started. Returns the trimmed term to fetch, or
    /// `None` for an empty term, in which case nothing changes.
    pub fn begin(&mut self, term: &str) -> Option<String> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        info!("Searching jobs for {term:?}");
        self.state = Arc::new(SearchState {
            query: term.to_string(),
            results: Arc::clone(&self.state.results),
            loading: true,
        });
        Some(term.to_string())
    }

    /// Applies a finished search. Success replaces the results, failure
    /// clears them; both stop loading.
    pub fn complete(&mut self, outcome: Result<Vec<JobListing>, ApiError>) -> Arc<SearchState> {
        let results = match outcome {
            Ok(listings) => {
                debug!("Job search returned {} listings", listings.len());
                listings
            }
            Err(e) => {
                warn!("Job search failed: {e}");
                Vec::new()
            }
        };
        self.state = Arc::new(SearchState {
            query: self.state.query.clone(),
            results: Arc::new(results),
            loading: false,
        });
        self.state()
    }

    /// Runs one search to completion against `api`.
    pub async fn search(&mut self, api: &dyn Collaborator, term: &str) -> Arc<Vec<JobListing>> {
        let Some(term) = self.begin(term) else {
            return Arc::clone(&self.state.results);
        };
        let outcome = api.recommend_jobs(&term).await;
        Arc::clone(&self.complete(outcome).results)
    }
}
