use serde_json::Value;

use crate::api_client::ApiError;
use crate::search::JobListing;

use super::workflow::{ActiveView, AnalysisSource};

/// Result of a finished workflow, sent back to the coordinator.
///
/// Completions are delivered to the shared state, not to the view that
/// started them, so switching views never drops a result.
#[derive(Debug)]
pub enum Completion {
    Analysis {
        origin: ActiveView,
        source: AnalysisSource,
        outcome: Result<Value, ApiError>,
    },
    PostGenerated {
        outcome: Result<String, ApiError>,
    },
    Published {
        outcome: Result<(), ApiError>,
    },
    JobsFound {
        term: String,
        outcome: Result<Vec<JobListing>, ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Analysis,
    PostGenerated,
    Published,
    JobsFound,
}

impl Completion {
    pub fn kind(&self) -> CompletionKind {
        match self {
            Completion::Analysis { .. } => CompletionKind::Analysis,
            Completion::PostGenerated { .. } => CompletionKind::PostGenerated,
            Completion::Published { .. } => CompletionKind::Published,
            Completion::JobsFound { .. } => CompletionKind::JobsFound,
        }
    }

    pub fn succeeded(&self) -> bool {
        match self {
            Completion::Analysis { outcome, .. } => outcome.is_ok(),
            Completion::PostGenerated { outcome } => outcome.is_ok(),
            Completion::Published { outcome } => outcome.is_ok(),
            Completion::JobsFound { outcome, .. } => outcome.is_ok(),
        }
    }
}
