use thiserror::Error;

use crate::api_client::ApiError;
use crate::coordinator::{ActiveView, Workflow};
use crate::storage::StorageError;

/// Generic fallback when a backend failure carries no readable reason.
pub const GENERIC_BACKEND_MESSAGE: &str = "Something went wrong. Check Backend.";

/// Dashboard-level error type.
/// Every variant maps to one user-facing message via [`DashboardError::user_message`];
/// no variant is fatal to the session.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("{workflow} belongs to the {} view, but {active} is active", .workflow.owner())]
    ViewNotActive {
        active: ActiveView,
        workflow: Workflow,
    },

    #[error("No generated post to publish")]
    NothingToPublish,
}

impl DashboardError {
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                "Could not save to this device's storage.".to_string()
            }
            DashboardError::Api(e) => {
                tracing::error!("Backend error: {e}");
                e.detail().unwrap_or(GENERIC_BACKEND_MESSAGE).to_string()
            }
            DashboardError::NotSignedIn => "You must be logged in to post!".to_string(),
            DashboardError::ViewNotActive { workflow, .. } => {
                format!("Open {} to use {}.", workflow.owner(), workflow)
            }
            DashboardError::NothingToPublish => "Generate a post first.".to_string(),
        }
    }
}
