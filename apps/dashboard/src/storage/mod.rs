//! Durable key-value storage for the dashboard.
//!
//! Every persisted value is a plain string, the way browser local storage
//! holds them. The post history is the only JSON-encoded entry.
//!
//! Two backends:
//! - [`MemoryStore`]: process-local, used by tests and ephemeral sessions.
//! - [`FileStore`]: a single JSON file on disk, rewritten through a temp
//!   file + rename on every mutation.

use std::sync::Arc;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the authentication token captured from the login redirect.
pub const TOKEN_KEY: &str = "linkedin_token";
/// Key holding the display name.
pub const USER_NAME_KEY: &str = "user_name";
/// Key holding the avatar URL (empty string when the provider sent none).
pub const USER_PIC_KEY: &str = "user_pic";
/// Key holding the JSON-encoded post history, newest first.
pub const POST_HISTORY_KEY: &str = "post_history";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous string key-value store.
///
/// Each `set`/`remove` is one atomic write: readers observe either the old
/// or the new value, never a partial one.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Handle shared by the session store and the history log.
pub type SharedStore = Arc<dyn KeyValueStore>;
