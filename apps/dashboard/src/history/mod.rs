use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::storage::{SharedStore, StorageError, POST_HISTORY_KEY};

/// Append-only log of generated posts, newest first.
///
/// Entries are never edited or removed here. Truncating for display is the
/// view layer's concern.
pub struct HistoryLog {
    store: SharedStore,
    entries: Arc<Vec<String>>,
}

impl HistoryLog {
    /// Reads the persisted history. A missing key or an unparseable value
    /// yields an empty log; the error is logged, never returned.
    pub fn load(store: SharedStore) -> Self {
        let entries = match store.get(POST_HISTORY_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Discarding unreadable post history: {e}");
                    Vec::new()
                }
            },
        };
        info!("Loaded {} posts from history", entries.len());
        Self {
            store,
            entries: Arc::new(entries),
        }
    }

    pub fn entries(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepends `text` and persists the whole sequence in one write. The new
    /// sequence is adopted only after the write succeeds.
    pub fn append(&mut self, text: impl Into<String>) -> Result<Arc<Vec<String>>, StorageError> {
        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(text.into());
        next.extend(self.entries.iter().cloned());

        let encoded = serde_json::to_string(&next)?;
        self.store.set(POST_HISTORY_KEY, &encoded)?;
        debug!("Post history now holds {} entries", next.len());

        self.entries = Arc::new(next);
        Ok(self.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn memory() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut log = HistoryLog::load(memory());
        log.append("A").unwrap();
        let entries = log.append("B").unwrap();
        assert_eq!(*entries, vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_reload_round_trip() {
        let store = memory();
        let mut log = HistoryLog::load(Arc::clone(&store));
        log.append("first post").unwrap();
        log.append("second \"quoted\" post\nwith newline").unwrap();
        let written = log.entries();

        let reloaded = HistoryLog::load(store);
        assert_eq!(reloaded.entries(), written);
    }

    #[test]
    fn test_missing_history_is_empty() {
        let log = HistoryLog::load(memory());
        assert!(log.is_empty());
    }

    #[test]
    fn test_corrupt_history_is_empty() {
        let store = memory();
        store.set(POST_HISTORY_KEY, "[\"unterminated").unwrap();
        assert!(HistoryLog::load(Arc::clone(&store)).is_empty());

        store.set(POST_HISTORY_KEY, "{\"not\": \"a list\"}").unwrap();
        assert!(HistoryLog::load(store).is_empty());
    }

    #[test]
    fn test_earlier_snapshots_are_untouched() {
        let mut log = HistoryLog::load(memory());
        let first = log.append("A").unwrap();
        log.append("B").unwrap();
        assert_eq!(*first, vec!["A".to_string()]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_failed_write_keeps_previous_entries() {
        let mut log = HistoryLog::load(Arc::new(FailingStore));
        assert!(log.append("lost").is_err());
        assert!(log.is_empty());
    }
}
