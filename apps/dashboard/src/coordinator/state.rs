use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::search::SearchState;
use crate::session::Identity;
use crate::stats::ProfileStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// The single user-facing notification slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// In-flight counters for the workflows that show a busy indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    pub analyses: usize,
    pub generations: usize,
    pub publishes: usize,
}

/// Shared dashboard state read by every view.
///
/// Each field is an immutable snapshot. Setters take a complete new value
/// and swap it in; nothing is written field-by-field inside a snapshot, so a
/// reader holding an `Arc` never sees a half-updated record. Every setter
/// bumps `revision`, which views compare to decide whether to re-render.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    identity: Option<Arc<Identity>>,
    stats: Option<Arc<ProfileStats>>,
    history: Arc<Vec<String>>,
    search: Arc<SearchState>,
    draft: Option<Arc<String>>,
    pending: Pending,
    notice: Option<Arc<Notice>>,
    revision: u64,
}

impl DashboardState {
    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.identity.clone()
    }

    pub fn stats(&self) -> Option<Arc<ProfileStats>> {
        self.stats.clone()
    }

    pub fn history(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.history)
    }

    pub fn search(&self) -> Arc<SearchState> {
        Arc::clone(&self.search)
    }

    pub fn draft(&self) -> Option<Arc<String>> {
        self.draft.clone()
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    pub fn notice(&self) -> Option<Arc<Notice>> {
        self.notice.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set_identity(&mut self, identity: Option<Identity>) {
        self.identity = identity.map(Arc::new);
        self.bump();
    }

    pub(crate) fn set_stats(&mut self, stats: Option<ProfileStats>) {
        self.stats = stats.map(Arc::new);
        self.bump();
    }

    pub(crate) fn set_history(&mut self, history: Arc<Vec<String>>) {
        self.history = history;
        self.bump();
    }

    pub(crate) fn set_search(&mut self, search: Arc<SearchState>) {
        self.search = search;
        self.bump();
    }

    pub(crate) fn set_draft(&mut self, draft: Option<String>) {
        self.draft = draft.map(Arc::new);
        self.bump();
    }

    pub(crate) fn set_pending(&mut self, pending: Pending) {
        self.pending = pending;
        self.bump();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        self.notice = notice.map(Arc::new);
        self.bump();
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_bump_revision() {
        let mut state = DashboardState::default();
        assert_eq!(state.revision(), 0);
        state.set_draft(Some("hello".to_string()));
        state.set_notice(Some(Notice::info("saved")));
        assert_eq!(state.revision(), 2);
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let mut state = DashboardState::default();
        state.set_history(Arc::new(vec!["A".to_string()]));
        let held = state.history();

        state.set_history(Arc::new(vec!["B".to_string(), "A".to_string()]));
        assert_eq!(*held, vec!["A".to_string()]);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_notice_levels() {
        assert_eq!(Notice::info("x").level, NoticeLevel::Info);
        assert_eq!(Notice::error("x").level, NoticeLevel::Error);
    }
}
