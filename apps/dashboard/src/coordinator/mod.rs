//! View coordinator: the single active-view state machine and the owner of
//! all shared dashboard state.
//!
//! User actions start asynchronous workflows as spawned tasks. A task never
//! touches shared state itself; it sends a [`Completion`] back over a channel
//! and the coordinator applies it, in arrival order, to [`DashboardState`].
//! Because delivery targets the shared state rather than the view that
//! started the work, switching views never cancels or drops a result.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api_client::{Collaborator, Tone, Upload};
use crate::errors::DashboardError;
use crate::history::HistoryLog;
use crate::search::{SearchRunner, DEFAULT_QUERY};
use crate::session::{Identity, Location, SessionStore};
use crate::stats::{reconcile, reported_posts};
use crate::storage::SharedStore;

mod messages;
mod state;
mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use messages::{Completion, CompletionKind};
pub use state::{DashboardState, Notice, NoticeLevel, Pending};
pub use workflow::{ActiveView, AnalysisRequest, AnalysisSource, Workflow};

const GENERATE_FAILED: &str = "Failed to generate. Check Backend.";
const PUBLISHED: &str = "Success! Post is live on LinkedIn.";
const PUBLISH_FAILED: &str = "Failed to publish.";
const HISTORY_SAVE_FAILED: &str = "Post generated, but it could not be saved to history.";

pub struct ViewCoordinator {
    active: ActiveView,
    state: DashboardState,
    session: SessionStore,
    history: HistoryLog,
    search: SearchRunner,
    api: Arc<dyn Collaborator>,
    seed_query: String,
    jobs_mounted: bool,
    /// Post count claimed by the last successful analysis payload.
    reported_posts: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl ViewCoordinator {
    /// Loads the persisted post history and starts on the Overview view.
    pub fn new(store: SharedStore, api: Arc<dyn Collaborator>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let history = HistoryLog::load(Arc::clone(&store));
        let mut state = DashboardState::default();
        state.set_history(history.entries());

        Self {
            active: ActiveView::default(),
            state,
            session: SessionStore::new(store),
            history,
            search: SearchRunner::new(),
            api,
            seed_query: DEFAULT_QUERY.to_string(),
            jobs_mounted: false,
            reported_posts: 0,
            tx,
            rx,
        }
    }

    /// Overrides the term searched on the first mount of the Jobs view.
    pub fn with_seed_query(mut self, query: impl Into<String>) -> Self {
        self.seed_query = query.into();
        self
    }

    /// Captures a session from the redirect location, or restores the stored one.
    pub fn boot(&mut self, location: &mut dyn Location) -> Result<Option<Arc<Identity>>, DashboardError> {
        let identity = self.session.bootstrap(location)?;
        self.state.set_identity(identity);
        Ok(self.state.identity())
    }

    pub fn active(&self) -> ActiveView {
        self.active
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Explicit user navigation. The first selection of the Jobs view issues
    /// the seed search.
    pub fn select(&mut self, view: ActiveView) {
        if self.active != view {
            info!("View {} -> {}", self.active, view);
            self.active = view;
        }
        if view == ActiveView::Jobs && !self.jobs_mounted {
            self.jobs_mounted = true;
            let seed = self.seed_query.clone();
            self.start_search(&seed);
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // User actions
    // ────────────────────────────────────────────────────────────────────────

    /// Overview's profile sync. Returns `false` for an empty upload.
    pub fn upload_profile(&mut self, upload: Upload) -> Result<bool, DashboardError> {
        self.require(Workflow::ProfileUpload)?;
        Ok(self.start_analysis(AnalysisRequest::ProfilePdf(upload)))
    }

    /// Profile audit from any supported source. Returns `false` for an empty
    /// upload or a blank URL.
    pub fn analyze(&mut self, request: AnalysisRequest) -> Result<bool, DashboardError> {
        self.require(Workflow::ProfileAnalysis)?;
        Ok(self.start_analysis(request))
    }

    /// Returns `false` for a blank topic.
    pub fn generate_post(&mut self, topic: &str, tone: Tone) -> Result<bool, DashboardError> {
        self.require(Workflow::PostGeneration)?;
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            return Ok(false);
        }

        info!("Generating {tone} post about {topic:?}");
        self.state.set_draft(None);
        self.adjust_pending(|p| p.generations += 1);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = api.generate_post(&topic, tone).await;
            let _ = tx.send(Completion::PostGenerated { outcome });
        });
        Ok(true)
    }

    /// Publishes the current draft with the stored session token.
    pub fn publish_draft(&mut self) -> Result<bool, DashboardError> {
        self.require(Workflow::Publish)?;
        let Some(token) = self.session.token() else {
            return Err(self.fail(DashboardError::NotSignedIn));
        };
        let Some(text) = self.state.draft() else {
            return Err(self.fail(DashboardError::NothingToPublish));
        };

        info!("Publishing post ({} chars)", text.len());
        self.adjust_pending(|p| p.publishes += 1);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = api.publish(&token, &text).await;
            let _ = tx.send(Completion::Published { outcome });
        });
        Ok(true)
    }

    /// Returns `false` for a blank term, which leaves the results untouched.
    pub fn search_jobs(&mut self, term: &str) -> Result<bool, DashboardError> {
        self.require(Workflow::JobSearch)?;
        Ok(self.start_search(term))
    }

    /// Ends the session. Persisted identity keys are cleared; the post history
    /// stays on the device. Safe to call repeatedly.
    pub fn logout(&mut self) -> Result<(), DashboardError> {
        if let Err(e) = self.session.logout() {
            return Err(self.fail(e.into()));
        }
        self.state.set_identity(None);
        self.state.set_stats(None);
        self.state.set_draft(None);
        self.search = SearchRunner::new();
        self.state.set_search(self.search.state());
        self.reported_posts = 0;
        self.jobs_mounted = false;
        self.active = ActiveView::Overview;
        Ok(())
    }

    pub fn dismiss_notice(&mut self) {
        if self.state.notice().is_some() {
            self.state.set_notice(None);
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Completion delivery
    // ────────────────────────────────────────────────────────────────────────

    /// Waits for the next finished workflow and applies it.
    pub async fn next_completion(&mut self) -> Option<CompletionKind> {
        let completion = self.rx.recv().await?;
        let kind = completion.kind();
        self.apply(completion);
        Some(kind)
    }

    /// Applies every completion that has already arrived, without waiting.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, completion: Completion) {
        debug!(
            kind = ?completion.kind(),
            ok = completion.succeeded(),
            active = %self.active,
            "Applying completion"
        );

        match completion {
            Completion::Analysis {
                origin,
                source,
                outcome,
            } => {
                self.adjust_pending(|p| p.analyses = p.analyses.saturating_sub(1));
                match outcome {
                    Ok(payload) => self.apply_analysis(&payload),
                    Err(e) => {
                        warn!("Profile analysis from {origin} failed: {e}");
                        self.notify_error(source.failure_message());
                    }
                }
            }
            Completion::PostGenerated { outcome } => {
                self.adjust_pending(|p| p.generations = p.generations.saturating_sub(1));
                match outcome {
                    Ok(text) => self.apply_generated(text),
                    Err(e) => {
                        warn!("Post generation failed: {e}");
                        self.notify_error(GENERATE_FAILED);
                    }
                }
            }
            Completion::Published { outcome } => {
                self.adjust_pending(|p| p.publishes = p.publishes.saturating_sub(1));
                match outcome {
                    Ok(()) => self.state.set_notice(Some(Notice::info(PUBLISHED))),
                    Err(e) => {
                        warn!("Publishing failed: {e}");
                        let message = e.detail().unwrap_or(PUBLISH_FAILED).to_string();
                        self.notify_error(message);
                    }
                }
            }
            Completion::JobsFound { term, outcome } => {
                debug!("Search for {term:?} resolved");
                let search = self.search.complete(outcome);
                self.state.set_search(search);
            }
        }
    }

    fn apply_analysis(&mut self, payload: &Value) {
        let previous = self.state.stats();
        let stats = reconcile(previous.as_deref(), payload, self.history.len());
        self.reported_posts = reported_posts(payload);
        info!(
            score = stats.strength_score,
            years = stats.years_experience,
            skills = stats.top_skills.len(),
            "Profile stats updated"
        );
        self.state.set_stats(Some(stats));
    }

    fn apply_generated(&mut self, text: String) {
        self.state.set_draft(Some(text.clone()));
        match self.history.append(text) {
            Ok(entries) => {
                self.state.set_history(entries);
                if let Some(stats) = self.state.stats() {
                    let updated = stats.with_history_len(self.history.len(), self.reported_posts);
                    self.state.set_stats(Some(updated));
                }
            }
            Err(e) => {
                error!("Could not persist post history: {e}");
                self.notify_error(HISTORY_SAVE_FAILED);
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Helpers
    // ────────────────────────────────────────────────────────────────────────

    fn require(&mut self, workflow: Workflow) -> Result<(), DashboardError> {
        if self.active.owns(workflow) {
            return Ok(());
        }
        let active = self.active;
        Err(self.fail(DashboardError::ViewNotActive { active, workflow }))
    }

    /// Surfaces `err` as the current notice and hands it back to the caller.
    fn fail(&mut self, err: DashboardError) -> DashboardError {
        self.notify_error(err.user_message());
        err
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.state.set_notice(Some(Notice::error(message)));
    }

    fn adjust_pending(&mut self, change: impl FnOnce(&mut Pending)) {
        let mut pending = self.state.pending();
        change(&mut pending);
        self.state.set_pending(pending);
    }

    fn start_analysis(&mut self, request: AnalysisRequest) -> bool {
        if request.is_empty() {
            debug!("Ignoring empty analysis request");
            return false;
        }
        let origin = self.active;
        let source = request.source();
        info!("Starting {source:?} analysis from {origin}");
        self.adjust_pending(|p| p.analyses += 1);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = request.run(api.as_ref()).await;
            let _ = tx.send(Completion::Analysis {
                origin,
                source,
                outcome,
            });
        });
        true
    }

    fn start_search(&mut self, term: &str) -> bool {
        let Some(term) = self.search.begin(term) else {
            return false;
        };
        self.state.set_search(self.search.state());

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = api.recommend_jobs(&term).await;
            let _ = tx.send(Completion::JobsFound { term, outcome });
        });
        true
    }
}
