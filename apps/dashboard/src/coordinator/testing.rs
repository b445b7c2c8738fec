//! Scripted collaborator for coordinator tests.
//!
//! Every call blocks on a oneshot gate keyed by its main argument (file name,
//! URL, topic, post text or search term). Tests release gates in whatever
//! order they need, which makes completion order deterministic. Calls with no
//! scripted gate fail immediately.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::api_client::{ApiError, Collaborator, Tone, Upload};
use crate::search::JobListing;

type Gate<T> = oneshot::Receiver<Result<T, ApiError>>;
pub type Release<T> = oneshot::Sender<Result<T, ApiError>>;
type Gates<T> = Mutex<HashMap<String, Gate<T>>>;

#[derive(Default)]
pub struct ScriptedCollaborator {
    analyses: Gates<Value>,
    posts: Gates<String>,
    publishes: Gates<()>,
    jobs: Gates<Vec<JobListing>>,
    calls: Mutex<Vec<String>>,
}

fn script<T>(gates: &Gates<T>, key: &str) -> Release<T> {
    let (tx, rx) = oneshot::channel();
    gates.lock().unwrap().insert(key.to_string(), rx);
    tx
}

async fn wait<T>(gates: &Gates<T>, key: &str) -> Result<T, ApiError> {
    let gate = gates.lock().unwrap().remove(key);
    match gate {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(ApiError::Shape("script dropped".to_string()))),
        None => Err(ApiError::Shape(format!("unscripted call: {key}"))),
    }
}

impl ScriptedCollaborator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_analysis(&self, key: &str) -> Release<Value> {
        script(&self.analyses, key)
    }

    pub fn script_post(&self, topic: &str) -> Release<String> {
        script(&self.posts, topic)
    }

    pub fn script_publish(&self, text: &str) -> Release<()> {
        script(&self.publishes, text)
    }

    pub fn script_jobs(&self, term: &str) -> Release<Vec<JobListing>> {
        script(&self.jobs, term)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Collaborator for ScriptedCollaborator {
    async fn analyze_profile_pdf(&self, upload: Upload) -> Result<Value, ApiError> {
        self.record(format!("analyze_profile_pdf:{}", upload.file_name));
        wait(&self.analyses, &upload.file_name).await
    }

    async fn analyze_linkedin(&self, upload: Upload) -> Result<Value, ApiError> {
        self.record(format!("analyze_linkedin:{}", upload.file_name));
        wait(&self.analyses, &upload.file_name).await
    }

    async fn scrape_url(&self, url: &str) -> Result<Value, ApiError> {
        self.record(format!("scrape_url:{url}"));
        wait(&self.analyses, url).await
    }

    async fn generate_post(&self, topic: &str, tone: Tone) -> Result<String, ApiError> {
        self.record(format!("generate_post:{topic}:{tone}"));
        wait(&self.posts, topic).await
    }

    async fn publish(&self, token: &str, text: &str) -> Result<(), ApiError> {
        self.record(format!("publish:{token}"));
        wait(&self.publishes, text).await
    }

    async fn recommend_jobs(&self, term: &str) -> Result<Vec<JobListing>, ApiError> {
        self.record(format!("recommend_jobs:{term}"));
        wait(&self.jobs, term).await
    }
}

pub fn listing(id: &str, title: &str) -> JobListing {
    JobListing {
        id: id.to_string(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        platform: "LinkedIn".to_string(),
        link: format!("https://jobs.example/{id}"),
    }
}
