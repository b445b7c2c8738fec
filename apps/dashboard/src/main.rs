use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dashboard::api_client::BackendClient;
use dashboard::config::Config;
use dashboard::coordinator::{ActiveView, ViewCoordinator};
use dashboard::session::MemoryLocation;
use dashboard::storage::FileStore;
use dashboard::view::{JobsModel, OverviewModel};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Durable device storage
    let store = Arc::new(FileStore::open(&config.storage_path)?);
    info!("Storage opened at {}", store.path().display());

    // Backend collaborator
    let api = Arc::new(BackendClient::new(config.api_base_url.clone(), config.http_timeout)?);
    info!("Backend client initialized ({})", api.base_url());

    let mut coordinator =
        ViewCoordinator::new(store, api).with_seed_query(config.default_job_query.clone());

    // Capture a sign-in redirect, or fall back to the stored session
    let mut location = MemoryLocation::new(config.app_location.clone());
    match coordinator.boot(&mut location)? {
        Some(identity) => info!("Signed in as {}", identity.display_name),
        None => warn!("No session found; publishing is disabled until sign-in"),
    }

    let overview = OverviewModel::from_state(coordinator.state());
    info!(
        "Welcome back, {} | experience {} | strength {} | {} posts",
        overview.greeting_name, overview.experience, overview.strength, overview.posts_created
    );

    // Mounting the job board issues the seed search
    coordinator.select(ActiveView::Jobs);
    if coordinator.next_completion().await.is_some() {
        let jobs = JobsModel::from_state(coordinator.state());
        info!("{} listings for {:?}", jobs.listings.len(), jobs.query);
        for job in jobs.listings.iter() {
            info!("  {} @ {} ({}, {})", job.title, job.company, job.location, job.platform);
        }
    }

    if let Some(notice) = coordinator.state().notice() {
        warn!("{}", notice.message);
    }

    Ok(())
}
