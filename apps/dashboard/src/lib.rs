//! Client-side core of a career dashboard: session capture, profile stats
//! normalization, post history, job search and the view coordinator that
//! ties them to the backend collaborator.

pub mod api_client;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod history;
pub mod search;
pub mod session;
pub mod stats;
pub mod storage;
pub mod view;
