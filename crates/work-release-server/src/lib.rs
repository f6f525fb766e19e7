//! Server wiring for the work-release engine: configuration, the HTTP
//! subject directory, and the application router.

pub mod directory;

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use work_release_core::{
  directory::SubjectDirectory,
  engine::Engine,
  store::WorkReleaseStore,
};

pub use directory::HttpDirectory;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `work-release.toml` and
/// `WORK_RELEASE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                   String,
  pub port:                   u16,
  pub store_path:             PathBuf,
  /// Base URL of the subject directory service.
  pub directory_url:          String,
  #[serde(default = "default_directory_timeout")]
  pub directory_timeout_secs: u64,
}

fn default_directory_timeout() -> u64 { 10 }

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with request tracing applied.
pub fn app<S, D>(engine: Arc<Engine<S, D>>) -> Router
where
  S: WorkReleaseStore + 'static,
  D: SubjectDirectory + 'static,
{
  work_release_api::api_router(engine).layer(TraceLayer::new_for_http())
}
