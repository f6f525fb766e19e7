//! JSON REST API for the work-release engine.
//!
//! Exposes an axum [`Router`] backed by an [`Engine`] over any
//! [`WorkReleaseStore`] and [`SubjectDirectory`]. Authentication, TLS, and
//! transport concerns are the caller's responsibility; the acting user
//! arrives in the `X-Actor-Id` header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", work_release_api::api_router(engine.clone()))
//! ```

pub mod actor;
pub mod assignments;
pub mod attendance;
pub mod employers;
pub mod error;
pub mod reports;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use work_release_core::{
  directory::SubjectDirectory,
  engine::Engine,
  store::WorkReleaseStore,
};

pub use error::ApiError;

/// Body shared by every endpoint that only needs a free-text reason.
#[derive(Debug, Deserialize)]
pub struct ReasonBody {
  pub reason: String,
}

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, D>(engine: Arc<Engine<S, D>>) -> Router<()>
where
  S: WorkReleaseStore + 'static,
  D: SubjectDirectory + 'static,
{
  Router::new()
    // Employers
    .route(
      "/employers",
      get(employers::list::<S, D>).post(employers::register::<S, D>),
    )
    .route("/employers/accepting", get(employers::accepting::<S, D>))
    .route(
      "/employers/{id}",
      get(employers::get_one::<S, D>)
        .patch(employers::update::<S, D>)
        .delete(employers::delete::<S, D>),
    )
    .route("/employers/{id}/approve", post(employers::approve::<S, D>))
    .route("/employers/{id}/revoke", post(employers::revoke::<S, D>))
    // Assignments
    .route(
      "/assignments",
      get(assignments::list::<S, D>).post(assignments::propose::<S, D>),
    )
    .route("/assignments/pending", get(assignments::pending::<S, D>))
    .route("/assignments/active", get(assignments::active::<S, D>))
    .route(
      "/assignments/eligibility-flags",
      get(assignments::eligibility_flags::<S, D>),
    )
    .route(
      "/assignments/{id}",
      get(assignments::get_one::<S, D>).patch(assignments::update::<S, D>),
    )
    .route("/assignments/{id}/approve", post(assignments::approve::<S, D>))
    .route("/assignments/{id}/activate", post(assignments::activate::<S, D>))
    .route("/assignments/{id}/suspend", post(assignments::suspend::<S, D>))
    .route("/assignments/{id}/reinstate", post(assignments::reinstate::<S, D>))
    .route("/assignments/{id}/complete", post(assignments::complete::<S, D>))
    .route("/assignments/{id}/terminate", post(assignments::terminate::<S, D>))
    .route("/assignments/{id}/retire", post(assignments::retire::<S, D>))
    .route("/assignments/{id}/attendance", get(assignments::attendance::<S, D>))
    // Attendance
    .route(
      "/attendance",
      get(attendance::for_date::<S, D>).post(attendance::depart::<S, D>),
    )
    .route("/attendance/unresolved", get(attendance::unresolved::<S, D>))
    .route("/attendance/{id}", get(attendance::get_one::<S, D>))
    .route("/attendance/{id}/return", post(attendance::returned::<S, D>))
    .route("/attendance/{id}/no-return", post(attendance::no_return::<S, D>))
    .route("/attendance/{id}/excused", post(attendance::excused::<S, D>))
    .route("/attendance/{id}/notes", post(attendance::note::<S, D>))
    // Reports
    .route("/subjects/{id}/summary", get(reports::subject_summary::<S, D>))
    .route("/statistics", get(reports::statistics::<S, D>))
    .route("/reports/daily", get(reports::daily::<S, D>))
    .with_state(engine)
}
