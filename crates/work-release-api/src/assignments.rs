//! Handlers for `/assignments` endpoints.
//!
//! Every transition is its own `POST` so that an illegal move comes back as
//! a 409 naming the current status. `approve` needs `X-Actor-Id`;
//! `suspend` and `terminate` take `{"reason":"..."}`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use work_release_core::{
  assignment::{Assignment, AssignmentFilter, AssignmentUpdate, NewAssignment},
  attendance::AttendanceEntry,
  directory::SubjectDirectory,
  engine::Engine,
  report::EligibilityFlag,
  store::WorkReleaseStore,
};

use crate::{ReasonBody, actor::Actor, error::ApiError};

type Reply<T> = Result<Json<T>, ApiError>;

/// `GET /assignments[?subject_id=..&employer_id=..&status=..]`
pub async fn list<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Query(filter): Query<AssignmentFilter>,
) -> Reply<Vec<Assignment>>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.list_assignments(filter).await.map_err(ApiError::store)?))
}

/// `GET /assignments/pending`
pub async fn pending<S, D>(State(engine): State<Arc<Engine<S, D>>>) -> Reply<Vec<Assignment>>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.pending_approvals().await.map_err(ApiError::store)?))
}

/// `GET /assignments/active`
pub async fn active<S, D>(State(engine): State<Arc<Engine<S, D>>>) -> Reply<Vec<Assignment>>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.active_assignments().await.map_err(ApiError::store)?))
}

/// `GET /assignments/eligibility-flags`
pub async fn eligibility_flags<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
) -> Reply<Vec<EligibilityFlag>>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.eligibility_flags().await.map_err(ApiError::store)?))
}

/// `POST /assignments`. `X-Actor-Id` is recorded as the creator when sent.
pub async fn propose<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  actor: Option<Actor>,
  Json(draft): Json<NewAssignment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let created_by = actor.map(|Actor(id)| id);
  let assignment = engine.propose(draft, created_by).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(assignment)))
}

/// `GET /assignments/:id`
pub async fn get_one<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.get_assignment(id).await.map_err(ApiError::store)?))
}

/// `PATCH /assignments/:id`
pub async fn update<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Json(update): Json<AssignmentUpdate>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.update_assignment(id, update).await.map_err(ApiError::store)?))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

pub async fn approve<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Actor(approver): Actor,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.approve(id, approver).await.map_err(ApiError::store)?))
}

pub async fn activate<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.activate(id).await.map_err(ApiError::store)?))
}

pub async fn suspend<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ReasonBody>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.suspend(id, body.reason).await.map_err(ApiError::store)?))
}

pub async fn reinstate<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.reinstate(id).await.map_err(ApiError::store)?))
}

pub async fn complete<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.complete(id).await.map_err(ApiError::store)?))
}

pub async fn terminate<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ReasonBody>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.terminate(id, body.reason).await.map_err(ApiError::store)?))
}

pub async fn retire<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Reply<Assignment>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.retire_assignment(id).await.map_err(ApiError::store)?))
}

// ─── Ledger ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LedgerParams {
  pub limit: Option<usize>,
}

/// `GET /assignments/:id/attendance[?limit=N]`, newest first.
pub async fn attendance<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<LedgerParams>,
) -> Reply<Vec<AttendanceEntry>>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let entries = engine
    .entries_for_assignment(id, params.limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}
