//! Handlers for `/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/attendance` | Body: [`NewDeparture`] |
//! | `GET`  | `/attendance[?date=YYYY-MM-DD]` | Defaults to today |
//! | `GET`  | `/attendance/unresolved[?as_of=YYYY-MM-DD]` | Oldest first |
//! | `GET`  | `/attendance/:id` | |
//! | `POST` | `/attendance/:id/return` | `{"actual_return_time":"17:10:00"}` |
//! | `POST` | `/attendance/:id/no-return` | May suspend the assignment |
//! | `POST` | `/attendance/:id/excused` | `{"reason":"..."}` |
//! | `POST` | `/attendance/:id/notes` | `{"note":"..."}` |
//!
//! Resolutions need `X-Actor-Id`, recorded as the verifying officer.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;
use work_release_core::{
  attendance::{AttendanceEntry, NewDeparture, ResolvedEntry},
  directory::SubjectDirectory,
  engine::Engine,
  store::WorkReleaseStore,
};

use crate::{ReasonBody, actor::Actor, error::ApiError};

/// `POST /attendance`
pub async fn depart<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Json(departure): Json<NewDeparture>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let entry = engine.log_departure(departure).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Deserialize)]
pub struct DateParams {
  pub date: Option<NaiveDate>,
}

/// `GET /attendance[?date=..]`
pub async fn for_date<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Query(params): Query<DateParams>,
) -> Result<Json<Vec<AttendanceEntry>>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let date = params.date.unwrap_or_else(|| engine.today());
  let entries = engine.entries_for_date(date).await.map_err(ApiError::store)?;
  Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct UnresolvedParams {
  pub as_of: Option<NaiveDate>,
}

/// `GET /attendance/unresolved[?as_of=..]`
pub async fn unresolved<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Query(params): Query<UnresolvedParams>,
) -> Result<Json<Vec<AttendanceEntry>>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let entries = engine
    .list_unresolved(params.as_of)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}

/// `GET /attendance/:id`
pub async fn get_one<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AttendanceEntry>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.get_entry(id).await.map_err(ApiError::store)?))
}

// ─── Resolutions ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReturnBody {
  pub actual_return_time: NaiveTime,
  pub notes:              Option<String>,
}

/// `POST /attendance/:id/return`
pub async fn returned<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Actor(verifier): Actor,
  Json(body): Json<ReturnBody>,
) -> Result<Json<AttendanceEntry>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let entry = engine
    .log_return(id, body.actual_return_time, body.notes, verifier)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct NoReturnBody {
  pub notes: Option<String>,
}

/// `POST /attendance/:id/no-return`. The response carries the suspended
/// assignment when the no-show triggered one.
pub async fn no_return<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Actor(verifier): Actor,
  body: Option<Json<NoReturnBody>>,
) -> Result<Json<ResolvedEntry>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let notes = body.and_then(|Json(body)| body.notes);
  let resolved = engine
    .mark_no_return(id, notes, verifier)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(resolved))
}

/// `POST /attendance/:id/excused`
pub async fn excused<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Actor(verifier): Actor,
  Json(body): Json<ReasonBody>,
) -> Result<Json<AttendanceEntry>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let entry = engine
    .mark_excused(id, body.reason, verifier)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  pub note: String,
}

/// `POST /attendance/:id/notes`
pub async fn note<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NoteBody>,
) -> Result<Json<AttendanceEntry>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let entry = engine
    .append_entry_note(id, body.note)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entry))
}
