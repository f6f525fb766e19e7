//! Read-only reporting endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use uuid::Uuid;
use work_release_core::{
  directory::SubjectDirectory,
  engine::Engine,
  report::{DailyReport, ProgrammeStatistics, SubjectSummary},
  store::WorkReleaseStore,
};

use crate::{attendance::DateParams, error::ApiError};

/// `GET /statistics`
pub async fn statistics<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
) -> Result<Json<ProgrammeStatistics>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.statistics().await.map_err(ApiError::store)?))
}

/// `GET /subjects/:id/summary`
pub async fn subject_summary<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(subject_id): Path<Uuid>,
) -> Result<Json<SubjectSummary>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.subject_summary(subject_id).await.map_err(ApiError::store)?))
}

/// `GET /reports/daily[?date=..]`
pub async fn daily<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Query(params): Query<DateParams>,
) -> Result<Json<DailyReport>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  Ok(Json(engine.daily_report(params.date).await.map_err(ApiError::store)?))
}
