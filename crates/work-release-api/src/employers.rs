//! Handlers for `/employers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/employers` | Optional `?approved_only=true&active_only=true` |
//! | `POST`   | `/employers` | Body: [`NewEmployer`] |
//! | `GET`    | `/employers/accepting` | Approved, active, MOU valid today |
//! | `GET`    | `/employers/:id` | 404 if not found or retired |
//! | `PATCH`  | `/employers/:id` | Body: [`EmployerUpdate`] |
//! | `DELETE` | `/employers/:id` | 409 while an assignment is open |
//! | `POST`   | `/employers/:id/approve` | Body: [`MouApproval`]; needs `X-Actor-Id` |
//! | `POST`   | `/employers/:id/revoke` | Body: `{"reason":"..."}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use uuid::Uuid;
use work_release_core::{
  directory::SubjectDirectory,
  employer::{Employer, EmployerFilter, EmployerUpdate, MouApproval, NewEmployer},
  engine::Engine,
  store::WorkReleaseStore,
};

use crate::{ReasonBody, actor::Actor, error::ApiError};

/// `GET /employers[?approved_only=..&active_only=..]`
pub async fn list<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Query(filter): Query<EmployerFilter>,
) -> Result<Json<Vec<Employer>>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let employers = engine.list_employers(filter).await.map_err(ApiError::store)?;
  Ok(Json(employers))
}

/// `GET /employers/accepting`
pub async fn accepting<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
) -> Result<Json<Vec<Employer>>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let employers = engine.list_accepting().await.map_err(ApiError::store)?;
  Ok(Json(employers))
}

/// `POST /employers`
pub async fn register<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Json(draft): Json<NewEmployer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let employer = engine.register_employer(draft).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(employer)))
}

/// `GET /employers/:id`
pub async fn get_one<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Employer>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let employer = engine.get_employer(id).await.map_err(ApiError::store)?;
  Ok(Json(employer))
}

/// `PATCH /employers/:id`
pub async fn update<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Json(update): Json<EmployerUpdate>,
) -> Result<Json<Employer>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let employer = engine.update_employer(id, update).await.map_err(ApiError::store)?;
  Ok(Json(employer))
}

/// `DELETE /employers/:id`
pub async fn delete<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  engine.delete_employer(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /employers/:id/approve`
pub async fn approve<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Actor(approver): Actor,
  Json(approval): Json<MouApproval>,
) -> Result<Json<Employer>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let employer = engine
    .approve_employer(id, approval, approver)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(employer))
}

/// `POST /employers/:id/revoke`
pub async fn revoke<S, D>(
  State(engine): State<Arc<Engine<S, D>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ReasonBody>,
) -> Result<Json<Employer>, ApiError>
where
  S: WorkReleaseStore,
  D: SubjectDirectory,
{
  let employer = engine
    .revoke_employer(id, body.reason)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(employer))
}
