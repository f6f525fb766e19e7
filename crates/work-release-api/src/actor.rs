//! The acting user, read from the `X-Actor-Id` header.
//!
//! Authentication happens upstream; this layer only carries the identity
//! through to the records it stamps.

use axum::{
  extract::{FromRequestParts, OptionalFromRequestParts},
  http::request::Parts,
};
use uuid::Uuid;
use work_release_core::actor::ActorId;

use crate::error::ApiError;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Required acting user. Rejects the request with 400 when the header is
/// absent or not a UUID.
pub struct Actor(pub ActorId);

fn parse(parts: &Parts) -> Result<Option<ActorId>, ApiError> {
  let Some(value) = parts.headers.get(ACTOR_HEADER) else {
    return Ok(None);
  };
  value
    .to_str()
    .ok()
    .and_then(|s| Uuid::parse_str(s.trim()).ok())
    .map(|id| Some(ActorId(id)))
    .ok_or_else(|| ApiError::BadRequest("X-Actor-Id must be a UUID".into()))
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parse(parts)?
      .map(Actor)
      .ok_or_else(|| ApiError::BadRequest("missing X-Actor-Id header".into()))
  }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for Actor {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Option<Self>, Self::Rejection> {
    Ok(parse(parts)?.map(Actor))
  }
}
