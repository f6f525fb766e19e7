//! Error types for `work-release-core`.
//!
//! Every variant except [`Error::Directory`] is a caller-correctable
//! validation failure raised before anything is committed.

use thiserror::Error;
use uuid::Uuid;

use crate::eligibility::ClassificationTier;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Entity {
  Employer,
  Assignment,
  AttendanceEntry,
  Subject,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: Entity, id: Uuid },

  #[error("cannot {requested} {entity} in state {from}")]
  InvalidTransition {
    entity:    Entity,
    from:      &'static str,
    requested: &'static str,
  },

  #[error("employer {employer_id} cannot accept subjects: {reason}")]
  IneligibleEmployer { employer_id: Uuid, reason: String },

  #[error(
    "subject {subject_id} is not eligible for work release: classified {tier}"
  )]
  IneligibleSubject {
    subject_id: Uuid,
    tier:       ClassificationTier,
  },

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("assignment {assignment_id} is not active (status {status})")]
  AssignmentNotActive {
    assignment_id: Uuid,
    status:        &'static str,
  },

  #[error("invalid input: {0}")]
  Validation(String),

  #[error("subject directory error: {0}")]
  Directory(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: Entity, id: Uuid) -> Self {
    Self::NotFound { entity, id }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  /// The flat classification used by outer layers to pick a response code.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
      Self::IneligibleEmployer { .. } => ErrorKind::IneligibleEmployer,
      Self::IneligibleSubject { .. } => ErrorKind::IneligibleSubject,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::AssignmentNotActive { .. } => ErrorKind::AssignmentNotActive,
      Self::Validation(_) => ErrorKind::Validation,
      Self::Directory(_) => ErrorKind::Directory,
    }
  }
}

/// Payload-free mirror of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  InvalidTransition,
  IneligibleEmployer,
  IneligibleSubject,
  Conflict,
  AssignmentNotActive,
  Validation,
  Directory,
}

/// Implemented by backend error types that may wrap a domain [`Error`].
///
/// Outer layers are generic over the store, so this is how they tell a
/// rejected request apart from an infrastructure failure.
pub trait DomainError {
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
