//! Error type for `work-release-store-sqlite`.

use thiserror::Error;
use work_release_core::DomainError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] work_release_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column could not be turned back into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

impl DomainError for Error {
  fn domain(&self) -> Option<&work_release_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
