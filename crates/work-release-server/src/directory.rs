//! Subject directory client over HTTP.
//!
//! `GET {base}/subjects/{id}/classification` answers `{"tier":"minimum"}`;
//! a 404 means the directory does not know the subject.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;
use work_release_core::{
  directory::{DirectoryError, SubjectDirectory},
  eligibility::ClassificationTier,
};

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpDirectory {
  client:   Client,
  base_url: String,
}

#[derive(Deserialize)]
struct Classification {
  tier: ClassificationTier,
}

impl HttpDirectory {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, subject_id: Uuid) -> String {
    format!(
      "{}/subjects/{subject_id}/classification",
      self.base_url.trim_end_matches('/')
    )
  }
}

impl SubjectDirectory for HttpDirectory {
  async fn current_classification(
    &self,
    subject_id: Uuid,
  ) -> Result<Option<ClassificationTier>, DirectoryError> {
    let resp = self.client.get(self.url(subject_id)).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let body: Classification = resp.error_for_status()?.json().await?;
    Ok(Some(body.tier))
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    Json,
    Router,
    extract::Path,
    http::StatusCode as AxumStatus,
    response::{IntoResponse, Response},
    routing::get,
  };
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  const KNOWN: Uuid = Uuid::from_u128(1);
  const BROKEN: Uuid = Uuid::from_u128(2);

  async fn classification(Path(id): Path<Uuid>) -> Response {
    if id == KNOWN {
      Json(json!({ "tier": "medium" })).into_response()
    } else if id == BROKEN {
      AxumStatus::INTERNAL_SERVER_ERROR.into_response()
    } else {
      AxumStatus::NOT_FOUND.into_response()
    }
  }

  /// Serve a fake directory on an ephemeral port and return its base URL.
  async fn fake_directory() -> String {
    let app = Router::new().route("/subjects/{id}/classification", get(classification));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}/")
  }

  fn client(base: String) -> HttpDirectory {
    HttpDirectory::new(base, Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn known_subject() {
    let directory = client(fake_directory().await);
    let tier = directory.current_classification(KNOWN).await.unwrap();
    assert_eq!(tier, Some(ClassificationTier::Medium));
  }

  #[tokio::test]
  async fn unknown_subject_is_none() {
    let directory = client(fake_directory().await);
    let tier = directory.current_classification(Uuid::new_v4()).await.unwrap();
    assert_eq!(tier, None);
  }

  #[tokio::test]
  async fn server_failure_is_an_error() {
    let directory = client(fake_directory().await);
    assert!(directory.current_classification(BROKEN).await.is_err());
  }
}
