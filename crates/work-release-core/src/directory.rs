//! The subject directory: the external system of record for subjects and
//! their current security classification.
//!
//! The engine never stores classifications; it asks the directory once per
//! approval, before opening the write transaction.

use std::{
  collections::HashMap,
  future::Future,
  sync::{PoisonError, RwLock},
};

use uuid::Uuid;

use crate::eligibility::ClassificationTier;

pub type DirectoryError = Box<dyn std::error::Error + Send + Sync>;

pub trait SubjectDirectory: Send + Sync {
  /// The subject's classification right now, or `None` if the directory
  /// does not know the subject.
  fn current_classification(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Option<ClassificationTier>, DirectoryError>>
  + Send
  + '_;
}

/// A directory held in process memory. Used by tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
  tiers: RwLock<HashMap<Uuid, ClassificationTier>>,
}

impl InMemoryDirectory {
  pub fn new() -> Self { Self::default() }

  pub fn set(&self, subject_id: Uuid, tier: ClassificationTier) {
    self
      .tiers
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(subject_id, tier);
  }

  pub fn remove(&self, subject_id: Uuid) {
    self
      .tiers
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&subject_id);
  }
}

impl SubjectDirectory for InMemoryDirectory {
  async fn current_classification(
    &self,
    subject_id: Uuid,
  ) -> Result<Option<ClassificationTier>, DirectoryError> {
    Ok(
      self
        .tiers
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&subject_id)
        .copied(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn reflects_latest_classification() {
    let dir = InMemoryDirectory::new();
    let subject = Uuid::new_v4();
    assert_eq!(dir.current_classification(subject).await.unwrap(), None);

    dir.set(subject, ClassificationTier::Minimum);
    dir.set(subject, ClassificationTier::Maximum);
    assert_eq!(
      dir.current_classification(subject).await.unwrap(),
      Some(ClassificationTier::Maximum)
    );

    dir.remove(subject);
    assert_eq!(dir.current_classification(subject).await.unwrap(), None);
  }
}
