//! The eligibility gate consulted when an assignment is approved.
//!
//! Only subjects in the lowest supervision tier may leave the facility for
//! work. The check is point-in-time: it runs once, at approval.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The facility's security classification of a subject.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClassificationTier {
  Minimum,
  Medium,
  Maximum,
}

impl ClassificationTier {
  pub fn qualifies_for_work_release(self) -> bool {
    matches!(self, Self::Minimum)
  }
}

/// Answer whether `subject_id`, currently classified `tier`, may be approved.
pub fn check(subject_id: Uuid, tier: ClassificationTier) -> Result<()> {
  if tier.qualifies_for_work_release() {
    Ok(())
  } else {
    Err(Error::IneligibleSubject { subject_id, tier })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_minimum_qualifies() {
    let subject = Uuid::new_v4();
    assert!(check(subject, ClassificationTier::Minimum).is_ok());

    for tier in [ClassificationTier::Medium, ClassificationTier::Maximum] {
      let err = check(subject, tier).unwrap_err();
      assert!(
        matches!(err, Error::IneligibleSubject { tier: t, .. } if t == tier)
      );
    }
  }

  #[test]
  fn tier_parses_from_lowercase() {
    assert_eq!(
      "medium".parse::<ClassificationTier>().unwrap(),
      ClassificationTier::Medium
    );
    assert!("MINIMUM".parse::<ClassificationTier>().is_err());
  }
}
