//! Employers vetted to host work-release placements.
//!
//! An employer is registered unapproved, becomes approved only once a
//! Memorandum of Understanding (MOU) is signed, and can be revoked at any
//! time. Whether it may take new placements is always computed against a
//! specific date, never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, actor::ActorId, validate};

const NAME_MAX: usize = 200;
const BUSINESS_TYPE_MAX: usize = 100;

// ─── Employer ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employer {
  pub employer_id:     Uuid,
  pub name:            String,
  /// e.g. "construction", "restaurant".
  pub business_type:   String,
  pub contact_name:    String,
  pub contact_phone:   String,
  pub contact_email:   Option<String>,
  pub address:         String,
  pub approved:        bool,
  pub approval_date:   Option<NaiveDate>,
  pub approved_by:     Option<ActorId>,
  pub mou_signed:      bool,
  /// `None` means the agreement does not expire.
  pub mou_expiry_date: Option<NaiveDate>,
  pub active:          bool,
  pub notes:           Option<String>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  /// Set when the employer is deleted; retired rows are kept for audit.
  pub retired_at:      Option<DateTime<Utc>>,
}

impl Employer {
  /// Build a new, unapproved employer from a validated draft.
  pub fn register(draft: NewEmployer, now: DateTime<Utc>) -> Result<Self> {
    draft.validate()?;
    Ok(Self {
      employer_id:     Uuid::new_v4(),
      name:            draft.name.trim().to_owned(),
      business_type:   draft.business_type.trim().to_owned(),
      contact_name:    draft.contact_name.trim().to_owned(),
      contact_phone:   draft.contact_phone,
      contact_email:   draft.contact_email,
      address:         draft.address,
      approved:        false,
      approval_date:   None,
      approved_by:     None,
      mou_signed:      false,
      mou_expiry_date: None,
      active:          true,
      notes:           draft.notes,
      created_at:      now,
      updated_at:      now,
      retired_at:      None,
    })
  }

  /// Signed and not yet past its expiry date. Expiring *on* `today` is
  /// still valid.
  pub fn is_mou_valid(&self, today: NaiveDate) -> bool {
    self.mou_signed && self.mou_expiry_date.is_none_or(|expiry| expiry >= today)
  }

  pub fn can_accept_subjects(&self, today: NaiveDate) -> bool {
    self.approved && self.active && self.is_mou_valid(today)
  }

  /// Like [`Self::can_accept_subjects`], but says why not.
  pub fn ensure_accepting(&self, today: NaiveDate) -> Result<()> {
    let reason = if !self.approved {
      "employer is not approved for work release"
    } else if !self.active {
      "employer is inactive"
    } else if !self.mou_signed {
      "MOU has not been signed"
    } else if !self.is_mou_valid(today) {
      "MOU has expired"
    } else {
      return Ok(());
    };
    Err(Error::IneligibleEmployer {
      employer_id: self.employer_id,
      reason:      reason.to_owned(),
    })
  }

  pub fn approve(
    &mut self,
    approval: MouApproval,
    approver: ActorId,
    today: NaiveDate,
    now: DateTime<Utc>,
  ) -> Result<()> {
    if !approval.mou_signed {
      return Err(Error::IneligibleEmployer {
        employer_id: self.employer_id,
        reason:      "MOU must be signed to approve employer".to_owned(),
      });
    }
    if let Some(expiry) = approval.mou_expiry_date
      && expiry <= today
    {
      return Err(Error::validation("MOU expiry date must be in the future"));
    }

    self.approved = true;
    self.approval_date = Some(today);
    self.approved_by = Some(approver);
    self.mou_signed = true;
    self.mou_expiry_date = approval.mou_expiry_date;
    if let Some(note) = approval.notes {
      validate::append_note(&mut self.notes, format!("[APPROVED] {today}: {note}"));
    }
    self.updated_at = now;
    Ok(())
  }

  /// Withdraw approval and stop accepting placements. Existing assignments
  /// are left alone.
  pub fn revoke(&mut self, reason: &str, today: NaiveDate, now: DateTime<Utc>) {
    self.approved = false;
    self.active = false;
    validate::append_note(&mut self.notes, format!("[REVOKED] {today}: {reason}"));
    self.updated_at = now;
  }

  pub fn apply_update(&mut self, update: EmployerUpdate, now: DateTime<Utc>) -> Result<()> {
    update.validate()?;
    let EmployerUpdate {
      name,
      business_type,
      contact_name,
      contact_phone,
      contact_email,
      address,
      notes,
      active,
    } = update;

    if let Some(v) = name { self.name = v.trim().to_owned(); }
    if let Some(v) = business_type { self.business_type = v.trim().to_owned(); }
    if let Some(v) = contact_name { self.contact_name = v.trim().to_owned(); }
    if let Some(v) = contact_phone { self.contact_phone = v; }
    if let Some(v) = contact_email { self.contact_email = Some(v); }
    if let Some(v) = address { self.address = v; }
    if let Some(v) = notes { self.notes = Some(v); }
    if let Some(v) = active { self.active = v; }
    self.updated_at = now;
    Ok(())
  }

}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::WorkReleaseStore::register_employer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployer {
  pub name:          String,
  pub business_type: String,
  pub contact_name:  String,
  pub contact_phone: String,
  pub contact_email: Option<String>,
  pub address:       String,
  pub notes:         Option<String>,
}

impl NewEmployer {
  pub fn validate(&self) -> Result<()> {
    validate::text("name", &self.name, NAME_MAX)?;
    validate::text("business_type", &self.business_type, BUSINESS_TYPE_MAX)?;
    validate::text("contact_name", &self.contact_name, NAME_MAX)?;
    validate::phone("contact_phone", &self.contact_phone)?;
    if let Some(email) = &self.contact_email {
      validate::email("contact_email", email)?;
    }
    validate::text("address", &self.address, usize::MAX)
  }
}

/// Partial update of descriptive fields. Approval and MOU state can only be
/// changed through approve/revoke.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployerUpdate {
  pub name:          Option<String>,
  pub business_type: Option<String>,
  pub contact_name:  Option<String>,
  pub contact_phone: Option<String>,
  pub contact_email: Option<String>,
  pub address:       Option<String>,
  pub notes:         Option<String>,
  pub active:        Option<bool>,
}

impl EmployerUpdate {
  fn validate(&self) -> Result<()> {
    if let Some(v) = &self.name { validate::text("name", v, NAME_MAX)?; }
    if let Some(v) = &self.business_type {
      validate::text("business_type", v, BUSINESS_TYPE_MAX)?;
    }
    if let Some(v) = &self.contact_name { validate::text("contact_name", v, NAME_MAX)?; }
    if let Some(v) = &self.contact_phone { validate::phone("contact_phone", v)?; }
    if let Some(v) = &self.contact_email { validate::email("contact_email", v)?; }
    if let Some(v) = &self.address { validate::text("address", v, usize::MAX)?; }
    Ok(())
  }
}

/// The MOU details recorded when an employer is approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouApproval {
  pub mou_signed:      bool,
  pub mou_expiry_date: Option<NaiveDate>,
  /// Appended to the employer's notes when present.
  pub notes:           Option<String>,
}

/// Parameters for [`crate::store::WorkReleaseStore::list_employers`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EmployerFilter {
  #[serde(default)]
  pub approved_only: bool,
  #[serde(default)]
  pub active_only:   bool,
}

impl EmployerFilter {
  pub fn matches(&self, employer: &Employer) -> bool {
    (!self.approved_only || employer.approved) && (!self.active_only || employer.active)
  }
}
