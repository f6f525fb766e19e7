//! Work-release assignments and their lifecycle.
//!
//! ```text
//! PENDING_APPROVAL ──approve──▶ APPROVED ──activate──▶ ACTIVE ──complete──▶ COMPLETED
//!                                                      │  ▲
//!                                              suspend │  │ reinstate
//!                                                      ▼  │
//!                                                    SUSPENDED
//!                                   ACTIVE | SUSPENDED ──terminate──▶ TERMINATED
//! ```
//!
//! Every status change goes through [`Assignment::apply`], which consults
//! [`AssignmentStatus::next`]. Anything not in that table is rejected with
//! [`Error::InvalidTransition`] and leaves the record untouched.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Entity,
  Error,
  Result,
  actor::ActorId,
  eligibility::{self, ClassificationTier},
  employer::Employer,
  schedule::WorkSchedule,
  validate,
};

const TITLE_MAX: usize = 200;

// ─── Status ──────────────────────────────────────────────────────────────────

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
  strum::IntoStaticStr,
  strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
  PendingApproval,
  Approved,
  Active,
  Suspended,
  Completed,
  Terminated,
}

impl AssignmentStatus {
  /// The statuses that count towards the one-open-assignment-per-subject
  /// limit.
  pub const NON_TERMINAL: [Self; 4] = [
    Self::PendingApproval,
    Self::Approved,
    Self::Active,
    Self::Suspended,
  ];

  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Completed | Self::Terminated)
  }

  /// The transition table. `None` means the move is illegal.
  pub fn next(self, command: &AssignmentCommand) -> Option<Self> {
    use AssignmentCommand as C;
    match (self, command) {
      (Self::PendingApproval, C::Approve { .. }) => Some(Self::Approved),
      (Self::Approved, C::Activate) => Some(Self::Active),
      (Self::Active, C::Suspend { .. }) => Some(Self::Suspended),
      (Self::Suspended, C::Reinstate) => Some(Self::Active),
      (Self::Active, C::Complete) => Some(Self::Completed),
      (Self::Active | Self::Suspended, C::Terminate { .. }) => {
        Some(Self::Terminated)
      }
      _ => None,
    }
  }
}

// ─── Commands ────────────────────────────────────────────────────────────────

/// A requested status change, with whatever the change needs to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentCommand {
  /// `tier` is the subject's classification as read from the directory
  /// just before the transaction opened.
  Approve {
    approver: ActorId,
    tier:     ClassificationTier,
  },
  Activate,
  Suspend {
    reason:    String,
    /// Raised by the attendance ledger rather than a person.
    automatic: bool,
  },
  Reinstate,
  Complete,
  Terminate { reason: String },
}

impl AssignmentCommand {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Approve { .. } => "approve",
      Self::Activate => "activate",
      Self::Suspend { .. } => "suspend",
      Self::Reinstate => "reinstate",
      Self::Complete => "complete",
      Self::Terminate { .. } => "terminate",
    }
  }
}

// ─── Assignment ──────────────────────────────────────────────────────────────

/// One subject's placement at one employer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
  pub assignment_id:      Uuid,
  pub subject_id:         Uuid,
  pub employer_id:        Uuid,
  pub position_title:     String,
  pub start_date:         NaiveDate,
  /// Open-ended while `None`; stamped on completion or termination.
  pub end_date:           Option<NaiveDate>,
  pub status:             AssignmentStatus,
  pub hourly_rate:        Option<Decimal>,
  pub work_schedule:      WorkSchedule,
  pub supervisor_name:    String,
  pub supervisor_phone:   String,
  pub approved_by:        Option<ActorId>,
  pub approval_date:      Option<NaiveDate>,
  pub termination_reason: Option<String>,
  pub notes:              Option<String>,
  pub created_by:         Option<ActorId>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
  pub retired_at:         Option<DateTime<Utc>>,
}

impl Assignment {
  /// Build a `PENDING_APPROVAL` assignment. Subject eligibility is not
  /// checked here; that happens at approval.
  pub fn propose(
    draft: NewAssignment,
    employer: &Employer,
    created_by: Option<ActorId>,
    today: NaiveDate,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    draft.validate(today)?;
    if draft.employer_id != employer.employer_id {
      return Err(Error::validation("employer does not match the proposal"));
    }
    employer.ensure_accepting(today)?;

    Ok(Self {
      assignment_id:      Uuid::new_v4(),
      subject_id:         draft.subject_id,
      employer_id:        draft.employer_id,
      position_title:     draft.position_title.trim().to_owned(),
      start_date:         draft.start_date,
      end_date:           draft.end_date,
      status:             AssignmentStatus::PendingApproval,
      hourly_rate:        draft.hourly_rate,
      work_schedule:      draft.work_schedule,
      supervisor_name:    draft.supervisor_name.trim().to_owned(),
      supervisor_phone:   draft.supervisor_phone,
      approved_by:        None,
      approval_date:      None,
      termination_reason: None,
      notes:              draft.notes,
      created_by,
      created_at:         now,
      updated_at:         now,
      retired_at:         None,
    })
  }

  /// Apply `command`, checking the transition table first. `employer` is
  /// the assignment's employer as currently stored; it is only consulted
  /// on approval.
  pub fn apply(
    &mut self,
    command: AssignmentCommand,
    employer: &Employer,
    today: NaiveDate,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let next = self.status.next(&command).ok_or_else(|| {
      Error::InvalidTransition {
        entity:    Entity::Assignment,
        from:      self.status.into(),
        requested: command.name(),
      }
    })?;

    match command {
      AssignmentCommand::Approve { approver, tier } => {
        employer.ensure_accepting(today)?;
        eligibility::check(self.subject_id, tier)?;
        self.approved_by = Some(approver);
        self.approval_date = Some(today);
      }
      AssignmentCommand::Activate => {}
      AssignmentCommand::Suspend { reason, automatic } => {
        let tag = if automatic { "AUTO-SUSPENDED" } else { "SUSPENDED" };
        validate::append_note(&mut self.notes, format!("[{tag}] {today}: {reason}"));
      }
      AssignmentCommand::Reinstate => {
        validate::append_note(&mut self.notes, format!("[REINSTATED] {today}"));
      }
      AssignmentCommand::Complete => {
        self.end_date = Some(today);
      }
      AssignmentCommand::Terminate { reason } => {
        self.end_date = Some(today);
        self.termination_reason = Some(reason);
      }
    }

    self.status = next;
    self.updated_at = now;
    Ok(())
  }

  /// Edit descriptive fields. Closed assignments are frozen.
  pub fn apply_update(
    &mut self,
    update: AssignmentUpdate,
    now: DateTime<Utc>,
  ) -> Result<()> {
    if self.status.is_terminal() {
      return Err(Error::Conflict(format!(
        "assignment {} is {} and can no longer be edited",
        self.assignment_id, self.status
      )));
    }
    update.validate(self.start_date)?;

    let AssignmentUpdate {
      position_title,
      end_date,
      hourly_rate,
      work_schedule,
      supervisor_name,
      supervisor_phone,
      notes,
    } = update;

    if let Some(v) = position_title { self.position_title = v.trim().to_owned(); }
    if let Some(v) = end_date { self.end_date = Some(v); }
    if let Some(v) = hourly_rate { self.hourly_rate = Some(v); }
    if let Some(v) = work_schedule { self.work_schedule = v; }
    if let Some(v) = supervisor_name { self.supervisor_name = v.trim().to_owned(); }
    if let Some(v) = supervisor_phone { self.supervisor_phone = v; }
    if let Some(v) = notes { self.notes = Some(v); }
    self.updated_at = now;
    Ok(())
  }

  /// Soft-retire a closed assignment. Open ones must be completed or
  /// terminated first.
  pub fn retire(&mut self, now: DateTime<Utc>) -> Result<()> {
    if !self.status.is_terminal() {
      return Err(Error::Conflict(format!(
        "assignment {} is {}; only completed or terminated assignments can be retired",
        self.assignment_id, self.status
      )));
    }
    if self.retired_at.is_some() {
      return Err(Error::Conflict(format!(
        "assignment {} is already retired",
        self.assignment_id
      )));
    }
    self.retired_at = Some(now);
    self.updated_at = now;
    Ok(())
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::WorkReleaseStore::propose_assignment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignment {
  pub subject_id:       Uuid,
  pub employer_id:      Uuid,
  pub position_title:   String,
  pub start_date:       NaiveDate,
  pub end_date:         Option<NaiveDate>,
  pub hourly_rate:      Option<Decimal>,
  #[serde(default)]
  pub work_schedule:    WorkSchedule,
  pub supervisor_name:  String,
  pub supervisor_phone: String,
  pub notes:            Option<String>,
}

impl NewAssignment {
  pub fn validate(&self, today: NaiveDate) -> Result<()> {
    validate::text("position_title", &self.position_title, TITLE_MAX)?;
    validate::text("supervisor_name", &self.supervisor_name, TITLE_MAX)?;
    validate::phone("supervisor_phone", &self.supervisor_phone)?;
    if self.start_date < today {
      return Err(Error::validation("start date cannot be in the past"));
    }
    check_end_date(self.start_date, self.end_date)?;
    check_rate(self.hourly_rate)?;
    self.work_schedule.validate()
  }
}

/// Partial update of an open assignment's details. Status is never part of
/// an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentUpdate {
  pub position_title:   Option<String>,
  pub end_date:         Option<NaiveDate>,
  pub hourly_rate:      Option<Decimal>,
  pub work_schedule:    Option<WorkSchedule>,
  pub supervisor_name:  Option<String>,
  pub supervisor_phone: Option<String>,
  pub notes:            Option<String>,
}

impl AssignmentUpdate {
  fn validate(&self, start_date: NaiveDate) -> Result<()> {
    if let Some(v) = &self.position_title {
      validate::text("position_title", v, TITLE_MAX)?;
    }
    if let Some(v) = &self.supervisor_name {
      validate::text("supervisor_name", v, TITLE_MAX)?;
    }
    if let Some(v) = &self.supervisor_phone {
      validate::phone("supervisor_phone", v)?;
    }
    check_end_date(start_date, self.end_date)?;
    check_rate(self.hourly_rate)?;
    if let Some(schedule) = &self.work_schedule {
      schedule.validate()?;
    }
    Ok(())
  }
}

fn check_end_date(start: NaiveDate, end: Option<NaiveDate>) -> Result<()> {
  match end {
    Some(end) if end <= start => {
      Err(Error::validation("end date must be after start date"))
    }
    _ => Ok(()),
  }
}

fn check_rate(rate: Option<Decimal>) -> Result<()> {
  match rate {
    Some(rate) if rate.is_sign_negative() && !rate.is_zero() => {
      Err(Error::validation("hourly rate cannot be negative"))
    }
    _ => Ok(()),
  }
}

/// Parameters for [`crate::store::WorkReleaseStore::list_assignments`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentFilter {
  pub subject_id:      Option<Uuid>,
  pub employer_id:     Option<Uuid>,
  pub status:          Option<AssignmentStatus>,
  #[serde(default)]
  pub include_retired: bool,
}

impl AssignmentFilter {
  pub fn for_subject(subject_id: Uuid) -> Self {
    Self { subject_id: Some(subject_id), include_retired: true, ..Self::default() }
  }

  pub fn with_status(status: AssignmentStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }
}
