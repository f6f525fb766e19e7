//! The daily attendance ledger.
//!
//! One entry per assignment per calendar day. An entry is opened when the
//! subject leaves (`DEPARTED`) and resolved exactly once into one of the
//! four end states. A `DID_NOT_RETURN` resolution also suspends the parent
//! assignment; see [`auto_suspension`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Entity,
  Error,
  Result,
  actor::ActorId,
  assignment::{Assignment, AssignmentCommand, AssignmentStatus},
  validate,
};

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
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
  Departed,
  ReturnedOnTime,
  ReturnedLate,
  DidNotReturn,
  Excused,
}

impl AttendanceStatus {
  pub fn is_resolved(self) -> bool { !matches!(self, Self::Departed) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
  pub entry_id:             Uuid,
  pub assignment_id:        Uuid,
  pub log_date:             NaiveDate,
  pub departure_time:       NaiveTime,
  pub expected_return_time: NaiveTime,
  pub actual_return_time:   Option<NaiveTime>,
  pub status:               AttendanceStatus,
  pub verified_by:          Option<ActorId>,
  pub notes:                Option<String>,
  pub created_at:           DateTime<Utc>,
  pub updated_at:           DateTime<Utc>,
}

impl AttendanceEntry {
  /// Open a `DEPARTED` entry for an `ACTIVE` assignment. A missing expected
  /// return time is taken from the assignment's schedule for that weekday.
  pub fn open(
    departure: NewDeparture,
    assignment: &Assignment,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    if departure.assignment_id != assignment.assignment_id {
      return Err(Error::validation("departure does not match the assignment"));
    }
    if assignment.status != AssignmentStatus::Active {
      return Err(Error::AssignmentNotActive {
        assignment_id: assignment.assignment_id,
        status:        assignment.status.into(),
      });
    }

    let expected_return_time = match departure.expected_return_time {
      Some(t) => t,
      None => assignment
        .work_schedule
        .shift_on(departure.log_date)
        .map(|shift| shift.end)
        .ok_or_else(|| {
          Error::validation(format!(
            "no shift scheduled on {}; an expected return time is required",
            departure.log_date
          ))
        })?,
    };
    if expected_return_time <= departure.departure_time {
      return Err(Error::validation(
        "expected return time must be after departure time",
      ));
    }

    Ok(Self {
      entry_id: Uuid::new_v4(),
      assignment_id: departure.assignment_id,
      log_date: departure.log_date,
      departure_time: departure.departure_time,
      expected_return_time,
      actual_return_time: None,
      status: AttendanceStatus::Departed,
      verified_by: None,
      notes: departure.notes,
      created_at: now,
      updated_at: now,
    })
  }

  /// Close a `DEPARTED` entry. Resolved entries are final.
  pub fn resolve(
    &mut self,
    resolution: EntryResolution,
    verifier: ActorId,
    now: DateTime<Utc>,
  ) -> Result<()> {
    if self.status.is_resolved() {
      return Err(Error::InvalidTransition {
        entity:    Entity::AttendanceEntry,
        from:      self.status.into(),
        requested: resolution.name(),
      });
    }

    match resolution {
      EntryResolution::Returned { actual_return_time, notes } => {
        self.status = if actual_return_time <= self.expected_return_time {
          AttendanceStatus::ReturnedOnTime
        } else {
          AttendanceStatus::ReturnedLate
        };
        self.actual_return_time = Some(actual_return_time);
        if let Some(note) = notes {
          validate::append_note(&mut self.notes, format!("[RETURN] {note}"));
        }
      }
      EntryResolution::NoReturn { notes } => {
        self.status = AttendanceStatus::DidNotReturn;
        if let Some(note) = notes {
          validate::append_note(&mut self.notes, format!("[NO RETURN] {note}"));
        }
      }
      EntryResolution::Excused { reason } => {
        self.status = AttendanceStatus::Excused;
        validate::append_note(&mut self.notes, format!("[EXCUSED] {reason}"));
      }
    }

    self.verified_by = Some(verifier);
    self.updated_at = now;
    Ok(())
  }

  /// Add a free-text line without touching the status.
  pub fn append_note(&mut self, note: &str, now: DateTime<Utc>) -> Result<()> {
    if note.trim().is_empty() {
      return Err(Error::validation("note must not be empty"));
    }
    validate::append_note(&mut self.notes, note.trim().to_owned());
    self.updated_at = now;
    Ok(())
  }

  pub fn is_late(&self) -> bool {
    self.status == AttendanceStatus::ReturnedLate
  }

  /// How far past the expected return the subject came back, if they did.
  pub fn minutes_late(&self) -> Option<i64> {
    let actual = self.actual_return_time?;
    let late = (actual - self.expected_return_time).num_minutes();
    (late > 0).then_some(late)
  }
}

/// The follow-up transition implied by resolving `entry`, if any. Only a
/// `DID_NOT_RETURN` entry against a still-`ACTIVE` assignment yields one.
pub fn auto_suspension(
  entry: &AttendanceEntry,
  assignment: &Assignment,
) -> Option<AssignmentCommand> {
  (entry.status == AttendanceStatus::DidNotReturn
    && assignment.status == AssignmentStatus::Active)
    .then(|| AssignmentCommand::Suspend {
      reason:    format!("Did not return from work release on {}", entry.log_date),
      automatic: true,
    })
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::WorkReleaseStore::log_departure`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeparture {
  pub assignment_id:        Uuid,
  pub log_date:             NaiveDate,
  pub departure_time:       NaiveTime,
  pub expected_return_time: Option<NaiveTime>,
  pub notes:                Option<String>,
}

/// How a `DEPARTED` entry is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryResolution {
  Returned {
    actual_return_time: NaiveTime,
    notes:              Option<String>,
  },
  NoReturn { notes: Option<String> },
  Excused { reason: String },
}

impl EntryResolution {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Returned { .. } => "log return for",
      Self::NoReturn { .. } => "mark no return for",
      Self::Excused { .. } => "excuse",
    }
  }
}

/// Parameters for [`crate::store::WorkReleaseStore::list_entries`]. Results
/// are newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryQuery {
  pub assignment_id: Option<Uuid>,
  pub log_date:      Option<NaiveDate>,
  pub status:        Option<AttendanceStatus>,
  pub limit:         Option<usize>,
}

impl EntryQuery {
  pub fn for_assignment(assignment_id: Uuid, limit: Option<usize>) -> Self {
    Self { assignment_id: Some(assignment_id), limit, ..Self::default() }
  }

  pub fn for_date(log_date: NaiveDate) -> Self {
    Self { log_date: Some(log_date), ..Self::default() }
  }
}

/// A resolved entry together with the assignment it suspended, when the
/// resolution triggered one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntry {
  pub entry:          AttendanceEntry,
  pub auto_suspended: Option<Assignment>,
}
