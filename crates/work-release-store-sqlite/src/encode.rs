//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates are `YYYY-MM-DD`, times of day are
//! `HH:MM:SS`. Statuses use their `SCREAMING_SNAKE_CASE` names. The weekly
//! schedule is compact JSON. UUIDs are hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use work_release_core::{
  actor::ActorId,
  assignment::{Assignment, AssignmentStatus},
  attendance::{AttendanceEntry, AttendanceStatus},
  employer::Employer,
  schedule::WorkSchedule,
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_actor(s: Option<String>) -> Result<Option<ActorId>> {
  s.as_deref().map(|s| decode_uuid(s).map(ActorId)).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S%.f").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
    .map_err(|e| Error::Decode(format!("time {s:?}: {e}")))
}

fn decode_opt<T>(s: Option<String>, f: fn(&str) -> Result<T>) -> Result<Option<T>> {
  s.as_deref().map(f).transpose()
}

/// Statuses round-trip through their `strum` names.
pub fn decode_enum<T: FromStr>(what: &str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown {what}: {s:?}")))
}

fn decode_decimal(s: &str) -> Result<Decimal> {
  Decimal::from_str(s).map_err(|e| Error::Decode(format!("decimal {s:?}: {e}")))
}

// ─── Employers ───────────────────────────────────────────────────────────────

pub const EMPLOYER_COLUMNS: &str = "employer_id, name, business_type, \
  contact_name, contact_phone, contact_email, address, approved, \
  approval_date, approved_by, mou_signed, mou_expiry_date, active, notes, \
  created_at, updated_at, retired_at";

/// Raw values read directly from an `employers` row.
pub struct RawEmployer {
  pub employer_id:     String,
  pub name:            String,
  pub business_type:   String,
  pub contact_name:    String,
  pub contact_phone:   String,
  pub contact_email:   Option<String>,
  pub address:         String,
  pub approved:        bool,
  pub approval_date:   Option<String>,
  pub approved_by:     Option<String>,
  pub mou_signed:      bool,
  pub mou_expiry_date: Option<String>,
  pub active:          bool,
  pub notes:           Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
  pub retired_at:      Option<String>,
}

impl RawEmployer {
  /// Column order follows [`EMPLOYER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      employer_id:     row.get(0)?,
      name:            row.get(1)?,
      business_type:   row.get(2)?,
      contact_name:    row.get(3)?,
      contact_phone:   row.get(4)?,
      contact_email:   row.get(5)?,
      address:         row.get(6)?,
      approved:        row.get(7)?,
      approval_date:   row.get(8)?,
      approved_by:     row.get(9)?,
      mou_signed:      row.get(10)?,
      mou_expiry_date: row.get(11)?,
      active:          row.get(12)?,
      notes:           row.get(13)?,
      created_at:      row.get(14)?,
      updated_at:      row.get(15)?,
      retired_at:      row.get(16)?,
    })
  }

  pub fn into_employer(self) -> Result<Employer> {
    Ok(Employer {
      employer_id:     decode_uuid(&self.employer_id)?,
      name:            self.name,
      business_type:   self.business_type,
      contact_name:    self.contact_name,
      contact_phone:   self.contact_phone,
      contact_email:   self.contact_email,
      address:         self.address,
      approved:        self.approved,
      approval_date:   decode_opt(self.approval_date, decode_date)?,
      approved_by:     decode_actor(self.approved_by)?,
      mou_signed:      self.mou_signed,
      mou_expiry_date: decode_opt(self.mou_expiry_date, decode_date)?,
      active:          self.active,
      notes:           self.notes,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
      retired_at:      decode_opt(self.retired_at, decode_dt)?,
    })
  }
}

// ─── Assignments ─────────────────────────────────────────────────────────────

pub const ASSIGNMENT_COLUMNS: &str = "assignment_id, subject_id, employer_id, \
  position_title, start_date, end_date, status, hourly_rate, work_schedule, \
  supervisor_name, supervisor_phone, approved_by, approval_date, \
  termination_reason, notes, created_by, created_at, updated_at, retired_at";

/// Raw values read directly from an `assignments` row.
pub struct RawAssignment {
  pub assignment_id:      String,
  pub subject_id:         String,
  pub employer_id:        String,
  pub position_title:     String,
  pub start_date:         String,
  pub end_date:           Option<String>,
  pub status:             String,
  pub hourly_rate:        Option<String>,
  pub work_schedule:      String,
  pub supervisor_name:    String,
  pub supervisor_phone:   String,
  pub approved_by:        Option<String>,
  pub approval_date:      Option<String>,
  pub termination_reason: Option<String>,
  pub notes:              Option<String>,
  pub created_by:         Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
  pub retired_at:         Option<String>,
}

impl RawAssignment {
  /// Column order follows [`ASSIGNMENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment_id:      row.get(0)?,
      subject_id:         row.get(1)?,
      employer_id:        row.get(2)?,
      position_title:     row.get(3)?,
      start_date:         row.get(4)?,
      end_date:           row.get(5)?,
      status:             row.get(6)?,
      hourly_rate:        row.get(7)?,
      work_schedule:      row.get(8)?,
      supervisor_name:    row.get(9)?,
      supervisor_phone:   row.get(10)?,
      approved_by:        row.get(11)?,
      approval_date:      row.get(12)?,
      termination_reason: row.get(13)?,
      notes:              row.get(14)?,
      created_by:         row.get(15)?,
      created_at:         row.get(16)?,
      updated_at:         row.get(17)?,
      retired_at:         row.get(18)?,
    })
  }

  pub fn into_assignment(self) -> Result<Assignment> {
    let work_schedule: WorkSchedule = serde_json::from_str(&self.work_schedule)?;
    Ok(Assignment {
      assignment_id: decode_uuid(&self.assignment_id)?,
      subject_id: decode_uuid(&self.subject_id)?,
      employer_id: decode_uuid(&self.employer_id)?,
      position_title: self.position_title,
      start_date: decode_date(&self.start_date)?,
      end_date: decode_opt(self.end_date, decode_date)?,
      status: decode_enum::<AssignmentStatus>("assignment status", &self.status)?,
      hourly_rate: decode_opt(self.hourly_rate, decode_decimal)?,
      work_schedule,
      supervisor_name: self.supervisor_name,
      supervisor_phone: self.supervisor_phone,
      approved_by: decode_actor(self.approved_by)?,
      approval_date: decode_opt(self.approval_date, decode_date)?,
      termination_reason: self.termination_reason,
      notes: self.notes,
      created_by: decode_actor(self.created_by)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      retired_at: decode_opt(self.retired_at, decode_dt)?,
    })
  }
}

// ─── Attendance ──────────────────────────────────────────────────────────────

pub const ENTRY_COLUMNS: &str = "entry_id, assignment_id, log_date, \
  departure_time, expected_return_time, actual_return_time, status, \
  verified_by, notes, created_at, updated_at";

/// Raw values read directly from an `attendance_entries` row.
pub struct RawEntry {
  pub entry_id:             String,
  pub assignment_id:        String,
  pub log_date:             String,
  pub departure_time:       String,
  pub expected_return_time: String,
  pub actual_return_time:   Option<String>,
  pub status:               String,
  pub verified_by:          Option<String>,
  pub notes:                Option<String>,
  pub created_at:           String,
  pub updated_at:           String,
}

impl RawEntry {
  /// Column order follows [`ENTRY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:             row.get(0)?,
      assignment_id:        row.get(1)?,
      log_date:             row.get(2)?,
      departure_time:       row.get(3)?,
      expected_return_time: row.get(4)?,
      actual_return_time:   row.get(5)?,
      status:               row.get(6)?,
      verified_by:          row.get(7)?,
      notes:                row.get(8)?,
      created_at:           row.get(9)?,
      updated_at:           row.get(10)?,
    })
  }

  pub fn into_entry(self) -> Result<AttendanceEntry> {
    Ok(AttendanceEntry {
      entry_id:             decode_uuid(&self.entry_id)?,
      assignment_id:        decode_uuid(&self.assignment_id)?,
      log_date:             decode_date(&self.log_date)?,
      departure_time:       decode_time(&self.departure_time)?,
      expected_return_time: decode_time(&self.expected_return_time)?,
      actual_return_time:   decode_opt(self.actual_return_time, decode_time)?,
      status:               decode_enum::<AttendanceStatus>("attendance status", &self.status)?,
      verified_by:          decode_actor(self.verified_by)?,
      notes:                self.notes,
      created_at:           decode_dt(&self.created_at)?,
      updated_at:           decode_dt(&self.updated_at)?,
    })
  }
}
