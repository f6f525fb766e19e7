//! Read-only aggregates over the ledger and assignments.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  assignment::{Assignment, AssignmentStatus},
  attendance::{AttendanceEntry, AttendanceStatus},
  eligibility::ClassificationTier,
};

/// Programme-wide counts as of a given day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammeStatistics {
  pub total_employers:         u64,
  pub approved_employers:      u64,
  pub active_assignments:      u64,
  pub total_assignments:       u64,
  /// Entries dated the reporting day that are still `DEPARTED`.
  pub subjects_at_work_today:  u64,
  pub late_returns_this_month: u64,
  pub no_shows_this_month:     u64,
}

/// One subject's history across all of their assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
  pub subject_id:         Uuid,
  /// The `ACTIVE` assignment, if there is one.
  pub current_assignment: Option<Assignment>,
  pub total_assignments:  usize,
  /// Days the subject went out and came back, on time or late.
  pub total_work_days:    usize,
  pub late_returns:       usize,
  pub no_shows:           usize,
}

impl SubjectSummary {
  /// `entries` must be the ledger rows of `assignments`.
  pub fn build(
    subject_id: Uuid,
    assignments: Vec<Assignment>,
    entries: &[AttendanceEntry],
  ) -> Self {
    let tally = |status: AttendanceStatus| {
      entries.iter().filter(|e| e.status == status).count()
    };
    let late_returns = tally(AttendanceStatus::ReturnedLate);

    Self {
      subject_id,
      total_assignments: assignments.len(),
      current_assignment: assignments
        .into_iter()
        .find(|a| a.status == AssignmentStatus::Active),
      total_work_days: tally(AttendanceStatus::ReturnedOnTime) + late_returns,
      late_returns,
      no_shows: tally(AttendanceStatus::DidNotReturn),
    }
  }
}

/// Everything that happened on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
  pub date:             NaiveDate,
  /// Every entry logged that day, whatever its outcome.
  pub departed:         usize,
  /// Still `DEPARTED`, i.e. unresolved.
  pub still_out:        usize,
  pub returned_on_time: usize,
  pub returned_late:    usize,
  pub did_not_return:   usize,
  pub excused:          usize,
  pub entries:          Vec<AttendanceEntry>,
}

impl DailyReport {
  pub fn build(date: NaiveDate, entries: Vec<AttendanceEntry>) -> Self {
    let tally = |status: AttendanceStatus| {
      entries.iter().filter(|e| e.status == status).count()
    };
    Self {
      date,
      departed: entries.len(),
      still_out: tally(AttendanceStatus::Departed),
      returned_on_time: tally(AttendanceStatus::ReturnedOnTime),
      returned_late: tally(AttendanceStatus::ReturnedLate),
      did_not_return: tally(AttendanceStatus::DidNotReturn),
      excused: tally(AttendanceStatus::Excused),
      entries,
    }
  }
}

/// An open assignment whose subject no longer qualifies.
///
/// Eligibility is only enforced at approval. Reclassification afterwards is
/// surfaced here for a person to act on; nothing is changed automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityFlag {
  pub assignment_id: Uuid,
  pub subject_id:    Uuid,
  pub status:        AssignmentStatus,
  /// `None` when the directory no longer knows the subject.
  pub tier:          Option<ClassificationTier>,
}

/// First and last day of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
  let first = date.with_day(1).unwrap_or(date);
  let last = first
    .checked_add_months(Months::new(1))
    .and_then(|next| next.pred_opt())
    .unwrap_or(date);
  (first, last)
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveTime, Utc};

  use super::*;

  fn entry(status: AttendanceStatus, date: NaiveDate) -> AttendanceEntry {
    let now = Utc::now();
    AttendanceEntry {
      entry_id: Uuid::new_v4(),
      assignment_id: Uuid::new_v4(),
      log_date: date,
      departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
      expected_return_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
      actual_return_time: None,
      status,
      verified_by: None,
      notes: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn month_bounds_handle_short_months() {
    let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    assert_eq!(month_bounds(d(2026, 10, 18)), (d(2026, 10, 1), d(2026, 10, 31)));
    assert_eq!(month_bounds(d(2028, 2, 10)), (d(2028, 2, 1), d(2028, 2, 29)));
    assert_eq!(month_bounds(d(2026, 12, 31)), (d(2026, 12, 1), d(2026, 12, 31)));
  }

  #[test]
  fn daily_report_tallies_each_outcome() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let report = DailyReport::build(date, vec![
      entry(AttendanceStatus::Departed, date),
      entry(AttendanceStatus::ReturnedOnTime, date),
      entry(AttendanceStatus::ReturnedOnTime, date),
      entry(AttendanceStatus::ReturnedLate, date),
      entry(AttendanceStatus::DidNotReturn, date),
    ]);
    assert_eq!(report.departed, 5);
    assert_eq!(report.still_out, 1);
    assert_eq!(report.returned_on_time, 2);
    assert_eq!(report.returned_late, 1);
    assert_eq!(report.did_not_return, 1);
    assert_eq!(report.excused, 0);
  }

  #[test]
  fn subject_summary_counts_work_days() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let entries = [
      entry(AttendanceStatus::ReturnedOnTime, date),
      entry(AttendanceStatus::ReturnedLate, date),
      entry(AttendanceStatus::DidNotReturn, date),
      entry(AttendanceStatus::Excused, date),
    ];
    let summary = SubjectSummary::build(Uuid::new_v4(), Vec::new(), &entries);
    assert_eq!(summary.total_work_days, 2);
    assert_eq!(summary.late_returns, 1);
    assert_eq!(summary.no_shows, 1);
    assert!(summary.current_assignment.is_none());
  }
}
