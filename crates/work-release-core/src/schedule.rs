//! Weekly work schedules.
//!
//! A schedule maps a closed set of weekdays to a single shift window. The
//! wire shape is `{"monday": {"start": "08:00:00", "end": "17:00:00"}, ...}`;
//! unknown day names are rejected by deserialisation.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl From<chrono::Weekday> for Weekday {
  fn from(day: chrono::Weekday) -> Self {
    match day {
      chrono::Weekday::Mon => Self::Monday,
      chrono::Weekday::Tue => Self::Tuesday,
      chrono::Weekday::Wed => Self::Wednesday,
      chrono::Weekday::Thu => Self::Thursday,
      chrono::Weekday::Fri => Self::Friday,
      chrono::Weekday::Sat => Self::Saturday,
      chrono::Weekday::Sun => Self::Sunday,
    }
  }
}

/// One day's expected working hours. `end` is the expected return time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
  pub start: NaiveTime,
  pub end:   NaiveTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkSchedule(pub BTreeMap<Weekday, ShiftWindow>);

impl WorkSchedule {
  pub fn new() -> Self { Self::default() }

  pub fn with_shift(mut self, day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
    self.0.insert(day, ShiftWindow { start, end });
    self
  }

  /// The shift scheduled for the weekday of `date`, if any.
  pub fn shift_on(&self, date: NaiveDate) -> Option<ShiftWindow> {
    self.0.get(&Weekday::from(date.weekday())).copied()
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn validate(&self) -> Result<()> {
    for (day, window) in &self.0 {
      if window.end <= window.start {
        return Err(Error::validation(format!(
          "shift on {day} must end after it starts"
        )));
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

  #[test]
  fn shift_on_follows_calendar_weekday() {
    let schedule = WorkSchedule::new()
      .with_shift(Weekday::Monday, t(8, 0), t(17, 0))
      .with_shift(Weekday::Saturday, t(9, 0), t(13, 0));

    // 2026-10-19 is a Monday.
    let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert_eq!(schedule.shift_on(monday).unwrap().end, t(17, 0));
    assert!(schedule.shift_on(monday.succ_opt().unwrap()).is_none());
  }

  #[test]
  fn inverted_window_is_rejected() {
    let schedule =
      WorkSchedule::new().with_shift(Weekday::Friday, t(17, 0), t(8, 0));
    assert!(matches!(schedule.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn wire_shape_uses_lowercase_days() {
    let schedule =
      WorkSchedule::new().with_shift(Weekday::Tuesday, t(8, 0), t(16, 30));
    let json = serde_json::to_value(&schedule).unwrap();
    assert_eq!(json["tuesday"]["end"], "16:30:00");

    let bad = serde_json::json!({ "funday": { "start": "08:00:00", "end": "09:00:00" } });
    assert!(serde_json::from_value::<WorkSchedule>(bad).is_err());
  }
}
