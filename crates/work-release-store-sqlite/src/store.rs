//! [`SqliteStore`], the SQLite implementation of [`WorkReleaseStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;
use work_release_core::{
  Entity,
  Error as CoreError,
  actor::ActorId,
  assignment::{
    Assignment,
    AssignmentCommand,
    AssignmentFilter,
    AssignmentStatus,
    AssignmentUpdate,
    NewAssignment,
  },
  attendance::{
    self,
    AttendanceEntry,
    AttendanceStatus,
    EntryQuery,
    EntryResolution,
    NewDeparture,
    ResolvedEntry,
  },
  employer::{Employer, EmployerFilter, EmployerUpdate, MouApproval, NewEmployer},
  report::{ProgrammeStatistics, month_bounds},
  store::WorkReleaseStore,
};

use crate::{
  Error,
  Result,
  encode::{
    ASSIGNMENT_COLUMNS,
    EMPLOYER_COLUMNS,
    ENTRY_COLUMNS,
    RawAssignment,
    RawEmployer,
    RawEntry,
    encode_date,
    encode_dt,
    encode_time,
    encode_uuid,
  },
  schema::SCHEMA,
};

/// `(...)` list for `status IN` covering the statuses that hold a subject's
/// single slot.
fn open_statuses() -> String {
  let names: Vec<String> = AssignmentStatus::NON_TERMINAL
    .iter()
    .map(|&status| format!("'{}'", <&'static str>::from(status)))
    .collect();
  format!("({})", names.join(", "))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A work-release store backed by a single SQLite file.
///
/// Cloning is cheap; clones share one connection, so their operations are
/// serialised.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside `BEGIN IMMEDIATE`. The transaction commits only if `f`
  /// succeeds; on any error it is dropped, which rolls it back.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = f(&tx);
        if outcome.is_ok() {
          tx.commit()?;
        }
        Ok(outcome)
      })
      .await?
  }

  /// Run a read-only `f` outside any explicit transaction.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: String) -> Result<usize> {
    self.read(move |conn| Ok(conn.execute(&sql, [])?)).await
  }
}

// ─── Row access ──────────────────────────────────────────────────────────────

/// Map a UNIQUE violation onto a domain conflict; anything else is a
/// storage failure.
fn unique_or(err: rusqlite::Error, conflict: impl FnOnce() -> String) -> Error {
  let unique = matches!(
    &err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  );
  if unique { CoreError::Conflict(conflict()).into() } else { err.into() }
}

fn load_employer(
  conn: &rusqlite::Connection,
  id: Uuid,
  include_retired: bool,
) -> Result<Option<Employer>> {
  let retired = if include_retired { "" } else { "AND retired_at IS NULL" };
  let sql =
    format!("SELECT {EMPLOYER_COLUMNS} FROM employers WHERE employer_id = ?1 {retired}");
  conn
    .query_row(&sql, [encode_uuid(id)], RawEmployer::from_row)
    .optional()?
    .map(RawEmployer::into_employer)
    .transpose()
}

fn require_employer(conn: &rusqlite::Connection, id: Uuid) -> Result<Employer> {
  load_employer(conn, id, false)?
    .ok_or_else(|| CoreError::not_found(Entity::Employer, id).into())
}

fn insert_employer(conn: &rusqlite::Connection, e: &Employer) -> Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO employers ({EMPLOYER_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
    ),
    rusqlite::params![
      encode_uuid(e.employer_id),
      e.name,
      e.business_type,
      e.contact_name,
      e.contact_phone,
      e.contact_email,
      e.address,
      e.approved,
      e.approval_date.map(encode_date),
      e.approved_by.map(|a| encode_uuid(a.0)),
      e.mou_signed,
      e.mou_expiry_date.map(encode_date),
      e.active,
      e.notes,
      encode_dt(e.created_at),
      encode_dt(e.updated_at),
      e.retired_at.map(encode_dt),
    ],
  )?;
  Ok(())
}

fn save_employer(conn: &rusqlite::Connection, e: &Employer) -> Result<()> {
  conn.execute(
    "UPDATE employers SET
       name = ?2, business_type = ?3, contact_name = ?4, contact_phone = ?5,
       contact_email = ?6, address = ?7, approved = ?8, approval_date = ?9,
       approved_by = ?10, mou_signed = ?11, mou_expiry_date = ?12,
       active = ?13, notes = ?14, updated_at = ?15, retired_at = ?16
     WHERE employer_id = ?1",
    rusqlite::params![
      encode_uuid(e.employer_id),
      e.name,
      e.business_type,
      e.contact_name,
      e.contact_phone,
      e.contact_email,
      e.address,
      e.approved,
      e.approval_date.map(encode_date),
      e.approved_by.map(|a| encode_uuid(a.0)),
      e.mou_signed,
      e.mou_expiry_date.map(encode_date),
      e.active,
      e.notes,
      encode_dt(e.updated_at),
      e.retired_at.map(encode_dt),
    ],
  )?;
  Ok(())
}

fn load_assignment(conn: &rusqlite::Connection, id: Uuid) -> Result<Option<Assignment>> {
  let sql = format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE assignment_id = ?1");
  conn
    .query_row(&sql, [encode_uuid(id)], RawAssignment::from_row)
    .optional()?
    .map(RawAssignment::into_assignment)
    .transpose()
}

fn require_assignment(conn: &rusqlite::Connection, id: Uuid) -> Result<Assignment> {
  load_assignment(conn, id)?
    .ok_or_else(|| CoreError::not_found(Entity::Assignment, id).into())
}

/// The employer behind an existing assignment, retired or not.
fn employer_of(conn: &rusqlite::Connection, a: &Assignment) -> Result<Employer> {
  load_employer(conn, a.employer_id, true)?
    .ok_or_else(|| CoreError::not_found(Entity::Employer, a.employer_id).into())
}

fn open_assignment_for(conn: &rusqlite::Connection, subject_id: Uuid) -> Result<Option<String>> {
  let open = open_statuses();
  Ok(
    conn
      .query_row(
        &format!(
          "SELECT assignment_id FROM assignments
           WHERE subject_id = ?1 AND status IN {open} AND retired_at IS NULL
           LIMIT 1"
        ),
        [encode_uuid(subject_id)],
        |row| row.get(0),
      )
      .optional()?,
  )
}

fn insert_assignment(conn: &rusqlite::Connection, a: &Assignment) -> Result<()> {
  let schedule = serde_json::to_string(&a.work_schedule)?;
  conn
    .execute(
      &format!(
        "INSERT INTO assignments ({ASSIGNMENT_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                 ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
      ),
      rusqlite::params![
        encode_uuid(a.assignment_id),
        encode_uuid(a.subject_id),
        encode_uuid(a.employer_id),
        a.position_title,
        encode_date(a.start_date),
        a.end_date.map(encode_date),
        <&'static str>::from(a.status),
        a.hourly_rate.map(|r| r.to_string()),
        schedule,
        a.supervisor_name,
        a.supervisor_phone,
        a.approved_by.map(|x| encode_uuid(x.0)),
        a.approval_date.map(encode_date),
        a.termination_reason,
        a.notes,
        a.created_by.map(|x| encode_uuid(x.0)),
        encode_dt(a.created_at),
        encode_dt(a.updated_at),
        a.retired_at.map(encode_dt),
      ],
    )
    .map_err(|e| {
      unique_or(e, || {
        format!("subject {} already has an open assignment", a.subject_id)
      })
    })?;
  Ok(())
}

fn save_assignment(conn: &rusqlite::Connection, a: &Assignment) -> Result<()> {
  let schedule = serde_json::to_string(&a.work_schedule)?;
  conn
    .execute(
      "UPDATE assignments SET
         position_title = ?2, end_date = ?3, status = ?4, hourly_rate = ?5,
         work_schedule = ?6, supervisor_name = ?7, supervisor_phone = ?8,
         approved_by = ?9, approval_date = ?10, termination_reason = ?11,
         notes = ?12, updated_at = ?13, retired_at = ?14
       WHERE assignment_id = ?1",
      rusqlite::params![
        encode_uuid(a.assignment_id),
        a.position_title,
        a.end_date.map(encode_date),
        <&'static str>::from(a.status),
        a.hourly_rate.map(|r| r.to_string()),
        schedule,
        a.supervisor_name,
        a.supervisor_phone,
        a.approved_by.map(|x| encode_uuid(x.0)),
        a.approval_date.map(encode_date),
        a.termination_reason,
        a.notes,
        encode_dt(a.updated_at),
        a.retired_at.map(encode_dt),
      ],
    )
    .map_err(|e| {
      unique_or(e, || {
        format!("subject {} already has an open assignment", a.subject_id)
      })
    })?;
  Ok(())
}

fn load_entry(conn: &rusqlite::Connection, id: Uuid) -> Result<Option<AttendanceEntry>> {
  let sql = format!("SELECT {ENTRY_COLUMNS} FROM attendance_entries WHERE entry_id = ?1");
  conn
    .query_row(&sql, [encode_uuid(id)], RawEntry::from_row)
    .optional()?
    .map(RawEntry::into_entry)
    .transpose()
}

fn require_entry(conn: &rusqlite::Connection, id: Uuid) -> Result<AttendanceEntry> {
  load_entry(conn, id)?
    .ok_or_else(|| CoreError::not_found(Entity::AttendanceEntry, id).into())
}

fn insert_entry(conn: &rusqlite::Connection, e: &AttendanceEntry) -> Result<()> {
  conn
    .execute(
      &format!(
        "INSERT INTO attendance_entries ({ENTRY_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
      ),
      rusqlite::params![
        encode_uuid(e.entry_id),
        encode_uuid(e.assignment_id),
        encode_date(e.log_date),
        encode_time(e.departure_time),
        encode_time(e.expected_return_time),
        e.actual_return_time.map(encode_time),
        <&'static str>::from(e.status),
        e.verified_by.map(|x| encode_uuid(x.0)),
        e.notes,
        encode_dt(e.created_at),
        encode_dt(e.updated_at),
      ],
    )
    .map_err(|err| {
      unique_or(err, || {
        format!(
          "assignment {} already has an attendance entry for {}",
          e.assignment_id, e.log_date
        )
      })
    })?;
  Ok(())
}

fn save_entry(conn: &rusqlite::Connection, e: &AttendanceEntry) -> Result<()> {
  conn.execute(
    "UPDATE attendance_entries SET
       actual_return_time = ?2, status = ?3, verified_by = ?4, notes = ?5,
       updated_at = ?6
     WHERE entry_id = ?1",
    rusqlite::params![
      encode_uuid(e.entry_id),
      e.actual_return_time.map(encode_time),
      <&'static str>::from(e.status),
      e.verified_by.map(|x| encode_uuid(x.0)),
      e.notes,
      encode_dt(e.updated_at),
    ],
  )?;
  Ok(())
}

fn query_entries(
  conn: &rusqlite::Connection,
  where_clause: &str,
  order: &str,
  limit: Option<usize>,
  params: &[String],
) -> Result<Vec<AttendanceEntry>> {
  let limit = limit.map(|n| format!("LIMIT {n}")).unwrap_or_default();
  let sql = format!(
    "SELECT {ENTRY_COLUMNS} FROM attendance_entries {where_clause} ORDER BY {order} {limit}"
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(rusqlite::params_from_iter(params), RawEntry::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawEntry::into_entry).collect()
}

fn count(conn: &rusqlite::Connection, sql: &str, params: &[String]) -> Result<u64> {
  let n: i64 =
    conn.query_row(sql, rusqlite::params_from_iter(params), |row| row.get(0))?;
  Ok(u64::try_from(n).unwrap_or_default())
}

fn where_all(conds: &[String]) -> String {
  if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  }
}

// ─── WorkReleaseStore impl ───────────────────────────────────────────────────

impl WorkReleaseStore for SqliteStore {
  type Error = Error;

  // ── Employers ─────────────────────────────────────────────────────────────

  async fn register_employer(&self, draft: NewEmployer) -> Result<Employer> {
    let employer = Employer::register(draft, Utc::now())?;
    let row = employer.clone();
    self.write(move |tx| insert_employer(tx, &row)).await?;
    Ok(employer)
  }

  async fn get_employer(&self, id: Uuid) -> Result<Option<Employer>> {
    self.read(move |conn| load_employer(conn, id, false)).await
  }

  async fn list_employers(&self, filter: EmployerFilter) -> Result<Vec<Employer>> {
    self
      .read(move |conn| {
        let mut conds = vec!["retired_at IS NULL".to_owned()];
        if filter.approved_only {
          conds.push("approved = 1".to_owned());
        }
        if filter.active_only {
          conds.push("active = 1".to_owned());
        }
        let sql = format!(
          "SELECT {EMPLOYER_COLUMNS} FROM employers {} ORDER BY name COLLATE NOCASE",
          where_all(&conds)
        );
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
          .query_map([], RawEmployer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawEmployer::into_employer).collect()
      })
      .await
  }

  async fn update_employer(&self, id: Uuid, update: EmployerUpdate) -> Result<Employer> {
    self
      .write(move |tx| {
        let mut employer = require_employer(tx, id)?;
        employer.apply_update(update, Utc::now())?;
        save_employer(tx, &employer)?;
        Ok(employer)
      })
      .await
  }

  async fn approve_employer(
    &self,
    id: Uuid,
    approval: MouApproval,
    approver: ActorId,
    on: NaiveDate,
  ) -> Result<Employer> {
    self
      .write(move |tx| {
        let mut employer = require_employer(tx, id)?;
        employer.approve(approval, approver, on, Utc::now())?;
        save_employer(tx, &employer)?;
        Ok(employer)
      })
      .await
  }

  async fn revoke_employer(&self, id: Uuid, reason: String, on: NaiveDate) -> Result<Employer> {
    self
      .write(move |tx| {
        let mut employer = require_employer(tx, id)?;
        employer.revoke(&reason, on, Utc::now());
        save_employer(tx, &employer)?;
        Ok(employer)
      })
      .await
  }

  async fn delete_employer(&self, id: Uuid) -> Result<()> {
    self
      .write(move |tx| {
        let mut employer = require_employer(tx, id)?;
        let statuses = open_statuses();
        let open = count(
          tx,
          &format!(
            "SELECT COUNT(*) FROM assignments WHERE employer_id = ?1 AND status IN {statuses}"
          ),
          &[encode_uuid(id)],
        )?;
        if open > 0 {
          return Err(
            CoreError::Conflict(format!(
              "employer {id} still has {open} open assignment(s)"
            ))
            .into(),
          );
        }
        let now = Utc::now();
        employer.retired_at = Some(now);
        employer.updated_at = now;
        save_employer(tx, &employer)
      })
      .await
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn propose_assignment(
    &self,
    draft: NewAssignment,
    created_by: Option<ActorId>,
    on: NaiveDate,
  ) -> Result<Assignment> {
    self
      .write(move |tx| {
        let employer = require_employer(tx, draft.employer_id)?;
        let assignment = Assignment::propose(draft, &employer, created_by, on, Utc::now())?;
        if let Some(existing) = open_assignment_for(tx, assignment.subject_id)? {
          return Err(
            CoreError::Conflict(format!(
              "subject {} already has an open assignment ({existing})",
              assignment.subject_id
            ))
            .into(),
          );
        }
        insert_assignment(tx, &assignment)?;
        Ok(assignment)
      })
      .await
  }

  async fn get_assignment(&self, id: Uuid) -> Result<Option<Assignment>> {
    self.read(move |conn| load_assignment(conn, id)).await
  }

  async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
    self
      .read(move |conn| {
        let mut conds = Vec::new();
        let mut params = Vec::new();
        if let Some(subject_id) = filter.subject_id {
          params.push(encode_uuid(subject_id));
          conds.push(format!("subject_id = ?{}", params.len()));
        }
        if let Some(employer_id) = filter.employer_id {
          params.push(encode_uuid(employer_id));
          conds.push(format!("employer_id = ?{}", params.len()));
        }
        if let Some(status) = filter.status {
          params.push(<&'static str>::from(status).to_owned());
          conds.push(format!("status = ?{}", params.len()));
        }
        if !filter.include_retired {
          conds.push("retired_at IS NULL".to_owned());
        }

        let sql = format!(
          "SELECT {ASSIGNMENT_COLUMNS} FROM assignments {}
           ORDER BY start_date DESC, created_at DESC",
          where_all(&conds)
        );
        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
          .query_map(rusqlite::params_from_iter(&params), RawAssignment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawAssignment::into_assignment).collect()
      })
      .await
  }

  async fn update_assignment(&self, id: Uuid, update: AssignmentUpdate) -> Result<Assignment> {
    self
      .write(move |tx| {
        let mut assignment = require_assignment(tx, id)?;
        assignment.apply_update(update, Utc::now())?;
        save_assignment(tx, &assignment)?;
        Ok(assignment)
      })
      .await
  }

  async fn transition_assignment(
    &self,
    id: Uuid,
    command: AssignmentCommand,
    on: NaiveDate,
  ) -> Result<Assignment> {
    self
      .write(move |tx| {
        let mut assignment = require_assignment(tx, id)?;
        let employer = employer_of(tx, &assignment)?;
        assignment.apply(command, &employer, on, Utc::now())?;
        save_assignment(tx, &assignment)?;
        Ok(assignment)
      })
      .await
  }

  async fn retire_assignment(&self, id: Uuid) -> Result<Assignment> {
    self
      .write(move |tx| {
        let mut assignment = require_assignment(tx, id)?;
        assignment.retire(Utc::now())?;
        save_assignment(tx, &assignment)?;
        Ok(assignment)
      })
      .await
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn log_departure(&self, departure: NewDeparture) -> Result<AttendanceEntry> {
    self
      .write(move |tx| {
        let assignment = require_assignment(tx, departure.assignment_id)?;
        let entry = AttendanceEntry::open(departure, &assignment, Utc::now())?;
        insert_entry(tx, &entry)?;
        Ok(entry)
      })
      .await
  }

  async fn resolve_entry(
    &self,
    id: Uuid,
    resolution: EntryResolution,
    verifier: ActorId,
    on: NaiveDate,
  ) -> Result<ResolvedEntry> {
    self
      .write(move |tx| {
        let now = Utc::now();
        let mut entry = require_entry(tx, id)?;
        entry.resolve(resolution, verifier, now)?;
        save_entry(tx, &entry)?;

        let mut assignment = require_assignment(tx, entry.assignment_id)?;
        let auto_suspended = match attendance::auto_suspension(&entry, &assignment) {
          Some(command) => {
            let employer = employer_of(tx, &assignment)?;
            assignment.apply(command, &employer, on, now)?;
            save_assignment(tx, &assignment)?;
            Some(assignment)
          }
          None => None,
        };
        Ok(ResolvedEntry { entry, auto_suspended })
      })
      .await
  }

  async fn append_entry_note(&self, id: Uuid, note: String) -> Result<AttendanceEntry> {
    self
      .write(move |tx| {
        let mut entry = require_entry(tx, id)?;
        entry.append_note(&note, Utc::now())?;
        save_entry(tx, &entry)?;
        Ok(entry)
      })
      .await
  }

  async fn get_entry(&self, id: Uuid) -> Result<Option<AttendanceEntry>> {
    self.read(move |conn| load_entry(conn, id)).await
  }

  async fn list_entries(&self, query: EntryQuery) -> Result<Vec<AttendanceEntry>> {
    self
      .read(move |conn| {
        let mut conds = Vec::new();
        let mut params = Vec::new();
        if let Some(assignment_id) = query.assignment_id {
          params.push(encode_uuid(assignment_id));
          conds.push(format!("assignment_id = ?{}", params.len()));
        }
        if let Some(log_date) = query.log_date {
          params.push(encode_date(log_date));
          conds.push(format!("log_date = ?{}", params.len()));
        }
        if let Some(status) = query.status {
          params.push(<&'static str>::from(status).to_owned());
          conds.push(format!("status = ?{}", params.len()));
        }
        let order = if query.log_date.is_some() {
          "departure_time"
        } else {
          "log_date DESC, departure_time DESC"
        };
        query_entries(conn, &where_all(&conds), order, query.limit, &params)
      })
      .await
  }

  async fn list_unresolved(&self, as_of: NaiveDate) -> Result<Vec<AttendanceEntry>> {
    self
      .read(move |conn| {
        let departed: &'static str = AttendanceStatus::Departed.into();
        query_entries(
          conn,
          "WHERE status = ?1 AND log_date <= ?2",
          "log_date, departure_time",
          None,
          &[departed.to_owned(), encode_date(as_of)],
        )
      })
      .await
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn statistics(&self, on: NaiveDate) -> Result<ProgrammeStatistics> {
    debug!(%on, "computing programme statistics");
    self
      .read(move |conn| {
        let (first, last) = month_bounds(on);
        let month = [encode_date(first), encode_date(last)];
        let active: &'static str = AssignmentStatus::Active.into();

        Ok(ProgrammeStatistics {
          total_employers: count(
            conn,
            "SELECT COUNT(*) FROM employers WHERE retired_at IS NULL",
            &[],
          )?,
          approved_employers: count(
            conn,
            "SELECT COUNT(*) FROM employers WHERE retired_at IS NULL AND approved = 1",
            &[],
          )?,
          active_assignments: count(
            conn,
            "SELECT COUNT(*) FROM assignments WHERE status = ?1",
            &[active.to_owned()],
          )?,
          total_assignments: count(conn, "SELECT COUNT(*) FROM assignments", &[])?,
          subjects_at_work_today: count(
            conn,
            "SELECT COUNT(*) FROM attendance_entries
             WHERE log_date = ?1 AND status = 'DEPARTED'",
            &[encode_date(on)],
          )?,
          late_returns_this_month: count(
            conn,
            "SELECT COUNT(*) FROM attendance_entries
             WHERE log_date BETWEEN ?1 AND ?2 AND status = 'RETURNED_LATE'",
            &month,
          )?,
          no_shows_this_month: count(
            conn,
            "SELECT COUNT(*) FROM attendance_entries
             WHERE log_date BETWEEN ?1 AND ?2 AND status = 'DID_NOT_RETURN'",
            &month,
          )?,
        })
      })
      .await
  }
}
