//! The `WorkReleaseStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `work-release-store-sqlite`). [`crate::engine::Engine`] depends on this
//! abstraction, not on any concrete backend.
//!
//! Every mutating method is one atomic unit: the backend loads the affected
//! rows, runs the rule from this crate against them, and writes the result,
//! or writes nothing at all. Methods that need "today" take it explicitly as
//! `on`, so backends never read a clock.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  DomainError,
  actor::ActorId,
  assignment::{
    Assignment,
    AssignmentCommand,
    AssignmentFilter,
    AssignmentUpdate,
    NewAssignment,
  },
  attendance::{
    AttendanceEntry,
    EntryQuery,
    EntryResolution,
    NewDeparture,
    ResolvedEntry,
  },
  employer::{Employer, EmployerFilter, EmployerUpdate, MouApproval, NewEmployer},
  report::ProgrammeStatistics,
};

pub trait WorkReleaseStore: Send + Sync {
  type Error: std::error::Error
    + DomainError
    + From<crate::Error>
    + Send
    + Sync
    + 'static;

  // ── Employers ─────────────────────────────────────────────────────────

  fn register_employer(
    &self,
    draft: NewEmployer,
  ) -> impl Future<Output = Result<Employer, Self::Error>> + Send + '_;

  /// Retrieve an employer by id. Retired employers are `None`.
  fn get_employer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Employer>, Self::Error>> + Send + '_;

  /// Non-retired employers matching `filter`, ordered by name.
  fn list_employers(
    &self,
    filter: EmployerFilter,
  ) -> impl Future<Output = Result<Vec<Employer>, Self::Error>> + Send + '_;

  fn update_employer(
    &self,
    id: Uuid,
    update: EmployerUpdate,
  ) -> impl Future<Output = Result<Employer, Self::Error>> + Send + '_;

  fn approve_employer(
    &self,
    id: Uuid,
    approval: MouApproval,
    approver: ActorId,
    on: NaiveDate,
  ) -> impl Future<Output = Result<Employer, Self::Error>> + Send + '_;

  fn revoke_employer(
    &self,
    id: Uuid,
    reason: String,
    on: NaiveDate,
  ) -> impl Future<Output = Result<Employer, Self::Error>> + Send + '_;

  /// Soft-retire an employer. Fails with `Conflict` while any non-terminal
  /// assignment references it.
  fn delete_employer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Persist a new `PENDING_APPROVAL` assignment. A second non-terminal
  /// assignment for the same subject is a `Conflict`, including when two
  /// proposals race.
  fn propose_assignment(
    &self,
    draft: NewAssignment,
    created_by: Option<ActorId>,
    on: NaiveDate,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  /// Retrieve an assignment by id, retired or not.
  fn get_assignment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// Assignments matching `filter`, newest start date first.
  fn list_assignments(
    &self,
    filter: AssignmentFilter,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  fn update_assignment(
    &self,
    id: Uuid,
    update: AssignmentUpdate,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  /// Apply one lifecycle command under the write lock.
  fn transition_assignment(
    &self,
    id: Uuid,
    command: AssignmentCommand,
    on: NaiveDate,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  fn retire_assignment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Open the day's entry. A second entry for the same assignment and date
  /// is a `Conflict`.
  fn log_departure(
    &self,
    departure: NewDeparture,
  ) -> impl Future<Output = Result<AttendanceEntry, Self::Error>> + Send + '_;

  /// Close a `DEPARTED` entry. A no-return suspends the parent assignment
  /// in the same transaction.
  fn resolve_entry(
    &self,
    id: Uuid,
    resolution: EntryResolution,
    verifier: ActorId,
    on: NaiveDate,
  ) -> impl Future<Output = Result<ResolvedEntry, Self::Error>> + Send + '_;

  fn append_entry_note(
    &self,
    id: Uuid,
    note: String,
  ) -> impl Future<Output = Result<AttendanceEntry, Self::Error>> + Send + '_;

  fn get_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AttendanceEntry>, Self::Error>> + Send + '_;

  /// Entries matching `query`. Ordered by departure time when a date is
  /// given, otherwise newest date first.
  fn list_entries(
    &self,
    query: EntryQuery,
  ) -> impl Future<Output = Result<Vec<AttendanceEntry>, Self::Error>> + Send + '_;

  /// `DEPARTED` entries dated on or before `as_of`, oldest first.
  fn list_unresolved(
    &self,
    as_of: NaiveDate,
  ) -> impl Future<Output = Result<Vec<AttendanceEntry>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  fn statistics(
    &self,
    on: NaiveDate,
  ) -> impl Future<Output = Result<ProgrammeStatistics, Self::Error>> + Send + '_;
}
