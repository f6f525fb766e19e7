//! The engine: the single entry point outer layers call.
//!
//! [`Engine`] owns a store and a subject directory and supplies "today" from
//! its clock. It performs the steps that must happen outside a storage
//! transaction (the directory lookup on approval) and otherwise delegates to
//! the store, logging every state change.

use chrono::{Local, NaiveDate, NaiveTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Entity,
  Error,
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
    AttendanceEntry,
    EntryQuery,
    EntryResolution,
    NewDeparture,
    ResolvedEntry,
  },
  directory::SubjectDirectory,
  eligibility::ClassificationTier,
  employer::{Employer, EmployerFilter, EmployerUpdate, MouApproval, NewEmployer},
  report::{DailyReport, EligibilityFlag, ProgrammeStatistics, SubjectSummary},
  store::WorkReleaseStore,
};

type Result<T, S> = std::result::Result<T, <S as WorkReleaseStore>::Error>;

fn local_today() -> NaiveDate { Local::now().date_naive() }

pub struct Engine<S, D> {
  store:     S,
  directory: D,
  clock:     fn() -> NaiveDate,
}

impl<S: WorkReleaseStore, D: SubjectDirectory> Engine<S, D> {
  pub fn new(store: S, directory: D) -> Self {
    Self { store, directory, clock: local_today }
  }

  /// Replace the source of "today". Tests pin it to a fixed date.
  pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
    self.clock = clock;
    self
  }

  pub fn today(&self) -> NaiveDate { (self.clock)() }

  pub fn store(&self) -> &S { &self.store }

  pub fn directory(&self) -> &D { &self.directory }

  // ── Employers ─────────────────────────────────────────────────────────

  pub async fn register_employer(&self, draft: NewEmployer) -> Result<Employer, S> {
    let employer = self.store.register_employer(draft).await?;
    info!(employer_id = %employer.employer_id, name = %employer.name, "registered employer");
    Ok(employer)
  }

  pub async fn get_employer(&self, id: Uuid) -> Result<Employer, S> {
    debug!(employer_id = %id, "get employer");
    self
      .store
      .get_employer(id)
      .await?
      .ok_or_else(|| Error::not_found(Entity::Employer, id).into())
  }

  pub async fn list_employers(&self, filter: EmployerFilter) -> Result<Vec<Employer>, S> {
    self.store.list_employers(filter).await
  }

  /// Employers able to take a new placement today, ordered by name.
  pub async fn list_accepting(&self) -> Result<Vec<Employer>, S> {
    let today = self.today();
    let filter = EmployerFilter { approved_only: true, active_only: true };
    let mut employers = self.store.list_employers(filter).await?;
    employers.retain(|e| e.can_accept_subjects(today));
    Ok(employers)
  }

  pub async fn update_employer(&self, id: Uuid, update: EmployerUpdate) -> Result<Employer, S> {
    let employer = self.store.update_employer(id, update).await?;
    info!(employer_id = %id, "updated employer");
    Ok(employer)
  }

  pub async fn approve_employer(
    &self,
    id: Uuid,
    approval: MouApproval,
    approver: ActorId,
  ) -> Result<Employer, S> {
    let employer = self
      .store
      .approve_employer(id, approval, approver, self.today())
      .await?;
    info!(
      employer_id = %id,
      approver = %approver,
      mou_expiry = ?employer.mou_expiry_date,
      "approved employer"
    );
    Ok(employer)
  }

  pub async fn revoke_employer(&self, id: Uuid, reason: String) -> Result<Employer, S> {
    let employer = self.store.revoke_employer(id, reason, self.today()).await?;
    info!(employer_id = %id, "revoked employer");
    Ok(employer)
  }

  pub async fn delete_employer(&self, id: Uuid) -> Result<(), S> {
    self.store.delete_employer(id).await?;
    info!(employer_id = %id, "retired employer");
    Ok(())
  }

  // ── Assignments ───────────────────────────────────────────────────────

  pub async fn propose(
    &self,
    draft: NewAssignment,
    created_by: Option<ActorId>,
  ) -> Result<Assignment, S> {
    let assignment = self
      .store
      .propose_assignment(draft, created_by, self.today())
      .await?;
    info!(
      assignment_id = %assignment.assignment_id,
      subject_id = %assignment.subject_id,
      employer_id = %assignment.employer_id,
      "proposed assignment"
    );
    Ok(assignment)
  }

  pub async fn get_assignment(&self, id: Uuid) -> Result<Assignment, S> {
    debug!(assignment_id = %id, "get assignment");
    self
      .store
      .get_assignment(id)
      .await?
      .ok_or_else(|| Error::not_found(Entity::Assignment, id).into())
  }

  pub async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>, S> {
    self.store.list_assignments(filter).await
  }

  pub async fn pending_approvals(&self) -> Result<Vec<Assignment>, S> {
    self
      .store
      .list_assignments(AssignmentFilter::with_status(AssignmentStatus::PendingApproval))
      .await
  }

  pub async fn active_assignments(&self) -> Result<Vec<Assignment>, S> {
    self
      .store
      .list_assignments(AssignmentFilter::with_status(AssignmentStatus::Active))
      .await
  }

  pub async fn update_assignment(
    &self,
    id: Uuid,
    update: AssignmentUpdate,
  ) -> Result<Assignment, S> {
    let assignment = self.store.update_assignment(id, update).await?;
    info!(assignment_id = %id, "updated assignment");
    Ok(assignment)
  }

  /// Approve a pending assignment. The subject's classification is read
  /// from the directory first; the write transaction never waits on it.
  pub async fn approve(&self, id: Uuid, approver: ActorId) -> Result<Assignment, S> {
    let assignment = self.get_assignment(id).await?;

    // Fail an illegal move before bothering the directory.
    let probe = AssignmentCommand::Approve { approver, tier: ClassificationTier::Minimum };
    if assignment.status.next(&probe).is_none() {
      return Err(
        Error::InvalidTransition {
          entity:    Entity::Assignment,
          from:      assignment.status.into(),
          requested: probe.name(),
        }
        .into(),
      );
    }

    let tier = self.classification(assignment.subject_id).await?;
    self
      .transition(id, AssignmentCommand::Approve { approver, tier })
      .await
  }

  pub async fn activate(&self, id: Uuid) -> Result<Assignment, S> {
    self.transition(id, AssignmentCommand::Activate).await
  }

  pub async fn suspend(&self, id: Uuid, reason: String) -> Result<Assignment, S> {
    self
      .transition(id, AssignmentCommand::Suspend { reason, automatic: false })
      .await
  }

  pub async fn reinstate(&self, id: Uuid) -> Result<Assignment, S> {
    self.transition(id, AssignmentCommand::Reinstate).await
  }

  pub async fn complete(&self, id: Uuid) -> Result<Assignment, S> {
    self.transition(id, AssignmentCommand::Complete).await
  }

  pub async fn terminate(&self, id: Uuid, reason: String) -> Result<Assignment, S> {
    self
      .transition(id, AssignmentCommand::Terminate { reason })
      .await
  }

  pub async fn retire_assignment(&self, id: Uuid) -> Result<Assignment, S> {
    let assignment = self.store.retire_assignment(id).await?;
    info!(assignment_id = %id, "retired assignment");
    Ok(assignment)
  }

  async fn transition(&self, id: Uuid, command: AssignmentCommand) -> Result<Assignment, S> {
    let name = command.name();
    let assignment = self
      .store
      .transition_assignment(id, command, self.today())
      .await?;
    info!(assignment_id = %id, command = name, status = %assignment.status, "assignment transition");
    Ok(assignment)
  }

  async fn classification(&self, subject_id: Uuid) -> Result<ClassificationTier, S> {
    let tier = self
      .directory
      .current_classification(subject_id)
      .await
      .map_err(Error::Directory)?
      .ok_or_else(|| Error::not_found(Entity::Subject, subject_id))?;
    debug!(subject_id = %subject_id, tier = %tier, "classification lookup");
    Ok(tier)
  }

  // ── Attendance ────────────────────────────────────────────────────────

  pub async fn log_departure(&self, departure: NewDeparture) -> Result<AttendanceEntry, S> {
    let entry = self.store.log_departure(departure).await?;
    info!(
      entry_id = %entry.entry_id,
      assignment_id = %entry.assignment_id,
      log_date = %entry.log_date,
      expected_return = %entry.expected_return_time,
      "logged departure"
    );
    Ok(entry)
  }

  pub async fn log_return(
    &self,
    entry_id: Uuid,
    actual_return_time: NaiveTime,
    notes: Option<String>,
    verifier: ActorId,
  ) -> Result<AttendanceEntry, S> {
    let resolution = EntryResolution::Returned { actual_return_time, notes };
    Ok(self.resolve(entry_id, resolution, verifier).await?.entry)
  }

  /// Record a failure to return. Suspends the assignment if it is still
  /// active; the suspended assignment is part of the result.
  pub async fn mark_no_return(
    &self,
    entry_id: Uuid,
    notes: Option<String>,
    verifier: ActorId,
  ) -> Result<ResolvedEntry, S> {
    self
      .resolve(entry_id, EntryResolution::NoReturn { notes }, verifier)
      .await
  }

  pub async fn mark_excused(
    &self,
    entry_id: Uuid,
    reason: String,
    verifier: ActorId,
  ) -> Result<AttendanceEntry, S> {
    let resolution = EntryResolution::Excused { reason };
    Ok(self.resolve(entry_id, resolution, verifier).await?.entry)
  }

  async fn resolve(
    &self,
    entry_id: Uuid,
    resolution: EntryResolution,
    verifier: ActorId,
  ) -> Result<ResolvedEntry, S> {
    let resolved = self
      .store
      .resolve_entry(entry_id, resolution, verifier, self.today())
      .await?;
    let entry = &resolved.entry;
    info!(
      entry_id = %entry_id,
      status = %entry.status,
      minutes_late = ?entry.minutes_late(),
      "resolved attendance entry"
    );
    if let Some(assignment) = &resolved.auto_suspended {
      warn!(
        assignment_id = %assignment.assignment_id,
        subject_id = %assignment.subject_id,
        log_date = %entry.log_date,
        "subject did not return; assignment suspended"
      );
    }
    Ok(resolved)
  }

  pub async fn append_entry_note(&self, entry_id: Uuid, note: String) -> Result<AttendanceEntry, S> {
    self.store.append_entry_note(entry_id, note).await
  }

  pub async fn get_entry(&self, entry_id: Uuid) -> Result<AttendanceEntry, S> {
    self
      .store
      .get_entry(entry_id)
      .await?
      .ok_or_else(|| Error::not_found(Entity::AttendanceEntry, entry_id).into())
  }

  /// The ledger for one assignment, newest first.
  pub async fn entries_for_assignment(
    &self,
    assignment_id: Uuid,
    limit: Option<usize>,
  ) -> Result<Vec<AttendanceEntry>, S> {
    self.get_assignment(assignment_id).await?;
    self
      .store
      .list_entries(EntryQuery::for_assignment(assignment_id, limit))
      .await
  }

  pub async fn entries_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceEntry>, S> {
    self.store.list_entries(EntryQuery::for_date(date)).await
  }

  pub async fn list_unresolved(&self, as_of: Option<NaiveDate>) -> Result<Vec<AttendanceEntry>, S> {
    let as_of = as_of.unwrap_or_else(|| self.today());
    self.store.list_unresolved(as_of).await
  }

  // ── Reports ───────────────────────────────────────────────────────────

  pub async fn statistics(&self) -> Result<ProgrammeStatistics, S> {
    self.store.statistics(self.today()).await
  }

  pub async fn subject_summary(&self, subject_id: Uuid) -> Result<SubjectSummary, S> {
    let assignments = self
      .store
      .list_assignments(AssignmentFilter::for_subject(subject_id))
      .await?;

    let mut entries = Vec::new();
    for assignment in &assignments {
      entries.extend(
        self
          .store
          .list_entries(EntryQuery::for_assignment(assignment.assignment_id, None))
          .await?,
      );
    }
    Ok(SubjectSummary::build(subject_id, assignments, &entries))
  }

  pub async fn daily_report(&self, date: Option<NaiveDate>) -> Result<DailyReport, S> {
    let date = date.unwrap_or_else(|| self.today());
    let entries = self.store.list_entries(EntryQuery::for_date(date)).await?;
    Ok(DailyReport::build(date, entries))
  }

  /// Placed subjects whose current classification no longer qualifies.
  /// Nothing is changed; each finding is logged for review.
  pub async fn eligibility_flags(&self) -> Result<Vec<EligibilityFlag>, S> {
    let mut placed = Vec::new();
    for status in [AssignmentStatus::Active, AssignmentStatus::Suspended] {
      placed.extend(
        self
          .store
          .list_assignments(AssignmentFilter::with_status(status))
          .await?,
      );
    }

    let mut flags = Vec::new();
    for assignment in placed {
      let tier = self
        .directory
        .current_classification(assignment.subject_id)
        .await
        .map_err(Error::Directory)?;
      if tier.is_some_and(ClassificationTier::qualifies_for_work_release) {
        continue;
      }
      warn!(
        assignment_id = %assignment.assignment_id,
        subject_id = %assignment.subject_id,
        tier = ?tier,
        "placed subject no longer qualifies for work release"
      );
      flags.push(EligibilityFlag {
        assignment_id: assignment.assignment_id,
        subject_id: assignment.subject_id,
        status: assignment.status,
        tier,
      });
    }
    Ok(flags)
  }
}
