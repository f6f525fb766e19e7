//! SQL schema for the work-release SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS employers (
    employer_id     TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    business_type   TEXT NOT NULL,
    contact_name    TEXT NOT NULL,
    contact_phone   TEXT NOT NULL,
    contact_email   TEXT,
    address         TEXT NOT NULL,
    approved        INTEGER NOT NULL DEFAULT 0,
    approval_date   TEXT,             -- YYYY-MM-DD
    approved_by     TEXT,             -- actor uuid
    mou_signed      INTEGER NOT NULL DEFAULT 0,
    mou_expiry_date TEXT,             -- NULL = no expiry
    active          INTEGER NOT NULL DEFAULT 1,
    notes           TEXT,
    created_at      TEXT NOT NULL,    -- RFC 3339 UTC
    updated_at      TEXT NOT NULL,
    retired_at      TEXT
);

-- Assignments are never deleted; closed ones may be soft-retired.
CREATE TABLE IF NOT EXISTS assignments (
    assignment_id      TEXT PRIMARY KEY,
    subject_id         TEXT NOT NULL,
    employer_id        TEXT NOT NULL REFERENCES employers(employer_id),
    position_title     TEXT NOT NULL,
    start_date         TEXT NOT NULL,
    end_date           TEXT,
    status             TEXT NOT NULL,
    hourly_rate        TEXT,          -- decimal string
    work_schedule      TEXT NOT NULL DEFAULT '{}',
    supervisor_name    TEXT NOT NULL,
    supervisor_phone   TEXT NOT NULL,
    approved_by        TEXT,
    approval_date      TEXT,
    termination_reason TEXT,
    notes              TEXT,
    created_by         TEXT,
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL,
    retired_at         TEXT,
    CHECK (status IN ('PENDING_APPROVAL', 'APPROVED', 'ACTIVE',
                      'SUSPENDED', 'COMPLETED', 'TERMINATED'))
);

-- At most one open assignment per subject.
CREATE UNIQUE INDEX IF NOT EXISTS assignments_one_open_per_subject
    ON assignments(subject_id)
    WHERE status IN ('PENDING_APPROVAL', 'APPROVED', 'ACTIVE', 'SUSPENDED')
      AND retired_at IS NULL;

CREATE INDEX IF NOT EXISTS assignments_employer_idx ON assignments(employer_id);
CREATE INDEX IF NOT EXISTS assignments_status_idx   ON assignments(status);

CREATE TABLE IF NOT EXISTS attendance_entries (
    entry_id             TEXT PRIMARY KEY,
    assignment_id        TEXT NOT NULL
        REFERENCES assignments(assignment_id) ON DELETE CASCADE,
    log_date             TEXT NOT NULL,
    departure_time       TEXT NOT NULL,   -- HH:MM:SS
    expected_return_time TEXT NOT NULL,
    actual_return_time   TEXT,
    status               TEXT NOT NULL,
    verified_by          TEXT,
    notes                TEXT,
    created_at           TEXT NOT NULL,
    updated_at           TEXT NOT NULL,
    UNIQUE (assignment_id, log_date),
    CHECK  (status IN ('DEPARTED', 'RETURNED_ON_TIME', 'RETURNED_LATE',
                       'DID_NOT_RETURN', 'EXCUSED'))
);

CREATE INDEX IF NOT EXISTS attendance_date_idx ON attendance_entries(log_date);

PRAGMA user_version = 1;
";
