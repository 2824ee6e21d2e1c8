//! SQL schema for the Docket SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// References between tables (`created_by`, `client_id`, `assigned_lawyer`,
/// `added_by`) are weak: there are no `FOREIGN KEY` clauses, and deleting a
/// row never cascades.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    role          TEXT NOT NULL,   -- 'admin' | 'lawyer' | 'paralegal'
    phone         TEXT,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS clients (
    client_id     TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL,
    phone         TEXT NOT NULL,
    date_of_birth TEXT,            -- YYYY-MM-DD
    id_number     TEXT,
    address_json  TEXT,            -- JSON-encoded Address or NULL
    notes         TEXT,
    created_by    TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cases (
    case_id           TEXT PRIMARY KEY,
    case_number       TEXT NOT NULL UNIQUE,
    title             TEXT NOT NULL,
    description       TEXT NOT NULL,
    client_id         TEXT NOT NULL,
    assigned_lawyer   TEXT NOT NULL,
    case_type         TEXT NOT NULL,
    status            TEXT NOT NULL DEFAULT 'Open',
    priority          TEXT NOT NULL DEFAULT 'Medium',
    court_name        TEXT,
    judge_assigned    TEXT,
    filing_date       TEXT,
    next_hearing_date TEXT,
    closing_date      TEXT,
    billing_amount    REAL NOT NULL DEFAULT 0 CHECK (billing_amount >= 0),
    documents_json    TEXT NOT NULL DEFAULT '[]',
    created_by        TEXT NOT NULL,
    created_at        TEXT NOT NULL,   -- RFC 3339 UTC, fixed microsecond width
    updated_at        TEXT NOT NULL
);

-- Notes are append-only: rows are only ever inserted, and removed only
-- together with their case. Log order is note_seq order.
CREATE TABLE IF NOT EXISTS case_notes (
    note_seq  INTEGER PRIMARY KEY AUTOINCREMENT,
    case_id   TEXT NOT NULL,
    content   TEXT NOT NULL,
    added_by  TEXT NOT NULL,
    added_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS clients_created_idx ON clients(created_at);
CREATE INDEX IF NOT EXISTS cases_created_idx   ON cases(created_at);
CREATE INDEX IF NOT EXISTS cases_status_idx    ON cases(status);
CREATE INDEX IF NOT EXISTS case_notes_case_idx ON case_notes(case_id);

PRAGMA user_version = 1;
";
