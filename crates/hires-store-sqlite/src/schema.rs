//! SQL schema for the hires star schema.
//!
//! Natural-key columns carry UNIQUE constraints; dimension inserts rely on
//! them for their `ON CONFLICT DO NOTHING` semantics.

/// Per-connection settings, applied whenever a connection is opened.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS dim_candidate (
    candidate_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name          TEXT    NOT NULL,
    last_name           TEXT    NOT NULL,
    email               TEXT    NOT NULL UNIQUE,
    years_of_experience INTEGER           -- NULL when not reported
);

CREATE TABLE IF NOT EXISTS dim_date (
    date_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    application_date TEXT    NOT NULL UNIQUE,   -- YYYY-MM-DD
    year             INTEGER NOT NULL,
    month            INTEGER NOT NULL,
    day              INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS dim_country (
    country_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    country_name TEXT    NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS dim_seniority (
    seniority_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    seniority_level TEXT    NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS dim_technology (
    technology_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    technology_name TEXT    NOT NULL UNIQUE
);

-- One row per application. Append-only.
CREATE TABLE IF NOT EXISTS fact_hires (
    hire_id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    candidate_id              INTEGER NOT NULL REFERENCES dim_candidate(candidate_id),
    date_id                   INTEGER NOT NULL REFERENCES dim_date(date_id),
    country_id                INTEGER NOT NULL REFERENCES dim_country(country_id),
    technology_id             INTEGER NOT NULL REFERENCES dim_technology(technology_id),
    seniority_id              INTEGER NOT NULL REFERENCES dim_seniority(seniority_id),
    hired                     INTEGER NOT NULL CHECK (hired IN (0, 1)),
    code_challenge_score      REAL    NOT NULL,
    technical_interview_score REAL    NOT NULL,
    fact_key                  TEXT    UNIQUE   -- NULL unless fact dedup is on
);

CREATE INDEX IF NOT EXISTS fact_hires_candidate_idx  ON fact_hires(candidate_id);
CREATE INDEX IF NOT EXISTS fact_hires_date_idx       ON fact_hires(date_id);
CREATE INDEX IF NOT EXISTS fact_hires_country_idx    ON fact_hires(country_id);
CREATE INDEX IF NOT EXISTS fact_hires_technology_idx ON fact_hires(technology_id);
CREATE INDEX IF NOT EXISTS fact_hires_seniority_idx  ON fact_hires(seniority_id);

PRAGMA user_version = 1;
";

/// Every table of the star schema; the fact table last.
pub const TABLES: [&str; 6] = [
  "dim_candidate",
  "dim_date",
  "dim_country",
  "dim_seniority",
  "dim_technology",
  "fact_hires",
];
