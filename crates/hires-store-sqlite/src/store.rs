//! [`SqliteStore`], the SQLite implementation of [`WarehouseStore`].

use std::path::Path;

use hires_core::{
  dimension::{DimensionCounts, DimensionSet, KeyMaps},
  fact::HireFact,
  kpi::HireRow,
  store::WarehouseStore,
};
use rusqlite::Transaction;

use crate::{
  Error, Result,
  encode::{RawKeyMaps, encode_date},
  schema::{CONNECTION_PRAGMAS, SCHEMA, TABLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A hires warehouse backed by a single SQLite file.
///
/// Clones share one reference-counted connection. The
/// connection closes when the last clone is dropped.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database file at `path`. The schema is not
  /// provisioned; call [`WarehouseStore::provision`] for that.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.configure().await?;
    Ok(store)
  }

  async fn configure(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of rows in one of the warehouse [`TABLES`].
  pub async fn count_rows(&self, table: &str) -> Result<i64> {
    let table = TABLES
      .iter()
      .copied()
      .find(|t| *t == table)
      .ok_or_else(|| Error::UnknownTable(table.to_owned()))?;

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
          r.get(0)
        })?)
      })
      .await?;
    Ok(count)
  }

  /// `country_id` of every fact row, in insertion order.
  #[cfg(test)]
  pub(crate) async fn fact_country_ids(&self) -> Result<Vec<i64>> {
    let ids = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT country_id FROM fact_hires ORDER BY hire_id")?;
        let ids = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
      })
      .await?;
    Ok(ids)
  }
}

// ─── Transaction helpers ─────────────────────────────────────────────────────

fn insert_names(
  tx: &Transaction<'_>,
  table: &str,
  column: &str,
  names: &[String],
) -> rusqlite::Result<usize> {
  let mut stmt = tx.prepare(&format!(
    "INSERT INTO {table} ({column}) VALUES (?1) ON CONFLICT ({column}) DO NOTHING"
  ))?;
  let mut inserted = 0;
  for name in names {
    inserted += stmt.execute(rusqlite::params![name])?;
  }
  Ok(inserted)
}

fn insert_all_dimensions(
  tx: &Transaction<'_>,
  dims: &DimensionSet,
) -> rusqlite::Result<DimensionCounts> {
  let mut counts = DimensionCounts::default();

  let mut stmt = tx.prepare(
    "INSERT INTO dim_candidate (first_name, last_name, email, years_of_experience)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (email) DO NOTHING",
  )?;
  for c in &dims.candidates {
    counts.candidates += stmt.execute(rusqlite::params![
      c.first_name,
      c.last_name,
      c.email,
      c.years_of_experience,
    ])?;
  }

  let mut stmt = tx.prepare(
    "INSERT INTO dim_date (application_date, year, month, day)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (application_date) DO NOTHING",
  )?;
  for d in &dims.dates {
    counts.dates += stmt.execute(rusqlite::params![
      encode_date(d.date()),
      d.year(),
      d.month(),
      d.day(),
    ])?;
  }

  counts.countries =
    insert_names(tx, "dim_country", "country_name", &dims.countries)?;
  counts.seniorities =
    insert_names(tx, "dim_seniority", "seniority_level", &dims.seniorities)?;
  counts.technologies =
    insert_names(tx, "dim_technology", "technology_name", &dims.technologies)?;

  Ok(counts)
}

fn read_pairs(
  conn: &rusqlite::Connection,
  sql: &str,
) -> rusqlite::Result<Vec<(i64, String)>> {
  let mut stmt = conn.prepare(sql)?;
  stmt
    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
    .collect()
}

// ─── WarehouseStore impl ─────────────────────────────────────────────────────

impl WarehouseStore for SqliteStore {
  type Error = Error;

  // ── Schema ────────────────────────────────────────────────────────────────

  async fn provision(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::info!("warehouse schema provisioned");
    Ok(())
  }

  async fn verify_schema(&self) -> Result<()> {
    let existing: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
      })
      .await?;

    match TABLES.iter().find(|t| !existing.iter().any(|e| e == *t)) {
      Some(missing) => Err(Error::MissingTable(*missing)),
      None => Ok(()),
    }
  }

  // ── Dimensions ────────────────────────────────────────────────────────────

  async fn insert_dimensions(&self, dimensions: &DimensionSet) -> Result<DimensionCounts> {
    let dims = dimensions.clone();

    let counts = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let counts = insert_all_dimensions(&tx, &dims)?;
        tx.commit()?;
        Ok(counts)
      })
      .await?;

    Ok(counts)
  }

  async fn key_maps(&self) -> Result<KeyMaps> {
    let raw = self
      .conn
      .call(|conn| {
        Ok(RawKeyMaps {
          candidates:   read_pairs(
            conn,
            "SELECT candidate_id, email FROM dim_candidate",
          )?,
          dates:        read_pairs(
            conn,
            "SELECT date_id, application_date FROM dim_date",
          )?,
          countries:    read_pairs(
            conn,
            "SELECT country_id, country_name FROM dim_country",
          )?,
          seniorities:  read_pairs(
            conn,
            "SELECT seniority_id, seniority_level FROM dim_seniority",
          )?,
          technologies: read_pairs(
            conn,
            "SELECT technology_id, technology_name FROM dim_technology",
          )?,
        })
      })
      .await?;

    raw.into_key_maps()
  }

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn insert_facts(&self, facts: Vec<HireFact>) -> Result<usize> {
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO fact_hires (
               candidate_id, date_id, country_id, technology_id, seniority_id,
               hired, code_challenge_score, technical_interview_score, fact_key
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT (fact_key) DO NOTHING",
          )?;
          for f in &facts {
            inserted += stmt.execute(rusqlite::params![
              f.candidate_id,
              f.date_id,
              f.country_id,
              f.technology_id,
              f.seniority_id,
              f.hired,
              f.code_score,
              f.interview_score,
              f.fact_key,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(inserted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn hire_rows(&self) -> Result<Vec<HireRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             f.hired,
             f.code_challenge_score,
             f.technical_interview_score,
             c.years_of_experience,
             co.country_name,
             t.technology_name,
             s.seniority_level,
             d.year
           FROM fact_hires f
           JOIN dim_candidate  c  ON f.candidate_id  = c.candidate_id
           JOIN dim_country    co ON f.country_id    = co.country_id
           JOIN dim_technology t  ON f.technology_id = t.technology_id
           JOIN dim_seniority  s  ON f.seniority_id  = s.seniority_id
           JOIN dim_date       d  ON f.date_id       = d.date_id",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(HireRow {
              hired:               row.get(0)?,
              code_score:          row.get(1)?,
              interview_score:     row.get(2)?,
              years_of_experience: row.get(3)?,
              country:             row.get(4)?,
              technology:          row.get(5)?,
              seniority:           row.get(6)?,
              year:                row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}
