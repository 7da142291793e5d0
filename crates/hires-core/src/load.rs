//! The load stage: idempotent dimension writes, surrogate-key resolution and
//! fact inserts.
//!
//! Dimensions are inserted first and committed; only then is every dimension
//! table read back into [`KeyMaps`]. Reading after the commit captures keys
//! inserted by this run and keys that already existed, without relying on
//! per-row generated-id return values.

use serde::Deserialize;

use crate::{
  Error, Result,
  dimension::{Dimension, DimensionCounts, KeyMaps},
  fact::{FactRecord, HireFact},
  store::WarehouseStore,
  transform::TransformedBatch,
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// What to do with a fact whose natural key has no surrogate key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityPolicy {
  /// Fail the load before any fact row is written.
  #[default]
  Abort,
  /// Leave the row out and report it in [`LoadReport::skipped`].
  Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
  pub on_unresolved: IntegrityPolicy,
  /// Attach a [`FactRecord::fact_key`] to every fact so reloading the same
  /// source does not duplicate fact rows.
  pub dedupe_facts:  bool,
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct LoadReport {
  /// Dimension rows new to the store; pre-existing keys are not counted.
  pub dimensions_inserted: DimensionCounts,
  pub facts_inserted:      usize,
  /// Facts left out under [`IntegrityPolicy::Skip`].
  pub skipped:             Vec<Error>,
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Map every natural key of `fact` to its surrogate key.
pub fn resolve(fact: &FactRecord, keys: &KeyMaps, dedupe: bool) -> Result<HireFact> {
  let missing = |dimension, key: String| Error::Unresolved {
    line: fact.line,
    dimension,
    key,
  };

  let candidate_id = *keys
    .candidates
    .get(&fact.email)
    .ok_or_else(|| missing(Dimension::Candidate, fact.email.clone()))?;
  let date_id = *keys
    .dates
    .get(&fact.date)
    .ok_or_else(|| missing(Dimension::Date, fact.date.to_string()))?;
  let country_id = *keys
    .countries
    .get(&fact.country)
    .ok_or_else(|| missing(Dimension::Country, fact.country.clone()))?;
  let seniority_id = *keys
    .seniorities
    .get(&fact.seniority)
    .ok_or_else(|| missing(Dimension::Seniority, fact.seniority.clone()))?;
  let technology_id = *keys
    .technologies
    .get(&fact.technology)
    .ok_or_else(|| missing(Dimension::Technology, fact.technology.clone()))?;

  Ok(HireFact {
    candidate_id,
    date_id,
    country_id,
    seniority_id,
    technology_id,
    hired: fact.hired,
    code_score: fact.code_score,
    interview_score: fact.interview_score,
    fact_key: dedupe.then(|| fact.fact_key()),
  })
}

// ─── Stage entry point ───────────────────────────────────────────────────────

/// Write `batch` to `store`.
///
/// Dimension rows are written in one transaction and are safe to retry.
/// Fact rows are resolved entirely in memory before the fact transaction
/// starts, so [`IntegrityPolicy::Abort`] never leaves partial facts behind.
pub async fn load<S: WarehouseStore>(
  store: &S,
  batch: &TransformedBatch,
  options: &LoadOptions,
) -> Result<LoadReport> {
  let dimensions_inserted = store
    .insert_dimensions(&batch.dimensions)
    .await
    .map_err(Error::store)?;

  let batch_counts = batch.dimensions.counts();
  for dimension in Dimension::ALL {
    tracing::debug!(
      table = %dimension,
      distinct = batch_counts.get(dimension),
      inserted = dimensions_inserted.get(dimension),
      "loaded dimension"
    );
  }

  let keys = store.key_maps().await.map_err(Error::store)?;

  let mut resolved = Vec::with_capacity(batch.facts.len());
  let mut skipped = Vec::new();
  for fact in &batch.facts {
    match resolve(fact, &keys, options.dedupe_facts) {
      Ok(hire) => resolved.push(hire),
      Err(err) => match options.on_unresolved {
        IntegrityPolicy::Abort => {
          tracing::error!(error = %err, "unresolved fact, aborting load");
          return Err(err);
        }
        IntegrityPolicy::Skip => {
          tracing::warn!(error = %err, "skipping unresolved fact");
          skipped.push(err);
        }
      },
    }
  }

  let attempted = resolved.len();
  let facts_inserted = store.insert_facts(resolved).await.map_err(Error::store)?;
  if facts_inserted < attempted {
    tracing::info!(
      ignored = attempted - facts_inserted,
      "facts already present by fact key"
    );
  }

  tracing::info!(
    dimensions_inserted = dimensions_inserted.total(),
    facts_inserted,
    skipped = skipped.len(),
    "load complete"
  );

  Ok(LoadReport { dimensions_inserted, facts_inserted, skipped })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2019, 7, 1).unwrap() }

  fn fact() -> FactRecord {
    FactRecord {
      line:            5,
      email:           "grace@example.com".into(),
      date:            date(),
      country:         "Ecuador".into(),
      seniority:       "Lead".into(),
      technology:      "Security".into(),
      hired:           false,
      code_score:      3.0,
      interview_score: 9.0,
    }
  }

  fn keys() -> KeyMaps {
    let mut keys = KeyMaps::default();
    keys.candidates.insert("grace@example.com".into(), 11);
    keys.dates.insert(date(), 12);
    keys.countries.insert("Ecuador".into(), 13);
    keys.seniorities.insert("Lead".into(), 14);
    keys.technologies.insert("Security".into(), 15);
    keys
  }

  #[test]
  fn resolves_every_surrogate_key() {
    let hire = resolve(&fact(), &keys(), false).unwrap();
    assert_eq!(
      (
        hire.candidate_id,
        hire.date_id,
        hire.country_id,
        hire.seniority_id,
        hire.technology_id
      ),
      (11, 12, 13, 14, 15)
    );
    assert!(!hire.hired);
    assert_eq!(hire.fact_key, None);
  }

  #[test]
  fn dedupe_attaches_fact_key() {
    let hire = resolve(&fact(), &keys(), true).unwrap();
    assert_eq!(hire.fact_key, Some(fact().fact_key()));
  }

  #[test]
  fn missing_key_names_dimension_and_line() {
    let mut keys = keys();
    keys.technologies.clear();
    let err = resolve(&fact(), &keys, false).unwrap_err();
    assert!(matches!(
      err,
      Error::Unresolved { line: 5, dimension: Dimension::Technology, ref key }
        if key == "Security"
    ));
  }
}
