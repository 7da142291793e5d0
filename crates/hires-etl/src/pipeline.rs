//! Stage functions composing the extractor, transformer, loader and KPI
//! reporter.
//!
//! Every stage takes the store it works on as an argument and wraps its
//! failure in the matching [`Error`] variant. Stages run strictly one after
//! another; each returns its full output before the next one starts.

use std::path::Path;

use hires_core::{
  kpi::{self, KpiReport},
  load::LoadReport,
  record::RawRecord,
  store::WarehouseStore,
  transform::TransformedBatch,
};

use crate::{Error, Result, Settings};

/// Outcome of one extract, transform and load pass.
#[derive(Debug)]
pub struct EtlSummary {
  /// Data rows read from the source file.
  pub extracted: usize,
  /// Rows the transformer refused, each carrying its source line.
  pub rejected:  Vec<hires_core::Error>,
  pub load:      LoadReport,
}

// ─── Stages ──────────────────────────────────────────────────────────────────

/// Create the warehouse tables if they do not exist.
pub async fn provision<S: WarehouseStore>(store: &S) -> Result<()> {
  store
    .provision()
    .await
    .map_err(|e| Error::Schema(hires_core::Error::store(e)))
}

pub fn extract(settings: &Settings, source: &Path) -> Result<Vec<RawRecord>> {
  Ok(hires_csv::read_path(source, settings.delimiter)?)
}

pub fn transform(settings: &Settings, records: &[RawRecord]) -> Result<TransformedBatch> {
  hires_core::transform::transform(records, &settings.transform_options())
    .map_err(Error::Transform)
}

pub async fn load<S: WarehouseStore>(
  store: &S,
  settings: &Settings,
  batch: &TransformedBatch,
) -> Result<LoadReport> {
  hires_core::load::load(store, batch, &settings.load_options())
    .await
    .map_err(Error::Load)
}

/// Compute all six KPIs. Fails if the schema is incomplete.
pub async fn report<S: WarehouseStore>(store: &S) -> Result<KpiReport> {
  kpi::collect(store).await.map_err(Error::Report)
}

// ─── Composite ───────────────────────────────────────────────────────────────

/// Extract `source`, transform it and load it into `store`.
///
/// The schema must already exist; a missing table fails the run before the
/// source file is read.
pub async fn run_etl<S: WarehouseStore>(
  store: &S,
  settings: &Settings,
  source: &Path,
) -> Result<EtlSummary> {
  store
    .verify_schema()
    .await
    .map_err(|e| Error::Schema(hires_core::Error::store(e)))?;

  let records = extract(settings, source)?;
  let batch = transform(settings, &records)?;
  let report = load(store, settings, &batch).await?;

  tracing::info!(
    extracted = records.len(),
    rejected = batch.rejected.len(),
    skipped = report.skipped.len(),
    facts = report.facts_inserted,
    "etl finished"
  );

  Ok(EtlSummary {
    extracted: records.len(),
    rejected:  batch.rejected,
    load:      report,
  })
}
