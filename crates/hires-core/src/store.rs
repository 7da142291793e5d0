//! The `WarehouseStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `hires-store-sqlite`).
//! The loader and the KPI reporter depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  dimension::{DimensionCounts, DimensionSet, KeyMaps},
  fact::HireFact,
  kpi::HireRow,
};

/// Abstraction over a relational store holding the hires star schema.
///
/// Dimension writes are insert-or-ignore on the natural key, so they are safe
/// to repeat. Fact writes are append-only.
pub trait WarehouseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Create every dimension table and the fact table if they do not exist.
  fn provision(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fail if any table of the star schema is missing.
  fn verify_schema(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Dimensions ────────────────────────────────────────────────────────

  /// Insert all rows of `dimensions`, ignoring rows whose natural key is
  /// already present. Either every table is written or none is.
  ///
  /// Returns the number of rows actually inserted per dimension.
  fn insert_dimensions<'a>(
    &'a self,
    dimensions: &'a DimensionSet,
  ) -> impl Future<Output = Result<DimensionCounts, Self::Error>> + Send + 'a;

  /// Read every dimension table into natural key → surrogate key maps.
  fn key_maps(&self) -> impl Future<Output = Result<KeyMaps, Self::Error>> + Send + '_;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Insert `facts` in a single transaction and return how many rows were
  /// written. Facts carrying a `fact_key` that is already stored are
  /// ignored.
  fn insert_facts(
    &self,
    facts: Vec<HireFact>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every fact row joined with its dimensions.
  fn hire_rows(
    &self,
  ) -> impl Future<Output = Result<Vec<HireRow>, Self::Error>> + Send + '_;
}
