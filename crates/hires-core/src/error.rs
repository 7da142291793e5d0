//! Error types for `hires-core`.

use thiserror::Error;

use crate::dimension::Dimension;

#[derive(Debug, Error)]
pub enum Error {
  /// A source row carries a value that cannot be conformed.
  #[error("line {line}: invalid {column} {value:?}: {reason}")]
  Parse {
    line:   u64,
    column: &'static str,
    value:  String,
    reason: String,
  },

  /// A fact's natural key has no surrogate key after the dimension load.
  #[error("line {line}: no {dimension} row for natural key {key:?}")]
  Unresolved {
    line:      u64,
    dimension: Dimension,
    key:       String,
  },

  #[error("score must be a finite number, got {0}")]
  NonFiniteScore(f64),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error raised behind the [`crate::store::WarehouseStore`]
  /// seam.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// Source line the error refers to, if it is a per-row error.
  pub fn line(&self) -> Option<u64> {
    match self {
      Self::Parse { line, .. } | Self::Unresolved { line, .. } => Some(*line),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
