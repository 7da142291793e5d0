//! Error types for the extractor.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot open {}: {source}", path.display())]
  Open {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("delimiter {0:?} must be a single-byte character")]
  Delimiter(char),

  #[error("source has no header row")]
  NoHeader,

  #[error("source is missing column {0:?}")]
  MissingColumn(&'static str),

  #[error("line {line}: {source}")]
  Row {
    line:   u64,
    #[source]
    source: csv::Error,
  },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
