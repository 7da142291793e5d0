//! Pipeline error type. Each variant names the stage that failed.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// The stages of the hires pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Schema,
  Extract,
  Transform,
  Load,
  Report,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Schema => "schema",
      Self::Extract => "extract",
      Self::Transform => "transform",
      Self::Load => "load",
      Self::Report => "report",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  Config(#[from] config::ConfigError),

  #[error("cannot open warehouse at {}: {source}", path.display())]
  Open {
    path:   PathBuf,
    #[source]
    source: hires_store_sqlite::Error,
  },

  #[error("schema stage failed: {0}")]
  Schema(#[source] hires_core::Error),

  #[error("extract stage failed: {0}")]
  Extract(#[from] hires_csv::Error),

  #[error("transform stage failed: {0}")]
  Transform(#[source] hires_core::Error),

  #[error("load stage failed: {0}")]
  Load(#[source] hires_core::Error),

  #[error("report stage failed: {0}")]
  Report(#[source] hires_core::Error),
}

impl Error {
  /// The stage the error was raised in, if any. Configuration and
  /// connection failures happen before a stage starts.
  pub fn stage(&self) -> Option<Stage> {
    match self {
      Self::Config(_) | Self::Open { .. } => None,
      Self::Schema(_) => Some(Stage::Schema),
      Self::Extract(_) => Some(Stage::Extract),
      Self::Transform(_) => Some(Stage::Transform),
      Self::Load(_) => Some(Stage::Load),
      Self::Report(_) => Some(Stage::Report),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
