//! Error type for `hires-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// The warehouse has not been provisioned (or was only partly).
  #[error("warehouse table {0} does not exist")]
  MissingTable(&'static str),

  #[error("not a warehouse table: {0:?}")]
  UnknownTable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
