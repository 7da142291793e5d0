//! Extractor for delimited candidate files.
//!
//! Reads a header row plus data rows into [`hires_core::record::RawRecord`]s.
//! No typing or normalisation happens here; every field stays text.
//!
//! # Example
//!
//! ```rust,ignore
//! let records = hires_csv::read_path("data/candidates.csv", ';')?;
//! ```

mod parse;

pub mod error;

pub use error::{Error, Result};
pub use parse::{read_path, read_records};
