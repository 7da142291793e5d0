//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text; booleans as 0/1 integers.

use chrono::NaiveDate;
use hires_core::dimension::KeyMaps;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Key maps ────────────────────────────────────────────────────────────────

/// `(surrogate key, natural key)` pairs read directly from each dimension
/// table.
#[derive(Default)]
pub struct RawKeyMaps {
  pub candidates:   Vec<(i64, String)>,
  pub dates:        Vec<(i64, String)>,
  pub countries:    Vec<(i64, String)>,
  pub seniorities:  Vec<(i64, String)>,
  pub technologies: Vec<(i64, String)>,
}

impl RawKeyMaps {
  pub fn into_key_maps(self) -> Result<KeyMaps> {
    let by_name = |pairs: Vec<(i64, String)>| {
      pairs.into_iter().map(|(id, name)| (name, id)).collect()
    };

    let dates = self
      .dates
      .into_iter()
      .map(|(id, date)| Ok((decode_date(&date)?, id)))
      .collect::<Result<_>>()?;

    Ok(KeyMaps {
      candidates: by_name(self.candidates),
      dates,
      countries: by_name(self.countries),
      seniorities: by_name(self.seniorities),
      technologies: by_name(self.technologies),
    })
  }
}
