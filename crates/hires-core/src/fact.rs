//! Fact records, one per hiring application.
//!
//! A [`FactRecord`] still refers to its dimensions by natural key; the loader
//! turns it into a [`HireFact`] once surrogate keys are known. Fact rows are
//! append-only.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Inclusive lower bound both scores must reach for a candidate to be hired.
pub const HIRE_THRESHOLD: f64 = 7.0;

/// Hiring outcome: both scores at or above [`HIRE_THRESHOLD`].
///
/// Non-finite scores are rejected instead of comparing as `false`.
pub fn is_hired(code_score: f64, interview_score: f64) -> Result<bool> {
  for score in [code_score, interview_score] {
    if !score.is_finite() {
      return Err(Error::NonFiniteScore(score));
    }
  }
  Ok(code_score >= HIRE_THRESHOLD && interview_score >= HIRE_THRESHOLD)
}

// ─── Natural-key fact ────────────────────────────────────────────────────────

/// A conformed source row, joined to its dimensions by natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRecord {
  /// Source line, kept for error reporting.
  pub line:            u64,
  pub email:           String,
  pub date:            NaiveDate,
  pub country:         String,
  pub seniority:       String,
  pub technology:      String,
  pub hired:           bool,
  pub code_score:      f64,
  pub interview_score: f64,
}

impl FactRecord {
  /// Hex SHA-256 over the five natural keys.
  ///
  /// Two records for the same candidate, date, country, seniority and
  /// technology share a key.
  pub fn fact_key(&self) -> String {
    let date = self.date.format("%Y-%m-%d").to_string();
    let mut hasher = Sha256::new();
    for part in [
      self.email.as_str(),
      date.as_str(),
      self.country.as_str(),
      self.seniority.as_str(),
      self.technology.as_str(),
    ] {
      hasher.update(part.as_bytes());
      // Unit separator keeps ("ab", "c") distinct from ("a", "bc").
      hasher.update([0x1f]);
    }
    hex::encode(hasher.finalize())
  }
}

// ─── Resolved fact ───────────────────────────────────────────────────────────

/// A row of `fact_hires`, referring to every dimension by surrogate key.
#[derive(Debug, Clone, PartialEq)]
pub struct HireFact {
  pub candidate_id:    i64,
  pub date_id:         i64,
  pub country_id:      i64,
  pub seniority_id:    i64,
  pub technology_id:   i64,
  pub hired:           bool,
  pub code_score:      f64,
  pub interview_score: f64,
  /// Idempotency key; `None` unless fact deduplication is enabled.
  pub fact_key:        Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record() -> FactRecord {
    FactRecord {
      line:            2,
      email:           "ada@example.com".into(),
      date:            NaiveDate::from_ymd_opt(2021, 3, 14).unwrap(),
      country:         "Brazil".into(),
      seniority:       "Senior".into(),
      technology:      "Game Development".into(),
      hired:           true,
      code_score:      9.0,
      interview_score: 8.0,
    }
  }

  #[test]
  fn hired_requires_both_scores() {
    assert!(is_hired(7.0, 7.0).unwrap());
    assert!(is_hired(10.0, 9.5).unwrap());
    assert!(!is_hired(7.0, 6.99).unwrap());
    assert!(!is_hired(6.99, 7.0).unwrap());
    assert!(!is_hired(0.0, 10.0).unwrap());
  }

  #[test]
  fn hired_rejects_non_finite_scores() {
    assert!(matches!(is_hired(f64::NAN, 8.0), Err(Error::NonFiniteScore(_))));
    assert!(matches!(
      is_hired(8.0, f64::INFINITY),
      Err(Error::NonFiniteScore(_))
    ));
  }

  #[test]
  fn fact_key_ignores_scores_and_line() {
    let a = record();
    let mut b = record();
    b.line = 40;
    b.code_score = 1.0;
    b.hired = false;
    assert_eq!(a.fact_key(), b.fact_key());
    assert_eq!(a.fact_key().len(), 64);
  }

  #[test]
  fn fact_key_separates_fields() {
    let mut a = record();
    a.country = "Brazil".into();
    a.seniority = "Senior".into();
    let mut b = record();
    b.country = "BrazilS".into();
    b.seniority = "enior".into();
    assert_ne!(a.fact_key(), b.fact_key());
  }
}
