//! The transform stage: typing, normalisation, derived fields and dimension
//! deduplication.
//!
//! Input is the raw record batch from the extractor. Output is a
//! [`TransformedBatch`]: one deduplicated record set per dimension plus one
//! [`FactRecord`] per accepted source row, still keyed by natural keys.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
  Error, Result,
  dimension::{ApplicationDate, Candidate, DimensionSet},
  fact::{FactRecord, is_hired},
  record::{self, RawRecord},
};

/// Date format used when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Options ─────────────────────────────────────────────────────────────────

/// What to do with a source row that fails to conform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
  /// Skip the row and report it in [`TransformedBatch::rejected`].
  #[default]
  Reject,
  /// Fail the whole stage on the first invalid row.
  Abort,
}

#[derive(Debug, Clone)]
pub struct TransformOptions {
  /// `chrono` format string for the Application Date column.
  pub date_format:    String,
  pub on_invalid_row: RowPolicy,
}

impl Default for TransformOptions {
  fn default() -> Self {
    Self {
      date_format:    DEFAULT_DATE_FORMAT.to_owned(),
      on_invalid_row: RowPolicy::default(),
    }
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct TransformedBatch {
  pub dimensions: DimensionSet,
  pub facts:      Vec<FactRecord>,
  /// Rows skipped under [`RowPolicy::Reject`], in source order.
  pub rejected:   Vec<Error>,
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest: `"united STATES"` → `"United States"`.
pub fn title_case(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut in_word = false;
  for c in s.trim().chars() {
    if c.is_alphabetic() {
      if in_word {
        out.extend(c.to_lowercase());
      } else {
        out.extend(c.to_uppercase());
      }
      in_word = true;
    } else {
      out.push(c);
      in_word = false;
    }
  }
  out
}

/// Upper-case the first character and lower-case everything after it:
/// `"MID-LEVEL"` → `"Mid-level"`.
pub fn capitalize(s: &str) -> String {
  let mut chars = s.trim().chars();
  match chars.next() {
    Some(first) => first
      .to_uppercase()
      .chain(chars.flat_map(char::to_lowercase))
      .collect(),
    None => String::new(),
  }
}

// ─── Field parsing ───────────────────────────────────────────────────────────

fn invalid(
  line: u64,
  column: &'static str,
  value: &str,
  reason: impl Into<String>,
) -> Error {
  Error::Parse { line, column, value: value.to_owned(), reason: reason.into() }
}

fn required(line: u64, column: &'static str, value: &str) -> Result<String> {
  let value = value.trim();
  if value.is_empty() {
    return Err(invalid(line, column, value, "value is required"));
  }
  Ok(value.to_owned())
}

fn parse_date(line: u64, value: &str, format: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), format).map_err(|e| {
    invalid(
      line,
      record::APPLICATION_DATE,
      value,
      format!("expected format {format:?}: {e}"),
    )
  })
}

fn parse_score(line: u64, column: &'static str, value: &str) -> Result<f64> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(invalid(line, column, value, "score is missing"));
  }
  let score: f64 = trimmed
    .parse()
    .map_err(|_| invalid(line, column, value, "score is not a number"))?;
  if !score.is_finite() {
    return Err(invalid(line, column, value, "score is not finite"));
  }
  Ok(score)
}

fn parse_years(line: u64, value: &str) -> Result<Option<u32>> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  trimmed.parse().map(Some).map_err(|_| {
    invalid(line, record::YOE, value, "expected a non-negative whole number")
  })
}

// ─── Conforming one row ──────────────────────────────────────────────────────

/// A fully typed and normalised source row.
struct ConformedRow {
  candidate: Candidate,
  fact:      FactRecord,
}

fn conform(raw: &RawRecord, options: &TransformOptions) -> Result<ConformedRow> {
  let line = raw.line;

  let first_name = required(line, record::FIRST_NAME, &raw.first_name)?;
  let last_name = required(line, record::LAST_NAME, &raw.last_name)?;
  let email = required(line, record::EMAIL, &raw.email)?;
  let date = parse_date(line, &raw.application_date, &options.date_format)?;
  let country = title_case(&required(line, record::COUNTRY, &raw.country)?);
  let years_of_experience = parse_years(line, &raw.yoe)?;
  let seniority = capitalize(&required(line, record::SENIORITY, &raw.seniority)?);
  let technology = required(line, record::TECHNOLOGY, &raw.technology)?;
  let code_score =
    parse_score(line, record::CODE_CHALLENGE_SCORE, &raw.code_score)?;
  let interview_score =
    parse_score(line, record::INTERVIEW_SCORE, &raw.interview_score)?;
  let hired = is_hired(code_score, interview_score)?;

  Ok(ConformedRow {
    candidate: Candidate {
      first_name,
      last_name,
      email: email.clone(),
      years_of_experience,
    },
    fact:      FactRecord {
      line,
      email,
      date,
      country,
      seniority,
      technology,
      hired,
      code_score,
      interview_score,
    },
  })
}

// ─── Deduplication ───────────────────────────────────────────────────────────

/// Accumulates dimension rows with set semantics over natural keys. The first
/// occurrence of a key wins.
#[derive(Default)]
struct DimensionBuilder {
  emails:       HashSet<String>,
  dates:        HashSet<NaiveDate>,
  countries:    HashSet<String>,
  seniorities:  HashSet<String>,
  technologies: HashSet<String>,
  set:          DimensionSet,
}

impl DimensionBuilder {
  fn add(&mut self, row: &ConformedRow) {
    let fact = &row.fact;
    if self.emails.insert(row.candidate.email.clone()) {
      self.set.candidates.push(row.candidate.clone());
    }
    if self.dates.insert(fact.date) {
      self.set.dates.push(ApplicationDate(fact.date));
    }
    if self.countries.insert(fact.country.clone()) {
      self.set.countries.push(fact.country.clone());
    }
    if self.seniorities.insert(fact.seniority.clone()) {
      self.set.seniorities.push(fact.seniority.clone());
    }
    if self.technologies.insert(fact.technology.clone()) {
      self.set.technologies.push(fact.technology.clone());
    }
  }

  fn finish(self) -> DimensionSet { self.set }
}

// ─── Stage entry point ───────────────────────────────────────────────────────

/// Conform `records` and split them into dimension and fact record sets.
///
/// Under [`RowPolicy::Abort`] the first invalid row is returned as the error
/// and nothing is produced.
pub fn transform(
  records: &[RawRecord],
  options: &TransformOptions,
) -> Result<TransformedBatch> {
  let mut builder = DimensionBuilder::default();
  let mut facts = Vec::with_capacity(records.len());
  let mut rejected = Vec::new();

  for raw in records {
    let row = match conform(raw, options) {
      Ok(row) => row,
      Err(err) => match options.on_invalid_row {
        RowPolicy::Abort => return Err(err),
        RowPolicy::Reject => {
          tracing::warn!(line = raw.line, error = %err, "rejecting source row");
          rejected.push(err);
          continue;
        }
      },
    };
    builder.add(&row);
    facts.push(row.fact);
  }

  let dimensions = builder.finish();
  tracing::info!(
    records = records.len(),
    facts = facts.len(),
    rejected = rejected.len(),
    candidates = dimensions.candidates.len(),
    dates = dimensions.dates.len(),
    countries = dimensions.countries.len(),
    seniorities = dimensions.seniorities.len(),
    technologies = dimensions.technologies.len(),
    "transformed batch"
  );

  Ok(TransformedBatch { dimensions, facts, rejected })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(line: u64, email: &str, country: &str) -> RawRecord {
    RawRecord {
      line,
      first_name: "Ada".into(),
      last_name: "Lovelace".into(),
      email: email.into(),
      application_date: "2021-02-26".into(),
      country: country.into(),
      yoe: "4".into(),
      seniority: "senior".into(),
      technology: "Data Engineer".into(),
      code_score: "8".into(),
      interview_score: "7".into(),
    }
  }

  // ─── Normalisation ─────────────────────────────────────────────────────

  #[test]
  fn title_case_matches_word_boundaries() {
    assert_eq!(title_case("brazil"), "Brazil");
    assert_eq!(title_case("UNITED states"), "United States");
    assert_eq!(title_case("  guinea-bissau "), "Guinea-Bissau");
    assert_eq!(title_case("côte d'ivoire"), "Côte D'Ivoire");
  }

  #[test]
  fn capitalize_lowers_the_tail() {
    assert_eq!(capitalize("MID-LEVEL"), "Mid-level");
    assert_eq!(capitalize("intern"), "Intern");
    assert_eq!(capitalize(""), "");
  }

  // ─── Conforming ────────────────────────────────────────────────────────

  #[test]
  fn derives_hired_flag_and_typed_fields() {
    let batch =
      transform(&[raw(2, "ada@example.com", "brazil")], &TransformOptions::default())
        .unwrap();
    let fact = &batch.facts[0];
    assert!(fact.hired);
    assert_eq!(fact.country, "Brazil");
    assert_eq!(fact.seniority, "Senior");
    assert_eq!(fact.date, NaiveDate::from_ymd_opt(2021, 2, 26).unwrap());
    assert_eq!(batch.dimensions.candidates[0].years_of_experience, Some(4));
  }

  #[test]
  fn interview_just_below_threshold_is_not_hired() {
    let mut r = raw(2, "ada@example.com", "Brazil");
    r.code_score = "7.0".into();
    r.interview_score = "6.99".into();
    let batch = transform(&[r], &TransformOptions::default()).unwrap();
    assert!(!batch.facts[0].hired);
  }

  #[test]
  fn empty_yoe_is_absent() {
    let mut r = raw(2, "ada@example.com", "Brazil");
    r.yoe = " ".into();
    let batch = transform(&[r], &TransformOptions::default()).unwrap();
    assert_eq!(batch.dimensions.candidates[0].years_of_experience, None);
  }

  #[test]
  fn configured_date_format_is_used() {
    let mut r = raw(2, "ada@example.com", "Brazil");
    r.application_date = "26/02/2021".into();
    let options = TransformOptions {
      date_format: "%d/%m/%Y".into(),
      ..Default::default()
    };
    let batch = transform(&[r], &options).unwrap();
    assert_eq!(batch.facts[0].date, NaiveDate::from_ymd_opt(2021, 2, 26).unwrap());
  }

  // ─── Deduplication ─────────────────────────────────────────────────────

  #[test]
  fn country_casing_collapses_to_one_row() {
    let batch = transform(
      &[raw(2, "a@example.com", "brazil"), raw(3, "b@example.com", "Brazil")],
      &TransformOptions::default(),
    )
    .unwrap();
    assert_eq!(batch.dimensions.countries, vec!["Brazil".to_owned()]);
    assert_eq!(batch.facts.len(), 2);
    assert!(batch.facts.iter().all(|f| f.country == "Brazil"));
  }

  #[test]
  fn dimension_sizes_equal_distinct_natural_keys() {
    let mut rows = Vec::new();
    let countries = ["brazil", "Colombia", "BRAZIL", "ecuador", "colombia"];
    for (i, country) in countries.iter().enumerate() {
      let mut r = raw(i as u64 + 2, &format!("c{}@example.com", i % 3), country);
      r.technology = ["Rust", "Go"][i % 2].into();
      r.application_date = format!("2020-01-0{}", i % 2 + 1);
      rows.push(r);
    }
    let batch = transform(&rows, &TransformOptions::default()).unwrap();
    let counts = batch.dimensions.counts();
    assert_eq!(counts.candidates, 3);
    assert_eq!(counts.dates, 2);
    assert_eq!(counts.countries, 3);
    assert_eq!(counts.seniorities, 1);
    assert_eq!(counts.technologies, 2);
    assert_eq!(batch.facts.len(), 5);
  }

  #[test]
  fn first_occurrence_wins_for_candidate_attributes() {
    let first = raw(2, "ada@example.com", "Brazil");
    let mut second = raw(3, "ada@example.com", "Brazil");
    second.first_name = "Augusta".into();
    second.yoe = "9".into();
    let batch =
      transform(&[first, second], &TransformOptions::default()).unwrap();
    assert_eq!(batch.dimensions.candidates.len(), 1);
    assert_eq!(batch.dimensions.candidates[0].first_name, "Ada");
    assert_eq!(batch.dimensions.candidates[0].years_of_experience, Some(4));
    assert_eq!(batch.facts.len(), 2);
  }

  // ─── Invalid rows ──────────────────────────────────────────────────────

  #[test]
  fn unparseable_date_is_rejected_with_its_line() {
    let mut bad = raw(3, "b@example.com", "Brazil");
    bad.application_date = "not a date".into();
    let batch = transform(
      &[raw(2, "a@example.com", "Brazil"), bad],
      &TransformOptions::default(),
    )
    .unwrap();
    assert_eq!(batch.facts.len(), 1);
    assert_eq!(batch.dimensions.candidates.len(), 1);
    assert_eq!(batch.rejected.len(), 1);
    assert!(matches!(
      &batch.rejected[0],
      Error::Parse { line: 3, column: record::APPLICATION_DATE, .. }
    ));
  }

  #[test]
  fn non_numeric_score_is_rejected() {
    let mut bad = raw(2, "a@example.com", "Brazil");
    bad.interview_score = "seven".into();
    let batch = transform(&[bad], &TransformOptions::default()).unwrap();
    assert!(batch.facts.is_empty());
    assert!(matches!(
      &batch.rejected[0],
      Error::Parse { column: record::INTERVIEW_SCORE, .. }
    ));
  }

  #[test]
  fn missing_score_is_rejected() {
    let mut bad = raw(2, "a@example.com", "Brazil");
    bad.code_score = String::new();
    let batch = transform(&[bad], &TransformOptions::default()).unwrap();
    assert_eq!(batch.rejected.len(), 1);
  }

  #[test]
  fn abort_policy_fails_the_stage() {
    let mut bad = raw(3, "b@example.com", "Brazil");
    bad.yoe = "-2".into();
    let options = TransformOptions {
      on_invalid_row: RowPolicy::Abort,
      ..Default::default()
    };
    let err =
      transform(&[raw(2, "a@example.com", "Brazil"), bad], &options).unwrap_err();
    assert_eq!(err.line(), Some(3));
  }
}
