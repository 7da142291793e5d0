//! Dimension records and the natural-key → surrogate-key maps built from
//! them.
//!
//! Dimension rows are written once per distinct natural key and never updated
//! or deleted. Surrogate keys are assigned by the store.

use std::{collections::HashMap, fmt};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

// ─── Dimension kind ──────────────────────────────────────────────────────────

/// The five dimensions of the hires star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
  Candidate,
  Date,
  Country,
  Seniority,
  Technology,
}

impl Dimension {
  pub const ALL: [Dimension; 5] = [
    Self::Candidate,
    Self::Date,
    Self::Country,
    Self::Seniority,
    Self::Technology,
  ];

  /// Name of the backing table.
  pub fn table(self) -> &'static str {
    match self {
      Self::Candidate => "dim_candidate",
      Self::Date => "dim_date",
      Self::Country => "dim_country",
      Self::Seniority => "dim_seniority",
      Self::Technology => "dim_technology",
    }
  }
}

impl fmt::Display for Dimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table())
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A candidate, identified by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub first_name:          String,
  pub last_name:           String,
  /// Natural key.
  pub email:               String,
  pub years_of_experience: Option<u32>,
}

/// An application date together with its derived calendar parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationDate(pub NaiveDate);

impl ApplicationDate {
  pub fn date(self) -> NaiveDate { self.0 }

  pub fn year(self) -> i32 { self.0.year() }

  pub fn month(self) -> u32 { self.0.month() }

  pub fn day(self) -> u32 { self.0.day() }
}

/// The deduplicated rows of every dimension for one batch, in
/// first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionSet {
  pub candidates:   Vec<Candidate>,
  pub dates:        Vec<ApplicationDate>,
  pub countries:    Vec<String>,
  pub seniorities:  Vec<String>,
  pub technologies: Vec<String>,
}

impl DimensionSet {
  pub fn counts(&self) -> DimensionCounts {
    DimensionCounts {
      candidates:   self.candidates.len(),
      dates:        self.dates.len(),
      countries:    self.countries.len(),
      seniorities:  self.seniorities.len(),
      technologies: self.technologies.len(),
    }
  }
}

/// Row counts per dimension, used both for batch sizes and for the number of
/// rows a load actually inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DimensionCounts {
  pub candidates:   usize,
  pub dates:        usize,
  pub countries:    usize,
  pub seniorities:  usize,
  pub technologies: usize,
}

impl DimensionCounts {
  pub fn get(&self, dimension: Dimension) -> usize {
    match dimension {
      Dimension::Candidate => self.candidates,
      Dimension::Date => self.dates,
      Dimension::Country => self.countries,
      Dimension::Seniority => self.seniorities,
      Dimension::Technology => self.technologies,
    }
  }

  pub fn total(&self) -> usize {
    Dimension::ALL.iter().map(|d| self.get(*d)).sum()
  }
}

// ─── Key maps ────────────────────────────────────────────────────────────────

/// Natural key → surrogate key for every dimension, read back from the store
/// after the dimension load has committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMaps {
  pub candidates:   HashMap<String, i64>,
  pub dates:        HashMap<NaiveDate, i64>,
  pub countries:    HashMap<String, i64>,
  pub seniorities:  HashMap<String, i64>,
  pub technologies: HashMap<String, i64>,
}

impl KeyMaps {
  pub fn len(&self, dimension: Dimension) -> usize {
    match dimension {
      Dimension::Candidate => self.candidates.len(),
      Dimension::Date => self.dates.len(),
      Dimension::Country => self.countries.len(),
      Dimension::Seniority => self.seniorities.len(),
      Dimension::Technology => self.technologies.len(),
    }
  }
}
