//! Hiring KPIs computed over the joined warehouse view.
//!
//! Every KPI is an ordered list of `(group key, value)` pairs. Grouping uses
//! `BTreeMap`, so keys come out in ascending order; experience buckets keep
//! their fixed order instead.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Error, Result, store::WarehouseStore};

/// Countries KPI 4 is restricted to.
pub const FOCUS_COUNTRIES: [&str; 4] =
  ["United States", "Brazil", "Colombia", "Ecuador"];

// ─── Joined row ──────────────────────────────────────────────────────────────

/// One fact row joined with the dimension attributes the KPIs need.
#[derive(Debug, Clone, PartialEq)]
pub struct HireRow {
  pub hired:               bool,
  pub code_score:          f64,
  pub interview_score:     f64,
  pub years_of_experience: Option<u32>,
  pub country:             String,
  pub technology:          String,
  pub seniority:           String,
  pub year:                i32,
}

// ─── Experience buckets ──────────────────────────────────────────────────────

/// Years-of-experience ranges. Upper bounds are inclusive; the first bucket
/// also includes zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ExperienceBucket {
  #[serde(rename = "0-2")]
  UpTo2,
  #[serde(rename = "3-5")]
  UpTo5,
  #[serde(rename = "6-10")]
  UpTo10,
  #[serde(rename = "11-15")]
  UpTo15,
  #[serde(rename = "16-20")]
  UpTo20,
  #[serde(rename = "21+")]
  Over20,
}

impl ExperienceBucket {
  pub const ALL: [ExperienceBucket; 6] = [
    Self::UpTo2,
    Self::UpTo5,
    Self::UpTo10,
    Self::UpTo15,
    Self::UpTo20,
    Self::Over20,
  ];

  /// Bucket for `years`; `None` for negative or NaN input.
  pub fn for_years(years: f64) -> Option<Self> {
    if years.is_nan() || years < 0.0 {
      return None;
    }
    Some(if years <= 2.0 {
      Self::UpTo2
    } else if years <= 5.0 {
      Self::UpTo5
    } else if years <= 10.0 {
      Self::UpTo10
    } else if years <= 15.0 {
      Self::UpTo15
    } else if years <= 20.0 {
      Self::UpTo20
    } else {
      Self::Over20
    })
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::UpTo2 => "0-2",
      Self::UpTo5 => "3-5",
      Self::UpTo10 => "6-10",
      Self::UpTo15 => "11-15",
      Self::UpTo20 => "16-20",
      Self::Over20 => "21+",
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Mean scores of hired candidates in one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreAverages {
  pub code_challenge: f64,
  pub interview:      f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
  pub hires_by_technology:     Vec<(String, u64)>,
  pub hires_by_year:           Vec<(i32, u64)>,
  pub hires_by_seniority:      Vec<(String, u64)>,
  pub hires_by_country_year:   Vec<((String, i32), u64)>,
  pub hires_by_experience:     Vec<(ExperienceBucket, u64)>,
  pub avg_scores_by_seniority: Vec<(String, ScoreAverages)>,
}

impl KpiReport {
  pub fn compute(rows: &[HireRow]) -> Self {
    Self {
      hires_by_technology:     hires_by_technology(rows),
      hires_by_year:           hires_by_year(rows),
      hires_by_seniority:      hires_by_seniority(rows),
      hires_by_country_year:   hires_by_country_year(rows),
      hires_by_experience:     hires_by_experience(rows),
      avg_scores_by_seniority: avg_scores_by_seniority(rows),
    }
  }
}

// ─── Aggregations ────────────────────────────────────────────────────────────

/// Sum of hires per group. Groups with no hire still appear with zero.
fn sum_hires<'a, K, F>(rows: impl IntoIterator<Item = &'a HireRow>, key: F) -> Vec<(K, u64)>
where
  K: Ord,
  F: Fn(&HireRow) -> K,
{
  let mut groups = BTreeMap::new();
  for row in rows {
    *groups.entry(key(row)).or_insert(0) += u64::from(row.hired);
  }
  groups.into_iter().collect()
}

/// KPI 1.
pub fn hires_by_technology(rows: &[HireRow]) -> Vec<(String, u64)> {
  sum_hires(rows, |r| r.technology.clone())
}

/// KPI 2.
pub fn hires_by_year(rows: &[HireRow]) -> Vec<(i32, u64)> {
  sum_hires(rows, |r| r.year)
}

/// KPI 3.
pub fn hires_by_seniority(rows: &[HireRow]) -> Vec<(String, u64)> {
  sum_hires(rows, |r| r.seniority.clone())
}

/// KPI 4, restricted to [`FOCUS_COUNTRIES`].
pub fn hires_by_country_year(rows: &[HireRow]) -> Vec<((String, i32), u64)> {
  sum_hires(
    rows
      .iter()
      .filter(|r| FOCUS_COUNTRIES.contains(&r.country.as_str())),
    |r| (r.country.clone(), r.year),
  )
}

/// KPI 5: hired candidates per experience bucket, every bucket listed.
/// Rows without years of experience are left out.
pub fn hires_by_experience(rows: &[HireRow]) -> Vec<(ExperienceBucket, u64)> {
  let mut counts: BTreeMap<ExperienceBucket, u64> =
    ExperienceBucket::ALL.iter().map(|b| (*b, 0)).collect();
  for row in rows.iter().filter(|r| r.hired) {
    let bucket = row
      .years_of_experience
      .and_then(|years| ExperienceBucket::for_years(f64::from(years)));
    if let Some(bucket) = bucket {
      *counts.entry(bucket).or_insert(0) += 1;
    }
  }
  counts.into_iter().collect()
}

/// KPI 6: mean scores of hired candidates per seniority level.
pub fn avg_scores_by_seniority(rows: &[HireRow]) -> Vec<(String, ScoreAverages)> {
  let mut sums: BTreeMap<String, (f64, f64, u32)> = BTreeMap::new();
  for row in rows.iter().filter(|r| r.hired) {
    let entry = sums.entry(row.seniority.clone()).or_insert((0.0, 0.0, 0));
    entry.0 += row.code_score;
    entry.1 += row.interview_score;
    entry.2 += 1;
  }
  sums
    .into_iter()
    .map(|(seniority, (code, interview, n))| {
      let n = f64::from(n);
      (
        seniority,
        ScoreAverages { code_challenge: code / n, interview: interview / n },
      )
    })
    .collect()
}

// ─── Stage entry point ───────────────────────────────────────────────────────

/// Verify the schema, read the joined view and compute every KPI.
pub async fn collect<S: WarehouseStore>(store: &S) -> Result<KpiReport> {
  store.verify_schema().await.map_err(Error::store)?;
  let rows = store.hire_rows().await.map_err(Error::store)?;
  tracing::info!(rows = rows.len(), "computing KPIs");
  Ok(KpiReport::compute(&rows))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(
    hired: bool,
    country: &str,
    year: i32,
    technology: &str,
    seniority: &str,
    yoe: Option<u32>,
  ) -> HireRow {
    HireRow {
      hired,
      code_score: if hired { 9.0 } else { 4.0 },
      interview_score: if hired { 8.0 } else { 5.0 },
      years_of_experience: yoe,
      country: country.into(),
      technology: technology.into(),
      seniority: seniority.into(),
      year,
    }
  }

  fn rows() -> Vec<HireRow> {
    vec![
      row(true, "Brazil", 2020, "Rust", "Senior", Some(2)),
      row(true, "Brazil", 2021, "Go", "Junior", Some(3)),
      row(false, "Brazil", 2021, "Go", "Junior", Some(8)),
      row(true, "France", 2020, "Rust", "Senior", Some(25)),
      row(true, "United States", 2020, "Rust", "Lead", None),
      row(false, "Colombia", 2022, "Java", "Intern", Some(0)),
    ]
  }

  #[test]
  fn bucket_edges_are_upper_inclusive() {
    assert_eq!(ExperienceBucket::for_years(0.0), Some(ExperienceBucket::UpTo2));
    assert_eq!(ExperienceBucket::for_years(2.0), Some(ExperienceBucket::UpTo2));
    assert_eq!(ExperienceBucket::for_years(2.1), Some(ExperienceBucket::UpTo5));
    assert_eq!(ExperienceBucket::for_years(5.0), Some(ExperienceBucket::UpTo5));
    assert_eq!(ExperienceBucket::for_years(10.0), Some(ExperienceBucket::UpTo10));
    assert_eq!(ExperienceBucket::for_years(20.0), Some(ExperienceBucket::UpTo20));
    assert_eq!(ExperienceBucket::for_years(20.5), Some(ExperienceBucket::Over20));
    assert_eq!(ExperienceBucket::for_years(-1.0), None);
    assert_eq!(ExperienceBucket::for_years(f64::NAN), None);
  }

  #[test]
  fn hires_by_technology_keeps_zero_groups() {
    assert_eq!(
      hires_by_technology(&rows()),
      vec![("Go".into(), 1), ("Java".into(), 0), ("Rust".into(), 3)]
    );
  }

  #[test]
  fn hires_by_year_is_ascending() {
    assert_eq!(hires_by_year(&rows()), vec![(2020, 3), (2021, 1), (2022, 0)]);
  }

  #[test]
  fn hires_by_seniority_sums_flags() {
    assert_eq!(
      hires_by_seniority(&rows()),
      vec![
        ("Intern".into(), 0),
        ("Junior".into(), 1),
        ("Lead".into(), 1),
        ("Senior".into(), 2),
      ]
    );
  }

  #[test]
  fn country_year_only_lists_focus_countries() {
    let kpi = hires_by_country_year(&rows());
    assert_eq!(
      kpi,
      vec![
        (("Brazil".into(), 2020), 1),
        (("Brazil".into(), 2021), 1),
        (("Colombia".into(), 2022), 0),
        (("United States".into(), 2020), 1),
      ]
    );
    assert!(kpi.iter().all(|((country, _), _)| country != "France"));
  }

  #[test]
  fn experience_counts_hired_only_in_fixed_order() {
    let kpi = hires_by_experience(&rows());
    let labels: Vec<_> = kpi.iter().map(|(b, _)| b.label()).collect();
    assert_eq!(labels, ["0-2", "3-5", "6-10", "11-15", "16-20", "21+"]);
    let counts: Vec<_> = kpi.iter().map(|(_, n)| *n).collect();
    // The hired row without YOE is excluded, the non-hired 8-year row too.
    assert_eq!(counts, [1, 1, 0, 0, 0, 1]);
  }

  #[test]
  fn average_scores_cover_hired_only() {
    let mut data = rows();
    let mut extra = row(true, "Ecuador", 2020, "Go", "Junior", Some(1));
    extra.code_score = 7.0;
    extra.interview_score = 10.0;
    data.push(extra);

    let kpi = avg_scores_by_seniority(&data);
    let seniorities: Vec<_> = kpi.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(seniorities, ["Junior", "Lead", "Senior"]);
    assert_eq!(kpi[0].1, ScoreAverages { code_challenge: 8.0, interview: 9.0 });
  }

  #[test]
  fn empty_view_yields_empty_groups_and_zero_buckets() {
    let report = KpiReport::compute(&[]);
    assert!(report.hires_by_technology.is_empty());
    assert!(report.avg_scores_by_seniority.is_empty());
    assert_eq!(report.hires_by_experience.len(), 6);
    assert!(report.hires_by_experience.iter().all(|(_, n)| *n == 0));
  }

  #[test]
  fn buckets_serialize_as_labels() {
    let json = serde_json::to_string(&ExperienceBucket::Over20).unwrap();
    assert_eq!(json, "\"21+\"");
  }
}
