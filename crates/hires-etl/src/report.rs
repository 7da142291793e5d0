//! Printers for [`KpiReport`].

use std::fmt::Write as _;

use hires_core::kpi::KpiReport;

/// One printable table: a title, column headers and stringified rows.
struct Table {
  title:   &'static str,
  headers: Vec<&'static str>,
  rows:    Vec<Vec<String>>,
}

impl Table {
  fn render(&self, out: &mut String) {
    let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
    for row in &self.rows {
      for (width, cell) in widths.iter_mut().zip(row) {
        *width = (*width).max(cell.chars().count());
      }
    }

    let _ = writeln!(out, "{}", self.title);
    let header: Vec<String> = self.headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths);
    for row in &self.rows {
      write_row(out, row, &widths);
    }
    if self.rows.is_empty() {
      let _ = writeln!(out, "(no rows)");
    }
  }
}

/// Text columns are left-aligned; the last column holds numbers and is
/// right-aligned.
fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
  let last = cells.len().saturating_sub(1);
  let line: Vec<String> = cells
    .iter()
    .zip(widths)
    .enumerate()
    .map(|(i, (cell, &width))| {
      if i == last {
        format!("{cell:>width$}")
      } else {
        format!("{cell:<width$}")
      }
    })
    .collect();
  let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn tables(report: &KpiReport) -> [Table; 6] {
  [
    Table {
      title:   "KPI 1: Hires by Technology",
      headers: vec!["Technology", "Hires"],
      rows:    report
        .hires_by_technology
        .iter()
        .map(|(t, n)| vec![t.clone(), n.to_string()])
        .collect(),
    },
    Table {
      title:   "KPI 2: Hires by Year",
      headers: vec!["Year", "Hires"],
      rows:    report
        .hires_by_year
        .iter()
        .map(|(y, n)| vec![y.to_string(), n.to_string()])
        .collect(),
    },
    Table {
      title:   "KPI 3: Hires by Seniority",
      headers: vec!["Seniority", "Hires"],
      rows:    report
        .hires_by_seniority
        .iter()
        .map(|(s, n)| vec![s.clone(), n.to_string()])
        .collect(),
    },
    Table {
      title:   "KPI 4: Hires by Country and Year",
      headers: vec!["Country", "Year", "Hires"],
      rows:    report
        .hires_by_country_year
        .iter()
        .map(|((c, y), n)| vec![c.clone(), y.to_string(), n.to_string()])
        .collect(),
    },
    Table {
      title:   "KPI 5: Hires by Years of Experience",
      headers: vec!["Experience", "Hires"],
      rows:    report
        .hires_by_experience
        .iter()
        .map(|(b, n)| vec![b.label().to_owned(), n.to_string()])
        .collect(),
    },
    Table {
      title:   "KPI 6: Average Scores of Hires by Seniority",
      headers: vec!["Seniority", "Code Challenge", "Interview"],
      rows:    report
        .avg_scores_by_seniority
        .iter()
        .map(|(s, avg)| {
          vec![
            s.clone(),
            format!("{:.2}", avg.code_challenge),
            format!("{:.2}", avg.interview),
          ]
        })
        .collect(),
    },
  ]
}

/// Render every KPI as an aligned text table, separated by blank lines.
pub fn render_text(report: &KpiReport) -> String {
  let mut out = String::new();
  for (i, table) in tables(report).iter().enumerate() {
    if i > 0 {
      out.push('\n');
    }
    table.render(&mut out);
  }
  out
}

pub fn render_json(report: &KpiReport) -> serde_json::Result<String> {
  serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
  use hires_core::kpi::{ExperienceBucket, HireRow, ScoreAverages};

  use super::*;

  fn sample() -> KpiReport {
    KpiReport::compute(&[
      HireRow {
        hired:               true,
        code_score:          8.0,
        interview_score:     9.0,
        years_of_experience: Some(4),
        country:             "Brazil".into(),
        technology:          "Data Engineer".into(),
        seniority:           "Senior".into(),
        year:                2021,
      },
      HireRow {
        hired:               false,
        code_score:          2.0,
        interview_score:     3.0,
        years_of_experience: Some(1),
        country:             "France".into(),
        technology:          "Go".into(),
        seniority:           "Intern".into(),
        year:                2020,
      },
    ])
  }

  #[test]
  fn text_has_a_titled_table_per_kpi() {
    let text = render_text(&sample());
    for n in 1..=6 {
      assert!(text.contains(&format!("KPI {n}:")), "missing KPI {n}");
    }
    let has_row =
      |cells: &[&str]| text.lines().any(|l| l.split_whitespace().eq(cells.iter().copied()));
    assert!(has_row(&["Data", "Engineer", "1"]));
    assert!(has_row(&["Go", "0"]));
    assert!(has_row(&["Brazil", "2021", "1"]));
    assert!(has_row(&["Senior", "8.00", "9.00"]));
    assert!(!text.contains("France"));
  }

  #[test]
  fn empty_groups_are_marked() {
    let text = render_text(&KpiReport::compute(&[]));
    assert!(text.contains("(no rows)"));
    // Every experience bucket is always listed.
    for bucket in ExperienceBucket::ALL {
      assert!(text.contains(bucket.label()));
    }
  }

  #[test]
  fn json_uses_bucket_labels() {
    let json = render_json(&sample()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["hires_by_experience"][1][0], "3-5");
    assert_eq!(value["hires_by_experience"][1][1], 1);
    assert_eq!(value["hires_by_technology"][0][0], "Data Engineer");

    let avg = &value["avg_scores_by_seniority"][0][1];
    let expected = ScoreAverages { code_challenge: 8.0, interview: 9.0 };
    assert_eq!(avg["code_challenge"], expected.code_challenge);
    assert_eq!(avg["interview"], expected.interview);
  }
}
