//! Raw source rows, exactly as they appear in the delimited input file.
//!
//! Every field is kept as text; typing and normalisation happen in
//! [`crate::transform`].

use serde::Deserialize;

pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const EMAIL: &str = "Email";
pub const APPLICATION_DATE: &str = "Application Date";
pub const COUNTRY: &str = "Country";
pub const YOE: &str = "YOE";
pub const SENIORITY: &str = "Seniority";
pub const TECHNOLOGY: &str = "Technology";
pub const CODE_CHALLENGE_SCORE: &str = "Code Challenge Score";
pub const INTERVIEW_SCORE: &str = "Technical Interview Score";

/// Header names a source file must carry. Extra columns are ignored.
pub const COLUMNS: [&str; 10] = [
  FIRST_NAME,
  LAST_NAME,
  EMAIL,
  APPLICATION_DATE,
  COUNTRY,
  YOE,
  SENIORITY,
  TECHNOLOGY,
  CODE_CHALLENGE_SCORE,
  INTERVIEW_SCORE,
];

/// One candidate application as read from the source file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
  /// 1-based line in the source file; set by the extractor.
  #[serde(skip)]
  pub line:             u64,
  #[serde(rename = "First Name")]
  pub first_name:       String,
  #[serde(rename = "Last Name")]
  pub last_name:        String,
  #[serde(rename = "Email")]
  pub email:            String,
  #[serde(rename = "Application Date")]
  pub application_date: String,
  #[serde(rename = "Country")]
  pub country:          String,
  #[serde(rename = "YOE")]
  pub yoe:              String,
  #[serde(rename = "Seniority")]
  pub seniority:        String,
  #[serde(rename = "Technology")]
  pub technology:       String,
  #[serde(rename = "Code Challenge Score")]
  pub code_score:       String,
  #[serde(rename = "Technical Interview Score")]
  pub interview_score:  String,
}
