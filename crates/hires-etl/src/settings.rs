//! Runtime configuration, layered from an optional TOML file and `HIRES_*`
//! environment variables.

use std::{
  fmt,
  path::{Path, PathBuf},
};

use hires_core::{
  load::{IntegrityPolicy, LoadOptions},
  transform::{DEFAULT_DATE_FORMAT, RowPolicy, TransformOptions},
};
use hires_store_sqlite::SqliteStore;
use serde::Deserialize;

use crate::{Error, Result};

/// Prefix for environment overrides, e.g. `HIRES_DATABASE`.
pub const ENV_PREFIX: &str = "HIRES";

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
  /// Accepted for compatibility with server-backed stores; SQLite ignores
  /// the connection fields.
  pub host:           Option<String>,
  pub user:           Option<String>,
  pub password:       Option<String>,
  /// SQLite database file. A leading `~/` is expanded against `$HOME`.
  pub database:       PathBuf,
  pub source_path:    PathBuf,
  pub delimiter:      char,
  pub date_format:    String,
  pub on_invalid_row: RowPolicy,
  pub on_unresolved:  IntegrityPolicy,
  pub dedupe_facts:   bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      host:           None,
      user:           None,
      password:       None,
      database:       PathBuf::from("hires_model.db"),
      source_path:    PathBuf::from("data/candidates.csv"),
      delimiter:      ';',
      date_format:    DEFAULT_DATE_FORMAT.to_owned(),
      on_invalid_row: RowPolicy::default(),
      on_unresolved:  IntegrityPolicy::default(),
      dedupe_facts:   false,
    }
  }
}

impl fmt::Debug for Settings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Settings")
      .field("host", &self.host)
      .field("user", &self.user)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("database", &self.database)
      .field("source_path", &self.source_path)
      .field("delimiter", &self.delimiter)
      .field("date_format", &self.date_format)
      .field("on_invalid_row", &self.on_invalid_row)
      .field("on_unresolved", &self.on_unresolved)
      .field("dedupe_facts", &self.dedupe_facts)
      .finish()
  }
}

impl Settings {
  /// Read `path` if it exists, then apply `HIRES_*` environment overrides.
  /// Missing keys fall back to [`Settings::default`].
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.as_ref()).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()?;
    Ok(settings)
  }

  pub fn transform_options(&self) -> TransformOptions {
    TransformOptions {
      date_format:    self.date_format.clone(),
      on_invalid_row: self.on_invalid_row,
    }
  }

  pub fn load_options(&self) -> LoadOptions {
    LoadOptions {
      on_unresolved: self.on_unresolved,
      dedupe_facts:  self.dedupe_facts,
    }
  }

  /// [`Settings::database`] with `~/` expanded.
  pub fn database_path(&self) -> PathBuf { expand_tilde(&self.database) }

  /// Open the configured warehouse. The schema is not provisioned.
  pub async fn open_store(&self) -> Result<SqliteStore> {
    let path = self.database_path();
    match SqliteStore::open(&path).await {
      Ok(store) => {
        tracing::debug!(path = %path.display(), "opened warehouse");
        Ok(store)
      }
      Err(source) => Err(Error::Open { path, source }),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
