//! `hires` binary.
//!
//! Reads `hires.toml` (or the path given with `--config`), applies `HIRES_*`
//! environment overrides and runs one or all of the warehouse stages
//! against the configured SQLite file.
//!
//! ```text
//! hires schema
//! hires etl --source data/candidates.csv
//! hires kpi --format json
//! hires run
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use hires_core::kpi::KpiReport;
use hires_etl::{Settings, pipeline, report};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Hiring data warehouse ETL")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "hires.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the warehouse tables if they do not exist.
  Schema,
  /// Extract, transform and load a source file.
  Etl {
    /// Source file; overrides `source_path` from the configuration.
    #[arg(short, long)]
    source: Option<PathBuf>,
  },
  /// Compute and print the KPIs.
  Kpi {
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
  },
  /// Provision, load and report in one go.
  Run {
    #[arg(short, long)]
    source: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
  Text,
  Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so KPI output on stdout stays clean.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config).with_context(|| {
    format!("failed to load configuration from {}", cli.config.display())
  })?;
  tracing::debug!(?settings, "configuration loaded");

  match cli.command {
    Command::Schema => schema(&settings).await,
    Command::Etl { source } => etl(&settings, source).await,
    Command::Kpi { format } => kpi(&settings, format).await,
    Command::Run { source, format } => {
      schema(&settings).await?;
      etl(&settings, source).await?;
      kpi(&settings, format).await
    }
  }
}

// Each stage opens its own connection and drops it on return.

async fn schema(settings: &Settings) -> anyhow::Result<()> {
  let store = settings.open_store().await?;
  pipeline::provision(&store)
    .await
    .context("failed to provision warehouse schema")?;
  Ok(())
}

async fn etl(settings: &Settings, source: Option<PathBuf>) -> anyhow::Result<()> {
  let source = source.unwrap_or_else(|| settings.source_path.clone());
  let store = settings.open_store().await?;
  let summary = pipeline::run_etl(&store, settings, &source)
    .await
    .with_context(|| format!("failed to load {}", source.display()))?;

  for rejected in &summary.rejected {
    tracing::warn!(error = %rejected, "row rejected");
  }
  for skipped in &summary.load.skipped {
    tracing::warn!(error = %skipped, "fact skipped");
  }
  Ok(())
}

async fn kpi(settings: &Settings, format: Format) -> anyhow::Result<()> {
  let store = settings.open_store().await?;
  let kpis: KpiReport = pipeline::report(&store)
    .await
    .context("failed to compute KPIs")?;

  match format {
    Format::Text => print!("{}", report::render_text(&kpis)),
    Format::Json => println!(
      "{}",
      report::render_json(&kpis).context("failed to serialise KPIs")?
    ),
  }
  Ok(())
}
