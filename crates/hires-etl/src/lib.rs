//! Orchestration for the hires warehouse.
//!
//! Composes the CSV extractor, the transformer, the loader and the KPI
//! reporter into explicit stages driven by [`Settings`]. The `hires` binary
//! is a thin CLI over this crate.

pub mod error;
pub mod pipeline;
pub mod report;
pub mod settings;

pub use error::{Error, Result, Stage};
pub use settings::Settings;
