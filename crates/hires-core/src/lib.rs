//! Core types and pipeline logic for the hires warehouse.
//!
//! This crate is deliberately free of file-format and database dependencies.
//! Extraction lives in `hires-csv`, persistence behind the
//! [`store::WarehouseStore`] trait in `hires-store-sqlite`.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dimension;
pub mod error;
pub mod fact;
pub mod kpi;
pub mod load;
pub mod record;
pub mod store;
pub mod transform;

pub use error::{Error, Result};
