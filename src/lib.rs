//! Estate normalization and multi-year projection engine for moving a
//! virtualization inventory onto a container platform.
//!
//! Pipeline: raw CSV rows -> [`schema`] -> [`util`] normalization ->
//! [`loader`] records -> [`estate`] totals -> [`projection`] (which drives
//! [`sizing`] and [`pricing`] once per year) -> [`reports`].

pub mod config;
pub mod error;
pub mod estate;
pub mod loader;
pub mod output;
pub mod pricing;
pub mod projection;
pub mod reports;
pub mod sample;
pub mod schema;
pub mod sizing;
pub mod types;
pub mod util;

pub use config::AnalysisConfig;
pub use error::{EngineError, Result};
pub use projection::{project, EngineInputs};
pub use types::{AssetRecord, EstateTotals, Projection, YearlyProjection};
