//! GarDelta - grouped address-object reports from GAR delta archives
//!
//! This library downloads the periodically published GAR (state address
//! registry) delta archive, extracts it, filters the active address-object
//! records, resolves their hierarchy level codes to display names, and
//! renders a grouped, sorted, fixed-width text report.
//!
//! The pipeline is deliberately single-threaded and synchronous: a delta
//! archive holds a modest number of files and I/O is not a bottleneck.

pub mod archive;
pub mod config;
pub mod pipeline;
pub mod registry;
pub mod report;

pub use config::PipelineConfig;
pub use pipeline::{run_pipeline, PipelineError, PipelineOutcome};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
