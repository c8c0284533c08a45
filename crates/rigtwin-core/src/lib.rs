//! rigtwin-core: shared types, configuration, and error handling for the
//! rigtwin asset graph loader.
//!
//! This crate provides the foundational pieces used across all rigtwin
//! components:
//! - The tabular dataset model (workbooks, sheets, cells) the pipeline runs on
//! - Join-rule records for configuration-driven relationships
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::IngestConfig;
pub use error::CoreError;
pub use types::{CellValue, JoinRule, Sheet, Workbook};
