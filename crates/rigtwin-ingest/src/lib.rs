//! rigtwin-ingest: workbook-to-Neo4j loader for the rigtwin asset graph.
//!
//! Fetches the SAP hierarchy and operating-parameters workbooks from blob
//! storage, materializes their rows as nodes, links functional locations
//! under the platform root, attaches parameter time series to equipment,
//! and applies configuration-driven join relationships.

pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod workbook;
