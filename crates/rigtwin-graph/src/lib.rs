//! rigtwin-graph: Neo4j access layer for the rigtwin asset graph.
//!
//! Provides the shared [`GraphClient`], the validated Cypher pattern
//! builder, and the MERGE-based mutations and read queries the ingest
//! pipeline issues.

pub mod client;
pub mod cypher;
pub mod mutations;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
