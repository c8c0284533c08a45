//! Per-stage outcome counters and the end-of-run summary.
//!
//! Every stage tolerates per-item failures; the counters make those
//! failures visible at the end of the run instead of leaving them buried
//! in the log stream.

/// Outcomes for one pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
    /// Upserts that reached the store and succeeded.
    pub succeeded: usize,
    /// Upserts or lookups the store rejected.
    pub failed: usize,
    /// Items not attempted (missing columns, missing equipment, empty rows).
    pub skipped: usize,
}

/// Aggregated outcomes for a full ingest run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Hierarchy rows upserted as nodes.
    pub nodes: StageStats,
    /// Functional-location rows linked under the platform root.
    pub platform_links: StageStats,
    /// Parameter observations attached to equipment. `skipped` counts
    /// whole rows whose equipment node was absent.
    pub parameters: StageStats,
    /// Join-rule relationships merged. `skipped` counts rules that could
    /// not be applied at all.
    pub relationships: StageStats,
}

impl RunReport {
    /// Emit the one-line structured summary for the run.
    pub fn log_summary(&self) {
        tracing::info!(
            nodes = self.nodes.succeeded,
            node_failures = self.nodes.failed,
            nodes_skipped = self.nodes.skipped,
            platform_links = self.platform_links.succeeded,
            platform_link_failures = self.platform_links.failed,
            parameters = self.parameters.succeeded,
            parameter_failures = self.parameters.failed,
            parameter_rows_skipped = self.parameters.skipped,
            relationships = self.relationships.succeeded,
            relationship_failures = self.relationships.failed,
            rules_skipped = self.relationships.skipped,
            "Ingest complete"
        );
    }
}
