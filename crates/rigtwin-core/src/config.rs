//! Configuration for the rigtwin ingest job.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (`RIGTWIN__` prefix)
//! 2. Config file (`rigtwin.toml`)
//! 3. Defaults

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::JoinRule;

/// Top-level ingest configuration.
///
/// Loaded from `rigtwin.toml` or `RIGTWIN__`-prefixed environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Neo4j connection settings.
    #[serde(default)]
    pub neo4j: Neo4jConfig,

    /// Blob source for the two workbook files.
    #[serde(default)]
    pub source: SourceConfig,

    /// Root platform node the location hierarchy hangs from.
    #[serde(default)]
    pub root: RootConfig,

    /// Cross-sheet join rules applied after node materialization.
    #[serde(default)]
    pub joins: Vec<JoinRule>,
}

impl IngestConfig {
    /// Load configuration from `{file_prefix}.toml` (optional) layered
    /// under `RIGTWIN`-prefixed environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("RIGTWIN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = cfg.try_deserialize::<Self>()?;
        tracing::debug!(prefix = %file_prefix, "Configuration loaded");
        Ok(config)
    }
}

/// Neo4j endpoint and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jConfig {
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,

    #[serde(default = "default_neo4j_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,
}

/// Where the workbook blobs live.
///
/// The endpoint is any HTTP(S) base that serves `GET
/// {endpoint}/{bucket}/{key}`, such as a public bucket or a MinIO-style
/// development endpoint. Provider authentication is out of scope for
/// this job.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// HTTP(S) base URL of the object store.
    #[serde(default)]
    pub endpoint: String,

    /// Bucket holding both workbook objects.
    #[serde(default)]
    pub bucket: String,

    /// Object key of the equipment/location hierarchy workbook.
    #[serde(default = "default_hierarchy_key")]
    pub hierarchy_key: String,

    /// Object key of the operating-parameters workbook.
    #[serde(default = "default_parameters_key")]
    pub parameters_key: String,
}

/// The singleton root node all functional locations link under.
#[derive(Debug, Clone, Deserialize)]
pub struct RootConfig {
    /// Node label. Must be a plain identifier.
    #[serde(default = "default_root_label")]
    pub label: String,

    /// Value of the root's `name` property.
    #[serde(default = "default_root_name")]
    pub name: String,
}

fn default_neo4j_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

fn default_hierarchy_key() -> String {
    "sap_hierarchy.xlsx".to_string()
}

fn default_parameters_key() -> String {
    "operating_parameters.xlsx".to_string()
}

fn default_root_label() -> String {
    "Platform".to_string()
}

fn default_root_name() -> String {
    "Northstar".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            bucket: String::new(),
            hierarchy_key: default_hierarchy_key(),
            parameters_key: default_parameters_key(),
        }
    }
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: default_neo4j_uri(),
            user: default_neo4j_user(),
            password: String::new(),
        }
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            label: default_root_label(),
            name: default_root_name(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            neo4j: Neo4jConfig::default(),
            source: SourceConfig::default(),
            root: RootConfig::default(),
            joins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IngestConfig::default();
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.source.hierarchy_key, "sap_hierarchy.xlsx");
        assert_eq!(config.root.label, "Platform");
        assert_eq!(config.root.name, "Northstar");
        assert!(config.joins.is_empty());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let raw = r#"
            [neo4j]
            uri = "bolt://graph.internal:7687"
            user = "loader"
            password = "s3cret"

            [source]
            endpoint = "https://blobs.example.com"
            bucket = "northstar-exports"
            hierarchy_key = "hierarchy/latest.xlsx"

            [root]
            name = "Northstar_Platform"

            [[joins]]
            sheet_name = "EQUI"
            join_column = "ID"
            target_sheet_name = "FLOC"
            target_join_column = "EQUI_ID"
            relationship_type = "LOCATED_AT"
        "#;

        let config: IngestConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.neo4j.uri, "bolt://graph.internal:7687");
        assert_eq!(config.source.bucket, "northstar-exports");
        assert_eq!(config.source.hierarchy_key, "hierarchy/latest.xlsx");
        // Unset keys fall back to defaults.
        assert_eq!(config.source.parameters_key, "operating_parameters.xlsx");
        assert_eq!(config.root.label, "Platform");
        assert_eq!(config.root.name, "Northstar_Platform");

        assert_eq!(config.joins.len(), 1);
        let rule = &config.joins[0];
        assert_eq!(rule.sheet_name, "EQUI");
        assert_eq!(rule.target_join_column, "EQUI_ID");
        assert_eq!(rule.relationship_type, "LOCATED_AT");
    }
}
