//! Write operations for the asset graph.
//!
//! All mutations use MERGE (upsert) semantics so a re-run of the loader
//! against unchanged workbooks leaves the graph unchanged. Row nodes are
//! identified by their full non-null property map; parameters and values
//! by the property sets in their MERGE patterns.

use neo4rs::query;

use rigtwin_core::types::CellValue;

use crate::client::{GraphClient, GraphError};
use crate::cypher::{to_bolt, validate_ident, NodePattern};

impl GraphClient {
    // ── Root Node ────────────────────────────────────────────────

    /// Ensure the singleton root node exists, keyed by its name.
    pub async fn ensure_root(&self, label: &str, name: &str) -> Result<(), GraphError> {
        let root = NodePattern::new("p", label)?.prop("name", "name")?;
        let cypher = format!("MERGE {}", root.render());

        self.run(query(&cypher).param("name", name)).await
    }

    // ── Row Nodes ────────────────────────────────────────────────

    /// Upsert one spreadsheet row as a node: label = sheet name,
    /// properties = the row's non-null cells.
    ///
    /// The MERGE keys on the complete property map, so two rows with
    /// identical properties collapse into a single node.
    pub async fn merge_row_node(
        &self,
        label: &str,
        props: &[(String, CellValue)],
    ) -> Result<(), GraphError> {
        let mut pattern = NodePattern::new("n", label)?;
        for (i, (key, _)) in props.iter().enumerate() {
            pattern = pattern.prop(key, &format!("p{i}"))?;
        }

        let cypher = format!("MERGE {}", pattern.render());
        let mut q = query(&cypher);
        for (i, (_, value)) in props.iter().enumerate() {
            q = q.param(&format!("p{i}"), to_bolt(value));
        }

        self.run(q).await
    }

    // ── Root Linking ─────────────────────────────────────────────

    /// Link an existing hierarchy node to the root via `HAS`, matching the
    /// node by its Description and the root by its name. Neither endpoint
    /// is created: if either MATCH finds nothing, no relationship is
    /// written.
    pub async fn link_root_to(
        &self,
        root_label: &str,
        root_name: &str,
        node_label: &str,
        description: &CellValue,
    ) -> Result<(), GraphError> {
        let node = NodePattern::new("n", node_label)?.prop("Description", "description")?;
        let root = NodePattern::new("p", root_label)?.prop("name", "root_name")?;
        let cypher = format!(
            "MATCH {}\nMATCH {}\nMERGE (p)-[:HAS]->(n)",
            node.render(),
            root.render()
        );

        let q = query(&cypher)
            .param("description", to_bolt(description))
            .param("root_name", root_name);
        self.run(q).await
    }

    // ── Parameters ───────────────────────────────────────────────

    /// Attach one observation to an equipment node: merge the Parameter
    /// node under the equipment and the Value node under the parameter.
    ///
    /// The equipment node is matched, never created; a missing equipment
    /// means the statement writes nothing.
    pub async fn attach_parameter(
        &self,
        equipment: &str,
        parameter: &str,
        value: &CellValue,
        timestamp: &CellValue,
    ) -> Result<(), GraphError> {
        let q = query(
            "MATCH (e:EQUI {Description: $equipment})
             MERGE (e)-[:HAS_PARAMETER]->(p:Parameter {name: $parameter})
             MERGE (p)-[:HAS_VALUE]->(v:Value {value: $value, timestamp: $timestamp})",
        )
        .param("equipment", equipment)
        .param("parameter", parameter)
        .param("value", to_bolt(value))
        .param("timestamp", to_bolt(timestamp));

        self.run(q).await
    }

    // ── Join Relationships ───────────────────────────────────────

    /// Merge a configured relationship between a source node matched by
    /// `{source_key: value}` and a target node matched by
    /// `{target_key: value}`. The join value is bound once and reused for
    /// both sides, since the caller only emits exact-equality matches.
    pub async fn merge_join_relationship(
        &self,
        source_label: &str,
        source_key: &str,
        target_label: &str,
        target_key: &str,
        relationship_type: &str,
        value: &CellValue,
    ) -> Result<(), GraphError> {
        validate_ident("relationship type", relationship_type)?;
        let source = NodePattern::new("a", source_label)?.prop(source_key, "value")?;
        let target = NodePattern::new("b", target_label)?.prop(target_key, "value")?;
        let cypher = format!(
            "MATCH {}\nMATCH {}\nMERGE (a)-[:{relationship_type}]->(b)",
            source.render(),
            target.render()
        );

        self.run(query(&cypher).param("value", to_bolt(value))).await
    }
}
