//! The four loader stages: node materialization, platform linking,
//! parameter attachment, and configured join relationships.
//!
//! Stages run strictly in sequence and issue one awaited upsert at a
//! time. Failures below the source level never abort sibling work: each
//! row, parameter, and rule is processed independently and its outcome
//! tallied into the run report.

use rigtwin_core::types::{CellValue, JoinRule, Sheet, Workbook};
use rigtwin_graph::GraphClient;

use crate::report::{RunReport, StageStats};

/// Functional-location sheet whose rows link under the platform root.
pub const LOCATION_SHEET: &str = "IFLOT";

// Fixed positional contract with the parameters export: column 0 is a
// sequence field, column 1 the observation timestamp, measurements start
// at column 2.
const TIMESTAMP_COLUMN: usize = 1;
const FIRST_PARAMETER_COLUMN: usize = 2;

/// Run every stage against the two loaded workbooks and report outcomes.
pub async fn run_pipeline(
    graph: &GraphClient,
    root_label: &str,
    root_name: &str,
    rules: &[JoinRule],
    hierarchy: &Workbook,
    parameters: &Workbook,
) -> RunReport {
    let mut report = RunReport::default();

    if let Err(e) = graph.ensure_root(root_label, root_name).await {
        tracing::error!(label = %root_label, name = %root_name, error = %e, "Root node upsert failed");
    }

    materialize_hierarchy(graph, hierarchy, &mut report.nodes).await;
    link_locations(graph, hierarchy, root_label, root_name, &mut report.platform_links).await;
    attach_parameters(graph, parameters, &mut report.parameters).await;
    apply_join_rules(graph, rules, hierarchy, parameters, &mut report.relationships).await;

    report
}

// ── Node Materializer ────────────────────────────────────────────

/// Pair header names with a row's cells, dropping null cells entirely.
pub fn row_properties(header: &[String], row: &[CellValue]) -> Vec<(String, CellValue)> {
    header
        .iter()
        .zip(row.iter())
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Upsert every row of every hierarchy sheet as a node labeled with the
/// sheet name.
pub async fn materialize_hierarchy(
    graph: &GraphClient,
    workbook: &Workbook,
    stats: &mut StageStats,
) {
    for sheet in &workbook.sheets {
        for (row_num, row) in sheet.rows.iter().enumerate() {
            let props = row_properties(&sheet.header, row);
            if props.is_empty() {
                tracing::warn!(sheet = %sheet.name, row = row_num + 2, "Row has no non-null cells, skipping");
                stats.skipped += 1;
                continue;
            }

            match graph.merge_row_node(&sheet.name, &props).await {
                Ok(()) => stats.succeeded += 1,
                Err(e) => {
                    tracing::error!(sheet = %sheet.name, row = row_num + 2, error = %e, "Node upsert failed");
                    stats.failed += 1;
                }
            }
        }
        tracing::info!(sheet = %sheet.name, rows = sheet.rows.len(), "Sheet materialized");
    }
}

// ── Platform Linker ──────────────────────────────────────────────

/// Link every functional-location row to the platform root by its
/// Description. Only the `IFLOT` sheet participates; without a
/// Description column the whole sheet is skipped.
pub async fn link_locations(
    graph: &GraphClient,
    hierarchy: &Workbook,
    root_label: &str,
    root_name: &str,
    stats: &mut StageStats,
) {
    let Some(sheet) = hierarchy.sheet(LOCATION_SHEET) else {
        tracing::info!(sheet = LOCATION_SHEET, "Sheet not present, skipping platform linking");
        return;
    };

    let Some(description_idx) = sheet.column_index("Description") else {
        tracing::error!(sheet = LOCATION_SHEET, "Description column not found, skipping platform linking");
        stats.skipped += sheet.rows.len();
        return;
    };

    for row in &sheet.rows {
        let description = match row.get(description_idx) {
            Some(value) if !value.is_null() => value,
            _ => {
                stats.skipped += 1;
                continue;
            }
        };

        match graph
            .link_root_to(root_label, root_name, LOCATION_SHEET, description)
            .await
        {
            Ok(()) => stats.succeeded += 1,
            Err(e) => {
                tracing::error!(description = %description, error = %e, "Platform link failed");
                stats.failed += 1;
            }
        }
    }
}

// ── Parameter Attacher ───────────────────────────────────────────

/// The measurement cells of one parameters row: (column name, value)
/// for every non-null cell from the first measurement column onward.
pub fn parameter_cells<'a>(
    header: &'a [String],
    row: &'a [CellValue],
) -> Vec<(&'a str, &'a CellValue)> {
    row.iter()
        .enumerate()
        .skip(FIRST_PARAMETER_COLUMN)
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(i, value)| header.get(i).map(|name| (name.as_str(), value)))
        .collect()
}

/// Attach every parameters sheet to its equipment node. The sheet name
/// (trimmed) is the equipment Description; rows for equipment the
/// hierarchy never produced are skipped whole.
pub async fn attach_parameters(graph: &GraphClient, workbook: &Workbook, stats: &mut StageStats) {
    for sheet in &workbook.sheets {
        let equipment = sheet.name.trim();

        for (row_num, row) in sheet.rows.iter().enumerate() {
            let exists = match graph.equipment_exists(equipment).await {
                Ok(exists) => exists,
                Err(e) => {
                    tracing::error!(equipment = %equipment, row = row_num + 2, error = %e, "Equipment lookup failed, abandoning row");
                    stats.failed += 1;
                    continue;
                }
            };
            if !exists {
                tracing::warn!(equipment = %equipment, "No EQUI node with this Description, skipping row");
                stats.skipped += 1;
                continue;
            }

            let timestamp = row
                .get(TIMESTAMP_COLUMN)
                .cloned()
                .unwrap_or(CellValue::Null);

            for (parameter, value) in parameter_cells(&sheet.header, row) {
                match graph
                    .attach_parameter(equipment, parameter, value, &timestamp)
                    .await
                {
                    Ok(()) => stats.succeeded += 1,
                    Err(e) => {
                        tracing::error!(equipment = %equipment, parameter = %parameter, error = %e, "Parameter upsert failed");
                        stats.failed += 1;
                    }
                }
            }
        }
    }
}

// ── Relationship Resolver ────────────────────────────────────────

/// Find a sheet by name, searching the hierarchy workbook first and the
/// parameters workbook second.
fn find_sheet<'a>(
    hierarchy: &'a Workbook,
    parameters: &'a Workbook,
    name: &str,
) -> Option<&'a Sheet> {
    hierarchy.sheet(name).or_else(|| parameters.sheet(name))
}

/// Nested equality join: every source-row value that exactly equals a
/// target-row value, once per matching pair. Null cells never join.
pub fn join_values<'a>(
    source: &'a Sheet,
    source_idx: usize,
    target: &Sheet,
    target_idx: usize,
) -> Vec<&'a CellValue> {
    let mut matches = Vec::new();
    for row in &source.rows {
        let Some(value) = row.get(source_idx) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        for target_row in &target.rows {
            if target_row.get(target_idx) == Some(value) {
                matches.push(value);
            }
        }
    }
    matches
}

/// Apply every configured join rule across the two workbooks.
pub async fn apply_join_rules(
    graph: &GraphClient,
    rules: &[JoinRule],
    hierarchy: &Workbook,
    parameters: &Workbook,
    stats: &mut StageStats,
) {
    for rule in rules {
        tracing::info!(
            source = %rule.sheet_name,
            target = %rule.target_sheet_name,
            relationship = %rule.relationship_type,
            "Applying join rule"
        );

        let Some(source) = find_sheet(hierarchy, parameters, &rule.sheet_name) else {
            tracing::error!(sheet = %rule.sheet_name, "Sheet not found in either workbook, skipping rule");
            stats.skipped += 1;
            continue;
        };
        let Some(target) = find_sheet(hierarchy, parameters, &rule.target_sheet_name) else {
            tracing::error!(sheet = %rule.target_sheet_name, "Sheet not found in either workbook, skipping rule");
            stats.skipped += 1;
            continue;
        };

        let Some(source_idx) = source.column_index(&rule.join_column) else {
            tracing::error!(sheet = %rule.sheet_name, column = %rule.join_column, "Join column not found, skipping rule");
            stats.skipped += 1;
            continue;
        };
        let Some(target_idx) = target.column_index(&rule.target_join_column) else {
            tracing::error!(sheet = %rule.target_sheet_name, column = %rule.target_join_column, "Join column not found, skipping rule");
            stats.skipped += 1;
            continue;
        };

        for value in join_values(source, source_idx, target, target_idx) {
            match graph
                .merge_join_relationship(
                    &rule.sheet_name,
                    &rule.join_column,
                    &rule.target_sheet_name,
                    &rule.target_join_column,
                    &rule.relationship_type,
                    value,
                )
                .await
            {
                Ok(()) => stats.succeeded += 1,
                Err(e) => {
                    tracing::error!(relationship = %rule.relationship_type, error = %e, "Relationship upsert failed");
                    stats.failed += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_row_properties_drop_null_cells() {
        let header = header(&["ID", "Description", "Weight"]);
        let row = vec![
            CellValue::Int(1),
            CellValue::Null,
            CellValue::Float(12.5),
        ];

        let props = row_properties(&header, &row);
        assert_eq!(
            props,
            vec![
                ("ID".to_string(), CellValue::Int(1)),
                ("Weight".to_string(), CellValue::Float(12.5)),
            ]
        );
    }

    #[test]
    fn test_row_properties_empty_row() {
        let header = header(&["ID", "Description"]);
        let row = vec![CellValue::Null, CellValue::Null];
        assert!(row_properties(&header, &row).is_empty());
    }

    #[test]
    fn test_parameter_cells_skip_leading_columns_and_nulls() {
        let header = header(&["Seq", "Timestamp", "Pressure", "Flow", "Vibration"]);
        let row = vec![
            CellValue::Int(1),
            CellValue::Text("2024-01-01".to_string()),
            CellValue::Int(55),
            CellValue::Null,
            CellValue::Float(0.7),
        ];

        let cells = parameter_cells(&header, &row);
        assert_eq!(
            cells,
            vec![
                ("Pressure", &CellValue::Int(55)),
                ("Vibration", &CellValue::Float(0.7)),
            ]
        );
    }

    fn sheet(name: &str, columns: &[&str], rows: Vec<Vec<CellValue>>) -> Sheet {
        Sheet {
            name: name.to_string(),
            header: columns.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_join_values_exact_equality_only() {
        let source = sheet(
            "EQUI",
            &["ID", "Tag"],
            vec![
                vec![CellValue::Int(1), CellValue::Text("A1".to_string())],
                vec![CellValue::Int(2), CellValue::Text("B2".to_string())],
            ],
        );
        let target = sheet(
            "FLOC",
            &["EQUI_ID", "Tag"],
            vec![
                vec![CellValue::Int(1), CellValue::Text("A1 ".to_string())],
                vec![CellValue::Int(3), CellValue::Text("A1".to_string())],
            ],
        );

        // ID join: 1 matches, 2 does not.
        let by_id = join_values(&source, 0, &target, 0);
        assert_eq!(by_id, vec![&CellValue::Int(1)]);

        // Tag join: "A1" matches only the exact "A1", never "A1 ".
        let by_tag = join_values(&source, 1, &target, 1);
        assert_eq!(by_tag, vec![&CellValue::Text("A1".to_string())]);
    }

    #[test]
    fn test_join_values_no_numeric_coercion() {
        let source = sheet("EQUI", &["ID"], vec![vec![CellValue::Int(1)]]);
        let target = sheet("FLOC", &["EQUI_ID"], vec![vec![CellValue::Float(1.0)]]);

        assert!(join_values(&source, 0, &target, 0).is_empty());
    }

    #[test]
    fn test_join_values_null_never_joins() {
        let source = sheet("EQUI", &["ID"], vec![vec![CellValue::Null]]);
        let target = sheet("FLOC", &["EQUI_ID"], vec![vec![CellValue::Null]]);

        assert!(join_values(&source, 0, &target, 0).is_empty());
    }

    #[test]
    fn test_join_values_one_per_matching_pair() {
        let source = sheet("EQUI", &["ID"], vec![vec![CellValue::Int(1)]]);
        let target = sheet(
            "FLOC",
            &["EQUI_ID"],
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(1)]],
        );

        assert_eq!(join_values(&source, 0, &target, 0).len(), 2);
    }
}
