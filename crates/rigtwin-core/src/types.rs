//! Tabular dataset model shared by the ingest pipeline and the graph layer.
//!
//! A workbook is an ordered set of named sheets; a sheet is a header row
//! plus data rows of scalar cells aligned to that header by position.
//! Cells keep their source type: comparisons between cells are exact,
//! with no coercion between numeric and text forms.

use serde::{Deserialize, Serialize};

// ── Cells ─────────────────────────────────────────────────────────

/// A single scalar cell from a spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// True for cells that carry no value and are dropped from property maps.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The text content, if this cell is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "null"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ── Sheets ────────────────────────────────────────────────────────

/// One worksheet: a header row and its data rows.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// Sheet name as it appears on the workbook tab.
    pub name: String,
    /// Ordered column names from the first row.
    pub header: Vec<String>,
    /// Data rows, each aligned to `header` by position.
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Resolve a column name to its position in the header, exact match only.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|h| h == column)
    }

    /// The cell at (row, column index), if present.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// An ordered collection of sheets loaded from one workbook file.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Look up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

// ── Join rules ────────────────────────────────────────────────────

/// Declarative cross-sheet relationship: rows of `sheet_name` whose
/// `join_column` value exactly equals a `target_join_column` value in
/// `target_sheet_name` get a `relationship_type` edge between the
/// corresponding graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRule {
    pub sheet_name: String,
    pub join_column: String,
    pub target_sheet_name: String,
    pub target_join_column: String,
    pub relationship_type: String,
}
