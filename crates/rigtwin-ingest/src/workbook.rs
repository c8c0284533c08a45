//! Workbook deserialization into the core dataset model.
//!
//! Both source files are `.xlsx` workbooks fetched as bytes; `calamine`
//! reads them from an in-memory cursor. The first row of every sheet is
//! its header; remaining rows become [`CellValue`] rows aligned to that
//! header by position.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use rigtwin_core::types::{CellValue, Sheet, Workbook};

use crate::error::Result;

/// Parse workbook bytes into sheets of typed cells.
pub fn parse_workbook(bytes: &[u8]) -> Result<Workbook> {
    let mut xlsx: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let names: Vec<String> = xlsx.sheet_names().to_owned();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = xlsx.worksheet_range(&name)?;
        let mut rows = range.rows();

        let header: Vec<String> = rows
            .next()
            .map(|cells| cells.iter().map(header_name).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<CellValue>> = rows
            .map(|cells| cells.iter().map(cell_to_value).collect())
            .collect();

        tracing::debug!(sheet = %name, columns = header.len(), rows = rows.len(), "Sheet parsed");
        sheets.push(Sheet { name, header, rows });
    }

    Ok(Workbook { sheets })
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert one calamine cell into its typed form. Error cells carry no
/// usable value and map to null, like empty cells.
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Text(naive.to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as FixtureWorkbook;

    /// Build an in-memory xlsx with one hierarchy sheet and one
    /// parameters sheet, the shape the loader consumes.
    fn fixture_bytes() -> Vec<u8> {
        let mut wb = FixtureWorkbook::new();

        let equi = wb.add_worksheet();
        equi.set_name("EQUI").unwrap();
        equi.write_string(0, 0, "ID").unwrap();
        equi.write_string(0, 1, "Description").unwrap();
        equi.write_number(1, 0, 1).unwrap();
        equi.write_string(1, 1, "Pump A").unwrap();
        // Row with a hole in the Description column.
        equi.write_number(2, 0, 2).unwrap();

        let params = wb.add_worksheet();
        params.set_name("Pump A").unwrap();
        params.write_string(0, 0, "Seq").unwrap();
        params.write_string(0, 1, "Timestamp").unwrap();
        params.write_string(0, 2, "Pressure").unwrap();
        params.write_number(1, 0, 1).unwrap();
        params.write_string(1, 1, "2024-01-01").unwrap();
        params.write_number(1, 2, 55).unwrap();

        wb.save_to_buffer().unwrap()
    }

    #[test]
    fn test_parse_fixture_workbook() {
        let workbook = parse_workbook(&fixture_bytes()).unwrap();
        assert_eq!(workbook.sheets.len(), 2);

        let equi = workbook.sheet("EQUI").unwrap();
        assert_eq!(equi.header, vec!["ID", "Description"]);
        assert_eq!(equi.rows.len(), 2);
        // xlsx stores numbers as floats.
        assert_eq!(equi.rows[0][0], CellValue::Float(1.0));
        assert_eq!(equi.rows[0][1], CellValue::Text("Pump A".to_string()));
        assert_eq!(equi.rows[1][1], CellValue::Null);

        let params = workbook.sheet("Pump A").unwrap();
        assert_eq!(params.header, vec!["Seq", "Timestamp", "Pressure"]);
        assert_eq!(params.rows[0][1], CellValue::Text("2024-01-01".to_string()));
        assert_eq!(params.rows[0][2], CellValue::Float(55.0));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_to_value(&Data::Empty), CellValue::Null);
        assert_eq!(
            cell_to_value(&Data::String("Pump A".to_string())),
            CellValue::Text("Pump A".to_string())
        );
        assert_eq!(cell_to_value(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(cell_to_value(&Data::Float(55.5)), CellValue::Float(55.5));
        assert_eq!(cell_to_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cell_to_value(&Data::DateTimeIso("2024-01-01T00:00:00".to_string())),
            CellValue::Text("2024-01-01T00:00:00".to_string())
        );
    }
}
