//! CSV reading with per-column type inference.
//!
//! A column whose non-empty cells all parse as integers becomes integer,
//! else float, else boolean (`true`/`false`), else text. The `id` column
//! always stays text. Empty cells are left out of the row.

use std::io::Read;
use std::path::Path;

use projgraph_core::{Error, Result};
use projgraph_store::PropertyMap;

const ID_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut ints = true;
        let mut floats = true;
        let mut bools = true;
        let mut any = false;

        for cell in cells.filter(|c| !c.is_empty()) {
            any = true;
            ints &= cell.parse::<i64>().is_ok();
            floats &= cell.parse::<f64>().is_ok();
            bools &= parse_bool(cell).is_some();
        }

        match (any, ints, floats, bools) {
            (false, ..) => Self::Text,
            (true, true, ..) => Self::Integer,
            (true, false, true, _) => Self::Float,
            (true, false, false, true) => Self::Boolean,
            _ => Self::Text,
        }
    }

    fn convert(self, cell: &str) -> serde_json::Value {
        let converted = match self {
            Self::Integer => cell.parse::<i64>().ok().map(serde_json::Value::from),
            Self::Float => cell
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number),
            Self::Boolean => parse_bool(cell).map(serde_json::Value::Bool),
            Self::Text => None,
        };
        converted.unwrap_or_else(|| serde_json::Value::String(cell.to_string()))
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Read project rows from a CSV file.
pub fn read_rows(path: &Path) -> Result<Vec<PropertyMap>> {
    let file = std::fs::File::open(path)?;
    parse_rows(file, &path.display().to_string())
}

/// Parse project rows from CSV text. `source` names the input in errors.
pub fn parse_rows<R: Read>(input: R, source: &str) -> Result<Vec<PropertyMap>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let id_index = headers
        .iter()
        .position(|h| h == ID_COLUMN)
        .ok_or_else(|| Error::Validation(format!("{}: missing '{}' column", source, ID_COLUMN)))?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.get(id_index).map_or(true, str::is_empty) {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(Error::Validation(format!(
                "{}: line {} has an empty '{}'",
                source, line, ID_COLUMN
            )));
        }
        records.push(record);
    }

    let column_types: Vec<ColumnType> = (0..headers.len())
        .map(|col| {
            if col == id_index {
                ColumnType::Text
            } else {
                ColumnType::infer(records.iter().map(|r| r.get(col).unwrap_or("")))
            }
        })
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .zip(&column_types)
                .zip(record.iter())
                .filter(|(_, cell)| !cell.is_empty())
                .map(|((header, column_type), cell)| (header.clone(), column_type.convert(cell)))
                .collect::<PropertyMap>()
        })
        .collect();

    Ok(rows)
}
