use calamine::DataType;

use crate::dash::*;

/// A sheet as read from any provider: a header and the cells below it.
///
/// Line numbers start at 1 with the header, to respect the conventions of
/// the spreadsheet world.
#[derive(PartialEq, Debug, Clone)]
pub struct RawTable {
    pub path: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<DataType>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name.trim())
    }

    pub fn require_column(&self, name: &str) -> DashResult<usize> {
        self.column_index(name).context(MissingColumnSnafu {
            column: name,
            path: self.path.clone(),
        })
    }

    pub fn drop_last_row(&mut self) {
        if let Some(last) = self.rows.pop() {
            debug!("drop_last_row: {}: dropping {:?}", self.path, last);
        }
    }
}

pub fn header_name(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Empty => "".to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        x => format!("{:?}", x),
    }
}

static EMPTY_CELL: DataType = DataType::Empty;

// Short rows are padded with empty cells.
pub fn cell_at(row: &[DataType], idx: usize) -> &DataType {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

/// Reads a text cell. Blank cells are missing.
pub fn read_text(cell: &DataType, lineno: usize, column: &str) -> DashResult<Option<String>> {
    match cell {
        DataType::String(s) if s.trim().is_empty() => Ok(None),
        DataType::String(s) => Ok(Some(s.trim().to_string())),
        DataType::Empty => Ok(None),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Bool(b) => Ok(Some(b.to_string())),
        _ => WrongCellTypeSnafu {
            lineno: lineno as u64,
            column,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

/// Reads a number of hours. Blank cells are missing.
pub fn read_number(cell: &DataType, lineno: usize, column: &str) -> DashResult<Option<f64>> {
    match cell {
        DataType::Float(f) => Ok(Some(*f)),
        DataType::Int(i) => Ok(Some(*i as f64)),
        DataType::Empty => Ok(None),
        DataType::String(s) if s.trim().is_empty() => Ok(None),
        DataType::String(s) => match s.trim().parse::<f64>() {
            Ok(x) => Ok(Some(x)),
            Err(_) => WrongCellTypeSnafu {
                lineno: lineno as u64,
                column,
                content: s.clone(),
            }
            .fail(),
        },
        _ => WrongCellTypeSnafu {
            lineno: lineno as u64,
            column,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
