// Primitives for reading CSV extracts.

use calamine::DataType;

use crate::dash::io_common::RawTable;
use crate::dash::*;

fn csv_cell(s: &str) -> DataType {
    if s.trim().is_empty() {
        DataType::Empty
    } else {
        DataType::String(s.to_string())
    }
}

/// Reads a CSV file with a header line. All the cells are kept as text and
/// converted when the typed tables are built.
pub fn read_csv_table(path: String) -> BDashResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .context(OpeningCsvSnafu { path: path.clone() })?;
    let mut records = rdr.into_records();

    let header: Vec<String> = records
        .next()
        .context(EmptySourceSnafu { path: path.clone() })?
        .context(CsvLineParseSnafu { path: path.clone() })?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    debug!("read_csv_table: {}: header: {:?}", path, header);

    let mut rows: Vec<Vec<DataType>> = Vec::new();
    for line_r in records {
        let line = line_r.context(CsvLineParseSnafu { path: path.clone() })?;
        let row: Vec<DataType> = line.iter().map(csv_cell).collect();
        rows.push(row);
    }
    info!("Read {} rows from {}", rows.len(), path);
    Ok(RawTable { path, header, rows })
}
