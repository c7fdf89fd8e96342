use calamine::{DataType, Range};

use crate::dash::io_common::{header_name, RawTable};
use crate::dash::*;

pub fn read_excel_table(path: String, cfs: &FileSource) -> BDashResult<RawTable> {
    let wrange = get_range(&path, cfs)?;
    let table = range_to_table(path, &wrange)?;
    Ok(table)
}

/// Splits a worksheet into its header (the first row) and the rows below it.
pub fn range_to_table(path: String, wrange: &Range<DataType>) -> DashResult<RawTable> {
    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptySourceSnafu { path: path.clone() })?
        .iter()
        .map(header_name)
        .collect();
    debug!("range_to_table: {}: header: {:?}", path, header);
    let rows: Vec<Vec<DataType>> = iter.map(|row| row.to_vec()).collect();
    info!("Read {} rows from {}", rows.len(), path);
    Ok(RawTable { path, header, rows })
}

/// The worksheet to read: the configured one, else the first of the workbook.
fn pick_worksheet(path: &str, sheet_names: &[String], cfs: &FileSource) -> DashResult<String> {
    match &cfs.worksheet_name {
        Some(name) => {
            if !sheet_names.contains(name) {
                return MissingWorksheetSnafu {
                    path,
                    worksheet: name.clone(),
                }
                .fail();
            }
            Ok(name.clone())
        }
        None => {
            let first = sheet_names.first().context(EmptySourceSnafu { path })?;
            if sheet_names.len() > 1 {
                warn!(
                    "get_range: {} has several worksheets and none was configured, using the first one",
                    path
                );
            }
            Ok(first.clone())
        }
    }
}

fn get_range(path: &str, cfs: &FileSource) -> BDashResult<Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &cfs.worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let worksheet = pick_worksheet(path, workbook.sheet_names(), cfs)?;
    let wrange = workbook
        .worksheet_range(&worksheet)
        .context(MissingWorksheetSnafu {
            path,
            worksheet: worksheet.clone(),
        })?
        .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> DataType {
        DataType::String(s.to_string())
    }

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    fn source(worksheet: Option<&str>) -> FileSource {
        FileSource {
            table: "capacity".to_string(),
            provider: "xlsx".to_string(),
            file_path: "Horas_auditor.xlsx".to_string(),
            worksheet_name: worksheet.map(|w| w.to_string()),
            drop_last_row: None,
            column_names: None,
        }
    }

    #[test]
    fn header_and_rows() {
        let mut r: Range<DataType> = Range::new((0, 0), (2, 1));
        r.set_value((0, 0), cell("Entidad"));
        r.set_value((0, 1), cell("Horas Presupuestadas en 2024"));
        r.set_value((1, 0), cell("Banco"));
        r.set_value((1, 1), DataType::Float(120.0));
        r.set_value((2, 0), cell("Total"));
        r.set_value((2, 1), DataType::Int(120));
        let t = range_to_table("Libro 2.xlsx".to_string(), &r).unwrap();
        assert_eq!(t.header, vec!["Entidad", "Horas Presupuestadas en 2024"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0][1], DataType::Float(120.0));
    }

    #[test]
    fn empty_range() {
        let r: Range<DataType> = Range::empty();
        assert!(matches!(
            range_to_table("vacio.xlsx".to_string(), &r),
            Err(DashError::EmptySource { .. })
        ));
    }

    #[test]
    fn worksheet_by_name() {
        let sheets = names(&["Resumen", "Hoja1"]);
        let name = pick_worksheet("h.xlsx", &sheets, &source(Some("Hoja1"))).unwrap();
        assert_eq!(name, "Hoja1");
        assert!(matches!(
            pick_worksheet("h.xlsx", &sheets, &source(Some("Hoja2"))),
            Err(DashError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn first_worksheet_by_default() {
        let sheets = names(&["Resumen", "Hoja1"]);
        let name = pick_worksheet("h.xlsx", &sheets, &source(None)).unwrap();
        assert_eq!(name, "Resumen");
        assert!(matches!(
            pick_worksheet("h.xlsx", &[], &source(None)),
            Err(DashError::EmptySource { .. })
        ));
    }

    #[test]
    fn missing_workbook() {
        let path = "/nonexistent/Datos.xlsx".to_string();
        let res = read_excel_table(path, &source(None)).map_err(|e| *e);
        assert!(matches!(res, Err(DashError::OpeningExcel { .. })));
    }
}
