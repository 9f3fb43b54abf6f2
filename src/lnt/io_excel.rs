// Reading the survey export from an Excel workbook.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;
use survey_topics::Dataset;

use crate::lnt::io_common::dataset_from_records;
use crate::lnt::*;

/// Reads the responses from a worksheet: the named one if provided, the first one
/// otherwise. The first row is the header.
pub fn read_excel_survey(path: &str, worksheet: Option<&str>) -> DashResult<Dataset> {
    debug!(
        "read_excel_survey: path: {:?} worksheet: {:?}",
        path, worksheet
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyInputSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyInputSnafu { path })?
        .iter()
        .map(cell_to_string)
        .collect();
    debug!("read_excel_survey: header: {:?}", header);

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        debug!("read_excel_survey: idx: {:?} row: {:?}", idx, row);
        records.push(row.iter().map(cell_to_string).collect());
    }
    Ok(dataset_from_records(&header, records))
}

/// The text of a cell, as displayed by the spreadsheet. Numbers that are whole are
/// written without decimals.
#[allow(unreachable_patterns)]
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(f) => f.to_string(),
        DataType::Empty => String::new(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lnt::io_common::tests::scratch_dir;
    use std::fs;

    #[test]
    fn cells_as_text() {
        assert_eq!(cell_to_string(&DataType::String("Sede".to_string())), "Sede");
        assert_eq!(cell_to_string(&DataType::Int(3)), "3");
        assert_eq!(cell_to_string(&DataType::Float(2.0)), "2");
        assert_eq!(cell_to_string(&DataType::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&DataType::Bool(true)), "true");
        assert_eq!(cell_to_string(&DataType::Empty), "");
    }

    #[test]
    fn unreadable_workbook() {
        let dir = scratch_dir("excel");
        let p = dir.join("broken.xlsx");
        fs::write(&p, "this is not a zip archive").unwrap();
        let res = read_excel_survey(&p.display().to_string(), None);
        assert!(matches!(res, Err(DashError::OpeningExcel { .. })));

        let missing = dir.join("missing.xlsx");
        let res = read_excel_survey(&missing.display().to_string(), None);
        assert!(matches!(res, Err(DashError::OpeningExcel { .. })));
    }
}
