// Primitives for reading CSV files.

use log::{debug, warn};
use snafu::prelude::*;
use survey_topics::Dataset;

use crate::lnt::io_common::dataset_from_records;
use crate::lnt::*;

/// Reads the responses from a CSV file whose first line is the header. Lines may
/// have fewer or more fields than the header. Cells are kept as written.
///
/// Files that are not valid UTF-8 are read as Latin-1, the encoding Excel uses
/// when exporting CSV files on Portuguese systems.
pub fn read_csv_survey(path: &str) -> DashResult<Dataset> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut lines: Vec<csv::ByteRecord> = Vec::new();
    for (idx, line_r) in rdr.into_byte_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_survey: lineno: {:?} row: {:?}", lineno, line);
        lines.push(line);
    }

    let utf8 = lines
        .iter()
        .all(|l| std::str::from_utf8(l.as_slice()).is_ok());
    if !utf8 {
        warn!("read_csv_survey: {:?} is not valid UTF-8, reading it as Latin-1", path);
    }
    let decode = |cell: &[u8]| -> String {
        if utf8 {
            String::from_utf8_lossy(cell).into_owned()
        } else {
            cell.iter().map(|b| *b as char).collect()
        }
    };

    let mut iter = lines.into_iter();
    let header: Vec<String> = iter
        .next()
        .context(EmptyInputSnafu { path })?
        .iter()
        .map(decode)
        .collect();
    debug!("read_csv_survey: header: {:?}", header);

    let res: Vec<Vec<String>> = iter.map(|l| l.iter().map(decode).collect()).collect();
    Ok(dataset_from_records(&header, res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lnt::io_common::tests::scratch_dir;
    use std::fs;
    use survey_topics::{filter_rows, Field, Selection};

    #[test]
    fn reads_multiline_headers() {
        let dir = scratch_dir("csv");
        let p = dir.join("respostas.csv");
        fs::write(
            &p,
            "Departamento,\"Em quais\n  conhecimentos?\",Gostaria de sugerir\n\
             TI,Power BI,SISBR\n\
             ,,\n\
             Comercial,\"Vendas, negociação\"\n",
        )
        .unwrap();
        let ds = read_csv_survey(&p.display().to_string()).unwrap();
        assert_eq!(ds.headers()[1], "Em quais conhecimentos?");
        assert!(ds.columns().is_resolved(Field::KnowledgeGaps));
        assert!(!ds.columns().is_resolved(Field::Site));
        assert_eq!(ds.len(), 2);
        let last = &ds.rows()[1];
        assert_eq!(ds.value(last, Field::KnowledgeGaps), Some("Vendas, negociação"));
        assert_eq!(ds.value(last, Field::Suggestion), None);
    }

    #[test]
    fn cells_are_not_trimmed() {
        let dir = scratch_dir("csv-padded");
        let p = dir.join("respostas.csv");
        fs::write(&p, "Departamento,Lotação\n TI ,Sede\nTI,Sede\n").unwrap();
        let ds = read_csv_survey(&p.display().to_string()).unwrap();
        assert_eq!(ds.value(&ds.rows()[0], Field::Department), Some(" TI "));
        let view = filter_rows(&ds, &Selection::new().with(Field::Department, " TI "));
        assert_eq!(view.indices(), &[0]);
        let view = filter_rows(&ds, &Selection::new().with(Field::Department, "TI"));
        assert_eq!(view.indices(), &[1]);
    }

    #[test]
    fn latin1_files() {
        let dir = scratch_dir("csv-latin1");
        let p = dir.join("respostas.csv");
        // "Lotação" and "Agência" in Latin-1
        let mut bytes: Vec<u8> = b"Departamento,Lota\xe7\xe3o\n".to_vec();
        bytes.extend_from_slice(b"TI,Ag\xeancia\n");
        fs::write(&p, bytes).unwrap();
        let ds = read_csv_survey(&p.display().to_string()).unwrap();
        assert!(ds.columns().is_resolved(Field::Site));
        assert_eq!(ds.value(&ds.rows()[0], Field::Site), Some("Agência"));
    }

    #[test]
    fn empty_and_missing_files() {
        let dir = scratch_dir("csv-empty");
        let p = dir.join("vazio.csv");
        fs::write(&p, "").unwrap();
        assert!(matches!(
            read_csv_survey(&p.display().to_string()),
            Err(DashError::EmptyInput { .. })
        ));
        assert!(matches!(
            read_csv_survey(&dir.join("nope.csv").display().to_string()),
            Err(DashError::CsvOpen { .. })
        ));
    }
}
