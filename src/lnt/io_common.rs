use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use survey_topics::Dataset;

use crate::lnt::config_reader::InputRequest;
use crate::lnt::*;
use snafu::prelude::*;

/// The supported spreadsheet formats.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SourceKind {
    Xlsx,
    Csv,
}

impl SourceKind {
    pub fn from_provider(provider: &str) -> DashResult<SourceKind> {
        match provider.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(SourceKind::Xlsx),
            "csv" => Ok(SourceKind::Csv),
            x => whatever!("Provider not implemented {:?}", x),
        }
    }

    /// Guesses the format from the file extension. Anything that is not a csv file
    /// is read as a workbook.
    pub fn from_path(path: &Path) -> SourceKind {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SourceKind::Csv,
            _ => SourceKind::Xlsx,
        }
    }
}

/// Where the responses come from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum InputSource {
    File {
        path: PathBuf,
        kind: SourceKind,
        worksheet: Option<String>,
        /// The file was not requested but found in the working directory.
        discovered: bool,
    },
    /// The built-in example responses.
    Example,
}

impl InputSource {
    pub fn file(path: &str) -> InputSource {
        let path = PathBuf::from(path);
        InputSource::File {
            kind: SourceKind::from_path(&path),
            path,
            worksheet: None,
            discovered: false,
        }
    }

    pub fn label(&self) -> String {
        match self {
            InputSource::File { path, .. } => simplify_file_name(path),
            InputSource::Example => "example data".to_string(),
        }
    }
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Picks the input: the requested file if it exists, otherwise the first workbook of
/// the search directory, otherwise the example data.
pub fn resolve_source(req: &InputRequest, search_dir: &Path) -> InputSource {
    if let Some(p) = &req.path {
        let path = PathBuf::from(p);
        if path.exists() {
            return InputSource::File {
                kind: req.kind.unwrap_or_else(|| SourceKind::from_path(&path)),
                path,
                worksheet: req.worksheet.clone(),
                discovered: false,
            };
        }
        warn!(
            "resolve_source: input file {:?} does not exist, looking into {:?}",
            p, search_dir
        );
    }
    match find_default_workbook(search_dir) {
        Some(path) => {
            info!("resolve_source: using the workbook found: {:?}", path);
            InputSource::File {
                path,
                kind: SourceKind::Xlsx,
                worksheet: req.worksheet.clone(),
                discovered: true,
            }
        }
        None => InputSource::Example,
    }
}

/// The first .xlsx file of the directory, by name. Office lock files are skipped.
pub fn find_default_workbook(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut workbooks: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            let is_xlsx = p
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("xlsx"))
                .unwrap_or(false);
            let is_lock = simplify_file_name(p).starts_with("~$");
            is_xlsx && !is_lock
        })
        .collect();
    workbooks.sort();
    debug!("find_default_workbook: {:?}: {:?}", dir, workbooks);
    workbooks.into_iter().next()
}

/// Assembles a dataset from a header row and the raw text of the data rows.
///
/// Rows where every cell is blank are dropped.
pub fn dataset_from_records(header: &[String], records: Vec<Vec<String>>) -> Dataset {
    let rows: Vec<Vec<Option<String>>> = records
        .into_iter()
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .map(|r| {
            r.into_iter()
                .map(|c| if c.is_empty() { None } else { Some(c) })
                .collect()
        })
        .collect();
    Dataset::new(header, rows)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use survey_topics::Field;

    /// A fresh scratch directory for a test.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lntdash-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn request(path: Option<&str>) -> InputRequest {
        InputRequest {
            path: path.map(|s| s.to_string()),
            kind: None,
            worksheet: None,
        }
    }

    #[test]
    fn kinds() {
        assert_eq!(SourceKind::from_path(Path::new("a/b.CSV")), SourceKind::Csv);
        assert_eq!(SourceKind::from_path(Path::new("b.xlsx")), SourceKind::Xlsx);
        assert_eq!(SourceKind::from_provider("Excel").unwrap(), SourceKind::Xlsx);
        assert!(SourceKind::from_provider("ods").is_err());
    }

    #[test]
    fn falls_back_to_example_data() {
        let dir = scratch_dir("empty");
        assert_eq!(resolve_source(&request(None), &dir), InputSource::Example);
        let missing = dir.join("nope.xlsx");
        assert_eq!(
            resolve_source(&request(missing.to_str()), &dir),
            InputSource::Example
        );
    }

    #[test]
    fn discovers_first_workbook() {
        let dir = scratch_dir("discover");
        for name in ["b.xlsx", "a.xlsx", "~$a.xlsx", "notes.txt"] {
            fs::write(dir.join(name), "x").unwrap();
        }
        match resolve_source(&request(None), &dir) {
            InputSource::File {
                path, discovered, ..
            } => {
                assert_eq!(simplify_file_name(&path), "a.xlsx");
                assert!(discovered);
            }
            x => panic!("unexpected source {:?}", x),
        }
    }

    #[test]
    fn requested_file_wins() {
        let dir = scratch_dir("requested");
        fs::write(dir.join("a.xlsx"), "x").unwrap();
        let p = dir.join("answers.csv");
        fs::write(&p, "Departamento\nTI\n").unwrap();
        match resolve_source(&request(p.to_str()), &dir) {
            InputSource::File {
                kind, discovered, ..
            } => {
                assert_eq!(kind, SourceKind::Csv);
                assert!(!discovered);
            }
            x => panic!("unexpected source {:?}", x),
        }
    }

    #[test]
    fn blank_records_dropped() {
        let header = vec!["Departamento".to_string(), "Lotação".to_string()];
        let ds = dataset_from_records(
            &header,
            vec![
                vec!["TI".to_string(), "".to_string()],
                vec!["".to_string(), "  ".to_string()],
                vec!["RH".to_string(), "Sede".to_string()],
            ],
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.value(&ds.rows()[0], Field::Site), None);
        assert_eq!(ds.value(&ds.rows()[1], Field::Site), Some("Sede"));
    }
}
