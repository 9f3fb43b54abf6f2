use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_topics::*;

use std::fs;
use std::io;
use std::path::Path;

use crate::args::Args;
use crate::lnt::config_reader::*;
use crate::lnt::io_common::*;
use crate::lnt::report::*;
use crate::lnt::session::Session;

pub mod cache;
pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_example;
pub mod io_excel;
pub mod report;
pub mod session;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} does not contain a header row"))]
    EmptyInput { path: String },
    #[snafu(display("Could not find the worksheet {name:?}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Could not parse line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson { source: std::io::Error, path: String },
    #[snafu(display("Error parsing the JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error reading the commands"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("Error writing to {path}"))]
    WritingOutput { source: std::io::Error, path: String },
    #[snafu(display("Invalid topic definitions"))]
    InvalidTopics { source: SurveyError },
    #[snafu(display("Unknown field {name:?}"))]
    UnknownField { name: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

/// Reads the responses from the given source.
pub fn read_survey_data(source: &InputSource) -> DashResult<Dataset> {
    match source {
        InputSource::File {
            path,
            kind,
            worksheet,
            ..
        } => {
            let p = path.display().to_string();
            info!("Attempting to read survey file {:?} as {:?}", p, kind);
            match kind {
                SourceKind::Xlsx => io_excel::read_excel_survey(&p, worksheet.as_deref()),
                SourceKind::Csv => io_csv::read_csv_survey(&p),
            }
        }
        InputSource::Example => Ok(io_example::example_dataset()),
    }
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let settings = build_settings(args)?;
    debug!("run_dashboard: settings: {:?}", settings);

    let source = resolve_source(&settings.input, Path::new("."));
    info!("run_dashboard: source: {:?}", source);

    let mut session = Session::new(source, settings.selection, settings.topics);

    if settings.interactive {
        let stdin = io::stdin();
        return session.run(stdin.lock(), io::stdout());
    }

    let (report, notice) = session.report();
    if let Some(msg) = notice {
        eprintln!("{}", msg);
    }
    print!("{}", render_text(&report));

    let pretty_js = serde_json::to_string_pretty(&report).context(ParsingJsonSnafu {})?;

    if let Some(out) = settings.out {
        if out == "stdout" {
            println!("{}", pretty_js);
        } else {
            fs::write(&out, format!("{}\n", pretty_js))
                .context(WritingOutputSnafu { path: out.clone() })?;
            info!("run_dashboard: report written to {:?}", out);
        }
    }

    // The reference report, if provided for comparison
    if let Some(reference_p) = settings.reference {
        let report_js = serde_json::to_value(&report).context(ParsingJsonSnafu {})?;
        if !matches_reference(&report_js, &reference_p)? {
            warn!("Found differences with the reference report");
            whatever!("Difference detected between the computed report and the reference report")
        }
    }

    Ok(())
}
