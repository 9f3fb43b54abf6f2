use log::{debug, info};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use survey_topics::summary::{kpis, value_counts};
use survey_topics::{Field, FilteredView, TopicTable};
use text_diff::print_diff;

use crate::lnt::*;

const BAR_WIDTH: u64 = 40;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CountEntry {
    pub label: String,
    pub count: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct KpiReport {
    pub responses: u64,
    pub preparedness: Option<Vec<CountEntry>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RecordsReport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Everything the dashboard displays for one state of the filters.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub source: String,
    /// Field key -> header of the column, or null when the question is not in the file.
    pub columns: BTreeMap<String, Option<String>>,
    pub kpis: KpiReport,
    pub topics: Vec<CountEntry>,
    pub formats: Option<Vec<CountEntry>>,
    pub periods: Option<Vec<CountEntry>>,
    #[serde(rename = "filterOptions")]
    pub filter_options: BTreeMap<String, Vec<String>>,
    pub records: RecordsReport,
}

fn to_entries(counts: Vec<(String, u64)>) -> Vec<CountEntry> {
    counts
        .into_iter()
        .map(|(label, count)| CountEntry { label, count })
        .collect()
}

pub fn build_report(source: &str, view: &FilteredView, topics: &TopicTable) -> DashboardReport {
    let dataset = view.dataset();

    let columns: BTreeMap<String, Option<String>> = dataset
        .columns()
        .entries()
        .into_iter()
        .map(|(f, col)| (f.key().to_string(), col.map(|c| c.name.clone())))
        .collect();

    // The options come from the whole table, not from the filtered rows.
    let filter_options: BTreeMap<String, Vec<String>> = Field::CATEGORICAL
        .iter()
        .filter(|f| dataset.columns().is_resolved(**f))
        .map(|f| (f.key().to_string(), dataset.distinct_values(*f)))
        .collect();

    let k = kpis(view);
    let topic_counts = topics
        .count(view)
        .into_iter()
        .map(|tc| CountEntry {
            label: tc.name,
            count: tc.count,
        })
        .collect();

    let records = RecordsReport {
        headers: dataset.headers().to_vec(),
        rows: view.rows().map(|r| r.cells.clone()).collect(),
    };
    debug!("build_report: {} records", records.rows.len());

    DashboardReport {
        source: source.to_string(),
        columns,
        kpis: KpiReport {
            responses: k.responses,
            preparedness: k.preparedness.map(to_entries),
        },
        topics: topic_counts,
        formats: value_counts(view, Field::Format).map(to_entries),
        periods: value_counts(view, Field::Period).map(to_entries),
        filter_options,
        records,
    }
}

fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let n = (count * BAR_WIDTH + max - 1) / max;
    "#".repeat(n as usize)
}

fn render_counts(out: &mut String, title: &str, entries: &[CountEntry]) {
    out.push_str(&format!("\n{}\n", title));
    let max = entries.iter().map(|e| e.count).max().unwrap_or(0);
    let width = entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    for e in entries {
        let pad = width - e.label.chars().count();
        out.push_str(&format!(
            "  {}{} {:>4} {}\n",
            e.label,
            " ".repeat(pad),
            e.count,
            bar(e.count, max)
        ));
    }
}

/// Plain text rendering of the report: key figures, charts as bars of `#` and a
/// short preview of the records.
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("LNT - Demandas de Treinamento ({})\n", report.source));
    out.push_str(&format!("Respostas: {}\n", report.kpis.responses));
    if let Some(prep) = &report.kpis.preparedness {
        let figures: Vec<String> = prep
            .iter()
            .map(|e| format!("Preparo {}: {}", e.label, e.count))
            .collect();
        out.push_str(&format!("{}\n", figures.join(" | ")));
    }

    render_counts(&mut out, "Demandas de Treinamento por Tema", &report.topics);
    if let Some(formats) = &report.formats {
        render_counts(&mut out, "Formato de Treinamento Preferido", formats);
    }
    if let Some(periods) = &report.periods {
        render_counts(&mut out, "Melhor Período para Treinamentos", periods);
    }

    out.push_str(&format!(
        "\nRegistros filtrados: {}\n",
        report.records.rows.len()
    ));
    for row in report.records.rows.iter() {
        let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
        out.push_str(&format!("  {}\n", cells.join(" | ")));
    }
    out
}

/// Compares a report with a reference report stored in a file. Both sides are
/// pretty-printed with sorted keys and the differences are printed.
pub fn matches_reference(report_js: &JSValue, reference_path: &str) -> DashResult<bool> {
    let contents = std::fs::read_to_string(reference_path).context(OpeningJsonSnafu {
        path: reference_path,
    })?;
    let reference: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let pretty_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    let pretty_js = serde_json::to_string_pretty(report_js).context(ParsingJsonSnafu {})?;
    if pretty_ref == pretty_js {
        info!("matches_reference: identical to {:?}", reference_path);
        Ok(true)
    } else {
        print_diff(pretty_ref.as_str(), pretty_js.as_str(), "\n");
        Ok(false)
    }
}
