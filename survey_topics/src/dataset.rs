use log::{debug, info};
use std::collections::BTreeSet;

use crate::columns::clean_header;
use crate::config::*;

impl Dataset {
    /// Builds a response table from a header row and the data rows.
    ///
    /// The headers are cleaned and the logical fields resolved. Empty cells become
    /// `None`; rows shorter than the header are padded.
    pub fn new(headers: &[String], rows: Vec<Vec<Option<String>>>) -> Dataset {
        let headers: Vec<String> = headers.iter().map(|h| clean_header(h)).collect();
        debug!("Dataset::new: headers: {:?}", headers);
        let columns = ColumnMapping::resolve(&headers);
        let width = headers.len();
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|cells| {
                let mut cells: Vec<Option<String>> = cells
                    .into_iter()
                    .map(|c| c.filter(|s| !s.is_empty()))
                    .collect();
                if cells.len() < width {
                    cells.resize(width, None);
                }
                Row { cells }
            })
            .collect();
        info!(
            "Dataset::new: {} rows, {} columns, {} fields resolved",
            rows.len(),
            width,
            Field::ALL
                .iter()
                .filter(|f| columns.is_resolved(**f))
                .count()
        );
        Dataset {
            headers,
            rows,
            columns,
        }
    }

    /// The table used when nothing could be loaded: no rows, no resolved field.
    pub fn empty() -> Dataset {
        Dataset {
            headers: Vec::new(),
            rows: Vec::new(),
            columns: ColumnMapping::unresolved(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The answer of a row for a logical field, if the field is resolved and the
    /// cell is not empty.
    pub fn value<'a>(&self, row: &'a Row, field: Field) -> Option<&'a str> {
        let col = self.columns.get(field)?;
        row.cells.get(col.index)?.as_deref()
    }

    /// The free-text answers of a row joined by single spaces.
    ///
    /// Unresolved fields are skipped; empty cells of resolved fields count as
    /// empty strings.
    pub fn free_text(&self, row: &Row) -> String {
        Field::FREE_TEXT
            .iter()
            .filter(|f| self.columns.is_resolved(**f))
            .map(|f| self.value(row, *f).unwrap_or(""))
            .collect::<Vec<&str>>()
            .join(" ")
    }

    /// The sorted distinct non-empty values of a field, used to populate the
    /// selection widgets. Empty if the field is not resolved.
    pub fn distinct_values(&self, field: Field) -> Vec<String> {
        if !self.columns.is_resolved(field) {
            return Vec::new();
        }
        let values: BTreeSet<&str> = self
            .rows
            .iter()
            .filter_map(|r| self.value(r, field))
            .collect();
        values.into_iter().map(|s| s.to_string()).collect()
    }
}
