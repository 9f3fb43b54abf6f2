//! Finding the survey questions in the spreadsheet header.

use log::debug;

use crate::config::*;

/// Collapses every run of whitespace (including line breaks) into a single space
/// and trims the ends.
///
/// Spreadsheet exports often split long question titles across several lines.
pub fn clean_header(header: &str) -> String {
    header.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Returns the first header, in order, that starts with the given prefix, ignoring
/// case. The headers are expected to be cleaned already (see [`clean_header`]).
pub fn resolve_column(headers: &[String], prefix: &str) -> Option<ColumnRef> {
    let prefix_lower = prefix.to_lowercase();
    headers
        .iter()
        .enumerate()
        .find(|(_, h)| h.to_lowercase().starts_with(prefix_lower.as_str()))
        .map(|(index, h)| ColumnRef {
            index,
            name: h.clone(),
        })
}

impl ColumnMapping {
    /// Resolves all the logical fields against a header row.
    pub fn resolve(headers: &[String]) -> ColumnMapping {
        let mut mapping = ColumnMapping::unresolved();
        for field in Field::ALL {
            match resolve_column(headers, field.header_prefix()) {
                Some(col) => {
                    debug!("resolve: {:?} -> {:?}", field, col);
                    mapping.columns.insert(field, col);
                }
                None => {
                    debug!("resolve: {:?} not found in header", field);
                }
            }
        }
        mapping
    }
}
