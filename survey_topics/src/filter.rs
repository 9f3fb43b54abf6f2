use log::{debug, info};

use crate::config::*;
use crate::normalize::normalize;

/// A subsequence of the rows of a dataset, in the original order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The view containing every row.
    pub fn all(dataset: &'a Dataset) -> FilteredView<'a> {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Positions of the retained rows in the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        let rows = self.dataset.rows();
        self.indices.iter().map(move |idx| &rows[*idx])
    }
}

/// Applies the selected values and the search keyword to the dataset.
///
/// All the criteria must hold for a row to be kept:
/// - for every field with selected values, the answer must be exactly one of them.
///   Empty answers and unresolved fields never match.
/// - if a keyword is set, its normalized form must appear in the normalized
///   free text of the row (see [`Dataset::free_text`]).
pub fn filter_rows<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    let needle: Option<String> = selection.keyword().map(normalize);
    let active = selection.active_fields();
    debug!(
        "filter_rows: active fields: {:?} needle: {:?}",
        active, needle
    );

    let indices: Vec<usize> = dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active.iter().all(|f| {
                let accepted = selection.values(*f);
                match dataset.value(row, *f) {
                    Some(v) => accepted.iter().any(|a| a == v),
                    None => false,
                }
            })
        })
        .filter(|(_, row)| match needle.as_deref() {
            Some(n) => normalize(&dataset.free_text(row)).contains(n),
            None => true,
        })
        .map(|(idx, _)| idx)
        .collect();

    info!(
        "filter_rows: kept {} of {} rows",
        indices.len(),
        dataset.len()
    );
    FilteredView { dataset, indices }
}
