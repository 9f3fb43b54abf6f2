//! Aggregates shown next to the topic chart: key figures and answer distributions.

use crate::config::*;
use crate::filter::FilteredView;

/// The preparedness answers shown as key figures.
pub const PREPAREDNESS_ANSWERS: [&str; 3] = ["Em partes", "Sim", "Não"];

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Kpis {
    pub responses: u64,
    /// Counts for each of [`PREPAREDNESS_ANSWERS`], if the question is in the file.
    pub preparedness: Option<Vec<(String, u64)>>,
}

pub fn kpis(view: &FilteredView) -> Kpis {
    let dataset = view.dataset();
    let preparedness = if dataset.columns().is_resolved(Field::Preparedness) {
        Some(
            PREPAREDNESS_ANSWERS
                .iter()
                .map(|answer| {
                    let n = view
                        .rows()
                        .filter(|r| dataset.value(r, Field::Preparedness) == Some(*answer))
                        .count() as u64;
                    (answer.to_string(), n)
                })
                .collect(),
        )
    } else {
        None
    };
    Kpis {
        responses: view.len() as u64,
        preparedness,
    }
}

/// How often each answer to a question occurs in the view.
///
/// Answers are trimmed and blank answers skipped. The most frequent answers come
/// first; equal counts keep the order in which the answers first appear. Returns
/// `None` when the question is not in the file.
pub fn value_counts(view: &FilteredView, field: Field) -> Option<Vec<(String, u64)>> {
    let dataset = view.dataset();
    if !dataset.columns().is_resolved(field) {
        return None;
    }
    let mut counts: Vec<(String, u64)> = Vec::new();
    for row in view.rows() {
        let v = match dataset.value(row, field).map(|s| s.trim()) {
            Some(s) if !s.is_empty() => s,
            _ => continue,
        };
        match counts.iter_mut().find(|(name, _)| name == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Some(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample;
    use crate::filter::filter_rows;

    #[test]
    fn preparedness_figures() {
        let ds = sample();
        let k = kpis(&FilteredView::all(&ds));
        assert_eq!(k.responses, 4);
        assert_eq!(
            k.preparedness,
            Some(vec![
                ("Em partes".to_string(), 2),
                ("Sim".to_string(), 1),
                ("Não".to_string(), 1),
            ])
        );
    }

    #[test]
    fn preparedness_missing_from_file() {
        let headers = vec!["Departamento".to_string()];
        let ds = Dataset::new(&headers, vec![vec![Some("TI".to_string())]]);
        let k = kpis(&FilteredView::all(&ds));
        assert_eq!(k.responses, 1);
        assert_eq!(k.preparedness, None);
    }

    #[test]
    fn distributions_are_trimmed_and_sorted() {
        let ds = sample();
        let formats = value_counts(&FilteredView::all(&ds), Field::Format).unwrap();
        assert_eq!(
            formats,
            vec![
                ("Online".to_string(), 2),
                ("Presencial".to_string(), 1),
                ("Híbrido".to_string(), 1),
            ]
        );
        let periods = value_counts(&FilteredView::all(&ds), Field::Period).unwrap();
        assert_eq!(
            periods,
            vec![("Manhã".to_string(), 3), ("Tarde".to_string(), 1)]
        );
    }

    #[test]
    fn distributions_follow_the_view() {
        let ds = sample();
        let view = filter_rows(&ds, &Selection::new().with(Field::Site, "Agência"));
        let formats = value_counts(&view, Field::Format).unwrap();
        assert_eq!(
            formats,
            vec![("Presencial".to_string(), 1), ("Online".to_string(), 1)]
        );
        assert_eq!(value_counts(&FilteredView::all(&Dataset::empty()), Field::Format), None);
    }
}
