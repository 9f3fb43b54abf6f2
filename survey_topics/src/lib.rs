/*!
Core of the training-needs survey dashboard.

The pipeline is linear and recomputed from scratch on every interaction:

1. [`Dataset::new`] cleans the header row and resolves the logical survey
   [`Field`]s to columns by prefix (see [`resolve_column`]).
2. [`filter_rows`] keeps the rows matching the selected values and the search
   keyword, comparing the keyword without case or accents ([`normalize`]).
3. [`TopicTable::count`] tags the free-text answers of the remaining rows with
   the training topics.

```
use survey_topics::*;

let headers = vec!["Departamento".to_string(), "Gostaria de sugerir".to_string()];
let dataset = Dataset::new(
    &headers,
    vec![
        vec![Some("TI".to_string()), Some("Curso de Power BI".to_string())],
        vec![Some("Comercial".to_string()), Some("Técnicas de negociação".to_string())],
    ],
);
let view = filter_rows(&dataset, &Selection::new().with_keyword("negociacao"));
assert_eq!(view.len(), 1);
let counts = TopicTable::builtin().count(&view);
assert_eq!(counts[0].name, "Vendas/Negociação");
assert_eq!(counts[0].count, 1);
```
*/
mod columns;
mod config;
mod dataset;
mod filter;
mod normalize;
pub mod summary;
mod topics;

pub use crate::columns::{clean_header, resolve_column};
pub use crate::config::*;
pub use crate::filter::{filter_rows, FilteredView};
pub use crate::normalize::normalize;
pub use crate::topics::{Topic, TopicTable, DEFAULT_TOPICS};
