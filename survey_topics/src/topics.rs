use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::config::*;
use crate::filter::FilteredView;

/// The training topics, as (name, pattern) pairs, in presentation order.
///
/// The patterns are applied to lowercased text that still carries its accents,
/// which is why they list both spellings of accented letters.
pub const DEFAULT_TOPICS: [(&str, &str); 11] = [
    ("Gestão e Liderança", r"gest[ãa]o|lideran[çc]a"),
    (
        "Oratória/Comunicação",
        r"orat[óo]ria|comunica[çc][ãa]o|falar em p[úu]blico",
    ),
    (
        "Inteligência Emocional",
        r"intelig[êe]ncia emocional|gest[ãa]o emocional",
    ),
    (
        "Produtividade/Organização",
        r"produtividade|organiza[çc][ãa]o|gest[ãa]o do tempo",
    ),
    (
        "Vendas/Negociação",
        r"vendas?|negocia[çc][ãa]o|prospec[çc][ãa]o|fechamento",
    ),
    ("Power BI/Excel/HP12C", r"power\s*bi|excel|vba|hp\s*12c|hp12c"),
    ("Investimentos/CPA/CEA", r"cpa\s*20|cea|investimento|fundos?"),
    ("Crédito Rural", r"cr[ée]dito rural|mcr|fbb420"),
    (
        "Produtos (Previdência/Seguros/Sipag)",
        r"previd[êe]ncia|seguros?|sipag",
    ),
    ("Sistemas (SISBR/SIGAS)", r"sisbr|sigas|sicoobnet"),
    ("Cobrança/Repactuação", r"cobran[çc]a|repactua[çc][ãa]o"),
];

static DEFAULT_TABLE: Lazy<TopicTable> = Lazy::new(|| {
    let defs: Vec<(String, String)> = DEFAULT_TOPICS
        .iter()
        .map(|(n, p)| (n.to_string(), p.to_string()))
        .collect();
    TopicTable::new(&defs).expect("built-in topic patterns are valid")
});

#[derive(Debug, Clone)]
pub struct Topic {
    pub name: String,
    pattern: Regex,
}

impl Topic {
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// True if the pattern occurs anywhere in the text.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// An ordered set of named patterns.
#[derive(Debug, Clone)]
pub struct TopicTable {
    topics: Vec<Topic>,
}

impl TopicTable {
    /// Compiles a topic table. The names must be unique.
    pub fn new(defs: &[(String, String)]) -> Result<TopicTable, SurveyError> {
        if defs.is_empty() {
            return Err(SurveyError::EmptyTopicTable);
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut topics: Vec<Topic> = Vec::new();
        for (name, pat) in defs.iter() {
            if !seen.insert(name.as_str()) {
                return Err(SurveyError::DuplicateTopic { name: name.clone() });
            }
            let pattern = Regex::new(pat).map_err(|e| SurveyError::InvalidTopicPattern {
                name: name.clone(),
                message: e.to_string(),
            })?;
            topics.push(Topic {
                name: name.clone(),
                pattern,
            });
        }
        Ok(TopicTable { topics })
    }

    /// The built-in training topics.
    pub fn builtin() -> &'static TopicTable {
        &DEFAULT_TABLE
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// The names of all the topics found in a piece of text. The text is
    /// lowercased first.
    pub fn classify_text(&self, text: &str) -> Vec<&str> {
        let lower = text.to_lowercase();
        self.topics
            .iter()
            .filter(|t| t.matches(&lower))
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Counts, for each topic, the rows of the view whose free text mentions it.
    ///
    /// A row can be counted by several topics. The result is sorted by decreasing
    /// count; topics with the same count keep the order of the table.
    pub fn count(&self, view: &FilteredView) -> Vec<TopicCount> {
        let dataset = view.dataset();
        let texts: Vec<String> = view
            .rows()
            .map(|r| dataset.free_text(r).to_lowercase())
            .collect();
        let mut res: Vec<TopicCount> = self
            .topics
            .iter()
            .map(|t| {
                let count = texts.iter().filter(|txt| t.matches(txt)).count() as u64;
                debug!("count: topic {:?}: {}", t.name, count);
                TopicCount {
                    name: t.name.clone(),
                    count,
                }
            })
            .collect();
        // sort_by is stable
        res.sort_by(|a, b| b.count.cmp(&a.count));
        info!(
            "count: {} rows, {} topics with matches",
            texts.len(),
            res.iter().filter(|tc| tc.count > 0).count()
        );
        res
    }
}
