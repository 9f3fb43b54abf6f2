// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The survey questions the dashboard knows how to use.
///
/// Each field is looked up in the spreadsheet header by a prefix of the
/// question text, see [`Field::header_prefix`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Field {
    Department,
    Site,
    /// "In which knowledge areas ..." (free text)
    KnowledgeGaps,
    /// "Which kinds of training ..." (free text)
    TrainingTypes,
    /// "Would you like to suggest ..." (free text)
    Suggestion,
    Format,
    Period,
    Preparedness,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Department,
        Field::Site,
        Field::KnowledgeGaps,
        Field::TrainingTypes,
        Field::Suggestion,
        Field::Format,
        Field::Period,
        Field::Preparedness,
    ];

    /// The fields whose answers are searched by keyword and tagged with topics, in
    /// concatenation order.
    pub const FREE_TEXT: [Field; 3] = [
        Field::KnowledgeGaps,
        Field::TrainingTypes,
        Field::Suggestion,
    ];

    /// The multiple-choice fields offered as selection widgets.
    pub const CATEGORICAL: [Field; 5] = [
        Field::Department,
        Field::Site,
        Field::Period,
        Field::Format,
        Field::Preparedness,
    ];

    /// The start of the question text in the survey export.
    pub fn header_prefix(&self) -> &'static str {
        match self {
            Field::Department => "Departamento",
            Field::Site => "Lotação",
            Field::KnowledgeGaps => "Em quais conhecimentos",
            Field::TrainingTypes => "Que tipos de treinamentos",
            Field::Suggestion => "Gostaria de sugerir",
            Field::Format => "Que formato de treinamento",
            Field::Period => "Qual o melhor período",
            Field::Preparedness => "Você sente que está preparado",
        }
    }

    /// Stable identifier used in configuration files and reports.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Department => "department",
            Field::Site => "site",
            Field::KnowledgeGaps => "knowledgeGaps",
            Field::TrainingTypes => "trainingTypes",
            Field::Suggestion => "suggestion",
            Field::Format => "format",
            Field::Period => "period",
            Field::Preparedness => "preparedness",
        }
    }

    /// Short display label, as shown next to the selection widgets.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Department => "Departamento",
            Field::Site => "Lotação",
            Field::KnowledgeGaps => "Conhecimentos",
            Field::TrainingTypes => "Tipos de treinamento",
            Field::Suggestion => "Sugestões",
            Field::Format => "Formato",
            Field::Period => "Período",
            Field::Preparedness => "Preparo",
        }
    }

    /// Parses a field identifier. Accepts the report keys and a few short aliases,
    /// ignoring case.
    pub fn from_key(s: &str) -> Option<Field> {
        let lower = s.trim().to_lowercase();
        let field = match lower.as_str() {
            "department" | "dept" => Field::Department,
            "site" | "location" => Field::Site,
            "knowledgegaps" | "knowledge-gaps" | "gaps" => Field::KnowledgeGaps,
            "trainingtypes" | "training-types" | "types" => Field::TrainingTypes,
            "suggestion" | "sug" => Field::Suggestion,
            "format" | "fmt" => Field::Format,
            "period" => Field::Period,
            "preparedness" | "prep" => Field::Preparedness,
            _ => return None,
        };
        Some(field)
    }
}

/// A resolved spreadsheet column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnRef {
    /// Position of the column in the header row.
    pub index: usize,
    /// The cleaned header text.
    pub name: String,
}

/// The mapping from logical fields to columns. Fields that could not be found in
/// the header are simply missing from the mapping.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnMapping {
    pub(crate) columns: BTreeMap<Field, ColumnRef>,
}

impl ColumnMapping {
    /// A mapping in which no field is resolved.
    pub fn unresolved() -> ColumnMapping {
        ColumnMapping::default()
    }

    pub fn get(&self, field: Field) -> Option<&ColumnRef> {
        self.columns.get(&field)
    }

    pub fn is_resolved(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// All the fields, in declaration order, with their column if any.
    pub fn entries(&self) -> Vec<(Field, Option<&ColumnRef>)> {
        Field::ALL.iter().map(|f| (*f, self.get(*f))).collect()
    }
}

/// One survey response. The cells follow the order of the header row; empty
/// cells are `None`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Row {
    pub cells: Vec<Option<String>>,
}

/// The response table, loaded once per input file.
///
/// It is never mutated after construction: filtering produces views over it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Dataset {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Row>,
    pub(crate) columns: ColumnMapping,
}

/// The values picked in the selection widgets and the search box.
///
/// An empty list of values for a field means that this field is not restricted.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Selection {
    values: BTreeMap<Field, Vec<String>>,
    keyword: Option<String>,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    /// Adds a value to the accepted values of a field. Duplicates are ignored.
    pub fn select(&mut self, field: Field, value: &str) {
        let values = self.values.entry(field).or_default();
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }

    pub fn with(mut self, field: Field, value: &str) -> Selection {
        self.select(field, value);
        self
    }

    pub fn with_keyword(mut self, keyword: &str) -> Selection {
        self.set_keyword(Some(keyword));
        self
    }

    pub fn clear(&mut self, field: Field) {
        self.values.remove(&field);
    }

    pub fn clear_all(&mut self) {
        self.values.clear();
        self.keyword = None;
    }

    pub fn set_keyword(&mut self, keyword: Option<&str>) {
        self.keyword = keyword.map(|s| s.to_string());
    }

    /// The accepted values for a field (empty if not restricted).
    pub fn values(&self, field: Field) -> &[String] {
        self.values.get(&field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The fields that currently restrict the rows.
    pub fn active_fields(&self) -> Vec<Field> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(f, _)| *f)
            .collect()
    }

    /// The search keyword, if it is not blank. It is kept as typed, surrounding
    /// spaces included, so that " de " only finds the whole word.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_fields().is_empty() && self.keyword().is_none()
    }
}

// ******** Output data structures *********

/// The number of responses tagged with a topic.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TopicCount {
    pub name: String,
    pub count: u64,
}

/// Errors when building a custom topic table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SurveyError {
    InvalidTopicPattern { name: String, message: String },
    DuplicateTopic { name: String },
    EmptyTopicTable,
}

impl Error for SurveyError {}

impl Display for SurveyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyError::InvalidTopicPattern { name, message } => {
                write!(f, "invalid pattern for topic {:?}: {}", name, message)
            }
            SurveyError::DuplicateTopic { name } => {
                write!(f, "topic {:?} is defined more than once", name)
            }
            SurveyError::EmptyTopicTable => write!(f, "the topic table is empty"),
        }
    }
}
