use log::debug;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use survey_topics::{Field, Selection, TopicTable};

use crate::args::Args;
use crate::lnt::*;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(default)]
    pub department: Vec<String>,
    #[serde(default)]
    pub site: Vec<String>,
    #[serde(default)]
    pub period: Vec<String>,
    #[serde(default)]
    pub format: Vec<String>,
    #[serde(default)]
    pub preparedness: Vec<String>,
    pub keyword: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TopicDefinition {
    pub name: String,
    pub pattern: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashConfig {
    pub input: Option<InputSettings>,
    #[serde(default)]
    pub filters: FilterSettings,
    /// Replaces the built-in topic table when present.
    pub topics: Option<Vec<TopicDefinition>>,
}

/// The input the user asked for, before looking at the file system.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct InputRequest {
    pub path: Option<String>,
    pub kind: Option<SourceKind>,
    pub worksheet: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: InputRequest,
    pub selection: Selection,
    pub topics: TopicTable,
    pub out: Option<String>,
    pub reference: Option<String>,
    pub interactive: bool,
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Merges the command line with the configuration file, if any. The command line
/// wins when both specify a value.
pub fn build_settings(args: &Args) -> DashResult<RunSettings> {
    let (config, config_dir) = match &args.config {
        Some(p) => (read_config(p)?, Path::new(p).parent().map(|d| d.to_path_buf())),
        None => (DashConfig::default(), None),
    };
    let input_cfg = config.input.clone().unwrap_or_default();

    let path: Option<String> = match (&args.input, &input_cfg.file_path) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) => match &config_dir {
            Some(dir) => Some(dir.join(p).display().to_string()),
            None => Some(p.clone()),
        },
        (None, None) => None,
    };

    let kind = match args.input_type.as_ref().or(input_cfg.provider.as_ref()) {
        Some(provider) => Some(SourceKind::from_provider(provider)?),
        None => None,
    };

    let input = InputRequest {
        path,
        kind,
        worksheet: args
            .excel_worksheet_name
            .clone()
            .or(input_cfg.excel_worksheet_name),
    };

    let filters = &config.filters;
    let mut selection = Selection::new();
    for (field, from_args, from_config) in [
        (Field::Department, &args.department, &filters.department),
        (Field::Site, &args.site, &filters.site),
        (Field::Period, &args.period, &filters.period),
        (Field::Format, &args.format, &filters.format),
        (Field::Preparedness, &args.preparedness, &filters.preparedness),
    ] {
        let values = if from_args.is_empty() {
            from_config
        } else {
            from_args
        };
        for v in values {
            selection.select(field, v);
        }
    }
    selection.set_keyword(args.keyword.as_deref().or(filters.keyword.as_deref()));

    let topics = match &config.topics {
        Some(defs) => {
            let pairs: Vec<(String, String)> = defs
                .iter()
                .map(|d| (d.name.clone(), d.pattern.clone()))
                .collect();
            TopicTable::new(&pairs).context(InvalidTopicsSnafu {})?
        }
        None => TopicTable::builtin().clone(),
    };

    Ok(RunSettings {
        input,
        selection,
        topics,
        out: args.out.clone(),
        reference: args.reference.clone(),
        interactive: args.interactive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lnt::io_common::tests::scratch_dir;

    #[test]
    fn parses_config_file() {
        let js = r#"{
            "input": {"filePath": "respostas.xlsx", "excelWorksheetName": "Form1"},
            "filters": {"department": ["TI"], "keyword": "sisbr"},
            "topics": [{"name": "Sistemas", "pattern": "sisbr|sigas"}]
        }"#;
        let config: DashConfig = serde_json::from_str(js).unwrap();
        assert_eq!(
            config.input.unwrap().excel_worksheet_name,
            Some("Form1".to_string())
        );
        assert_eq!(config.filters.department, vec!["TI".to_string()]);
        assert!(config.filters.site.is_empty());
        assert_eq!(config.topics.unwrap()[0].name, "Sistemas");

        let empty: DashConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, DashConfig::default());
    }

    #[test]
    fn command_line_only() {
        let args = Args {
            department: vec!["TI".to_string(), "RH".to_string()],
            keyword: Some("excel".to_string()),
            input_type: Some("csv".to_string()),
            ..Args::default()
        };
        let s = build_settings(&args).unwrap();
        assert_eq!(s.input.path, None);
        assert_eq!(s.input.kind, Some(SourceKind::Csv));
        assert_eq!(s.selection.values(Field::Department), &["TI", "RH"]);
        assert_eq!(s.selection.keyword(), Some("excel"));
        assert_eq!(s.topics.topics().len(), 11);
    }

    #[test]
    fn command_line_overrides_config() {
        let dir = scratch_dir("config");
        let cfg_p = dir.join("dash.json");
        fs::write(
            &cfg_p,
            r#"{"input": {"filePath": "data.csv", "provider": "csv"},
                "filters": {"department": ["TI"], "site": ["Sede"], "keyword": "sisbr"},
                "topics": [{"name": "Planilhas", "pattern": "excel"}]}"#,
        )
        .unwrap();
        let args = Args {
            config: Some(cfg_p.display().to_string()),
            department: vec!["Comercial".to_string()],
            ..Args::default()
        };
        let s = build_settings(&args).unwrap();
        assert_eq!(
            s.input.path,
            Some(dir.join("data.csv").display().to_string())
        );
        assert_eq!(s.selection.values(Field::Department), &["Comercial"]);
        assert_eq!(s.selection.values(Field::Site), &["Sede"]);
        assert_eq!(s.selection.keyword(), Some("sisbr"));
        assert_eq!(s.topics.topics().len(), 1);
    }

    #[test]
    fn invalid_settings() {
        let dir = scratch_dir("config-invalid");
        let cfg_p = dir.join("dash.json");
        fs::write(&cfg_p, r#"{"topics": [{"name": "X", "pattern": "(oops"}]}"#).unwrap();
        let args = Args {
            config: Some(cfg_p.display().to_string()),
            ..Args::default()
        };
        assert!(matches!(
            build_settings(&args),
            Err(DashError::InvalidTopics { .. })
        ));

        let args = Args {
            config: Some(dir.join("missing.json").display().to_string()),
            ..Args::default()
        };
        assert!(matches!(
            build_settings(&args),
            Err(DashError::OpeningJson { .. })
        ));

        fs::write(&cfg_p, "{not json").unwrap();
        let args = Args {
            config: Some(cfg_p.display().to_string()),
            ..Args::default()
        };
        assert!(matches!(
            build_settings(&args),
            Err(DashError::ParsingJson { .. })
        ));
    }
}
