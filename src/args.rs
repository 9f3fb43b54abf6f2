use clap::Parser;

/// Training-needs survey dashboard: filters the responses of a survey spreadsheet,
/// tags the free-text answers with training topics and prints the summary.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the input, filter and topic settings.
    /// Relative paths inside it are resolved against the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path or empty) The survey spreadsheet. If not provided, the first .xlsx file
    /// of the current directory is used, and if there is none, a small example dataset.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (xlsx or csv, default from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (repeatable) Only keep the responses from this department.
    #[clap(long, value_parser)]
    pub department: Vec<String>,

    /// (repeatable) Only keep the responses from this site.
    #[clap(long, value_parser)]
    pub site: Vec<String>,

    /// (repeatable) Only keep the responses preferring this period.
    #[clap(long, value_parser)]
    pub period: Vec<String>,

    /// (repeatable) Only keep the responses preferring this training format.
    #[clap(long, value_parser)]
    pub format: Vec<String>,

    /// (repeatable) Only keep the responses with this preparedness answer.
    #[clap(long, value_parser)]
    pub preparedness: Vec<String>,

    /// Only keep the responses whose free-text answers contain this keyword,
    /// ignoring case and accents (ex.: SISBR, oratoria, CPA 20).
    #[clap(short, long, value_parser)]
    pub keyword: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the report will be written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference report in JSON format. If provided, the computed report is
    /// compared to it and the differences are printed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Reads commands from the standard input to change the filters interactively.
    #[clap(long, takes_value = false)]
    pub interactive: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
