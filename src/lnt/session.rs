//! The interactive mode: one command per line, each one followed by a full
//! filter, classify and render pass over the cached table.

use log::{debug, info};
use std::io::{BufRead, Write};

use snafu::prelude::*;
use survey_topics::{filter_rows, Field, Selection, TopicTable};

use crate::lnt::cache::DatasetCache;
use crate::lnt::report::{build_report, render_text, DashboardReport};
use crate::lnt::*;

const HELP: &str = "Commands:
  select <field> <value>   keep the responses with this value (repeat to add values)
  clear [field]            remove the selection of a field, or all the filters
  keyword [text]           search the free-text answers, or stop searching
  load <path>              read another spreadsheet
  options <field>          list the values of a field
  fields                   list the fields and their columns
  show                     print the report again
  help
  quit
Fields: department, site, knowledgeGaps, trainingTypes, suggestion, format, period, preparedness";

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Command {
    Select(Field, String),
    Clear(Option<Field>),
    Keyword(Option<String>),
    Load(String),
    Options(Field),
    Fields,
    Show,
    Help,
    Quit,
}

/// The answer to a command.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

fn parse_field(name: &str) -> DashResult<Field> {
    Field::from_key(name).context(UnknownFieldSnafu { name })
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (s, ""),
    }
}

pub fn parse_command(line: &str) -> DashResult<Command> {
    let (cmd, rest) = split_word(line);
    let command = match cmd.to_lowercase().as_str() {
        "select" => {
            let (field, value) = split_word(rest);
            if value.is_empty() {
                whatever!("Usage: select <field> <value>")
            }
            Command::Select(parse_field(field)?, value.to_string())
        }
        "clear" if rest.is_empty() => Command::Clear(None),
        "clear" => Command::Clear(Some(parse_field(rest)?)),
        "keyword" if rest.is_empty() => Command::Keyword(None),
        "keyword" => Command::Keyword(Some(rest.to_string())),
        "load" if rest.is_empty() => whatever!("Usage: load <path>"),
        "load" => Command::Load(rest.to_string()),
        "options" => Command::Options(parse_field(rest)?),
        "fields" => Command::Fields,
        "show" | "" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        x => whatever!("Unknown command {:?}, type 'help' for the list of commands", x),
    };
    Ok(command)
}

pub struct Session {
    cache: DatasetCache,
    source: InputSource,
    selection: Selection,
    topics: TopicTable,
}

impl Session {
    pub fn new(source: InputSource, selection: Selection, topics: TopicTable) -> Session {
        Session {
            cache: DatasetCache::new(),
            source,
            selection,
            topics,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Runs one pass over the current table and selection. Also returns the message
    /// about how the table was loaded, when this pass loaded it.
    pub fn report(&mut self) -> (DashboardReport, Option<String>) {
        let (loaded, fresh) = self.cache.fetch(&self.source);
        let view = filter_rows(&loaded.dataset, &self.selection);
        let report = build_report(&loaded.source.label(), &view, &self.topics);
        let notice = if fresh { loaded.notice.clone() } else { None };
        (report, notice)
    }

    fn render(&mut self) -> String {
        let (report, notice) = self.report();
        match notice {
            Some(msg) => format!("{}\n{}", msg, render_text(&report)),
            None => render_text(&report),
        }
    }

    pub fn apply(&mut self, command: Command) -> Reply {
        debug!("Session::apply: {:?}", command);
        let text = match command {
            Command::Select(field, value) => {
                self.selection.select(field, &value);
                self.render()
            }
            Command::Clear(Some(field)) => {
                self.selection.clear(field);
                self.render()
            }
            Command::Clear(None) => {
                self.selection.clear_all();
                self.render()
            }
            Command::Keyword(kw) => {
                self.selection.set_keyword(kw.as_deref());
                self.render()
            }
            Command::Load(path) => {
                self.source = InputSource::file(&path);
                info!("Session::apply: switching to {:?}", self.source);
                self.render()
            }
            Command::Options(field) => {
                let loaded = self.cache.get_or_load(&self.source);
                if loaded.dataset.columns().is_resolved(field) {
                    loaded.dataset.distinct_values(field).join("\n")
                } else {
                    format!("The field {} is not in the file", field.key())
                }
            }
            Command::Fields => {
                let loaded = self.cache.get_or_load(&self.source);
                let lines: Vec<String> = loaded
                    .dataset
                    .columns()
                    .entries()
                    .iter()
                    .map(|(f, col)| match col {
                        Some(c) => format!("{}: {} ({})", f.key(), c.name, f.label()),
                        None => format!("{}: (not found)", f.key()),
                    })
                    .collect();
                lines.join("\n")
            }
            Command::Show => self.render(),
            Command::Help => HELP.to_string(),
            Command::Quit => {
                return Reply {
                    text: String::new(),
                    quit: true,
                }
            }
        };
        Reply { text, quit: false }
    }

    /// Handles one line of input. Invalid commands are reported, never fatal.
    pub fn handle(&mut self, line: &str) -> Reply {
        match parse_command(line) {
            Ok(command) => self.apply(command),
            Err(e) => Reply {
                text: e.to_string(),
                quit: false,
            },
        }
    }

    /// Reads commands until the end of the input or `quit`. Lines that are not valid
    /// UTF-8 are decoded lossily.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> DashResult<()> {
        let first = self.render();
        writeln!(output, "{}", first).context(WritingOutputSnafu { path: "stdout" })?;
        let mut buf: Vec<u8> = Vec::new();
        loop {
            buf.clear();
            let n = input
                .read_until(b'\n', &mut buf)
                .context(ReadingInputSnafu {})?;
            if n == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let reply = self.handle(line.trim_end_matches(&['\r', '\n'][..]));
            if reply.quit {
                break;
            }
            writeln!(output, "{}", reply.text).context(WritingOutputSnafu { path: "stdout" })?;
        }
        Ok(())
    }
}
