// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use lexis::app_config::{self, Config};
use lexis::audio::{AudioSequencer, CommandSink};
use lexis::lookup::{DebouncedSearch, Lookup};
use lexis::rendering::{escape_attribute, escape_html, is_script_url, typeset_plan, SourceTypesetter};
use lexis::{AppError, Dictionary, SchemaOverride, TermDetail};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all terms, or those containing QUERY (case-insensitive)
    List {
        /// Substring to search for
        query: Option<String>,
    },

    /// Search as you type: one query per stdin line, only settled queries are answered
    Search,

    /// Show the rendered detail of one term
    Show {
        /// Exact term to look up
        term: String,

        /// Print an HTML fragment instead of JSON
        #[arg(long)]
        html: bool,
    },

    /// Play the pronunciation audio of one term
    Play {
        /// Exact term to look up
        term: String,
    },

    /// Print the schema binding in use
    Schema,

    /// Generate shell completions for lexis
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lexis - browsable dictionary over any SQLite table
///
/// Lists, searches and renders dictionary entries. The table and its columns
/// are inferred from the store unless given explicitly.
#[derive(Parser, Debug)]
#[command(name = "lexis")]
#[command(version)]
#[command(about = "Browsable dictionary over an arbitrary SQLite table")]
#[command(long_about = "Lexis lists, searches and renders dictionary entries stored in SQLite.

EXAMPLES:
    lexis list                       # Every term, alphabetically
    lexis list 50%                   # Terms containing the literal text '50%'
    lexis search                     # Read queries from stdin, debounced
    lexis show Force                 # Rendered detail as JSON
    lexis show --html Force          # Rendered detail as an HTML fragment
    lexis play Force                 # Play the pronunciation audio
    lexis --table words --term-column word --definition-column meaning \\
          --audio-column sound schema

SCHEMA:
    Without an override, the first table in name order is used and its first
    four columns are read as term, definition, audio and link. Table, term,
    definition and audio must be overridden together; the link is optional.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "lexis.json")]
    config_path: PathBuf,

    /// Dictionary database path
    #[arg(short, long, env = "LEXIS_DB")]
    database: Option<PathBuf>,

    /// Table holding the dictionary
    #[arg(long, env = "LEXIS_TABLE")]
    table: Option<String>,

    /// Column holding the term
    #[arg(long, env = "LEXIS_TERM_COLUMN")]
    term_column: Option<String>,

    /// Column holding the definition
    #[arg(long, env = "LEXIS_DEFINITION_COLUMN")]
    definition_column: Option<String>,

    /// Column holding audio references
    #[arg(long, env = "LEXIS_AUDIO_COLUMN")]
    audio_column: Option<String>,

    /// Column holding the external link
    #[arg(long, env = "LEXIS_LINK_COLUMN")]
    link_column: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl CommandLineOptions {
    fn schema_override(&self) -> SchemaOverride {
        SchemaOverride {
            table: self.table.clone(),
            term_column: self.term_column.clone(),
            definition_column: self.definition_column.clone(),
            audio_column: self.audio_column.clone(),
            link_column: self.link_column.clone(),
        }
    }
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lexis", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;
    let dictionary = Dictionary::open(&config.database_path, &config.schema)
        .context("Failed to open dictionary")?;

    match cli.command {
        Commands::List { query } => {
            let terms = dictionary.list_terms(query.as_deref()).await?;
            print_json(&terms)?;
        }
        Commands::Search => search_stdin(&dictionary, &config).await?,
        Commands::Show { term, html } => {
            let detail = find_detail(&dictionary, &term).await?;
            if html {
                println!("{}", detail_html(&detail));
            } else {
                print_json(&detail)?;
            }
        }
        Commands::Play { term } => {
            let detail = find_detail(&dictionary, &term).await?;
            if detail.audio.is_empty() {
                warn!("No audio for '{}'", term);
                return Ok(());
            }

            let (program, args) = config
                .audio
                .player
                .split_first()
                .context("Audio player command is empty")?;
            let mut sink = CommandSink::new(program.clone(), args.to_vec())
                .with_timeout(config.audio.play_timeout());
            if let Some(dir) = config.audio_base_dir() {
                sink = sink.with_base_dir(dir);
            }

            let report = AudioSequencer::new(config.audio.gap())
                .play(&detail.audio, &sink)
                .await;
            info!(
                "Played {} of {} audio entr(y/ies)",
                report.played.len(),
                detail.audio.len()
            );
        }
        Commands::Schema => print_json(dictionary.binding())?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let (mut config, created) = Config::load_or_create(&cli.config_path)?;
    if created {
        warn!(
            "Config file not found at '{}', created default config.",
            cli.config_path.display()
        );
    }

    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }

    let schema_override = cli.schema_override();
    if !schema_override.is_empty() {
        config.schema = schema_override;
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

/// Debounced search over queries typed on stdin
///
/// A line arriving within the debounce delay supersedes the previous one,
/// so only the last query of a burst is printed.
async fn search_stdin(dictionary: &Dictionary, config: &Config) -> Result<()> {
    let search = DebouncedSearch::new(dictionary.clone(), config.search.debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = JoinSet::new();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    let search = search.clone();
                    pending.spawn(async move { search.search(line.trim()).await });
                }
                None => input_open = false,
            },
            Some(joined) = pending.join_next() => match joined? {
                Ok(Lookup::Current(terms)) => print_json(&terms)?,
                Ok(Lookup::Superseded) => {}
                Err(e) => warn!("Search failed: {}", e),
            },
            else => break,
        }
    }

    Ok(())
}

async fn find_detail(dictionary: &Dictionary, term: &str) -> Result<TermDetail> {
    match dictionary.resolve_detail(term).await? {
        Some(detail) => Ok(detail),
        None => Err(AppError::NotFound(term.to_string()).into()),
    }
}

fn detail_html(detail: &TermDetail) -> String {
    let body = typeset_plan(&detail.body, &SourceTypesetter);

    let mut html = format!(
        "<article dir=\"{}\">\n<h1>{}</h1>\n{}",
        detail.direction.as_str(),
        detail.heading_html,
        body.html
    );
    if let Some(link) = detail.link.as_deref().filter(|link| !is_script_url(link)) {
        html.push_str(&format!(
            "<p><a href=\"{}\" rel=\"noopener noreferrer\">{}</a></p>\n",
            escape_attribute(link),
            escape_html(link)
        ));
    }
    html.push_str("</article>");
    html
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
