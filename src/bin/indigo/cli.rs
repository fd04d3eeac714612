//! # Cli
//!
//! This module contains everything needed for parsing the CLI arguments for
//! the indigo translator.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Struct containing the CLI configuration for indigo.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Specify the log level of the translator.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of indigo.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also log warnings.
    #[value(alias("1"))]
    Warn,

    /// Also log information about which files are translated.
    #[value(alias("2"))]
    Info,

    /// Log internal state of the translator.
    #[value(alias("3"))]
    Debug,

    /// Log everything, including the parser's production trace.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Translate indented-form sources to canonical form.
    Compile(TranslateArgs),

    /// Parse indented-form sources and report errors without writing
    /// output.
    Parse(ParseArgs),

    /// Translate sources like `compile`; building the result is handed to
    /// the host toolchain afterwards.
    Build(TranslateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Source files or directories (walked recursively).
    #[arg(index = 1, required = true)]
    pub paths: Vec<std::path::PathBuf>,

    /// Whether comments are carried over into the output.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub comments: bool,

    /// Root directory for the translated output.
    #[arg(long)]
    pub dest: Option<std::path::PathBuf>,

    /// Indent the output with tabs.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub tabs: bool,

    /// Rendering width of a tab.
    #[arg(long, default_value_t = 8)]
    pub tabwidth: usize,

    /// Emit a trace of parsed productions (requires -v trace).
    #[arg(long)]
    pub trace: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Source files or directories (walked recursively).
    #[arg(index = 1, required = true)]
    pub paths: Vec<std::path::PathBuf>,

    /// Emit a trace of parsed productions (requires -v trace).
    #[arg(long)]
    pub trace: bool,

    /// Print the position table of all parsed files as JSON.
    #[arg(long)]
    pub dump_fileset: bool,
}
