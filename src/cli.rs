use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Drill into purchase order spend and benchmark sourcing prices",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the families, models and parts offered for a selection
    Choices(ChoicesArgs),
    /// Show the rows in the selected scope, optionally searched and exported
    Scope(ScopeArgs),
    /// Summarize min/max per cost metric with representative rows
    Summary(ReportArgs),
    /// Benchmark prices and list the lowest-cost sourcing combinations
    Sourcing(SourcingArgs),
    /// Portfolio KPIs for the whole upload
    Overview(ReportArgs),
    /// Print the default column role configuration as YAML
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Spend export to analyze (CSV/TSV, '-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// YAML file binding roles and metrics to column names
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Part family to analyze
    #[arg(short = 'f', long = "family")]
    pub family: String,
    /// Vehicle model to narrow to (defaults to all models)
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,
    /// Part number to narrow to (defaults to all parts)
    #[arg(short = 'p', long = "part")]
    pub part: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct ChoicesArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Part family whose models and parts should be listed
    #[arg(short = 'f', long = "family")]
    pub family: Option<String>,
    /// Vehicle model whose parts should be listed
    #[arg(short = 'm', long = "model", requires = "family")]
    pub model: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ScopeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Keep rows where any cell contains this text (case-insensitive)
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,
    /// Write the rows as CSV to this file instead of rendering them
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SourcingArgs {
    #[command(flatten)]
    pub report: ReportArgs,
    /// Keep lowest-cost rows where any cell contains this text (case-insensitive)
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the configuration to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
