pub mod cascade;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod normalize;
pub mod overview;
pub mod render;
pub mod search;
pub mod sourcing;
pub mod summary;

#[cfg(test)]
mod testing;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::error::{SpendError, SpendResult};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("spend_bench", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Choices(args) => commands::execute_choices(&args),
        Commands::Scope(args) => commands::execute_scope(&args),
        Commands::Summary(args) => commands::execute_summary(&args),
        Commands::Sourcing(args) => commands::execute_sourcing(&args),
        Commands::Overview(args) => commands::execute_overview(&args),
        Commands::Config(args) => commands::execute_config(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
