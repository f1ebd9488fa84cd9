//! weldlog library root.
//! Exposes the CLI parser, the high-level run() function and the storage layer.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::path::resolve_db_path;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Welder { .. } => cli::commands::welder::handle(&cli.command, cfg),
        Commands::Plan { .. } => cli::commands::plan::handle(&cli.command, cfg),
        Commands::Norm { .. } => cli::commands::norm::handle(&cli.command, cfg),
        Commands::Record { .. } => cli::commands::record::handle(&cli.command, cfg),
        Commands::Daily { .. } => cli::commands::daily::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once and handed down
    // a broken file must stay reachable through `config`
    let mut cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) if matches!(cli.command, Commands::Config { .. }) => {
            ui::messages::warning(format!("{}; using defaults", e));
            Config::default()
        }
        Err(e) => return Err(e),
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = resolve_db_path(custom_db);
    }

    dispatch(&cli, &cfg)
}
