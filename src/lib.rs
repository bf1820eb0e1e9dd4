//! rsensorlog library root.
//! Exposes the CLI parser, the high-level run() function, and the session,
//! segment store and sync reconciliation cores.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod models;
pub mod storage;
pub mod sync;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Start | Commands::Toggle { .. } | Commands::Stop { .. } | Commands::Status => {
            cli::commands::session::handle(&cli.command, cfg)
        }
        Commands::Segments { .. } => cli::commands::segments::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Files { .. } => cli::commands::files::handle(&cli.command, cfg),
        Commands::Device { .. } => cli::commands::device::handle(&cli.command, cfg),
        Commands::Cleanup { .. } => cli::commands::cleanup::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load();

    // 3️⃣ apply data dir override from the command line
    if let Some(custom_dir) = &cli.dir {
        cfg.data_dir = custom_dir.clone();
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
