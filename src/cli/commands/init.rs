use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the data directory holding raw files and sidecars
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.dir.clone(), cli.test)?;

    println!("⚙️  Initializing rsensorlog…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗂️  Data dir    : {}", cfg.data_path().display());
    println!("💾 Checkpoint  : {}", cfg.checkpoint_path().display());

    log::info!("initialized data dir {}", cfg.data_path().display());

    success("rsensorlog initialization completed!");
    Ok(())
}
