use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::storage::segment_store::SegmentStore;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        source,
        force,
    } = cmd
    {
        let store = SegmentStore::new(cfg.data_path());
        ExportLogic::export(&store, *format, file, source.as_deref(), *force)?;
    }
    Ok(())
}
