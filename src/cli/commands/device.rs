use crate::cli::commands::files::open_link;
use crate::cli::parser::{Commands, DeviceAction};
use crate::config::Config;
use crate::errors::AppResult;
use crate::sync::link::RemoteLink;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    let Commands::Device { manifest, action } = cmd else {
        return Ok(());
    };

    let mut link = open_link(Some(manifest))?;

    let what = match action {
        DeviceAction::Sync => {
            link.request_sync_from_device()?;
            "Sync requested"
        }
        DeviceAction::Metadata => {
            link.request_metadata_update()?;
            "Metadata update requested"
        }
        DeviceAction::DeleteSynced => {
            link.request_delete_synced_on_device()?;
            "Deletion of synced files requested"
        }
        DeviceAction::DeleteAll => {
            link.request_delete_all_on_device()?;
            "Deletion of all device files requested"
        }
        DeviceAction::CollectOn => {
            link.send_data_collection_state(true)?;
            "Data collection enabled"
        }
        DeviceAction::CollectOff => {
            link.send_data_collection_state(false)?;
            "Data collection disabled"
        }
    };

    success(format!("{} on '{}'.", what, link.device()));
    Ok(())
}
