use crate::config::restore_user_config;
use crate::console::Confirm;
use crate::error::PatchError;
use crate::layout::GameDir;
use crate::patch::display_name;

#[derive(Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored { config_restored: bool },
    Cancelled,
}

/// Reads the executable backup, or reports `MissingBackup` without touching
/// anything.
pub fn load_backup(dir: &GameDir) -> Result<Vec<u8>, PatchError> {
    let backup = dir.exe_backup();
    if !backup.exists() {
        Err(PatchError::MissingBackup(backup.clone()))?
    }
    std::fs::read(&backup).map_err(|e| PatchError::read(&backup, e))
}

pub fn restore(
    dir: &GameDir,
    confirm: &mut dyn Confirm,
) -> Result<RestoreOutcome, PatchError> {
    let backup_data = load_backup(dir)?;

    println!("Backup size: {} bytes", backup_data.len());
    println!();

    if !confirm.confirm(
        "Press ENTER to restore the original executable, or close this window to cancel...",
    ) {
        return Ok(RestoreOutcome::Cancelled);
    }

    let exe = dir.exe();
    std::fs::write(&exe, &backup_data)
        .map_err(|e| PatchError::write(&exe, e))?;
    log::info!("restored {}", display_name(&exe));

    if let Err(e) = std::fs::remove_file(dir.exe_backup()) {
        log::warn!("failed to remove backup file: {e}");
    }

    let config_name = display_name(&dir.config());
    let config_restored = match restore_user_config(dir) {
        Ok(true) => {
            log::info!("restored {config_name}");
            true
        }
        Ok(false) => {
            log::debug!("no config backup, leaving {config_name} as is");
            false
        }
        Err(e) => {
            log::warn!("failed to restore {config_name}: {e}");
            false
        }
    };

    Ok(RestoreOutcome::Restored { config_restored })
}
