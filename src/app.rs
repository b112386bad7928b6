use crate::config::update_user_config;
use crate::console::{self, Confirm};
use crate::error::PatchError;
use crate::layout::GameDir;
use crate::patch::{self, display_name};
use crate::restore::{self, RestoreOutcome};

#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    pub dry_run: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Patched {
        applied: usize,
        config_updated: bool,
    },
    Restored { config_restored: bool },
    DryRun,
    Cancelled,
}

/// Detects the current state of the executable and either patches it or
/// restores it from backup.
pub fn run(
    dir: &GameDir,
    options: Options,
    confirm: &mut dyn Confirm,
) -> Result<Outcome, PatchError> {
    let exe = dir.exe();
    let data = std::fs::read(&exe).map_err(|e| PatchError::read(&exe, e))?;

    if patch::is_patched(&data, dir.layout()) {
        run_restore_mode(dir, options, confirm)
    } else {
        run_patch_mode(dir, &data, options, confirm)
    }
}

fn run_patch_mode(
    dir: &GameDir,
    data: &[u8],
    options: Options,
    confirm: &mut dyn Confirm,
) -> Result<Outcome, PatchError> {
    let layout = dir.layout();
    let exe_name = display_name(&dir.exe());
    let config_name = display_name(&dir.config());

    println!("Mode: PATCH");
    println!();
    println!(
        "This will patch {exe_name} to support {}x{} resolution.",
        layout.target_width, layout.target_height
    );
    println!("A backup will be created automatically.");
    println!();
    println!("File size: {} bytes", data.len());
    println!();

    let plan = patch::plan(data, layout);
    if plan.is_empty() {
        Err(PatchError::NoValidPatches)?
    }

    console::print_plan(&plan.patches);
    if !plan.skipped.is_empty() {
        println!("Skipped locations: {}", plan.skipped.len());
    }
    println!();

    if options.dry_run {
        println!("[DRY RUN] No changes made.");
        return Ok(Outcome::DryRun);
    }

    println!("{config_name} will also be updated.");
    println!();

    if !confirm.confirm(
        "Press ENTER to apply the patch, or close this window to cancel...",
    ) {
        return Ok(Outcome::Cancelled);
    }

    patch::write_patched(dir, data, &plan.patches)?;
    log::info!("patched {exe_name} ({} edits)", plan.patches.len());

    let config_updated = match update_user_config(dir) {
        Ok(()) => {
            log::info!("updated {config_name}");
            true
        }
        Err(e) => {
            log::warn!("failed to update {config_name}: {e}");
            log::warn!("you may need to set the resolution in the config file manually");
            false
        }
    };

    println!();
    console::boxed(&["PATCH SUCCESSFUL!"]);
    println!();
    println!("Run this patcher again to restore the original executable.");
    println!();

    Ok(Outcome::Patched {
        applied: plan.patches.len(),
        config_updated,
    })
}

fn run_restore_mode(
    dir: &GameDir,
    options: Options,
    confirm: &mut dyn Confirm,
) -> Result<Outcome, PatchError> {
    println!("Mode: RESTORE");
    println!();
    println!("The executable appears to be patched.");
    println!("This will restore the original unpatched executable.");
    println!();

    if options.dry_run {
        let backup = restore::load_backup(dir)?;
        println!("Backup size: {} bytes", backup.len());
        println!("[DRY RUN] No changes made.");
        return Ok(Outcome::DryRun);
    }

    match restore::restore(dir, confirm)? {
        RestoreOutcome::Cancelled => Ok(Outcome::Cancelled),
        RestoreOutcome::Restored { config_restored } => {
            println!();
            console::boxed(&["RESTORE SUCCESSFUL!"]);
            println!();
            println!("The original executable has been restored.");
            println!();
            Ok(Outcome::Restored { config_restored })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::AlwaysConfirm;
    use crate::layout::tests::{pristine_image, TINY};

    const CONFIG: &str = r#"{"App.Window.X": 10, "App.Window.W": 3840, "App.Window.H": 2160}"#;

    fn game(tmp: &tempfile::TempDir) -> GameDir<'static> {
        let dir = GameDir::new(tmp.path(), &TINY);
        std::fs::write(dir.exe(), pristine_image()).unwrap();
        std::fs::write(dir.config(), CONFIG).unwrap();
        dir
    }

    #[test]
    fn patch_then_restore_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = game(&tmp);

        let outcome = run(&dir, Options::default(), &mut AlwaysConfirm).unwrap();
        assert_eq!(
            outcome,
            Outcome::Patched {
                applied: 6,
                config_updated: true
            }
        );
        assert_ne!(std::fs::read(dir.exe()).unwrap(), pristine_image());

        let outcome = run(&dir, Options::default(), &mut AlwaysConfirm).unwrap();
        assert_eq!(
            outcome,
            Outcome::Restored {
                config_restored: true
            }
        );

        assert_eq!(std::fs::read(dir.exe()).unwrap(), pristine_image());
        assert_eq!(std::fs::read_to_string(dir.config()).unwrap(), CONFIG);
        assert!(!dir.exe_backup().exists());
        assert!(!dir.config_backup().exists());
    }

    #[test]
    fn second_run_restores_instead_of_repatching() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = game(&tmp);

        run(&dir, Options::default(), &mut AlwaysConfirm).unwrap();
        let patched = std::fs::read(dir.exe()).unwrap();

        let mut prompts = Vec::new();
        let mut record = |prompt: &str| {
            prompts.push(prompt.to_string());
            false
        };
        let outcome = run(&dir, Options::default(), &mut record).unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(prompts[0].contains("restore"));
        assert_eq!(std::fs::read(dir.exe()).unwrap(), patched);
        assert_eq!(std::fs::read(dir.exe_backup()).unwrap(), pristine_image());
    }

    #[test]
    fn short_file_fails_without_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = GameDir::new(tmp.path(), &TINY);
        std::fs::write(dir.exe(), [0u8; 16]).unwrap();
        std::fs::write(dir.config(), CONFIG).unwrap();

        let err = run(&dir, Options::default(), &mut AlwaysConfirm).unwrap_err();
        assert!(matches!(err, PatchError::NoValidPatches));
        assert_eq!(std::fs::read(dir.exe()).unwrap(), [0u8; 16]);
        assert_eq!(std::fs::read_to_string(dir.config()).unwrap(), CONFIG);
        assert!(!dir.exe_backup().exists());
        assert!(!dir.config_backup().exists());
    }

    #[test]
    fn missing_executable_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = GameDir::new(tmp.path(), &TINY);

        let err = run(&dir, Options::default(), &mut AlwaysConfirm).unwrap_err();
        assert!(matches!(err, PatchError::MissingFile(_)));
    }

    #[test]
    fn broken_config_does_not_undo_the_patch() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = game(&tmp);
        std::fs::write(dir.config(), "not json").unwrap();

        let outcome = run(&dir, Options::default(), &mut AlwaysConfirm).unwrap();
        assert_eq!(
            outcome,
            Outcome::Patched {
                applied: 6,
                config_updated: false
            }
        );
        assert!(patch::is_patched(&std::fs::read(dir.exe()).unwrap(), &TINY));
        assert!(!dir.config_backup().exists());
    }

    #[test]
    fn restore_without_backup_keeps_patched_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = game(&tmp);
        run(&dir, Options::default(), &mut AlwaysConfirm).unwrap();
        std::fs::remove_file(dir.exe_backup()).unwrap();
        let patched = std::fs::read(dir.exe()).unwrap();

        let err = run(&dir, Options::default(), &mut AlwaysConfirm).unwrap_err();
        assert!(matches!(err, PatchError::MissingBackup(_)));
        assert_eq!(std::fs::read(dir.exe()).unwrap(), patched);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = game(&tmp);

        let options = Options { dry_run: true };
        let outcome = run(&dir, options, &mut AlwaysConfirm).unwrap();
        assert_eq!(outcome, Outcome::DryRun);
        assert_eq!(std::fs::read(dir.exe()).unwrap(), pristine_image());
        assert!(!dir.exe_backup().exists());
        assert!(!dir.config_backup().exists());
    }
}
