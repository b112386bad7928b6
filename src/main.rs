use std::path::PathBuf;

use clap::Parser;
use simplelog::Config;

mod app;
mod config;
mod console;
mod error;
mod layout;
mod patch;
mod restore;

use crate::console::{AlwaysConfirm, Confirm, StdinConfirm};
use crate::layout::{GameDir, HUNDRED_LINE};

/// Patches The Hundred Line to run at 5120x2880, or restores the original
/// executable if it is already patched.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game directory (defaults to the directory holding this patcher)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Don't wait for ENTER before writing
    #[arg(short, long)]
    yes: bool,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn game_dir(cli: &Cli) -> Option<PathBuf> {
    if let Some(dir) = &cli.dir {
        return Some(dir.clone());
    }
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.to_path_buf())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = simplelog::SimpleLogger::init(level, Config::default());

    if let Some(dir) = game_dir(&cli) {
        if let Err(e) = std::env::set_current_dir(&dir) {
            log::warn!("unable to change to {}: {e}", dir.display());
        }
    }

    let subtitle = format!(
        "Patches {}x{} -> {}x{}",
        HUNDRED_LINE.original_width,
        HUNDRED_LINE.original_height,
        HUNDRED_LINE.target_width,
        HUNDRED_LINE.target_height
    );
    console::boxed(&["The Hundred Line - Resolution Patcher", subtitle.as_str()]);
    println!();

    let dir = GameDir::new(".", &HUNDRED_LINE);
    let options = app::Options {
        dry_run: cli.dry_run,
    };
    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AlwaysConfirm)
    } else {
        Box::new(StdinConfirm)
    };

    match app::run(&dir, options, confirm.as_mut()) {
        Ok(app::Outcome::Cancelled) => {
            log::info!("cancelled, nothing was written");
        }
        Ok(outcome) => {
            log::debug!("finished: {outcome:?}");
        }
        Err(e @ error::PatchError::MissingFile(_)) => {
            log::error!("{e}");
            log::error!("please place this patcher in the same folder as the game executable");
        }
        Err(e) => {
            log::error!("{e}");
        }
    }

    console::wait_for_exit();
}
