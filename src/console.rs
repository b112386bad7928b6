use std::io::BufRead;

use crate::patch::PatchDescriptor;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// Gate in front of every destructive write.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Waits for ENTER on stdin. A closed stdin counts as declining.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        println!("{prompt}");
        wait_for_enter()
    }
}

pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        log::debug!("auto-confirmed: {prompt}");
        true
    }
}

/// Returns false if stdin was closed or unreadable.
pub fn wait_for_enter() -> bool {
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => false,
        Ok(_) => true,
        Err(e) => {
            log::debug!("failed to read stdin: {e}");
            false
        }
    }
}

pub fn wait_for_exit() {
    println!("Press ENTER to exit...");
    wait_for_enter();
}

pub fn boxed(lines: &[&str]) {
    const WIDTH: usize = 60;

    println!("╔{}╗", "═".repeat(WIDTH));
    for line in lines {
        println!("║{line:^WIDTH$}║");
    }
    println!("╚{}╝", "═".repeat(WIDTH));
}

pub fn format_patch(patch: &PatchDescriptor) -> String {
    format!(
        "  0x{:08X}: {} -> {}\n              {}",
        patch.offset,
        patch.original_value(),
        patch.replacement_value(),
        patch.description
    )
}

pub fn print_plan(patches: &[PatchDescriptor]) {
    println!("The following changes will be made:");
    println!("{RULE}");
    for patch in patches {
        println!("{}", format_patch(patch));
    }
    println!("{RULE}");
    println!("Total patches: {}", patches.len());
}
