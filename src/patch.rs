use std::path::Path;

use crate::error::PatchError;
use crate::layout::{GameDir, Layout};

/// A single 4-byte edit at a fixed offset. The fixed-size arrays keep the
/// original and replacement the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchDescriptor {
    pub offset: usize,
    pub original: [u8; 4],
    pub replacement: [u8; 4],
    pub description: String,
}

impl PatchDescriptor {
    fn new(offset: usize, original: u32, replacement: u32, description: String) -> Self {
        Self {
            offset,
            original: original.to_le_bytes(),
            replacement: replacement.to_le_bytes(),
            description,
        }
    }

    pub fn original_value(&self) -> u32 {
        u32::from_le_bytes(self.original)
    }

    pub fn replacement_value(&self) -> u32 {
        u32::from_le_bytes(self.replacement)
    }
}

/// Planner output: what is safe to write, and what was left alone.
#[derive(Debug, Default)]
pub struct Plan {
    pub patches: Vec<PatchDescriptor>,
    pub skipped: Vec<PatchError>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

/// Whether the resolution table already holds the target width. A file too
/// short to hold the table reads as unpatched.
pub fn is_patched(data: &[u8], layout: &Layout) -> bool {
    read_u32(data, layout.table_offset) == Some(layout.target_width)
}

/// Every edit the layout knows about, in evaluation order: table width, table
/// height, then the code sites.
pub fn candidates(layout: &Layout) -> Vec<PatchDescriptor> {
    let mut out = Vec::with_capacity(2 + layout.code_sites.len());

    out.push(PatchDescriptor::new(
        layout.table_offset,
        layout.original_width,
        layout.target_width,
        format!(
            "Resolution table: {} -> {} (width)",
            layout.original_width, layout.target_width
        ),
    ));
    out.push(PatchDescriptor::new(
        layout.table_offset + 4,
        layout.original_height,
        layout.target_height,
        format!(
            "Resolution table: {} -> {} (height)",
            layout.original_height, layout.target_height
        ),
    ));

    for site in layout.code_sites {
        out.push(PatchDescriptor::new(
            site.offset,
            layout.original(site.dimension),
            layout.target(site.dimension),
            site.description.to_string(),
        ));
    }

    out
}

pub fn plan(data: &[u8], layout: &Layout) -> Plan {
    let mut plan = Plan::default();

    if data.len() < layout.table_end() {
        log::warn!(
            "file is {} bytes, too short for the resolution table at 0x{:X}",
            data.len(),
            layout.table_offset
        );
        return plan;
    }

    for candidate in candidates(layout) {
        let current = data.get(candidate.offset..candidate.offset + 4);
        if current == Some(&candidate.original[..]) {
            plan.patches.push(candidate);
            continue;
        }

        let mismatch = PatchError::OffsetMismatch {
            offset: candidate.offset,
            expected: candidate.original_value(),
            found: read_u32(data, candidate.offset),
            description: candidate.description,
        };
        log::warn!("{mismatch}");
        plan.skipped.push(mismatch);
    }

    plan
}

/// Returns a patched copy; `data` itself is never touched.
pub fn apply(data: &[u8], patches: &[PatchDescriptor]) -> Vec<u8> {
    let mut patched = data.to_vec();

    for patch in patches {
        let end = patch.offset + patch.replacement.len();
        patched[patch.offset..end].copy_from_slice(&patch.replacement);
    }

    patched
}

/// Backs up the pristine bytes, then writes the patched bytes over the
/// executable. An existing backup is kept as is. The executable is only
/// overwritten once a backup is in place.
pub fn write_patched(
    dir: &GameDir,
    original: &[u8],
    patches: &[PatchDescriptor],
) -> Result<(), PatchError> {
    if patches.is_empty() {
        Err(PatchError::NoValidPatches)?
    }

    let backup = dir.exe_backup();
    if backup.is_file() {
        log::info!("backup already exists: {}", display_name(&backup));
    } else {
        log::info!("creating backup: {}", display_name(&backup));
        std::fs::write(&backup, original)
            .map_err(|e| PatchError::write(&backup, e))?;
    }

    let patched = apply(original, patches);
    let exe = dir.exe();
    std::fs::write(&exe, patched)
        .map_err(|e| PatchError::write(&exe, e))?;

    Ok(())
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
