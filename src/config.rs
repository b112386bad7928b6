use std::path::Path;

use serde_json::{Map, Value};

use crate::error::PatchError;
use crate::layout::GameDir;
use crate::patch::display_name;

pub type ConfigDocument = Map<String, Value>;

pub fn parse(raw: &[u8], dir: &GameDir) -> Result<ConfigDocument, PatchError> {
    serde_json::from_slice(raw).map_err(|source| PatchError::Parse {
        path: dir.config(),
        source,
    })
}

/// Sets the resolution and window mode keys; everything else is left as found.
pub fn apply_resolution(doc: &mut ConfigDocument, dir: &GameDir) {
    let layout = dir.layout();
    doc.insert(layout.width_key.to_string(), layout.target_width.into());
    doc.insert(layout.height_key.to_string(), layout.target_height.into());
    doc.insert(layout.mode_key.to_string(), layout.window_mode.into());
}

/// Tab-indented with sorted keys, so repeated runs produce identical files.
pub fn render(doc: &ConfigDocument) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(doc, &mut serializer)?;
    Ok(out)
}

fn encode_failure(path: &Path, source: serde_json::Error) -> PatchError {
    let source = std::io::Error::new(std::io::ErrorKind::InvalidData, source);
    PatchError::write(path, source)
}

pub fn update_user_config(dir: &GameDir) -> Result<(), PatchError> {
    let path = dir.config();
    let raw = std::fs::read(&path)
        .map_err(|e| PatchError::read(&path, e))?;
    let mut doc = parse(&raw, dir)?;

    let backup = dir.config_backup();
    if !backup.exists() {
        std::fs::write(&backup, &raw)
            .map_err(|e| PatchError::write(&backup, e))?;
        log::info!("created config backup: {}", display_name(&backup));
    } else {
        log::debug!("config backup already present, keeping it");
    }

    apply_resolution(&mut doc, dir);

    let rendered = render(&doc).map_err(|e| encode_failure(&path, e))?;
    std::fs::write(&path, rendered)
        .map_err(|e| PatchError::write(&path, e))?;

    Ok(())
}

/// Puts the backed-up config back. Returns `false` when there was no backup,
/// which is not an error.
pub fn restore_user_config(dir: &GameDir) -> Result<bool, PatchError> {
    let backup = dir.config_backup();
    if !backup.exists() {
        return Ok(false);
    }

    let raw = std::fs::read(&backup)
        .map_err(|e| PatchError::read(&backup, e))?;
    let path = dir.config();
    std::fs::write(&path, raw)
        .map_err(|e| PatchError::write(&path, e))?;

    if let Err(e) = std::fs::remove_file(&backup) {
        log::warn!("failed to remove config backup: {e}");
    }

    Ok(true)
}
