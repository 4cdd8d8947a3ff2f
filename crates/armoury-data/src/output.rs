//! Materializing the unit index as a JSON artifact.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::index::UnitIndex;
use crate::loader::DataLoadError;

/// Pretty-printed JSON with two-space indentation and no trailing newline.
pub fn render_index(index: &UnitIndex) -> Result<String, DataLoadError> {
    Ok(serde_json::to_string_pretty(index)?)
}

/// Render and persist the index at `path`, replacing any previous artifact.
pub fn write_index(index: &UnitIndex, path: &Path) -> Result<(), DataLoadError> {
    let json = render_index(index)?;
    write_atomic(path, json.as_bytes()).map_err(|source| DataLoadError::Write {
        file: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), units = index.len(), "wrote unit index");
    Ok(())
}

/// Write `contents` to `<path>.tmp`, then rename it over `path`. Creates the
/// parent directory if needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp_path = temp_path(path);
    fs::write(&temp_path, contents)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    tracing::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
