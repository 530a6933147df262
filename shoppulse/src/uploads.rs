//! Upload archive housekeeping
//!
//! Uploaded files are kept alongside the ledger as `<unix_ts>_<original_name>`
//! so they can be re-ingested later. When a new upload shares the logical
//! original name of a stored file (ignoring the timestamp prefix, compared
//! case-insensitively), the stored copy is deleted and replaced. This policy
//! applies to the archive directory only; it never touches the ledger.

use shoppulse_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Store `bytes` under a timestamped name, replacing any previously stored
/// copy of the same logical file. Returns the stored file name.
pub fn store_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String> {
    let original_name = original_name.trim();
    if original_name.is_empty() || original_name.contains(['/', '\\']) {
        return Err(Error::InvalidInput(format!(
            "Invalid upload file name: {original_name:?}"
        )));
    }

    std::fs::create_dir_all(dir)?;

    for stored in list_uploads(dir)? {
        if let Some(logical) = logical_name(&stored) {
            if logical.eq_ignore_ascii_case(original_name) {
                debug!(replaced = stored, "Replacing previously stored upload");
                std::fs::remove_file(dir.join(&stored))?;
            }
        }
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::InvalidInput(format!("System clock error: {e}")))?
        .as_secs();
    let stored_name = format!("{timestamp}_{original_name}");
    std::fs::write(dir.join(&stored_name), bytes)?;

    Ok(stored_name)
}

/// Stored file names in the archive, sorted. An archive directory that does
/// not exist yet yields an empty list.
pub fn list_uploads(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Delete one stored file by its stored (timestamped) name
pub fn remove_upload(dir: &Path, stored_name: &str) -> Result<()> {
    let path: PathBuf = dir.join(stored_name);
    std::fs::remove_file(path)?;
    Ok(())
}

/// The original file name behind a stored name: everything after the first
/// underscore. Stored names without an underscore have no logical name.
fn logical_name(stored_name: &str) -> Option<&str> {
    stored_name.split_once('_').map(|(_, rest)| rest)
}
