// banwatch - platform/fs.rs
//
// Filesystem helpers for reading the watched log.

use crate::util::error::LogReadError;
use std::path::Path;

/// Read the full content of a log file as a string.
///
/// Invalid UTF-8 is replaced rather than rejected, so a single corrupt
/// line never hides the rest of the log.
pub fn read_log_lossy(path: &Path) -> Result<String, LogReadError> {
    if path.is_dir() {
        return Err(LogReadError::IsDirectory {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| LogReadError::from_io(path.to_path_buf(), e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
