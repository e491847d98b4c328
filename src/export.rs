use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::calendar::EventRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize events: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub count: usize,
}

/// Serializes `records` as a pretty-printed JSON array and writes it to
/// `path`.
///
/// The document goes to a sibling temp file first and is renamed into place,
/// so a failure leaves either no new file or the previous complete one. An
/// empty slice still produces a valid `[]` document.
pub fn export(records: &[EventRecord], path: &Path) -> Result<WriteSummary, ExportError> {
    if path.file_name().is_none() {
        return Err(ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("destination '{}' has no file name", path.display()),
        )));
    }

    let mut document = serde_json::to_vec_pretty(records)?;
    document.push(b'\n');

    let staged = staging_path(path);
    fs::write(&staged, &document)?;
    if let Err(err) = fs::rename(&staged, path) {
        let _ = fs::remove_file(&staged);
        return Err(err.into());
    }

    Ok(WriteSummary {
        path: path.to_path_buf(),
        count: records.len(),
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
