//! Container file naming: `<original name>.ge`

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to an encrypted file's name
pub const ENCRYPTED_SUFFIX: &str = ".ge";

/// `report.pdf` → `report.pdf.ge`
pub fn encrypted_path(source: &Path) -> PathBuf {
    append_to_name(source, ENCRYPTED_SUFFIX)
}

/// `report.pdf.ge` → `report.pdf`; `None` if the name lacks the suffix or
/// would be empty once stripped.
pub fn decrypted_path(container: &Path) -> Option<PathBuf> {
    let name = container.file_name()?.to_str()?;
    let stem = name.strip_suffix(ENCRYPTED_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(container.with_file_name(stem))
}

/// Whether `path`'s file name carries the container suffix.
pub fn is_container_name(path: &Path) -> bool {
    decrypted_path(path).is_some()
}

/// Append `suffix` to the final path component, keeping any existing extension.
pub(crate) fn append_to_name(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
