//! Directory scanning for the interactive menu and `genf run`.
//!
//! Ignore rules, in order:
//!   - symlinks (never followed, never processed)
//!   - in-progress engine output (`*.genf-tmp`)
//!   - hidden entries (leading `.`), when `skip_hidden` is set; directory
//!     scans only, an explicitly named file is never dropped for this
//!   - file names matching any configured glob pattern
//!   - the explicitly excluded path (the running executable)

use anyhow::{Context, Result};
use genf_core::config::BatchConfig;
use genf_crypto::output::TEMP_SUFFIX;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub skip_hidden: bool,
    pub exclude_patterns: Vec<String>,
    /// Never returned, even when it is a regular file under the root
    pub exclude_path: Option<PathBuf>,
}

impl ScanOptions {
    pub fn from_config(config: &BatchConfig, exclude_path: Option<PathBuf>) -> Self {
        Self {
            skip_hidden: config.skip_hidden,
            exclude_patterns: config.exclude_patterns.clone(),
            exclude_path: exclude_path.map(|p| absolute(&p)),
        }
    }

    fn matchers(&self) -> Vec<glob::Pattern> {
        self.exclude_patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "ignoring invalid exclude pattern");
                    None
                }
            })
            .collect()
    }

    fn is_ignored(
        &self,
        path: &Path,
        file_type: FileType,
        excludes: &[glob::Pattern],
        explicit: bool,
    ) -> bool {
        if file_type.is_symlink() {
            return true;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.ends_with(TEMP_SUFFIX) {
            return true;
        }
        if self.skip_hidden && !explicit && name.starts_with('.') {
            return true;
        }
        if excludes.iter().any(|p| p.matches(name)) {
            return true;
        }
        self.exclude_path.as_deref() == Some(path)
    }
}

/// All regular files under `root`, absolute and sorted.
pub fn collect_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let root = absolute(root);
    let excludes = options.matchers();
    let mut files = Vec::new();
    collect_files_inner(&root, &mut files, options, &excludes)?;
    files.sort(); // deterministic order
    debug!(root = %root.display(), count = files.len(), "scanned directory");
    Ok(files)
}

fn collect_files_inner(
    dir: &Path,
    out: &mut Vec<PathBuf>,
    options: &ScanOptions,
    excludes: &[glob::Pattern],
) -> Result<()> {
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading dir: {}", dir.display()))?
    {
        let entry = entry.context("reading dir entry")?;
        let path = entry.path();
        // file_type() does not follow symlinks
        let file_type = entry.file_type().context("stat dir entry")?;

        if options.is_ignored(&path, file_type, excludes, false) {
            continue;
        }
        if file_type.is_dir() {
            collect_files_inner(&path, out, options, excludes)?;
        } else if file_type.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Command-line paths sorted into files to process and an optional working
/// directory (the last directory argument wins).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ArgPaths {
    pub files: Vec<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

/// Resolve drag-and-drop style arguments: missing paths are skipped,
/// directories set the working directory, ignored files are dropped. Hidden
/// files named explicitly are kept even when `skip_hidden` is set.
pub fn resolve_args(args: &[PathBuf], options: &ScanOptions) -> ArgPaths {
    let excludes = options.matchers();
    let mut resolved = ArgPaths::default();
    for arg in args {
        let meta = match std::fs::symlink_metadata(arg) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %arg.display(), error = %e, "skipping argument");
                continue;
            }
        };
        let path = absolute(arg);
        if meta.is_dir() {
            resolved.work_dir = Some(path);
        } else if !options.is_ignored(&path, meta.file_type(), &excludes, true) && meta.is_file() {
            resolved.files.push(path);
        }
    }
    resolved
}

/// Absolute form of `path` without resolving symlinks in the final component.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
