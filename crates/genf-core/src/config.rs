use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GenfError, GenfResult};

/// Top-level configuration (loaded from config.toml)
///
/// Key-derivation parameters and the chunk size are container constants and
/// intentionally have no knob here: changing them would make existing
/// containers undecryptable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenfConfig {
    pub log: LogConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker thread count (0 = cpu_count)
    pub workers: usize,
    /// Directory scanned by the interactive menu (default: current dir)
    pub work_dir: Option<PathBuf>,
    /// Skip hidden files and directories in directory scans (explicit file
    /// arguments are always kept)
    pub skip_hidden: bool,
    /// Glob patterns (matched against file names) to exclude from scans
    pub exclude_patterns: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            work_dir: None,
            skip_hidden: false,
            exclude_patterns: Vec::new(),
        }
    }
}

impl GenfConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> GenfResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| GenfError::Config(format!("parsing {}: {e}", path.display())))
    }

    /// Render as TOML (for `genf config show`)
    pub fn to_toml(&self) -> GenfResult<String> {
        toml::to_string_pretty(self).map_err(|e| GenfError::Config(e.to_string()))
    }
}

/// Expand `~` in path to the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    expand_tilde_with(path, home.as_deref())
}

/// `expand_tilde` against an explicit home directory. Without one the path
/// is returned unchanged.
pub fn expand_tilde_with(path: &Path, home: Option<&Path>) -> PathBuf {
    let s = path.to_string_lossy();
    match (s.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
