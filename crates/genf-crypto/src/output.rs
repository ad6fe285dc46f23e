//! Atomic destination files.
//!
//! Output goes to a fresh, exclusively created `.<dest name>.XXXXXX.genf-tmp`
//! beside the destination and is persisted over it only on
//! [`AtomicOutput::commit`]. The temp name is never one a user file already
//! holds. Dropping an uncommitted output closes and removes the temp file,
//! so a failed run never leaves something that looks like a finished
//! container or plaintext.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Suffix of in-progress output files
pub const TEMP_SUFFIX: &str = ".genf-tmp";

pub struct AtomicOutput {
    dest: PathBuf,
    tmp: PathBuf,
    writer: Option<BufWriter<NamedTempFile>>,
}

impl AtomicOutput {
    pub fn create(dest: &Path) -> io::Result<Self> {
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        Ok(Self {
            dest: dest.to_path_buf(),
            tmp: file.path().to_path_buf(),
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.tmp
    }

    /// Flush, fsync, then persist over the destination.
    pub fn commit(mut self) -> io::Result<PathBuf> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| io::Error::other("output already closed"))?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(&self.dest).map_err(|e| e.error)?;
        Ok(self.dest.clone())
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<NamedTempFile>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other("output already closed"))
    }
}

impl Write for AtomicOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Drop for AtomicOutput {
    fn drop(&mut self) {
        let Some(writer) = self.writer.take() else {
            return;
        };
        // Discard buffered bytes; nothing more reaches the temp file
        let (file, _) = writer.into_parts();
        match file.close() {
            Ok(()) => tracing::debug!(tmp = %self.tmp.display(), "removed incomplete output"),
            Err(e) => tracing::warn!(
                tmp = %self.tmp.display(),
                error = %e,
                "failed to remove incomplete output"
            ),
        }
    }
}
