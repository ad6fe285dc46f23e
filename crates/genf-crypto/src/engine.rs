//! The public operation surface: one password, one file, one result.

use std::path::{Path, PathBuf};

use crate::error::{DecryptError, EncryptError};
use crate::kdf::KdfParams;
use crate::password::Password;
use crate::{CHUNK_SIZE, TAG_SIZE};

/// Progress callback type (bytes_done, bytes_total, message)
///
/// Invoked between chunks, never mid-chunk.
pub type ProgressFn = Box<dyn Fn(u64, u64, &str) + Send + Sync>;

/// Counters for one pass over a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Framed chunks written (encrypt) or opened (decrypt)
    pub chunks: u64,
    /// Plaintext bytes consumed (encrypt) or recovered (decrypt)
    pub plaintext_bytes: u64,
    /// Container bytes produced or consumed, header included
    pub container_bytes: u64,
    /// Largest chunk buffer allocation, in bytes
    pub peak_buffer: usize,
}

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub summary: StreamSummary,
}

/// Container engine: Argon2id parameters plus the plaintext chunk size.
///
/// `Engine::default()` is the `.ge` format. The other constructor exists for
/// tests and benchmarks; containers made with non-default settings only
/// open with the same settings.
#[derive(Debug, Clone)]
pub struct Engine {
    kdf: KdfParams,
    chunk_size: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            chunk_size: CHUNK_SIZE,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(kdf: KdfParams, chunk_size: usize) -> Self {
        Self {
            kdf,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Largest sealed chunk a valid container can hold
    pub fn max_sealed_len(&self) -> usize {
        self.chunk_size + TAG_SIZE
    }
}

/// Encrypt `source` into `source + ".ge"` with the standard container settings.
pub fn encrypt(password: &Password, source: &Path) -> Result<(), EncryptError> {
    Engine::default().encrypt_file(password, source, None).map(|_| ())
}

/// Decrypt a `.ge` container into the same path with the suffix stripped.
pub fn decrypt(password: &Password, source: &Path) -> Result<(), DecryptError> {
    Engine::default().decrypt_file(password, source, None).map(|_| ())
}

#[cfg(test)]
pub(crate) fn test_engine(chunk_size: usize) -> Engine {
    Engine::with_params(crate::kdf::fast_params(), chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_is_container_format() {
        let engine = Engine::default();
        assert_eq!(engine.chunk_size(), 4 * 1024 * 1024);
        assert_eq!(engine.max_sealed_len(), 4 * 1024 * 1024 + 16);
        assert_eq!(engine.kdf_params(), &KdfParams::default());
    }

    #[test]
    fn test_zero_chunk_size_clamped() {
        let engine = Engine::with_params(KdfParams::default(), 0);
        assert_eq!(engine.chunk_size(), 1);
    }
}
