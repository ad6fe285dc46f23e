//! Per-file error taxonomy for the two pipelines.
//!
//! Every error is file-scoped: the batch driver reports it and moves on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncryptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("key derivation failed: {0}")]
    DerivationFailed(#[source] argon2::Error),

    #[error("chunk {chunk} could not be sealed")]
    Seal { chunk: u64 },
}

#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a .ge container name: {0}")]
    InvalidContainerName(std::path::PathBuf),

    #[error("container header is truncated ({got} of 40 bytes)")]
    TruncatedHeader { got: usize },

    #[error("chunk {chunk} length prefix is truncated ({got} of 8 bytes)")]
    TruncatedFraming { chunk: u64, got: usize },

    #[error("chunk {chunk} is truncated ({got} of {expected} bytes)")]
    TruncatedChunk { chunk: u64, expected: u64, got: u64 },

    /// Wrong password and tampered ciphertext are indistinguishable here.
    #[error("incorrect password or corrupted data (chunk {chunk})")]
    AuthenticationFailed { chunk: u64 },

    #[error("key derivation failed: {0}")]
    DerivationFailed(#[source] argon2::Error),
}

impl DecryptError {
    /// True for the framing errors: the container is shorter than it claims.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DecryptError::TruncatedHeader { .. }
                | DecryptError::TruncatedFraming { .. }
                | DecryptError::TruncatedChunk { .. }
        )
    }
}
