//! Encryption pipeline
//!
//! `Init` (salt, base nonce, key) → `HeaderWritten` → `Streaming` → `Done`.
//! Each pass reads up to `chunk_size` plaintext bytes into one reused buffer,
//! seals it in place and writes `[len][ciphertext || tag]`. A short read means
//! the source is exhausted; a zero-byte read ends the stream without a chunk,
//! so an empty file is a 40-byte container and an exact multiple of the chunk
//! size gets no trailing empty chunk.

use chacha20poly1305::{
    aead::{AeadInPlace, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::engine::{Engine, FileReport, ProgressFn, StreamSummary};
use crate::error::EncryptError;
use crate::format::{read_full, write_frame, Header, HEADER_SIZE, LENGTH_PREFIX_SIZE};
use crate::kdf::derive_key;
use crate::names::encrypted_path;
use crate::nonce::NonceSequence;
use crate::output::AtomicOutput;
use crate::password::Password;

impl Engine {
    /// Encrypt everything `src` yields into a container written to `dst`.
    pub fn encrypt_stream<R: Read, W: Write>(
        &self,
        password: &Password,
        src: &mut R,
        dst: &mut W,
    ) -> Result<StreamSummary, EncryptError> {
        self.seal_stream(password, src, dst, &mut |_| {})
    }

    /// Encrypt `source` to `source.ge`.
    ///
    /// Writes through a temp file that is renamed on success and removed on
    /// any failure.
    pub fn encrypt_file(
        &self,
        password: &Password,
        source: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<FileReport, EncryptError> {
        let output = encrypted_path(source);
        debug!(source = %source.display(), output = %output.display(), "encrypting file");

        let mut src = File::open(source)?;
        let total = src.metadata()?.len();
        let mut out = AtomicOutput::create(&output)?;

        let summary = self.seal_stream(password, &mut src, &mut out, &mut |s: &StreamSummary| {
            if let Some(cb) = progress {
                cb(s.plaintext_bytes, total, &format!("chunk {}", s.chunks));
            }
        })?;
        let output = out.commit()?;

        debug!(
            output = %output.display(),
            chunks = summary.chunks,
            bytes = summary.container_bytes,
            "encrypted file"
        );
        Ok(FileReport {
            source: source.to_path_buf(),
            output,
            summary,
        })
    }

    pub(crate) fn seal_stream<R: Read, W: Write>(
        &self,
        password: &Password,
        src: &mut R,
        dst: &mut W,
        on_chunk: &mut dyn FnMut(&StreamSummary),
    ) -> Result<StreamSummary, EncryptError> {
        let header = Header::generate();
        let cipher = {
            let key = derive_key(password, &header.salt, self.kdf_params())
                .map_err(EncryptError::DerivationFailed)?;
            XChaCha20Poly1305::new(key.as_bytes().into())
        };

        header.write_to(dst)?;

        let mut summary = StreamSummary {
            container_bytes: HEADER_SIZE as u64,
            ..StreamSummary::default()
        };
        let mut nonces = NonceSequence::new(header.base_nonce);
        let mut buffer = Zeroizing::new(Vec::with_capacity(self.max_sealed_len()));

        loop {
            buffer.resize(self.chunk_size(), 0);
            let n = read_full(src, &mut buffer)?;
            if n == 0 {
                break;
            }
            buffer.truncate(n);

            let chunk = nonces.counter();
            let nonce = nonces.advance();
            cipher
                .encrypt_in_place(XNonce::from_slice(&nonce), b"", &mut *buffer)
                .map_err(|_| EncryptError::Seal { chunk })?;
            write_frame(dst, &buffer)?;

            summary.chunks += 1;
            summary.plaintext_bytes += n as u64;
            summary.container_bytes += (LENGTH_PREFIX_SIZE + buffer.len()) as u64;
            summary.peak_buffer = summary.peak_buffer.max(buffer.capacity());
            trace!(chunk, plaintext = n, sealed = buffer.len(), "sealed chunk");
            on_chunk(&summary);

            if n < self.chunk_size() {
                break;
            }
        }

        dst.flush()?;
        Ok(summary)
    }
}
