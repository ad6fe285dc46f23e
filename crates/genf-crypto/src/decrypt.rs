//! Decryption pipeline
//!
//! `Init` → `HeaderRead` → `Streaming` → `Done`, or one of the terminal
//! errors. The only clean end is a zero-byte read where the next length
//! prefix would start.
//!
//! A chunk that fails to open is reported as `AuthenticationFailed`; whether
//! the password was wrong or the bytes were altered cannot be told apart.
//! Chunks before the failing one have already been written to the
//! destination stream. [`Engine::decrypt_file`] writes through a temp file,
//! so that partial plaintext is discarded rather than left under the final
//! name.

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
use crate::error::DecryptError;
use crate::format::{read_frame_len, read_full, Header, HEADER_SIZE, LENGTH_PREFIX_SIZE};
use crate::kdf::derive_key;
use crate::names::decrypted_path;
use crate::nonce::NonceSequence;
use crate::output::AtomicOutput;
use crate::password::Password;

impl Engine {
    /// Open the container `src` yields and write the plaintext to `dst`.
    pub fn decrypt_stream<R: Read, W: Write>(
        &self,
        password: &Password,
        src: &mut R,
        dst: &mut W,
    ) -> Result<StreamSummary, DecryptError> {
        self.open_stream(password, src, dst, &mut |_| {})
    }

    /// Decrypt `source` (`*.ge`) to the same path without the suffix.
    pub fn decrypt_file(
        &self,
        password: &Password,
        source: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<FileReport, DecryptError> {
        let output = decrypted_path(source)
            .ok_or_else(|| DecryptError::InvalidContainerName(source.to_path_buf()))?;
        debug!(source = %source.display(), output = %output.display(), "decrypting file");

        let mut src = File::open(source)?;
        let total = src.metadata()?.len();
        let mut out = AtomicOutput::create(&output)?;

        let summary = self.open_stream(password, &mut src, &mut out, &mut |s: &StreamSummary| {
            if let Some(cb) = progress {
                cb(s.container_bytes, total, &format!("chunk {}", s.chunks));
            }
        })?;
        let output = out.commit()?;

        debug!(
            output = %output.display(),
            chunks = summary.chunks,
            bytes = summary.plaintext_bytes,
            "decrypted file"
        );
        Ok(FileReport {
            source: source.to_path_buf(),
            output,
            summary,
        })
    }

    pub(crate) fn open_stream<R: Read, W: Write>(
        &self,
        password: &Password,
        src: &mut R,
        dst: &mut W,
        on_chunk: &mut dyn FnMut(&StreamSummary),
    ) -> Result<StreamSummary, DecryptError> {
        let header = Header::read_from(src)?;
        let cipher = {
            let key = derive_key(password, &header.salt, self.kdf_params())
                .map_err(DecryptError::DerivationFailed)?;
            XChaCha20Poly1305::new(key.as_bytes().into())
        };

        let mut summary = StreamSummary {
            container_bytes: HEADER_SIZE as u64,
            ..StreamSummary::default()
        };
        let mut nonces = NonceSequence::new(header.base_nonce);
        let max_sealed = self.max_sealed_len();
        let mut buffer = Zeroizing::new(Vec::with_capacity(max_sealed));

        while let Some(len) = read_frame_len(src, nonces.counter())? {
            let chunk = nonces.counter();

            // No valid chunk is this large; refuse before allocating for it.
            if len > max_sealed as u64 {
                return Err(DecryptError::AuthenticationFailed { chunk });
            }
            let len = len as usize;

            buffer.resize(len, 0);
            let got = read_full(src, &mut buffer)?;
            if got < len {
                return Err(DecryptError::TruncatedChunk {
                    chunk,
                    expected: len as u64,
                    got: got as u64,
                });
            }

            let nonce = nonces.advance();
            cipher
                .decrypt_in_place(XNonce::from_slice(&nonce), b"", &mut *buffer)
                .map_err(|_| DecryptError::AuthenticationFailed { chunk })?;
            dst.write_all(&buffer)?;

            summary.chunks += 1;
            summary.plaintext_bytes += buffer.len() as u64;
            summary.container_bytes += (LENGTH_PREFIX_SIZE + len) as u64;
            summary.peak_buffer = summary.peak_buffer.max(buffer.capacity());
            trace!(chunk, sealed = len, plaintext = buffer.len(), "opened chunk");
            on_chunk(&summary);
        }

        dst.flush()?;
        Ok(summary)
    }
}
