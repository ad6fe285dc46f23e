//! `.ge` container framing
//!
//! ```text
//! [16 bytes: salt][24 bytes: base nonce]
//! repeated: [8 bytes: sealed length L, big-endian][L bytes: ciphertext || tag]
//! ```
//!
//! There is no length field for the whole container and no end marker: a
//! clean end of stream exactly at a length-prefix boundary terminates it.

use rand::RngCore;
use std::io::{self, Read, Write};

use crate::error::DecryptError;
use crate::{NONCE_SIZE, SALT_SIZE};

/// Salt + base nonce
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// Big-endian u64 ahead of every sealed chunk
pub const LENGTH_PREFIX_SIZE: usize = 8;

/// The unencrypted per-file header. Both fields are safe to expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub salt: [u8; SALT_SIZE],
    pub base_nonce: [u8; NONCE_SIZE],
}

impl Header {
    /// Fresh salt and base nonce from the OS-seeded CSPRNG.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut salt = [0u8; SALT_SIZE];
        let mut base_nonce = [0u8; NONCE_SIZE];
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut base_nonce);
        Self { salt, base_nonce }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..SALT_SIZE].copy_from_slice(&self.salt);
        out[SALT_SIZE..].copy_from_slice(&self.base_nonce);
        out
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Read salt then base nonce. Anything shorter than 40 bytes is
    /// `TruncatedHeader`.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, DecryptError> {
        let mut buf = [0u8; HEADER_SIZE];
        let got = read_full(r, &mut buf)?;
        if got < HEADER_SIZE {
            return Err(DecryptError::TruncatedHeader { got });
        }
        let mut salt = [0u8; SALT_SIZE];
        let mut base_nonce = [0u8; NONCE_SIZE];
        salt.copy_from_slice(&buf[..SALT_SIZE]);
        base_nonce.copy_from_slice(&buf[SALT_SIZE..]);
        Ok(Self { salt, base_nonce })
    }
}

/// Fill `buf` from `r`, stopping early only at end of stream.
///
/// Returns the number of bytes read; a value below `buf.len()` means the
/// source is exhausted. `Interrupted` reads are retried.
pub fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Write one framed chunk: length prefix, then the sealed bytes.
pub fn write_frame<W: Write>(w: &mut W, sealed: &[u8]) -> io::Result<()> {
    w.write_all(&(sealed.len() as u64).to_be_bytes())?;
    w.write_all(sealed)
}

/// Read the next chunk's length prefix.
///
/// `Ok(None)` is the only clean termination: zero bytes available at a
/// prefix boundary. One to seven bytes is `TruncatedFraming`.
pub fn read_frame_len<R: Read>(r: &mut R, chunk: u64) -> Result<Option<u64>, DecryptError> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    match read_full(r, &mut prefix)? {
        0 => Ok(None),
        LENGTH_PREFIX_SIZE => Ok(Some(u64::from_be_bytes(prefix))),
        got => Err(DecryptError::TruncatedFraming { chunk, got }),
    }
}
