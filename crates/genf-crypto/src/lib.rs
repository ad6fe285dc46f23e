//! genf-crypto: password-based chunked file encryption
//!
//! Architecture: Argon2id KDF + XChaCha20-Poly1305 over fixed-size chunks
//!
//! Pipeline: password + random salt → Argon2id → key → seal each 4 MiB chunk → framed `.ge` container
//!
//! Container layout (all integers big-endian):
//! ```text
//! [16 bytes: salt][24 bytes: base nonce]
//! repeated: [8 bytes: sealed length L][L bytes: ciphertext || 16-byte Poly1305 tag]
//! ```
//!
//! Chunk `i` is sealed under `base_nonce[..16] || i.to_be_bytes()` with no AAD.
//! A container ends only at a length-prefix boundary; an empty plaintext
//! produces a header-only, 40-byte container.

pub mod decrypt;
pub mod encrypt;
pub mod engine;
pub mod error;
pub mod format;
pub mod kdf;
pub mod names;
pub mod nonce;
pub mod output;
pub mod password;

pub use engine::{decrypt, encrypt, Engine, FileReport, ProgressFn, StreamSummary};
pub use error::{DecryptError, EncryptError};
pub use format::Header;
pub use kdf::{derive_key, ContainerKey, KdfParams};
pub use names::{decrypted_path, encrypted_path, is_container_name, ENCRYPTED_SUFFIX};
pub use nonce::{chunk_nonce, NonceSequence};
pub use password::Password;

/// Size of a derived key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the per-file Argon2id salt
pub const SALT_SIZE: usize = 16;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Maximum plaintext bytes sealed into one chunk (4 MiB)
pub const CHUNK_SIZE: usize = 4 * 1024 * 1024;
