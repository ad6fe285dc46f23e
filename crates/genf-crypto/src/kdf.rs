//! Key derivation: Argon2id (password, per-file salt) → container key

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroize;

use crate::password::Password;
use crate::{KEY_SIZE, SALT_SIZE};

/// A 256-bit key for one container, derived from the password and that
/// container's salt.
///
/// Lives only as long as the file's cipher instance; zeroized on drop.
pub struct ContainerKey {
    bytes: [u8; KEY_SIZE],
}

impl ContainerKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for ContainerKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for ContainerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Argon2id parameters for KDF
///
/// The defaults are part of the container format: encrypt and decrypt must
/// agree on them, so only tests construct anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub mem_cost_kib: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Derive a 256-bit container key from a password and salt using Argon2id.
///
/// Deterministic in `(password, salt, params)`. Callers wrap the Argon2
/// error in their own `DerivationFailed`.
pub fn derive_key(
    password: &Password,
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> Result<ContainerKey, argon2::Error> {
    let argon2_params = Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(KEY_SIZE),
    )?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    // Hash straight into the key so no stray copy is left on the stack
    let mut key = ContainerKey::from_bytes([0u8; KEY_SIZE]);
    argon2
        .hash_password_into(password.expose(), salt, &mut key.bytes)?;

    Ok(key)
}

#[cfg(test)]
pub(crate) fn fast_params() -> KdfParams {
    KdfParams {
        mem_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}
