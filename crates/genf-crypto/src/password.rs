//! The batch password: raw bytes, held only in memory for one invocation.

use secrecy::{ExposeSecret, SecretBox};
use subtle::ConstantTimeEq;

/// Password bytes shared read-only by every file in a batch.
///
/// Zeroized on drop; `Debug` never prints the contents.
pub struct Password {
    bytes: SecretBox<[u8]>,
}

impl Password {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: SecretBox::new(bytes.into_boxed_slice()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.expose_secret().is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.bytes.expose_secret()
    }

    /// Constant-time comparison, used for the confirmation prompt.
    pub fn matches(&self, other: &Password) -> bool {
        self.expose().ct_eq(other.expose()).into()
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::from_bytes(s.into_bytes())
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
