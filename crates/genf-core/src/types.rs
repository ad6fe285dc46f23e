use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way a file moves through the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Plaintext file → `.ge` container
    Encrypt,
    /// `.ge` container → plaintext file
    Decrypt,
}

impl Direction {
    /// Present-participle label used in progress lines ("encrypting")
    pub fn label(self) -> &'static str {
        match self {
            Direction::Encrypt => "encrypting",
            Direction::Decrypt => "decrypting",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}
