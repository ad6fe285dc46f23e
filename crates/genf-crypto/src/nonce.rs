//! Per-chunk nonce derivation.
//!
//! The effective nonce for chunk `i` is the file's random base nonce with its
//! last 8 bytes replaced by `i` in big-endian: `base[..16] || i.to_be_bytes()`.
//! Within one file the map from counter to nonce is injective, so no nonce
//! repeats under that file's key.

use crate::NONCE_SIZE;

const COUNTER_OFFSET: usize = NONCE_SIZE - 8;

/// Effective nonce for `counter` under `base`.
pub fn chunk_nonce(base: &[u8; NONCE_SIZE], counter: u64) -> [u8; NONCE_SIZE] {
    let mut nonce = *base;
    nonce[COUNTER_OFFSET..].copy_from_slice(&counter.to_be_bytes());
    nonce
}

/// Hands out chunk nonces for one file and one direction, counter 0, 1, 2, ...
#[derive(Debug)]
pub struct NonceSequence {
    base: [u8; NONCE_SIZE],
    next: u64,
}

impl NonceSequence {
    pub fn new(base: [u8; NONCE_SIZE]) -> Self {
        Self { base, next: 0 }
    }

    /// Counter value the next call to [`advance`](Self::advance) will use.
    pub fn counter(&self) -> u64 {
        self.next
    }

    /// Nonce for the current counter, then step the counter.
    pub fn advance(&mut self) -> [u8; NONCE_SIZE] {
        let nonce = chunk_nonce(&self.base, self.next);
        // 2^64 chunks of 4 MiB is far past any addressable file
        self.next += 1;
        nonce
    }
}
