// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Nonce sampling from the operating system RNG.

use rand::{rngs::OsRng, RngCore};

/// Returns `len` cryptographically random bytes.
pub fn nonce(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::nonce;

    #[test]
    fn requested_length_is_honored() {
        for len in [0, 1, 12, 16, 32] {
            assert_eq!(nonce(len).len(), len);
        }
    }

    #[test]
    fn consecutive_nonces_differ() {
        // 16 bytes collide with probability ~2^-128.
        assert_ne!(nonce(16), nonce(16));
    }
}
