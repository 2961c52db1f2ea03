// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic primitives for the SPRESSO protocol.
//!
//! SPRESSO binds a login attempt to a relying party with two envelopes:
//!
//! 1. An AES-256-GCM sealed *tag* carrying the RP origin and a fresh nonce,
//!    opaque to the identity provider that signs over it ([`aead`]).
//! 2. An RSA PKCS#1 v1.5 / SHA-256 signature over the canonical identity
//!    assertion, verified by the RP against the IdP's published public key
//!    ([`sig`]).
//!
//! All key, IV and token material is sampled with [`nonce::nonce`] from the
//! operating system RNG.

pub mod aead;
pub mod nonce;
pub mod sig;
#[cfg(any(test, feature = "testing"))]
pub mod test_keys;

pub use aead::{open, seal, AES_GCM_IV_LENGTH, AES_GCM_KEY_LENGTH, AES_GCM_TAG_LENGTH};
pub use nonce::nonce;
pub use sig::{sign, verify};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("iv must be {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("aead seal failed")]
    SealFailed,

    /// The ciphertext or its appended authentication tag did not verify
    /// under the given key and IV.
    #[error("aead authentication failed")]
    InvalidTag,

    #[error("malformed PEM key: {0}")]
    InvalidKeyEncoding(String),

    #[error("signature rejected")]
    InvalidSignature,

    #[error("signing failed: {0}")]
    SigningFailed(String),
}
