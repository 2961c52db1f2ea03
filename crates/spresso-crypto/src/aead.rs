// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! AES-256-GCM sealing for the SPRESSO tag and encrypted identity
//! assertion envelopes.
//!
//! The wire layout is `ciphertext || tag16`, i.e. the 16-byte GCM
//! authentication tag is appended to the ciphertext, matching the
//! `{iv, ciphertext}` envelope exchanged between RP and IdP. Associated
//! data is supported but the protocol currently always passes an empty
//! slice.

use crate::CryptoError;
use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};

/// AES-256 key length in bytes.
pub const AES_GCM_KEY_LENGTH: usize = 32;
/// GCM initialisation vector length in bytes.
pub const AES_GCM_IV_LENGTH: usize = 12;
/// GCM authentication tag length in bytes.
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// Encrypts `plaintext` under `key` and `iv`, returning
/// `ciphertext || tag16`.
pub fn seal(key: &[u8], iv: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key, iv)?;
    cipher
        .encrypt(Nonce::from_slice(iv), Payload {
            msg: plaintext,
            aad,
        })
        .map_err(|_| CryptoError::SealFailed)
}

/// Decrypts `ciphertext || tag16` produced by [`seal`], authenticating the
/// appended tag. Any mismatch between key, IV, ciphertext, tag or
/// associated data yields [`CryptoError::InvalidTag`].
pub fn open(key: &[u8], iv: &[u8], sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key, iv)?;
    cipher
        .decrypt(Nonce::from_slice(iv), Payload { msg: sealed, aad })
        .map_err(|_| CryptoError::InvalidTag)
}

fn cipher_for(key: &[u8], iv: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != AES_GCM_KEY_LENGTH {
        return Err(CryptoError::InvalidKeyLength {
            expected: AES_GCM_KEY_LENGTH,
            actual: key.len(),
        });
    }
    if iv.len() != AES_GCM_IV_LENGTH {
        return Err(CryptoError::InvalidIvLength {
            expected: AES_GCM_IV_LENGTH,
            actual: iv.len(),
        });
    }
    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)))
}
