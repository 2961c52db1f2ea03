// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The `{iv, ciphertext}` AEAD envelope shared by the RP-bound tag and the
//! encrypted identity assertion.

use crate::{encoding, TypesError, WireSchema};
use serde::{Deserialize, Serialize};
use spresso_crypto as crypto;

/// An AES-256-GCM sealed payload: base64 12-byte IV and base64
/// `ciphertext || tag16`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    pub iv: String,
    pub ciphertext: String,
}

impl SealedEnvelope {
    /// Seals `plaintext` under `key` and `iv` into wire form.
    pub fn seal(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Self, TypesError> {
        let sealed = crypto::seal(key, iv, plaintext, b"")?;
        Ok(Self {
            iv: encoding::to_b64(iv),
            ciphertext: encoding::to_b64(sealed),
        })
    }

    /// Opens the envelope with `key`, returning the plaintext.
    pub fn open(&self, key: &[u8]) -> Result<Vec<u8>, TypesError> {
        let iv = encoding::from_b64(&self.iv)?;
        let sealed = encoding::from_b64(&self.ciphertext)?;
        Ok(crypto::open(key, &iv, &sealed, b"")?)
    }

    /// Parses and schema-validates an envelope received off the wire.
    pub fn from_json(data: &str) -> Result<Self, TypesError> {
        let value: serde_json::Value =
            serde_json::from_str(data).map_err(|e| TypesError::InvalidJson(e.to_string()))?;
        WireSchema::SealedEnvelope.validate(&value)?;
        serde_json::from_value(value).map_err(|e| TypesError::InvalidJson(e.to_string()))
    }
}
