// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The RP-bound tag: an encrypted token binding a login attempt to the
//! relying party's origin, opaque to the IdP that signs over it.

use crate::{canonical, encoding, envelope::SealedEnvelope, TypesError};
use serde::{Deserialize, Serialize};

/// Padded origin length. Origins are filled up to one byte short of 256 so
/// the tag ciphertext does not leak the RP origin length to observers.
pub const PADDED_ORIGIN_LENGTH: usize = 256 - 1;

/// Tag contents before sealing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    rp_origin: String,
    rp_nonce: Vec<u8>,
}

/// The JSON carried inside the sealed tag: `rp_nonce` base64-encoded,
/// `rp_origin` possibly padded with trailing `=`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPlaintext {
    pub rp_nonce: String,
    pub rp_origin: String,
}

impl Tag {
    pub fn new(rp_origin: impl Into<String>, rp_nonce: Vec<u8>) -> Self {
        Self {
            rp_origin: rp_origin.into(),
            rp_nonce,
        }
    }

    /// Seals the tag under the session's `tag_key`/`tag_iv`. With `padding`
    /// the origin is masked to [`PADDED_ORIGIN_LENGTH`] bytes.
    pub fn seal(&self, key: &[u8], iv: &[u8], padding: bool) -> Result<SealedEnvelope, TypesError> {
        let rp_origin = if padding {
            pad_origin(&self.rp_origin)
        } else {
            self.rp_origin.clone()
        };
        let plaintext = TagPlaintext {
            rp_nonce: encoding::to_b64(&self.rp_nonce),
            rp_origin,
        };
        let canonical = canonical::to_canonical_json(&plaintext)?;
        SealedEnvelope::seal(key, iv, canonical.as_bytes())
    }
}

impl TagPlaintext {
    /// Opens a sealed tag and parses its JSON payload.
    pub fn open(envelope: &SealedEnvelope, key: &[u8]) -> Result<Self, TypesError> {
        let plaintext = envelope.open(key)?;
        serde_json::from_slice(&plaintext).map_err(|e| TypesError::InvalidJson(e.to_string()))
    }

    /// The origin with any `=` padding stripped.
    pub fn unpadded_origin(&self) -> &str {
        self.rp_origin.trim_end_matches('=')
    }
}

fn pad_origin(origin: &str) -> String {
    let mut padded = String::with_capacity(PADDED_ORIGIN_LENGTH.max(origin.len()));
    padded.push_str(origin);
    while padded.len() < PADDED_ORIGIN_LENGTH {
        padded.push('=');
    }
    padded
}
