// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The identity assertion: the JSON object an IdP signs to attest that it
//! authenticated a user for one specific (tagged) login attempt.
//!
//! The assertion is always serialized canonically before signing or
//! verification, so IdP and RP agree on the exact signed bytes without
//! ever exchanging them.

use crate::{canonical, encoding, TypesError, WireSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use spresso_crypto as crypto;

/// The signed triple plus any deployment-specific additional claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityAssertion {
    pub tag: String,
    pub email: String,
    pub forwarder_domain: String,
    additional: Map<String, Value>,
}

/// Wire form of a signed assertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAssertion {
    pub ia_signature: String,
}

impl IdentityAssertion {
    pub fn new(
        tag: impl Into<String>,
        email: impl Into<String>,
        forwarder_domain: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            email: email.into(),
            forwarder_domain: forwarder_domain.into(),
            additional: Map::new(),
        }
    }

    /// Merges deployment-specific claims into the signed object. Entries
    /// may shadow the protocol fields, matching on both signer and
    /// verifier or not at all.
    pub fn merge_additional(&mut self, additional: Map<String, Value>) {
        for (key, value) in additional {
            self.additional.insert(key, value);
        }
    }

    /// The canonical bytes covered by the signature.
    pub fn canonical_payload(&self) -> Result<Vec<u8>, TypesError> {
        let mut object = Map::new();
        object.insert("tag".to_owned(), Value::String(self.tag.clone()));
        object.insert("email".to_owned(), Value::String(self.email.clone()));
        object.insert(
            "forwarder_domain".to_owned(),
            Value::String(self.forwarder_domain.clone()),
        );
        for (key, value) in &self.additional {
            object.insert(key.clone(), value.clone());
        }
        Ok(canonical::canonical_json(&Value::Object(object)).into_bytes())
    }

    /// Signs the canonical payload with the IdP private key.
    pub fn sign(&self, private_key_pem: &str) -> Result<SignedAssertion, TypesError> {
        let payload = self.canonical_payload()?;
        let signature = crypto::sign(private_key_pem, &payload)?;
        Ok(SignedAssertion {
            ia_signature: encoding::to_b64(signature),
        })
    }

    /// Verifies a received signed assertion against this expected
    /// assertion under the IdP public key.
    pub fn verify(&self, public_key_pem: &str, signed: &SignedAssertion) -> Result<(), TypesError> {
        let signature = encoding::from_b64(&signed.ia_signature)?;
        let payload = self.canonical_payload()?;
        Ok(crypto::verify(public_key_pem, &signature, &payload)?)
    }
}

impl SignedAssertion {
    /// Parses and schema-validates the decrypted assertion JSON.
    pub fn from_json(data: &[u8]) -> Result<Self, TypesError> {
        let value: Value =
            serde_json::from_slice(data).map_err(|e| TypesError::InvalidJson(e.to_string()))?;
        WireSchema::IaSignature.validate(&value)?;
        serde_json::from_value(value).map_err(|e| TypesError::InvalidJson(e.to_string()))
    }
}
