// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Typed wire messages for the SPRESSO protocol, their canonical JSON
//! serialization, and the JSON-schema checks every message passes before
//! it is emitted or acted upon.

pub mod assertion;
pub mod canonical;
pub mod encoding;
pub mod envelope;
pub mod messages;
pub mod origin;
pub mod schema;
pub mod tag;
pub mod user;

pub use assertion::{IdentityAssertion, SignedAssertion};
pub use canonical::{canonical_json, to_canonical_json};
pub use encoding::{from_b64, to_b64};
pub use envelope::SealedEnvelope;
pub use messages::{StartLoginResponse, WellKnownInfo};
pub use origin::Origin;
pub use schema::WireSchema;
pub use tag::{Tag, TagPlaintext};
pub use user::User;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("malformed JSON: {0}")]
    InvalidJson(String),

    #[error("{schema} schema violation: {message}")]
    SchemaViolation {
        schema: &'static str,
        message: String,
    },

    #[error("malformed base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error(transparent)]
    Crypto(#[from] spresso_crypto::CryptoError),
}
