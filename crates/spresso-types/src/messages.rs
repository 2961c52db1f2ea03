// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Plain wire records: the IdP's published metadata and the RP's
//! start-login reply.

use crate::{TypesError, WireSchema};
use serde::{Deserialize, Serialize};

/// IdP metadata published at `/.well-known/spresso-info`: the PEM-encoded
/// RSA public key assertions are verified against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownInfo {
    pub public_key: String,
}

impl WellKnownInfo {
    /// Parses and schema-validates a well-known document fetched from an
    /// IdP.
    pub fn from_json(data: &str) -> Result<Self, TypesError> {
        let value: serde_json::Value =
            serde_json::from_str(data).map_err(|e| TypesError::InvalidJson(e.to_string()))?;
        WireSchema::WellKnownInfo.validate(&value)?;
        serde_json::from_value(value).map_err(|e| TypesError::InvalidJson(e.to_string()))
    }
}

/// The RP's reply to `POST /startLogin`, handed to the browser script that
/// opens the IdP login window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartLoginResponse {
    pub forwarder_domain: String,
    pub login_session_token: String,
    pub tag_key: String,
}
