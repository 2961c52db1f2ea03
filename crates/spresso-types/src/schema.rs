// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! JSON schemas for every wire message, embedded at build time and
//! compiled once. Handlers validate after receiving and before emitting.

use crate::TypesError;
use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

static WELL_KNOWN_INFO: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../resources/json/wk_info.json")));
static IA_SIGNATURE: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../resources/json/ia_sig.json")));
static START_LOGIN: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../resources/json/start_login.json")));
static SEALED_ENVELOPE: Lazy<Validator> =
    Lazy::new(|| compile(include_str!("../resources/json/envelope.json")));

fn compile(resource: &str) -> Validator {
    let schema: Value = serde_json::from_str(resource).expect("embedded schema is valid JSON");
    jsonschema::validator_for(&schema).expect("embedded schema compiles")
}

/// The wire messages carrying a packaged schema resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireSchema {
    WellKnownInfo,
    IaSignature,
    StartLogin,
    SealedEnvelope,
}

impl WireSchema {
    pub fn name(&self) -> &'static str {
        match self {
            WireSchema::WellKnownInfo => "well-known info",
            WireSchema::IaSignature => "identity assertion signature",
            WireSchema::StartLogin => "start login",
            WireSchema::SealedEnvelope => "sealed envelope",
        }
    }

    fn validator(&self) -> &'static Validator {
        match self {
            WireSchema::WellKnownInfo => &WELL_KNOWN_INFO,
            WireSchema::IaSignature => &IA_SIGNATURE,
            WireSchema::StartLogin => &START_LOGIN,
            WireSchema::SealedEnvelope => &SEALED_ENVELOPE,
        }
    }

    pub fn validate(&self, instance: &Value) -> Result<(), TypesError> {
        self.validator()
            .validate(instance)
            .map_err(|error| TypesError::SchemaViolation {
                schema: self.name(),
                message: error.to_string(),
            })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator().is_valid(instance)
    }
}
