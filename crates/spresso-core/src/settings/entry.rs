// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Configuration entries: endpoints, forwarder domains and cache
//! policies. Invalid values are rejected at construction so a miswired
//! grant fails at startup, not per request.

use crate::error::SpressoError;
use serde::Serialize;
use std::collections::HashMap;

const SUPPORTED_METHODS: [&str; 7] = ["GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS"];

/// A named URL endpoint with its allowed HTTP methods.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    name: String,
    path: String,
    methods: Vec<String>,
}

impl Endpoint {
    pub fn new(name: &str, path: &str, methods: &[&str]) -> Result<Self, SpressoError> {
        if !path.starts_with('/') {
            return Err(SpressoError::InvalidSettings(format!(
                "endpoint '{}': path must start with '/', got '{}'",
                name, path
            )));
        }
        for method in methods {
            if !SUPPORTED_METHODS.contains(method) {
                return Err(SpressoError::InvalidSettings(format!(
                    "endpoint '{}': HTTP method '{}' is not supported, available methods are {:?}",
                    name, method, SUPPORTED_METHODS
                )));
            }
        }
        Ok(Self {
            name: name.to_owned(),
            path: path.to_owned(),
            methods: methods.iter().map(|m| (*m).to_owned()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn accepts(&self, path: &str, method: &str) -> bool {
        self.path == path && self.methods.iter().any(|m| m == method)
    }
}

/// The endpoints of one grant (or of one remote IdP), keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointSet {
    endpoints: HashMap<String, Endpoint>,
}

impl EndpointSet {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self {
            endpoints: endpoints
                .into_iter()
                .map(|endpoint| (endpoint.name.clone(), endpoint))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    /// The first endpoint matching a request's path and method.
    pub fn match_request(&self, path: &str, method: &str) -> Option<&Endpoint> {
        self.endpoints
            .values()
            .find(|endpoint| endpoint.accepts(path, method))
    }
}

/// A forwarder the RP may route the login flow through, with its
/// origin-length masking policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwarderDomain {
    pub domain: String,
    pub padding: bool,
}

impl ForwarderDomain {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            padding: true,
        }
    }

    pub fn without_padding(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            padding: false,
        }
    }
}

/// Cache policy for one netloc: storage location and entry lifetime.
/// A lifetime of zero disables caching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachingSetting {
    pub in_memory: bool,
    pub lifetime_secs: u64,
}

impl CachingSetting {
    pub fn new(in_memory: bool, lifetime_secs: u64) -> Self {
        Self {
            in_memory,
            lifetime_secs,
        }
    }
}
