// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Origin-header validation by structural URL equality.

use url::Url;

/// The `Origin` header of an incoming request, compared against the
/// origin a grant is configured to serve.
#[derive(Clone, Debug)]
pub struct Origin {
    header: String,
}

impl Origin {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    /// Builds the expected origin URL for a grant configuration.
    pub fn expected(scheme: &str, domain: &str) -> String {
        format!("{}://{}", scheme, domain)
    }

    /// Structural comparison of the header against `scheme://domain`:
    /// both sides are parsed and every URL component must match. A header
    /// that does not parse never matches.
    pub fn matches(&self, scheme: &str, domain: &str) -> bool {
        let expected = match Url::parse(&Self::expected(scheme, domain)) {
            Ok(url) => url,
            Err(_) => return false,
        };
        match Url::parse(&self.header) {
            Ok(header) => header == expected,
            Err(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.header
    }
}
