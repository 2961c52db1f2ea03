// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Per-grant configuration. Each grant family owns one settings struct
//! carrying its origin, endpoints, key material and template sources;
//! constructors install the protocol's default endpoint layout, all of
//! which deployments may override before wiring the grant.

mod entry;
mod selection;

pub use entry::{CachingSetting, Endpoint, EndpointSet, ForwarderDomain};
pub use selection::{SelectionContainer, SelectionStrategy};

use crate::error::SpressoError;
use regex::Regex;
use spresso_types::user::DEFAULT_EMAIL_REGEXP;

pub const DEFAULT_SCHEME: &str = "https";

/// Default cache policy for fetched IdP metadata: one hour, in memory.
const DEFAULT_CACHE_LIFETIME_SECS: u64 = 3600;

/// Endpoint names shared between grants and session construction.
pub mod endpoint_names {
    pub const INFO: &str = "info";
    pub const LOGIN: &str = "login";
    pub const SIGN: &str = "sign";
    pub const INDEX: &str = "index";
    pub const WAIT: &str = "wait";
    pub const START_LOGIN: &str = "start_login";
    pub const REDIRECT: &str = "redirect";
    pub const LOGIN_PATH: &str = "login_path";
    pub const PROXY: &str = "proxy";
    pub const API: &str = "api";
}

/// Configuration of the identity provider grant.
#[derive(Clone, Debug)]
pub struct IdentityProviderSettings {
    pub scheme: String,
    pub domain: String,
    /// PEM-encoded RSA private key used to sign identity assertions.
    pub private_key: String,
    /// PEM-encoded RSA public key published through the well-known info
    /// endpoint.
    pub public_key: String,
    pub endpoints: EndpointSet,
    pub js_template: String,
}

impl IdentityProviderSettings {
    pub fn new(
        domain: impl Into<String>,
        private_key: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Result<Self, SpressoError> {
        Ok(Self {
            scheme: DEFAULT_SCHEME.to_owned(),
            domain: domain.into(),
            private_key: private_key.into(),
            public_key: public_key.into(),
            endpoints: EndpointSet::new(vec![
                Endpoint::new(endpoint_names::INFO, "/.well-known/spresso-info", &["GET"])?,
                Endpoint::new(endpoint_names::LOGIN, "/.well-known/spresso-login", &["GET"])?,
                Endpoint::new(endpoint_names::SIGN, "/.well-known/spresso-sign", &["POST"])?,
            ]),
            js_template: include_str!("../../resources/templates/idp_login.js").to_owned(),
        })
    }
}

/// Configuration of the relying party grant.
#[derive(Clone, Debug)]
pub struct RelyingPartySettings {
    pub scheme: String,
    /// Scheme for outbound well-known info requests; defaults to
    /// [`Self::scheme`].
    pub scheme_well_known_info: String,
    pub domain: String,
    /// Accepted email address pattern; the first capture group is the IdP
    /// netloc.
    pub regexp: Regex,
    pub endpoints: EndpointSet,
    /// Per-IdP endpoint overrides, keyed by netloc with a default set.
    pub endpoints_ext: SelectionContainer<EndpointSet>,
    /// Forwarder selection, keyed by IdP netloc with a default forwarder.
    pub fwd_selector: SelectionContainer<ForwarderDomain>,
    /// Cache policy per IdP netloc.
    pub caching_settings: SelectionContainer<CachingSetting>,
    /// Verify TLS certificates on outbound requests.
    pub verify: bool,
    /// Optional proxy URL for outbound requests.
    pub proxies: Option<String>,
    pub js_template: String,
    pub wait_template: String,
    pub redirect_template: String,
}

impl RelyingPartySettings {
    pub fn new(
        domain: impl Into<String>,
        forwarder_domain: impl Into<String>,
    ) -> Result<Self, SpressoError> {
        let scheme = DEFAULT_SCHEME.to_owned();
        let regexp = Regex::new(DEFAULT_EMAIL_REGEXP)
            .map_err(|e| SpressoError::InvalidSettings(format!("email regexp: {}", e)))?;

        let endpoints = EndpointSet::new(vec![
            Endpoint::new(endpoint_names::INDEX, "/", &["GET"])?,
            Endpoint::new(endpoint_names::WAIT, "/wait", &["GET"])?,
            Endpoint::new(endpoint_names::START_LOGIN, "/startLogin", &["POST"])?,
            Endpoint::new(endpoint_names::REDIRECT, "/redirect", &["GET"])?,
            Endpoint::new(endpoint_names::LOGIN, "/login", &["POST"])?,
        ]);

        // What the RP expects remote IdPs to serve, unless overridden per
        // netloc.
        let idp_defaults = EndpointSet::new(vec![
            Endpoint::new(endpoint_names::INFO, "/.well-known/spresso-info", &["GET"])?,
            Endpoint::new(
                endpoint_names::LOGIN_PATH,
                "/.well-known/spresso-login",
                &["GET"],
            )?,
        ]);

        Ok(Self {
            scheme_well_known_info: scheme.clone(),
            scheme,
            domain: domain.into(),
            regexp,
            endpoints,
            endpoints_ext: SelectionContainer::with_default(SelectionStrategy::Select, idp_defaults),
            fwd_selector: SelectionContainer::with_default(
                SelectionStrategy::Select,
                ForwarderDomain::new(forwarder_domain),
            ),
            caching_settings: SelectionContainer::with_default(
                SelectionStrategy::Select,
                CachingSetting::new(true, DEFAULT_CACHE_LIFETIME_SECS),
            ),
            verify: true,
            proxies: None,
            js_template: include_str!("../../resources/templates/rp_index.js").to_owned(),
            wait_template: include_str!("../../resources/templates/rp_wait.html").to_owned(),
            redirect_template: include_str!("../../resources/templates/rp_redirect.html")
                .to_owned(),
        })
    }

    pub fn set_regexp(&mut self, pattern: &str) -> Result<(), SpressoError> {
        self.regexp = Regex::new(pattern)
            .map_err(|e| SpressoError::InvalidSettings(format!("email regexp: {}", e)))?;
        Ok(())
    }
}

/// Configuration of the forwarder grant.
#[derive(Clone, Debug)]
pub struct ForwardSettings {
    pub scheme: String,
    pub domain: String,
    pub endpoints: EndpointSet,
    pub js_template: String,
    pub proxy_template: String,
}

impl ForwardSettings {
    pub fn new(domain: impl Into<String>) -> Result<Self, SpressoError> {
        Ok(Self {
            scheme: DEFAULT_SCHEME.to_owned(),
            domain: domain.into(),
            endpoints: EndpointSet::new(vec![Endpoint::new(
                endpoint_names::PROXY,
                "/proxy",
                &["GET"],
            )?]),
            js_template: include_str!("../../resources/templates/fwd_proxy.js").to_owned(),
            proxy_template: include_str!("../../resources/templates/fwd_proxy.html").to_owned(),
        })
    }
}

/// Configuration of the API information grant.
#[derive(Clone, Debug)]
pub struct ApiSettings {
    pub endpoints: EndpointSet,
}

impl ApiSettings {
    pub fn new() -> Result<Self, SpressoError> {
        Ok(Self {
            endpoints: EndpointSet::new(vec![Endpoint::new(endpoint_names::API, "/api", &["GET"])?]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idp_defaults_cover_the_well_known_surface() {
        let settings = IdentityProviderSettings::new("idp.example", "PRIV", "PUB").unwrap();
        assert_eq!(settings.scheme, "https");
        assert_eq!(
            settings
                .endpoints
                .get(endpoint_names::SIGN)
                .unwrap()
                .path(),
            "/.well-known/spresso-sign"
        );
        assert!(settings
            .endpoints
            .match_request("/.well-known/spresso-info", "GET")
            .is_some());
    }

    #[test]
    fn rp_defaults_select_the_configured_forwarder() {
        let settings = RelyingPartySettings::new("rp.example", "fwd.example").unwrap();
        let forwarder = settings.fwd_selector.select(Some("idp.example")).unwrap();
        assert_eq!(forwarder.domain, "fwd.example");
        assert!(forwarder.padding);
    }

    #[test]
    fn rp_endpoint_overrides_fall_back_to_default() {
        let mut settings = RelyingPartySettings::new("rp.example", "fwd.example").unwrap();
        settings.endpoints_ext.insert(
            "legacy.example",
            EndpointSet::new(vec![
                Endpoint::new(endpoint_names::INFO, "/spresso/info", &["GET"]).unwrap(),
                Endpoint::new(endpoint_names::LOGIN_PATH, "/spresso/login", &["GET"]).unwrap(),
            ]),
        );

        let overridden = settings.endpoints_ext.select(Some("legacy.example")).unwrap();
        assert_eq!(
            overridden.get(endpoint_names::LOGIN_PATH).unwrap().path(),
            "/spresso/login"
        );

        let default = settings.endpoints_ext.select(Some("idp.example")).unwrap();
        assert_eq!(
            default.get(endpoint_names::LOGIN_PATH).unwrap().path(),
            "/.well-known/spresso-login"
        );
    }

    #[test]
    fn rp_rejects_malformed_regexp() {
        let mut settings = RelyingPartySettings::new("rp.example", "fwd.example").unwrap();
        assert!(settings.set_regexp("[unclosed").is_err());
        assert!(settings.set_regexp(".*").is_ok());
    }
}
