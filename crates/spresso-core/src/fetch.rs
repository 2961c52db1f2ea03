// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Retrieval of IdP well-known info documents, with per-netloc caching.
//!
//! The outbound GET is the single blocking operation in the request path,
//! so it sits behind the [`WellKnownTransport`] seam: production wires a
//! reqwest-backed transport honoring the grant's TLS-verify and proxy
//! settings, tests inject a canned one.

use crate::{
    cache::Cache,
    error::{ProtocolError, ProtocolErrorKind, SpressoError},
    settings::{endpoint_names, RelyingPartySettings},
};

/// Outcome of a transport-level GET that reached a server.
#[derive(Clone, Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Blocking GET of a well-known URL.
pub trait WellKnownTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpReply, ProtocolError>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(verify: bool, proxy: Option<&str>) -> Result<Self, SpressoError> {
        let mut builder =
            reqwest::blocking::Client::builder().danger_accept_invalid_certs(!verify);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| SpressoError::InvalidSettings(format!("proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| SpressoError::InvalidSettings(format!("http client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_settings(settings: &RelyingPartySettings) -> Result<Self, SpressoError> {
        Self::new(settings.verify, settings.proxies.as_deref())
    }
}

impl WellKnownTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpReply, ProtocolError> {
        let response = self.client.get(url).send().map_err(|error| {
            ProtocolError::new(ProtocolErrorKind::ConnectionError)
                .with_uri(url)
                .with_explanation(error.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|error| {
            ProtocolError::new(ProtocolErrorKind::ConnectionError)
                .with_uri(url)
                .with_explanation(error.to_string())
        })?;
        Ok(HttpReply { status, body })
    }
}

/// Fetches and caches IdP well-known info per netloc.
pub struct IdpInfoFetcher {
    transport: Box<dyn WellKnownTransport>,
    cache: Cache,
}

impl IdpInfoFetcher {
    pub fn new(transport: Box<dyn WellKnownTransport>) -> Self {
        Self {
            transport,
            cache: Cache::new(),
        }
    }

    /// The well-known info JSON for `netloc`: cached if fresh, otherwise
    /// fetched and cached under the netloc's policy.
    pub fn get_content(
        &self,
        netloc: &str,
        settings: &RelyingPartySettings,
    ) -> Result<String, SpressoError> {
        let endpoint = settings
            .endpoints_ext
            .select(Some(netloc))
            .and_then(|set| set.get(endpoint_names::INFO))
            .ok_or_else(|| {
                SpressoError::InvalidSettings(format!(
                    "no well-known info endpoint configured for netloc '{}'",
                    netloc
                ))
            })?;
        let url = format!(
            "{}://{}{}",
            settings.scheme_well_known_info,
            netloc,
            endpoint.path()
        );

        if let Some(cached) = self.cache.get(netloc) {
            tracing::debug!(netloc, "well-known info served from cache");
            return Ok(cached);
        }

        tracing::debug!(netloc, %url, "fetching well-known info");
        let reply = self.transport.get(&url)?;
        if reply.status != 200 {
            return Err(ProtocolError::new(ProtocolErrorKind::InvalidStatus)
                .with_uri(&url)
                .with_explanation(format!("Received HTTP status code {}", reply.status))
                .into());
        }

        if let Some(caching) = settings.caching_settings.select(Some(netloc)) {
            self.cache.set(netloc, caching, &reply.body);
        }
        Ok(reply.body)
    }

    /// Pre-seeds the cache, e.g. for IdPs whose keys are pinned.
    pub fn seed(&self, netloc: &str, settings: &RelyingPartySettings, data: &str) {
        if let Some(caching) = settings.caching_settings.select(Some(netloc)) {
            self.cache.set(netloc, caching, data);
        }
    }
}
