// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The protocol error taxonomy. Recoverable protocol failures carry a
//! fixed string code rendered as a JSON 400 response; everything else is
//! a deployment fault surfaced as a 500.

use thiserror::Error;

/// Error codes defined by the protocol. These appear verbatim in the
/// `error` field of JSON error responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    Origin,
    InvalidEmail,
    InvalidIdpInfo,
    InvalidToken,
    InvalidSession,
    MissingParam,
    InvalidEia,
    InvalidSignature,
    AuthenticationFailed,
    SigningFailed,
    ConnectionError,
    InvalidStatus,
}

impl ProtocolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolErrorKind::Origin => "origin",
            ProtocolErrorKind::InvalidEmail => "invalid_email",
            ProtocolErrorKind::InvalidIdpInfo => "invalid_idp_info",
            ProtocolErrorKind::InvalidToken => "invalid_token",
            ProtocolErrorKind::InvalidSession => "invalid_session",
            ProtocolErrorKind::MissingParam => "missing_param",
            ProtocolErrorKind::InvalidEia => "invalid_eia",
            ProtocolErrorKind::InvalidSignature => "invalid_signature",
            ProtocolErrorKind::AuthenticationFailed => "authentication_failed",
            ProtocolErrorKind::SigningFailed => "signing_failed",
            ProtocolErrorKind::ConnectionError => "connection_error",
            ProtocolErrorKind::InvalidStatus => "invalid_status",
        }
    }
}

/// A recoverable protocol error: code, the URI it originated from (for
/// outbound requests), and a human-readable explanation.
#[derive(Clone, Debug)]
pub struct ProtocolError {
    pub kind: ProtocolErrorKind,
    pub uri: Option<String>,
    pub explanation: Option<String>,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.explanation {
            Some(explanation) => write!(f, "{}: {}", self.kind.as_str(), explanation),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    pub fn new(kind: ProtocolErrorKind) -> Self {
        Self {
            kind,
            uri: None,
            explanation: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum SpressoError {
    /// Request validation failed; rendered as JSON 400.
    #[error(transparent)]
    Invalid(#[from] ProtocolError),

    /// The IdP site adapter could not authenticate the user locally.
    #[error("user not authenticated: {0}")]
    UserNotAuthenticated(String),

    /// A site adapter returned additional data that is not a JSON object.
    #[error("additional data must be a JSON object")]
    UnsupportedAdditionalData,

    /// A grant was wired with an unusable configuration.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A grant was wired with an unusable site adapter.
    #[error("invalid site adapter: {0}")]
    InvalidSiteAdapter(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),
}

impl SpressoError {
    pub fn invalid(kind: ProtocolErrorKind) -> Self {
        SpressoError::Invalid(ProtocolError::new(kind))
    }
}
