// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The identity provider grant: well-known info publication, the login
//! document, and identity assertion signing.

use crate::{
    adapter::{LoginSiteAdapter, SignatureSiteAdapter},
    application::Application,
    error::{ProtocolError, ProtocolErrorKind, SpressoError},
    grant::{Grant, GrantHandler},
    settings::{endpoint_names, EndpointSet, IdentityProviderSettings},
    view::{json_success_response, Template},
    web::{Request, Response},
};
use serde_json::json;
use spresso_types::{
    canonical, origin::Origin, IdentityAssertion, WellKnownInfo, WireSchema,
};
use std::sync::Arc;

pub struct IdentityProviderGrant {
    settings: Arc<IdentityProviderSettings>,
    login_adapter: Arc<dyn LoginSiteAdapter>,
    signature_adapter: Arc<dyn SignatureSiteAdapter>,
}

impl IdentityProviderGrant {
    pub fn new(
        settings: IdentityProviderSettings,
        login_adapter: Arc<dyn LoginSiteAdapter>,
        signature_adapter: Arc<dyn SignatureSiteAdapter>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            login_adapter,
            signature_adapter,
        }
    }
}

impl Grant for IdentityProviderGrant {
    fn name(&self) -> &'static str {
        "identity_provider_authentication"
    }

    fn endpoints(&self) -> &EndpointSet {
        &self.settings.endpoints
    }

    fn create_handler(
        &self,
        endpoint_name: &str,
        _application: &Application,
    ) -> Option<Box<dyn GrantHandler>> {
        match endpoint_name {
            endpoint_names::INFO => Some(Box::new(InfoHandler {
                settings: self.settings.clone(),
            })),
            endpoint_names::LOGIN => Some(Box::new(LoginHandler {
                settings: self.settings.clone(),
                adapter: self.login_adapter.clone(),
            })),
            endpoint_names::SIGN => Some(Box::new(SignatureHandler {
                settings: self.settings.clone(),
                adapter: self.signature_adapter.clone(),
            })),
            _ => None,
        }
    }
}

/// `GET /.well-known/spresso-info`
struct InfoHandler {
    settings: Arc<IdentityProviderSettings>,
}

impl GrantHandler for InfoHandler {
    fn process(
        &mut self,
        _request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let info = WellKnownInfo {
            public_key: self.settings.public_key.clone(),
        };
        let value = serde_json::to_value(&info)
            .map_err(|e| SpressoError::InvalidSettings(e.to_string()))?;
        WireSchema::WellKnownInfo
            .validate(&value)
            .map_err(|e| SpressoError::InvalidSettings(e.to_string()))?;
        Ok(json_success_response(canonical::canonical_json(&value), response))
    }
}

/// `GET /.well-known/spresso-login`
struct LoginHandler {
    settings: Arc<IdentityProviderSettings>,
    adapter: Arc<dyn LoginSiteAdapter>,
}

impl GrantHandler for LoginHandler {
    fn process(
        &mut self,
        request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let user = self.adapter.authenticate_user(request);
        let email = user.as_ref().map(|user| user.email()).unwrap_or_default();

        let mut script = Template::new(&self.settings.js_template);
        script.insert("email", json!(email));
        let script = script.render()?;

        Ok(self.adapter.render_page(request, response, &script))
    }
}

/// `POST /.well-known/spresso-sign`
struct SignatureHandler {
    settings: Arc<IdentityProviderSettings>,
    adapter: Arc<dyn SignatureSiteAdapter>,
}

impl SignatureHandler {
    fn signing_failed(explanation: impl Into<String>) -> SpressoError {
        ProtocolError::new(ProtocolErrorKind::SigningFailed)
            .with_explanation(explanation)
            .into()
    }
}

impl GrantHandler for SignatureHandler {
    fn read_validate_params(&mut self, request: &dyn Request) -> Result<(), SpressoError> {
        let origin = request.header("Origin").unwrap_or_default();
        if !Origin::new(origin).matches(&self.settings.scheme, &self.settings.domain) {
            return Err(SpressoError::invalid(ProtocolErrorKind::Origin));
        }
        Ok(())
    }

    fn process(
        &mut self,
        request: &dyn Request,
        mut response: Response,
    ) -> Result<Response, SpressoError> {
        if let Err(error) = self.adapter.authenticate_user(request, &mut response) {
            let explanation = match error {
                SpressoError::UserNotAuthenticated(message) => message,
                other => return Err(other),
            };
            return Err(ProtocolError::new(ProtocolErrorKind::AuthenticationFailed)
                .with_explanation(explanation)
                .into());
        }

        let email = request
            .post_param("email")
            .ok_or_else(|| Self::signing_failed("missing 'email' parameter"))?;
        let tag = request
            .post_param("tag")
            .ok_or_else(|| Self::signing_failed("missing 'tag' parameter"))?;
        let forwarder_domain = request
            .post_param("forwarder_domain")
            .ok_or_else(|| Self::signing_failed("missing 'forwarder_domain' parameter"))?;

        let mut assertion = IdentityAssertion::new(tag, email, forwarder_domain);
        match self.adapter.additional_data() {
            serde_json::Value::Object(additional) => assertion.merge_additional(additional),
            _ => return Err(SpressoError::UnsupportedAdditionalData),
        }

        let signed = assertion
            .sign(&self.settings.private_key)
            .map_err(|e| Self::signing_failed(e.to_string()))?;

        let value = serde_json::to_value(&signed)
            .map_err(|e| Self::signing_failed(e.to_string()))?;
        WireSchema::IaSignature
            .validate(&value)
            .map_err(|e| Self::signing_failed(e.to_string()))?;

        Ok(json_success_response(canonical::canonical_json(&value), response))
    }
}
