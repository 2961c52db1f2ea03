// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The relying party grant: login initiation, session construction, the
//! IdP redirect, and final assertion verification.

use crate::{
    adapter::{
        IndexSiteAdapter, RedirectSiteAdapter, RpLoginSiteAdapter, StartLoginSiteAdapter,
    },
    application::Application,
    error::{ProtocolError, ProtocolErrorKind, SpressoError},
    fetch::IdpInfoFetcher,
    grant::{Grant, GrantHandler},
    session::Session,
    settings::{endpoint_names, EndpointSet, RelyingPartySettings},
    view::{json_success_response, Template},
    web::{Request, Response},
};
use percent_encoding::percent_decode_str;
use serde_json::json;
use spresso_types::{
    canonical, encoding, envelope::SealedEnvelope, origin::Origin, user::User, IdentityAssertion,
    SignedAssertion, StartLoginResponse, WireSchema,
};
use std::sync::Arc;

pub struct RelyingPartyGrant {
    settings: Arc<RelyingPartySettings>,
    index_adapter: Arc<dyn IndexSiteAdapter>,
    start_login_adapter: Arc<dyn StartLoginSiteAdapter>,
    redirect_adapter: Arc<dyn RedirectSiteAdapter>,
    login_adapter: Arc<dyn RpLoginSiteAdapter>,
    fetcher: Arc<IdpInfoFetcher>,
}

impl RelyingPartyGrant {
    pub fn new(
        settings: RelyingPartySettings,
        index_adapter: Arc<dyn IndexSiteAdapter>,
        start_login_adapter: Arc<dyn StartLoginSiteAdapter>,
        redirect_adapter: Arc<dyn RedirectSiteAdapter>,
        login_adapter: Arc<dyn RpLoginSiteAdapter>,
        fetcher: IdpInfoFetcher,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            index_adapter,
            start_login_adapter,
            redirect_adapter,
            login_adapter,
            fetcher: Arc::new(fetcher),
        }
    }

    /// The fetcher, e.g. for pre-seeding well-known documents.
    pub fn fetcher(&self) -> &IdpInfoFetcher {
        &self.fetcher
    }
}

impl Grant for RelyingPartyGrant {
    fn name(&self) -> &'static str {
        "relying_party_authentication"
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
            endpoint_names::INDEX => Some(Box::new(IndexHandler {
                settings: self.settings.clone(),
                adapter: self.index_adapter.clone(),
            })),
            endpoint_names::WAIT => Some(Box::new(WaitHandler {
                settings: self.settings.clone(),
            })),
            endpoint_names::START_LOGIN => Some(Box::new(StartLoginHandler {
                settings: self.settings.clone(),
                adapter: self.start_login_adapter.clone(),
                fetcher: self.fetcher.clone(),
                user: None,
            })),
            endpoint_names::REDIRECT => Some(Box::new(RedirectHandler {
                settings: self.settings.clone(),
                adapter: self.redirect_adapter.clone(),
                token: None,
            })),
            endpoint_names::LOGIN => Some(Box::new(LoginHandler {
                settings: self.settings.clone(),
                adapter: self.login_adapter.clone(),
                token: None,
                eia: None,
            })),
            _ => None,
        }
    }
}

/// `GET /`
struct IndexHandler {
    settings: Arc<RelyingPartySettings>,
    adapter: Arc<dyn IndexSiteAdapter>,
}

impl GrantHandler for IndexHandler {
    fn process(
        &mut self,
        request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let script = Template::new(&self.settings.js_template).render()?;
        Ok(self.adapter.render_page(request, response, &script))
    }
}

/// `GET /wait` — the assertion receiver frame.
struct WaitHandler {
    settings: Arc<RelyingPartySettings>,
}

impl GrantHandler for WaitHandler {
    fn process(
        &mut self,
        _request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        Template::new(&self.settings.wait_template).render_into(response)
    }
}

/// `POST /startLogin`
struct StartLoginHandler {
    settings: Arc<RelyingPartySettings>,
    adapter: Arc<dyn StartLoginSiteAdapter>,
    fetcher: Arc<IdpInfoFetcher>,
    user: Option<User>,
}

impl GrantHandler for StartLoginHandler {
    fn read_validate_params(&mut self, request: &dyn Request) -> Result<(), SpressoError> {
        let email = request.post_param("email").unwrap_or_default();
        let user = User::parse(&email, &self.settings.regexp);
        if !user.is_valid() {
            return Err(ProtocolError::new(ProtocolErrorKind::InvalidEmail)
                .with_explanation("Invalid email address")
                .into());
        }
        self.user = Some(user);
        Ok(())
    }

    fn process(
        &mut self,
        _request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let user = self
            .user
            .take()
            .ok_or_else(|| SpressoError::InvalidSettings("params not validated".to_owned()))?;
        let netloc = user
            .netloc()
            .ok_or_else(|| SpressoError::InvalidSettings("validated user lost netloc".to_owned()))?
            .to_owned();

        let idp_info = self.fetcher.get_content(&netloc, &self.settings)?;
        let session = Session::create(user, &idp_info, &self.settings)?;

        let reply = StartLoginResponse {
            forwarder_domain: session.forwarder_domain().to_owned(),
            login_session_token: encoding::to_b64(session.token()),
            tag_key: encoding::to_b64(session.tag_key()),
        };
        let value = serde_json::to_value(&reply).map_err(|e| {
            SpressoError::from(
                ProtocolError::new(ProtocolErrorKind::InvalidIdpInfo)
                    .with_explanation(e.to_string()),
            )
        })?;
        WireSchema::StartLogin.validate(&value).map_err(|e| {
            SpressoError::from(
                ProtocolError::new(ProtocolErrorKind::InvalidIdpInfo)
                    .with_explanation(e.to_string()),
            )
        })?;

        self.adapter.save_session(session);
        Ok(json_success_response(canonical::canonical_json(&value), response))
    }
}

/// `GET /redirect?login_session_token=...`
struct RedirectHandler {
    settings: Arc<RelyingPartySettings>,
    adapter: Arc<dyn RedirectSiteAdapter>,
    token: Option<Vec<u8>>,
}

impl GrantHandler for RedirectHandler {
    fn read_validate_params(&mut self, request: &dyn Request) -> Result<(), SpressoError> {
        let invalid_token = || SpressoError::invalid(ProtocolErrorKind::InvalidToken);

        let raw = request.get_param("login_session_token").unwrap_or_default();
        let unquoted = percent_decode_str(&raw)
            .decode_utf8()
            .map_err(|_| invalid_token())?;
        let token = encoding::from_b64(&unquoted).map_err(|_| invalid_token())?;
        if token.is_empty() {
            return Err(invalid_token());
        }
        self.token = Some(token);
        Ok(())
    }

    fn process(
        &mut self,
        _request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let token = self
            .token
            .take()
            .ok_or_else(|| SpressoError::InvalidSettings("params not validated".to_owned()))?;
        let session = self
            .adapter
            .load_session(&token)
            .ok_or_else(|| SpressoError::invalid(ProtocolErrorKind::InvalidSession))?;

        let mut template = Template::new(&self.settings.redirect_template);
        template.insert("url", json!(session.login_url()));
        template.render_into(response)
    }
}

/// `POST /login`
struct LoginHandler {
    settings: Arc<RelyingPartySettings>,
    adapter: Arc<dyn RpLoginSiteAdapter>,
    token: Option<Vec<u8>>,
    eia: Option<String>,
}

impl GrantHandler for LoginHandler {
    fn read_validate_params(&mut self, request: &dyn Request) -> Result<(), SpressoError> {
        let token_b64 = request
            .post_param("login_session_token")
            .ok_or_else(|| SpressoError::invalid(ProtocolErrorKind::MissingParam))?;
        let eia = request
            .post_param("eia")
            .ok_or_else(|| SpressoError::invalid(ProtocolErrorKind::MissingParam))?;

        let origin = request.header("Origin").unwrap_or_default();
        if !Origin::new(origin).matches(&self.settings.scheme, &self.settings.domain) {
            return Err(SpressoError::invalid(ProtocolErrorKind::Origin));
        }

        let token = encoding::from_b64(&token_b64)
            .map_err(|_| SpressoError::invalid(ProtocolErrorKind::InvalidToken))?;
        self.token = Some(token);
        self.eia = Some(eia);
        Ok(())
    }

    fn process(
        &mut self,
        _request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let invalid_eia = |explanation: String| {
            SpressoError::from(
                ProtocolError::new(ProtocolErrorKind::InvalidEia).with_explanation(explanation),
            )
        };
        let invalid_signature = |explanation: String| {
            SpressoError::from(
                ProtocolError::new(ProtocolErrorKind::InvalidSignature)
                    .with_explanation(explanation),
            )
        };

        let (token, eia) = match (self.token.take(), self.eia.take()) {
            (Some(token), Some(eia)) => (token, eia),
            _ => return Err(SpressoError::InvalidSettings("params not validated".to_owned())),
        };

        let mut session = self
            .adapter
            .load_session(&token)
            .ok_or_else(|| SpressoError::invalid(ProtocolErrorKind::InvalidSession))?;

        // Unseal the encrypted assertion under the session's IA key.
        let envelope = SealedEnvelope::from_json(&eia).map_err(|e| invalid_eia(e.to_string()))?;
        let signed_bytes = envelope
            .open(session.ia_key())
            .map_err(|e| invalid_eia(e.to_string()))?;

        // Reconstruct the expected assertion and verify the signature
        // under the IdP key fetched at start-login.
        let signed = SignedAssertion::from_json(&signed_bytes)
            .map_err(|e| invalid_signature(e.to_string()))?;
        let mut expected = IdentityAssertion::new(
            session.tag_enc_json(),
            session.user().email(),
            session.forwarder_domain(),
        );
        match self.adapter.additional_data() {
            serde_json::Value::Object(additional) => expected.merge_additional(additional),
            _ => return Err(SpressoError::UnsupportedAdditionalData),
        }
        expected
            .verify(&session.idp_wk().public_key, &signed)
            .map_err(|e| invalid_signature(e.to_string()))?;

        session.mark_authenticated();
        let email = session.user().email().to_owned();
        let service_token = session.token().to_vec();
        self.adapter.save_session(session);

        let response = self.adapter.set_cookie(&service_token, response);
        Ok(json_success_response(email, response))
    }
}
