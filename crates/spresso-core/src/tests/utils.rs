// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    adapter::{
        IndexSiteAdapter, InMemorySessionStore, LoginSiteAdapter, RedirectSiteAdapter,
        RpLoginSiteAdapter, SignatureSiteAdapter, StartLoginSiteAdapter,
    },
    application::Application,
    error::SpressoError,
    fetch::{HttpReply, IdpInfoFetcher, WellKnownTransport},
    grant::{
        api::ApiInformationGrant, forward::ForwardGrant,
        identity_provider::IdentityProviderGrant, relying_party::RelyingPartyGrant,
    },
    session::Session,
    settings::{ApiSettings, ForwardSettings, IdentityProviderSettings, RelyingPartySettings},
    web::{CookieOptions, Request, Response},
};
use serde_json::Value;
use spresso_crypto::test_keys::{test_rsa_public_key_pem, TEST_RSA_PRIVATE_KEY_PEM};
use spresso_types::{encoding, user::User};
use std::sync::Arc;

pub const IDP_DOMAIN: &str = "idp.example";
pub const RP_DOMAIN: &str = "rp.example";
pub const FWD_DOMAIN: &str = "fwd.example";

pub fn json_body(response: &Response) -> Value {
    serde_json::from_str(&response.body).expect("response body is JSON")
}

pub fn assert_protocol_error(response: &Response, code: &str) {
    assert_eq!(response.status_code, 400, "body: {}", response.body);
    assert_eq!(json_body(response)["error"], code, "body: {}", response.body);
}

/// The IdP's published well-known document, as the RP would fetch it.
pub fn well_known_info_json() -> String {
    serde_json::json!({ "public_key": test_rsa_public_key_pem() }).to_string()
}

/// A transport serving a fixed reply, standing in for the network.
pub struct StaticTransport {
    pub status: u16,
    pub body: String,
}

impl StaticTransport {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

impl WellKnownTransport for StaticTransport {
    fn get(&self, _url: &str) -> Result<HttpReply, crate::error::ProtocolError> {
        Ok(HttpReply {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// A transport that refuses every connection.
pub struct UnreachableTransport;

impl WellKnownTransport for UnreachableTransport {
    fn get(&self, url: &str) -> Result<HttpReply, crate::error::ProtocolError> {
        Err(
            crate::error::ProtocolError::new(crate::error::ProtocolErrorKind::ConnectionError)
                .with_uri(url)
                .with_explanation("connection refused"),
        )
    }
}

// IdP-side test adapters.

/// Serves the login page; optionally already knows the user.
pub struct TestLoginAdapter {
    pub email: Option<String>,
}

impl LoginSiteAdapter for TestLoginAdapter {
    fn authenticate_user(&self, _request: &dyn Request) -> Option<User> {
        self.email.as_deref().map(User::new)
    }

    fn render_page(&self, _request: &dyn Request, mut response: Response, script: &str) -> Response {
        response.body = format!("<html><script>{}</script></html>", script);
        response
    }
}

/// Authenticates the signing request against a fixed outcome.
pub struct TestSignatureAdapter {
    pub authenticated: bool,
    pub additional: Value,
}

impl Default for TestSignatureAdapter {
    fn default() -> Self {
        Self {
            authenticated: true,
            additional: Value::Object(serde_json::Map::new()),
        }
    }
}

impl SignatureSiteAdapter for TestSignatureAdapter {
    fn authenticate_user(
        &self,
        _request: &dyn Request,
        _response: &mut Response,
    ) -> Result<(), SpressoError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(SpressoError::UserNotAuthenticated(
                "Authentication failed".to_owned(),
            ))
        }
    }

    fn additional_data(&self) -> Value {
        self.additional.clone()
    }
}

// RP-side test adapters, all sharing one in-memory store.

pub struct TestIndexAdapter;

impl IndexSiteAdapter for TestIndexAdapter {
    fn render_page(&self, _request: &dyn Request, mut response: Response, script: &str) -> Response {
        response.body = format!("<html><script>{}</script></html>", script);
        response
    }
}

pub struct StoreBackedAdapter {
    pub store: Arc<InMemorySessionStore>,
}

impl StartLoginSiteAdapter for StoreBackedAdapter {
    fn save_session(&self, session: Session) {
        self.store.save(session);
    }
}

impl RedirectSiteAdapter for StoreBackedAdapter {
    fn load_session(&self, token: &[u8]) -> Option<Session> {
        self.store.load(token)
    }
}

impl RpLoginSiteAdapter for StoreBackedAdapter {
    fn load_session(&self, token: &[u8]) -> Option<Session> {
        self.store.load(token)
    }

    fn save_session(&self, session: Session) {
        self.store.save_authenticated(session);
    }

    fn set_cookie(&self, service_token: &[u8], mut response: Response) -> Response {
        response.set_cookie("rp_session", &encoding::to_b64(service_token), &CookieOptions {
            secure: false,
            http_only: false,
            ..CookieOptions::default()
        });
        response
    }
}

pub fn idp_settings() -> IdentityProviderSettings {
    let mut settings = IdentityProviderSettings::new(
        IDP_DOMAIN,
        TEST_RSA_PRIVATE_KEY_PEM,
        test_rsa_public_key_pem(),
    )
    .unwrap();
    settings.scheme = "http".to_owned();
    settings
}

pub fn rp_settings() -> RelyingPartySettings {
    let mut settings = RelyingPartySettings::new(RP_DOMAIN, FWD_DOMAIN).unwrap();
    settings.scheme = "http".to_owned();
    settings.scheme_well_known_info = "http".to_owned();
    settings
}

/// An application serving the IdP grant with the given adapters.
pub fn idp_application(
    login_adapter: TestLoginAdapter,
    signature_adapter: TestSignatureAdapter,
) -> Application {
    let mut application = Application::new();
    application.add_grant(Arc::new(IdentityProviderGrant::new(
        idp_settings(),
        Arc::new(login_adapter),
        Arc::new(signature_adapter),
    )));
    application
}

/// An application serving the RP grant against an in-memory session store
/// and a canned transport.
pub fn rp_application(
    transport: Box<dyn WellKnownTransport>,
) -> (Application, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let mut application = Application::new();
    application.add_grant(Arc::new(RelyingPartyGrant::new(
        rp_settings(),
        Arc::new(TestIndexAdapter),
        Arc::new(StoreBackedAdapter {
            store: store.clone(),
        }),
        Arc::new(StoreBackedAdapter {
            store: store.clone(),
        }),
        Arc::new(StoreBackedAdapter {
            store: store.clone(),
        }),
        IdpInfoFetcher::new(transport),
    )));
    (application, store)
}

/// An application serving the forwarder and API grants.
pub fn infrastructure_application() -> Application {
    let mut application = Application::new();
    let mut fwd_settings = ForwardSettings::new(FWD_DOMAIN).unwrap();
    fwd_settings.scheme = "http".to_owned();
    application.add_grant(Arc::new(ForwardGrant::new(fwd_settings)));
    application.add_grant(Arc::new(ApiInformationGrant::new(ApiSettings::new().unwrap())));
    application
}
