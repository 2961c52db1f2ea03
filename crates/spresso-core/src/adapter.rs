// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Site-adapter seams: the capabilities a deployment supplies around the
//! protocol core, one small trait per handler. The core never renders
//! application HTML, stores users, or checks credentials itself.

use crate::{
    error::SpressoError,
    session::Session,
    web::{Request, Response},
};
use serde_json::Value;
use std::{collections::HashMap, sync::Mutex};
use spresso_types::user::User;

/// IdP login page: local authentication state plus the page the login
/// script is embedded into.
pub trait LoginSiteAdapter: Send + Sync {
    /// The locally authenticated user, if any (e.g. from an IdP session
    /// cookie).
    fn authenticate_user(&self, request: &dyn Request) -> Option<User>;

    /// Renders the login document with the protocol script embedded.
    fn render_page(&self, request: &dyn Request, response: Response, script: &str) -> Response;
}

/// IdP signature endpoint: authentication that must succeed before an
/// assertion is signed.
pub trait SignatureSiteAdapter: Send + Sync {
    /// Authenticates the signing request locally. Fails with
    /// [`SpressoError::UserNotAuthenticated`] when the user cannot be
    /// authenticated.
    fn authenticate_user(&self, request: &dyn Request, response: &mut Response)
        -> Result<(), SpressoError>;

    /// Deployment-specific claims merged into the signed assertion. Must
    /// be a JSON object.
    fn additional_data(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }
}

/// RP index page.
pub trait IndexSiteAdapter: Send + Sync {
    fn render_page(&self, request: &dyn Request, response: Response, script: &str) -> Response;
}

/// RP start-login endpoint: session persistence.
pub trait StartLoginSiteAdapter: Send + Sync {
    fn save_session(&self, session: Session);
}

/// RP redirect endpoint: session lookup.
pub trait RedirectSiteAdapter: Send + Sync {
    fn load_session(&self, token: &[u8]) -> Option<Session>;
}

/// RP login endpoint: session lookup and replacement, service cookie,
/// additional verification claims.
pub trait RpLoginSiteAdapter: Send + Sync {
    fn load_session(&self, token: &[u8]) -> Option<Session>;

    fn save_session(&self, session: Session);

    /// Attaches the service cookie carrying the session token.
    fn set_cookie(&self, service_token: &[u8], response: Response) -> Response;

    /// Claims the verifier merges into the expected assertion; must match
    /// what the IdP-side adapter produced. Must be a JSON object.
    fn additional_data(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }
}

/// Token-keyed in-process session store backing the RP adapters in tests
/// and single-process deployments. Access per token is serialized by the
/// inner lock.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<Vec<u8>, Session>>,
    authenticated: Mutex<HashMap<Vec<u8>, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&self, session: Session) {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .insert(session.token().to_vec(), session);
    }

    pub fn load(&self, token: &[u8]) -> Option<Session> {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .get(token)
            .cloned()
    }

    /// Moves a verified session into the authenticated set.
    pub fn save_authenticated(&self, session: Session) {
        self.authenticated
            .lock()
            .expect("session store lock poisoned")
            .insert(session.token().to_vec(), session);
    }

    pub fn load_authenticated(&self, token: &[u8]) -> Option<Session> {
        self.authenticated
            .lock()
            .expect("session store lock poisoned")
            .get(token)
            .cloned()
    }

    /// True when no session, authenticated or not, is held.
    pub fn is_empty(&self) -> bool {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .is_empty()
            && self
                .authenticated
                .lock()
                .expect("session store lock poisoned")
                .is_empty()
    }
}
