// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The forwarder grant: serves the fixed origin-restricted proxy document
//! that relays postMessages between RP and IdP windows.

use crate::{
    application::Application,
    error::SpressoError,
    grant::{Grant, GrantHandler},
    settings::{endpoint_names, EndpointSet, ForwardSettings},
    view::Template,
    web::{Request, Response},
};
use serde_json::json;
use std::sync::Arc;

pub struct ForwardGrant {
    settings: Arc<ForwardSettings>,
}

impl ForwardGrant {
    pub fn new(settings: ForwardSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl Grant for ForwardGrant {
    fn name(&self) -> &'static str {
        "forward_authentication"
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
            endpoint_names::PROXY => Some(Box::new(ProxyHandler {
                settings: self.settings.clone(),
            })),
            _ => None,
        }
    }
}

/// `GET /proxy`
struct ProxyHandler {
    settings: Arc<ForwardSettings>,
}

impl GrantHandler for ProxyHandler {
    fn process(
        &mut self,
        _request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let script = Template::new(&self.settings.js_template).render()?;
        let mut document = Template::new(&self.settings.proxy_template);
        document.insert("script", json!(script));
        document.render_into(response)
    }
}
