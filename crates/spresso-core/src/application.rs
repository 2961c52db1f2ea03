// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Request dispatch over registered grants. The first grant serving the
//! request's (path, method) pair handles it; protocol errors render as
//! JSON 400, everything else as a 500 with the details kept in the log.

use crate::{
    error::{ProtocolError, ProtocolErrorKind, SpressoError},
    grant::{Grant, GrantDescription},
    view::json_error_response,
    web::{Request, Response},
};
use serde_json::json;
use std::sync::Arc;

#[derive(Default)]
pub struct Application {
    grants: Vec<Arc<dyn Grant>>,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_grant(&mut self, grant: Arc<dyn Grant>) {
        self.grants.push(grant);
    }

    /// Descriptions of all registered grants, for the API grant.
    pub fn descriptions(&self) -> Vec<GrantDescription> {
        self.grants
            .iter()
            .map(|grant| GrantDescription {
                name: grant.name().to_owned(),
                endpoints: grant.endpoints().all().cloned().collect(),
            })
            .collect()
    }

    /// Routes a request to the first matching grant endpoint and runs its
    /// handler.
    pub fn dispatch(&self, request: &dyn Request) -> Response {
        for grant in &self.grants {
            let endpoint = match grant
                .endpoints()
                .match_request(request.path(), request.method())
            {
                Some(endpoint) => endpoint,
                None => continue,
            };
            let mut handler = match grant.create_handler(endpoint.name(), self) {
                Some(handler) => handler,
                None => continue,
            };
            tracing::debug!(
                grant = grant.name(),
                endpoint = endpoint.name(),
                method = request.method(),
                path = request.path(),
                "dispatching request"
            );

            let result = handler
                .read_validate_params(request)
                .and_then(|()| handler.process(request, Response::new()));
            return match result {
                Ok(response) => response,
                Err(error) => self.render_error(grant.name(), error),
            };
        }

        let mut response = Response::new();
        response.status_code = 400;
        response.set_header("Content-Type", "application/json");
        response.body = json!({
            "error": "unsupported_grant",
            "error_description": "Grant not supported",
        })
        .to_string();
        response
    }

    fn render_error(&self, grant: &str, error: SpressoError) -> Response {
        match error {
            SpressoError::Invalid(protocol_error) => {
                tracing::debug!(grant, error = %protocol_error, "request rejected");
                json_error_response(&protocol_error, Response::new(), 400)
            },
            SpressoError::UserNotAuthenticated(message) => {
                // Safety net; the signature handler normally maps this
                // itself.
                let protocol_error = ProtocolError::new(ProtocolErrorKind::AuthenticationFailed)
                    .with_explanation(message);
                json_error_response(&protocol_error, Response::new(), 400)
            },
            SpressoError::UnsupportedAdditionalData => {
                tracing::error!(grant, "site adapter returned non-object additional data");
                server_error("unsupported_additional_data")
            },
            other => {
                tracing::error!(grant, error = %other, "handler failed");
                server_error("server_error")
            },
        }
    }
}

fn server_error(code: &str) -> Response {
    let mut response = Response::new();
    response.status_code = 500;
    response.set_header("Content-Type", "application/json");
    response.body = json!({ "error": code }).to_string();
    response
}
