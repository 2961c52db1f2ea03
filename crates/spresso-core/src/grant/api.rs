// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The API grant: a JSON description of every grant registered with the
//! application.

use crate::{
    application::Application,
    error::SpressoError,
    grant::{Grant, GrantDescription, GrantHandler},
    settings::{endpoint_names, ApiSettings, EndpointSet},
    view::json_success_response,
    web::{Request, Response},
};
use std::sync::Arc;

pub struct ApiInformationGrant {
    settings: Arc<ApiSettings>,
}

impl ApiInformationGrant {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl Grant for ApiInformationGrant {
    fn name(&self) -> &'static str {
        "api_information"
    }

    fn endpoints(&self) -> &EndpointSet {
        &self.settings.endpoints
    }

    fn create_handler(
        &self,
        endpoint_name: &str,
        application: &Application,
    ) -> Option<Box<dyn GrantHandler>> {
        match endpoint_name {
            endpoint_names::API => Some(Box::new(ApiInformationHandler {
                grants: application.descriptions(),
            })),
            _ => None,
        }
    }
}

/// `GET /api`
struct ApiInformationHandler {
    grants: Vec<GrantDescription>,
}

impl GrantHandler for ApiInformationHandler {
    fn process(
        &mut self,
        _request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError> {
        let body = serde_json::to_string(&self.grants)
            .map_err(|e| SpressoError::InvalidSettings(e.to_string()))?;
        Ok(json_success_response(body, response))
    }
}
