// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The grant abstraction: a grant is a family of endpoints sharing one
//! settings object, and hands out a fresh handler per matched request.
//! Handlers run a two-step protocol, `read_validate_params` then
//! `process`; a failure in either is rendered by the dispatcher.

pub mod api;
pub mod forward;
pub mod identity_provider;
pub mod relying_party;

use crate::{
    application::Application,
    error::SpressoError,
    settings::{Endpoint, EndpointSet},
    web::{Request, Response},
};
use serde::Serialize;

/// Per-request handler state machine.
pub trait GrantHandler {
    /// Reads and validates request parameters before any processing.
    fn read_validate_params(&mut self, request: &dyn Request) -> Result<(), SpressoError> {
        let _ = request;
        Ok(())
    }

    /// Performs the endpoint's work and produces the response.
    fn process(
        &mut self,
        request: &dyn Request,
        response: Response,
    ) -> Result<Response, SpressoError>;
}

/// A registered grant family.
pub trait Grant: Send + Sync {
    fn name(&self) -> &'static str;

    fn endpoints(&self) -> &EndpointSet;

    /// A handler for the named endpoint, or `None` if this grant does not
    /// serve it.
    fn create_handler(
        &self,
        endpoint_name: &str,
        application: &Application,
    ) -> Option<Box<dyn GrantHandler>>;
}

/// Serializable description of a grant, served by the API grant.
#[derive(Clone, Debug, Serialize)]
pub struct GrantDescription {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
}
