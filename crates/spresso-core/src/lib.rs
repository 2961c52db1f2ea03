// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The SPRESSO single sign-on core.
//!
//! Three grant families — identity provider, relying party and forwarder —
//! implement a login flow in which an honest-but-curious IdP never learns
//! which RP a user is visiting: the RP seals its origin into an encrypted
//! tag, the IdP signs an identity assertion over that opaque tag, and the
//! assertion travels back through an origin-restricted forwarder document.
//!
//! The core is transport-agnostic and synchronous per request: an HTTP
//! server embeds it by implementing [`web::Request`] and translating
//! [`web::Response`] values, then routing everything through
//! [`application::Application::dispatch`]. Deployment-specific concerns
//! (user stores, credential checks, page chrome, session persistence)
//! plug in through the [`adapter`] traits.

pub mod adapter;
pub mod application;
pub mod cache;
pub mod error;
pub mod fetch;
pub mod grant;
pub mod session;
pub mod settings;
pub mod view;
pub mod web;

#[cfg(test)]
mod tests;

pub use application::Application;
pub use error::{ProtocolError, ProtocolErrorKind, SpressoError};
pub use session::Session;
pub use web::{Request, Response};
