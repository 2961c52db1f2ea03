// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Response construction: JSON success/error bodies and template
//! rendering for the documents handed to browsers.

use crate::{
    error::{ProtocolError, SpressoError},
    web::Response,
};
use handlebars::Handlebars;
use serde_json::{json, Map, Value};

/// Wraps `data` in a 200 JSON response. Protocol responses must never be
/// cached by intermediaries.
pub fn json_success_response(data: impl Into<String>, mut response: Response) -> Response {
    response.status_code = 200;
    response.body = data.into();
    response.set_header("Content-Type", "application/json");
    response.set_header("Cache-Control", "no-store");
    response.set_header("Pragma", "no-cache");
    response
}

/// Renders a protocol error as a JSON response with the given status.
pub fn json_error_response(error: &ProtocolError, mut response: Response, status: u16) -> Response {
    let mut body = json!({
        "error": error.kind.as_str(),
        "error_description": error.explanation,
    });
    if let Some(uri) = &error.uri {
        body.as_object_mut()
            .expect("body is an object")
            .insert("uri".to_owned(), Value::String(uri.clone()));
    }

    response.status_code = status;
    response.body = body.to_string();
    response.set_header("Content-Type", "application/json");
    response
}

/// A template plus its per-instance rendering context. Used both for the
/// JavaScript snippets embedded by site adapters and for the static
/// wait/redirect/proxy documents.
#[derive(Clone, Debug)]
pub struct Template {
    source: String,
    context: Map<String, Value>,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            context: Map::new(),
        }
    }

    pub fn insert(&mut self, key: &str, value: Value) -> &mut Self {
        self.context.insert(key.to_owned(), value);
        self
    }

    pub fn render(&self) -> Result<String, SpressoError> {
        Handlebars::new()
            .render_template(&self.source, &Value::Object(self.context.clone()))
            .map_err(|e| SpressoError::TemplateRender(e.to_string()))
    }

    /// Renders into the body of `response`.
    pub fn render_into(&self, mut response: Response) -> Result<Response, SpressoError> {
        response.body = self.render()?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolErrorKind;

    #[test]
    fn success_response_sets_no_store_headers() {
        let response = json_success_response("{}", Response::new());
        assert_eq!(response.status_code, 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("Cache-Control"), Some("no-store"));
        assert_eq!(response.header("Pragma"), Some("no-cache"));
    }

    #[test]
    fn error_response_carries_code_and_description() {
        let error = ProtocolError::new(ProtocolErrorKind::InvalidEmail)
            .with_explanation("Invalid email address");
        let response = json_error_response(&error, Response::new(), 400);

        assert_eq!(response.status_code, 400);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["error"], "invalid_email");
        assert_eq!(body["error_description"], "Invalid email address");
        assert!(body.get("uri").is_none());
    }

    #[test]
    fn error_response_includes_uri_when_present() {
        let error = ProtocolError::new(ProtocolErrorKind::ConnectionError)
            .with_uri("http://idp.example/.well-known/spresso-info");
        let body: Value =
            serde_json::from_str(&json_error_response(&error, Response::new(), 400).body).unwrap();
        assert_eq!(body["uri"], "http://idp.example/.well-known/spresso-info");
        assert_eq!(body["error_description"], Value::Null);
    }

    #[test]
    fn template_context_is_per_instance() {
        let mut first = Template::new("Hello {{name}}");
        first.insert("name", json!("world"));

        let second = Template::new("Hello {{name}}");

        assert_eq!(first.render().unwrap(), "Hello world");
        assert_eq!(second.render().unwrap(), "Hello ");
    }
}
