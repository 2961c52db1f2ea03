// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The transport-agnostic request/response model. An HTTP server embeds
//! the core by implementing [`Request`] over its own request type and
//! translating the returned [`Response`] back out; the core never talks
//! to a socket itself.

use std::collections::HashMap;

/// Read access to an incoming request.
pub trait Request {
    fn method(&self) -> &str;

    fn path(&self) -> &str;

    /// A parameter from the query string.
    fn get_param(&self, name: &str) -> Option<String>;

    /// A parameter from an `application/x-www-form-urlencoded` body.
    fn post_param(&self, name: &str) -> Option<String>;

    fn header(&self, name: &str) -> Option<String>;

    fn cookie(&self, name: &str) -> Option<String>;
}

/// Data returned to the requesting user agent.
#[derive(Clone, Debug)]
pub struct Response {
    pub status_code: u16,
    headers: Vec<(String, String)>,
    pub body: String,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: vec![(
                "Content-Type".to_owned(),
                "text/html; charset=utf-8".to_owned(),
            )],
            body: String::new(),
        }
    }
}

/// Attributes for a `Set-Cookie` header. Cookies default to `Secure` and
/// `HttpOnly`; deployments behind plain HTTP opt out explicitly.
#[derive(Clone, Debug)]
pub struct CookieOptions {
    pub expires: Option<String>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age: Option<u64>,
    pub secure: bool,
    pub http_only: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            expires: None,
            path: None,
            domain: None,
            max_age: None,
            secure: true,
            http_only: true,
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, replacing any previous value under the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_owned(), value.into()));
    }

    /// Appends a header without replacing existing ones (`Set-Cookie` may
    /// repeat).
    pub fn add_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.push((name.to_owned(), value.into()));
    }

    pub fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) {
        let mut cookie = format!("{}={}", name, value);
        if let Some(expires) = &options.expires {
            cookie.push_str("; Expires=");
            cookie.push_str(expires);
        }
        if let Some(max_age) = options.max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }
        if let Some(domain) = &options.domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        if let Some(path) = &options.path {
            cookie.push_str("; Path=");
            cookie.push_str(path);
        }
        if options.secure {
            cookie.push_str("; Secure");
        }
        if options.http_only {
            cookie.push_str("; HttpOnly");
        }
        self.add_header("Set-Cookie", cookie);
    }
}

/// An in-memory [`Request`] for driving handlers from tests and examples.
#[derive(Clone, Debug, Default)]
pub struct TestRequest {
    method: String,
    path: String,
    get_params: HashMap<String, String>,
    post_params: HashMap<String, String>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
}

impl TestRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: "GET".to_owned(),
            path: path.to_owned(),
            ..Self::default()
        }
    }

    pub fn post(path: &str) -> Self {
        Self {
            method: "POST".to_owned(),
            path: path.to_owned(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.get_params.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn with_form(mut self, name: &str, value: &str) -> Self {
        self.post_params.insert(name.to_owned(), value.to_owned());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_owned());
        self
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_owned(), value.to_owned());
        self
    }
}

impl Request for TestRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn get_param(&self, name: &str) -> Option<String> {
        self.get_params.get(name).cloned()
    }

    fn post_param(&self, name: &str) -> Option<String> {
        self.post_params.get(name).cloned()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_lowercase()).cloned()
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }
}
