// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use regex::Regex;

/// The address pattern accepted by default: anything without `#` or `&`
/// before the `@`, and a hostname-shaped domain after it. The domain is
/// the first capture group.
pub const DEFAULT_EMAIL_REGEXP: &str = r"^[^#&]+@([a-zA-Z0-9-.]+)$";

/// A user identified by email address. The domain part names the IdP the
/// RP contacts for this login attempt. Immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    email: String,
    netloc: Option<String>,
}

impl User {
    /// Parses `email` against `regexp`. An address that does not match
    /// yields a `User` with no netloc, reported invalid by [`Self::is_valid`].
    pub fn parse(email: &str, regexp: &Regex) -> Self {
        let netloc = if email.is_empty() {
            None
        } else {
            regexp
                .captures(email)
                .and_then(|captures| captures.get(1))
                .map(|domain| domain.as_str().to_owned())
        };
        Self {
            email: email.to_owned(),
            netloc,
        }
    }

    pub fn new(email: &str) -> Self {
        let regexp = Regex::new(DEFAULT_EMAIL_REGEXP).expect("default email regexp compiles");
        Self::parse(email, &regexp)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The IdP domain, present only for valid addresses.
    pub fn netloc(&self) -> Option<&str> {
        self.netloc.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.netloc.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_address_exposes_netloc() {
        let user = User::new("foo@bar");
        assert!(user.is_valid());
        assert_eq!(user.netloc(), Some("bar"));
        assert_eq!(user.email(), "foo@bar");
    }

    #[test]
    fn fragment_characters_are_rejected() {
        assert!(!User::new("foo#x@bar").is_valid());
        assert!(!User::new("foo&x@bar").is_valid());
    }

    #[test]
    fn empty_address_is_invalid() {
        let user = User::new("");
        assert!(!user.is_valid());
        assert_eq!(user.netloc(), None);
    }

    #[test]
    fn custom_regexp_is_honored() {
        // An RP may loosen the pattern, e.g. to allow host:port netlocs.
        let regexp = Regex::new(r"^[^#&]+@([a-zA-Z0-9-.:]+)$").unwrap();
        let user = User::parse("foo@127.0.0.1:8080", &regexp);
        assert!(user.is_valid());
        assert_eq!(user.netloc(), Some("127.0.0.1:8080"));
    }

    #[test]
    fn missing_domain_is_invalid() {
        assert!(!User::new("foo@").is_valid());
        assert!(!User::new("foo").is_valid());
    }
}
