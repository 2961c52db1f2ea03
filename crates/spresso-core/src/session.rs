// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Per-login-attempt RP state. A session is created at start-login with
//! fresh key material, binds the attempt to the RP origin through the
//! sealed tag, and is only ever mutated again to be marked authenticated
//! after the identity assertion verifies.

use crate::{
    error::{ProtocolError, ProtocolErrorKind, SpressoError},
    settings::{endpoint_names, RelyingPartySettings},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use spresso_crypto::{nonce, AES_GCM_IV_LENGTH, AES_GCM_KEY_LENGTH};
use spresso_types::{canonical, encoding, origin::Origin, tag::Tag, user::User, WellKnownInfo};

pub const TOKEN_LENGTH: usize = 16;
pub const RP_NONCE_LENGTH: usize = 16;

/// Everything except unreserved characters and `/` is escaped in the
/// login-URL fragment fields.
const FRAGMENT_QUOTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

#[derive(Clone, Debug)]
pub struct Session {
    token: Vec<u8>,
    user: User,
    idp_netloc: String,
    idp_wk: WellKnownInfo,
    tag_key: Vec<u8>,
    tag_iv: Vec<u8>,
    tag_enc_json: String,
    ia_key: Vec<u8>,
    rp_nonce: Vec<u8>,
    rp_origin: String,
    forwarder_domain: String,
    padding: bool,
    scheme: String,
    idp_login_path: String,
    authenticated: bool,
}

fn invalid_idp_info(explanation: impl Into<String>) -> SpressoError {
    ProtocolError::new(ProtocolErrorKind::InvalidIdpInfo)
        .with_explanation(explanation)
        .into()
}

impl Session {
    /// Builds a session for a validated user from the fetched well-known
    /// document. Any failure here (malformed or schema-invalid document,
    /// unresolvable forwarder or IdP endpoints) is an `invalid_idp_info`
    /// protocol error.
    pub fn create(
        user: User,
        idp_info_json: &str,
        settings: &RelyingPartySettings,
    ) -> Result<Self, SpressoError> {
        let idp_netloc = user
            .netloc()
            .ok_or_else(|| invalid_idp_info("user has no identity provider domain"))?
            .to_owned();

        let idp_wk =
            WellKnownInfo::from_json(idp_info_json).map_err(|e| invalid_idp_info(e.to_string()))?;

        let forwarder = settings
            .fwd_selector
            .select(Some(&idp_netloc))
            .ok_or_else(|| invalid_idp_info("no forwarder configured"))?
            .clone();

        let idp_login_path = settings
            .endpoints_ext
            .select(Some(&idp_netloc))
            .and_then(|set| set.get(endpoint_names::LOGIN_PATH))
            .ok_or_else(|| invalid_idp_info("no IdP login endpoint configured"))?
            .path()
            .to_owned();

        let rp_origin = Origin::expected(&settings.scheme, &settings.domain);

        let token = nonce(TOKEN_LENGTH);
        let tag_key = nonce(AES_GCM_KEY_LENGTH);
        let tag_iv = nonce(AES_GCM_IV_LENGTH);
        let ia_key = nonce(AES_GCM_KEY_LENGTH);
        let rp_nonce = nonce(RP_NONCE_LENGTH);

        let tag_envelope = Tag::new(rp_origin.clone(), rp_nonce.clone())
            .seal(&tag_key, &tag_iv, forwarder.padding)
            .map_err(|e| invalid_idp_info(e.to_string()))?;
        let tag_enc_json = canonical::to_canonical_json(&tag_envelope)
            .map_err(|e| invalid_idp_info(e.to_string()))?;

        Ok(Self {
            token,
            user,
            idp_netloc,
            idp_wk,
            tag_key,
            tag_iv,
            tag_enc_json,
            ia_key,
            rp_nonce,
            rp_origin,
            forwarder_domain: forwarder.domain,
            padding: forwarder.padding,
            scheme: settings.scheme.clone(),
            idp_login_path,
            authenticated: false,
        })
    }

    /// The IdP login URL the browser is redirected to. The fragment never
    /// reaches the IdP server, only its login document:
    /// `#<tag>&<email>&<b64(ia_key)>&<forwarder_domain>`.
    pub fn login_url(&self) -> String {
        format!(
            "{}://{}{}#{}&{}&{}&{}",
            self.scheme,
            self.idp_netloc,
            self.idp_login_path,
            quote(&self.tag_enc_json),
            quote(self.user.email()),
            quote(&encoding::to_b64(&self.ia_key)),
            self.forwarder_domain
        )
    }

    pub fn mark_authenticated(&mut self) {
        self.authenticated = true;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn token(&self) -> &[u8] {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn idp_netloc(&self) -> &str {
        &self.idp_netloc
    }

    pub fn idp_wk(&self) -> &WellKnownInfo {
        &self.idp_wk
    }

    pub fn tag_key(&self) -> &[u8] {
        &self.tag_key
    }

    pub fn tag_iv(&self) -> &[u8] {
        &self.tag_iv
    }

    pub fn tag_enc_json(&self) -> &str {
        &self.tag_enc_json
    }

    pub fn ia_key(&self) -> &[u8] {
        &self.ia_key
    }

    pub fn rp_nonce(&self) -> &[u8] {
        &self.rp_nonce
    }

    pub fn rp_origin(&self) -> &str {
        &self.rp_origin
    }

    pub fn forwarder_domain(&self) -> &str {
        &self.forwarder_domain
    }

    pub fn padding(&self) -> bool {
        self.padding
    }
}

fn quote(value: &str) -> String {
    utf8_percent_encode(value, FRAGMENT_QUOTE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spresso_types::{envelope::SealedEnvelope, tag::TagPlaintext};

    const WK_INFO: &str = r#"{"public_key":"-----BEGIN PUBLIC KEY-----"}"#;

    fn settings() -> RelyingPartySettings {
        let mut settings = RelyingPartySettings::new("rp.example", "fwd.example").unwrap();
        settings.scheme = "http".to_owned();
        settings
    }

    fn session() -> Session {
        Session::create(User::new("foo@idp.example"), WK_INFO, &settings()).unwrap()
    }

    #[test]
    fn key_material_has_protocol_lengths() {
        let session = session();
        assert_eq!(session.token().len(), 16);
        assert_eq!(session.tag_key().len(), 32);
        assert_eq!(session.tag_iv().len(), 12);
        assert_eq!(session.ia_key().len(), 32);
        assert_eq!(session.rp_nonce().len(), 16);
    }

    #[test]
    fn key_material_is_fresh_per_session() {
        let a = session();
        let b = session();
        assert_ne!(a.token(), b.token());
        assert_ne!(a.tag_key(), b.tag_key());
        assert_ne!(a.ia_key(), b.ia_key());
        assert_ne!(a.rp_nonce(), b.rp_nonce());
        assert_ne!(a.tag_iv(), b.tag_iv());
    }

    #[test]
    fn settings_flow_into_the_session() {
        let session = session();
        assert_eq!(session.rp_origin(), "http://rp.example");
        assert_eq!(session.forwarder_domain(), "fwd.example");
        assert!(session.padding());
        assert_eq!(session.idp_netloc(), "idp.example");
        assert_eq!(session.idp_wk().public_key, "-----BEGIN PUBLIC KEY-----");
    }

    #[test]
    fn login_url_carries_the_four_fragment_fields() {
        let session = session();
        let url = session.login_url();

        let (base, fragment) = url.split_once('#').unwrap();
        assert_eq!(base, "http://idp.example/.well-known/spresso-login");

        let fields: Vec<&str> = fragment.split('&').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[3], "fwd.example");

        // Field 3 is the urlencoded base64 IA key. '=' must be escaped.
        assert!(!fields[2].contains('='));
        let ia_key = percent_encoding::percent_decode_str(fields[2])
            .decode_utf8()
            .unwrap();
        assert_eq!(encoding::from_b64(&ia_key).unwrap(), session.ia_key());

        // Field 2 is the urlencoded email.
        let email = percent_encoding::percent_decode_str(fields[1])
            .decode_utf8()
            .unwrap();
        assert_eq!(email, "foo@idp.example");
    }

    #[test]
    fn tag_in_login_url_binds_the_rp_origin() {
        let session = session();
        let url = session.login_url();
        let fragment = url.split_once('#').unwrap().1;
        let tag_json = percent_encoding::percent_decode_str(fragment.split('&').next().unwrap())
            .decode_utf8()
            .unwrap();

        let envelope: SealedEnvelope = serde_json::from_str(&tag_json).unwrap();
        let plaintext = TagPlaintext::open(&envelope, session.tag_key()).unwrap();

        assert_eq!(plaintext.unpadded_origin(), session.rp_origin());
        assert_eq!(plaintext.rp_nonce, encoding::to_b64(session.rp_nonce()));
        // Default forwarder policy pads the origin.
        assert_eq!(plaintext.rp_origin.len(), 255);
    }

    #[test]
    fn unpadded_forwarder_leaves_the_origin_bare() {
        let mut settings = settings();
        settings.fwd_selector.update_default(
            crate::settings::ForwarderDomain::without_padding("fwd.example"),
        );
        let session = Session::create(User::new("foo@idp.example"), WK_INFO, &settings).unwrap();

        let envelope: SealedEnvelope = serde_json::from_str(session.tag_enc_json()).unwrap();
        let plaintext = TagPlaintext::open(&envelope, session.tag_key()).unwrap();
        assert_eq!(plaintext.rp_origin, "http://rp.example");
    }

    #[test]
    fn malformed_idp_info_is_rejected() {
        for bad in ["", "null", r#"{"wrong":"shape"}"#, "{"] {
            match Session::create(User::new("foo@idp.example"), bad, &settings()) {
                Err(SpressoError::Invalid(error)) => {
                    assert_eq!(error.kind, ProtocolErrorKind::InvalidIdpInfo)
                },
                other => panic!("expected invalid_idp_info, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn authentication_flag_is_the_only_mutation() {
        let mut session = session();
        assert!(!session.is_authenticated());
        let token = session.token().to_vec();
        session.mark_authenticated();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), token);
    }
}
