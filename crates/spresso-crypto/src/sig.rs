// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! RSA PKCS#1 v1.5 / SHA-256 signatures over canonical identity
//! assertions.
//!
//! Keys are exchanged PEM-encoded: the IdP holds a private key and
//! publishes the public key through its well-known info document. Both
//! PKCS#8 (`BEGIN {PRIVATE,PUBLIC} KEY`) and the legacy PKCS#1
//! (`BEGIN RSA {PRIVATE,PUBLIC} KEY`) encodings are accepted.

use crate::CryptoError;
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey},
    pkcs1v15::{Signature, SigningKey, VerifyingKey},
    pkcs8::{DecodePrivateKey, DecodePublicKey},
    signature::{SignatureEncoding, Signer, Verifier},
    RsaPrivateKey, RsaPublicKey,
};
use sha2::Sha256;

/// Signs `data` with the PEM-encoded RSA private key, returning the raw
/// PKCS#1 v1.5 signature bytes.
pub fn sign(private_key_pem: &str, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let private_key = RsaPrivateKey::from_pkcs8_pem(private_key_pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(private_key_pem))
        .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
    let signing_key = SigningKey::<Sha256>::new(private_key);
    let signature = signing_key
        .try_sign(data)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    Ok(signature.to_vec())
}

/// Verifies a PKCS#1 v1.5 / SHA-256 `signature` over `data` under the
/// PEM-encoded RSA public key.
pub fn verify(public_key_pem: &str, signature: &[u8], data: &[u8]) -> Result<(), CryptoError> {
    let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(public_key_pem))
        .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
    let verifying_key = VerifyingKey::<Sha256>::new(public_key);
    let signature = Signature::try_from(signature).map_err(|_| CryptoError::InvalidSignature)?;
    verifying_key
        .verify(data, &signature)
        .map_err(|_| CryptoError::InvalidSignature)
}
