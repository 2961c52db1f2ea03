// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Standard base64 as used on every SPRESSO wire field.

use crate::TypesError;

pub fn to_b64(data: impl AsRef<[u8]>) -> String {
    base64::encode(data.as_ref())
}

pub fn from_b64(data: &str) -> Result<Vec<u8>, TypesError> {
    Ok(base64::decode(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for input in [&b""[..], &b"a"[..], &b"ab"[..], &b"abc"[..], &[0u8, 255, 128, 7][..]] {
            assert_eq!(from_b64(&to_b64(input)).unwrap(), input);
        }
    }

    #[test]
    fn rejects_invalid_alphabet() {
        assert!(from_b64("not base64!").is_err());
    }
}
