//! Compact JWS serialization with Ed25519.
//!
//! Tokens are built by hand as `base64url(header).base64url(payload).base64url(signature)`
//! per [RFC 7515](https://www.rfc-editor.org/rfc/rfc7515.html). The payload
//! JSON is signed exactly as produced by the payload builder, so claim order
//! is preserved in the token.

use serde_json::Value;
use signature::Signer as _;
use tracing::instrument;

use super::{HeaderClaims, Signer, SigningCredential, base64_url_encode};
use crate::error::{Result, TokenError};

/// [`Signer`] producing compact JWS tokens.
///
/// The header starts as `{"alg": <credential alg>, "typ": "JWT", "kid": <key id>}`.
/// Header claims replace matching entries in place and append the rest.
/// `alg` cannot be overridden.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwsSigner;

impl JwsSigner {
    fn header(credential: &SigningCredential, header_claims: &HeaderClaims) -> Result<HeaderClaims> {
        let mut header = HeaderClaims::new();
        header.insert("alg".to_owned(), Value::from(credential.algorithm()));
        header.insert("typ".to_owned(), Value::from("JWT"));
        header.insert("kid".to_owned(), Value::from(credential.key_id()));

        for (name, value) in header_claims {
            if name == "alg" && value.as_str() != Some(credential.algorithm()) {
                return Err(TokenError::Crypto(format!(
                    "header 'alg' {value} does not match credential algorithm '{}'",
                    credential.algorithm()
                )));
            }
            header.insert(name.clone(), value.clone());
        }
        Ok(header)
    }
}

impl Signer for JwsSigner {
    #[instrument(skip(self, payload_json, credential, header_claims), fields(kid = %credential.key_id()))]
    fn sign(
        &self,
        payload_json: &str,
        credential: &SigningCredential,
        header_claims: &HeaderClaims,
    ) -> Result<String> {
        let header = Self::header(credential, header_claims)?;
        let header_json = serde_json::to_string(&header)
            .map_err(|e| TokenError::Crypto(format!("JWT header encoding failed: {e}")))?;

        let signing_input = format!(
            "{}.{}",
            base64_url_encode(header_json.as_bytes()),
            base64_url_encode(payload_json.as_bytes())
        );

        let signature = credential.signing_key().sign(signing_input.as_bytes());
        let signature_b64 = base64_url_encode(&signature.to_bytes());

        Ok(format!("{signing_input}.{signature_b64}"))
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use ed25519_dalek::{Signature, SigningKey};
    use signature::Verifier as _;

    use super::*;

    const PAYLOAD: &str = r#"{"iss":"https://issuer.example.com","sub":"alice"}"#;

    fn credential() -> SigningCredential {
        SigningCredential::ed25519(SigningKey::from_bytes(&[9u8; 32]))
    }

    fn decode_json(part: &str) -> Value {
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    #[test]
    fn test_compact_format() {
        let token = JwsSigner.sign(PAYLOAD, &credential(), &HeaderClaims::new()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(!token.contains('='), "base64url must not be padded");
        assert_eq!(URL_SAFE_NO_PAD.decode(parts[1]).unwrap(), PAYLOAD.as_bytes());
    }

    #[test]
    fn test_default_header() {
        let credential = credential();
        let token = JwsSigner.sign(PAYLOAD, &credential, &HeaderClaims::new()).unwrap();

        let header = decode_json(token.split('.').next().unwrap());
        assert_eq!(header["alg"], "EdDSA");
        assert_eq!(header["typ"], "JWT");
        assert_eq!(header["kid"], credential.key_id());
    }

    #[test]
    fn test_signature_verifies() {
        let credential = credential();
        let token = JwsSigner.sign(PAYLOAD, &credential, &HeaderClaims::new()).unwrap();

        let (signing_input, signature_b64) = token.rsplit_once('.').unwrap();
        let bytes: [u8; 64] = URL_SAFE_NO_PAD.decode(signature_b64).unwrap().try_into().unwrap();
        let signature = Signature::from_bytes(&bytes);

        assert!(
            credential
                .verifying_key()
                .verify(signing_input.as_bytes(), &signature)
                .is_ok()
        );
    }

    #[test]
    fn test_header_claims_override_typ() {
        let mut extra = HeaderClaims::new();
        extra.insert("typ".to_owned(), Value::from("at+jwt"));
        extra.insert("x5t".to_owned(), Value::from("thumb"));

        let token = JwsSigner.sign(PAYLOAD, &credential(), &extra).unwrap();
        let header = decode_json(token.split('.').next().unwrap());

        assert_eq!(header["typ"], "at+jwt");
        assert_eq!(header["x5t"], "thumb");
        let keys: Vec<&String> = header.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["alg", "typ", "kid", "x5t"]);
    }

    #[test]
    fn test_alg_override_rejected() {
        let mut extra = HeaderClaims::new();
        extra.insert("alg".to_owned(), Value::from("none"));

        let err = JwsSigner.sign(PAYLOAD, &credential(), &extra).unwrap_err();
        assert!(matches!(err, TokenError::Crypto(_)));
    }

    #[test]
    fn test_deterministic() {
        let a = JwsSigner.sign(PAYLOAD, &credential(), &HeaderClaims::new()).unwrap();
        let b = JwsSigner.sign(PAYLOAD, &credential(), &HeaderClaims::new()).unwrap();
        assert_eq!(a, b, "Ed25519 signatures are deterministic");
    }
}
