//! JSON Web Key (JWK) export for signing credentials.
//!
//! Implements the [RFC 7517](https://www.rfc-editor.org/rfc/rfc7517.html) JWK
//! representation of Ed25519 verifying keys and the
//! [RFC 7638](https://www.rfc-editor.org/rfc/rfc7638.html) thumbprint used as
//! the `kid` header of every token signed with the matching credential.
//!
//! ```json
//! {
//!   "kty": "OKP",
//!   "crv": "Ed25519",
//!   "x": "<base64url-encoded-public-key>",
//!   "kid": "<jwk-thumbprint>",
//!   "alg": "EdDSA",
//!   "use": "sig"
//! }
//! ```

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{EDDSA, base64_url_encode};

/// Public JWK for an Ed25519 verifying key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwk {
    /// Key type (`OKP`).
    pub kty: String,
    /// Curve (`Ed25519`).
    pub crv: String,
    /// Public key, base64url without padding.
    pub x: String,
    /// Key id: RFC 7638 thumbprint.
    pub kid: String,
    /// Algorithm (`EdDSA`).
    pub alg: String,
    /// Public key use (`sig`).
    #[serde(rename = "use")]
    pub key_use: String,
}

impl Jwk {
    /// Creates a JWK from an Ed25519 verifying key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ed25519_dalek::SigningKey;
    /// use token_forge::signing::jwk::Jwk;
    ///
    /// let jwk = Jwk::from_verifying_key(&SigningKey::from_bytes(&[0u8; 32]).verifying_key());
    /// assert_eq!(jwk.kty, "OKP");
    /// assert_eq!(jwk.kid.len(), 43);
    /// ```
    #[must_use]
    pub fn from_verifying_key(verifying_key: &VerifyingKey) -> Self {
        let x = base64_url_encode(verifying_key.as_bytes());
        let kid = thumbprint(&x);
        Self {
            kty: "OKP".to_owned(),
            crv: "Ed25519".to_owned(),
            x,
            kid,
            alg: EDDSA.to_owned(),
            key_use: "sig".to_owned(),
        }
    }
}

/// RFC 7638 thumbprint of an Ed25519 public key given as base64url `x`.
///
/// Members are serialized in lexicographic order without whitespace.
pub(crate) fn thumbprint(x: &str) -> String {
    let canonical = format!(r#"{{"crv":"Ed25519","kty":"OKP","x":"{x}"}}"#);
    base64_url_encode(&Sha256::digest(canonical.as_bytes()))
}

/// JWK Set for publishing verification keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwks {
    /// Keys in the set.
    pub keys: Vec<Jwk>,
}

impl Jwks {
    /// Serializes the set as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<Jwk> for Jwks {
    fn from_iter<I: IntoIterator<Item = Jwk>>(iter: I) -> Self {
        Self { keys: iter.into_iter().collect() }
    }
}
