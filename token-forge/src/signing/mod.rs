//! Signing credentials, key supply and compact JWS signing.
//!
//! The payload builder produces claims; this module turns them into a signed
//! token. Two seams keep the crypto replaceable:
//!
//! - [`KeyProvider`] supplies a [`SigningCredential`] for a token's allowed
//!   algorithms. Acquisition may suspend (remote key stores, HSMs).
//! - [`Signer`] serializes header and payload and signs them.
//!
//! [`InMemoryKeyProvider`] and [`JwsSigner`] are the bundled implementations,
//! both using Ed25519 (`EdDSA`).
//!
//! # Examples
//!
//! ```
//! use ed25519_dalek::SigningKey;
//! use token_forge::signing::{JwsSigner, Signer, SigningCredential};
//!
//! # fn example() -> token_forge::error::Result<()> {
//! let credential = SigningCredential::ed25519(SigningKey::from_bytes(&[0u8; 32]));
//! let token = JwsSigner.sign(r#"{"iss":"https://issuer.example.com"}"#, &credential, &Default::default())?;
//!
//! assert_eq!(token.split('.').count(), 3);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::fmt;

use ed25519_dalek::{SigningKey, VerifyingKey};

use crate::error::Result;

pub mod jwk;
mod jws;

pub use jwk::{Jwk, Jwks};
pub use jws::JwsSigner;

/// JWS algorithm name for Ed25519 signatures (RFC 8037).
pub const EDDSA: &str = "EdDSA";

/// Additional JOSE header parameters, e.g. a `typ` override.
pub type HeaderClaims = serde_json::Map<String, serde_json::Value>;

/// Key material and metadata used to sign a token.
#[derive(Clone)]
pub struct SigningCredential {
    signing_key: SigningKey,
    algorithm: String,
    key_id: String,
}

impl SigningCredential {
    /// Creates an `EdDSA` credential whose key id is the RFC 7638 thumbprint
    /// of the public key.
    #[must_use]
    pub fn ed25519(signing_key: SigningKey) -> Self {
        let key_id = jwk::thumbprint(&base64_url_encode(signing_key.verifying_key().as_bytes()));
        Self { signing_key, algorithm: EDDSA.to_owned(), key_id }
    }

    /// Replaces the derived key id.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = key_id.into();
        self
    }

    /// JWS `alg` value.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// JWS `kid` value.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Public half of the key pair.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Public key as a JWK carrying this credential's key id.
    #[must_use]
    pub fn jwk(&self) -> Jwk {
        Jwk {
            kid: self.key_id.clone(),
            ..Jwk::from_verifying_key(&self.verifying_key())
        }
    }

    pub(crate) const fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredential")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Supplies signing credentials.
pub trait KeyProvider: Send + Sync {
    /// Returns a credential usable with one of `allowed_algorithms`, or any
    /// credential when the list is empty.
    ///
    /// `Ok(None)` means no credential matches; callers treat that as a fatal
    /// configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing key store cannot be read.
    fn signing_credential<'a>(
        &'a self,
        allowed_algorithms: &'a [String],
    ) -> impl Future<Output = Result<Option<SigningCredential>>> + Send + 'a;
}

/// Signs a serialized payload into a compact token.
pub trait Signer: Send + Sync {
    /// Signs `payload_json` with `credential`, merging `header_claims` into
    /// the JOSE header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be built or signing fails.
    fn sign(
        &self,
        payload_json: &str,
        credential: &SigningCredential,
        header_claims: &HeaderClaims,
    ) -> Result<String>;
}

/// Fixed, ordered set of credentials held in memory.
///
/// # Examples
///
/// ```
/// use ed25519_dalek::SigningKey;
/// use token_forge::signing::{InMemoryKeyProvider, KeyProvider, SigningCredential};
///
/// # async fn example() -> token_forge::error::Result<()> {
/// let provider = InMemoryKeyProvider::new(vec![SigningCredential::ed25519(
///     SigningKey::from_bytes(&[7u8; 32]),
/// )]);
///
/// assert!(provider.signing_credential(&["EdDSA".to_owned()]).await?.is_some());
/// assert!(provider.signing_credential(&["RS256".to_owned()]).await?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyProvider {
    credentials: Vec<SigningCredential>,
}

impl InMemoryKeyProvider {
    /// Creates a provider; earlier credentials take precedence.
    #[must_use]
    pub const fn new(credentials: Vec<SigningCredential>) -> Self {
        Self { credentials }
    }

    /// Public keys of every held credential.
    #[must_use]
    pub fn jwks(&self) -> Jwks {
        self.credentials.iter().map(SigningCredential::jwk).collect()
    }

    fn select(&self, allowed_algorithms: &[String]) -> Option<&SigningCredential> {
        if allowed_algorithms.is_empty() {
            return self.credentials.first();
        }
        self.credentials
            .iter()
            .find(|credential| allowed_algorithms.iter().any(|alg| *alg == credential.algorithm))
    }
}

impl KeyProvider for InMemoryKeyProvider {
    fn signing_credential<'a>(
        &'a self,
        allowed_algorithms: &'a [String],
    ) -> impl Future<Output = Result<Option<SigningCredential>>> + Send + 'a {
        std::future::ready(Ok(self.select(allowed_algorithms).cloned()))
    }
}

/// Encodes bytes as base64url (RFC 4648) without padding, per RFC 7515.
pub(crate) fn base64_url_encode(data: &[u8]) -> String {
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(seed: u8) -> SigningCredential {
        SigningCredential::ed25519(SigningKey::from_bytes(&[seed; 32]))
    }

    #[test]
    fn test_credential_key_id_is_thumbprint() {
        let credential = credential(0);
        assert_eq!(credential.algorithm(), "EdDSA");
        assert_eq!(credential.key_id(), credential.jwk().kid);
        assert_eq!(
            credential.key_id(),
            Jwk::from_verifying_key(&credential.verifying_key()).kid
        );
    }

    #[test]
    fn test_custom_key_id() {
        let credential = credential(0).with_key_id("key-2024");
        assert_eq!(credential.key_id(), "key-2024");
        assert_eq!(credential.jwk().kid, "key-2024");
    }

    #[test]
    fn test_debug_hides_key_material() {
        let debug = format!("{:?}", credential(3));
        assert!(debug.contains("EdDSA"));
        assert!(!debug.contains("signing_key"));
    }

    #[tokio::test]
    async fn test_provider_empty_allowed_returns_first() {
        let provider = InMemoryKeyProvider::new(vec![credential(1), credential(2)]);
        let selected = provider.signing_credential(&[]).await.unwrap().unwrap();
        assert_eq!(selected.key_id(), credential(1).key_id());
    }

    #[tokio::test]
    async fn test_provider_filters_by_algorithm() {
        let provider = InMemoryKeyProvider::new(vec![credential(1)]);

        let allowed = vec!["RS256".to_owned(), "EdDSA".to_owned()];
        assert!(provider.signing_credential(&allowed).await.unwrap().is_some());

        let allowed = vec!["ES256".to_owned()];
        assert!(provider.signing_credential(&allowed).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_provider_returns_none() {
        let provider = InMemoryKeyProvider::default();
        assert!(provider.signing_credential(&[]).await.unwrap().is_none());
    }

    #[test]
    fn test_provider_jwks() {
        let provider = InMemoryKeyProvider::new(vec![credential(1), credential(2)]);
        let jwks = provider.jwks();
        assert_eq!(jwks.keys.len(), 2);
        assert_ne!(jwks.keys[0].kid, jwks.keys[1].kid);
    }

    #[test]
    fn test_base64_url_encode() {
        assert_eq!(base64_url_encode(b"hello"), "aGVsbG8");
        let encoded = base64_url_encode(&[0xff, 0xfe, 0xfd]);
        assert!(!encoded.contains('+') && !encoded.contains('/') && !encoded.contains('='));
    }
}
