//! End-to-end token creation: credential lookup, payload assembly, signing.

use tracing::{debug, error, instrument};

use crate::{
    clock::{Clock, SystemClock},
    config::TokenOptions,
    error::{Result, TokenError},
    payload::build_payload,
    signing::{HeaderClaims, KeyProvider, Signer},
    token::{Token, TokenType},
};

/// Creates signed JWTs from [`Token`] descriptions.
///
/// # Examples
///
/// ```
/// use ed25519_dalek::SigningKey;
/// use token_forge::{
///     claims::Claim,
///     service::TokenCreationService,
///     signing::{InMemoryKeyProvider, JwsSigner, SigningCredential},
///     token::{Token, TokenType},
/// };
///
/// # async fn example() -> token_forge::error::Result<()> {
/// let keys = InMemoryKeyProvider::new(vec![SigningCredential::ed25519(
///     SigningKey::from_bytes(&[0u8; 32]),
/// )]);
/// let service = TokenCreationService::new(keys, JwsSigner);
///
/// let token = Token::new(TokenType::AccessToken, "https://issuer.example.com", 3600)
///     .with_audience("api1")
///     .with_claim(Claim::new("sub", "alice"));
///
/// let jwt = service.create_token(&token).await?;
/// assert_eq!(jwt.split('.').count(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokenCreationService<K, S, C = SystemClock> {
    keys: K,
    signer: S,
    clock: C,
    options: TokenOptions,
}

impl<K, S> TokenCreationService<K, S>
where
    K: KeyProvider,
    S: Signer,
{
    /// Creates a service using the system clock and default options.
    #[must_use]
    pub fn new(keys: K, signer: S) -> Self {
        Self {
            keys,
            signer,
            clock: SystemClock,
            options: TokenOptions::default(),
        }
    }
}

impl<K, S, C> TokenCreationService<K, S, C>
where
    K: KeyProvider,
    S: Signer,
    C: Clock,
{
    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> TokenCreationService<K, S, C2> {
        TokenCreationService {
            keys: self.keys,
            signer: self.signer,
            clock,
            options: self.options,
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: TokenOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &TokenOptions {
        &self.options
    }

    /// Creates a signed compact JWT for `token`.
    ///
    /// Access tokens get a `typ` header of
    /// [`access_token_jwt_type`](TokenOptions::access_token_jwt_type) when it is
    /// non-empty; everything else keeps the signer's default.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Configuration`] if no credential matches the token's
    ///   allowed signing algorithms
    /// - [`TokenError::Build`] if the payload cannot be assembled
    /// - any error from the key provider or signer
    #[instrument(
        skip_all,
        fields(
            issuer = %token.issuer,
            token_type = token.token_type.as_str(),
            client_id = token.client_id.as_deref(),
        )
    )]
    pub async fn create_token(&self, token: &Token) -> Result<String> {
        let credential = self
            .keys
            .signing_credential(&token.allowed_signing_algorithms)
            .await?
            .ok_or_else(|| {
                error!(
                    allowed = ?token.allowed_signing_algorithms,
                    "No signing credential is configured"
                );
                TokenError::Configuration("no signing credential is configured".to_owned())
            })?;

        let mut header_claims = HeaderClaims::new();
        if token.token_type == TokenType::AccessToken && !self.options.access_token_jwt_type.is_empty() {
            header_claims.insert(
                "typ".to_owned(),
                self.options.access_token_jwt_type.as_str().into(),
            );
        }

        let payload = build_payload(token, &self.clock, &self.options)?;
        let payload_json = payload.to_json_string()?;

        debug!(
            kid = credential.key_id(),
            alg = credential.algorithm(),
            claims = payload.len(),
            "Signing JWT"
        );
        self.signer.sign(&payload_json, &credential, &header_claims)
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use ed25519_dalek::SigningKey;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        claims::{Claim, ClaimValueType},
        clock::FixedClock,
        error::BuildError,
        signing::{InMemoryKeyProvider, JwsSigner, SigningCredential},
    };

    const NOW: i64 = 1_700_000_000;

    fn service() -> TokenCreationService<InMemoryKeyProvider, JwsSigner, FixedClock> {
        let keys = InMemoryKeyProvider::new(vec![SigningCredential::ed25519(
            SigningKey::from_bytes(&[5u8; 32]),
        )]);
        TokenCreationService::new(keys, JwsSigner).with_clock(FixedClock::new(NOW))
    }

    fn decode(part: &str) -> Value {
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    fn split(jwt: &str) -> (Value, Value) {
        let parts: Vec<&str> = jwt.split('.').collect();
        assert_eq!(parts.len(), 3);
        (decode(parts[0]), decode(parts[1]))
    }

    fn access_token() -> Token {
        Token::new(TokenType::AccessToken, "https://issuer.example.com", 3600)
            .with_audience("api1")
            .with_claim(Claim::new("sub", "alice"))
    }

    #[tokio::test]
    async fn test_access_token_header_and_payload() {
        let jwt = service().create_token(&access_token()).await.unwrap();
        let (header, payload) = split(&jwt);

        assert_eq!(header["alg"], "EdDSA");
        assert_eq!(header["typ"], "at+jwt");
        assert_eq!(
            payload,
            json!({
                "iss": "https://issuer.example.com",
                "nbf": NOW,
                "exp": NOW + 3600,
                "aud": "api1",
                "sub": "alice",
            })
        );
    }

    #[tokio::test]
    async fn test_id_token_keeps_default_typ() {
        let token = Token::new(TokenType::IdToken, "https://issuer.example.com", 300);
        let (header, _) = split(&service().create_token(&token).await.unwrap());
        assert_eq!(header["typ"], "JWT");
    }

    #[tokio::test]
    async fn test_empty_jwt_type_keeps_default_typ() {
        let service =
            service().with_options(TokenOptions::default().with_access_token_jwt_type(""));
        let (header, _) = split(&service.create_token(&access_token()).await.unwrap());
        assert_eq!(header["typ"], "JWT");
    }

    #[tokio::test]
    async fn test_space_delimited_scope_option() {
        let service = service().with_options(TokenOptions::default().with_space_delimited_scopes(true));
        let token = access_token()
            .with_claim(Claim::new("scope", "read"))
            .with_claim(Claim::new("scope", "write"));

        let (_, payload) = split(&service.create_token(&token).await.unwrap());
        assert_eq!(payload["scope"], "read write");
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let service = TokenCreationService::new(InMemoryKeyProvider::default(), JwsSigner);
        let err = service.create_token(&access_token()).await.unwrap_err();

        assert!(matches!(err, TokenError::Configuration(_)));
        assert!(err.to_string().contains("no signing credential is configured"));
    }

    #[tokio::test]
    async fn test_disallowed_algorithm() {
        let token = access_token().with_allowed_signing_algorithms(["RS256"]);
        let err = service().create_token(&token).await.unwrap_err();
        assert!(matches!(err, TokenError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_build_failure_propagates() {
        let token = access_token()
            .with_claim(Claim::new("age", "abc").with_value_type(ClaimValueType::Integer32));
        let err = service().create_token(&token).await.unwrap_err();

        assert!(matches!(err, TokenError::Build(BuildError::Claim(_))));
    }

    #[tokio::test]
    async fn test_kid_matches_published_key() {
        let service = service();
        let (header, _) = split(&service.create_token(&access_token()).await.unwrap());

        let jwks = service.keys.jwks();
        assert_eq!(header["kid"], jwks.keys[0].kid.as_str());
    }
}
