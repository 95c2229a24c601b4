//! The token model handed to the payload builder.

use serde::{Deserialize, Serialize};

use crate::claims::Claim;

/// Kind of token being created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// OAuth 2.0 access token.
    #[default]
    AccessToken,
    /// OpenID Connect identity token.
    IdToken,
}

impl TokenType {
    /// Returns the protocol name of the token type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::IdToken => "id_token",
        }
    }
}

/// A token awaiting serialization.
///
/// Owned by the request that creates it. The payload builder only reads it.
///
/// # Examples
///
/// ```
/// use token_forge::{
///     claims::Claim,
///     token::{Token, TokenType},
/// };
///
/// let token = Token::new(TokenType::AccessToken, "https://issuer.example.com", 3600)
///     .with_audience("api1")
///     .with_audience("api1")
///     .with_claim(Claim::new("sub", "alice"))
///     .with_claim(Claim::new("scope", "read"));
///
/// // Audiences behave as an ordered set
/// assert_eq!(token.audiences, ["api1"]);
/// assert_eq!(token.claims.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token type.
    #[serde(default)]
    pub token_type: TokenType,

    /// Issuer (`iss`).
    pub issuer: String,

    /// Lifetime in seconds; `exp = nbf + lifetime`.
    pub lifetime: u32,

    /// Audiences (`aud`), unique and in insertion order.
    #[serde(default, deserialize_with = "deserialize_audiences")]
    pub audiences: Vec<String>,

    /// Claims to embed.
    #[serde(default)]
    pub claims: Vec<Claim>,

    /// Raw JSON confirmation (`cnf`); empty means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,

    /// Signing algorithms acceptable for this token; empty accepts any.
    #[serde(default)]
    pub allowed_signing_algorithms: Vec<String>,

    /// Requesting client, used for log context only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Token {
    /// Creates a token without audiences or claims.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(token_type: TokenType, issuer: impl Into<String>, lifetime: u32) -> Self {
        Self {
            token_type,
            issuer: issuer.into(),
            lifetime,
            ..Self::default()
        }
    }

    /// Adds an audience unless it is already present.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.add_audience(audience);
        self
    }

    /// Adds an audience unless it is already present.
    ///
    /// Returns `false` when the audience was already in the set.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn add_audience(&mut self, audience: impl Into<String>) -> bool {
        let audience = audience.into();
        if self.audiences.contains(&audience) {
            return false;
        }
        self.audiences.push(audience);
        true
    }

    /// Appends a claim.
    #[must_use]
    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    /// Appends several claims.
    #[must_use]
    pub fn with_claims<I: IntoIterator<Item = Claim>>(mut self, claims: I) -> Self {
        self.claims.extend(claims);
        self
    }

    /// Sets the raw JSON confirmation.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.confirmation = Some(confirmation.into());
        self
    }

    /// Sets the acceptable signing algorithms.
    #[must_use]
    pub fn with_allowed_signing_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_signing_algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the requesting client id.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Returns the confirmation if it is present and non-empty.
    #[must_use]
    pub fn confirmation(&self) -> Option<&str> {
        self.confirmation.as_deref().filter(|cnf| !cnf.trim().is_empty())
    }
}

fn deserialize_audiences<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut audiences = Vec::with_capacity(raw.len());
    for audience in raw {
        if !audiences.contains(&audience) {
            audiences.push(audience);
        }
    }
    Ok(audiences)
}
