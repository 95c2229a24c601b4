//! Error types for token creation.
//!
//! This module defines every error that can surface while turning a
//! [`Token`](crate::token::Token) into a signed JWT. All errors implement the
//! standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Coercion Errors** ([`FormatError`]): a claim value could not be parsed as
//!   its declared value type in strict mode
//! - **Build Errors** ([`BuildError`]): payload assembly aborted, carrying the
//!   original cause
//! - **Configuration Errors** ([`TokenError::Configuration`],
//!   [`TokenError::InvalidConfig`]): no usable signing credential, or invalid options
//! - **Signing Errors** ([`TokenError::Crypto`], [`TokenError::Serialization`]):
//!   JWS encoding failed
//!
//! # Examples
//!
//! ```
//! use token_forge::error::{Result, TokenError};
//!
//! fn require_credential(found: bool) -> Result<()> {
//!     if !found {
//!         return Err(TokenError::Configuration("no signing credential is configured".to_owned()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_credential(false).is_err());
//! ```

use thiserror::Error;

use crate::claims::ClaimValueType;

/// Result type alias for token operations.
///
/// All fallible public functions in this crate outside the coercion and
/// payload layers return this type.
pub type Result<T> = std::result::Result<T, TokenError>;

/// A claim value did not match its declared value type.
///
/// Raised only by strict coercion. Lenient coercion recovers from the same
/// condition by keeping the raw string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("claim '{claim_type}' value '{value}' is not a valid {value_type}: {reason}")]
pub struct FormatError {
    /// Claim type name (e.g. `age`).
    pub claim_type: String,
    /// Declared value type.
    pub value_type: ClaimValueType,
    /// Raw string value that failed to parse.
    pub value: String,
    /// Parser message.
    pub reason: String,
}

/// Payload assembly failed.
///
/// No partial payload is ever returned alongside this error.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A non-reserved claim failed strict coercion.
    #[error("claim coercion failed: {0}")]
    Claim(#[from] FormatError),

    /// The token confirmation (`cnf`) is not a valid JSON document.
    #[error("confirmation is not valid JSON: {0}")]
    Confirmation(#[source] serde_json::Error),

    /// A claim type repeats a key already written to the payload.
    #[error("claim '{0}' duplicates a payload key")]
    DuplicateClaim(String),
}

/// Errors that can occur while creating a token.
///
/// # Error Recovery
///
/// - **Build errors** ([`Build`](Self::Build)): fix the offending claim value or
///   confirmation and retry
/// - **Configuration errors** ([`Configuration`](Self::Configuration),
///   [`InvalidConfig`](Self::InvalidConfig)): fix key material or options; these
///   are never retried automatically
/// - **Signing errors** ([`Crypto`](Self::Crypto),
///   [`Serialization`](Self::Serialization)): check key configuration
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum TokenError {
    /// Payload assembly failed.
    #[error("JWT payload could not be created: {0}")]
    Build(#[from] BuildError),

    /// No usable signing credential is available.
    ///
    /// Raised when the key provider returns nothing for the token's allowed
    /// signing algorithms.
    #[error("Signing configuration error: {0}")]
    Configuration(String),

    /// Cryptographic operation failed.
    ///
    /// Common causes include malformed key material and unsupported
    /// algorithms.
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    /// Token options or the token description are invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use token_forge::error::TokenError;
    ///
    /// let err = TokenError::InvalidConfig("access_token_jwt_type contains whitespace".to_owned());
    /// assert!(err.to_string().contains("Invalid configuration"));
    /// ```
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON encoding of the header or payload failed.
    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
