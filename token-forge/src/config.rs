//! Token creation options.
//!
//! This module defines the TOML-deserializable options that control how
//! payloads and headers are produced.
//!
//! # Examples
//!
//! ```toml
//! emit_scopes_as_space_delimited_string = true
//! access_token_jwt_type = "at+jwt"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, TokenError};

/// Default `typ` header value for access tokens (RFC 9068).
pub const DEFAULT_ACCESS_TOKEN_JWT_TYPE: &str = "at+jwt";

/// Options applied to every token created with them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenOptions {
    /// Emit `scope` as one space-delimited string instead of a JSON array.
    pub emit_scopes_as_space_delimited_string: bool,

    /// `typ` header for access tokens. Empty disables the override and
    /// leaves the signer's default `JWT`.
    pub access_token_jwt_type: String,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            emit_scopes_as_space_delimited_string: false,
            access_token_jwt_type: DEFAULT_ACCESS_TOKEN_JWT_TYPE.to_owned(),
        }
    }
}

impl TokenOptions {
    /// Parses and validates options from TOML text.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfig`] if the TOML is malformed, has
    /// unknown keys, or fails [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use token_forge::config::TokenOptions;
    ///
    /// let options = TokenOptions::from_toml("emit_scopes_as_space_delimited_string = true").unwrap();
    /// assert!(options.emit_scopes_as_space_delimited_string);
    /// assert_eq!(options.access_token_jwt_type, "at+jwt");
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let options: Self = toml::from_str(text)
            .map_err(|e| TokenError::InvalidConfig(format!("invalid token options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Reads, parses and validates options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfig`] if the file cannot be read or its
    /// contents are invalid.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl AsRef<Path> matches std::fs conventions"
    )]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TokenError::InvalidConfig(format!("cannot read '{}': {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Validates option values.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidConfig`] if `access_token_jwt_type`
    /// contains whitespace or control characters.
    pub fn validate(&self) -> Result<()> {
        if self
            .access_token_jwt_type
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(TokenError::InvalidConfig(format!(
                "access_token_jwt_type must not contain whitespace: '{}'",
                self.access_token_jwt_type
            )));
        }
        Ok(())
    }

    /// Sets the scope formatting flag.
    #[must_use]
    pub const fn with_space_delimited_scopes(mut self, enabled: bool) -> Self {
        self.emit_scopes_as_space_delimited_string = enabled;
        self
    }

    /// Sets the access token `typ` header.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_access_token_jwt_type(mut self, jwt_type: impl Into<String>) -> Self {
        self.access_token_jwt_type = jwt_type.into();
        self
    }
}
