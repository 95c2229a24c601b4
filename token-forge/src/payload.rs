//! JWT payload assembly.
//!
//! [`build_payload`] turns a [`Token`] into the ordered claim map that is
//! signed into a compact JWT. Keys are emitted in a fixed order:
//!
//! 1. `iss`, `nbf`, `exp`
//! 2. `aud`, `cnf`, `scope`, `amr` when present
//! 3. every other claim type, in first-seen order
//!
//! # Reserved Claims
//!
//! | Claim   | Source                           | Shape                                   |
//! |---------|----------------------------------|-----------------------------------------|
//! | `aud`   | [`Token::audiences`]             | string for one audience, list otherwise |
//! | `cnf`   | [`Token::confirmation`]          | parsed JSON document                    |
//! | `scope` | claims of type `scope`           | list, or space-delimited string         |
//! | `amr`   | claims of type `amr`             | list of distinct values                 |
//!
//! Other claims are coerced strictly: a value that does not parse as its
//! declared type aborts the build with [`BuildError`]. So does a claim whose
//! type names a key already written (`iss`, `nbf`, `exp`, and `aud`/`cnf` when
//! present).
//!
//! # Examples
//!
//! ```
//! use token_forge::{
//!     claims::Claim,
//!     clock::FixedClock,
//!     config::TokenOptions,
//!     payload::build_payload,
//!     token::{Token, TokenType},
//! };
//!
//! let token = Token::new(TokenType::AccessToken, "https://issuer.example.com", 3600)
//!     .with_audience("api1")
//!     .with_claim(Claim::new("sub", "alice"))
//!     .with_claim(Claim::new("scope", "read"))
//!     .with_claim(Claim::new("scope", "write"));
//!
//! let payload = build_payload(&token, &FixedClock::new(1_700_000_000), &TokenOptions::default())?;
//!
//! assert_eq!(
//!     payload.to_json_string()?,
//!     r#"{"iss":"https://issuer.example.com","nbf":1700000000,"exp":1700003600,"aud":"api1","scope":["read","write"],"sub":"alice"}"#
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use indexmap::{IndexMap, IndexSet};
use tracing::{error, instrument};

use crate::{
    claims::{Claim, distinct_claims},
    clock::Clock,
    coerce::{CoercionMode, coerce},
    config::TokenOptions,
    error::{BuildError, FormatError},
    token::Token,
    value::{ClaimValue, Payload},
};

/// Issuer claim name.
pub const ISSUER: &str = "iss";
/// Not-before claim name.
pub const NOT_BEFORE: &str = "nbf";
/// Expiration claim name.
pub const EXPIRATION: &str = "exp";
/// Audience claim name.
pub const AUDIENCE: &str = "aud";
/// Confirmation claim name.
pub const CONFIRMATION: &str = "cnf";
/// Scope claim name.
pub const SCOPE: &str = "scope";
/// Authentication method references claim name.
pub const AUTHENTICATION_METHOD: &str = "amr";

/// Builds the ordered JWT payload for `token`.
///
/// # Errors
///
/// Returns [`BuildError::Confirmation`] if the confirmation is not valid JSON,
/// [`BuildError::Claim`] if a non-reserved claim does not parse as its
/// declared value type, and [`BuildError::DuplicateClaim`] if a claim type
/// repeats a key already in the payload. Failures are logged with the token context before
/// being returned.
#[instrument(
    skip_all,
    fields(
        issuer = %token.issuer,
        token_type = token.token_type.as_str(),
        client_id = token.client_id.as_deref(),
        claim_count = token.claims.len(),
    )
)]
pub fn build_payload<C: Clock + ?Sized>(
    token: &Token,
    clock: &C,
    options: &TokenOptions,
) -> Result<Payload, BuildError> {
    assemble(token, clock, options).inspect_err(|e| {
        error!(error = %e, "JWT payload could not be created");
    })
}

fn assemble<C: Clock + ?Sized>(
    token: &Token,
    clock: &C,
    options: &TokenOptions,
) -> Result<Payload, BuildError> {
    let now = clock.unix_now();
    let exp = now.saturating_add(i64::from(token.lifetime));

    let mut payload = Payload::new();
    payload.insert(ISSUER, token.issuer.as_str());
    payload.insert(NOT_BEFORE, now);
    payload.insert(EXPIRATION, exp);

    match token.audiences.as_slice() {
        [] => {}
        [single] => {
            payload.insert(AUDIENCE, single.as_str());
        }
        many => {
            payload.insert(AUDIENCE, many.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    if let Some(confirmation) = token.confirmation() {
        let cnf = serde_json::from_str::<serde_json::Value>(confirmation)
            .map_err(BuildError::Confirmation)?;
        payload.insert(CONFIRMATION, ClaimValue::Json(cnf));
    }

    let scopes = scope_values(&token.claims);
    if !scopes.is_empty() {
        if options.emit_scopes_as_space_delimited_string {
            payload.insert(SCOPE, scopes.join(" "));
        } else {
            payload.insert(SCOPE, scopes);
        }
    }

    let amr = amr_values(&token.claims);
    if !amr.is_empty() {
        payload.insert(AUTHENTICATION_METHOD, amr);
    }

    for (claim_type, claims) in group_remaining(&token.claims) {
        if payload.contains_key(claim_type) {
            return Err(BuildError::DuplicateClaim(claim_type.to_owned()));
        }

        let value = match claims.as_slice() {
            [single] => coerce(single, CoercionMode::Strict)?,
            many => ClaimValue::List(
                many.iter()
                    .map(|claim| coerce(claim, CoercionMode::Strict))
                    .collect::<Result<Vec<_>, FormatError>>()?,
            ),
        };
        payload.insert(claim_type, value);
    }

    Ok(payload)
}

/// Distinct `scope` claim values in claim order.
fn scope_values(claims: &[Claim]) -> Vec<&str> {
    distinct_claims(claims.iter().filter(|c| c.is_type(SCOPE)))
        .into_iter()
        .map(|c| c.value.as_str())
        .collect()
}

/// `amr` values deduplicated by value alone, first occurrence first.
fn amr_values(claims: &[Claim]) -> Vec<&str> {
    claims
        .iter()
        .filter(|c| c.is_type(AUTHENTICATION_METHOD))
        .map(|c| c.value.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Groups non-reserved claims by type, keyed in first-seen order.
fn group_remaining(claims: &[Claim]) -> IndexMap<&str, Vec<&Claim>> {
    let mut groups: IndexMap<&str, Vec<&Claim>> = IndexMap::new();
    let remaining = claims
        .iter()
        .filter(|c| !c.is_type(SCOPE) && !c.is_type(AUTHENTICATION_METHOD));

    for claim in distinct_claims(remaining) {
        groups.entry(claim.claim_type.as_str()).or_default().push(claim);
    }
    groups
}
