//! Claim value coercion.
//!
//! Converts the string value of a [`Claim`] into a [`ClaimValue`] according
//! to its declared [`ClaimValueType`]. The caller picks the failure policy with
//! [`CoercionMode`]:
//!
//! - [`CoercionMode::Strict`] returns a [`FormatError`] for values that do not
//!   parse as their declared type.
//! - [`CoercionMode::Lenient`] keeps the raw string instead.
//!
//! # Examples
//!
//! ```
//! use token_forge::{
//!     claims::{Claim, ClaimValueType},
//!     coerce::{CoercionMode, coerce},
//!     value::ClaimValue,
//! };
//!
//! let claim = Claim::new("age", "not-a-number").with_value_type(ClaimValueType::Integer32);
//!
//! assert!(coerce(&claim, CoercionMode::Strict).is_err());
//! assert_eq!(
//!     coerce(&claim, CoercionMode::Lenient).unwrap(),
//!     ClaimValue::String("not-a-number".to_owned())
//! );
//! ```

use std::{fmt::Display, str::FromStr};

use tracing::debug;

use crate::{
    claims::{Claim, ClaimValueType},
    error::FormatError,
    value::ClaimValue,
};

/// Failure policy for values that do not match their declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionMode {
    /// Parse failures are errors.
    Strict,
    /// Parse failures fall back to the raw string value.
    Lenient,
}

/// Coerces a claim's string value into its declared type.
///
/// # Errors
///
/// In [`CoercionMode::Strict`], returns [`FormatError`] when the value is not
/// a valid boolean, number or JSON document for its declared type. Lenient
/// coercion never fails.
pub fn coerce(claim: &Claim, mode: CoercionMode) -> Result<ClaimValue, FormatError> {
    match (parse_typed(claim), mode) {
        (Ok(value), _) => Ok(value),
        (Err(reason), CoercionMode::Strict) => Err(FormatError {
            claim_type: claim.claim_type.clone(),
            value_type: claim.value_type,
            value: claim.value.clone(),
            reason,
        }),
        (Err(reason), CoercionMode::Lenient) => {
            debug!(
                claim_type = %claim.claim_type,
                value_type = %claim.value_type,
                %reason,
                "claim value kept as string"
            );
            Ok(ClaimValue::String(claim.value.clone()))
        }
    }
}

/// Dispatches on the value type; the error is the parser message.
fn parse_typed(claim: &Claim) -> Result<ClaimValue, String> {
    let raw = claim.value.as_str();
    match claim.value_type {
        ClaimValueType::String => Ok(ClaimValue::String(raw.to_owned())),
        ClaimValueType::Boolean => parse_bool(raw).map(ClaimValue::Boolean),
        ClaimValueType::Integer | ClaimValueType::Integer32 => {
            parse_number::<i32>(raw).map(|n| ClaimValue::Integer(i64::from(n)))
        }
        ClaimValueType::Integer64 => parse_number::<i64>(raw).map(ClaimValue::Integer),
        ClaimValueType::UInteger32 => {
            parse_number::<u32>(raw).map(|n| ClaimValue::Unsigned(u64::from(n)))
        }
        ClaimValueType::UInteger64 => parse_number::<u64>(raw).map(ClaimValue::Unsigned),
        ClaimValueType::Double => parse_double(raw).map(ClaimValue::Double),
        ClaimValueType::Json => serde_json::from_str::<serde_json::Value>(raw)
            .map(ClaimValue::Json)
            .map_err(|e| e.to_string()),
    }
}

// Case-insensitive, surrounding whitespace trimmed.
fn parse_bool(raw: &str) -> Result<bool, String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err("expected 'true' or 'false'".to_owned())
    }
}

fn parse_number<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse::<T>().map_err(|e| e.to_string())
}

// JSON has no NaN or infinity.
fn parse_double(raw: &str) -> Result<f64, String> {
    let value = parse_number::<f64>(raw)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err("value is not a finite number".to_owned())
    }
}
