//! Identity claims and their declared value types.
//!
//! A [`Claim`] is a loosely-typed `(type, value, value_type)` triple as it
//! arrives from an identity store. The value is always a string; the
//! [`ClaimValueType`] tag declares how it should be interpreted when the claim
//! is written into a JWT payload.
//!
//! # Examples
//!
//! ```
//! use token_forge::claims::{Claim, ClaimValueType};
//!
//! let age = Claim::new("age", "42").with_value_type(ClaimValueType::Integer32);
//! assert_eq!(age.value_type, ClaimValueType::Integer32);
//!
//! // Unknown tags fall back to plain strings
//! assert_eq!(ClaimValueType::from_tag("urn:custom:type"), ClaimValueType::String);
//! ```

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespace prefix used by identity frameworks for XML schema value types.
const XML_SCHEMA_PREFIX: &str = "http://www.w3.org/2001/XMLSchema#";

/// Declared type of a claim value.
///
/// Closed set of types understood by the coercer. Any tag not listed here is
/// treated as [`ClaimValueType::String`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClaimValueType {
    /// Plain string, copied verbatim.
    #[default]
    String,
    /// `true` / `false`.
    Boolean,
    /// Signed 32-bit integer (legacy `integer` tag).
    Integer,
    /// Signed 32-bit integer.
    Integer32,
    /// Signed 64-bit integer.
    Integer64,
    /// 64-bit floating point.
    Double,
    /// Unsigned 32-bit integer.
    UInteger32,
    /// Unsigned 64-bit integer.
    UInteger64,
    /// Embedded JSON document.
    Json,
}

impl ClaimValueType {
    /// Parses a value-type tag.
    ///
    /// Accepts the short tags (`"boolean"`, `"integer64"`, `"json"`, ...) and
    /// the XML schema URIs emitted by identity frameworks
    /// (`http://www.w3.org/2001/XMLSchema#integer64`). Matching is
    /// case-sensitive; anything unrecognized maps to [`Self::String`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let short = tag.strip_prefix(XML_SCHEMA_PREFIX).unwrap_or(tag);
        match short {
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "integer32" => Self::Integer32,
            "integer64" => Self::Integer64,
            "double" => Self::Double,
            "uinteger32" => Self::UInteger32,
            "uinteger64" => Self::UInteger64,
            "json" => Self::Json,
            _ => Self::String,
        }
    }

    /// Returns the canonical short tag for this value type.
    #[must_use]
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Integer32 => "integer32",
            Self::Integer64 => "integer64",
            Self::Double => "double",
            Self::UInteger32 => "uinteger32",
            Self::UInteger64 => "uinteger64",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ClaimValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Serialize for ClaimValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for ClaimValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// A single identity claim.
///
/// Two claims are equal when type, value and value type all match; this is
/// the equality used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type name (e.g. `sub`, `scope`, `email`).
    #[serde(rename = "type")]
    pub claim_type: String,

    /// String-encoded value.
    pub value: String,

    /// Declared value type, defaulting to string when absent.
    #[serde(default)]
    pub value_type: ClaimValueType,
}

impl Claim {
    /// Creates a string-typed claim.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: ClaimValueType::String,
        }
    }

    /// Sets the declared value type.
    #[must_use]
    pub const fn with_value_type(mut self, value_type: ClaimValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Returns `true` if this claim has the given type name.
    #[must_use]
    pub fn is_type(&self, claim_type: &str) -> bool {
        self.claim_type == claim_type
    }
}

/// Removes claims that are identical in type, value and value type.
///
/// The first occurrence of each claim is kept and relative order is
/// preserved.
///
/// # Examples
///
/// ```
/// use token_forge::claims::{Claim, distinct_claims};
///
/// let claims = vec![Claim::new("scope", "read"), Claim::new("scope", "read")];
/// assert_eq!(distinct_claims(&claims).len(), 1);
/// ```
#[must_use]
pub fn distinct_claims<'a, I>(claims: I) -> Vec<&'a Claim>
where
    I: IntoIterator<Item = &'a Claim>,
{
    let mut seen = HashSet::new();
    claims.into_iter().filter(|claim| seen.insert(*claim)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_short_names() {
        assert_eq!(ClaimValueType::from_tag("boolean"), ClaimValueType::Boolean);
        assert_eq!(ClaimValueType::from_tag("integer"), ClaimValueType::Integer);
        assert_eq!(ClaimValueType::from_tag("integer32"), ClaimValueType::Integer32);
        assert_eq!(ClaimValueType::from_tag("integer64"), ClaimValueType::Integer64);
        assert_eq!(ClaimValueType::from_tag("double"), ClaimValueType::Double);
        assert_eq!(ClaimValueType::from_tag("uinteger32"), ClaimValueType::UInteger32);
        assert_eq!(ClaimValueType::from_tag("uinteger64"), ClaimValueType::UInteger64);
        assert_eq!(ClaimValueType::from_tag("json"), ClaimValueType::Json);
    }

    #[test]
    fn test_from_tag_xml_schema_uri() {
        assert_eq!(
            ClaimValueType::from_tag("http://www.w3.org/2001/XMLSchema#integer64"),
            ClaimValueType::Integer64
        );
        assert_eq!(
            ClaimValueType::from_tag("http://www.w3.org/2001/XMLSchema#string"),
            ClaimValueType::String
        );
    }

    #[test]
    fn test_from_tag_unknown_defaults_to_string() {
        assert_eq!(ClaimValueType::from_tag(""), ClaimValueType::String);
        assert_eq!(ClaimValueType::from_tag("Boolean"), ClaimValueType::String);
        assert_eq!(ClaimValueType::from_tag("decimal"), ClaimValueType::String);
    }

    #[test]
    fn test_tag_roundtrip_for_every_variant() {
        let all = [
            ClaimValueType::String,
            ClaimValueType::Boolean,
            ClaimValueType::Integer,
            ClaimValueType::Integer32,
            ClaimValueType::Integer64,
            ClaimValueType::Double,
            ClaimValueType::UInteger32,
            ClaimValueType::UInteger64,
            ClaimValueType::Json,
        ];
        for value_type in all {
            assert_eq!(ClaimValueType::from_tag(value_type.as_tag()), value_type);
        }
    }

    #[test]
    fn test_claim_deserialization_defaults_value_type() {
        let claim: Claim = serde_json::from_str(r#"{"type":"email","value":"a@b.c"}"#).unwrap();
        assert_eq!(claim, Claim::new("email", "a@b.c"));

        let claim: Claim =
            serde_json::from_str(r#"{"type":"age","value":"7","value_type":"integer32"}"#).unwrap();
        assert_eq!(claim.value_type, ClaimValueType::Integer32);
    }

    #[test]
    fn test_claim_equality_includes_value_type() {
        let plain = Claim::new("n", "1");
        let typed = Claim::new("n", "1").with_value_type(ClaimValueType::Integer32);
        assert_ne!(plain, typed);
    }

    #[test]
    fn test_distinct_claims_keeps_first_occurrence_order() {
        let claims = vec![
            Claim::new("b", "2"),
            Claim::new("a", "1"),
            Claim::new("b", "2"),
            Claim::new("a", "1").with_value_type(ClaimValueType::Integer32),
            Claim::new("a", "1"),
        ];

        let distinct = distinct_claims(&claims);
        assert_eq!(distinct, vec![&claims[0], &claims[1], &claims[3]]);
    }

    #[test]
    fn test_distinct_claims_empty() {
        assert!(distinct_claims(&Vec::<Claim>::new()).is_empty());
    }
}
