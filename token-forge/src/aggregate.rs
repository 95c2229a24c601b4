//! Folding a claim set into a claim-name → value map.
//!
//! Claims that share a type name are merged: the first becomes a scalar, a
//! second turns the entry into a two-element list, and further claims are
//! appended. Values are coerced leniently, so malformed typed values survive
//! as strings instead of failing the whole set.

use crate::{
    claims::{Claim, distinct_claims},
    coerce::{CoercionMode, coerce},
    value::{ClaimValue, Payload},
};

/// Deduplicates `claims` and folds them by type name.
///
/// Key order follows the first occurrence of each type; values within a key
/// follow claim order. An empty slice yields an empty map.
///
/// # Examples
///
/// ```
/// use token_forge::{aggregate::aggregate, claims::Claim, value::ClaimValue};
///
/// let claims = vec![
///     Claim::new("role", "admin"),
///     Claim::new("email", "a@example.com"),
///     Claim::new("role", "editor"),
///     Claim::new("role", "admin"),
/// ];
///
/// let map = aggregate(&claims);
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["role", "email"]);
/// assert_eq!(map.get("role"), Some(&ClaimValue::from(vec!["admin", "editor"])));
/// ```
#[must_use]
pub fn aggregate(claims: &[Claim]) -> Payload {
    let mut map = Payload::new();

    for claim in distinct_claims(claims) {
        let value = lenient(claim);
        match map.get_mut(&claim.claim_type) {
            None => {
                map.insert(claim.claim_type.clone(), value);
            }
            Some(ClaimValue::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, ClaimValue::List(Vec::new()));
                *existing = ClaimValue::List(vec![first, value]);
            }
        }
    }

    map
}

fn lenient(claim: &Claim) -> ClaimValue {
    // Lenient coercion cannot fail
    coerce(claim, CoercionMode::Lenient).unwrap_or_else(|_| ClaimValue::String(claim.value.clone()))
}
