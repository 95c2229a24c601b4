//! Typed claim values and the ordered JWT payload.
//!
//! [`ClaimValue`] is the sum type every payload entry is expressed in, so
//! consumers (the signer, tests) can match on it exhaustively. [`Payload`] is an
//! insertion-ordered claim-name → value map that serializes to a JSON object in
//! the same order.

use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// A typed claim value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// String value.
    String(String),
    /// Signed integer (32- or 64-bit source).
    Integer(i64),
    /// Unsigned integer (32- or 64-bit source).
    Unsigned(u64),
    /// Floating point value.
    Double(f64),
    /// Boolean value.
    Boolean(bool),
    /// Structured JSON document.
    Json(serde_json::Value),
    /// Ordered list of values.
    List(Vec<ClaimValue>),
}

impl ClaimValue {
    /// Returns the string slice if this is a [`ClaimValue::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`ClaimValue::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for ClaimValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for ClaimValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered mapping from claim name to [`ClaimValue`].
///
/// Keys are unique: inserting an existing key replaces its value in place and
/// keeps the key's original position.
///
/// # Examples
///
/// ```
/// use token_forge::value::Payload;
///
/// let mut payload = Payload::new();
/// payload.insert("iss", "https://issuer.example.com");
/// payload.insert("exp", 1_700_000_060_i64);
///
/// assert_eq!(payload.keys().collect::<Vec<_>>(), ["iss", "exp"]);
/// assert_eq!(
///     payload.to_json_string().unwrap(),
///     r#"{"iss":"https://issuer.example.com","exp":1700000060}"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Payload {
    entries: IndexMap<String, ClaimValue>,
}

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value, returning the previous value if any.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into is idiomatic for builder methods"
    )]
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Option<ClaimValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.entries.get(name)
    }

    /// Returns a mutable reference to the value stored under `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClaimValue> {
        self.entries.get_mut(name)
    }

    /// Returns `true` if `name` is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Claim names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the payload has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes to compact JSON text, keys in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a value cannot be represented as JSON.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Two payloads are equal only when their entries match in the same order.
impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut payload = Payload::new();
        payload.insert("z", "last-alphabetically");
        payload.insert("a", 1_i64);
        payload.insert("m", true);

        assert_eq!(payload.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut payload = Payload::new();
        payload.insert("a", "first");
        payload.insert("b", "second");

        let previous = payload.insert("a", vec!["first", "again"]);

        assert_eq!(previous, Some(ClaimValue::from("first")));
        assert_eq!(payload.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(
            payload.get("a"),
            Some(&ClaimValue::List(vec!["first".into(), "again".into()]))
        );
    }

    #[test]
    fn test_serialization_matches_variants() {
        let mut payload = Payload::new();
        payload.insert("s", "text");
        payload.insert("i", -5_i64);
        payload.insert("u", 18_446_744_073_709_551_615_u64);
        payload.insert("d", ClaimValue::Double(1.5));
        payload.insert("b", false);
        payload.insert("j", ClaimValue::Json(json!({"k": [1, 2]})));
        payload.insert("l", vec![ClaimValue::Integer(1), ClaimValue::from("two")]);

        assert_eq!(
            payload.to_json_string().unwrap(),
            r#"{"s":"text","i":-5,"u":18446744073709551615,"d":1.5,"b":false,"j":{"k":[1,2]},"l":[1,"two"]}"#
        );
    }

    #[test]
    fn test_json_value_keeps_insertion_order() {
        let mut payload = Payload::new();
        payload.insert("scope", vec!["a", "b"]);
        payload.insert("nbf", 10_i64);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"scope": ["a", "b"], "nbf": 10}));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["scope", "nbf"]);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut first = Payload::new();
        first.insert("a", 1_i64);
        first.insert("b", 2_i64);
        let mut second = Payload::new();
        second.insert("b", 2_i64);
        second.insert("a", 1_i64);

        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }

    #[test]
    fn test_lookup_among_many_keys() {
        let mut payload = Payload::new();
        for i in 0..10_000_i64 {
            payload.insert(format!("k{i}"), i);
        }
        payload.insert("k5000", "replaced");

        assert_eq!(payload.len(), 10_000);
        assert_eq!(payload.get("k5000"), Some(&ClaimValue::from("replaced")));
        assert_eq!(payload.keys().nth(5000), Some("k5000"));
        assert!(payload.get_mut("k9999").is_some());
    }

    #[test]
    fn test_accessors() {
        let value = ClaimValue::from(vec!["x"]);
        assert_eq!(value.as_list().map(<[ClaimValue]>::len), Some(1));
        assert_eq!(value.as_str(), None);
        assert_eq!(ClaimValue::from("x").as_str(), Some("x"));
    }

    #[test]
    fn test_empty_payload() {
        let payload = Payload::new();
        assert!(payload.is_empty());
        assert_eq!(payload.to_json_string().unwrap(), "{}");
        assert!(!payload.contains_key("iss"));
    }
}
