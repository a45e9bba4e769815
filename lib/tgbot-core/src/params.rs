//! Method parameters.

use serde::ser::{Serialize, SerializeMap, Serializer};
use url::form_urlencoded;

/// Ordered `name -> value` parameters of a Bot API call.
///
/// Insertion order is kept, so multipart fields and query pairs go out in
/// the order they were added. Inserting a name twice replaces the value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Add a parameter, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a parameter only when a value is present.
    #[must_use]
    pub fn with_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.pairs.push((name, value)),
        }
    }

    /// Value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` when there is no parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Encode as an `application/x-www-form-urlencoded` query string.
    ///
    /// # Example
    ///
    /// ```
    /// use tgbot_core::Params;
    ///
    /// let params = Params::new().with("chat_id", "42").with("text", "a & b");
    /// assert_eq!(params.to_query_string(), "chat_id=42&text=a+%26+b");
    /// ```
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Decode an `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes()).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (name, value) in &self.pairs {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order_and_replaces() {
        let mut params = Params::new().with("b", "1").with("a", "2");
        params.insert("b", "3");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("b", "3"), ("a", "2")]);
        assert_eq!(params.get("a"), Some("2"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn with_opt_skips_none() {
        let params = Params::new()
            .with_opt("offset", Some("10"))
            .with_opt("limit", None::<String>);
        assert_eq!(params.get("offset"), Some("10"));
        assert!(params.get("limit").is_none());
    }

    #[test]
    fn serializes_as_flat_json_object() {
        let params = Params::new().with("chat_id", "42").with("text", "hi \"there\"");
        let json = serde_json::to_string(&params).expect("serialize");
        assert_eq!(json, r#"{"chat_id":"42","text":"hi \"there\""}"#);
    }

    #[test]
    fn query_string_round_trip() {
        let cases = [
            Params::new(),
            Params::new().with("text", "hello world"),
            Params::new()
                .with("q", "a&b=c")
                .with("emoji", "🦀 crab")
                .with("empty", ""),
            Params::new().with("k=1", "v&2").with("plus", "1+1"),
        ];

        for params in cases {
            let encoded = params.to_query_string();
            assert_eq!(Params::from_query_string(&encoded), params, "{encoded}");
        }
    }
}
