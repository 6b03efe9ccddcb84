//! Ordered request fields.
//!
//! The API signature is computed over field values in insertion order, so the
//! payload is kept as an explicit list of pairs and serialised in that same
//! order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Ordered `(field, value)` pairs of a request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignedFields {
    fields: Vec<(String, Value)>,
}

impl SignedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    ///
    /// A new key is appended; an existing key keeps its position and gets the
    /// new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Sets a field only when a value was supplied.
    pub fn insert_opt<V: Into<Value>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Appends every field of `other`, in order.
    pub fn extend(&mut self, other: SignedFields) {
        for (key, value) in other.fields {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the `|`-joined field values, in order.
    ///
    /// Strings are taken raw, everything else in its JSON text form, so the
    /// signed text matches what goes over the wire.
    pub fn signing_string(&self) -> String {
        self.fields
            .iter()
            .map(|(_, v)| value_text(v))
            .collect::<Vec<_>>()
            .join("|")
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Serialize for SignedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
