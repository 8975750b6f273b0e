//! Response header map.

use std::collections::HashMap;

/// Header fields keyed by lowercase name.
///
/// Inserting a name that is already present replaces its value, so the last
/// occurrence in a response wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a field, trimming both parts and lowercasing the name.
    ///
    /// Returns the value it replaced, if any.
    pub fn insert(&mut self, name: &str, value: &str) -> Option<String> {
        self.fields
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string())
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(lowercase name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
