//! Ordered feature mapping produced by the extractor.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered mapping from feature name to numeric value.
///
/// Entries keep their insertion order, and serde preserves it: the vector
/// serializes as a JSON object whose keys appear in vector order. Positional
/// order only matters at training time, when it is frozen into a
/// [`FeatureLayout`](super::FeatureLayout); predictions always look values up
/// by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    /// Create an empty vector.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create an empty vector with room for `capacity` features.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Set a feature. Existing names keep their position.
    pub fn insert<S: Into<String>>(&mut self, name: S, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove a feature, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Get a feature value by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Whether the vector has a feature with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Feature names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Feature values in order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut vector = FeatureVector::new();
        for (name, value) in iter {
            vector.insert(name, value);
        }
        vector
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct FeatureVectorVisitor;

impl<'de> Visitor<'de> for FeatureVectorVisitor {
    type Value = FeatureVector;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of feature names to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut vector = FeatureVector::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, f64>()? {
            vector.insert(name, value);
        }
        Ok(vector)
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FeatureVectorVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut vector = FeatureVector::new();
        vector.insert("b", 2.0);
        vector.insert("a", 1.0);
        vector.insert("c", 3.0);
        vector.insert("a", 10.0);

        assert_eq!(vector.names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(vector.get("a"), Some(10.0));
        assert_eq!(vector.len(), 3);
    }

    #[test]
    fn test_remove() {
        let mut vector: FeatureVector = [("x", 1.0), ("y", 2.0)].into_iter().collect();
        assert_eq!(vector.remove("x"), Some(1.0));
        assert_eq!(vector.remove("x"), None);
        assert!(!vector.contains("x"));
        assert!(vector.contains("y"));
    }

    #[test]
    fn test_json_keeps_key_order() {
        let vector: FeatureVector = [("zeta", 1.0), ("alpha", 0.5), ("mid", 3.0)]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, r#"{"zeta":1.0,"alpha":0.5,"mid":3.0}"#);

        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vector);
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_rejects_non_numeric() {
        let result: Result<FeatureVector, _> = serde_json::from_str(r#"{"a":"x"}"#);
        assert!(result.is_err());
    }
}
