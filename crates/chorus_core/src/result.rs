//! Aggregated per-model output of one request.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Response body of `POST /generate-text/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Sanitized continuations keyed by model identifier
    pub generated_texts: GeneratedTexts,
}

impl GenerationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outputs of one model.
    ///
    /// Entries keep insertion order. Recording the same model twice replaces
    /// its outputs in place.
    pub fn insert(&mut self, model: impl Into<String>, texts: Vec<String>) {
        self.generated_texts.insert(model.into(), texts);
    }

    /// Outputs recorded for `model`.
    pub fn get(&self, model: &str) -> Option<&[String]> {
        self.generated_texts.get(model)
    }

    /// Model identifiers in insertion order.
    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.generated_texts.iter().map(|(id, _)| id)
    }

    /// Number of models with an entry.
    pub fn len(&self) -> usize {
        self.generated_texts.len()
    }

    /// Whether no model has an entry.
    pub fn is_empty(&self) -> bool {
        self.generated_texts.is_empty()
    }
}

/// Insertion-ordered map from model identifier to its continuations.
///
/// Serializes as a JSON object whose keys follow registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedTexts(Vec<(String, Vec<String>)>);

impl GeneratedTexts {
    fn insert(&mut self, model: String, texts: Vec<String>) {
        match self.0.iter_mut().find(|(id, _)| *id == model) {
            Some((_, slot)) => *slot = texts,
            None => self.0.push((model, texts)),
        }
    }

    /// Outputs recorded for `model`.
    pub fn get(&self, model: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(id, _)| id == model)
            .map(|(_, texts)| texts.as_slice())
    }

    /// Iterate `(model, texts)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(id, texts)| (id.as_str(), texts.as_slice()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for GeneratedTexts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (model, texts) in &self.0 {
            map.serialize_entry(model, texts)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GeneratedTexts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = GeneratedTexts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of model identifiers to lists of strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut texts = GeneratedTexts::default();
                while let Some((model, outputs)) = access.next_entry::<String, Vec<String>>()? {
                    texts.insert(model, outputs);
                }
                Ok(texts)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
