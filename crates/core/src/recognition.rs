//! Recognition results returned by an NLU service
//!
//! A [`RecognizerResult`] carries the recognized intents and a JSON tree of
//! recognized entities. The tree follows the LUIS convention: every entity
//! group maps to an array with one element per occurrence in the utterance,
//! and an optional reserved `$instance` branch mirrors the tree with raw
//! text spans and metadata per occurrence.
//!
//! Entity access is null-safe. Each traversal step returns an explicit
//! found/not-found outcome and the chain short-circuits on the first
//! absence, so partially recognized or oddly shaped responses read as
//! "value absent" rather than an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Reserved key of the entity-tree branch carrying raw text spans and
/// metadata for each recognized entity occurrence.
pub const INSTANCE_METADATA_KEY: &str = "$instance";

/// Confidence score attached to a recognized intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    /// Confidence (0.0 - 1.0)
    pub score: f64,
}

/// Result of running one utterance through an NLU recognizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    /// Utterance that was sent to the recognizer
    #[serde(default)]
    pub text: String,
    /// Recognized intents keyed by sanitized intent name
    #[serde(default)]
    pub intents: HashMap<String, IntentScore>,
    /// Tree of recognized entities keyed by entity group name
    #[serde(default)]
    pub entities: Value,
}

impl RecognizerResult {
    /// Highest-scoring intent among the intents that scored above zero.
    ///
    /// Zero-score intents never win, so a result whose every intent scored
    /// 0.0 reports no top intent at all.
    pub fn top_scoring_intent(&self) -> Option<(&str, f64)> {
        self.intents
            .iter()
            .filter(|(_, intent)| intent.score > 0.0)
            .max_by(|a, b| {
                a.1.score
                    .partial_cmp(&b.1.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(name, intent)| (name.as_str(), intent.score))
    }

    /// First occurrence of an entity group, if the group is present and
    /// non-empty
    pub fn first_entity(&self, group: &str) -> Option<&Value> {
        self.entities.get(group)?.get(0)
    }

    /// Typed value from the `$instance` metadata branch.
    ///
    /// Walks `$instance -> entity -> [0] -> value_property` and converts the
    /// found scalar to `T`. A missing step, a nested (non-scalar) value, or
    /// a failed conversion all yield `None`.
    pub fn entity_value<T: DeserializeOwned>(
        &self,
        entity: &str,
        value_property: &str,
    ) -> Option<T> {
        let value = self
            .entities
            .get(INSTANCE_METADATA_KEY)?
            .get(entity)?
            .get(0)?
            .get(value_property)?;
        if value.is_object() || value.is_array() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result_with_entities(entities: Value) -> RecognizerResult {
        RecognizerResult {
            text: "book a flight".to_string(),
            intents: HashMap::new(),
            entities,
        }
    }

    #[test]
    fn test_top_scoring_intent() {
        let mut intents = HashMap::new();
        intents.insert("Book_flight".to_string(), IntentScore { score: 0.92 });
        intents.insert("Cancel".to_string(), IntentScore { score: 0.05 });
        let result = RecognizerResult {
            intents,
            ..Default::default()
        };

        let (name, score) = result.top_scoring_intent().unwrap();
        assert_eq!(name, "Book_flight");
        assert!((score - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_scoring_intent_empty() {
        let result = RecognizerResult::default();
        assert_eq!(result.top_scoring_intent(), None);
    }

    #[test]
    fn test_top_scoring_intent_ignores_zero_scores() {
        let mut intents = HashMap::new();
        intents.insert("Book_flight".to_string(), IntentScore { score: 0.0 });
        intents.insert("None".to_string(), IntentScore { score: 0.0 });
        let result = RecognizerResult {
            intents,
            ..Default::default()
        };

        assert_eq!(result.top_scoring_intent(), None);
    }

    #[test]
    fn test_first_entity() {
        let result = result_with_entities(json!({
            "To": [{ "Airport": [["Paris"]] }],
        }));

        let to = result.first_entity("To").unwrap();
        assert_eq!(to["Airport"][0][0], "Paris");
        assert!(result.first_entity("From").is_none());
    }

    #[test]
    fn test_entity_value_string() {
        let result = result_with_entities(json!({
            "$instance": {
                "To": [{ "startIndex": 21, "endIndex": 27, "text": "Berlin" }],
            },
        }));

        let text: Option<String> = result.entity_value("To", "text");
        assert_eq!(text, Some("Berlin".to_string()));
    }

    #[test]
    fn test_entity_value_number() {
        let result = result_with_entities(json!({
            "$instance": {
                "To": [{ "text": "Berlin", "score": 0.83 }],
            },
        }));

        let score: Option<f64> = result.entity_value("To", "score");
        assert_eq!(score, Some(0.83));
        let start: Option<i64> = result.entity_value("To", "startIndex");
        assert_eq!(start, None);
    }

    #[test]
    fn test_entity_value_rejects_nested_values() {
        let result = result_with_entities(json!({
            "$instance": {
                "To": [{ "text": { "raw": "Berlin" } }],
            },
        }));

        let text: Option<String> = result.entity_value("To", "text");
        assert_eq!(text, None);
    }

    #[test]
    fn test_entity_value_rejects_wrong_scalar_type() {
        let result = result_with_entities(json!({
            "$instance": {
                "datetime": [{ "text": "tomorrow", "score": 0.9 }],
            },
        }));

        let score: Option<String> = result.entity_value("datetime", "score");
        assert_eq!(score, None);
    }

    #[test]
    fn test_entity_value_missing_branches() {
        let result = result_with_entities(json!({}));
        let text: Option<String> = result.entity_value("To", "text");
        assert_eq!(text, None);

        let result = result_with_entities(json!({ "$instance": {} }));
        let text: Option<String> = result.entity_value("To", "text");
        assert_eq!(text, None);

        let result = result_with_entities(json!({ "$instance": { "To": [] } }));
        let text: Option<String> = result.entity_value("To", "text");
        assert_eq!(text, None);
    }
}
