//! LUIS v2 wire model and response normalization
//!
//! The v2 prediction API returns a flat entity list plus a separate
//! composite-entity list. Consumers work with a nested tree instead: every
//! entity group maps to an array with one element per occurrence, and
//! composite entities fold their children into a single object. A reserved
//! `$instance` branch mirrors the tree with raw text spans and metadata.
//! This module owns both the serde wire model and the fold.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::{json, Map, Value};

use flightbot_core::{IntentScore, RecognizerResult, INSTANCE_METADATA_KEY};

/// Top-level v2 prediction response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuisResult {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub top_scoring_intent: Option<IntentModel>,
    /// Full intent list, only present for verbose predictions
    #[serde(default)]
    pub intents: Option<Vec<IntentModel>>,
    #[serde(default)]
    pub entities: Vec<EntityModel>,
    #[serde(default)]
    pub composite_entities: Vec<CompositeEntityModel>,
}

/// One scored intent
#[derive(Debug, Clone, Deserialize)]
pub struct IntentModel {
    pub intent: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// One recognized entity occurrence
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityModel {
    /// Matched text as returned by the service (lowercased)
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    /// First character of the span, inclusive
    pub start_index: usize,
    /// Last character of the span, inclusive
    pub end_index: usize,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub resolution: Option<Value>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Composite entity grouping child entities recognized within its span
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeEntityModel {
    pub parent_type: String,
    pub value: String,
    #[serde(default)]
    pub children: Vec<CompositeChildModel>,
}

/// Child reference inside a composite entity
#[derive(Debug, Clone, Deserialize)]
pub struct CompositeChildModel {
    #[serde(rename = "type")]
    pub child_type: String,
    pub value: String,
}

/// Fold a wire response into the consumer-facing recognition result
pub fn recognizer_result(result: &LuisResult, include_instance: bool) -> RecognizerResult {
    RecognizerResult {
        text: result.query.clone().unwrap_or_default(),
        intents: extract_intents(result),
        entities: extract_entities(&result.entities, &result.composite_entities, include_instance),
    }
}

fn normalized_intent(name: &str) -> String {
    name.replace(['.', ' '], "_")
}

fn extract_intents(result: &LuisResult) -> HashMap<String, IntentScore> {
    let mut intents = HashMap::new();
    if let Some(list) = &result.intents {
        for intent in list {
            intents.insert(
                normalized_intent(&intent.intent),
                IntentScore {
                    score: intent.score.unwrap_or(0.0),
                },
            );
        }
    } else if let Some(top) = &result.top_scoring_intent {
        intents.insert(
            normalized_intent(&top.intent),
            IntentScore {
                score: top.score.unwrap_or(0.0),
            },
        );
    }
    intents
}

fn extract_entities(
    entities: &[EntityModel],
    composites: &[CompositeEntityModel],
    include_instance: bool,
) -> Value {
    let mut tree = Map::new();
    let mut instance = Map::new();

    let composite_types: HashSet<&str> =
        composites.iter().map(|c| c.parent_type.as_str()).collect();
    let mut covered = vec![false; entities.len()];

    for composite in composites {
        fold_composite(
            composite,
            entities,
            &mut covered,
            &mut tree,
            &mut instance,
            include_instance,
        );
    }

    for (index, entity) in entities.iter().enumerate() {
        // Entities consumed by a composite, and the composite parent
        // occurrences themselves, never appear at the top level.
        if covered[index] || composite_types.contains(entity.entity_type.as_str()) {
            continue;
        }
        add_occurrence(&mut tree, normalized_entity_name(entity), entity_value(entity));
        if include_instance {
            add_occurrence(
                &mut instance,
                normalized_entity_name(entity),
                entity_metadata(entity),
            );
        }
    }

    if include_instance {
        tree.insert(INSTANCE_METADATA_KEY.to_string(), Value::Object(instance));
    }
    Value::Object(tree)
}

/// Fold one composite occurrence: the parent becomes an object keyed by
/// child entity groups, and every consumed child leaves the top level.
fn fold_composite(
    composite: &CompositeEntityModel,
    entities: &[EntityModel],
    covered: &mut [bool],
    tree: &mut Map<String, Value>,
    instance: &mut Map<String, Value>,
    include_instance: bool,
) {
    let parent = entities
        .iter()
        .enumerate()
        .find(|(index, entity)| {
            !covered[*index]
                && entity.entity_type == composite.parent_type
                && entity.entity == composite.value
        })
        .map(|(_, entity)| entity);
    let Some(parent) = parent else {
        return;
    };

    let mut children = Map::new();
    let mut children_instance = Map::new();

    for child in &composite.children {
        for (index, entity) in entities.iter().enumerate() {
            if covered[index]
                || entity.entity_type != child.child_type
                || !span_contains(parent, entity)
            {
                continue;
            }
            covered[index] = true;
            add_occurrence(
                &mut children,
                normalized_entity_name(entity),
                entity_value(entity),
            );
            if include_instance {
                add_occurrence(
                    &mut children_instance,
                    normalized_entity_name(entity),
                    entity_metadata(entity),
                );
            }
        }
    }

    if include_instance {
        children.insert(
            INSTANCE_METADATA_KEY.to_string(),
            Value::Object(children_instance),
        );
    }
    add_occurrence(tree, normalized_entity_name(parent), Value::Object(children));
    if include_instance {
        add_occurrence(instance, normalized_entity_name(parent), entity_metadata(parent));
    }
}

fn span_contains(parent: &EntityModel, child: &EntityModel) -> bool {
    child.start_index >= parent.start_index && child.end_index <= parent.end_index
}

/// Every entity group maps to an array, one element per occurrence.
fn add_occurrence(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(Value::Array(occurrences)) => occurrences.push(value),
        _ => {
            map.insert(key, Value::Array(vec![value]));
        }
    }
}

/// Group key for an entity: its role when one is set, otherwise the
/// normalized type. `builtin.datetimeV2.*` collapses to `datetime` and any
/// other `builtin.` prefix is stripped.
fn normalized_entity_name(entity: &EntityModel) -> String {
    let entity_type = entity
        .entity_type
        .rsplit(':')
        .next()
        .unwrap_or(entity.entity_type.as_str());

    let name = if entity_type.starts_with("builtin.datetimeV2.") {
        "datetime"
    } else if entity_type.starts_with("builtin.currency") {
        "money"
    } else {
        entity_type.strip_prefix("builtin.").unwrap_or(entity_type)
    };

    let name = match entity.role.as_deref() {
        Some(role) if !role.trim().is_empty() => role,
        _ => name,
    };

    name.replace(['.', ' '], "_")
}

fn entity_value(entity: &EntityModel) -> Value {
    let Some(resolution) = &entity.resolution else {
        return Value::String(entity.entity.clone());
    };

    if entity.entity_type.starts_with("builtin.datetimeV2.") {
        return datetime_value(resolution);
    }

    match entity.entity_type.as_str() {
        "builtin.number" | "builtin.ordinal" => resolution
            .get("value")
            .map(number_value)
            .unwrap_or_else(|| resolution.clone()),
        // Closed-list entities resolve to an array of canonical values.
        _ => resolution
            .get("value")
            .cloned()
            .or_else(|| resolution.get("values").cloned())
            .unwrap_or_else(|| resolution.clone()),
    }
}

/// A datetimeV2 resolution collapses to its distinct TIMEX expressions.
fn datetime_value(resolution: &Value) -> Value {
    let values = resolution
        .get("values")
        .and_then(Value::as_array)
        .filter(|values| !values.is_empty());
    let Some(values) = values else {
        return resolution.clone();
    };

    let subtype = values[0].get("type").cloned().unwrap_or(Value::Null);
    let mut timexes: Vec<Value> = Vec::new();
    for value in values {
        if let Some(timex) = value.get("timex") {
            if !timexes.contains(timex) {
                timexes.push(timex.clone());
            }
        }
    }

    json!({ "type": subtype, "timex": timexes })
}

/// Numeric resolutions arrive as strings on the wire.
fn number_value(raw: &Value) -> Value {
    let Some(text) = raw.as_str() else {
        return raw.clone();
    };
    if let Ok(integer) = text.parse::<i64>() {
        return Value::from(integer);
    }
    if let Ok(float) = text.parse::<f64>() {
        return Value::from(float);
    }
    Value::String(text.to_string())
}

/// Span metadata for the `$instance` branch. The wire end index is
/// inclusive; the tree uses an exclusive end index.
fn entity_metadata(entity: &EntityModel) -> Value {
    let mut metadata = json!({
        "startIndex": entity.start_index,
        "endIndex": entity.end_index.saturating_add(1),
        "text": entity.entity,
        "type": entity.entity_type,
    });
    if let Some(score) = entity.score {
        metadata["score"] = json!(score);
    }
    metadata
}
