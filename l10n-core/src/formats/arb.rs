//! Application Resource Bundle (Flutter / Dart intl).
//!
//! `@@` keys form the file header; `@key` objects carry the metadata of
//! message `key`.

use serde_json::{Map, Value};

use super::{merge, value_text};
use crate::error::{L10nError, Result};
use crate::model::format::Format;
use crate::model::unit::{JsonUnit, Target, UnitItem, ValueKind};

pub const HEADER_ID: &str = "@";

pub fn extract(data: &Value) -> Result<Vec<JsonUnit>> {
    let map = data
        .as_object()
        .ok_or_else(|| L10nError::format(Format::Arb, "top level must be an object"))?;

    let mut units = Vec::new();

    let header: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| key.starts_with("@@"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if !header.is_empty() {
        units.push(JsonUnit {
            id: HEADER_ID.to_string(),
            item: UnitItem::Key(HEADER_ID.to_string()),
            metadata: header,
            ..Default::default()
        });
    }

    for (key, value) in map {
        if key.starts_with('@') {
            continue;
        }
        let metadata = map
            .get(&format!("@{key}"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        units.push(JsonUnit {
            id: key.clone(),
            item: UnitItem::Key(key.clone()),
            target: Target::Single(value_text(value)),
            kind: ValueKind::of(value),
            notes: metadata.get("description").map(value_text).unwrap_or_default(),
            placeholders: metadata.get("placeholders").filter(|p| !p.is_null()).cloned(),
            metadata,
        });
    }

    Ok(units)
}

pub fn render(units: &[JsonUnit]) -> Value {
    let mut root = Map::new();
    for unit in units {
        if unit.is_header() {
            merge(&mut root, unit.metadata.clone());
            continue;
        }
        let mut metadata = unit.metadata.clone();
        if let Some(notes) = unit.notes() {
            metadata.insert("description".into(), Value::String(notes.to_string()));
        }
        let mut entry = Map::new();
        entry.insert(unit.id.clone(), unit.converted_target());
        entry.insert(format!("@{}", unit.id), Value::Object(metadata));
        merge(&mut root, entry);
    }
    Value::Object(root)
}
