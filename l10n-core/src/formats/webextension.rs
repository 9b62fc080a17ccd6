//! WebExtension `messages.json`.
//!
//! See <https://developer.mozilla.org/en-US/Add-ons/WebExtensions/Internationalization>.

use serde_json::{Map, Value};

use super::{merge, value_text};
use crate::error::{L10nError, Result};
use crate::model::format::Format;
use crate::model::unit::{JsonUnit, Target, UnitItem};

pub fn extract(data: &Value) -> Result<Vec<JsonUnit>> {
    let map = data
        .as_object()
        .ok_or_else(|| L10nError::format(Format::WebExtension, "top level must be an object"))?;

    let mut units = Vec::with_capacity(map.len());
    for (name, value) in map {
        let entry = value.as_object().ok_or_else(|| {
            L10nError::format(Format::WebExtension, format!("message '{name}' is not an object"))
        })?;
        units.push(JsonUnit {
            id: name.clone(),
            item: UnitItem::Key(name.clone()),
            target: Target::Single(entry.get("message").map(value_text).unwrap_or_default()),
            notes: entry.get("description").map(value_text).unwrap_or_default(),
            placeholders: entry.get("placeholders").filter(|p| !p.is_null()).cloned(),
            ..Default::default()
        });
    }
    Ok(units)
}

pub fn render(units: &[JsonUnit]) -> Value {
    let mut root = Map::new();
    for unit in units {
        let mut value = Map::new();
        value.insert("message".into(), unit.converted_target());
        if let Some(notes) = unit.notes() {
            value.insert("description".into(), Value::String(notes.to_string()));
        }
        if let Some(placeholders) = unit.placeholders.as_ref().filter(|p| has_content(p)) {
            value.insert("placeholders".into(), placeholders.clone());
        }
        let mut entry = Map::new();
        entry.insert(unit.id.clone(), Value::Object(value));
        merge(&mut root, entry);
    }
    Value::Object(root)
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
