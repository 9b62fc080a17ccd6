//! go-i18n v2 JSON: an array of `{"id", "description", "translation"}`.
//!
//! See <https://github.com/nicksnyder/go-i18n>.

use serde_json::{Map, Value};

use super::value_text;
use crate::error::{L10nError, Result};
use crate::model::format::Format;
use crate::model::unit::{JsonUnit, Target, UnitItem};
use crate::services::plurals::{plural_tags, CLDR_CATEGORIES};

pub fn extract(data: &Value) -> Result<Vec<JsonUnit>> {
    let items = data
        .as_array()
        .ok_or_else(|| L10nError::format(Format::GoI18N, "top level must be an array"))?;

    let mut units = Vec::with_capacity(items.len());
    for (i, value) in items.iter().enumerate() {
        let entry = value.as_object().ok_or_else(|| {
            L10nError::format(Format::GoI18N, format!("message at index {i} is not an object"))
        })?;
        let id = entry.get("id").map(value_text).unwrap_or_default();
        let target = match entry.get("translation") {
            Some(Value::Object(forms)) => Target::Plural(
                CLDR_CATEGORIES
                    .iter()
                    .filter_map(|category| forms.get(*category))
                    .map(value_text)
                    .collect(),
            ),
            Some(other) => Target::Single(value_text(other)),
            None => Target::default(),
        };
        units.push(JsonUnit {
            id: id.clone(),
            item: UnitItem::Key(id),
            target,
            notes: entry.get("description").map(value_text).unwrap_or_default(),
            ..Default::default()
        });
    }
    Ok(units)
}

/// Plural targets are keyed by the tags of `target_language`; missing forms
/// are written empty and surplus forms are dropped.
pub fn render(units: &[JsonUnit], target_language: &str) -> Value {
    let tags = plural_tags(target_language);
    let messages = units
        .iter()
        .map(|unit| {
            let translation = match &unit.target {
                Target::Plural(forms) => Value::Object(
                    tags.iter()
                        .enumerate()
                        .map(|(i, tag)| {
                            let form = forms.get(i).cloned().unwrap_or_default();
                            (tag.to_string(), Value::String(form))
                        })
                        .collect(),
                ),
                Target::Single(_) => unit.converted_target(),
            };
            let mut value = Map::new();
            value.insert("id".into(), Value::String(unit.id.clone()));
            if let Some(notes) = unit.notes() {
                value.insert("description".into(), Value::String(notes.to_string()));
            }
            value.insert("translation".into(), translation);
            Value::Object(value)
        })
        .collect();
    Value::Array(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_reproduce_for_english() {
        let data = json!([
            {"id": "hello", "description": "Greeting", "translation": "Hello"},
            {"id": "cats", "translation": {"one": "{{.Count}} cat", "other": "{{.Count}} cats"}}
        ]);
        let units = extract(&data).unwrap();
        assert_eq!(units[0].notes, "Greeting");
        assert!(units[1].target.is_plural());
        assert_eq!(render(&units, "en"), data);
    }

    #[test]
    fn plural_forms_are_read_in_cldr_order() {
        let data = json!([{"id": "x", "translation": {"other": "O", "few": "F", "one": "1"}}]);
        let units = extract(&data).unwrap();
        assert_eq!(units[0].target, Target::Plural(vec!["1".into(), "F".into(), "O".into()]));
    }

    #[test]
    fn missing_forms_are_padded_for_target_language() {
        let units = extract(&json!([
            {"id": "files", "translation": {"one": "plik", "other": "pliki"}}
        ]))
        .unwrap();
        assert_eq!(
            render(&units, "pl_PL"),
            json!([{
                "id": "files",
                "translation": {"one": "plik", "few": "pliki", "many": "", "other": ""}
            }])
        );
    }

    #[test]
    fn object_document_is_rejected() {
        let err = extract(&json!({"id": "x"})).unwrap_err();
        assert!(matches!(err, L10nError::Format { format: Format::GoI18N, .. }));
    }
}
