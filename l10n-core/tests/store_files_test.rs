use std::fs;

use l10n_core::{Format, JsonStore, Target};
use serde_json::{json, Value};
use tempfile::TempDir;

fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        Value::Array(items) => items.iter().map(count_leaves).sum(),
        _ => 1,
    }
}

/// Every scalar leaf becomes a unit, however deep or falsy it is.
#[test]
fn test_extraction_never_stops_early() {
    let data = json!({
        "a": "",
        "b": 0,
        "c": false,
        "d": null,
        "e": {"f": [{"g": ""}, [null, 0.0, {"h": {"i": {"j": {"k": "last"}}}}]]},
        "after": "still here"
    });
    for format in [Format::Flat, Format::Nested, Format::I18Next] {
        let mut store = JsonStore::new(format);
        store.parse_str(&data.to_string()).unwrap();
        assert_eq!(store.units().len(), count_leaves(&data), "{format}");
        assert_eq!(store.units().last().unwrap().id, ".after");
    }
}

#[test]
fn test_nested_file_round_trip_with_translation() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let source = temp_dir.path().join("en.json");
    let output = temp_dir.path().join("out").join("pt.json");
    fs::write(
        &source,
        "{\n    \"app\": {\n        \"title\": \"Inbox\",\n        \"unread\": 3\n    }\n}\n",
    )?;

    let mut store = JsonStore::new(Format::Nested).with_target_language("pt");
    store.load(&source)?;
    assert_eq!(store.filename(), source.to_string_lossy());
    store.units_mut()[0].target = Target::from("Caixa de entrada");
    let written = store.save(&output)?;

    let text = fs::read_to_string(&output)?;
    assert_eq!(written, text.len());
    assert_eq!(
        text,
        "{\n    \"app\": {\n        \"title\": \"Caixa de entrada\",\n        \"unread\": 3\n    }\n}\n"
    );
    assert!(!output.with_file_name("pt.json.tmp").exists());
    Ok(())
}

#[test]
fn test_webextension_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("messages.json");
    let content = r#"{
    "greeting": {
        "message": "Hello, $USER$",
        "description": "Greets the user",
        "placeholders": {
            "user": {
                "content": "$1"
            }
        }
    }
}
"#;
    fs::write(&path, content)?;

    let mut store = JsonStore::new(Format::WebExtension);
    store.load(&path)?;
    assert_eq!(store.serialize_text()?, content);
    Ok(())
}

#[test]
fn test_go_i18n_plural_output_follows_target_language() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = JsonStore::new(Format::GoI18N).with_target_language("ru_RU");
    store.parse_str(r#"[{"id": "apples", "translation": {"one": "a", "other": "b"}}]"#)?;
    store.units_mut()[0].target = Target::Plural(vec![
        "яблоко".into(),
        "яблока".into(),
        "яблок".into(),
        "яблока".into(),
    ]);
    let value: Value = serde_json::from_str(&store.serialize_text()?)?;
    assert_eq!(
        value,
        json!([{
            "id": "apples",
            "translation": {"one": "яблоко", "few": "яблока", "many": "яблок", "other": "яблока"}
        }])
    );
    Ok(())
}

#[test]
fn test_filter_limits_extraction() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = JsonStore::new(Format::Nested).with_filter(Some(vec!["label".into()]));
    store.parse_str(r#"{"items": [{"id": 1, "label": "One"}, {"id": 2, "label": "Two"}]}"#)?;
    let ids: Vec<&str> = store.units().iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec![".items[0].label", ".items[1].label"]);
    Ok(())
}

#[test]
fn test_wrong_document_shape_is_rejected() {
    let mut store = JsonStore::new(Format::GoI18N);
    let err = store.parse_str(r#"{"not": "a list"}"#).unwrap_err();
    assert!(err.to_string().contains("go-i18n"));
}
