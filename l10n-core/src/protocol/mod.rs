use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::config::CoreConfig;
use crate::error::{L10nError, Result};
use crate::model::format::{DumpOptions, Format, MAX_INDENT};
use crate::model::unit::{JsonUnit, Target};
use crate::services::store::JsonStore;
use crate::services::{encoding, qa};

mod command;
pub use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn required_str<'a>(payload: &'a Value, key: &str) -> Result<&'a str> {
    str_field(payload, key).ok_or_else(|| L10nError::payload(format!("payload.{key} is required")))
}

fn format_from_payload(payload: &Value) -> Result<Format> {
    required_str(payload, "format")?.parse()
}

fn parse_units_from_payload(payload: &Value) -> Result<Vec<JsonUnit>> {
    let arr = payload
        .get("units")
        .and_then(|v| v.as_array())
        .ok_or_else(|| L10nError::payload("payload.units must be an array"))?;

    let mut units: Vec<JsonUnit> = Vec::with_capacity(arr.len());

    for (i, v) in arr.iter().cloned().enumerate() {
        match serde_json::from_value::<JsonUnit>(v) {
            Ok(u) => units.push(u),
            Err(e) => return Err(L10nError::payload(format!("invalid unit at index {i}: {e}"))),
        }
    }

    Ok(units)
}

fn filter_from_payload(payload: &Value) -> Result<Option<Vec<String>>> {
    match payload.get("filter") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value::<Vec<String>>(value.clone())
            .map(Some)
            .map_err(|_| L10nError::payload("payload.filter must be an array of strings")),
    }
}

/// A store configured from the common payload fields.
fn store_from_payload(payload: &Value, config: &CoreConfig) -> Result<JsonStore> {
    let format = format_from_payload(payload)?;
    let target_language = str_field(payload, "target_language").unwrap_or(config.target_language.as_str());

    let mut options = DumpOptions::for_format(format);
    if let Some(indent) = payload.get("indent").filter(|v| !v.is_null()) {
        let indent = indent
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .filter(|i| *i <= MAX_INDENT)
            .ok_or_else(|| {
                L10nError::payload(format!("payload.indent must be an integer between 0 and {MAX_INDENT}"))
            })?;
        options = options.with_indent(indent)?;
    }

    let mut store = JsonStore::new(format)
        .with_target_language(target_language)
        .with_options(options)
        .with_filter(filter_from_payload(payload)?);
    if let Some(encoding) = str_field(payload, "encoding") {
        store = store.with_encoding(encoding.to_lowercase());
    }
    Ok(store)
}

pub fn handle(input: &str, config: &CoreConfig) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    let cmd = Command::from(cmd_str);
    if cmd == Command::Unknown {
        tracing::warn!(cmd = cmd_str, "unknown command");
        return err(id, "unknown command");
    }

    match dispatch(cmd, payload, config) {
        Ok(result) => ok(id, result),
        Err(e) => {
            tracing::warn!(cmd = cmd_str, error = %e, "request failed");
            err(id, e.to_string())
        }
    }
}

fn dispatch(cmd: Command, payload: &Value, config: &CoreConfig) -> Result<Value> {
    match cmd {
        Command::Ping => Ok(json!({ "message": "l10n-core alive" })),

        Command::FormatsList => {
            let formats: Vec<&str> = Format::ALL.iter().map(|f| f.name()).collect();
            Ok(json!({ "formats": formats }))
        }

        Command::StoreParse => {
            let mut store = store_from_payload(payload, config)?;
            if let Some(path) = str_field(payload, "path") {
                store.load(Path::new(path))?;
            } else {
                let text = payload
                    .get("text")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| L10nError::payload("payload.text or payload.path is required"))?;
                store.parse_str(text)?;
            }
            Ok(json!({
                "format": store.format(),
                "encoding": store.encoding(),
                "units": store.units(),
            }))
        }

        Command::StoreSerialize => {
            let store = store_from_payload(payload, config)?.with_units(parse_units_from_payload(payload)?);
            Ok(json!({ "text": store.serialize_text()? }))
        }

        Command::StoreSave => {
            let path = PathBuf::from(required_str(payload, "path")?);
            let store = store_from_payload(payload, config)?.with_units(parse_units_from_payload(payload)?);
            let bytes = store.save(&path)?;
            Ok(json!({ "path": path.to_string_lossy(), "bytes": bytes }))
        }

        Command::UnitSetTarget => {
            let format = format_from_payload(payload)?;
            let unit_val = payload.get("unit").cloned().unwrap_or(Value::Null);
            if unit_val.is_null() {
                return Err(L10nError::payload("payload.unit is required"));
            }
            let mut unit: JsonUnit = serde_json::from_value(unit_val)
                .map_err(|e| L10nError::payload(format!("invalid payload.unit: {e}")))?;
            let target: Target = serde_json::from_value(payload.get("target").cloned().unwrap_or(Value::Null))
                .map_err(|_| L10nError::payload("payload.target must be a string or an array of strings"))?;
            unit.set_target(format, target);
            Ok(json!({ "unit": unit }))
        }

        Command::RunQa => {
            let store = store_from_payload(payload, config)?.with_units(parse_units_from_payload(payload)?);
            let issues = qa::run(store.format(), store.units(), store.target_language());
            Ok(json!({ "issues": issues }))
        }

        Command::DetectEncoding => {
            let path = required_str(payload, "path")?;
            let result = encoding::detect_from_file(Path::new(path))?;
            Ok(serde_json::to_value(result)?)
        }

        Command::Unknown => Err(L10nError::payload("unknown command")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(req: Value) -> Value {
        serde_json::from_str(&handle(&req.to_string(), &CoreConfig::default())).unwrap()
    }

    #[test]
    fn garbage_is_invalid_json() {
        let resp: Value = serde_json::from_str(&handle("{nope", &CoreConfig::default())).unwrap();
        assert_eq!(resp, json!({"status": "error", "message": "invalid json"}));
    }

    #[test]
    fn unknown_command_keeps_id() {
        let resp = call(json!({"id": 7, "cmd": "frobnicate"}));
        assert_eq!(resp["id"], 7);
        assert_eq!(resp["message"], "unknown command");
    }

    #[test]
    fn missing_format_is_reported() {
        let resp = call(json!({"id": 1, "cmd": "store.parse", "payload": {"text": "{}"}}));
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "Invalid payload: payload.format is required");
    }

    #[test]
    fn parse_then_serialize_through_protocol() {
        let parsed = call(json!({
            "id": "a",
            "cmd": "store.parse",
            "payload": {"format": "json-nested", "text": "{\"menu\": {\"open\": \"Open\"}}"}
        }));
        assert_eq!(parsed["status"], "ok");
        let mut units = parsed["payload"]["units"].clone();
        assert_eq!(units[0]["id"], ".menu.open");
        units[0]["target"] = json!("Abrir");

        let rendered = call(json!({
            "id": "b",
            "cmd": "store.serialize",
            "payload": {"format": "json-nested", "units": units}
        }));
        assert_eq!(
            rendered["payload"]["text"],
            "{\n    \"menu\": {\n        \"open\": \"Abrir\"\n    }\n}\n"
        );
    }

    #[test]
    fn set_target_relabels_i18next_plurals() {
        let resp = call(json!({
            "id": 2,
            "cmd": "unit.set_target",
            "payload": {
                "format": "i18next",
                "unit": {"id": ".k", "item": ["k", "k_plural"], "target": ["a", "b"]},
                "target": ["x", "y", "z"]
            }
        }));
        assert_eq!(resp["payload"]["unit"]["item"], json!(["k_0", "k_1", "k_2"]));
    }

    #[test]
    fn oversized_indent_is_rejected_and_core_keeps_serving() {
        let resp = call(json!({
            "id": 10,
            "cmd": "store.serialize",
            "payload": {"format": "json", "indent": 100000000000000u64, "units": [{"id": ".a", "target": "x"}]}
        }));
        assert_eq!(resp["status"], "error");
        assert_eq!(
            resp["message"],
            format!("Invalid payload: payload.indent must be an integer between 0 and {MAX_INDENT}")
        );
        assert_eq!(call(json!({"id": 11, "cmd": "ping"}))["status"], "ok");
    }

    #[test]
    fn negative_indent_is_rejected() {
        let resp = call(json!({
            "id": 12,
            "cmd": "store.serialize",
            "payload": {"format": "json", "indent": -1, "units": []}
        }));
        assert_eq!(resp["status"], "error");
    }

    #[test]
    fn oversized_array_index_is_rejected_and_core_keeps_serving() {
        let resp = call(json!({
            "id": 13,
            "cmd": "store.serialize",
            "payload": {"format": "json-nested", "units": [{"id": ".a[100000000000000]", "target": "x"}]}
        }));
        assert_eq!(resp["status"], "error");
        assert!(resp["message"].as_str().unwrap().starts_with("Invalid unit id '.a[100000000000000]'"));
        assert_eq!(call(json!({"id": 14, "cmd": "ping"}))["status"], "ok");
    }

    #[test]
    fn formats_are_listed() {
        let resp = call(json!({"id": 3, "cmd": "formats.list"}));
        assert_eq!(resp["payload"]["formats"].as_array().unwrap().len(), 6);
    }
}
