use serde_json::{Map, Value};

use super::merge;
use crate::model::unit::JsonUnit;

/// One top-level object keyed by the dotted unit key.
pub fn render(units: &[JsonUnit]) -> Value {
    let mut root = Map::new();
    for unit in units {
        let mut value = Map::new();
        value.insert(unit.key().to_string(), unit.converted_target());
        merge(&mut root, value);
    }
    Value::Object(root)
}
