use serde_json::{Map, Value};

use super::place;
use crate::error::Result;
use crate::model::unit::JsonUnit;

/// Rebuilds the tree from each unit's path. Units sharing an array index
/// land in the same element.
pub fn render(units: &[JsonUnit]) -> Result<Value> {
    let mut root = Value::Object(Map::new());
    for unit in units {
        place(&mut root, &unit.id, &unit.nested_key(), unit.converted_target())?;
    }
    Ok(root)
}
