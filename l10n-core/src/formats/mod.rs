//! Per-dialect extraction of units from a JSON document and serialization
//! of units back into one.

use serde_json::{Map, Value};

use crate::error::{L10nError, Result};
use crate::model::format::Format;
use crate::model::unit::JsonUnit;

pub mod arb;
pub mod flat;
pub mod goi18n;
pub mod i18next;
pub mod nested;
pub mod webextension;

/// Settings shared by every dialect's extractor and renderer.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    /// Key names to extract. `None` extracts every leaf.
    pub filter: Option<Vec<String>>,
    pub target_language: String,
}

pub fn extract(format: Format, data: &Value, ctx: &FormatContext) -> Result<Vec<JsonUnit>> {
    match format {
        Format::Flat | Format::Nested => Ok(Walker::new(ctx.filter.as_deref()).extract(data)),
        Format::I18Next => Ok(Walker::new(ctx.filter.as_deref()).with_plurals().extract(data)),
        Format::WebExtension => webextension::extract(data),
        Format::GoI18N => goi18n::extract(data),
        Format::Arb => arb::extract(data),
    }
}

pub fn render(format: Format, units: &[JsonUnit], ctx: &FormatContext) -> Result<Value> {
    match format {
        Format::Flat => Ok(flat::render(units)),
        Format::Nested => nested::render(units),
        Format::I18Next => i18next::render(units),
        Format::WebExtension => Ok(webextension::render(units)),
        Format::GoI18N => Ok(goi18n::render(units, &ctx.target_language)),
        Format::Arb => Ok(arb::render(units)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Object,
    Array,
}

/// Recursive walk over a document tree that turns every scalar leaf into a
/// unit. Ids record the path: `.key` for object members, `[i]` for array
/// items.
pub(crate) struct Walker<'a> {
    filter: Option<&'a [String]>,
    plurals: bool,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(filter: Option<&'a [String]>) -> Self {
        Walker {
            filter,
            plurals: false,
        }
    }

    /// Collapse i18next plural groups (`key`/`key_plural`, `key_0`..`key_n`).
    pub(crate) fn with_plurals(mut self) -> Self {
        self.plurals = true;
        self
    }

    pub(crate) fn extract(&self, data: &Value) -> Vec<JsonUnit> {
        let mut out = Vec::new();
        self.walk(data, "", None, None, None, &mut out);
        out
    }

    fn walk(
        &self,
        data: &Value,
        prev: &str,
        name: Option<&str>,
        last_name: Option<&str>,
        parent: Option<Parent>,
        out: &mut Vec<JsonUnit>,
    ) {
        match data {
            Value::Object(map) if self.plurals => {
                for member in i18next::group_members(map) {
                    match member {
                        i18next::Member::Plural { base, keys, forms } => {
                            out.push(i18next::plural_unit(prev, base, keys, forms));
                        }
                        i18next::Member::Plain(key, value) => self.walk(
                            value,
                            &format!("{prev}.{key}"),
                            Some(key),
                            None,
                            Some(Parent::Object),
                            out,
                        ),
                    }
                }
            }
            Value::Object(map) => {
                for (key, value) in map {
                    self.walk(
                        value,
                        &format!("{prev}.{key}"),
                        Some(key.as_str()),
                        None,
                        Some(Parent::Object),
                        out,
                    );
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let index = i.to_string();
                    self.walk(
                        item,
                        &format!("{prev}[{i}]"),
                        Some(index.as_str()),
                        name,
                        Some(Parent::Array),
                        out,
                    );
                }
            }
            leaf => {
                if self.keeps(name, last_name, parent) {
                    out.push(JsonUnit::from_leaf(
                        leaf,
                        prev.to_string(),
                        name.unwrap_or_default().to_string(),
                    ));
                }
            }
        }
    }

    fn keeps(&self, name: Option<&str>, last_name: Option<&str>, parent: Option<Parent>) -> bool {
        let Some(filter) = self.filter else {
            return true;
        };
        let wanted = |n: Option<&str>| n.is_some_and(|n| filter.iter().any(|f| f == n));
        match parent {
            Some(Parent::Object) => wanted(name),
            Some(Parent::Array) => wanted(last_name),
            None => false,
        }
    }
}

/// Recursive merge: objects merge, arrays extend, anything else is
/// replaced by the later value.
pub(crate) fn merge(into: &mut Map<String, Value>, from: Map<String, Value>) {
    for (key, value) in from {
        let value = match (into.get_mut(&key), value) {
            (Some(Value::Object(a)), Value::Object(b)) => {
                merge(a, b);
                continue;
            }
            (Some(Value::Array(a)), Value::Array(b)) => {
                a.extend(b);
                continue;
            }
            (_, value) => value,
        };
        into.insert(key, value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

/// Splits a dotted unit key into object keys and array indexes, so
/// `a.list[2].b` gives `a`, `list`, `2`, `b`.
pub(crate) fn path_steps<'a>(segments: &[&'a str]) -> Vec<Step<'a>> {
    let mut steps = Vec::new();
    for &segment in segments {
        let (name, mut rest) = match segment.find('[') {
            Some(pos) if segment.ends_with(']') => (&segment[..pos], &segment[pos..]),
            _ => (segment, ""),
        };
        let mut indexes = Vec::new();
        while let Some(stripped) = rest.strip_prefix('[') {
            let Some(end) = stripped.find(']') else {
                break;
            };
            match stripped[..end].parse::<usize>() {
                Ok(i) => indexes.push(i),
                Err(_) => break,
            }
            rest = &stripped[end + 1..];
        }
        if !rest.is_empty() {
            // Brackets that are not indexes belong to the key itself.
            steps.push(Step::Key(segment));
            continue;
        }
        if !name.is_empty() || indexes.is_empty() {
            steps.push(Step::Key(name));
        }
        steps.extend(indexes.into_iter().map(Step::Index));
    }
    steps
}

/// Largest array index a unit id may name. Ids come from clients, and the
/// rebuilt array is allocated up to the index.
pub const MAX_ARRAY_INDEX: usize = 100_000;

/// Places `leaf` at the path of unit `id` below `root`.
pub(crate) fn place(root: &mut Value, id: &str, segments: &[&str], leaf: Value) -> Result<()> {
    let steps = path_steps(segments);
    if let Some(i) = steps.iter().find_map(|step| match step {
        Step::Index(i) if *i > MAX_ARRAY_INDEX => Some(*i),
        _ => None,
    }) {
        return Err(L10nError::UnitId {
            id: id.to_string(),
            message: format!("array index {i} exceeds the limit of {MAX_ARRAY_INDEX}"),
        });
    }
    insert_at(root, id, &steps, leaf)
}

/// Places `leaf` at `steps` below `node`, creating objects and arrays on
/// the way. Array items keep their index.
fn insert_at(node: &mut Value, id: &str, steps: &[Step<'_>], leaf: Value) -> Result<()> {
    let Some((step, rest)) = steps.split_first() else {
        match (node, leaf) {
            (Value::Object(a), Value::Object(b)) => merge(a, b),
            (node, leaf) => *node = leaf,
        }
        return Ok(());
    };
    match step {
        Step::Key(key) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                let child = map.entry(key.to_string()).or_insert(Value::Null);
                insert_at(child, id, rest, leaf)?;
            }
        }
        Step::Index(i) => {
            let empty_object = node.as_object().is_some_and(Map::is_empty);
            if !node.is_array() || empty_object {
                *node = Value::Array(Vec::new());
            }
            if let Value::Array(items) = node {
                if items.len() <= *i {
                    items
                        .try_reserve(*i + 1 - items.len())
                        .map_err(|e| L10nError::UnitId {
                            id: id.to_string(),
                            message: e.to_string(),
                        })?;
                    items.resize(*i + 1, Value::Null);
                }
                insert_at(&mut items[*i], id, rest, leaf)?;
            }
        }
    }
    Ok(())
}

/// Text of a scalar that should be read as a message.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(units: &[JsonUnit]) -> Vec<&str> {
        units.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn walk_extracts_every_leaf_including_falsy_ones() {
        let data = json!({
            "empty": "",
            "zero": 0,
            "no": false,
            "nothing": null,
            "deep": {"a": {"b": {"c": {"d": "bottom"}}}},
            "list": [[1, 2], {"x": "y"}]
        });
        let units = Walker::new(None).extract(&data);
        assert_eq!(
            ids(&units),
            vec![
                ".empty",
                ".zero",
                ".no",
                ".nothing",
                ".deep.a.b.c.d",
                ".list[0][0]",
                ".list[0][1]",
                ".list[1].x",
            ]
        );
    }

    #[test]
    fn filter_keeps_named_keys_and_named_arrays() {
        let data = json!({
            "title": "Hi",
            "id": 7,
            "tags": ["a", "b"],
            "other": ["c"]
        });
        let filter = vec!["title".to_string(), "tags".to_string()];
        let units = Walker::new(Some(&filter)).extract(&data);
        assert_eq!(ids(&units), vec![".title", ".tags[0]", ".tags[1]"]);
    }

    #[test]
    fn path_steps_split_keys_and_indexes() {
        assert_eq!(
            path_steps(&["a", "list[2][0]", "b"]),
            vec![
                Step::Key("a"),
                Step::Key("list"),
                Step::Index(2),
                Step::Index(0),
                Step::Key("b")
            ]
        );
        assert_eq!(path_steps(&["[1]"]), vec![Step::Index(1)]);
        assert_eq!(path_steps(&["odd[x]"]), vec![Step::Key("odd[x]")]);
    }

    #[test]
    fn oversized_array_index_is_rejected_without_allocating() {
        let mut root = Value::Object(Map::new());
        let err = place(&mut root, ".a[100000000000000]", &["a[100000000000000]"], json!("x")).unwrap_err();
        assert!(matches!(err, L10nError::UnitId { ref id, .. } if id == ".a[100000000000000]"));
        assert_eq!(root, json!({}));
    }

    #[test]
    fn index_at_limit_is_placed() {
        let mut root = Value::Object(Map::new());
        let segment = format!("a[{MAX_ARRAY_INDEX}]");
        place(&mut root, "", &[segment.as_str()], json!("x")).unwrap();
        assert_eq!(root["a"].as_array().map(Vec::len), Some(MAX_ARRAY_INDEX + 1));
        assert_eq!(root["a"][MAX_ARRAY_INDEX], "x");
    }

    #[test]
    fn merge_extends_arrays_and_merges_objects() {
        let mut a = json!({"o": {"x": 1}, "l": [1], "s": "old"});
        let b = json!({"o": {"y": 2}, "l": [2], "s": "new"});
        if let (Value::Object(a), Value::Object(b)) = (&mut a, b) {
            merge(a, b);
        }
        assert_eq!(a, json!({"o": {"x": 1, "y": 2}, "l": [1, 2], "s": "new"}));
    }
}
