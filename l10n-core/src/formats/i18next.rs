//! i18next v3 JSON: nested keys plus plural groups.
//!
//! A group is either `key` + `key_plural`, or `key_0`, `key_1`, ... with
//! consecutive indexes. Each group becomes one unit whose target carries
//! every form.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::place;
use crate::error::Result;
use crate::model::unit::{JsonUnit, Target, UnitItem, ValueKind};

const PLURAL_SUFFIX: &str = "_plural";

pub(crate) enum Member<'a> {
    Plural {
        base: &'a str,
        keys: Vec<String>,
        forms: Vec<String>,
    },
    Plain(&'a str, &'a Value),
}

/// Members of one object in document order, plural groups collapsed at the
/// position of their first key.
pub(crate) fn group_members(map: &Map<String, Value>) -> Vec<Member<'_>> {
    let mut processed: HashSet<String> = HashSet::new();
    let mut members = Vec::new();

    for (key, value) in map {
        if processed.contains(key) {
            continue;
        }
        match plural_group(map, key) {
            Some((base, keys)) => {
                let forms = keys
                    .iter()
                    .filter_map(|k| map.get(k).and_then(Value::as_str))
                    .map(str::to_string)
                    .collect();
                processed.extend(keys.iter().cloned());
                members.push(Member::Plural { base, keys, forms });
            }
            None => members.push(Member::Plain(key.as_str(), value)),
        }
    }

    members
}

fn plural_group<'a>(map: &Map<String, Value>, key: &'a str) -> Option<(&'a str, Vec<String>)> {
    let is_text = |k: &str| map.get(k).is_some_and(Value::is_string);

    let simple_base = match key.strip_suffix(PLURAL_SUFFIX) {
        Some(base) if is_text(base) => Some(base),
        _ if map.contains_key(&format!("{key}{PLURAL_SUFFIX}")) => Some(key),
        _ => None,
    };
    if let Some(base) = simple_base {
        let keys = vec![base.to_string(), format!("{base}{PLURAL_SUFFIX}")];
        if keys.iter().all(|k| is_text(k)) {
            return Some((base, keys));
        }
    }

    let (base, digits) = key.rsplit_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let keys: Vec<String> = (0..)
        .map(|i| format!("{base}_{i}"))
        .take_while(|k| is_text(k))
        .collect();
    if keys.is_empty() {
        return None;
    }
    Some((base, keys))
}

pub(crate) fn plural_unit(prev: &str, base: &str, keys: Vec<String>, forms: Vec<String>) -> JsonUnit {
    JsonUnit {
        id: format!("{prev}.{base}"),
        item: UnitItem::Plural(keys),
        target: Target::Plural(forms),
        kind: ValueKind::String,
        ..Default::default()
    }
}

fn base_of(keys: &[String]) -> String {
    let first = keys.first().map(String::as_str).unwrap_or_default();
    first.strip_suffix("_0").unwrap_or(first).to_string()
}

fn plural_keys(count: usize, base: &str) -> Vec<String> {
    if count <= 2 {
        let mut keys = vec![base.to_string(), format!("{base}{PLURAL_SUFFIX}")];
        keys.truncate(count);
        return keys;
    }
    (0..count).map(|i| format!("{base}_{i}")).collect()
}

/// Item keys matching `target`: a plural target with a different number of
/// forms gets fresh keys, a singular target drops back to the base key.
pub(crate) fn relabel(item: &UnitItem, target: &Target) -> UnitItem {
    match (item, target) {
        (UnitItem::Plural(keys), Target::Plural(forms)) if keys.len() == forms.len() => item.clone(),
        (UnitItem::Plural(keys), Target::Plural(forms)) => {
            UnitItem::Plural(plural_keys(forms.len(), &base_of(keys)))
        }
        (UnitItem::Key(key), Target::Plural(forms)) if forms.len() == 1 => {
            UnitItem::Plural(vec![key.clone()])
        }
        (UnitItem::Key(key), Target::Plural(forms)) => {
            UnitItem::Plural(plural_keys(forms.len(), &base_of(std::slice::from_ref(key))))
        }
        (UnitItem::Plural(keys), Target::Single(_)) => UnitItem::Key(base_of(keys)),
        (UnitItem::Key(_), Target::Single(_)) => item.clone(),
    }
}

pub fn render(units: &[JsonUnit]) -> Result<Value> {
    let mut root = Value::Object(Map::new());
    for unit in units {
        let segments = unit.nested_key();
        match &unit.target {
            Target::Plural(forms) => {
                let keys = match relabel(&unit.item, &unit.target) {
                    UnitItem::Plural(keys) => keys,
                    UnitItem::Key(key) => vec![key],
                };
                let group: Map<String, Value> = keys
                    .into_iter()
                    .zip(forms.iter().cloned().map(Value::String))
                    .collect();
                let parent = &segments[..segments.len().saturating_sub(1)];
                place(&mut root, &unit.id, parent, Value::Object(group))?;
            }
            Target::Single(_) => {
                place(&mut root, &unit.id, &segments, unit.converted_target())?;
            }
        }
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::Walker;
    use serde_json::json;

    fn extract(data: &Value) -> Vec<JsonUnit> {
        Walker::new(None).with_plurals().extract(data)
    }

    #[test]
    fn simple_plural_pair_becomes_one_unit() {
        let data = json!({"key": "item", "key_plural": "items", "other": "x"});
        let units = extract(&data);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].id, ".key");
        assert_eq!(units[0].target, Target::Plural(vec!["item".into(), "items".into()]));
        assert_eq!(units[1].id, ".other");
        assert_eq!(render(&units).unwrap(), data);
    }

    #[test]
    fn plural_key_listed_first_still_groups() {
        let data = json!({"key_plural": "items", "key": "item"});
        let units = extract(&data);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].item, UnitItem::Plural(vec!["key".into(), "key_plural".into()]));
    }

    #[test]
    fn indexed_plurals_collect_past_ten_forms() {
        let mut map = Map::new();
        for i in 0..12 {
            map.insert(format!("n_{i}"), Value::String(format!("form {i}")));
        }
        let data = json!({"nested": Value::Object(map)});
        let units = extract(&data);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, ".nested.n");
        assert_eq!(units[0].target.strings().len(), 12);
        assert_eq!(render(&units).unwrap(), data);
    }

    #[test]
    fn lonely_plural_suffix_is_a_plain_key() {
        let data = json!({"orphan_plural": "x", "version_2": "y"});
        let units = extract(&data);
        let ids: Vec<&str> = units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec![".orphan_plural", ".version_2"]);
    }

    #[test]
    fn growing_a_simple_plural_switches_to_indexed_keys() {
        let item = UnitItem::Plural(vec!["k".into(), "k_plural".into()]);
        let target = Target::Plural(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(
            relabel(&item, &target),
            UnitItem::Plural(vec!["k_0".into(), "k_1".into(), "k_2".into()])
        );
    }

    #[test]
    fn shrinking_indexed_plurals_uses_simple_keys() {
        let item = UnitItem::Plural(vec!["k_0".into(), "k_1".into(), "k_2".into()]);
        let target = Target::Plural(vec!["a".into(), "b".into()]);
        assert_eq!(
            relabel(&item, &target),
            UnitItem::Plural(vec!["k".into(), "k_plural".into()])
        );
    }

    #[test]
    fn singular_target_drops_back_to_base() {
        let item = UnitItem::Plural(vec!["k_0".into(), "k_1".into(), "k_2".into()]);
        assert_eq!(relabel(&item, &Target::from("one")), UnitItem::Key("k".into()));
    }

    #[test]
    fn set_target_regenerates_keys_for_render() {
        let data = json!({"a": {"cat": "cat", "cat_plural": "cats"}});
        let mut units = extract(&data);
        units[0].set_target(
            crate::model::format::Format::I18Next,
            Target::Plural(vec!["kot".into(), "koty".into(), "kotów".into()]),
        );
        assert_eq!(
            render(&units).unwrap(),
            json!({"a": {"cat_0": "kot", "cat_1": "koty", "cat_2": "kotów"}})
        );
    }
}
