use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::model::format::Format;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Target {
    Single(String),
    Plural(Vec<String>),
}

impl Target {
    pub fn is_plural(&self) -> bool {
        matches!(self, Target::Plural(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Target::Single(s) => s.trim().is_empty(),
            Target::Plural(forms) => forms.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// All forms, a singular target being a single form.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Target::Single(s) => vec![s.as_str()],
            Target::Plural(forms) => forms.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::Single(String::new())
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target::Single(s.to_string())
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        Target::Single(s)
    }
}

impl From<Vec<String>> for Target {
    fn from(forms: Vec<String>) -> Self {
        Target::Plural(forms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum UnitItem {
    Key(String),
    Plural(Vec<String>),
}

impl Default for UnitItem {
    fn default() -> Self {
        UnitItem::Key(String::new())
    }
}

/// JSON type of the leaf a unit was read from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    String,
    Integer,
    Float,
    Bool,
    Null,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            _ => ValueKind::String,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct JsonUnit {
    pub id: String,

    #[serde(default)]
    pub item: UnitItem,

    #[serde(default)]
    pub target: Target,

    #[serde(default)]
    pub kind: ValueKind,

    #[serde(default)]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholders: Option<Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl JsonUnit {
    /// Creates a unit. Without an item a random identifier stands in for both
    /// the item and the id.
    pub fn new(target: impl Into<Target>, item: Option<String>) -> Self {
        let identifier = random_identifier();
        let item = item.unwrap_or_else(|| identifier.clone());
        JsonUnit {
            id: format!(".{identifier}"),
            item: UnitItem::Key(item),
            target: target.into(),
            ..Default::default()
        }
    }

    /// Unit for a scalar leaf, remembering its JSON type.
    pub fn from_leaf(value: &Value, id: String, item: String) -> Self {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        JsonUnit {
            id,
            item: UnitItem::Key(item),
            target: Target::Single(text),
            kind: ValueKind::of(value),
            ..Default::default()
        }
    }

    pub fn key(&self) -> &str {
        self.id.trim_start_matches('.')
    }

    pub fn nested_key(&self) -> Vec<&str> {
        self.key().split('.').collect()
    }

    pub fn is_header(&self) -> bool {
        self.id == "@"
    }

    /// The target converted back to the JSON type of the original leaf.
    /// Text that no longer parses as that type is kept as a string.
    pub fn converted_target(&self) -> Value {
        let text = match &self.target {
            Target::Single(s) => s,
            Target::Plural(forms) => {
                return Value::Array(forms.iter().cloned().map(Value::String).collect())
            }
        };
        convert_text(text, self.kind).unwrap_or_else(|| Value::String(text.clone()))
    }

    /// Whether the target still converts to the type of the original leaf.
    pub fn kind_matches(&self) -> bool {
        match &self.target {
            Target::Single(s) => convert_text(s, self.kind).is_some(),
            Target::Plural(_) => self.kind == ValueKind::String,
        }
    }

    pub fn set_target(&mut self, format: Format, target: Target) {
        if format == Format::I18Next {
            self.item = crate::formats::i18next::relabel(&self.item, &target);
        }
        self.target = target;
    }

    pub fn notes(&self) -> Option<&str> {
        if self.notes.is_empty() {
            None
        } else {
            Some(self.notes.as_str())
        }
    }
}

fn convert_text(text: &str, kind: ValueKind) -> Option<Value> {
    match kind {
        ValueKind::String => Some(Value::String(text.to_string())),
        ValueKind::Integer => {
            let t = text.trim();
            t.parse::<i64>()
                .map(Value::from)
                .or_else(|_| t.parse::<u64>().map(Value::from))
                .ok()
        }
        ValueKind::Float => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        ValueKind::Bool => match text.trim().to_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ValueKind::Null => {
            if text.is_empty() {
                Some(Value::Null)
            } else {
                None
            }
        }
    }
}

fn random_identifier() -> String {
    let mut bytes: [u8; 16] = thread_rng().gen();
    // RFC 4122 version 4, variant 1
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let h = hex::encode(bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &h[0..8],
        &h[8..12],
        &h[12..16],
        &h[16..20],
        &h[20..32]
    )
}
