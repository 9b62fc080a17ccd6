use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::format::Format;
use crate::model::unit::{JsonUnit, ValueKind};
use crate::services::plurals::plural_tags;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaIssue {
    pub entry_id: String,
    pub code: String,
    pub message: String,
}

impl QaIssue {
    fn new(unit: &JsonUnit, code: &str, message: impl Into<String>) -> Self {
        QaIssue {
            entry_id: unit.id.clone(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

pub fn run(format: Format, units: &[JsonUnit], target_language: &str) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();

    for unit in units {
        if unit.is_header() {
            continue;
        }

        if unit.kind != ValueKind::Null && unit.target.is_empty() {
            issues.push(QaIssue::new(unit, "EMPTY_TARGET", "Translation is empty"));
        }

        if !matches!(unit.kind, ValueKind::String | ValueKind::Null) && !unit.kind_matches() {
            issues.push(QaIssue::new(
                unit,
                "TYPE_MISMATCH",
                format!("Translation is no longer a valid {:?} value; it will be written as text", unit.kind),
            ));
        }

        if format == Format::GoI18N {
            let tags = plural_tags(target_language);
            let forms = unit.target.strings().len();
            if unit.target.is_plural() && forms > tags.len() {
                issues.push(QaIssue::new(
                    unit,
                    "PLURAL_COUNT",
                    format!(
                        "{forms} plural forms but '{}' has only {} ({}); extra forms are dropped",
                        target_language,
                        tags.len(),
                        tags.join(", ")
                    ),
                ));
            }
        }

        if let Some(Value::Object(placeholders)) = &unit.placeholders {
            for name in placeholders.keys() {
                if !references_placeholder(format, name, &unit.target.strings()) {
                    issues.push(QaIssue::new(
                        unit,
                        "PLACEHOLDER_MISSING",
                        format!("Placeholder '{name}' is not used in the translation"),
                    ));
                }
            }
        }
    }

    issues
}

fn references_placeholder(format: Format, name: &str, forms: &[&str]) -> bool {
    let pattern = match format {
        Format::WebExtension => format!(r"(?i)\${}\$", regex::escape(name)),
        Format::Arb => format!(r"\{{\s*{}\s*[,}}]", regex::escape(name)),
        _ => return true,
    };
    match Regex::new(&pattern) {
        Ok(re) => forms.iter().any(|form| re.is_match(form)),
        Err(_) => true,
    }
}
