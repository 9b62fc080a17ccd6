use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::L10nError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    #[serde(rename = "json")]
    Flat,
    #[serde(rename = "json-nested")]
    Nested,
    #[serde(rename = "webextension")]
    WebExtension,
    #[serde(rename = "i18next")]
    I18Next,
    #[serde(rename = "go-i18n")]
    GoI18N,
    #[serde(rename = "arb")]
    Arb,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Flat,
        Format::Nested,
        Format::WebExtension,
        Format::I18Next,
        Format::GoI18N,
        Format::Arb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Flat => "json",
            Format::Nested => "json-nested",
            Format::WebExtension => "webextension",
            Format::I18Next => "i18next",
            Format::GoI18N => "go-i18n",
            Format::Arb => "arb",
        }
    }

    pub fn default_indent(self) -> usize {
        match self {
            Format::Arb => 2,
            _ => 4,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = L10nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" | "flat" => Ok(Format::Flat),
            "json-nested" | "nested" => Ok(Format::Nested),
            "webextension" | "web-extension" => Ok(Format::WebExtension),
            "i18next" => Ok(Format::I18Next),
            "go-i18n" | "goi18n" => Ok(Format::GoI18N),
            "arb" => Ok(Format::Arb),
            other => Err(L10nError::UnknownFormat(other.to_string())),
        }
    }
}

pub const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    pub indent: usize,
}

impl DumpOptions {
    pub fn for_format(format: Format) -> Self {
        DumpOptions {
            indent: format.default_indent(),
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Result<Self, L10nError> {
        if indent > MAX_INDENT {
            return Err(L10nError::payload(format!(
                "indent must be between 0 and {MAX_INDENT}, got {indent}"
            )));
        }
        self.indent = indent;
        Ok(self)
    }
}
