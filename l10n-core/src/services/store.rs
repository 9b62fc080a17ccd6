use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{L10nError, Result};
use crate::formats::{self, FormatContext};
use crate::model::format::{DumpOptions, Format, MAX_INDENT};
use crate::model::unit::JsonUnit;
use crate::services::encoding;

/// A monolingual JSON localization file in one of the supported dialects.
#[derive(Debug, Clone)]
pub struct JsonStore {
    format: Format,
    units: Vec<JsonUnit>,
    ctx: FormatContext,
    options: DumpOptions,
    encoding: String,
    filename: String,
}

impl JsonStore {
    pub fn new(format: Format) -> Self {
        JsonStore {
            format,
            units: Vec::new(),
            ctx: FormatContext::default(),
            options: DumpOptions::for_format(format),
            encoding: "utf-8".into(),
            filename: String::new(),
        }
    }

    pub fn with_filter(mut self, filter: Option<Vec<String>>) -> Self {
        self.ctx.filter = filter;
        self
    }

    pub fn with_target_language(mut self, lang: impl Into<String>) -> Self {
        self.ctx.target_language = lang.into();
        self
    }

    pub fn with_options(mut self, options: DumpOptions) -> Self {
        self.options = options;
        self
    }

    /// Encoding used by `serialize`; parsing bytes replaces it with the
    /// detected one.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_units(mut self, units: Vec<JsonUnit>) -> Self {
        self.units = units;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn target_language(&self) -> &str {
        &self.ctx.target_language
    }

    pub fn units(&self) -> &[JsonUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut Vec<JsonUnit> {
        &mut self.units
    }

    pub fn into_units(self) -> Vec<JsonUnit> {
        self.units
    }

    pub fn add_unit(&mut self, unit: JsonUnit) {
        self.units.push(unit);
    }

    pub fn find_unit(&self, id: &str) -> Option<&JsonUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        let bytes = fs::read(path)?;
        self.filename = path.to_string_lossy().to_string();
        self.parse_bytes(&bytes)
    }

    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = encoding::decode(bytes)?;
        self.encoding = decoded.encoding;
        self.parse_document(&decoded.text)
    }

    pub fn parse_str(&mut self, text: &str) -> Result<()> {
        self.parse_document(text.strip_prefix('\u{feff}').unwrap_or(text))
    }

    fn parse_document(&mut self, text: &str) -> Result<()> {
        let data: Value = serde_json::from_str(text).map_err(|e| L10nError::Parse {
            message: e.to_string(),
        })?;
        let units = formats::extract(self.format, &data, &self.ctx)?;
        tracing::debug!(
            format = %self.format,
            units = units.len(),
            file = %self.filename,
            "extracted units"
        );
        self.units.extend(units);
        Ok(())
    }

    pub fn to_value(&self) -> Result<Value> {
        formats::render(self.format, &self.units, &self.ctx)
    }

    /// Pretty-printed document text, non-ASCII kept as is, newline-terminated.
    pub fn serialize_text(&self) -> Result<String> {
        if self.options.indent > MAX_INDENT {
            return Err(L10nError::payload(format!(
                "indent must be between 0 and {MAX_INDENT}, got {}",
                self.options.indent
            )));
        }
        let indent = " ".repeat(self.options.indent);
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        self.to_value()?.serialize(&mut ser)?;
        buf.push(b'\n');
        String::from_utf8(buf).map_err(|e| L10nError::Encoding {
            message: e.to_string(),
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        encoding::encode(&self.serialize_text()?, &self.encoding)
    }

    pub fn save(&self, path: &Path) -> Result<usize> {
        let bytes = self.serialize()?;
        write_atomic(path, &bytes)?;
        tracing::info!(
            format = %self.format,
            units = self.units.len(),
            path = %path.display(),
            "saved store"
        );
        Ok(bytes.len())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if let Err(e) = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "store".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
