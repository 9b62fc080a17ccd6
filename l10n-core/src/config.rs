use std::env;

pub const LOG_ENV: &str = "L10N_CORE_LOG";
pub const LOG_FORMAT_ENV: &str = "L10N_CORE_LOG_FORMAT";
pub const TARGET_LANGUAGE_ENV: &str = "L10N_CORE_TARGET_LANGUAGE";
pub const LOG_ANSI_ENV: &str = "L10N_CORE_LOG_ANSI";

const DEFAULT_LOG_FILTER: &str = "l10n_core=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Colour codes in log output. `None` enables them only when stderr is a
    /// terminal.
    pub log_ansi: Option<bool>,
    /// Used for plural output when a request names no target language.
    pub target_language: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Compact,
            log_ansi: None,
            target_language: "en".to_string(),
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = CoreConfig::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        CoreConfig {
            log_filter: non_empty(LOG_ENV).unwrap_or(defaults.log_filter),
            log_format: match non_empty(LOG_FORMAT_ENV).as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Compact,
            },
            log_ansi: match non_empty(LOG_ANSI_ENV).as_deref() {
                Some("1" | "true" | "always") => Some(true),
                Some("0" | "false" | "never") => Some(false),
                _ => None,
            },
            target_language: non_empty(TARGET_LANGUAGE_ENV).unwrap_or(defaults.target_language),
        }
    }
}
