/// CLDR plural categories in canonical order.
pub const CLDR_CATEGORIES: [&str; 6] = ["zero", "one", "two", "few", "many", "other"];

const ONE_OTHER: &[&str] = &["one", "other"];
const OTHER: &[&str] = &["other"];
const ONE_MANY_OTHER: &[&str] = &["one", "many", "other"];
const ONE_FEW_MANY_OTHER: &[&str] = &["one", "few", "many", "other"];
const ONE_FEW_OTHER: &[&str] = &["one", "few", "other"];
const ALL: &[&str] = &["zero", "one", "two", "few", "many", "other"];

/// Cardinal plural tags used by `lang`. Unknown languages get English tags.
pub fn plural_tags(lang: &str) -> &'static [&'static str] {
    match primary_subtag(lang).as_str() {
        "ja" | "zh" | "ko" | "th" | "vi" | "id" | "ms" | "lo" | "my" | "km" => OTHER,
        "fr" | "es" | "it" | "pt" | "ca" => ONE_MANY_OTHER,
        "ru" | "uk" | "be" | "pl" | "cs" | "sk" | "lt" => ONE_FEW_MANY_OTHER,
        "ro" | "hr" | "sr" | "bs" => ONE_FEW_OTHER,
        "sl" => &["one", "two", "few", "other"],
        "he" => &["one", "two", "other"],
        "lv" => &["zero", "one", "other"],
        "ga" => &["one", "two", "few", "many", "other"],
        "ar" | "cy" => ALL,
        _ => ONE_OTHER,
    }
}

/// `pt_BR` and `pt-BR` both reduce to `pt`; empty means English.
pub fn primary_subtag(lang: &str) -> String {
    let lang = lang.trim().replace('_', "-");
    match lang.split('-').next() {
        Some(primary) if !primary.is_empty() => primary.to_lowercase(),
        _ => "en".to_string(),
    }
}
