//! Translation lookup with readable fallbacks
//!
//! Lookups follow the i18next convention of returning the key itself on a
//! miss. [`t_with_fallback`] turns such a miss into an explicit fallback or a
//! label derived from the key, so `positions.football.centerBack` renders as
//! `Center Back` when the locale has no entry.

use serde_json::Value;
use std::collections::HashMap;

/// Translate `key`, falling back to `fallback` or a humanized key segment
///
/// The lookup result wins whenever it differs from the key.
pub fn t_with_fallback<F>(lookup: F, key: &str, fallback: Option<&str>) -> String
where
    F: Fn(&str) -> String,
{
    let translated = lookup(key);
    if translated != key {
        return translated;
    }

    match fallback {
        Some(text) => text.to_string(),
        None => humanize(key.rsplit('.').next().unwrap_or(key)),
    }
}

/// `centerBack` -> `Center Back`, `striker` -> `Striker`
#[must_use]
pub fn humanize(segment: &str) -> String {
    let mut label = String::with_capacity(segment.len() + 4);
    for (i, c) in segment.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }
    }
    label
}

/// Display name of a sport key
pub fn translate_sport<F>(lookup: F, sport: &str) -> String
where
    F: Fn(&str) -> String,
{
    t_with_fallback(lookup, &format!("sports.{sport}"), None)
}

/// Display name of a position key within a sport
pub fn translate_position<F>(lookup: F, sport: &str, position: &str) -> String
where
    F: Fn(&str) -> String,
{
    t_with_fallback(lookup, &format!("positions.{sport}.{position}"), None)
}

/// Display name of a nationality code
pub fn translate_nationality<F>(lookup: F, code: &str) -> String
where
    F: Fn(&str) -> String,
{
    t_with_fallback(lookup, &format!("nationalities.{code}"), None)
}

/// A locale dictionary flattened to dotted keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    locale: String,
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Empty catalog for `locale`
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: HashMap::new(),
        }
    }

    /// Parse a nested JSON dictionary
    ///
    /// Objects nest with `.`; strings, numbers and booleans become entries.
    /// Arrays and nulls are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON or its root is not an object.
    pub fn from_json(locale: impl Into<String>, json: &str) -> serde_json::Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let Value::Object(map) = root else {
            return Err(serde::de::Error::custom("translation catalog must be a JSON object"));
        };

        let mut catalog = Self::new(locale);
        for (key, value) in map {
            catalog.insert_value(key, value);
        }
        Ok(catalog)
    }

    fn insert_value(&mut self, key: String, value: Value) {
        match value {
            Value::Object(map) => {
                for (child, value) in map {
                    self.insert_value(format!("{key}.{child}"), value);
                }
            }
            Value::String(text) => {
                self.entries.insert(key, text);
            }
            Value::Number(n) => {
                self.entries.insert(key, n.to_string());
            }
            Value::Bool(b) => {
                self.entries.insert(key, b.to_string());
            }
            Value::Array(_) | Value::Null => {}
        }
    }

    /// Locale tag, e.g. `pt-BR`
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Entry for `key`, if present
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Entry for `key`, or the key itself on a miss
    #[must_use]
    pub fn lookup(&self, key: &str) -> String {
        self.get(key).map_or_else(|| key.to_string(), ToString::to_string)
    }

    /// [`t_with_fallback`] against this catalog
    #[must_use]
    pub fn translate(&self, key: &str, fallback: Option<&str>) -> String {
        t_with_fallback(|k| self.lookup(k), key, fallback)
    }

    /// Add or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn identity(key: &str) -> String {
        key.to_string()
    }

    #[rstest]
    #[case("positions.football.striker", "Striker")]
    #[case("positions.football.centerBack", "Center Back")]
    #[case("sports.basketball", "Basketball")]
    #[case("plain", "Plain")]
    #[case("positions.football.", "")]
    fn test_humanized_fallback(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(t_with_fallback(identity, key, None), expected);
    }

    #[test]
    fn test_explicit_fallback_beats_humanized() {
        assert_eq!(
            t_with_fallback(identity, "positions.football.striker", Some("Forward")),
            "Forward"
        );
    }

    #[test]
    fn test_translation_wins() {
        let lookup = |key: &str| {
            if key == "sports.football" {
                "Futebol".to_string()
            } else {
                key.to_string()
            }
        };
        assert_eq!(translate_sport(lookup, "football"), "Futebol");
        assert_eq!(translate_sport(lookup, "handball"), "Handball");
    }

    #[test]
    fn test_specializations_build_keys() {
        assert_eq!(translate_position(identity, "football", "leftWing"), "Left Wing");
        assert_eq!(translate_nationality(identity, "br"), "Br");
    }

    #[test]
    fn test_catalog_flattens_nested_json() {
        let catalog = Catalog::from_json(
            "pt-BR",
            r#"{"sports": {"football": "Futebol"}, "positions": {"football": {"striker": "Atacante"}}, "meta": {"version": 3, "tags": ["a"]}}"#,
        )
        .unwrap();

        assert_eq!(catalog.locale(), "pt-BR");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("positions.football.striker"), Some("Atacante"));
        assert_eq!(catalog.get("meta.version"), Some("3"));
        assert_eq!(catalog.lookup("sports.rugby"), "sports.rugby");
        assert_eq!(catalog.translate("sports.football", None), "Futebol");
        assert_eq!(catalog.translate("positions.football.goalKeeper", None), "Goal Keeper");
    }

    #[test]
    fn test_catalog_rejects_non_object_root() {
        assert!(Catalog::from_json("en", "[1, 2]").is_err());
        assert!(Catalog::from_json("en", "{").is_err());
    }

    proptest! {
        #[test]
        fn prop_miss_uses_fallback(key in "[a-z]{1,8}(\\.[a-zA-Z]{1,8}){0,3}", fallback in "[A-Za-z ]{1,12}") {
            prop_assert_eq!(t_with_fallback(identity, &key, Some(&fallback)), fallback);
        }

        #[test]
        fn prop_miss_humanizes_last_segment(prefix in "[a-z]{1,8}", segment in "[a-z]{1,6}([A-Z][a-z]{1,6}){0,2}") {
            let key = format!("{prefix}.{segment}");
            let label = t_with_fallback(identity, &key, None);
            prop_assert_eq!(label.replace(' ', "").to_lowercase(), segment.to_lowercase());
            prop_assert!(label.chars().next().is_some_and(char::is_uppercase));
        }

        #[test]
        fn prop_hit_returns_translation(key in "[a-z]{1,8}\\.[a-z]{1,8}") {
            let lookup = |k: &str| format!("<{k}>");
            prop_assert_eq!(t_with_fallback(lookup, &key, Some("ignored")), format!("<{key}>"));
        }
    }
}
