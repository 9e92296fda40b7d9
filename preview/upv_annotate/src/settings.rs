//! Layered preview settings.
//!
//! A global table plus per-language overrides, resolved key by key with
//! deterministic precedence: language override, else global setting,
//! else built-in default. Unknown keys in the payload are ignored and
//! missing keys fall back, so a partial or malformed configuration can
//! never disable the preview outright.

use std::collections::HashMap;

use serde::Deserialize;

/// Effective options for one language after resolution.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// Show decoded text as a trailing inline annotation.
    pub inline: bool,
    /// Show decoded text in a hover tooltip.
    pub hover: bool,
}

/// Partial per-language override; unset keys fall through to the global.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LanguageOverride {
    pub inline: Option<bool>,
    pub hover: Option<bool>,
}

/// Preview configuration as delivered by the editor.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Language identifiers the preview applies to.
    pub languages: Vec<String>,
    pub inline: bool,
    pub hover: bool,
    /// Per-language overrides keyed by language identifier.
    pub overrides: HashMap<String, LanguageOverride>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            languages: [
                "javascript",
                "javascriptreact",
                "typescript",
                "typescriptreact",
            ]
            .map(String::from)
            .to_vec(),
            inline: true,
            hover: true,
            overrides: HashMap::new(),
        }
    }
}

impl Settings {
    /// Allow-list guard: is the preview enabled for this language at all?
    pub fn applies_to(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    /// Resolve the effective options for one language.
    pub fn resolve(&self, language: &str) -> Options {
        let over = self.overrides.get(language);
        Options {
            inline: over.and_then(|o| o.inline).unwrap_or(self.inline),
            hover: over.and_then(|o| o.hover).unwrap_or(self.hover),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_enable_both_surfaces() {
        let settings = Settings::default();
        assert!(settings.applies_to("javascript"));
        assert!(!settings.applies_to("rust"));
        assert_eq!(
            settings.resolve("javascript"),
            Options {
                inline: true,
                hover: true,
            }
        );
    }

    #[test]
    fn override_beats_global() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "languages": ["javascript", "python"],
            "inline": true,
            "hover": false,
            "overrides": {
                "python": { "inline": false }
            }
        }))
        .unwrap();

        // python: inline overridden, hover falls through to global.
        assert_eq!(
            settings.resolve("python"),
            Options {
                inline: false,
                hover: false,
            }
        );
        // javascript: no override, globals apply.
        assert_eq!(
            settings.resolve("javascript"),
            Options {
                inline: true,
                hover: false,
            }
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_value(serde_json::json!({ "languages": ["go"] })).unwrap();
        assert!(settings.inline);
        assert!(settings.hover);
        assert!(settings.applies_to("go"));
        assert!(!settings.applies_to("javascript"));
    }

    #[test]
    fn empty_payload_equals_defaults() {
        let settings: Settings = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn resolving_an_unlisted_language_uses_globals() {
        let settings = Settings::default();
        // Resolution is independent of the allow-list guard.
        assert_eq!(
            settings.resolve("rust"),
            Options {
                inline: true,
                hover: true,
            }
        );
    }
}
