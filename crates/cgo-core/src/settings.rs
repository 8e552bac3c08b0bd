use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::storage::{write_atomic, StorageError};

const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// --- AI Settings ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl AiSettings {
    /// Apply `CGO_AI_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored. The key falls
    /// back to `OPENAI_API_KEY` for the openai provider.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(provider) = get("CGO_AI_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = get("CGO_AI_MODEL") {
            self.model = model;
        }
        if let Some(key) = get("CGO_AI_API_KEY") {
            self.api_key = key;
        } else if self.api_key.is_empty() && self.provider == "openai" {
            if let Some(key) = get("OPENAI_API_KEY") {
                self.api_key = key;
            }
        }
        self
    }

    /// Settings as JSON with the key reduced to its last four characters.
    pub fn masked(&self) -> serde_json::Value {
        let tail: String = {
            let chars: Vec<char> = self.api_key.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        };
        let key = if self.api_key.is_empty() {
            String::new()
        } else {
            format!("…{tail}")
        };
        serde_json::json!({
            "provider": self.provider,
            "model": self.model,
            "apiKey": key,
        })
    }
}

pub fn read_settings(dir: &Path) -> AiSettings {
    let path = dir.join(SETTINGS_FILE);
    if !path.exists() {
        return AiSettings::default();
    }
    fs::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_settings(dir: &Path, settings: &AiSettings) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(settings)?;
    write_atomic(dir, SETTINGS_FILE, &json)
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_need_a_key() {
        let s = AiSettings::default();
        assert_eq!(s.provider, "openai");
        assert_eq!(s.model, "gpt-4o-mini");
        assert!(!ai_configured(&s));
    }

    #[test]
    fn openai_key_is_picked_up_from_env() {
        let s = AiSettings::default().with_overrides(env(&[("OPENAI_API_KEY", "sk-123")]));
        assert_eq!(s.api_key, "sk-123");
        assert!(ai_configured(&s));
    }

    #[test]
    fn openai_key_is_not_used_for_other_providers() {
        let s = AiSettings::default().with_overrides(env(&[
            ("CGO_AI_PROVIDER", "anthropic"),
            ("OPENAI_API_KEY", "sk-123"),
        ]));
        assert_eq!(s.provider, "anthropic");
        assert!(s.api_key.is_empty());
    }

    #[test]
    fn ollama_runs_without_a_key() {
        let s = AiSettings::default().with_overrides(env(&[
            ("CGO_AI_PROVIDER", "ollama"),
            ("CGO_AI_MODEL", "llama3"),
            ("CGO_AI_API_KEY", "  "),
        ]));
        assert!(ai_configured(&s));
    }

    #[test]
    fn settings_round_trip_and_partial_files_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_settings(dir.path()), AiSettings::default());

        let s = AiSettings {
            provider: "groq".into(),
            api_key: "k".into(),
            model: "m".into(),
        };
        write_settings(dir.path(), &s).unwrap();
        assert_eq!(read_settings(dir.path()), s);

        fs::write(dir.path().join(SETTINGS_FILE), r#"{"apiKey":"abc"}"#).unwrap();
        let partial = read_settings(dir.path());
        assert_eq!(partial.api_key, "abc");
        assert_eq!(partial.model, DEFAULT_MODEL);
    }

    #[test]
    fn masked_hides_all_but_the_tail() {
        let s = AiSettings {
            api_key: "sk-abcdef1234".into(),
            ..AiSettings::default()
        };
        assert_eq!(s.masked()["apiKey"], "…1234");
        assert_eq!(AiSettings::default().masked()["apiKey"], "");
    }
}
