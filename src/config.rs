//! Startup configuration read from the environment

/// Environment variable holding the Gemini credential
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Optional override for the remote model
pub const MODEL_VAR: &str = "GEMINI_MODEL";
/// Optional override for the API endpoint
pub const API_BASE_VAR: &str = "GEMINI_API_BASE";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Process-wide configuration, immutable once loaded
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl AppConfig {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env is normal; the variables may come from the shell.
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(format!("Failed to load .env file: {}", e));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing or blank credentials
    /// are rejected so the app never starts half-configured.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                format!(
                    "Please set the {} in your environment variables.",
                    API_KEY_VAR
                )
            })?;

        let model = non_blank(lookup(MODEL_VAR)).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = non_blank(lookup(API_BASE_VAR))
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            api_key,
            model,
            api_base,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_key_fails_with_descriptive_message() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(
            err,
            "Please set the GOOGLE_API_KEY in your environment variables."
        );
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let err = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(err.contains(API_KEY_VAR));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, " secret ")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn overrides_are_honoured() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "secret"),
            (MODEL_VAR, "gemini-2.0-flash"),
            (API_BASE_VAR, "http://127.0.0.1:9000/"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
    }
}
