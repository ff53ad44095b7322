//! Portal configuration.
//!
//! Defaults can be overridden from the environment; a `.env` file in the
//! working directory is loaded first when present.

use crate::error::AppError;
use crate::services::BackendClientConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_BACKEND_URL: &str = "BENEFIT_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "BENEFIT_TIMEOUT_SECS";
pub const ENV_LOCALE: &str = "BENEFIT_LOCALE";
pub const ENV_STORAGE_PATH: &str = "BENEFIT_STORAGE_PATH";
pub const ENV_TRANSLATIONS: &str = "BENEFIT_TRANSLATIONS";

/// Locales the portal ships translations for.
pub const SUPPORTED_LOCALES: [&str; 3] = ["fi", "sv", "en"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Backend base URL, e.g. `https://benefit.example.fi/api`.
    pub backend_url: String,
    pub timeout_secs: u64,
    pub locale: String,
    /// Directory holding the local storage database.
    pub storage_path: PathBuf,
    /// Translation resources (`{ "<namespace>": { ... } }` JSON).
    pub translations_path: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            locale: "fi".to_string(),
            storage_path: PathBuf::from("data"),
            translations_path: None,
        }
    }
}

impl PortalConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, AppError> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults plus whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            config.backend_url = url;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                AppError::invalid_input_field(
                    format!("{} must be a number of seconds", ENV_TIMEOUT_SECS),
                    ENV_TIMEOUT_SECS,
                )
            })?;
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            config.locale = locale;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_TRANSLATIONS) {
            config.translations_path = Some(PathBuf::from(path));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(AppError::invalid_input_field(
                "Backend URL must start with http:// or https://",
                "backend_url",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::invalid_input_field(
                "Timeout must be at least one second",
                "timeout_secs",
            ));
        }
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(AppError::invalid_input_field(
                format!("Unsupported locale: {}", self.locale),
                "locale",
            ));
        }
        Ok(())
    }

    pub fn backend_client_config(&self) -> BackendClientConfig {
        BackendClientConfig {
            base_url: self.backend_url.clone(),
            timeout_secs: self.timeout_secs,
            locale: self.locale.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PortalConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PortalConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = PortalConfig::from_lookup(lookup(&[
            (ENV_BACKEND_URL, "https://benefit.example.fi/api"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_LOCALE, "sv"),
            (ENV_TRANSLATIONS, "/etc/benefit/sv.json"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url, "https://benefit.example.fi/api");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.backend_client_config().locale, "sv");
        assert_eq!(
            config.translations_path,
            Some(PathBuf::from("/etc/benefit/sv.json"))
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = PortalConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));

        assert!(PortalConfig::from_lookup(lookup(&[(ENV_LOCALE, "de")])).is_err());
        assert!(PortalConfig::from_lookup(lookup(&[(ENV_BACKEND_URL, "benefit.local")])).is_err());
    }
}
