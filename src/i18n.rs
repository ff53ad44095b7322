//! Translation lookup over already-loaded resources.
//!
//! Keys use the `namespace:dotted.path` form (`common:applications.list.common.edit`).
//! A missing key resolves to the key itself so the UI never renders empty text.

use crate::error::AppError;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Namespace used when a key has none.
pub const DEFAULT_NAMESPACE: &str = "common";

/// Flattened translation resources for one locale.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    locale: String,
    entries: HashMap<String, String>,
}

impl Translations {
    /// Empty resources: every lookup echoes its key.
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: HashMap::new(),
        }
    }

    /// Locale these resources belong to.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Add a namespace from a nested JSON object.
    pub fn with_namespace(mut self, namespace: &str, resources: &Value) -> Self {
        self.add_namespace(namespace, resources);
        self
    }

    /// Add a namespace from a nested JSON object.
    pub fn add_namespace(&mut self, namespace: &str, resources: &Value) {
        let mut prefix = format!("{}:", namespace);
        flatten(&mut self.entries, &mut prefix, resources);
    }

    /// Load a `{ "<namespace>": { ... } }` JSON file.
    pub fn load_file(locale: impl Into<String>, path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::internal(format!(
                "Failed to read translations {}: {}",
                path.display(),
                e
            ))
        })?;
        let value: Value = serde_json::from_str(&content)?;

        let mut translations = Self::new(locale);
        match value.as_object() {
            Some(namespaces) => {
                for (namespace, resources) in namespaces {
                    translations.add_namespace(namespace, resources);
                }
            }
            None => return Err(AppError::invalid_input("Translations must be a JSON object")),
        }

        log::debug!(
            "Loaded {} translation entries for {}",
            translations.entries.len(),
            translations.locale
        );
        Ok(translations)
    }

    /// Resolve a key.
    pub fn t(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    /// Resolve a key and substitute `{{name}}` placeholders.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut text = self.t(key);
        for (name, value) in params {
            text = text.replace(&format!("{{{{{}}}}}", name), value);
        }
        text
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if key.contains(':') {
            self.entries.get(key).cloned()
        } else {
            self.entries
                .get(&format!("{}:{}", DEFAULT_NAMESPACE, key))
                .cloned()
        }
    }
}

fn flatten(entries: &mut HashMap<String, String>, prefix: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let len = prefix.len();
                if !prefix.ends_with(':') {
                    prefix.push('.');
                }
                prefix.push_str(k);
                flatten(entries, prefix, v);
                prefix.truncate(len);
            }
        }
        Value::String(s) => {
            entries.insert(prefix.clone(), s.clone());
        }
        Value::Null => {}
        other => {
            entries.insert(prefix.clone(), other.to_string());
        }
    }
}
