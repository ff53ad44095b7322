//! Per-form value store.
//!
//! Values are a JSON object addressed by dotted field ids such as
//! `employee.first_name`; errors are keyed by the same ids.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Validation error attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Error type, e.g. `required` or `email`. Selects the error text.
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// Values and errors of one form session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    values: Value,
    errors: BTreeMap<String, FieldError>,
}

impl FormState {
    pub fn new() -> Self {
        Self::from_values(Value::Object(Map::new()))
    }

    /// Start from existing values, e.g. an application loaded from the backend.
    pub fn from_values(values: Value) -> Self {
        let values = if values.is_object() {
            values
        } else {
            Value::Object(Map::new())
        };
        Self {
            values,
            errors: BTreeMap::new(),
        }
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Value at a dotted path. Numeric segments index into arrays.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.values, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Set the value at a dotted path, creating intermediate objects.
    ///
    /// Numeric segments descend into existing array rows. Any other
    /// non-object parent on the path is replaced by an object.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut current = &mut self.values;
        for segment in path.split('.') {
            let row = match current {
                Value::Array(items) => segment.parse::<usize>().ok().filter(|i| *i < items.len()),
                _ => None,
            };
            current = match row {
                Some(index) => &mut current[index],
                None => {
                    if !current.is_object() {
                        *current = Value::Object(Map::new());
                    }
                    &mut current[segment]
                }
            };
        }
        *current = value;
    }

    pub fn error(&self, path: &str) -> Option<&FieldError> {
        self.errors.get(path)
    }

    pub fn set_error(&mut self, path: &str, kind: impl Into<String>) {
        self.errors.insert(path.to_string(), FieldError::new(kind));
    }

    pub fn clear_error(&mut self, path: &str) {
        self.errors.remove(path);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn errors(&self) -> &BTreeMap<String, FieldError> {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
