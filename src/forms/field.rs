//! Single-field adapter over the form state.

use super::form_state::{FieldError, FormState};
use super::validation::{self, FieldSchema};
use crate::format::{self, EMPTY_PLACEHOLDER};
use crate::i18n::Translations;
use serde_json::Value;

const INPUT_LABEL_BASE: &str = "common:application.form.inputs";
const ERROR_TEXT_BASE: &str = "common:application.form.errors";

/// Binds one dotted field id to its value, error and display text.
pub struct FormField<'a> {
    id: String,
    state: &'a mut FormState,
    translations: &'a Translations,
    schema: Option<&'a FieldSchema>,
}

impl<'a> FormField<'a> {
    pub fn new(id: impl Into<String>, state: &'a mut FormState, translations: &'a Translations) -> Self {
        Self {
            id: id.into(),
            state,
            translations,
            schema: None,
        }
    }

    /// Attach the rules `trigger` validates against.
    pub fn with_schema(mut self, schema: &'a FieldSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last segment of the id, e.g. `first_name` for `employee.first_name`.
    pub fn field_name(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or_default()
    }

    pub fn label(&self) -> String {
        self.translations
            .t(&format!("{}.{}", INPUT_LABEL_BASE, self.field_name()))
    }

    /// Current value for display. Dates come back in UI format; the stored
    /// value is not changed.
    pub fn get_value(&self) -> Value {
        match self.state.get(&self.id) {
            Some(Value::String(s)) => match format::to_ui_date(s) {
                Some(date) => Value::String(date),
                None => Value::String(s.clone()),
            },
            Some(value) => value.clone(),
            None => Value::Null,
        }
    }

    /// Raw stored value.
    pub fn watch(&self) -> Value {
        self.state.get(&self.id).cloned().unwrap_or(Value::Null)
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.state.set(&self.id, value.into());
    }

    /// Reset to an empty string so the form shape stays stable.
    pub fn clear_value(&mut self) {
        self.state.set(&self.id, Value::String(String::new()));
    }

    pub fn get_error(&self) -> Option<&FieldError> {
        self.state.error(&self.id)
    }

    pub fn has_error(&self) -> bool {
        self.get_error().is_some()
    }

    pub fn error_text(&self) -> Option<String> {
        self.get_error()
            .map(|error| self.translations.t(&format!("{}.{}", ERROR_TEXT_BASE, error.kind)))
    }

    pub fn set_error(&mut self, kind: impl Into<String>) {
        self.state.set_error(&self.id, kind);
    }

    pub fn clear_errors(&mut self) {
        self.state.clear_error(&self.id);
    }

    /// Validate this field only. Fields without rules are always valid.
    pub fn trigger(&mut self) -> bool {
        match self.schema {
            Some(schema) => validation::validate_field(schema, self.state),
            None => true,
        }
    }

    /// `"<label>: <value>"`, with `-` for empty, false, null and zero values.
    pub fn summary_text(&self) -> String {
        let value = match self.get_value() {
            Value::Null | Value::Bool(false) => EMPTY_PLACEHOLDER.to_string(),
            Value::String(s) if s.is_empty() => EMPTY_PLACEHOLDER.to_string(),
            Value::Number(n) if n.as_f64() == Some(0.0) => EMPTY_PLACEHOLDER.to_string(),
            Value::String(s) => s,
            other => other.to_string(),
        };
        format!("{}: {}", self.label(), value)
    }
}
