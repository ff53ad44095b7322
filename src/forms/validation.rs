//! Field validation rules and conditional visibility.

use super::form_state::FormState;
use crate::format;
use serde_json::Value;

/// Phone numbers are accepted with this many characters, inclusive.
pub const PHONE_NUMBER_LENGTH: (usize, usize) = (3, 13);

/// Weekly working hours accepted for a subsidised employment.
pub const WORKING_HOURS: (f64, f64) = (18.0, 168.0);

/// A single check applied to a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must be present and not blank.
    Required,
    /// Checkbox that must be ticked.
    Checked,
    MinLength(usize),
    MaxLength(usize),
    Email,
    PhoneNumber,
    /// Date in UI (`d.M.yyyy`) or backend format.
    Date,
    Min(f64),
    Max(f64),
}

impl Rule {
    /// Error type written to the form state when the rule fails.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Required | Self::Checked => "required",
            Self::MinLength(_) | Self::Min(_) => "min",
            Self::MaxLength(_) | Self::Max(_) => "max",
            Self::Email => "email",
            Self::PhoneNumber => "phone",
            Self::Date => "date",
        }
    }

    /// Whether the value passes. Rules other than `Required` and `Checked`
    /// accept an empty value.
    pub fn check(&self, value: Option<&Value>) -> bool {
        match self {
            Self::Required => !is_blank(value),
            Self::Checked => value == Some(&Value::Bool(true)),
            _ if is_blank(value) => true,
            Self::MinLength(min) => text(value).chars().count() >= *min,
            Self::MaxLength(max) => text(value).chars().count() <= *max,
            Self::Email => is_email(&text(value)),
            Self::PhoneNumber => {
                let len = text(value).trim().chars().count();
                (PHONE_NUMBER_LENGTH.0..=PHONE_NUMBER_LENGTH.1).contains(&len)
            }
            Self::Date => format::is_date(&text(value)),
            Self::Min(min) => number(value).is_some_and(|n| n >= *min),
            Self::Max(max) => number(value).is_some_and(|n| n <= *max),
        }
    }
}

/// Visibility condition on another field's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
}

impl Condition {
    pub fn holds(&self, state: &FormState) -> bool {
        match self {
            Self::Equals { field, value } => state.get(field) == Some(value),
            Self::NotEquals { field, value } => state.get(field) != Some(value),
        }
    }
}

/// Rules for one field, identified by its dotted id.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub id: String,
    pub rules: Vec<Rule>,
    pub visible_when: Option<Condition>,
}

impl FieldSchema {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rules: Vec::new(),
            visible_when: None,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    /// Show the field only when `field` equals `value`.
    pub fn visible_when(mut self, field: impl Into<String>, value: Value) -> Self {
        self.visible_when = Some(Condition::Equals {
            field: field.into(),
            value,
        });
        self
    }

    /// Show the field unless `field` equals `value`.
    pub fn hidden_when(mut self, field: impl Into<String>, value: Value) -> Self {
        self.visible_when = Some(Condition::NotEquals {
            field: field.into(),
            value,
        });
        self
    }

    pub fn is_visible(&self, state: &FormState) -> bool {
        self.visible_when
            .as_ref()
            .map_or(true, |condition| condition.holds(state))
    }

    /// First failing rule's error type, or `None` when the value is valid.
    pub fn validate(&self, state: &FormState) -> Option<&'static str> {
        let value = state.get(&self.id);
        self.rules
            .iter()
            .find(|rule| !rule.check(value))
            .map(Rule::kind)
    }
}

/// Validate one field and update its error. Hidden fields always pass.
pub fn validate_field(schema: &FieldSchema, state: &mut FormState) -> bool {
    if !schema.is_visible(state) {
        state.clear_error(&schema.id);
        return true;
    }

    match schema.validate(state) {
        Some(kind) => {
            state.set_error(&schema.id, kind);
            false
        }
        None => {
            state.clear_error(&schema.id);
            true
        }
    }
}

/// Validate a set of fields, returning the ids of those that failed.
pub fn validate_fields(schemas: &[FieldSchema], state: &mut FormState) -> Vec<String> {
    schemas
        .iter()
        .filter(|schema| !validate_field(schema, state))
        .map(|schema| schema.id.clone())
        .collect()
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Numbers arrive either as JSON numbers or as text with a decimal comma.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn is_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
