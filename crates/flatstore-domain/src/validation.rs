//! Payload validation
//!
//! Request bodies arrive as raw JSON. Each entity draft implements
//! [`Validate`], which walks the payload with a [`ModelValidator`], collects
//! every problem instead of stopping at the first one, and only then builds
//! the draft.

use serde_json::{Map, Number, Value};

/// Validation messages for one payload
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("Validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Single-message error
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    /// Collected messages in field order
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Consume into the messages
    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    /// Whether no problem was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Types built from a validated JSON payload
pub trait Validate: Sized {
    /// Check `payload` and build the value
    ///
    /// # Errors
    ///
    /// Returns every rule violation found in the payload.
    fn validate(payload: &Value) -> Result<Self, ValidationErrors>;
}

/// Field-by-field checker over a JSON object
#[derive(Debug)]
pub struct ModelValidator<'a> {
    fields: Option<&'a Map<String, Value>>,
    errors: Vec<String>,
}

impl<'a> ModelValidator<'a> {
    /// Start validating `payload`; non-objects fail every required field
    pub fn new(payload: &'a Value) -> Self {
        match payload {
            Value::Object(fields) => Self {
                fields: Some(fields),
                errors: Vec::new(),
            },
            _ => Self {
                fields: None,
                errors: vec!["body must be an object".to_string()],
            },
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(field))
            .filter(|value| !value.is_null())
    }

    fn reject(&mut self, field: &str, problem: &str) {
        self.errors.push(format!("{field} {problem}"));
    }

    /// Non-empty string
    pub fn required_string(&mut self, field: &str) -> Option<String> {
        match self.get(field) {
            None => {
                self.reject(field, "is required");
                None
            }
            Some(Value::String(value)) if value.is_empty() => {
                self.reject(field, "is required");
                None
            }
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                self.reject(field, "must be a string");
                None
            }
        }
    }

    /// String when present; empty strings count as absent
    pub fn optional_string(&mut self, field: &str) -> Option<String> {
        match self.get(field) {
            None => None,
            Some(Value::String(value)) if value.is_empty() => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                self.reject(field, "must be a string");
                None
            }
        }
    }

    /// Number greater than zero
    pub fn required_positive_number(&mut self, field: &str) -> Option<Number> {
        match self.get(field) {
            None => {
                self.reject(field, "is required");
                None
            }
            Some(Value::Number(number)) if number.as_f64().is_some_and(|n| n > 0.0) => {
                Some(number.clone())
            }
            Some(Value::Number(_)) => {
                self.reject(field, "must be a positive number");
                None
            }
            Some(_) => {
                self.reject(field, "must be a number");
                None
            }
        }
    }

    /// Non-empty array of strings
    pub fn required_string_list(&mut self, field: &str) -> Option<Vec<String>> {
        match self.get(field) {
            None => {
                self.reject(field, "is required");
                None
            }
            Some(Value::Array(items)) if items.is_empty() => {
                self.reject(field, "is required");
                None
            }
            Some(Value::Array(items)) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned))
                    .collect();
                if strings.is_none() {
                    self.reject(field, "must be a list of strings");
                }
                strings
            }
            Some(_) => {
                self.reject(field, "must be a list of strings");
                None
            }
        }
    }

    /// Messages recorded so far
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Build the value unless a rule failed
    ///
    /// `build` receives control only when every rule passed; it returns
    /// `None` only if a field it needs was never checked.
    ///
    /// # Errors
    ///
    /// Returns the collected messages when any rule failed.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if !self.errors.is_empty() {
            return Err(ValidationErrors(self.errors));
        }
        build().ok_or_else(|| ValidationErrors::single("payload is incomplete"))
    }
}
