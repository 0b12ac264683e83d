//! Field cells: the smallest unit of editable form state.
//!
//! A cell owns one input's raw value, whether the user has committed it
//! (`touched`), an optional validator and an optional commit-time transform.
//! Errors are recomputed from the current value on every read and are only
//! surfaced once the cell has been touched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::rules::Requirement;

/// Message shown for a required cell left blank.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Validates a value, returning the error message if it is invalid.
///
pub type Validator = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

/// Rewrites a value when the cell is committed (blur).
///
pub type Transform = Arc<dyn Fn(FieldValue) -> FieldValue + Send + Sync>;

/// Value held by a field cell.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Returns true for blank text. Numbers and booleans are never blank.
    ///
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    /// Returns the text content, if this is a text value.
    ///
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the numeric content, parsing text if needed. Infinities and
    /// NaN are not numbers here.
    ///
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Bool(_) => None,
        };
        n.filter(|n| n.is_finite())
    }

    /// Convert into a JSON value for record payloads.
    ///
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or_default(),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => FieldValue::default(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Snapshot of a cell as a caller should present it.
///
#[derive(Clone, Debug, PartialEq)]
pub struct FieldState {
    pub value: FieldValue,
    pub touched: bool,
    pub error: Option<String>,
}

/// One input's value, touched flag, validation and commit transform.
///
#[derive(Clone)]
pub struct FieldCell {
    name: String,
    label: String,
    value: FieldValue,
    touched: bool,
    required: bool,
    validate: Option<Validator>,
    transform: Option<Transform>,
}

impl fmt::Debug for FieldCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCell")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("touched", &self.touched)
            .field("required", &self.required)
            .finish()
    }
}

impl FieldCell {
    /// Returns a new untouched cell holding the default value.
    ///
    pub fn new(name: &str, default: impl Into<FieldValue>) -> Self {
        FieldCell {
            name: name.to_owned(),
            label: name.replace('_', " "),
            value: default.into(),
            touched: false,
            required: false,
            validate: None,
            transform: None,
        }
    }

    /// Returns a new blank text cell.
    ///
    pub fn text(name: &str) -> Self {
        FieldCell::new(name, FieldValue::default())
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    pub fn transform_on_commit(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Requirement implied by the cell's own configuration.
    ///
    pub fn base_requirement(&self) -> Requirement {
        if self.required {
            Requirement::Required
        } else {
            Requirement::Optional
        }
    }

    /// Set a new raw value. Errors stay hidden until the next commit.
    ///
    pub fn on_change(&mut self, value: impl Into<FieldValue>) -> &mut Self {
        self.value = value.into();
        self.touched = false;
        self
    }

    /// Finalize the pending input: mark touched and apply the transform.
    ///
    pub fn on_commit(&mut self) -> &mut Self {
        self.touched = true;
        if let Some(transform) = &self.transform {
            self.value = transform(self.value.clone());
        }
        self
    }

    /// Make errors visible without changing the value.
    ///
    pub fn force_validate(&mut self) -> &mut Self {
        self.touched = true;
        self
    }

    /// Clear the value and hide errors again.
    ///
    pub fn reset(&mut self) -> &mut Self {
        self.value = FieldValue::default();
        self.touched = false;
        self
    }

    /// Seed the cell from a previously saved record.
    ///
    pub fn set_default(&mut self, value: FieldValue) -> &mut Self {
        self.value = value;
        self.touched = false;
        self
    }

    /// Current error under the cell's own requirement.
    ///
    pub fn error(&self) -> Option<String> {
        self.error_for(self.base_requirement())
    }

    /// Current error under an externally decided requirement.
    ///
    /// Hidden cells never error. A blank required cell reports
    /// [`REQUIRED_MESSAGE`] unless the validator has something more specific.
    pub fn error_for(&self, requirement: Requirement) -> Option<String> {
        if requirement == Requirement::Hidden {
            return None;
        }
        let validated = self.validate.as_ref().and_then(|v| v(&self.value));
        if validated.is_some() {
            return validated;
        }
        if requirement == Requirement::Required && self.value.is_empty() {
            return Some(REQUIRED_MESSAGE.to_string());
        }
        None
    }

    /// Error as shown to the user: hidden until the cell is touched.
    ///
    pub fn visible_error(&self) -> Option<String> {
        self.visible_error_for(self.base_requirement())
    }

    pub fn visible_error_for(&self, requirement: Requirement) -> Option<String> {
        if self.touched {
            self.error_for(requirement)
        } else {
            None
        }
    }

    pub fn state(&self) -> FieldState {
        FieldState {
            value: self.value.clone(),
            touched: self.touched,
            error: self.visible_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validators;

    fn email_cell() -> FieldCell {
        FieldCell::text("email").required().validate(validators::email())
    }

    #[test]
    fn test_new_cell_hides_errors() {
        let cell = email_cell();
        assert!(!cell.is_touched());
        assert_eq!(cell.error(), Some(REQUIRED_MESSAGE.to_string()));
        assert_eq!(cell.visible_error(), None);
        assert_eq!(cell.state().error, None);
    }

    #[test]
    fn test_on_change_clears_touched() {
        let mut cell = email_cell();
        cell.on_change("not-an-email").on_commit();
        assert!(cell.is_touched());
        assert!(cell.visible_error().is_some());

        cell.on_change("still-not");
        assert!(!cell.is_touched());
        assert_eq!(cell.visible_error(), None);
        assert!(cell.error().is_some());

        cell.on_commit();
        assert!(cell.visible_error().is_some());
    }

    #[test]
    fn test_force_validate_keeps_value() {
        let mut cell = email_cell();
        cell.on_change("a@b");
        cell.force_validate();
        assert!(cell.is_touched());
        assert_eq!(cell.value(), &FieldValue::from("a@b"));
        assert!(cell.visible_error().is_some());
    }

    #[test]
    fn test_commit_applies_transform_only_on_commit() {
        let mut cell = FieldCell::text("experience_years")
            .transform_on_commit(crate::form::validators::round_to_integer());
        cell.on_change("4.6");
        assert_eq!(cell.value(), &FieldValue::from("4.6"));
        cell.on_commit();
        assert_eq!(cell.value(), &FieldValue::Number(5.0));
    }

    #[test]
    fn test_error_is_recomputed_from_value() {
        let mut cell = email_cell();
        cell.on_change("a@b.com").on_commit();
        assert_eq!(cell.error(), None);
        cell.on_change("");
        cell.on_commit();
        assert_eq!(cell.error(), Some(REQUIRED_MESSAGE.to_string()));
    }

    #[test]
    fn test_cell_without_validator_is_always_valid() {
        let mut cell = FieldCell::text("notes");
        assert!(!cell.is_required());
        assert_eq!(cell.error(), None);
        cell.on_change("anything").on_commit();
        assert_eq!(cell.error(), None);
    }

    #[test]
    fn test_optional_cell_accepts_empty_string() {
        let mut cell = FieldCell::text("email").validate(validators::email());
        cell.force_validate();
        assert_eq!(cell.value(), &FieldValue::from(""));
        assert_eq!(cell.error(), None);
    }

    #[test]
    fn test_hidden_requirement_never_errors() {
        let cell = email_cell();
        assert_eq!(cell.error_for(Requirement::Hidden), None);
        assert!(cell.error_for(Requirement::Required).is_some());
        assert_eq!(cell.error_for(Requirement::Optional), None);
    }

    #[test]
    fn test_reset_and_set_default() {
        let mut cell = email_cell();
        cell.on_change("a@b.com").on_commit();
        cell.reset();
        assert_eq!(cell.value(), &FieldValue::default());
        assert!(!cell.is_touched());

        cell.set_default(FieldValue::from("saved@b.com"));
        assert_eq!(cell.value(), &FieldValue::from("saved@b.com"));
        assert!(!cell.is_touched());
    }

    #[test]
    fn test_field_value_json_conversion() {
        let json = serde_json::json!({ "n": 3.0, "b": true, "s": "x", "z": null });
        assert_eq!(FieldValue::from(&json["n"]), FieldValue::Number(3.0));
        assert_eq!(FieldValue::from(&json["b"]), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(&json["s"]), FieldValue::from("x"));
        assert_eq!(FieldValue::from(&json["z"]), FieldValue::default());
        assert_eq!(FieldValue::Number(2.5).to_json(), serde_json::json!(2.5));
    }

    #[test]
    fn test_field_value_is_empty() {
        assert!(FieldValue::from("   ").is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }
}
