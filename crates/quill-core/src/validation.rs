//! Declarative payload validation.
//!
//! A [`Validator`] is an ordered list of [`FieldRule`]s. Each rule names one
//! field of a JSON object and carries a chain of predicates, every predicate
//! paired with the message reported when it fails. Checking a field stops at
//! the first failing predicate, so a field yields at most one [`Violation`].
//!
//! ```
//! use quill_core::validation::{FieldRule, Validator, rules};
//! use serde_json::json;
//!
//! let validator = Validator::new()
//!     .rule(FieldRule::new("name").check(rules::is_string, "Name is required"));
//!
//! assert!(validator.validate(&json!({ "name": "quill" })).is_ok());
//! assert!(validator.validate(&json!({})).is_err());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A check applied to the value of a single field.
pub type Predicate = fn(&Value) -> bool;

/// The predicate chain for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: &'static str,
    optional: bool,
    checks: Vec<(Predicate, &'static str)>,
}

impl FieldRule {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            optional: false,
            checks: Vec::new(),
        }
    }

    /// Skip the chain entirely when the field is absent.
    ///
    /// An explicit `null` still counts as present.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn check(mut self, predicate: Predicate, message: &'static str) -> Self {
        self.checks.push((predicate, message));
        self
    }

    /// Run the chain against `payload`, returning the first violation.
    pub fn apply(&self, payload: &Value) -> Option<Violation> {
        let value = match payload.get(self.field) {
            Some(value) => value,
            None if self.optional => return None,
            None => &Value::Null,
        };

        self.checks
            .iter()
            .find(|(predicate, _)| !predicate(value))
            .map(|(_, message)| Violation::new(self.field, *message))
    }
}

/// Ordered set of field rules.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<FieldRule>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate a payload. Violations are reported in rule order.
    pub fn validate(&self, payload: &Value) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> = self
            .rules
            .iter()
            .filter_map(|rule| rule.apply(payload))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Reusable predicates.
pub mod rules {
    use serde_json::Value;

    pub fn is_string(value: &Value) -> bool {
        value.is_string()
    }

    /// A string with at least one character. Whitespace counts.
    pub fn not_empty(value: &Value) -> bool {
        value.as_str().is_some_and(|s| !s.is_empty())
    }

    pub fn is_array(value: &Value) -> bool {
        value.is_array()
    }

    /// Every element of an array is a string. Vacuously true for non-arrays.
    pub fn each_string(value: &Value) -> bool {
        value
            .as_array()
            .is_none_or(|items| items.iter().all(Value::is_string))
    }
}
