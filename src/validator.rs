//! Validator capability and built-in validators.
//!
//! Validators check a single value and report zero or more failure messages.
//! They compose into ordered chains bound to a path pattern on the
//! distiller; a chain runs every attached validator and collects every
//! message, so one bad value can surface several errors.

use regex::Regex;
use serde_json::Value;

/// A check over a single value.
pub trait Validator {
    /// Short rule name recorded on validation errors.
    fn name(&self) -> &'static str;

    /// `Ok` when the value passes; `Err` carries one message per failure.
    fn check(&self, value: &Value) -> Result<(), Vec<String>>;
}

/// One failed validator within a chain.
#[derive(Debug, Clone)]
pub struct Violation {
    pub validator: &'static str,
    pub message: String,
}

/// Ordered composition of validators. An empty chain accepts everything.
#[derive(Default)]
pub struct ValidatorChain {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Append a validator to the end of the chain.
    pub fn attach(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    /// Run every attached validator against `value`, collecting all failure
    /// messages. Later validators run regardless of earlier failures.
    pub fn check(&self, value: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        for validator in &self.validators {
            if let Err(messages) = validator.check(value) {
                for message in messages {
                    violations.push(Violation {
                        validator: validator.name(),
                        message,
                    });
                }
            }
        }
        violations
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Rejects null, empty strings, and empty containers.
pub struct NotEmpty;

impl Validator for NotEmpty {
    fn name(&self) -> &'static str {
        "NotEmpty"
    }

    fn check(&self, value: &Value) -> Result<(), Vec<String>> {
        let empty = match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            Err(vec!["Value is required and can't be empty".to_string()])
        } else {
            Ok(())
        }
    }
}

/// Accepts strings shaped like `local-part@hostname` with a dotted domain.
pub struct EmailAddress {
    regex: Regex,
}

impl EmailAddress {
    pub fn new() -> Self {
        // Deliberately loose: one @, no whitespace, at least one domain dot.
        let regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid");
        Self { regex }
    }
}

impl Default for EmailAddress {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailAddress {
    fn name(&self) -> &'static str {
        "EmailAddress"
    }

    fn check(&self, value: &Value) -> Result<(), Vec<String>> {
        match value {
            Value::String(s) if self.regex.is_match(s) => Ok(()),
            Value::String(s) => Err(vec![format!("'{s}' is not a valid email address")]),
            _ => Err(vec!["The input is not a valid email address".to_string()]),
        }
    }
}

/// Validates string values against a caller-supplied regular expression.
pub struct Matches {
    regex: Regex,
}

impl Matches {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl Validator for Matches {
    fn name(&self) -> &'static str {
        "Matches"
    }

    fn check(&self, value: &Value) -> Result<(), Vec<String>> {
        match value {
            Value::String(s) if self.regex.is_match(s) => Ok(()),
            Value::String(s) => Err(vec![format!("'{s}' does not match the expected format")]),
            _ => Err(vec!["The input is not a string".to_string()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn not_empty_rejects_empty_values() {
        assert!(NotEmpty.check(&json!(null)).is_err());
        assert!(NotEmpty.check(&json!("")).is_err());
        assert!(NotEmpty.check(&json!([])).is_err());
        assert!(NotEmpty.check(&json!({})).is_err());
    }

    #[test]
    fn not_empty_accepts_present_values() {
        assert!(NotEmpty.check(&json!("x")).is_ok());
        assert!(NotEmpty.check(&json!(0)).is_ok());
        assert!(NotEmpty.check(&json!(false)).is_ok());
        assert!(NotEmpty.check(&json!(["a"])).is_ok());
    }

    #[test]
    fn not_empty_message() {
        let messages = NotEmpty.check(&json!("")).unwrap_err();
        assert_eq!(messages, vec!["Value is required and can't be empty"]);
    }

    #[test]
    fn email_address_accepts_plausible_addresses() {
        let email = EmailAddress::new();
        assert!(email.check(&json!("localhost@localhost.com")).is_ok());
        assert!(email.check(&json!("a.b@c.co.uk")).is_ok());
    }

    #[test]
    fn email_address_rejects_malformed_input() {
        let email = EmailAddress::new();
        assert!(email.check(&json!("invalid")).is_err());
        assert!(email.check(&json!("a b@c.com")).is_err());
        assert!(email.check(&json!(null)).is_err());
        assert!(email.check(&json!(42)).is_err());
    }

    #[test]
    fn matches_checks_strings() {
        let four_digits = Matches::new(r"^[0-9]{4}$").unwrap();
        assert!(four_digits.check(&json!("1234")).is_ok());
        assert!(four_digits.check(&json!("12a4")).is_err());
        assert!(four_digits.check(&json!(1234)).is_err());
    }

    #[test]
    fn chain_collects_all_violations() {
        let mut chain = ValidatorChain::new();
        chain.attach(Box::new(NotEmpty));
        chain.attach(Box::new(EmailAddress::new()));
        let violations = chain.check(&json!(""));
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].validator, "NotEmpty");
        assert_eq!(violations[1].validator, "EmailAddress");
    }

    #[test]
    fn empty_chain_accepts_everything() {
        let chain = ValidatorChain::new();
        assert!(chain.check(&json!(null)).is_empty());
        assert!(chain.is_empty());
    }
}
