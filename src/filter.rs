//! Filter capability and built-in filters.
//!
//! A filter is a pure value transformation. Filters compose into ordered
//! chains bound to a path pattern on the distiller; each filter in a chain
//! receives the previous filter's output. Values a filter does not
//! understand pass through unchanged.

use serde_json::Value;

/// A pure value transformation.
pub trait Filter {
    fn apply(&self, value: Value) -> Value;
}

impl<F> Filter for F
where
    F: Fn(Value) -> Value,
{
    fn apply(&self, value: Value) -> Value {
        self(value)
    }
}

/// Ordered composition of filters.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Append a filter to the end of the chain.
    pub fn attach(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    /// Run the value through every filter, in attach order.
    pub fn apply(&self, mut value: Value) -> Value {
        for filter in &self.filters {
            value = filter.apply(value);
        }
        value
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Upper-cases string values.
pub struct StringToUpper;

impl Filter for StringToUpper {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        }
    }
}

/// Lower-cases string values.
pub struct StringToLower;

impl Filter for StringToLower {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.to_lowercase()),
            other => other,
        }
    }
}

/// Trims leading and trailing whitespace from string values.
pub struct StringTrim;

impl Filter for StringTrim {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other,
        }
    }
}

/// Coerces numeric strings and floats to integers. Strings that do not parse
/// pass through.
pub struct ToInt;

impl Filter for ToInt {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::String(s),
            },
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else if let Some(f) = n.as_f64() {
                    Value::from(f as i64)
                } else {
                    Value::Number(n)
                }
            }
            other => other,
        }
    }
}

/// Coerces numeric strings and integers to floats. Strings that do not parse
/// pass through.
pub struct ToFloat;

impl Filter for ToFloat {
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(f) => Value::from(f),
                Err(_) => Value::String(s),
            },
            Value::Number(n) => match n.as_f64() {
                Some(f) => Value::from(f),
                None => Value::Number(n),
            },
            other => other,
        }
    }
}
