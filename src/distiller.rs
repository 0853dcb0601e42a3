//! The distiller: drives extract → gap-fill → validate → filter → callback
//! over one request.
//!
//! A distiller owns its rule sets and a two-state validation lifecycle:
//! it starts unvalidated, and the first `is_valid` (or `get_data`) call runs
//! validation exactly once and memoizes the outcome for the rest of the
//! instance's life. Filtered data is only ever produced for valid requests.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::error::{Error, ValidationError};
use crate::extract::{Extractor, ExtractorChain, Request};
use crate::filter::{Filter, FilterChain};
use crate::flatten::{FlatMap, flatten_compact, flatten_with_ancestors, unflatten};
use crate::gaps::fill_gaps;
use crate::pattern::{MatcherCache, Modifiers};
use crate::validator::{Validator, ValidatorChain};

#[derive(Clone, Copy)]
enum State {
    Unvalidated,
    Validated { valid: bool },
}

/// Validates and filters one request's nested data against pattern-addressed
/// rule sets.
pub struct Distiller {
    request: Request,
    extractor: Box<dyn Extractor>,
    modifiers: Modifiers,
    matchers: MatcherCache,
    filters: Vec<(String, FilterChain)>,
    validators: Vec<(String, ValidatorChain)>,
    callbacks: Vec<Box<dyn Fn(Value) -> Value>>,
    errors: Vec<ValidationError>,
    state: State,
}

impl Distiller {
    /// Distiller over `request` with the standard extractor chain and the
    /// standard shorthand set.
    pub fn new(request: Request) -> Self {
        Self::with_extractor(request, Box::new(ExtractorChain::standard()))
    }

    /// Distiller with a caller-supplied extractor.
    pub fn with_extractor(request: Request, extractor: Box<dyn Extractor>) -> Self {
        Self {
            request,
            extractor,
            modifiers: Modifiers::standard(),
            matchers: MatcherCache::new(),
            filters: Vec::new(),
            validators: Vec::new(),
            callbacks: Vec::new(),
            errors: Vec::new(),
            state: State::Unvalidated,
        }
    }

    /// Append `filter` to the chain bound to `pattern`. Registering the same
    /// pattern again extends its chain rather than replacing it.
    pub fn add_filter(&mut self, pattern: &str, filter: Box<dyn Filter>) {
        chain_for(&mut self.filters, pattern).attach(filter);
    }

    /// Append `validator` to the chain bound to `pattern`. Registering the
    /// same pattern again extends its chain rather than replacing it.
    pub fn add_validator(&mut self, pattern: &str, validator: Box<dyn Validator>) {
        chain_for(&mut self.validators, pattern).attach(validator);
    }

    /// Register a post-processing callback, run over the filtered tree in
    /// registration order, only after successful validation.
    pub fn add_callback(&mut self, callback: impl Fn(Value) -> Value + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Whether the request passes every registered validator.
    ///
    /// Validation runs on the first call and the outcome is memoized;
    /// repeated calls return the same result without re-extracting.
    pub fn is_valid(&mut self) -> Result<bool, Error> {
        if let State::Validated { valid } = self.state {
            return Ok(valid);
        }
        self.validate()?;
        let valid = self.errors.is_empty();
        self.state = State::Validated { valid };
        Ok(valid)
    }

    /// The filtered, reassembled data tree.
    ///
    /// Fails with [`Error::InvalidRequest`] when validation did not pass; no
    /// data is ever produced for an invalid request.
    pub fn get_data(&mut self) -> Result<Value, Error> {
        if !self.is_valid()? {
            return Err(Error::InvalidRequest);
        }

        let raw = self.raw_map()?;
        let flat = flatten_compact(&raw);

        // Group paths by depth so filters on nested fields run before their
        // container is reassembled.
        let mut levels: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for path in flat.keys() {
            levels
                .entry(path.split('.').count())
                .or_default()
                .push(path.clone());
        }

        let mut remaining = flat;
        let mut data = FlatMap::new();
        for (depth, paths) in levels.into_iter().rev() {
            trace!("filtering {} paths at depth {depth}", paths.len());
            for path in &paths {
                if let Some(value) = remaining.remove(path.as_str()) {
                    data.entry(path.clone()).or_insert(value);
                }
            }
            for path in &paths {
                for (pattern, chain) in &self.filters {
                    let matcher = self.matchers.matcher(pattern, &self.modifiers)?;
                    if !matcher.matches(path) {
                        continue;
                    }
                    if let Some(slot) = data.get_mut(path.as_str()) {
                        let current = std::mem::take(slot);
                        *slot = chain.apply(current);
                    }
                }
            }
            // Reassemble one level before merging in the shallower paths.
            data = unflatten(data);
        }

        let mut result = Value::Object(data);
        for callback in &self.callbacks {
            result = callback(result);
        }
        Ok(result)
    }

    /// Validation errors accumulated so far. Empty until `is_valid` has run.
    pub fn get_errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The raw extracted tree. Re-extracts on every call; not cached.
    pub fn get_raw_data(&self) -> Result<Value, Error> {
        Ok(Value::Object(self.raw_map()?))
    }

    fn validate(&mut self) -> Result<(), Error> {
        let raw = self.raw_map()?;
        let flat = flatten_with_ancestors(&raw);
        let patterns: Vec<String> = self.validators.iter().map(|(p, _)| p.clone()).collect();
        let flat = fill_gaps(flat, &patterns, &self.modifiers)?;
        debug!(
            "validating {} fields against {} rule chains",
            flat.len(),
            self.validators.len()
        );

        for (pattern, chain) in &self.validators {
            let matcher = self.matchers.matcher(pattern, &self.modifiers)?;
            for (path, value) in &flat {
                if !matcher.matches(path) {
                    continue;
                }
                for violation in chain.check(value) {
                    trace!("validator {} rejected `{path}`", violation.validator);
                    self.errors.push(ValidationError {
                        field: path.clone(),
                        message: violation.message,
                        validator: violation.validator,
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn raw_map(&self) -> Result<Map<String, Value>, Error> {
        if !self.extractor.supports(&self.request) {
            return Err(Error::UnsupportedRequest);
        }
        self.extractor.extract(&self.request)
    }
}

/// Find or create the chain registered under `pattern`.
fn chain_for<'a, C: Default>(rules: &'a mut Vec<(String, C)>, pattern: &str) -> &'a mut C {
    if let Some(index) = rules.iter().position(|(p, _)| p == pattern) {
        return &mut rules[index].1;
    }
    rules.push((pattern.to_string(), C::default()));
    let last = rules.len() - 1;
    &mut rules[last].1
}
