//! Request data extraction.
//!
//! A [`Request`] is a protocol-neutral carrier for inbound data: query
//! parameters, a parsed body, server attributes, and headers. Extractors
//! each read one facet of it into a mapping; the standard chain merges query
//! params, parsed body, and attributes, in that order, with later extractors
//! overwriting earlier keys.

use serde_json::{Map, Value};

use crate::error::Error;

/// Inbound request data, decoupled from any HTTP library.
#[derive(Debug, Clone, Default)]
pub struct Request {
    method: String,
    query_params: Map<String, Value>,
    parsed_body: Option<Value>,
    attributes: Map<String, Value>,
    headers: Map<String, Value>,
}

impl Request {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            ..Self::default()
        }
    }

    pub fn with_query_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.query_params.insert(name.to_string(), value.into());
        self
    }

    pub fn with_parsed_body(mut self, body: Value) -> Self {
        self.parsed_body = Some(body);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.headers.insert(name.to_string(), value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn query_params(&self) -> &Map<String, Value> {
        &self.query_params
    }

    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }
}

/// Reads one facet of a request into a mapping of raw values.
pub trait Extractor {
    /// Grab data from the request. Callers must check `supports` first;
    /// extracting from an unsupported request is `Error::UnsupportedRequest`.
    fn extract(&self, request: &Request) -> Result<Map<String, Value>, Error>;

    /// Whether this extractor can service the given request.
    fn supports(&self, request: &Request) -> bool;
}

/// Extracts the query parameters. Supports any request carrying some.
pub struct QueryParamsExtractor;

impl Extractor for QueryParamsExtractor {
    fn extract(&self, request: &Request) -> Result<Map<String, Value>, Error> {
        if !self.supports(request) {
            return Err(Error::UnsupportedRequest);
        }
        Ok(request.query_params().clone())
    }

    fn supports(&self, request: &Request) -> bool {
        !request.query_params().is_empty()
    }
}

/// Extracts the parsed body, only for methods that carry one (POST, PUT)
/// and only when the body is a mapping.
pub struct ParsedBodyExtractor;

impl Extractor for ParsedBodyExtractor {
    fn extract(&self, request: &Request) -> Result<Map<String, Value>, Error> {
        if !self.supports(request) {
            return Err(Error::UnsupportedRequest);
        }
        match request.parsed_body() {
            Some(Value::Object(map)) => Ok(map.clone()),
            _ => Ok(Map::new()),
        }
    }

    fn supports(&self, request: &Request) -> bool {
        matches!(request.method(), "POST" | "PUT")
            && request.parsed_body().is_some_and(Value::is_object)
    }
}

/// Extracts server attributes. Supports any request carrying some.
pub struct AttributesExtractor;

impl Extractor for AttributesExtractor {
    fn extract(&self, request: &Request) -> Result<Map<String, Value>, Error> {
        if !self.supports(request) {
            return Err(Error::UnsupportedRequest);
        }
        Ok(request.attributes().clone())
    }

    fn supports(&self, request: &Request) -> bool {
        !request.attributes().is_empty()
    }
}

/// Extracts the headers. Supports every request.
pub struct HeadersExtractor;

impl Extractor for HeadersExtractor {
    fn extract(&self, request: &Request) -> Result<Map<String, Value>, Error> {
        Ok(request.headers().clone())
    }

    fn supports(&self, _request: &Request) -> bool {
        true
    }
}

/// A chain of extractors whose outputs are shallow-merged in attach order;
/// later extractors overwrite earlier keys.
///
/// The chain supports a request when at least one member does; unsupported
/// members are skipped during extraction.
#[derive(Default)]
pub struct ExtractorChain {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorChain {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// The distiller's default chain: query params, parsed body, attributes.
    pub fn standard() -> Self {
        let mut chain = Self::new();
        chain.attach(Box::new(QueryParamsExtractor));
        chain.attach(Box::new(ParsedBodyExtractor));
        chain.attach(Box::new(AttributesExtractor));
        chain
    }

    pub fn attach(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }
}

impl Extractor for ExtractorChain {
    fn extract(&self, request: &Request) -> Result<Map<String, Value>, Error> {
        if !self.supports(request) {
            return Err(Error::UnsupportedRequest);
        }
        let mut merged = Map::new();
        for extractor in &self.extractors {
            if extractor.supports(request) {
                for (key, value) in extractor.extract(request)? {
                    merged.insert(key, value);
                }
            }
        }
        Ok(merged)
    }

    fn supports(&self, request: &Request) -> bool {
        self.extractors.iter().any(|e| e.supports(request))
    }
}
