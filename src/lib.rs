//! Validate and filter nested request data with dot-path pattern rules.
//!
//! A [`Distiller`] owns two pattern-addressed rule sets — filters and
//! validators — and drives one request through extract → gap-fill →
//! validate → filter → callback. Rules are bound to path *patterns*
//! (`user.email`, `groups[].name`, `code.{[0-9]{4}}`) rather than exact
//! field names; the nested tree is flattened to dot-joined paths, matched
//! against the compiled patterns, and reassembled depth-by-depth.
//!
//! ```
//! use distiller::{Distiller, Request};
//! use distiller::filter::StringToUpper;
//! use distiller::validator::EmailAddress;
//!
//! let request = Request::new("GET").with_query_param("email", "x@y.com");
//! let mut distiller = Distiller::new(request);
//! distiller.add_validator("email", Box::new(EmailAddress::new()));
//! distiller.add_filter("email", Box::new(StringToUpper));
//!
//! assert!(distiller.is_valid().unwrap());
//! assert_eq!(
//!     distiller.get_data().unwrap(),
//!     serde_json::json!({"email": "X@Y.COM"})
//! );
//! ```

pub mod distiller;
pub mod error;
pub mod extract;
pub mod filter;
pub mod flatten;
pub mod gaps;
pub mod pattern;
pub mod validator;

pub use distiller::Distiller;
pub use error::{Error, ValidationError};
pub use extract::{Extractor, ExtractorChain, Request};
pub use filter::{Filter, FilterChain};
pub use flatten::FlatMap;
pub use pattern::{Matcher, MatcherCache, Modifiers};
pub use validator::{Validator, ValidatorChain};
