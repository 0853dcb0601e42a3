//! Dot-path pattern compilation.
//!
//! A pattern addresses nodes in a flattened data tree by their dot-joined
//! path. Shorthand tokens (`[]`, `[uuid]`) expand to brace-delimited regex
//! fragments, `{...}` embeds a raw regular expression fragment, and all
//! remaining text matches literally. `a.b` matches exactly the path `a.b`;
//! `list[].id` matches `list.0.id`, `list.1.id`, and so on.

mod compiler;
mod modifiers;

pub use compiler::{Matcher, MatcherCache, compile};
pub use modifiers::Modifiers;

pub(crate) use compiler::{compile_expanded, is_literal_segment, split_segments};
