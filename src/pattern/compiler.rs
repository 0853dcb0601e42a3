//! Compiles path patterns into anchored regular expressions.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use regex::Regex;

use super::Modifiers;
use crate::error::Error;

/// A compiled pattern: an anchored matching predicate over dot-joined paths.
///
/// Immutable once built; a pure function of the registry and the pattern
/// text, so matchers are safe to cache and reuse.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    /// Whether the full candidate path satisfies the pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The underlying anchored regular expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Compile `pattern` into a [`Matcher`].
///
/// Shorthands are expanded first, then every balanced `{...}` fragment is
/// swapped for a sentinel, the remaining text is escaped as a literal match,
/// the fragments are restored raw, and the result is anchored at both ends.
/// A pattern with no braces therefore matches only its exact literal path.
pub fn compile(pattern: &str, modifiers: &Modifiers) -> Result<Matcher, Error> {
    compile_expanded(pattern, &modifiers.expand(pattern))
}

/// Compile pattern text that has already been through modifier expansion.
/// `original` is only used for error reporting.
pub(crate) fn compile_expanded(original: &str, expanded: &str) -> Result<Matcher, Error> {
    let (template, fragments) = extract_fragments(original, expanded)?;
    let mut body = regex::escape(&template);
    for (index, fragment) in fragments.iter().enumerate() {
        body = body.replacen(&sentinel(index), fragment, 1);
    }
    let anchored = format!("^{body}$");
    let regex = Regex::new(&anchored).map_err(|source| Error::Pattern {
        pattern: original.to_string(),
        reason: source.to_string(),
    })?;
    Ok(Matcher { regex })
}

/// Sentinel standing in for fragment `index` while the template is escaped.
/// NUL never appears in patterns and survives `regex::escape` untouched.
fn sentinel(index: usize) -> String {
    format!("\u{0}{index}\u{0}")
}

/// Replace each balanced top-level `{...}` region with a sentinel, returning
/// the templated text plus the raw fragment contents in order of appearance.
fn extract_fragments(original: &str, expanded: &str) -> Result<(String, Vec<String>), Error> {
    let mut template = String::with_capacity(expanded.len());
    let mut fragments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in expanded.chars() {
        match ch {
            '{' => {
                if depth > 0 {
                    current.push(ch);
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(unbalanced(original));
                }
                depth -= 1;
                if depth == 0 {
                    template.push_str(&sentinel(fragments.len()));
                    fragments.push(std::mem::take(&mut current));
                } else {
                    current.push(ch);
                }
            }
            _ if depth > 0 => current.push(ch),
            _ => template.push(ch),
        }
    }

    if depth != 0 {
        return Err(unbalanced(original));
    }
    Ok((template, fragments))
}

/// Split expanded pattern text on structural dots, ignoring dots inside
/// brace fragments.
pub(crate) fn split_segments(original: &str, expanded: &str) -> Result<Vec<String>, Error> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in expanded.chars() {
        match ch {
            '{' => {
                depth += 1;
                current.push(ch);
            }
            '}' => {
                if depth == 0 {
                    return Err(unbalanced(original));
                }
                depth -= 1;
                current.push(ch);
            }
            '.' if depth == 0 => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    if depth != 0 {
        return Err(unbalanced(original));
    }
    segments.push(current);
    Ok(segments)
}

/// Whether a segment resolves to one concrete field name: no fragment and
/// nothing a literal escape would have to neutralize.
pub(crate) fn is_literal_segment(segment: &str) -> bool {
    !segment.contains('{') && regex::escape(segment) == segment
}

fn unbalanced(pattern: &str) -> Error {
    Error::Pattern {
        pattern: pattern.to_string(),
        reason: "unbalanced braces".to_string(),
    }
}

/// Memoizes compiled matchers keyed by the original pattern string.
///
/// Compilation is deterministic and side-effect free, so entries stay valid
/// for as long as the modifier registry they were compiled with.
#[derive(Default)]
pub struct MatcherCache {
    matchers: HashMap<String, Matcher>,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self {
            matchers: HashMap::new(),
        }
    }

    /// Fetch the matcher for `pattern`, compiling it on first use.
    pub fn matcher(&mut self, pattern: &str, modifiers: &Modifiers) -> Result<&Matcher, Error> {
        match self.matchers.entry(pattern.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let matcher = compile(entry.key(), modifiers)?;
                Ok(entry.insert(matcher))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(pattern: &str) -> Matcher {
        compile(pattern, &Modifiers::standard()).unwrap()
    }

    #[test]
    fn literal_pattern_matches_exactly() {
        let m = matcher("a.b");
        assert!(m.matches("a.b"));
        assert!(!m.matches("a.bc"));
        assert!(!m.matches("a.b.c"));
        assert!(!m.matches("xa.b"));
        // The dot is structural, not "any character".
        assert!(!m.matches("aXb"));
    }

    #[test]
    fn single_segment_literal() {
        let m = matcher("email");
        assert!(m.matches("email"));
        assert!(!m.matches("email2"));
        assert!(!m.matches("user.email"));
    }

    #[test]
    fn metacharacters_in_literals_are_neutralized() {
        let m = matcher("price($)");
        assert!(m.matches("price($)"));
        assert!(!m.matches("price(x)"));
    }

    #[test]
    fn list_index_shorthand() {
        let m = matcher("list[].id");
        assert!(m.matches("list.0.id"));
        assert!(m.matches("list.42.id"));
        assert!(!m.matches("list.id"));
        assert!(!m.matches("list.a.id"));
    }

    #[test]
    fn uuid_shorthand() {
        let m = matcher("id[uuid]");
        assert!(m.matches("id.123e4567-e89b-12d3-a456-426614174000"));
        assert!(m.matches("id.123E4567-E89B-12D3-A456-426614174000"));
        assert!(!m.matches("id.not-a-uuid"));
        assert!(!m.matches("id.123e4567"));
        assert!(!m.matches("id"));
    }

    #[test]
    fn raw_fragment_passes_through() {
        let m = matcher("user.{[a-z]+}");
        assert!(m.matches("user.abc"));
        assert!(!m.matches("user.ABC"));
        assert!(!m.matches("user."));
    }

    #[test]
    fn multiple_fragments_restore_in_order() {
        let m = matcher("a.{[0-9]+}.b.{[a-z]+}");
        assert!(m.matches("a.1.b.x"));
        assert!(!m.matches("a.x.b.1"));
    }

    #[test]
    fn nested_braces_stay_inside_one_fragment() {
        let m = matcher("code.{[0-9]{4}}");
        assert!(m.matches("code.1234"));
        assert!(!m.matches("code.123"));
    }

    #[test]
    fn unbalanced_braces_error() {
        let modifiers = Modifiers::standard();
        assert!(matches!(
            compile("a.{", &modifiers),
            Err(Error::Pattern { .. })
        ));
        assert!(matches!(
            compile("a.}b", &modifiers),
            Err(Error::Pattern { .. })
        ));
    }

    #[test]
    fn invalid_fragment_regex_error() {
        let modifiers = Modifiers::standard();
        assert!(matches!(
            compile("a.{[}", &modifiers),
            Err(Error::Pattern { .. })
        ));
    }

    #[test]
    fn split_segments_respects_fragments() {
        let segments = split_segments("x", "groups.{[0-9]*}.email").unwrap();
        assert_eq!(segments, vec!["groups", "{[0-9]*}", "email"]);
    }

    #[test]
    fn split_segments_single() {
        assert_eq!(split_segments("x", "email").unwrap(), vec!["email"]);
    }

    #[test]
    fn literal_segment_detection() {
        assert!(is_literal_segment("email"));
        assert!(is_literal_segment("email_address"));
        assert!(!is_literal_segment("{[0-9]{4}}"));
        assert!(!is_literal_segment("em*il"));
    }

    #[test]
    fn cache_compiles_once_and_reuses() {
        let modifiers = Modifiers::standard();
        let mut cache = MatcherCache::new();
        let first = cache.matcher("a.b", &modifiers).unwrap().as_str().to_string();
        let second = cache.matcher("a.b", &modifiers).unwrap().as_str().to_string();
        assert_eq!(first, second);
        assert!(cache.matcher("a.{", &modifiers).is_err());
    }
}
