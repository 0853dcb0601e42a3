//! Shorthand substitutions applied to a pattern before compilation.

/// The `[]` shorthand: any list index segment.
const LIST_INDEX: &str = "[]";
const LIST_INDEX_EXPANSION: &str = ".{[0-9]*}";

/// The `[uuid]` shorthand: a canonical 8-4-4-4-12 hex uuid segment.
const UUID: &str = "[uuid]";
const UUID_EXPANSION: &str = ".{([a-fA-F0-9]{8}-(?:[a-fA-F0-9]{4}-){3}[a-fA-F0-9]{12})}";

/// Ordered registry of textual shorthand substitutions.
///
/// Expansion is a single left-to-right pass over the pattern text: at each
/// position the first registered token that matches is replaced and the scan
/// resumes after it. Expansion output is never rescanned, so one token's
/// expansion cannot trigger another registration.
pub struct Modifiers {
    entries: Vec<(String, String)>,
}

impl Modifiers {
    /// An empty registry with no shorthands.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// The standard registry: `[]` (list-index wildcard) and `[uuid]`.
    ///
    /// Both expansions start with a `.` so the shorthand addresses a child
    /// segment: `groups[].name` matches `groups.0.name`, and `id[uuid]`
    /// matches `id.<uuid>`.
    pub fn standard() -> Self {
        let mut modifiers = Self::new();
        modifiers.register(LIST_INDEX, LIST_INDEX_EXPANSION);
        modifiers.register(UUID, UUID_EXPANSION);
        modifiers
    }

    /// Register `token` to be replaced by `expansion`. Registration order is
    /// the match-priority order during expansion.
    pub fn register(&mut self, token: &str, expansion: &str) {
        self.entries.push((token.to_string(), expansion.to_string()));
    }

    /// Apply every registered substitution in one pass over `pattern`.
    pub fn expand(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len());
        let mut rest = pattern;
        while let Some(ch) = rest.chars().next() {
            let hit = self
                .entries
                .iter()
                .find(|(token, _)| !token.is_empty() && rest.starts_with(token.as_str()));
            match hit {
                Some((token, expansion)) => {
                    out.push_str(expansion);
                    rest = &rest[token.len()..];
                }
                None => {
                    out.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        out
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_list_index_shorthand() {
        let modifiers = Modifiers::standard();
        assert_eq!(modifiers.expand("list[].id"), "list.{[0-9]*}.id");
    }

    #[test]
    fn expands_uuid_shorthand() {
        let modifiers = Modifiers::standard();
        let expanded = modifiers.expand("id[uuid]");
        assert!(expanded.starts_with("id.{("));
        assert!(expanded.contains("[a-fA-F0-9]{8}"));
    }

    #[test]
    fn expands_repeated_tokens() {
        let modifiers = Modifiers::standard();
        assert_eq!(
            modifiers.expand("a[].b[].c"),
            "a.{[0-9]*}.b.{[0-9]*}.c"
        );
    }

    #[test]
    fn leaves_plain_patterns_alone() {
        let modifiers = Modifiers::standard();
        assert_eq!(modifiers.expand("user.email"), "user.email");
    }

    #[test]
    fn expansion_output_is_not_rescanned() {
        let mut modifiers = Modifiers::new();
        modifiers.register("a", "b");
        modifiers.register("b", "c");
        // The `b` produced by the first rule must not be rewritten to `c`.
        assert_eq!(modifiers.expand("ab"), "bc");
    }

    #[test]
    fn earlier_registrations_win() {
        let mut modifiers = Modifiers::new();
        modifiers.register("ab", "1");
        modifiers.register("a", "2");
        assert_eq!(modifiers.expand("ab"), "1");
    }

    #[test]
    fn empty_registry_is_identity() {
        let modifiers = Modifiers::new();
        assert_eq!(modifiers.expand("a[].b"), "a[].b");
    }
}
