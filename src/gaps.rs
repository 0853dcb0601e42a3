//! Null synthesis for expected-but-missing validated fields.
//!
//! A validator bound to `parent.child` must still run — and see an explicit
//! `null` — when `parent` exists but `child` was never supplied. It must see
//! nothing when `parent` itself is absent: only existing ancestors imply
//! expected-but-missing descendants. Synthesis only happens for patterns
//! whose trailing segment is one concrete field name; a wildcarded tail has
//! no literal identity to manufacture.

use serde_json::Value;

use crate::error::Error;
use crate::flatten::FlatMap;
use crate::pattern::{self, Modifiers};

/// Insert `null` placeholders into `flat` (an ancestors-retaining flat map)
/// for every literal-tailed pattern in `patterns`, in order.
///
/// Patterns are processed against the progressively augmented map, so a
/// placeholder synthesized by an earlier pattern can serve as a parent for a
/// later one.
pub fn fill_gaps(
    mut flat: FlatMap,
    patterns: &[String],
    modifiers: &Modifiers,
) -> Result<FlatMap, Error> {
    for raw_pattern in patterns {
        let expanded = modifiers.expand(raw_pattern);
        let segments = pattern::split_segments(raw_pattern, &expanded)?;
        let Some(tail) = segments.last() else { continue };
        if !pattern::is_literal_segment(tail) {
            continue;
        }

        // A single top-level literal: absent means one null entry.
        if segments.len() == 1 {
            if !flat.contains_key(tail.as_str()) {
                flat.insert(tail.clone(), Value::Null);
            }
            continue;
        }

        let parent_expanded = segments[..segments.len() - 1].join(".");
        let parent = pattern::compile_expanded(raw_pattern, &parent_expanded)?;
        let full = pattern::compile_expanded(raw_pattern, &expanded)?;

        let parent_paths: Vec<String> = flat
            .keys()
            .filter(|path| parent.matches(path))
            .cloned()
            .collect();

        for parent_path in parent_paths {
            let prefix = format!("{parent_path}.");
            let covered = flat
                .keys()
                .any(|path| path.starts_with(&prefix) && full.matches(path));
            if !covered {
                flat.insert(format!("{parent_path}.{tail}"), Value::Null);
            }
        }
    }
    Ok(flat)
}
