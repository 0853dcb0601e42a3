//! Conversions between nested value trees and flat dot-path maps.
//!
//! Flattening turns a tree into an insertion-ordered mapping from dot-joined
//! path to value; sequence indices become string segments (`list.0`,
//! `list.1`). Unflattening rebuilds a tree of Mappings — index keys stay
//! string-keyed entries, sequences are not reconstructed.

use serde_json::{Map, Value};

/// Insertion-ordered mapping from dot-joined path to value.
pub type FlatMap = Map<String, Value>;

/// Flatten `tree` down to its leaf paths.
///
/// A leaf is a scalar or an empty container; empty containers are kept as
/// values rather than dropped. Non-leaf containers are not emitted, only
/// their descendants.
pub fn flatten_compact(tree: &Map<String, Value>) -> FlatMap {
    let mut out = FlatMap::new();
    for (key, value) in tree {
        flatten_node(key.clone(), value, false, &mut out);
    }
    out
}

/// Flatten `tree`, emitting every node — leaf or not — at its own path, in
/// preorder. Validators use this view so a rule can target an intermediate
/// object itself as well as its children.
pub fn flatten_with_ancestors(tree: &Map<String, Value>) -> FlatMap {
    let mut out = FlatMap::new();
    for (key, value) in tree {
        flatten_node(key.clone(), value, true, &mut out);
    }
    out
}

fn flatten_node(path: String, value: &Value, ancestors: bool, out: &mut FlatMap) {
    let children: Vec<(String, &Value)> = match value {
        Value::Object(map) if !map.is_empty() => {
            map.iter().map(|(k, v)| (k.clone(), v)).collect()
        }
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .enumerate()
            .map(|(index, v)| (index.to_string(), v))
            .collect(),
        _ => {
            out.insert(path, value.clone());
            return;
        }
    };

    if ancestors {
        out.insert(path.clone(), value.clone());
    }
    for (key, child) in children {
        flatten_node(format!("{path}.{key}"), child, ancestors, out);
    }
}

/// Rebuild a nested tree from dot-joined paths.
///
/// Intermediate segments create fresh Mappings on first visit and reuse them
/// afterwards; a non-Mapping value sitting where an intermediate is needed
/// gets replaced. The last value assigned at a given full path wins.
pub fn unflatten(flat: FlatMap) -> Map<String, Value> {
    let mut root = Map::new();
    for (path, value) in flat {
        let mut segments: Vec<String> = path.split('.').map(String::from).collect();
        let Some(leaf) = segments.pop() else { continue };

        let mut cursor = &mut root;
        for segment in segments {
            let slot = cursor
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            match slot {
                Value::Object(next) => cursor = next,
                _ => unreachable!("intermediate slot was just made a mapping"),
            }
        }
        cursor.insert(leaf, value);
    }
    root
}
