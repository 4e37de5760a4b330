//! Variable tables and placeholder substitution
//!
//! A scalar whose entire content is a `((name))` marker is replaced by the
//! variable's value, whatever its shape — a placeholder can expand to a full
//! nested mapping. Names missing from the table are left untouched, and so
//! are markers embedded inside longer strings.

use crate::core::node::Node;
use crate::error::Result;
use regex::Regex;
use std::collections::HashMap;

/// A scalar is a placeholder only when the whole value is one marker.
const PLACEHOLDER_PATTERN: &str = r"^\(\(([-/\.\w]+)\)\)$";

/// An in-memory name → value table for one evaluation
#[derive(Debug, Clone, Default)]
pub struct Variables {
    entries: HashMap<String, Node>,
}

impl Variables {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a variable
    pub fn insert(&mut self, name: impl Into<String>, value: Node) {
        self.entries.insert(name.into(), value);
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, Node>> for Variables {
    fn from(entries: HashMap<String, Node>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, Node)> for Variables {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Replace placeholder scalars throughout the tree using `vars`
///
/// Substitutions are independent, so traversal order does not matter. Mapping
/// keys are never substituted.
pub fn substitute_variables(root: &Node, vars: &Variables) -> Result<Node> {
    let marker = Regex::new(PLACEHOLDER_PATTERN)?;
    Ok(substitute(root, vars, &marker))
}

fn substitute(node: &Node, vars: &Variables, marker: &Regex) -> Node {
    match node {
        Node::String(s) => {
            if let Some(captures) = marker.captures(s) {
                if let Some(value) = vars.get(&captures[1]) {
                    return value.clone();
                }
            }
            node.clone()
        }
        Node::Sequence(items) => {
            Node::Sequence(items.iter().map(|item| substitute(item, vars, marker)).collect())
        }
        Node::Mapping(entries) => Node::Mapping(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), substitute(v, vars, marker)))
                .collect(),
        ),
        other => other.clone(),
    }
}
