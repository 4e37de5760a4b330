//! Core document value model
//!
//! This module provides the generic in-memory representation of a parsed
//! manifest: a tagged value that is either a scalar, a sequence, or an
//! order-preserving mapping. Every mutating operation in the engine rebuilds
//! the affected spine and returns a new tree, so a parsed document can be
//! evaluated any number of times without cross-call interference.

use crate::error::{OpsmithError, Result};
use serde_yaml::Value;

/// One value in a document tree
///
/// Mappings are kept as an ordered list of `(key, value)` pairs: insertion
/// order is observable in serialized output and must survive edits.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(String, Node)>),
}

impl Node {
    /// Create a null node
    pub fn null() -> Self {
        Self::Null
    }

    /// Create a boolean node
    pub fn bool(b: bool) -> Self {
        Self::Bool(b)
    }

    /// Create an integer node
    pub fn int(i: i64) -> Self {
        Self::Number(i.into())
    }

    /// Create a float node
    pub fn float(f: f64) -> Self {
        Self::Number(serde_yaml::Number::from(f))
    }

    /// Create a string node
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Create a sequence node
    pub fn sequence(items: Vec<Node>) -> Self {
        Self::Sequence(items)
    }

    /// Create a mapping node from ordered entries
    pub fn mapping(entries: Vec<(String, Node)>) -> Self {
        Self::Mapping(entries)
    }

    /// Check if this node is a scalar (not a sequence or mapping)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    /// Check if this node is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to view this node as a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view this node as a sequence
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Try to view this node as mapping entries
    pub fn as_mapping(&self) -> Option<&[(String, Node)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping entry by key
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// The kind of this node, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Parse a document from raw YAML bytes
    ///
    /// Empty (or blank) input parses to a null document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::Null);
        }
        let value: Value =
            serde_yaml::from_slice(bytes).map_err(|e| OpsmithError::parse("document", e))?;
        Self::try_from(value)
    }

    /// Render this node back to canonical YAML text
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(&self.to_yaml()).map_err(OpsmithError::Serialization)
    }

    /// Convert to the serde_yaml value representation
    pub fn to_yaml(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Sequence(items) => Value::Sequence(items.iter().map(Node::to_yaml).collect()),
            Self::Mapping(entries) => {
                let mut map = serde_yaml::Mapping::new();
                for (k, v) in entries {
                    map.insert(Value::String(k.clone()), v.to_yaml());
                }
                Value::Mapping(map)
            }
        }
    }
}

impl TryFrom<Value> for Node {
    type Error = OpsmithError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::String(s)),
            Value::Sequence(seq) => {
                let items = seq.into_iter().map(Node::try_from).collect::<Result<_>>()?;
                Ok(Self::Sequence(items))
            }
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    let key = match k {
                        Value::String(s) => s,
                        other => {
                            return Err(OpsmithError::invalid_document(format!(
                                "mapping key {:?} is not a string",
                                other
                            )))
                        }
                    };
                    entries.push((key, Node::try_from(v)?));
                }
                Ok(Self::Mapping(entries))
            }
            Value::Tagged(tagged) => Node::try_from(tagged.value),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.to_yaml()
    }
}
