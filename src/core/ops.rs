//! Declarative ops: decoding and ordered application
//!
//! An ops file is a YAML list of `{type, path, value?}` records. Definitions
//! are validated and compiled into [`Op`] values up front, then applied
//! strictly in list order, each against the result of the previous one. The
//! first failure aborts the rest and is tagged with the op's 0-based index
//! and declared path.

use crate::core::node::Node;
use crate::core::pointer::Pointer;
use crate::core::walker;
use crate::error::{OpsmithError, Result};
use serde::Deserialize;

/// One declarative edit as it appears in an ops file
#[derive(Debug, Clone, Deserialize)]
pub struct OpDefinition {
    #[serde(rename = "type")]
    pub type_: String,
    pub path: String,
    #[serde(default)]
    pub value: Option<serde_yaml::Value>,
}

/// A decoded, ready-to-apply edit
#[derive(Debug, Clone)]
pub enum Op {
    /// Substitute `value` at the addressed position, creating intermediate
    /// mappings and honoring the append marker
    Replace { path: Pointer, value: Node },
    /// Delete the addressed mapping entry or sequence element
    Remove { path: Pointer },
    /// Yield the addressed node as the working result, without mutation
    Find { path: Pointer },
}

impl Op {
    /// The path this op addresses
    pub fn path(&self) -> &Pointer {
        match self {
            Self::Replace { path, .. } | Self::Remove { path } | Self::Find { path } => path,
        }
    }

    /// Apply this op to `doc`, returning the new working document
    pub fn apply(&self, doc: &Node) -> Result<Node> {
        match self {
            Self::Replace { path, value } => walker::replace(doc, path, value.clone()),
            Self::Remove { path } => walker::remove(doc, path),
            Self::Find { path } => walker::find(doc, path).cloned(),
        }
    }
}

/// Decode an ops list from raw YAML bytes
///
/// Blank input decodes to an empty list, so callers can pass an absent ops
/// file straight through.
pub fn ops_from_bytes(bytes: &[u8]) -> Result<Vec<Op>> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Vec::new());
    }
    let definitions: Vec<OpDefinition> =
        serde_yaml::from_slice(bytes).map_err(|e| OpsmithError::parse("ops", e))?;
    ops_from_definitions(definitions)
}

/// Validate op definitions and compile their paths
pub fn ops_from_definitions(definitions: Vec<OpDefinition>) -> Result<Vec<Op>> {
    let mut ops = Vec::with_capacity(definitions.len());

    for (index, definition) in definitions.into_iter().enumerate() {
        let path = Pointer::parse(&definition.path)
            .map_err(|e| OpsmithError::invalid_op(index, e.to_string()))?;

        let op = match definition.type_.as_str() {
            "replace" => {
                let value = definition.value.ok_or_else(|| {
                    OpsmithError::invalid_op(index, "replace operation requires a value")
                })?;
                let value = Node::try_from(value)
                    .map_err(|e| OpsmithError::invalid_op(index, e.to_string()))?;
                Op::Replace { path, value }
            }
            "remove" => {
                if definition.value.is_some() {
                    return Err(OpsmithError::invalid_op(
                        index,
                        "cannot specify a value for a remove operation",
                    ));
                }
                Op::Remove { path }
            }
            "find" => {
                if definition.value.is_some() {
                    return Err(OpsmithError::invalid_op(
                        index,
                        "cannot specify a value for a find operation",
                    ));
                }
                Op::Find { path }
            }
            other => {
                return Err(OpsmithError::invalid_op(
                    index,
                    format!("unknown type {:?}", other),
                ));
            }
        };

        ops.push(op);
    }

    Ok(ops)
}

/// Apply ops in order, folding each result into the next application
pub fn apply_ops(root: &Node, ops: &[Op]) -> Result<Node> {
    let mut doc = root.clone();
    for (index, op) in ops.iter().enumerate() {
        doc = op
            .apply(&doc)
            .map_err(|e| OpsmithError::op_application(index, op.path().to_string(), e))?;
    }
    Ok(doc)
}
