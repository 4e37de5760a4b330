//! Template evaluation pipeline
//!
//! Orchestrates one pass over raw document bytes: parse, substitute
//! variables, apply the op list, apply an optional post-op, serialize. The
//! post-op hook is what the single-value get/set entry points build on — a
//! `find` post-op turns the evaluation result into the located value instead
//! of a full document.

use crate::core::node::Node;
use crate::core::ops::{self, Op};
use crate::core::vars::{self, Variables};
use crate::error::Result;

/// Options for one evaluation pass
#[derive(Debug, Clone, Default)]
pub struct EvaluateOpts {
    /// A single op applied after the main op list
    pub post_op: Option<Op>,
    /// Emit a string result raw (plus a trailing newline) instead of
    /// YAML-escaping it, preserving multi-line content verbatim
    pub unescaped_multiline: bool,
}

/// A document held as raw bytes, ready for evaluation
///
/// Each call parses the bytes afresh, so one template can be evaluated many
/// times with different variables and ops.
#[derive(Debug, Clone)]
pub struct Template {
    bytes: Vec<u8>,
}

impl Template {
    /// Create a template from raw document bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Run the full pipeline and serialize the result
    pub fn evaluate(
        &self,
        variables: &Variables,
        op_list: &[Op],
        opts: EvaluateOpts,
    ) -> Result<Vec<u8>> {
        let doc = Node::from_bytes(&self.bytes)?;
        let doc = vars::substitute_variables(&doc, variables)?;
        let mut doc = ops::apply_ops(&doc, op_list)?;

        if let Some(post_op) = &opts.post_op {
            doc = post_op.apply(&doc)?;
        }

        if opts.unescaped_multiline {
            if let Node::String(s) = &doc {
                return Ok(format!("{}\n", s).into_bytes());
            }
        }

        Ok(doc.to_yaml_string()?.into_bytes())
    }
}
