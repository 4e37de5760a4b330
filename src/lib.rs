//! opsmith: A library for templating and patching YAML deployment manifests
//!
//! This library evaluates hierarchical configuration manifests in three
//! composable ways: substituting `((name))` placeholder variables, applying
//! an ordered list of declarative ops (replace / remove / find), and reading
//! or writing a single value addressed by a `/`-separated path. It's designed
//! to be both a standalone library and the foundation for CLI tools.
//!
//! # Features
//!
//! - **Order-preserving document model** — mapping key order survives every
//!   edit and round-trips to output
//! - **Path pointer language** with key, index, append-marker, and
//!   `field=value` matching segments
//! - **Immutable evaluation** — every call is a pure function of its inputs,
//!   safe to repeat and to run concurrently
//! - **Typed errors** with the failing op's index and path for diagnostics
//!
//! # Quick Start
//!
//! ## Reading a value by path
//!
//! ```rust
//! use opsmith::Result;
//!
//! fn main() -> Result<()> {
//!     let manifest = b"jobs:\n- name: redis\n  port: 6379\n";
//!     let port = opsmith::get_path(manifest, "/jobs/name=redis/port")?;
//!     assert_eq!(port, "6379");
//!     Ok(())
//! }
//! ```
//!
//! ## Writing a value by path
//!
//! ```rust
//! use opsmith::{Node, Result};
//!
//! fn main() -> Result<()> {
//!     let manifest = b"name: old\n";
//!     let updated = opsmith::set_path(manifest, "/name", Node::string("new"))?;
//!     assert_eq!(updated, b"name: new\n");
//!     Ok(())
//! }
//! ```
//!
//! ## Full interpolation
//!
//! ```rust
//! use opsmith::{Node, Result, Variables};
//!
//! fn main() -> Result<()> {
//!     let manifest = b"name: ((deployment_name))\ninstances: 1\n";
//!     let ops = b"- type: replace\n  path: /instances\n  value: 3\n";
//!
//!     let mut variables = Variables::new();
//!     variables.insert("deployment_name", Node::string("redis-deployment"));
//!
//!     let updated = opsmith::interpolate(manifest, ops, &variables)?;
//!     assert_eq!(updated, b"name: redis-deployment\ninstances: 3\n");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`core`]: the engine — document model, pointer language, tree walker,
//!   op interpreter, variable resolver, and template evaluator
//! - [`manifest`]: the deployment-field sync routine built on the engine
//! - [`io`]: file read / atomic write helpers for CLI consumers
//! - [`error`]: one typed error enum covering every failure kind

// Public API exports
pub use error::{OpsmithError, Result};

// Core types
pub use crate::core::{
    apply_ops, ops_from_bytes, ops_from_definitions, substitute_variables, EvaluateOpts, Node, Op,
    OpDefinition, Pointer, Template, Token, Variables,
};

// Manifest sync types
pub use manifest::{
    update_from_service_deployment, ReleaseSpec, ServiceDeployment, StemcellSpec,
};

// Internal modules
pub mod core;
pub mod error;
pub mod io;
pub mod manifest;

// CLI components are available only in the binary, not as part of the library API

/// Get the textual form of the value at `path`
///
/// Multi-line string content comes back verbatim; surrounding blank lines are
/// trimmed. Fails when the path does not resolve.
pub fn get_path(manifest: &[u8], path: &str) -> Result<String> {
    let pointer = Pointer::parse(path)?;

    let evaluated = Template::new(manifest).evaluate(
        &Variables::new(),
        &[],
        EvaluateOpts {
            post_op: Some(Op::Find { path: pointer }),
            unescaped_multiline: true,
        },
    )?;

    Ok(String::from_utf8_lossy(&evaluated).trim().to_string())
}

/// Return the full document with `value` substituted at `path`
///
/// Missing intermediate keys are created as empty mappings; the `-` append
/// marker inserts after the last element of the addressed sequence.
pub fn set_path(manifest: &[u8], path: &str, value: Node) -> Result<Vec<u8>> {
    let pointer = Pointer::parse(path)?;

    Template::new(manifest).evaluate(
        &Variables::new(),
        &[],
        EvaluateOpts {
            post_op: Some(Op::Replace {
                path: pointer,
                value,
            }),
            unescaped_multiline: true,
        },
    )
}

/// Run the full pipeline: substitute `variables`, then apply the ops decoded
/// from `ops` in order
pub fn interpolate(manifest: &[u8], ops: &[u8], variables: &Variables) -> Result<Vec<u8>> {
    let op_list = ops_from_bytes(ops)?;

    Template::new(manifest).evaluate(variables, &op_list, EvaluateOpts::default())
}
