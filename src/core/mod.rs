pub mod node;
pub mod ops;
pub mod pointer;
pub mod template;
pub mod vars;
pub mod walker;

pub use node::Node;
pub use ops::{apply_ops, ops_from_bytes, ops_from_definitions, Op, OpDefinition};
pub use pointer::{Pointer, Token};
pub use template::{EvaluateOpts, Template};
pub use vars::{substitute_variables, Variables};
