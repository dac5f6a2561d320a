//! # Rule Engine
//!
//! Pure, synchronous operations over filter trees. Nothing in here touches a
//! store or the filesystem; every function takes a tree by reference and
//! returns a new value.
//!
//! | Operation | Module | Input → Output |
//! |-----------|--------|----------------|
//! | [`export_tree`] | `export` | editable [`GroupNode`](crate::model::GroupNode) → [`WireGroup`](crate::wire::WireGroup) |
//! | [`import_tree`] | `import` | [`WireGroup`](crate::wire::WireGroup) → editable tree |
//! | [`validate`] | `validate` | editable tree → per-node [`ValidationMap`] |
//! | [`remove_node`] | `remove` | editable tree + path → editable tree |
//! | [`count_rules`] | `count` | editable tree → number of leaf rules |
//!
//! ## Round trip
//!
//! For a well-formed tree whose multi-values are already sorted,
//! `import_tree(&export_tree(&t))` is structurally equal to `t`
//! (see [`GroupNode::structurally_eq`](crate::model::GroupNode::structurally_eq)).
//! Micro-unit fields go through [`micro_unit_to_unit`] on export and
//! [`unit_to_micro_unit`] on import.

mod count;
mod export;
mod import;
mod remove;
mod units;
mod validate;

pub use count::count_rules;
pub use export::export_tree;
pub use import::import_tree;
pub use remove::remove_node;
pub use units::{micro_unit_to_unit, unit_to_micro_unit};
pub use validate::{
    has_reason, test_query, validate, violations, NodeValidation, QueryValidity, ReasonCode,
    ValidationMap, REASON_CODES,
};
