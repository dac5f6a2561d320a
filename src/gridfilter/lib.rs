//! # GridFilter Architecture
//!
//! GridFilter is a **UI-agnostic expert-filter engine** for power-grid
//! equipment: it models a user-built boolean filter expression, converts it
//! between an editable tree and a persisted wire format, validates it,
//! removes nodes without leaving empty groups behind, and counts rules. It
//! never evaluates a filter against equipment data.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (selectors, node paths)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - create, update, get, list, delete, remove_rule, check,   │
//! │    fields, config                                           │
//! │  - Refuses to persist a tree that fails validation          │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                            │
//!                  ▼                            ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────┐
//! │  Rule Engine (rules/)        │  │  Storage Layer (store/)  │
//! │  export, import, validate,   │  │  FilterStore trait       │
//! │  remove, count               │  │  FileStore, InMemoryStore│
//! └──────────────────────────────┘  └──────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Catalogs (catalog/) + trees (model.rs, wire.rs)            │
//! │  - Static field / operator / equipment tables               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Editing loop
//!
//! A UI owns the editable [`model::GroupNode`]. After every edit it calls
//! [`rules::validate`] again and gates its save action on
//! [`rules::QueryValidity::is_savable`]. On submit, [`rules::export_tree`]
//! produces the [`wire::WireGroup`] handed to a store; on load,
//! [`rules::import_tree`] turns a stored wire tree back into editable state.
//!
//! ```
//! use gridfilter::catalog::OperatorType;
//! use gridfilter::model::{Combinator, GroupNode, RuleNode, RuleValue};
//! use gridfilter::rules::{count_rules, export_tree, import_tree, QueryValidity};
//!
//! let tree = GroupNode::new(Combinator::And).with_rule(RuleNode::new(
//!     "nominalVoltage",
//!     Some(OperatorType::Between),
//!     RuleValue::multi([63.0, 225.0]),
//! ));
//! assert!(QueryValidity::of(&tree).is_savable());
//! assert_eq!(count_rules(&tree), 1);
//!
//! let wire = export_tree(&tree);
//! assert!(import_tree(&wire).structurally_eq(&tree));
//! ```
//!
//! ## Module Overview
//!
//! - [`catalog`]: fields, operators, data types, equipment types
//! - [`model`]: editable tree and persisted filter records
//! - [`wire`]: persisted tree shape
//! - [`rules`]: export, import, validation, removal, counting
//! - [`store`]: storage abstraction and implementations
//! - [`commands`]: business operations
//! - [`api`]: the API facade
//! - [`config`]: configuration management
//! - [`error`]: error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod rules;
pub mod store;
pub mod wire;
