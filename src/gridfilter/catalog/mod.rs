//! # Catalogs
//!
//! Static, immutable tables describing what a filter rule can be built from.
//! Nothing in here owns state: every table is a `const` slice and every
//! lookup is a pure function.
//!
//! | Table | Key | Contents |
//! |-------|-----|----------|
//! | [`FIELDS`] | [`Field`] | wire name, label, data type, composite children, micro-unit flag |
//! | [`OPERATORS`] | [`OperatorType`] | internal token, wire token, label |
//! | [`OPERATOR_OVERRIDES`] | field + data type | add / remove / replace rules over the base operator sets |
//! | [`EQUIPMENT_TYPES`] | [`EquipmentType`] | fields offered per equipment type |
//!
//! ## Data types depend on the operator
//!
//! [`resolve_data_type`] is the single place that turns a `(field, operator)`
//! pair into a [`DataType`]. Two pairs override the field's declared type:
//!
//! - `IS_PART_OF` / `IS_NOT_PART_OF` → `FILTER_UUID` for any field
//! - `regulatingTerminal` + `EXISTS` / `NOT_EXISTS` → `STRING`
//!
//! ## Usage
//!
//! ```
//! use gridfilter::catalog::{operators_for, resolve_data_type, DataType, Field, OperatorType};
//!
//! assert_eq!(resolve_data_type("id", Some(OperatorType::IsPartOf)), Some(DataType::FilterUuid));
//! assert!(!operators_for(Field::Id).contains(&OperatorType::Exists));
//! ```

mod data_type;
mod equipment;
mod field;
mod operator;

pub use data_type::{resolve_data_type, DataType};
pub use equipment::{EquipmentType, EQUIPMENT_TYPES};
pub use field::{get_field, is_micro_unit_field, Field, FieldDescriptor, FIELDS};
pub use operator::{
    base_operators, default_operator, operators_for, OperatorDescriptor, OperatorOverride,
    OperatorType, OverrideEffect, OPERATORS, OPERATOR_OVERRIDES, PROPERTY_VALUE_OPERATORS,
};
