//! Wire (persisted) form of a filter tree.
//!
//! The persisted JSON mirrors the editable tree but tags every node with its
//! resolved `dataType` and uses wire operator tokens. Three node shapes share
//! one JSON object layout:
//!
//! | Shape | `rules` | `field` + `operator` |
//! |-------|---------|----------------------|
//! | plain boolean group | present | absent |
//! | composite group-rule | present | present |
//! | ordinary rule | absent | present |
//!
//! That shape test happens exactly once, when a [`RawWireNode`] is turned into
//! a [`WireNode`] at the serde boundary. Everything past deserialization
//! dispatches on the tagged variant.
//!
//! ```json
//! { "combinator": "AND", "dataType": "COMBINATOR",
//!   "rules": [
//!     { "field": "nominalVoltage", "operator": "EQUALS", "dataType": "NUMBER", "value": 225 },
//!     { "field": "regulatingTerminal", "operator": "IS", "dataType": "COMBINATOR",
//!       "combinator": "AND",
//!       "rules": [ { "field": "side", "operator": "EQUALS", "dataType": "ENUM", "value": "ONE" } ] }
//!   ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::DataType;
use crate::model::{Combinator, Scalar};

fn combinator_data_type() -> DataType {
    DataType::Combinator
}

/// A boolean group; also the root of every exported filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGroup {
    pub combinator: Combinator,
    #[serde(default = "combinator_data_type")]
    pub data_type: DataType,
    #[serde(default)]
    pub rules: Vec<WireNode>,
}

impl WireGroup {
    pub fn new(combinator: Combinator, rules: Vec<WireNode>) -> Self {
        Self {
            combinator,
            data_type: DataType::Combinator,
            rules,
        }
    }
}

/// A composite rule: its own attribute and operator plus its sub-rules.
///
/// The operator is always written out, empty when the rule has none, so the
/// node keeps its composite shape when read back.
#[derive(Debug, Clone, PartialEq)]
pub struct WireComposite {
    pub field: String,
    pub operator: String,
    pub combinator: Combinator,
    pub rules: Vec<WireRule>,
}

/// An ordinary leaf rule.
///
/// Every attribute is optional: export of a malformed rule leaves the missing
/// parts out, and import must survive whatever a store hands back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Scalar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWireNode", into = "RawWireNode")]
pub enum WireNode {
    Group(WireGroup),
    Composite(WireComposite),
    Rule(WireRule),
}

/// Untyped JSON layout shared by all wire nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWireNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combinator: Option<Combinator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Scalar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RawWireNode>>,
}

impl From<RawWireNode> for WireRule {
    fn from(raw: RawWireNode) -> Self {
        WireRule {
            field: raw.field,
            operator: raw.operator,
            data_type: raw.data_type,
            value: raw.value,
            values: raw.values,
            property_name: raw.property_name,
            property_values: raw.property_values,
        }
    }
}

impl From<RawWireNode> for WireNode {
    fn from(raw: RawWireNode) -> Self {
        let combinator = raw.combinator.unwrap_or(Combinator::And);
        match (raw.rules, raw.field, raw.operator) {
            (Some(rules), Some(field), Some(operator)) => WireNode::Composite(WireComposite {
                field,
                operator,
                combinator,
                rules: rules.into_iter().map(WireRule::from).collect(),
            }),
            (Some(rules), _, _) => WireNode::Group(WireGroup {
                combinator,
                data_type: raw.data_type.unwrap_or(DataType::Combinator),
                rules: rules.into_iter().map(WireNode::from).collect(),
            }),
            (None, field, operator) => WireNode::Rule(WireRule {
                field,
                operator,
                data_type: raw.data_type,
                value: raw.value,
                values: raw.values,
                property_name: raw.property_name,
                property_values: raw.property_values,
            }),
        }
    }
}

impl From<WireRule> for RawWireNode {
    fn from(rule: WireRule) -> Self {
        RawWireNode {
            field: rule.field,
            operator: rule.operator,
            data_type: rule.data_type,
            value: rule.value,
            values: rule.values,
            property_name: rule.property_name,
            property_values: rule.property_values,
            ..Default::default()
        }
    }
}

impl From<WireNode> for RawWireNode {
    fn from(node: WireNode) -> Self {
        match node {
            WireNode::Group(group) => RawWireNode {
                combinator: Some(group.combinator),
                data_type: Some(group.data_type),
                rules: Some(group.rules.into_iter().map(RawWireNode::from).collect()),
                ..Default::default()
            },
            WireNode::Composite(composite) => RawWireNode {
                combinator: Some(composite.combinator),
                field: Some(composite.field),
                operator: Some(composite.operator),
                data_type: Some(DataType::Combinator),
                rules: Some(composite.rules.into_iter().map(RawWireNode::from).collect()),
                ..Default::default()
            },
            WireNode::Rule(rule) => RawWireNode::from(rule),
        }
    }
}
