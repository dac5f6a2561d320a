//! Editable filter tree and persisted filter records.
//!
//! The editable tree is what the form layer renders and mutates. Its root is
//! always a [`GroupNode`]; every other node is a [`RuleTreeNode`], an explicit
//! tagged variant (`group`, `composite` or `rule`) fixed when the node is
//! created, so nothing downstream has to guess a node's kind from its shape.
//!
//! ## Paths
//!
//! Nodes are addressed positionally from the root. The root's path is `[0]`;
//! the `i`-th child of the root is `[0, i]`, its `j`-th child `[0, i, j]`, and
//! so on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::catalog::{resolve_data_type, DataType, EquipmentType, OperatorType};
use crate::error::{FilterError, Result};
use crate::wire::WireGroup;

pub type NodeId = Uuid;

/// Path of the root group.
pub const ROOT_PATH: &[usize] = &[0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl std::fmt::Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combinator::And => f.write_str("AND"),
            Combinator::Or => f.write_str("OR"),
        }
    }
}

/// A single value as typed by the user or read from the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn text(s: impl Into<String>) -> Self {
        Scalar::Text(s.into())
    }

    /// Numeric reading of the value; text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }

    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

// Whole numbers go out as JSON integers (`225`, not `225.0`).
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(*n as i64)
            }
            Scalar::Number(n) => serializer.serialize_f64(*n),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// Structured value of a PROPERTY rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyValue {
    #[serde(default)]
    pub property_name: String,
    #[serde(default)]
    pub property_operator: Option<OperatorType>,
    #[serde(default)]
    pub property_values: Vec<String>,
}

/// Value held by a leaf rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    #[default]
    Empty,
    Single(Scalar),
    Multi(Vec<Scalar>),
    Property(PropertyValue),
}

impl RuleValue {
    pub fn single(value: impl Into<Scalar>) -> Self {
        RuleValue::Single(value.into())
    }

    pub fn multi<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Self {
        RuleValue::Multi(values.into_iter().map(Into::into).collect())
    }

    pub fn as_multi(&self) -> Option<&[Scalar]> {
        match self {
            RuleValue::Multi(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyValue> {
        match self {
            RuleValue::Property(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleNode {
    pub id: NodeId,
    pub field: String,
    pub operator: Option<OperatorType>,
    #[serde(default)]
    pub value: RuleValue,
}

impl RuleNode {
    pub fn new(field: impl Into<String>, operator: Option<OperatorType>, value: RuleValue) -> Self {
        Self {
            id: Uuid::new_v4(),
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn data_type(&self) -> Option<DataType> {
        resolve_data_type(&self.field, self.operator)
    }
}

/// Operator and value configured for one sub-field of a composite rule.
///
/// Composites do not nest: a sub-field holds a plain [`RuleValue`], so a
/// COMBINATOR-typed sub-field can never be configured and always validates
/// as an incomplete rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRule {
    pub operator: Option<OperatorType>,
    #[serde(default)]
    pub value: RuleValue,
}

/// In-memory shape of a composite rule: its intra-combinator and the
/// configured sub-fields, keyed by sub-field wire name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeValue {
    pub combinator: Combinator,
    #[serde(default)]
    pub rules: BTreeMap<String, SubRule>,
}

impl Default for CompositeValue {
    fn default() -> Self {
        Self {
            combinator: Combinator::And,
            rules: BTreeMap::new(),
        }
    }
}

/// A single logical rule over a compound attribute (e.g. `regulatingTerminal`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub id: NodeId,
    pub field: String,
    pub operator: Option<OperatorType>,
    #[serde(default)]
    pub value: CompositeValue,
}

impl CompositeRule {
    pub fn new(field: impl Into<String>, operator: Option<OperatorType>) -> Self {
        Self {
            id: Uuid::new_v4(),
            field: field.into(),
            operator,
            value: CompositeValue::default(),
        }
    }

    pub fn with_combinator(mut self, combinator: Combinator) -> Self {
        self.value.combinator = combinator;
        self
    }

    pub fn with_sub_rule(
        mut self,
        sub_field: impl Into<String>,
        operator: Option<OperatorType>,
        value: RuleValue,
    ) -> Self {
        self.value
            .rules
            .insert(sub_field.into(), SubRule { operator, value });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: NodeId,
    pub combinator: Combinator,
    #[serde(default)]
    pub rules: Vec<RuleTreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleTreeNode {
    Group(GroupNode),
    Composite(CompositeRule),
    Rule(RuleNode),
}

impl RuleTreeNode {
    /// Build a leaf for `field`, choosing the composite variant when the
    /// resolved data type is COMBINATOR. A composite starts with no sub-rule
    /// configured and `value` is dropped.
    pub fn rule(field: &str, operator: Option<OperatorType>, value: RuleValue) -> Self {
        match resolve_data_type(field, operator) {
            Some(DataType::Combinator) => {
                RuleTreeNode::Composite(CompositeRule::new(field, operator))
            }
            _ => RuleTreeNode::Rule(RuleNode::new(field, operator, value)),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            RuleTreeNode::Group(g) => g.id,
            RuleTreeNode::Composite(c) => c.id,
            RuleTreeNode::Rule(r) => r.id,
        }
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            RuleTreeNode::Group(g) => Some(g),
            _ => None,
        }
    }

    fn clear_ids(&mut self) {
        match self {
            RuleTreeNode::Group(g) => g.clear_ids(),
            RuleTreeNode::Composite(c) => c.id = Uuid::nil(),
            RuleTreeNode::Rule(r) => r.id = Uuid::nil(),
        }
    }
}

impl From<GroupNode> for RuleTreeNode {
    fn from(group: GroupNode) -> Self {
        RuleTreeNode::Group(group)
    }
}

impl From<RuleNode> for RuleTreeNode {
    fn from(rule: RuleNode) -> Self {
        RuleTreeNode::Rule(rule)
    }
}

impl From<CompositeRule> for RuleTreeNode {
    fn from(rule: CompositeRule) -> Self {
        RuleTreeNode::Composite(rule)
    }
}

impl GroupNode {
    pub fn new(combinator: Combinator) -> Self {
        Self {
            id: Uuid::new_v4(),
            combinator,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, node: impl Into<RuleTreeNode>) -> Self {
        self.rules.push(node.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The group addressed by `path`, if `path` leads to a group.
    pub fn group_at(&self, path: &[usize]) -> Option<&GroupNode> {
        let (&root, rest) = path.split_first()?;
        if root != 0 {
            return None;
        }
        let mut group = self;
        for &index in rest {
            group = group.rules.get(index)?.as_group()?;
        }
        Some(group)
    }

    pub fn group_at_mut(&mut self, path: &[usize]) -> Option<&mut GroupNode> {
        let (&root, rest) = path.split_first()?;
        if root != 0 {
            return None;
        }
        let mut group = self;
        for &index in rest {
            group = match group.rules.get_mut(index)? {
                RuleTreeNode::Group(g) => g,
                _ => return None,
            };
        }
        Some(group)
    }

    /// The non-root node addressed by `path`.
    pub fn node_at(&self, path: &[usize]) -> Option<&RuleTreeNode> {
        let (&index, parent) = path.split_last()?;
        self.group_at(parent)?.rules.get(index)
    }

    /// Append `node` to the group at `parent_path`; returns the new node's path.
    pub fn add_node(
        &mut self,
        parent_path: &[usize],
        node: impl Into<RuleTreeNode>,
    ) -> Result<Vec<usize>> {
        let parent = self
            .group_at_mut(parent_path)
            .ok_or_else(|| FilterError::InvalidPath(parent_path.to_vec()))?;
        parent.rules.push(node.into());
        let mut path = parent_path.to_vec();
        path.push(parent.rules.len() - 1);
        Ok(path)
    }

    /// Compare two trees ignoring node identifiers.
    pub fn structurally_eq(&self, other: &GroupNode) -> bool {
        self.without_ids() == other.without_ids()
    }

    fn without_ids(&self) -> GroupNode {
        let mut copy = self.clone();
        copy.clear_ids();
        copy
    }

    fn clear_ids(&mut self) {
        self.id = Uuid::nil();
        for node in &mut self.rules {
            node.clear_ids();
        }
    }
}

/// A filter as persisted by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub directory: String,
    pub equipment_type: EquipmentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rules: WireGroup,
}

impl FilterRecord {
    pub fn new(
        name: String,
        description: String,
        directory: String,
        equipment_type: EquipmentType,
        rules: WireGroup,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            directory,
            equipment_type,
            created_at: now,
            updated_at: now,
            rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> GroupNode {
        GroupNode::new(Combinator::And)
            .with_rule(RuleNode::new(
                "nominalVoltage",
                Some(OperatorType::Equals),
                RuleValue::single(225.0),
            ))
            .with_rule(GroupNode::new(Combinator::Or).with_rule(RuleNode::new(
                "name",
                Some(OperatorType::Contains),
                RuleValue::single("GEN"),
            )))
    }

    #[test]
    fn rule_builder_picks_composite_for_combinator_fields() {
        let node = RuleTreeNode::rule("regulatingTerminal", Some(OperatorType::Is), RuleValue::Empty);
        assert!(matches!(node, RuleTreeNode::Composite(_)));

        let node = RuleTreeNode::rule(
            "regulatingTerminal",
            Some(OperatorType::Exists),
            RuleValue::Empty,
        );
        assert!(matches!(node, RuleTreeNode::Rule(_)));

        let node = RuleTreeNode::rule("name", Some(OperatorType::Is), RuleValue::single("x"));
        assert!(matches!(node, RuleTreeNode::Rule(_)));
    }

    #[test]
    fn group_at_follows_paths() {
        let tree = sample_tree();
        assert_eq!(tree.group_at(&[0]).unwrap().id, tree.id);
        assert_eq!(tree.group_at(&[0, 1]).unwrap().combinator, Combinator::Or);
        assert!(tree.group_at(&[0, 0]).is_none()); // a rule, not a group
        assert!(tree.group_at(&[1]).is_none());
        assert!(tree.group_at(&[]).is_none());
    }

    #[test]
    fn node_at_addresses_children() {
        let tree = sample_tree();
        let node = tree.node_at(&[0, 1, 0]).unwrap();
        match node {
            RuleTreeNode::Rule(r) => assert_eq!(r.field, "name"),
            other => panic!("expected rule, got {:?}", other),
        }
        assert!(tree.node_at(&[0]).is_none());
        assert!(tree.node_at(&[0, 5]).is_none());
    }

    #[test]
    fn add_node_returns_new_path() {
        let mut tree = sample_tree();
        let path = tree
            .add_node(&[0, 1], RuleNode::new("id", None, RuleValue::Empty))
            .unwrap();
        assert_eq!(path, vec![0, 1, 1]);
        assert!(tree.node_at(&path).is_some());

        let err = tree.add_node(&[0, 0], GroupNode::new(Combinator::And));
        assert!(matches!(err, Err(FilterError::InvalidPath(_))));
    }

    #[test]
    fn structural_equality_ignores_ids() {
        let a = sample_tree();
        let b = sample_tree();
        assert_ne!(a, b);
        assert!(a.structurally_eq(&b));

        let c = sample_tree().with_rule(RuleNode::new("id", None, RuleValue::Empty));
        assert!(!a.structurally_eq(&c));
    }

    #[test]
    fn scalar_serializes_whole_numbers_as_integers() {
        assert_eq!(serde_json::to_value(Scalar::Number(225.0)).unwrap(), json!(225));
        assert_eq!(serde_json::to_value(Scalar::Number(0.5)).unwrap(), json!(0.5));
        assert_eq!(serde_json::to_value(Scalar::text("x")).unwrap(), json!("x"));
    }

    #[test]
    fn scalar_numeric_reading() {
        assert_eq!(Scalar::text(" 12.5 ").as_f64(), Some(12.5));
        assert_eq!(Scalar::text("abc").as_f64(), None);
        assert_eq!(Scalar::Bool(true).as_f64(), None);
        assert!(Scalar::text("  ").is_blank());
        assert!(!Scalar::Number(0.0).is_blank());
    }

    #[test]
    fn editable_tree_json_is_tagged() {
        let tree = GroupNode::new(Combinator::And).with_rule(RuleNode::new(
            "id",
            Some(OperatorType::In),
            RuleValue::multi(["A", "B"]),
        ));
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["rules"][0]["kind"], "rule");
        assert_eq!(value["rules"][0]["operator"], "in");
        assert_eq!(value["rules"][0]["value"], json!(["A", "B"]));

        let back: GroupNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn rule_value_untagged_shapes() {
        let v: RuleValue = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(v, RuleValue::Empty);
        let v: RuleValue = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(v, RuleValue::single(5.0));
        let v: RuleValue = serde_json::from_value(json!([1, "a"])).unwrap();
        assert_eq!(v, RuleValue::Multi(vec![Scalar::Number(1.0), Scalar::text("a")]));
        let v: RuleValue = serde_json::from_value(json!({
            "propertyName": "region",
            "propertyOperator": "in",
            "propertyValues": ["north"]
        }))
        .unwrap();
        assert_eq!(v.as_property().unwrap().property_operator, Some(OperatorType::In));
    }
}
