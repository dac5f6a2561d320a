//! Semantic validation of an editable tree.
//!
//! [`validate`] walks the whole tree and records one [`NodeValidation`] per
//! node, keyed by node id. Invalid input never raises: it shows up as reason
//! codes in the map, and the four [`test_query`] predicates gate saving.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{get_field, resolve_data_type, DataType, OperatorType};
use crate::model::{CompositeRule, GroupNode, NodeId, RuleTreeNode, RuleValue, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    EmptyGroup,
    EmptyRule,
    IncorrectRule,
    BetweenRule,
}

pub const REASON_CODES: &[ReasonCode] = &[
    ReasonCode::EmptyGroup,
    ReasonCode::EmptyRule,
    ReasonCode::IncorrectRule,
    ReasonCode::BetweenRule,
];

impl ReasonCode {
    pub fn code(&self) -> &'static str {
        match self {
            ReasonCode::EmptyGroup => "EMPTY_GROUP",
            ReasonCode::EmptyRule => "EMPTY_RULE",
            ReasonCode::IncorrectRule => "INCORRECT_RULE",
            ReasonCode::BetweenRule => "BETWEEN_RULE",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReasonCode::EmptyGroup => "group has no rules",
            ReasonCode::EmptyRule => "rule is incomplete",
            ReasonCode::IncorrectRule => "value is not a number",
            ReasonCode::BetweenRule => "lower bound must be below upper bound",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<ReasonCode>,
}

impl NodeValidation {
    fn from_reasons(reasons: Vec<ReasonCode>) -> Self {
        Self {
            valid: reasons.is_empty(),
            reasons,
        }
    }
}

pub type ValidationMap = BTreeMap<NodeId, NodeValidation>;

/// Validate every node of `tree`. Pure: the same tree always yields the same map.
pub fn validate(tree: &GroupNode) -> ValidationMap {
    let mut map = ValidationMap::new();
    validate_group(tree, &mut map);
    debug!(
        nodes = map.len(),
        invalid = map.values().filter(|v| !v.valid).count(),
        "validated filter tree"
    );
    map
}

/// True when no node of `tree` reports `reason`.
pub fn test_query(reason: ReasonCode, tree: &GroupNode) -> bool {
    !has_reason(&validate(tree), reason)
}

pub fn has_reason(map: &ValidationMap, reason: ReasonCode) -> bool {
    map.values().any(|v| v.reasons.contains(&reason))
}

/// Ids of the nodes reporting `reason`.
pub fn violations(map: &ValidationMap, reason: ReasonCode) -> Vec<NodeId> {
    map.iter()
        .filter(|(_, v)| v.reasons.contains(&reason))
        .map(|(id, _)| *id)
        .collect()
}

/// The four save-gating predicates, each `true` when there is no violation of
/// that class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryValidity {
    pub empty_group: bool,
    pub empty_rule: bool,
    pub incorrect_rule: bool,
    pub between_rule: bool,
}

impl QueryValidity {
    pub fn of(tree: &GroupNode) -> Self {
        Self::from_map(&validate(tree))
    }

    pub fn from_map(map: &ValidationMap) -> Self {
        Self {
            empty_group: !has_reason(map, ReasonCode::EmptyGroup),
            empty_rule: !has_reason(map, ReasonCode::EmptyRule),
            incorrect_rule: !has_reason(map, ReasonCode::IncorrectRule),
            between_rule: !has_reason(map, ReasonCode::BetweenRule),
        }
    }

    pub fn is_savable(&self) -> bool {
        self.empty_group && self.empty_rule && self.incorrect_rule && self.between_rule
    }

    /// Reason codes currently blocking a save.
    pub fn failing(&self) -> Vec<ReasonCode> {
        let mut failing = Vec::new();
        if !self.empty_group {
            failing.push(ReasonCode::EmptyGroup);
        }
        if !self.empty_rule {
            failing.push(ReasonCode::EmptyRule);
        }
        if !self.incorrect_rule {
            failing.push(ReasonCode::IncorrectRule);
        }
        if !self.between_rule {
            failing.push(ReasonCode::BetweenRule);
        }
        failing
    }
}

fn validate_group(group: &GroupNode, map: &mut ValidationMap) {
    let reasons = if group.is_empty() {
        vec![ReasonCode::EmptyGroup]
    } else {
        Vec::new()
    };
    map.insert(group.id, NodeValidation::from_reasons(reasons));

    for node in &group.rules {
        match node {
            RuleTreeNode::Group(child) => validate_group(child, map),
            RuleTreeNode::Composite(composite) => {
                map.insert(
                    composite.id,
                    NodeValidation::from_reasons(check_composite(composite)),
                );
            }
            RuleTreeNode::Rule(rule) => {
                let reasons = check_leaf(&rule.field, rule.operator, &rule.value)
                    .into_iter()
                    .collect();
                map.insert(rule.id, NodeValidation::from_reasons(reasons));
            }
        }
    }
}

/// A composite needs a known composite field and an operator; past that only
/// its configured sub-fields are checked, each as an ordinary leaf.
fn check_composite(composite: &CompositeRule) -> Vec<ReasonCode> {
    let Some(descriptor) = get_field(&composite.field).filter(|d| d.is_composite()) else {
        return vec![ReasonCode::EmptyRule];
    };
    if composite.operator.is_none() {
        return vec![ReasonCode::EmptyRule];
    }

    let mut reasons: Vec<ReasonCode> = Vec::new();
    for child in descriptor.children() {
        let Some(sub) = composite.value.rules.get(child.name) else {
            continue;
        };
        if let Some(reason) = check_leaf(child.name, sub.operator, &sub.value) {
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
    }
    reasons
}

fn check_leaf(field: &str, operator: Option<OperatorType>, value: &RuleValue) -> Option<ReasonCode> {
    let Some(operator) = operator else {
        return Some(ReasonCode::EmptyRule);
    };
    if operator.is_existence() {
        return None;
    }
    let Some(data_type) = resolve_data_type(field, Some(operator)) else {
        return Some(ReasonCode::EmptyRule);
    };

    match operator {
        OperatorType::Between => return check_between(value),
        OperatorType::In | OperatorType::NotIn if values_of(value).is_empty() => {
            return Some(ReasonCode::EmptyRule);
        }
        _ => {}
    }

    match data_type {
        DataType::String => {
            let values = values_of(value);
            if values.is_empty() || values.iter().all(|v| v.is_blank()) {
                Some(ReasonCode::EmptyRule)
            } else {
                None
            }
        }
        DataType::Number => {
            let values = values_of(value);
            if values.is_empty() || values.iter().any(|v| v.as_f64().is_none()) {
                Some(ReasonCode::IncorrectRule)
            } else {
                None
            }
        }
        DataType::FilterUuid => match values_of(value).first() {
            Some(Scalar::Text(s)) if is_hyphenated_uuid(s) => None,
            _ => Some(ReasonCode::EmptyRule),
        },
        DataType::Property => match value.as_property() {
            Some(p)
                if !p.property_name.trim().is_empty()
                    && p.property_operator.is_some()
                    && !p.property_values.is_empty()
                    && p.property_values.iter().all(|v| !v.trim().is_empty()) =>
            {
                None
            }
            _ => Some(ReasonCode::EmptyRule),
        },
        DataType::Combinator => Some(ReasonCode::EmptyRule),
        DataType::Boolean | DataType::Enum => {
            let values = values_of(value);
            if values.is_empty() || values.iter().any(|v| v.is_blank()) {
                Some(ReasonCode::EmptyRule)
            } else {
                None
            }
        }
    }
}

fn check_between(value: &RuleValue) -> Option<ReasonCode> {
    let bounds = values_of(value);
    let (lower, upper) = match bounds.as_slice() {
        [lower, upper, ..] if !lower.is_blank() && !upper.is_blank() => (lower, upper),
        _ => return Some(ReasonCode::EmptyRule),
    };
    match (lower.as_f64(), upper.as_f64()) {
        (Some(lo), Some(hi)) if lo >= hi => Some(ReasonCode::BetweenRule),
        (Some(_), Some(_)) => None,
        _ => Some(ReasonCode::IncorrectRule),
    }
}

/// Only the 36-character hyphenated form is a filter reference; the simple,
/// braced and urn forms `Uuid::try_parse` also accepts are rejected.
fn is_hyphenated_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::try_parse(s).is_ok()
}

/// Scalar values of a rule, whether single or multi.
fn values_of(value: &RuleValue) -> Vec<&Scalar> {
    match value {
        RuleValue::Single(scalar) => vec![scalar],
        RuleValue::Multi(items) => items.iter().collect(),
        RuleValue::Empty | RuleValue::Property(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Combinator, PropertyValue, RuleNode};

    fn reasons_for(field: &str, operator: OperatorType, value: RuleValue) -> Vec<ReasonCode> {
        let rule = RuleNode::new(field, Some(operator), value);
        let id = rule.id;
        let tree = GroupNode::new(Combinator::And).with_rule(rule);
        validate(&tree)[&id].reasons.clone()
    }

    #[test]
    fn empty_group_is_flagged_but_children_still_visited() {
        let inner = GroupNode::new(Combinator::Or);
        let inner_id = inner.id;
        let rule = RuleNode::new("name", None, RuleValue::Empty);
        let rule_id = rule.id;
        let tree = GroupNode::new(Combinator::And).with_rule(inner).with_rule(rule);

        let map = validate(&tree);
        assert_eq!(map.len(), 3);
        assert!(map[&tree.id].valid);
        assert_eq!(map[&inner_id].reasons, vec![ReasonCode::EmptyGroup]);
        assert_eq!(map[&rule_id].reasons, vec![ReasonCode::EmptyRule]);
    }

    #[test]
    fn between_bounds() {
        assert_eq!(
            reasons_for("maxP", OperatorType::Between, RuleValue::multi([10.0, 5.0])),
            vec![ReasonCode::BetweenRule]
        );
        assert_eq!(
            reasons_for("maxP", OperatorType::Between, RuleValue::multi([5.0, 5.0])),
            vec![ReasonCode::BetweenRule]
        );
        assert!(reasons_for("maxP", OperatorType::Between, RuleValue::multi([5.0, 10.0])).is_empty());
        assert_eq!(
            reasons_for("maxP", OperatorType::Between, RuleValue::multi(["5", ""])),
            vec![ReasonCode::EmptyRule]
        );
        assert_eq!(
            reasons_for("maxP", OperatorType::Between, RuleValue::multi(["5"])),
            vec![ReasonCode::EmptyRule]
        );
        assert_eq!(
            reasons_for("maxP", OperatorType::Between, RuleValue::multi(["a", "10"])),
            vec![ReasonCode::IncorrectRule]
        );
    }

    #[test]
    fn empty_in_is_an_empty_rule() {
        let empty: Vec<Scalar> = Vec::new();
        assert_eq!(
            reasons_for("id", OperatorType::In, RuleValue::multi(empty.clone())),
            vec![ReasonCode::EmptyRule]
        );
        assert_eq!(
            reasons_for("maxP", OperatorType::NotIn, RuleValue::multi(empty)),
            vec![ReasonCode::EmptyRule]
        );
        assert_eq!(
            reasons_for("maxP", OperatorType::In, RuleValue::multi(["1", "x"])),
            vec![ReasonCode::IncorrectRule]
        );
    }

    #[test]
    fn string_and_number_scalars() {
        assert_eq!(
            reasons_for("name", OperatorType::Contains, RuleValue::single("   ")),
            vec![ReasonCode::EmptyRule]
        );
        assert!(reasons_for("name", OperatorType::Contains, RuleValue::single("GEN")).is_empty());
        assert_eq!(
            reasons_for("maxP", OperatorType::Greater, RuleValue::single("ten")),
            vec![ReasonCode::IncorrectRule]
        );
        assert!(reasons_for("maxP", OperatorType::Greater, RuleValue::single(" 10 ")).is_empty());
    }

    #[test]
    fn existence_rules_need_no_value() {
        assert!(reasons_for("maxP", OperatorType::Exists, RuleValue::Empty).is_empty());
        assert!(reasons_for("unknownField", OperatorType::NotExists, RuleValue::Empty).is_empty());
    }

    #[test]
    fn unknown_field_is_incomplete() {
        assert_eq!(
            reasons_for("unknownField", OperatorType::Equals, RuleValue::single("x")),
            vec![ReasonCode::EmptyRule]
        );
    }

    #[test]
    fn filter_uuid_rules() {
        assert_eq!(
            reasons_for("id", OperatorType::IsPartOf, RuleValue::multi(["not-a-uuid"])),
            vec![ReasonCode::EmptyRule]
        );
        assert_eq!(
            reasons_for("id", OperatorType::IsPartOf, RuleValue::Empty),
            vec![ReasonCode::EmptyRule]
        );
        assert!(reasons_for(
            "voltageLevelId",
            OperatorType::IsNotPartOf,
            RuleValue::multi(["1b4a3f2e-8d6c-4e2a-9f1b-2c3d4e5f6a7b"])
        )
        .is_empty());
    }

    #[test]
    fn filter_uuid_must_be_hyphenated() {
        let canonical = "1b4a3f2e-8d6c-4e2a-9f1b-2c3d4e5f6a7b";
        for value in [
            "1b4a3f2e8d6c4e2a9f1b2c3d4e5f6a7b",
            "{1b4a3f2e-8d6c-4e2a-9f1b-2c3d4e5f6a7b}",
            "urn:uuid:1b4a3f2e-8d6c-4e2a-9f1b-2c3d4e5f6a7b",
            " 1b4a3f2e-8d6c-4e2a-9f1b-2c3d4e5f6a7b",
            "1b4a3f2e-8d6c-4e2a-9f1b-2c3d4e5f6a7b\n",
        ] {
            assert_eq!(
                reasons_for("id", OperatorType::IsPartOf, RuleValue::multi([value])),
                vec![ReasonCode::EmptyRule],
                "{:?}",
                value
            );
        }
        assert!(reasons_for("id", OperatorType::IsPartOf, RuleValue::multi([canonical])).is_empty());
        assert!(reasons_for(
            "id",
            OperatorType::IsPartOf,
            RuleValue::multi([canonical.to_uppercase().as_str()])
        )
        .is_empty());
    }

    #[test]
    fn boolean_and_enum_need_an_operand() {
        assert_eq!(
            reasons_for("connected", OperatorType::Equals, RuleValue::Empty),
            vec![ReasonCode::EmptyRule]
        );
        assert_eq!(
            reasons_for("energySource", OperatorType::Equals, RuleValue::single(" ")),
            vec![ReasonCode::EmptyRule]
        );
        assert!(reasons_for("connected", OperatorType::Equals, RuleValue::single(false)).is_empty());
        assert!(reasons_for("energySource", OperatorType::Equals, RuleValue::single("HYDRO")).is_empty());
        assert!(reasons_for("country", OperatorType::In, RuleValue::multi(["BE", "FR"])).is_empty());
    }

    #[test]
    fn property_rules() {
        let property = |name: &str, op: Option<OperatorType>, values: &[&str]| {
            RuleValue::Property(PropertyValue {
                property_name: name.into(),
                property_operator: op,
                property_values: values.iter().map(|v| v.to_string()).collect(),
            })
        };
        assert!(reasons_for(
            "freeProperties",
            OperatorType::Is,
            property("region", Some(OperatorType::In), &["north"])
        )
        .is_empty());
        for value in [
            property("", Some(OperatorType::In), &["north"]),
            property("region", None, &["north"]),
            property("region", Some(OperatorType::In), &[]),
            property("region", Some(OperatorType::In), &[" "]),
            RuleValue::Empty,
        ] {
            assert_eq!(
                reasons_for("freeProperties", OperatorType::Is, value),
                vec![ReasonCode::EmptyRule]
            );
        }
    }

    #[test]
    fn composite_delegates_to_configured_sub_fields() {
        let composite = CompositeRule::new("regulatingTerminal", Some(OperatorType::Is))
            .with_sub_rule("side", Some(OperatorType::Exists), RuleValue::Empty);
        let id = composite.id;
        let tree = GroupNode::new(Combinator::And).with_rule(composite);
        assert!(validate(&tree)[&id].valid);

        let composite = CompositeRule::new("regulatingTerminal", Some(OperatorType::Is))
            .with_sub_rule("regulatingTerminalVLId", Some(OperatorType::Is), RuleValue::single(""))
            .with_sub_rule("side", Some(OperatorType::Equals), RuleValue::single("ONE"));
        let id = composite.id;
        let tree = GroupNode::new(Combinator::And).with_rule(composite);
        assert_eq!(validate(&tree)[&id].reasons, vec![ReasonCode::EmptyRule]);
    }

    #[test]
    fn composite_without_operator_is_incomplete() {
        let composite = CompositeRule::new("regulatingTerminal", None)
            .with_sub_rule("side", Some(OperatorType::Equals), RuleValue::single("ONE"));
        let id = composite.id;
        let tree = GroupNode::new(Combinator::And).with_rule(composite);
        assert_eq!(validate(&tree)[&id].reasons, vec![ReasonCode::EmptyRule]);
        assert!(!QueryValidity::of(&tree).is_savable());
    }

    #[test]
    fn composite_ignores_undeclared_sub_fields() {
        let composite = CompositeRule::new("regulatingTerminal", Some(OperatorType::Is))
            .with_sub_rule("bogus", None, RuleValue::Empty);
        let id = composite.id;
        let tree = GroupNode::new(Combinator::And).with_rule(composite);
        assert!(validate(&tree)[&id].valid);
    }

    #[test]
    fn query_validity_gates_saving() {
        let tree = GroupNode::new(Combinator::And);
        let validity = QueryValidity::of(&tree);
        assert!(!validity.empty_group);
        assert!(validity.empty_rule);
        assert!(!validity.is_savable());
        assert_eq!(validity.failing(), vec![ReasonCode::EmptyGroup]);
        assert!(!test_query(ReasonCode::EmptyGroup, &tree));
        assert!(test_query(ReasonCode::BetweenRule, &tree));

        let tree = tree.with_rule(RuleNode::new(
            "name",
            Some(OperatorType::Is),
            RuleValue::single("G1"),
        ));
        assert!(QueryValidity::of(&tree).is_savable());
    }

    #[test]
    fn violations_lists_offending_nodes() {
        let bad = RuleNode::new("maxP", Some(OperatorType::Lower), RuleValue::single("x"));
        let bad_id = bad.id;
        let tree = GroupNode::new(Combinator::And)
            .with_rule(bad)
            .with_rule(RuleNode::new("maxP", Some(OperatorType::Lower), RuleValue::single(3.0)));
        let map = validate(&tree);
        assert_eq!(violations(&map, ReasonCode::IncorrectRule), vec![bad_id]);
        assert!(violations(&map, ReasonCode::EmptyRule).is_empty());
    }

    #[test]
    fn validation_is_deterministic() {
        let tree = GroupNode::new(Combinator::And)
            .with_rule(GroupNode::new(Combinator::Or))
            .with_rule(RuleNode::new("maxP", Some(OperatorType::Between), RuleValue::multi([3.0, 1.0])));
        assert_eq!(validate(&tree), validate(&tree));
    }
}
