//! Wire tree → editable tree.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, warn};
use uuid::Uuid;

use super::units::unit_to_micro_unit;
use crate::catalog::{is_micro_unit_field, resolve_data_type, DataType, OperatorType};
use crate::model::{
    CompositeRule, CompositeValue, GroupNode, PropertyValue, RuleNode, RuleTreeNode, RuleValue,
    Scalar, SubRule,
};
use crate::wire::{WireComposite, WireGroup, WireNode, WireRule};

/// Convert a fetched wire tree back into an editable tree.
///
/// Every node gets a fresh identifier. Multi-values come back sorted
/// (ascending for numbers, lexicographic otherwise) so that re-importing an
/// exported tree is idempotent.
pub fn import_tree(wire: &WireGroup) -> GroupNode {
    let tree = import_group(wire);
    debug!(rules = tree.rules.len(), combinator = %tree.combinator, "imported filter tree");
    tree
}

fn import_group(group: &WireGroup) -> GroupNode {
    GroupNode {
        id: Uuid::new_v4(),
        combinator: group.combinator,
        rules: group.rules.iter().map(import_node).collect(),
    }
}

fn import_node(node: &WireNode) -> RuleTreeNode {
    match node {
        WireNode::Group(group) => RuleTreeNode::Group(import_group(group)),
        WireNode::Composite(composite) => RuleTreeNode::Composite(import_composite(composite)),
        WireNode::Rule(rule) => {
            let (operator, value) = import_leaf(rule);
            RuleTreeNode::Rule(RuleNode {
                id: Uuid::new_v4(),
                field: rule.field.clone().unwrap_or_default(),
                operator,
                value,
            })
        }
    }
}

fn import_composite(composite: &WireComposite) -> CompositeRule {
    let mut rules = BTreeMap::new();
    for sub in &composite.rules {
        let Some(sub_field) = sub.field.clone() else {
            warn!(field = %composite.field, "dropping composite sub-rule without a field");
            continue;
        };
        let (operator, value) = import_leaf(sub);
        rules.insert(sub_field, SubRule { operator, value });
    }

    CompositeRule {
        id: Uuid::new_v4(),
        field: composite.field.clone(),
        operator: Some(composite.operator.as_str())
            .filter(|token| !token.is_empty())
            .and_then(lookup_operator),
        value: CompositeValue {
            combinator: composite.combinator,
            rules,
        },
    }
}

fn import_leaf(rule: &WireRule) -> (Option<OperatorType>, RuleValue) {
    let field = rule.field.as_deref().unwrap_or_default();
    let operator = rule.operator.as_deref().and_then(lookup_operator);
    let data_type = rule
        .data_type
        .or_else(|| resolve_data_type(field, operator));

    if data_type == Some(DataType::Property) || rule.property_name.is_some() {
        let mut property_values = rule.property_values.clone().unwrap_or_default();
        property_values.sort();
        let value = RuleValue::Property(PropertyValue {
            property_name: rule.property_name.clone().unwrap_or_default(),
            property_operator: operator,
            property_values,
        });
        return (Some(OperatorType::Is), value);
    }

    let numeric = data_type == Some(DataType::Number);
    let micro = numeric && is_micro_unit_field(field);
    let convert = |scalar: &Scalar| match scalar.as_f64() {
        Some(n) if micro => Scalar::Number(unit_to_micro_unit(n)),
        Some(n) if numeric => Scalar::Number(n),
        _ => scalar.clone(),
    };

    let value = if let Some(values) = &rule.values {
        let mut items: Vec<Scalar> = values.iter().map(convert).collect();
        if numeric {
            items.sort_by(compare_numeric);
        } else {
            items.sort_by_key(Scalar::to_text);
        }
        RuleValue::Multi(items)
    } else if let Some(value) = &rule.value {
        RuleValue::Single(convert(value))
    } else {
        RuleValue::Empty
    };

    (operator, value)
}

fn lookup_operator(token: &str) -> Option<OperatorType> {
    let operator = OperatorType::from_custom_name(token);
    if operator.is_none() {
        warn!(token, "unknown wire operator");
    }
    operator
}

/// Numbers ascending; anything that does not parse sorts after them.
fn compare_numeric(a: &Scalar, b: &Scalar) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
