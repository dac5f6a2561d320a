//! Editable tree → wire tree.

use tracing::{debug, warn};

use super::units::micro_unit_to_unit;
use crate::catalog::{is_micro_unit_field, resolve_data_type, DataType, OperatorType};
use crate::model::{CompositeRule, GroupNode, RuleTreeNode, RuleValue, Scalar};
use crate::wire::{WireComposite, WireGroup, WireNode, WireRule};

/// Convert an editable tree into its wire form.
///
/// Never fails: a malformed rule exports with the missing parts left out and
/// is expected to have been flagged by the validator beforehand.
pub fn export_tree(tree: &GroupNode) -> WireGroup {
    let wire = export_group(tree);
    debug!(rules = wire.rules.len(), combinator = %wire.combinator, "exported filter tree");
    wire
}

fn export_group(group: &GroupNode) -> WireGroup {
    WireGroup::new(
        group.combinator,
        group.rules.iter().map(export_node).collect(),
    )
}

fn export_node(node: &RuleTreeNode) -> WireNode {
    match node {
        RuleTreeNode::Group(group) => WireNode::Group(export_group(group)),
        RuleTreeNode::Composite(composite) => WireNode::Composite(export_composite(composite)),
        RuleTreeNode::Rule(rule) => {
            WireNode::Rule(export_leaf(&rule.field, rule.operator, &rule.value))
        }
    }
}

fn export_composite(composite: &CompositeRule) -> WireComposite {
    if composite.operator.is_none() {
        warn!(field = %composite.field, "composite rule exported without an operator");
    }
    WireComposite {
        field: composite.field.clone(),
        operator: composite
            .operator
            .map(|op| op.custom_name().to_string())
            .unwrap_or_default(),
        combinator: composite.value.combinator,
        rules: composite
            .value
            .rules
            .iter()
            .map(|(sub_field, sub)| export_leaf(sub_field, sub.operator, &sub.value))
            .collect(),
    }
}

fn export_leaf(field: &str, operator: Option<OperatorType>, value: &RuleValue) -> WireRule {
    let data_type = resolve_data_type(field, operator);
    let field_name = (!field.is_empty()).then(|| field.to_string());

    if data_type == Some(DataType::Property) {
        let property = value.as_property();
        return WireRule {
            field: field_name,
            operator: property
                .and_then(|p| p.property_operator)
                .map(|op| op.custom_name().to_string()),
            data_type,
            property_name: property.map(|p| p.property_name.clone()),
            property_values: property.map(|p| p.property_values.clone()),
            ..Default::default()
        };
    }

    if data_type == Some(DataType::Combinator) {
        warn!(field, "composite field held by a plain rule, exporting without sub-rules");
    }

    let convert = |scalar: &Scalar| convert_scalar(field, data_type, scalar);
    let (value, values) = match (operator, value) {
        (Some(op), _) if op.is_existence() => (None, None),
        (_, RuleValue::Single(scalar)) => (Some(convert(scalar)), None),
        (_, RuleValue::Multi(items)) => (None, Some(items.iter().map(convert).collect())),
        (_, RuleValue::Property(_)) => {
            warn!(field, "property value on a non-property rule dropped on export");
            (None, None)
        }
        (_, RuleValue::Empty) => (None, None),
    };

    WireRule {
        field: field_name,
        operator: operator.map(|op| op.custom_name().to_string()),
        data_type,
        value,
        values,
        ..Default::default()
    }
}

/// Numeric text becomes a number for NUMBER rules; micro-unit fields are
/// converted to the base unit. Anything unparsable goes out untouched.
fn convert_scalar(field: &str, data_type: Option<DataType>, scalar: &Scalar) -> Scalar {
    if data_type != Some(DataType::Number) {
        return scalar.clone();
    }
    match scalar.as_f64() {
        Some(n) if is_micro_unit_field(field) => Scalar::Number(micro_unit_to_unit(n)),
        Some(n) => Scalar::Number(n),
        None => scalar.clone(),
    }
}
