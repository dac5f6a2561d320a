use crate::commands::{CheckReport, CmdMessage, CmdResult, NodeIssue};
use crate::error::Result;
use crate::model::{GroupNode, RuleTreeNode, RuleValue, ROOT_PATH};
use crate::rules::{count_rules, import_tree, validate, QueryValidity};
use crate::wire::WireGroup;
use uuid::Uuid;

/// Import a wire tree and report on it: validity, rule count and every
/// failing node with its path.
pub fn run(wire: &WireGroup) -> Result<CmdResult> {
    let report = report(import_tree(wire));
    let mut result = CmdResult::default();

    let rules = match report.rule_count {
        1 => "1 rule".to_string(),
        n => format!("{} rules", n),
    };
    if report.validity.is_savable() {
        result.add_message(CmdMessage::success(format!("Filter is valid ({})", rules)));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Filter is not valid ({}, {} issue(s))",
            rules,
            report.issues.len()
        )));
    }

    Ok(result.with_report(report))
}

/// Validate an editable tree and collect its issues in tree order.
pub fn report(tree: GroupNode) -> CheckReport {
    let validation = validate(&tree);
    let validity = QueryValidity::from_map(&validation);
    let rule_count = count_rules(&tree);

    let mut issues = Vec::new();
    let mut visit = |id: Uuid, path: &[usize], description: String| {
        if let Some(entry) = validation.get(&id).filter(|v| !v.valid) {
            issues.push(NodeIssue {
                id,
                path: path.to_vec(),
                description,
                reasons: entry.reasons.clone(),
            });
        }
    };
    visit(tree.id, ROOT_PATH, describe_group(&tree));
    walk(&tree, &mut ROOT_PATH.to_vec(), &mut visit);

    CheckReport {
        tree,
        validation,
        validity,
        rule_count,
        issues,
    }
}

fn walk<F>(group: &GroupNode, path: &mut Vec<usize>, visit: &mut F)
where
    F: FnMut(Uuid, &[usize], String),
{
    for (index, node) in group.rules.iter().enumerate() {
        path.push(index);
        visit(node.id(), path, describe(node));
        if let RuleTreeNode::Group(child) = node {
            walk(child, path, visit);
        }
        path.pop();
    }
}

/// Path as shown to users: `0.1.2`.
pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

pub fn describe(node: &RuleTreeNode) -> String {
    match node {
        RuleTreeNode::Group(group) => describe_group(group),
        RuleTreeNode::Composite(composite) => format!(
            "{} {} ({} sub-rule(s), {})",
            display_field(&composite.field),
            composite.operator.map(|op| op.custom_name()).unwrap_or("?"),
            composite.value.rules.len(),
            composite.value.combinator
        ),
        RuleTreeNode::Rule(rule) => {
            let operator = rule.operator.map(|op| op.custom_name()).unwrap_or("?");
            match describe_value(&rule.value) {
                Some(value) => format!("{} {} {}", display_field(&rule.field), operator, value),
                None => format!("{} {}", display_field(&rule.field), operator),
            }
        }
    }
}

fn describe_group(group: &GroupNode) -> String {
    format!("{} group", group.combinator)
}

fn display_field(field: &str) -> &str {
    if field.is_empty() {
        "?"
    } else {
        field
    }
}

fn describe_value(value: &RuleValue) -> Option<String> {
    match value {
        RuleValue::Empty => None,
        RuleValue::Single(scalar) => Some(scalar.to_text()),
        RuleValue::Multi(items) => Some(format!(
            "[{}]",
            items
                .iter()
                .map(|s| s.to_text())
                .collect::<Vec<_>>()
                .join(", ")
        )),
        RuleValue::Property(p) => Some(format!(
            "{} {} [{}]",
            p.property_name,
            p.property_operator.map(|op| op.custom_name()).unwrap_or("?"),
            p.property_values.join(", ")
        )),
    }
}
