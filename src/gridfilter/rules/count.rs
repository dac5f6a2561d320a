//! Leaf rule counting.

use crate::model::{GroupNode, RuleTreeNode};

/// Number of leaf rules in `tree`. A composite counts as one rule; groups
/// only contribute their descendants.
pub fn count_rules(tree: &GroupNode) -> usize {
    tree.rules
        .iter()
        .map(|node| match node {
            RuleTreeNode::Group(group) => count_rules(group),
            RuleTreeNode::Composite(_) | RuleTreeNode::Rule(_) => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OperatorType;
    use crate::model::{Combinator, CompositeRule, RuleNode, RuleValue};

    fn rule() -> RuleNode {
        RuleNode::new("name", Some(OperatorType::Contains), RuleValue::single("x"))
    }

    #[test]
    fn counts_leaves_across_groups() {
        // AND[ rule, OR[ rule, rule ] ]
        let tree = GroupNode::new(Combinator::And)
            .with_rule(rule())
            .with_rule(GroupNode::new(Combinator::Or).with_rule(rule()).with_rule(rule()));
        assert_eq!(count_rules(&tree), 3);
    }

    #[test]
    fn empty_groups_count_nothing() {
        let tree = GroupNode::new(Combinator::And).with_rule(GroupNode::new(Combinator::Or));
        assert_eq!(count_rules(&tree), 0);
    }

    #[test]
    fn composite_counts_once() {
        let composite = CompositeRule::new("regulatingTerminal", Some(OperatorType::Is))
            .with_sub_rule("side", Some(OperatorType::Equals), RuleValue::single("ONE"))
            .with_sub_rule("regulatingTerminalVLId", Some(OperatorType::Is), RuleValue::single("VL"));
        let tree = GroupNode::new(Combinator::And).with_rule(composite);
        assert_eq!(count_rules(&tree), 1);
    }
}
