use crate::commands::{CmdMessage, CmdResult, FilterSelector, FilterUpdate};
use crate::error::Result;
use crate::rules::export_tree;
use crate::store::FilterStore;
use chrono::Utc;

use super::helpers::{ensure_savable, equipment_warnings, resolve_selector};

pub fn run<S: FilterStore>(
    store: &mut S,
    selector: &FilterSelector,
    update: FilterUpdate,
) -> Result<CmdResult> {
    let mut filter = resolve_selector(store, selector)?;
    let mut result = CmdResult::default();

    if let Some(tree) = &update.tree {
        ensure_savable(tree)?;
        for warning in equipment_warnings(tree, filter.equipment_type) {
            result.add_message(warning);
        }
        filter.rules = export_tree(tree);
    }
    if let Some(name) = update.name {
        filter.name = name;
    }
    if let Some(description) = update.description {
        filter.description = description;
    }
    filter.updated_at = Utc::now();
    store.save_filter(&filter)?;

    result.add_message(CmdMessage::success(format!(
        "Filter updated: {}",
        filter.name
    )));
    Ok(result.with_affected_filters(vec![filter]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EquipmentType, OperatorType};
    use crate::error::FilterError;
    use crate::model::{Combinator, GroupNode, RuleNode, RuleValue};
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn replaces_rules_and_name() {
        let mut fixture = StoreFixture::new();
        let id = fixture.add_filter("Gens", EquipmentType::Generator);
        let tree = GroupNode::new(Combinator::Or).with_rule(RuleNode::new(
            "energySource",
            Some(OperatorType::Equals),
            RuleValue::single("HYDRO"),
        ));
        let update = FilterUpdate {
            name: Some("Hydro".into()),
            tree: Some(tree),
            ..Default::default()
        };
        run(&mut fixture.store, &FilterSelector::Id(id), update).unwrap();

        let stored = fixture.store.get_filter(&id).unwrap();
        assert_eq!(stored.name, "Hydro");
        assert_eq!(stored.rules.combinator, Combinator::Or);
        assert_eq!(stored.rules.rules.len(), 1);
        assert!(stored.updated_at >= stored.created_at);
    }

    #[test]
    fn invalid_tree_leaves_filter_untouched() {
        let mut fixture = StoreFixture::new();
        let id = fixture.add_filter("Gens", EquipmentType::Generator);
        let before = fixture.store.get_filter(&id).unwrap();
        let update = FilterUpdate {
            tree: Some(GroupNode::new(Combinator::And)),
            ..Default::default()
        };
        let err = run(&mut fixture.store, &FilterSelector::Id(id), update);
        assert!(matches!(err, Err(FilterError::InvalidFilter(_))));
        assert_eq!(fixture.store.get_filter(&id).unwrap(), before);
    }
}
