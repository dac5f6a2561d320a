use crate::commands::{CmdMessage, CmdResult, NewFilter};
use crate::config::GridFilterConfig;
use crate::error::{FilterError, Result};
use crate::model::FilterRecord;
use crate::rules::{count_rules, export_tree};
use crate::store::FilterStore;
use tracing::debug;

use super::helpers::{ensure_savable, equipment_warnings};

pub fn run<S: FilterStore>(
    store: &mut S,
    config: &GridFilterConfig,
    input: NewFilter,
) -> Result<CmdResult> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(FilterError::Api("Filter name cannot be empty".to_string()));
    }
    ensure_savable(&input.tree)?;

    let equipment_type = input
        .equipment_type
        .unwrap_or(config.default_equipment_type);
    let directory = input
        .directory
        .unwrap_or_else(|| config.default_directory.clone());

    let filter = FilterRecord::new(
        name,
        input.description,
        directory,
        equipment_type,
        export_tree(&input.tree),
    );
    store.create_filter(&filter)?;
    debug!(id = %filter.id, rules = count_rules(&input.tree), "created filter");

    let mut result = CmdResult::default();
    for warning in equipment_warnings(&input.tree, equipment_type) {
        result.add_message(warning);
    }
    result.add_message(CmdMessage::success(format!(
        "Filter created: {} ({})",
        filter.name, filter.id
    )));
    Ok(result.with_affected_filters(vec![filter]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EquipmentType, OperatorType};
    use crate::commands::MessageLevel;
    use crate::model::{Combinator, GroupNode, RuleNode, RuleValue};
    use crate::store::memory::fixtures::generator_tree;
    use crate::store::memory::InMemoryStore;

    fn new_filter(name: &str, tree: GroupNode) -> NewFilter {
        NewFilter {
            name: name.to_string(),
            description: "test".to_string(),
            directory: None,
            equipment_type: None,
            tree,
        }
    }

    #[test]
    fn creates_with_config_defaults() {
        let mut store = InMemoryStore::new();
        let config = GridFilterConfig::default();
        let result = run(&mut store, &config, new_filter("Gens", generator_tree())).unwrap();

        let filter = &result.affected_filters[0];
        assert_eq!(filter.equipment_type, EquipmentType::Generator);
        assert_eq!(filter.directory, "/");
        assert_eq!(filter.rules.rules.len(), 2);
        assert_eq!(store.list_filters().unwrap().len(), 1);
    }

    #[test]
    fn refuses_invalid_trees() {
        let mut store = InMemoryStore::new();
        let config = GridFilterConfig::default();
        let tree = GroupNode::new(Combinator::And).with_rule(RuleNode::new(
            "maxP",
            Some(OperatorType::Between),
            RuleValue::multi([10.0, 5.0]),
        ));
        let err = run(&mut store, &config, new_filter("Bad", tree)).unwrap_err();
        match err {
            FilterError::InvalidFilter(reasons) => {
                assert_eq!(reasons, vec![crate::rules::ReasonCode::BetweenRule])
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(store.list_filters().unwrap().is_empty());
    }

    #[test]
    fn refuses_blank_names() {
        let mut store = InMemoryStore::new();
        let config = GridFilterConfig::default();
        assert!(run(&mut store, &config, new_filter("  ", generator_tree())).is_err());
    }

    #[test]
    fn warns_about_fields_the_equipment_lacks() {
        let mut store = InMemoryStore::new();
        let config = GridFilterConfig::default();
        let mut input = new_filter("Subs", generator_tree());
        input.equipment_type = Some(EquipmentType::Substation);
        let result = run(&mut store, &config, input).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning && m.content.contains("nominalVoltage")));
    }
}
