use crate::catalog::{get_field, EquipmentType};
use crate::commands::{CmdMessage, FilterSelector};
use crate::error::{FilterError, Result};
use crate::model::{FilterRecord, GroupNode, RuleTreeNode};
use crate::rules::QueryValidity;
use crate::store::FilterStore;

pub fn resolve_selector<S: FilterStore>(store: &S, selector: &FilterSelector) -> Result<FilterRecord> {
    match selector {
        FilterSelector::Id(id) => store.get_filter(id),
        FilterSelector::Index(index) => {
            let filters = store.list_filters()?;
            index
                .checked_sub(1)
                .and_then(|i| filters.into_iter().nth(i))
                .ok_or_else(|| FilterError::Api(format!("Index {} not found", index)))
        }
        FilterSelector::Name(name) => {
            let filters = store.list_filters()?;
            if let Some(exact) = filters.iter().find(|f| &f.name == name) {
                return Ok(exact.clone());
            }
            let mut matches: Vec<_> = filters
                .into_iter()
                .filter(|f| f.name.starts_with(name.as_str()))
                .collect();
            match matches.len() {
                0 => Err(FilterError::Api(format!("No filter named {}", selector))),
                1 => Ok(matches.remove(0)),
                n => Err(FilterError::Api(format!(
                    "{} filters match {}, be more specific",
                    n, selector
                ))),
            }
        }
    }
}

/// Refuse to persist a tree the validator would not let a user save.
pub fn ensure_savable(tree: &GroupNode) -> Result<()> {
    let validity = QueryValidity::of(tree);
    if validity.is_savable() {
        Ok(())
    } else {
        Err(FilterError::InvalidFilter(validity.failing()))
    }
}

/// Warnings for rules whose field the equipment type does not offer.
pub fn equipment_warnings(tree: &GroupNode, equipment_type: EquipmentType) -> Vec<CmdMessage> {
    let mut fields = Vec::new();
    collect_fields(tree, &mut fields);
    fields.sort();
    fields.dedup();
    fields
        .into_iter()
        .filter(|name| {
            get_field(name)
                .map(|d| !equipment_type.offers(d.field))
                .unwrap_or(false)
        })
        .map(|name| {
            CmdMessage::warning(format!(
                "Field {} is not available for {}",
                name, equipment_type
            ))
        })
        .collect()
}

fn collect_fields<'a>(group: &'a GroupNode, out: &mut Vec<&'a str>) {
    for node in &group.rules {
        match node {
            RuleTreeNode::Group(child) => collect_fields(child, out),
            RuleTreeNode::Composite(c) => out.push(&c.field),
            RuleTreeNode::Rule(r) => out.push(&r.field),
        }
    }
}
