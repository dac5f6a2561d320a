use crate::catalog::EquipmentType;
use crate::commands::{CmdResult, FilterSummary};
use crate::error::Result;
use crate::rules::{count_rules, import_tree};
use crate::store::FilterStore;

/// Stored filters in creation order, optionally narrowed to one equipment type.
/// Indexes stay those of the full listing so they can be used as selectors.
pub fn run<S: FilterStore>(store: &S, equipment: Option<EquipmentType>) -> Result<CmdResult> {
    let listed = store
        .list_filters()?
        .into_iter()
        .enumerate()
        .filter(|(_, f)| equipment.map_or(true, |eq| f.equipment_type == eq))
        .map(|(i, f)| FilterSummary {
            index: i + 1,
            id: f.id,
            rule_count: count_rules(&import_tree(&f.rules)),
            name: f.name,
            directory: f.directory,
            equipment_type: f.equipment_type,
            updated_at: f.updated_at,
        })
        .collect();

    Ok(CmdResult::default().with_listed_filters(listed))
}
