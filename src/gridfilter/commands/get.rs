use crate::commands::{CmdResult, FilterSelector};
use crate::error::Result;
use crate::rules::import_tree;
use crate::store::FilterStore;

use super::check;
use super::helpers::resolve_selector;

/// Fetch a filter with its editable tree and validation report.
pub fn run<S: FilterStore>(store: &S, selector: &FilterSelector) -> Result<CmdResult> {
    let filter = resolve_selector(store, selector)?;
    let report = check::report(import_tree(&filter.rules));
    Ok(CmdResult::default()
        .with_report(report)
        .with_affected_filters(vec![filter]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EquipmentType;
    use crate::store::memory::fixtures::{generator_tree, StoreFixture};

    #[test]
    fn returns_record_and_imported_tree() {
        let mut fixture = StoreFixture::new();
        let id = fixture.add_filter("Gens", EquipmentType::Generator);
        let result = run(&fixture.store, &FilterSelector::Index(1)).unwrap();

        assert_eq!(result.affected_filters[0].id, id);
        let report = result.report.unwrap();
        assert_eq!(report.rule_count, 2);
        assert!(report.tree.structurally_eq(&generator_tree()));
    }

    #[test]
    fn unknown_selector_fails() {
        let fixture = StoreFixture::new();
        assert!(run(&fixture.store, &FilterSelector::Name("x".into())).is_err());
    }
}
