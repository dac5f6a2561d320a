use crate::commands::{CmdMessage, CmdResult, FilterSelector};
use crate::error::Result;
use crate::store::FilterStore;

use super::helpers::resolve_selector;

pub fn run<S: FilterStore>(store: &mut S, selectors: &[FilterSelector]) -> Result<CmdResult> {
    // Resolve everything first: positional indexes shift once deletion starts.
    let filters = selectors
        .iter()
        .map(|s| resolve_selector(store, s))
        .collect::<Result<Vec<_>>>()?;

    let mut result = CmdResult::default();
    for filter in filters {
        store.delete_filter(&filter.id)?;
        result.add_message(CmdMessage::success(format!(
            "Filter deleted: {}",
            filter.name
        )));
        result.affected_filters.push(filter);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn deletes_by_index() {
        let mut fixture = StoreFixture::new().with_filters(3);
        let result = run(
            &mut fixture.store,
            &[FilterSelector::Index(1), FilterSelector::Index(3)],
        )
        .unwrap();
        assert_eq!(result.affected_filters.len(), 2);

        let left = fixture.store.list_filters().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "Test Filter 2");
    }

    #[test]
    fn nothing_is_deleted_when_a_selector_fails() {
        let mut fixture = StoreFixture::new().with_filters(1);
        let err = run(
            &mut fixture.store,
            &[FilterSelector::Index(1), FilterSelector::Index(9)],
        );
        assert!(err.is_err());
        assert_eq!(fixture.store.list_filters().unwrap().len(), 1);
    }
}
