use crate::commands::{CmdMessage, CmdResult, FilterSelector};
use crate::error::{FilterError, Result};
use crate::rules::{count_rules, export_tree, import_tree, remove_node};
use crate::store::FilterStore;
use chrono::Utc;

use super::check::{describe, format_path};
use super::helpers::{ensure_savable, resolve_selector};

/// Remove the node at `path` from a stored filter. Groups left without
/// children are removed with it; the result must still be savable.
pub fn run<S: FilterStore>(
    store: &mut S,
    selector: &FilterSelector,
    path: &[usize],
) -> Result<CmdResult> {
    let mut filter = resolve_selector(store, selector)?;
    let tree = import_tree(&filter.rules);
    let removed = tree
        .node_at(path)
        .map(describe)
        .ok_or_else(|| FilterError::InvalidPath(path.to_vec()))?;

    let tree = remove_node(&tree, path)?;
    ensure_savable(&tree)?;

    filter.rules = export_tree(&tree);
    filter.updated_at = Utc::now();
    store.save_filter(&filter)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed {} at {} ({} rule(s) left)",
        removed,
        format_path(path),
        count_rules(&tree)
    )));
    Ok(result.with_affected_filters(vec![filter]))
}
