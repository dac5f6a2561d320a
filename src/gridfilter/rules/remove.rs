//! Cascading node removal.

use tracing::debug;

use crate::error::{FilterError, Result};
use crate::model::{GroupNode, ROOT_PATH};

/// Remove the node at `path` and return the resulting tree.
///
/// When the node is the only child of a non-root group, that group goes too,
/// and so on upward. The root itself is never removed: asking for `[0]` is a
/// no-op, and the root may end up as an empty group.
pub fn remove_node(tree: &GroupNode, path: &[usize]) -> Result<GroupNode> {
    let mut next = tree.clone();
    remove_in_place(&mut next, path)?;
    Ok(next)
}

fn remove_in_place(tree: &mut GroupNode, path: &[usize]) -> Result<()> {
    if path == ROOT_PATH {
        debug!("root group cannot be removed");
        return Ok(());
    }
    let invalid = || FilterError::InvalidPath(path.to_vec());

    let (&index, parent_path) = path.split_last().ok_or_else(invalid)?;
    let siblings = tree.group_at(parent_path).ok_or_else(invalid)?.rules.len();
    if index >= siblings {
        return Err(invalid());
    }

    if siblings == 1 && parent_path != ROOT_PATH {
        debug!(?path, "only child removed, cascading to parent group");
        return remove_in_place(tree, parent_path);
    }

    let parent = tree.group_at_mut(parent_path).ok_or_else(invalid)?;
    parent.rules.remove(index);
    debug!(?path, "removed node");
    Ok(())
}
