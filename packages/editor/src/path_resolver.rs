//! # Path resolution
//!
//! Turns a [`BlockPath`] into the block list it addresses. Resolution starts
//! at the section named by the path and, for each `(blockId, columnIndex)`
//! step, finds the block in the current list, requires it to be a columns
//! block, and descends into the indexed column.
//!
//! Resolution fails when the section is missing, a step's block is missing
//! or is not a columns block, or a column index is out of range.

use std::sync::Arc;

use proposal_model::{Block, BlockPath, Tree};

/// Read-only view of the list `path` points to
pub fn resolve_list<'a>(tree: &'a Tree, path: &BlockPath) -> Option<&'a [Arc<Block>]> {
    let section = tree.section(&path.section_id)?;
    let mut list: &[Arc<Block>] = &section.blocks;

    for step in &path.steps {
        let block = list.iter().find(|block| block.id == step.block_id)?;
        let column = block.columns()?.columns.get(step.column)?;
        list = &column.blocks;
    }

    Some(list)
}

/// Writable list `path` points to.
///
/// Every node on the way down is made unique with `Arc::make_mut`, so nodes
/// shared with older snapshots are copied and those snapshots stay intact.
/// Callers that may fail afterwards should check with [`resolve_list`] first
/// to avoid copying the spine for nothing.
pub fn resolve_list_mut<'a>(tree: &'a mut Tree, path: &BlockPath) -> Option<&'a mut Vec<Arc<Block>>> {
    let section = tree
        .sections_mut()
        .iter_mut()
        .find(|section| section.id == path.section_id)?;
    let mut list = &mut Arc::make_mut(section).blocks;

    for step in &path.steps {
        let block = list.iter_mut().find(|block| block.id == step.block_id)?;
        let column = Arc::make_mut(block).columns_mut()?.columns.get_mut(step.column)?;
        list = &mut column.blocks;
    }

    Some(list)
}
