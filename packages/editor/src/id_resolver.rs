//! # Identifier resolution
//!
//! Finds a block anywhere in the tree by id and reports where it lives: the
//! path of its owning list and its index there. Each list is scanned in
//! order; a columns block's columns are searched right after the block
//! itself, at any depth.

use std::sync::Arc;

use proposal_model::{Block, BlockPath, ColumnStep, Tree};

/// A block together with its position in the tree
#[derive(Debug, Clone)]
pub struct BlockLocation<'a> {
    pub block: &'a Arc<Block>,

    /// Path of the list that owns the block
    pub path: BlockPath,

    /// Index of the block within that list
    pub index: usize,
}

/// Locate `block_id` anywhere in the tree
pub fn find_block<'a>(tree: &'a Tree, block_id: &str) -> Option<BlockLocation<'a>> {
    tree.sections().iter().find_map(|section| {
        search_list(&section.blocks, block_id).map(|(block, steps, index)| {
            let mut path = BlockPath::section(section.id.clone());
            path.steps = steps;
            BlockLocation { block, path, index }
        })
    })
}

/// Path and index of the list holding `block_id`
pub fn path_of(tree: &Tree, block_id: &str) -> Option<(BlockPath, usize)> {
    find_block(tree, block_id).map(|location| (location.path, location.index))
}

pub fn contains(tree: &Tree, block_id: &str) -> bool {
    find_block(tree, block_id).is_some()
}

/// Column steps are collected on the way back up, so nothing is allocated
/// for subtrees that do not hold the block.
fn search_list<'a>(
    list: &'a [Arc<Block>],
    block_id: &str,
) -> Option<(&'a Arc<Block>, Vec<ColumnStep>, usize)> {
    for (index, block) in list.iter().enumerate() {
        if block.id == block_id {
            return Some((block, Vec::new(), index));
        }

        let Some(content) = block.columns() else {
            continue;
        };

        for (column_index, column) in content.columns.iter().enumerate() {
            if let Some((found, mut steps, found_index)) = search_list(&column.blocks, block_id) {
                steps.insert(
                    0,
                    ColumnStep {
                        block_id: block.id.clone(),
                        column: column_index,
                    },
                );
                return Some((found, steps, found_index));
            }
        }
    }

    None
}
