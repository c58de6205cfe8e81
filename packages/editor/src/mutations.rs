//! # Tree Mutations
//!
//! Structural edit operations on a proposal tree.
//!
//! ## Design Principles
//!
//! 1. **Snapshots**: every mutation maps an old tree to a new one; the input
//!    tree is never altered. Only the nodes on the path from the root to the
//!    edited list are copied, everything else is shared.
//! 2. **All or nothing**: a mutation either fully applies or leaves the tree
//!    exactly as it was. A move whose destination cannot be resolved does not
//!    remove the dragged block.
//! 3. **Resolution failures are not fatal**: the UI may act on a stale id or
//!    path. [`Mutation::apply`] reports why it could not apply;
//!    [`Mutation::apply_or_keep`] turns that into a no-op.
//!
//! ## Index Semantics
//!
//! An insertion index always means "insert before the element currently at
//! this index"; an index at or past the end of the list appends.
//!
//! ### Move
//! - Removes the block from its list, then inserts it into the destination
//! - Within one list, a target index past the source index is shifted down by
//!   one to account for the removal, so "drop after item N" lands after N in
//!   either drag direction
//! - Moving a block onto its own position is a cheap no-op (hover events
//!   repeat it continuously)
//! - Moving a columns block into one of its own columns fails
//!
//! ### Duplicate / Paste
//! - The new block is a deep copy with fresh ids for itself and every nested
//!   column and block
//! - Duplicate places the copy right after the original; paste places it
//!   after a given block or at a given path and index

use std::sync::Arc;

use proposal_model::{Block, BlockContent, BlockKind, BlockPath, IdGenerator, Section, Styles, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::id_resolver::find_block;
use crate::path_resolver::{resolve_list, resolve_list_mut};

/// Where a pasted block goes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PasteTarget {
    /// Immediately after an existing block, in that block's list
    AfterBlock { block_id: String },

    /// At `index` of the list addressed by `path`
    At { path: BlockPath, index: usize },
}

/// Structural edits on a proposal tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert a fresh block of `kind` with its default content
    AddBlock {
        path: BlockPath,
        kind: BlockKind,
        index: usize,
    },

    /// Replace a block's content; styles are replaced only when given.
    /// The content is raw JSON, read according to the target block's kind.
    UpdateBlock {
        block_id: String,
        content: Value,
        #[serde(default)]
        styles: Option<Styles>,
    },

    /// Remove a block and everything nested in it
    RemoveBlock { block_id: String },

    /// Relocate a block to `target_index` of the list at `target_path`
    MoveBlock {
        block_id: String,
        target_path: BlockPath,
        target_index: usize,
    },

    /// Insert a copy of a block right after it
    DuplicateBlock { block_id: String },

    /// Insert a copy of `block` (typically the clipboard) with fresh ids
    Paste { block: Block, target: PasteTarget },

    /// Insert a new section after `after`, or at the start when `None`
    AddSection {
        #[serde(default)]
        after: Option<usize>,
    },

    /// Remove a section and all blocks in it
    RemoveSection { section_id: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Content does not fit block {block_id} of type {kind}")]
    KindMismatch { block_id: String, kind: BlockKind },

    #[error("Clipboard is empty")]
    ClipboardEmpty,
}

impl Mutation {
    /// Compute the tree that results from applying this mutation to `tree`
    pub fn apply(&self, tree: &Tree, ids: &mut IdGenerator) -> Result<Tree, MutationError> {
        match self {
            Mutation::AddBlock { path, kind, index } => Self::apply_add(tree, path, *kind, *index, ids),

            Mutation::UpdateBlock { block_id, content, styles } => {
                Self::apply_update(tree, block_id, content, styles.as_ref())
            }

            Mutation::RemoveBlock { block_id } => Self::apply_remove(tree, block_id),

            Mutation::MoveBlock { block_id, target_path, target_index } => {
                Self::apply_move(tree, block_id, target_path, *target_index)
            }

            Mutation::DuplicateBlock { block_id } => Self::apply_duplicate(tree, block_id, ids),

            Mutation::Paste { block, target } => Self::apply_paste(tree, block, target, ids),

            Mutation::AddSection { after } => Ok(Self::apply_add_section(tree, *after, ids)),

            Mutation::RemoveSection { section_id } => Self::apply_remove_section(tree, section_id),
        }
    }

    /// Like [`Mutation::apply`], but a mutation that cannot apply yields the
    /// input tree unchanged
    pub fn apply_or_keep(&self, tree: &Tree, ids: &mut IdGenerator) -> Tree {
        self.apply(tree, ids).unwrap_or_else(|err| {
            tracing::debug!(mutation = self.name(), %err, "mutation had no effect");
            tree.clone()
        })
    }

    /// Get a debug name for this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add_block",
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::RemoveBlock { .. } => "remove_block",
            Mutation::MoveBlock { .. } => "move_block",
            Mutation::DuplicateBlock { .. } => "duplicate_block",
            Mutation::Paste { .. } => "paste",
            Mutation::AddSection { .. } => "add_section",
            Mutation::RemoveSection { .. } => "remove_section",
        }
    }

    fn apply_add(
        tree: &Tree,
        path: &BlockPath,
        kind: BlockKind,
        index: usize,
        ids: &mut IdGenerator,
    ) -> Result<Tree, MutationError> {
        // Resolve before minting ids so a failed add consumes none
        resolve_list(tree, path).ok_or_else(|| MutationError::PathNotFound(path.to_string()))?;

        let block = Block::new(kind, ids);
        Self::insert_into(tree, path, index, block)
    }

    fn apply_update(
        tree: &Tree,
        block_id: &str,
        content: &Value,
        styles: Option<&Styles>,
    ) -> Result<Tree, MutationError> {
        let location = find_block(tree, block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let kind = location.block.kind;
        let content = BlockContent::Opaque(content.clone())
            .for_kind(kind)
            .ok_or_else(|| MutationError::KindMismatch {
                block_id: block_id.to_string(),
                kind,
            })?;

        let (path, index) = (location.path, location.index);
        let mut next = tree.clone();
        let list = Self::list_mut(&mut next, &path)?;

        let block = Arc::make_mut(&mut list[index]);
        block.content = content;
        if let Some(styles) = styles {
            block.styles = Some(styles.clone());
        }

        Ok(next)
    }

    fn apply_remove(tree: &Tree, block_id: &str) -> Result<Tree, MutationError> {
        let (path, index) = Self::locate(tree, block_id)?;

        let mut next = tree.clone();
        Self::list_mut(&mut next, &path)?.remove(index);
        Ok(next)
    }

    fn apply_move(
        tree: &Tree,
        block_id: &str,
        target_path: &BlockPath,
        target_index: usize,
    ) -> Result<Tree, MutationError> {
        let (source_path, source_index) = Self::locate(tree, block_id)?;
        let same_list = source_path == *target_path;

        if same_list && (target_index == source_index || target_index == source_index + 1) {
            return Ok(tree.clone());
        }

        let mut next = tree.clone();
        let dragged = Self::list_mut(&mut next, &source_path)?.remove(source_index);

        // Resolved after the removal: a columns block cannot be dropped into
        // its own columns because its path no longer resolves. On failure
        // `next` is dropped and the caller keeps the untouched input.
        let list = Self::list_mut(&mut next, target_path)?;
        let index = if same_list && source_index < target_index {
            target_index - 1
        } else {
            target_index
        };

        list.insert(index.min(list.len()), dragged);
        Ok(next)
    }

    fn apply_duplicate(tree: &Tree, block_id: &str, ids: &mut IdGenerator) -> Result<Tree, MutationError> {
        let location = find_block(tree, block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let copy = location.block.reidentified(ids);
        Self::insert_into(tree, &location.path, location.index + 1, copy)
    }

    fn apply_paste(
        tree: &Tree,
        block: &Block,
        target: &PasteTarget,
        ids: &mut IdGenerator,
    ) -> Result<Tree, MutationError> {
        let (path, index) = match target {
            PasteTarget::AfterBlock { block_id } => {
                let (path, index) = Self::locate(tree, block_id)?;
                (path, index + 1)
            }
            PasteTarget::At { path, index } => {
                resolve_list(tree, path).ok_or_else(|| MutationError::PathNotFound(path.to_string()))?;
                (path.clone(), *index)
            }
        };

        let copy = block.reidentified(ids);
        Self::insert_into(tree, &path, index, copy)
    }

    fn apply_add_section(tree: &Tree, after: Option<usize>, ids: &mut IdGenerator) -> Tree {
        let mut next = tree.clone();
        let sections = next.sections_mut();

        let index = after.map_or(0, |after| after.saturating_add(1)).min(sections.len());
        sections.insert(index, Arc::new(Section::new(ids)));
        next
    }

    fn apply_remove_section(tree: &Tree, section_id: &str) -> Result<Tree, MutationError> {
        let index = tree
            .section_index(section_id)
            .ok_or_else(|| MutationError::SectionNotFound(section_id.to_string()))?;

        let mut next = tree.clone();
        next.sections_mut().remove(index);
        Ok(next)
    }

    fn insert_into(tree: &Tree, path: &BlockPath, index: usize, block: Block) -> Result<Tree, MutationError> {
        let mut next = tree.clone();
        let list = Self::list_mut(&mut next, path)?;

        list.insert(index.min(list.len()), Arc::new(block));
        Ok(next)
    }

    fn locate(tree: &Tree, block_id: &str) -> Result<(BlockPath, usize), MutationError> {
        find_block(tree, block_id)
            .map(|location| (location.path, location.index))
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
    }

    fn list_mut<'a>(tree: &'a mut Tree, path: &BlockPath) -> Result<&'a mut Vec<Arc<Block>>, MutationError> {
        resolve_list_mut(tree, path).ok_or_else(|| MutationError::PathNotFound(path.to_string()))
    }
}

/// Result of applying a mutation to a document
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult {
    /// Mutation was applied; the document moved to `version`
    Applied { version: u64 },

    /// Mutation had no effect (stale id, unresolvable path, ...)
    Noop { reason: MutationError },
}

impl MutationResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationResult::Applied { .. })
    }
}
