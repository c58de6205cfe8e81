use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockKind};
use crate::id_generator::IdGenerator;

/// Top-level ordered container of blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub blocks: Vec<Arc<Block>>,
}

impl Section {
    /// New section holding one default rich-text block
    pub fn new(ids: &mut IdGenerator) -> Self {
        let id = ids.new_id();
        let block = Block::new(BlockKind::RichText, ids);
        Self::with_blocks(id, vec![block])
    }

    pub fn with_blocks(id: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            blocks: blocks.into_iter().map(Arc::new).collect(),
        }
    }

    /// Blocks in this section, nested ones included
    pub fn block_count(&self) -> usize {
        self.blocks.iter().map(|block| block.subtree_len()).sum()
    }
}
