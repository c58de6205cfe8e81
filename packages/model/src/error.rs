//! Error types for the proposal model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Empty path")]
    EmptyPath,

    #[error("Path step for block {0} is missing a column index")]
    DanglingStep(String),

    #[error("Invalid column index in path: {0}")]
    InvalidColumnIndex(String),

    #[error("Unknown block type: {0}")]
    UnknownBlockKind(String),

    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    #[error("Identifier {0} contains the path separator")]
    InvalidId(String),

    #[error("Columns block {block_id} has {layout} layout entries but {columns} columns")]
    LayoutMismatch {
        block_id: String,
        layout: usize,
        columns: usize,
    },

    #[error("Block {block_id} of type {kind} carries mismatched content")]
    ContentMismatch { block_id: String, kind: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
