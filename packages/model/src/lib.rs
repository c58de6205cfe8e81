//! # Proposal Model
//!
//! Data shapes of a proposal document:
//!
//! ```text
//! Proposal
//!  └─ Tree (sections)
//!      └─ Section ─ blocks: [Block]
//!                     └─ columns block ─ columns: [Column]
//!                                          └─ blocks: [Block]
//! ```
//!
//! Plus the pieces every consumer of that shape needs: block paths, identifier
//! generation, tree traversal, invariant checks and the persisted record
//! format with its legacy migration. Editing lives in `proposal-editor`.

pub mod block;
pub mod error;
pub mod id_generator;
pub mod path;
pub mod proposal;
pub mod section;
pub mod tree;
pub mod visitor;

pub use block::{Block, BlockContent, BlockKind, Column, ColumnsContent, Styles};
pub use error::{ModelError, ModelResult};
pub use id_generator::{get_seed, IdGenerator};
pub use path::{BlockPath, ColumnStep, PATH_SEPARATOR};
pub use proposal::{
    default_global_styles, GlobalStyles, Proposal, ProposalDefaults, ProposalRecord, Template,
    DEFAULT_PROPOSAL_NAME, DRAFT_STATUS,
};
pub use section::Section;
pub use tree::Tree;
pub use visitor::{walk_block, walk_column, walk_section, walk_tree, IdCollector, Visitor};
