//! # Proposal Editor
//!
//! Document tree mutation engine for proposals.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: drag sources, drop targets, menus       │
//! └─────────────────────────────────────────────┘
//!                     ↓  ids, paths, indices
//! ┌─────────────────────────────────────────────┐
//! │ session: selection, clipboard, context menu │
//! │ document: current snapshot + storage        │
//! └─────────────────────────────────────────────┘
//!                     ↓  Mutation
//! ┌─────────────────────────────────────────────┐
//! │ mutations: old tree → new tree              │
//! │  - path resolver (path → block list)        │
//! │  - id resolver (id → list + index)          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots**: an edit never alters the tree it was given; it returns a
//!    new one sharing every untouched node
//! 2. **All or nothing**: an edit fully applies or leaves the tree unchanged
//! 3. **Stale references are harmless**: an unknown id or path is a no-op
//! 4. **Ids are unique**: duplicate and paste mint fresh ids for the copy and
//!    everything nested in it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use proposal_editor::{Document, EditSession, PasteTarget};
//! use proposal_model::{BlockKind, IdGenerator, ProposalDefaults};
//!
//! let mut ids = IdGenerator::random();
//! let doc = Document::load("proposal.json".into(), &mut ids, &ProposalDefaults::default())?;
//! let mut session = EditSession::new(doc, ids);
//!
//! let section = "sec1".parse()?;
//! session.add_block(&section, BlockKind::Columns, 0);
//! session.copy("intro");
//! session.paste(PasteTarget::At { path: section, index: 1 });
//!
//! session.document.save()?;
//! ```

mod context_menu;
mod document;
mod errors;
mod id_resolver;
mod mutations;
mod path_resolver;
mod session;

pub use context_menu::{ContextMenu, MenuActions, MenuContext};
pub use document::{Document, DocumentStorage};
pub use errors::EditorError;
pub use id_resolver::{contains, find_block, path_of, BlockLocation};
pub use mutations::{Mutation, MutationError, MutationResult, PasteTarget};
pub use path_resolver::{resolve_list, resolve_list_mut};
pub use session::{Action, Confirm, EditSession, REMOVE_SECTION_PROMPT};

// Re-export model types for convenience
pub use proposal_model::{Block, BlockContent, BlockKind, BlockPath, IdGenerator, Proposal, Tree};
