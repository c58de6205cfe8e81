//! # Edit Session Management
//!
//! An EditSession is one user's editing state around a document: the
//! identifier source, the selected block, the single clipboard slot and the
//! context menu. Its methods are the handlers the UI calls.
//!
//! Selection and clipboard never alias the tree. The clipboard holds a
//! detached deep copy; the selection holds only an id and resolves to no
//! block once that id has left the tree.

use proposal_model::{Block, BlockKind, BlockPath, IdGenerator, Proposal, Styles, Tree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::context_menu::{ContextMenu, MenuActions, MenuContext};
use crate::id_resolver::find_block;
use crate::mutations::{Mutation, MutationError, MutationResult, PasteTarget};
use crate::Document;

pub const REMOVE_SECTION_PROMPT: &str = "Are you sure you want to delete this section?";

/// User confirmation for destructive actions
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Every UI handler as data, for scripted or replayed edits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Action {
    AddBlock {
        path: BlockPath,
        kind: BlockKind,
        index: usize,
    },
    UpdateBlock {
        block_id: String,
        content: Value,
        #[serde(default)]
        styles: Option<Styles>,
    },
    RemoveBlock {
        block_id: String,
    },
    MoveBlock {
        block_id: String,
        target_path: BlockPath,
        target_index: usize,
    },
    DuplicateBlock {
        block_id: String,
    },
    Copy {
        block_id: String,
    },
    Paste {
        target: PasteTarget,
    },
    AddSection {
        #[serde(default)]
        after: Option<usize>,
    },
    RemoveSection {
        section_id: String,
    },
    Select {
        block_id: String,
    },
    ClearSelection,
    DeleteSelected,
    Rename {
        name: String,
    },
    SetClientName {
        client_name: String,
    },
}

/// Single user's edit session
pub struct EditSession {
    /// Document being edited
    pub document: Document,

    ids: IdGenerator,

    /// Currently selected block
    selected: Option<String>,

    /// Detached copy of the last copied block
    clipboard: Option<Block>,

    menu: ContextMenu,
}

impl EditSession {
    /// Create new edit session
    pub fn new(document: Document, mut ids: IdGenerator) -> Self {
        ids.reserve(document.proposal().sections.all_ids().iter().map(String::as_str));
        ids.reserve(std::iter::once(document.proposal().id.as_str()));

        Self {
            document,
            ids,
            selected: None,
            clipboard: None,
            menu: ContextMenu::Closed,
        }
    }

    pub fn tree(&self) -> &Tree {
        self.document.tree()
    }

    pub fn proposal(&self) -> &Proposal {
        self.document.proposal()
    }

    pub fn add_block(&mut self, path: &BlockPath, kind: BlockKind, index: usize) -> MutationResult {
        self.commit(Mutation::AddBlock {
            path: path.clone(),
            kind,
            index,
        })
    }

    pub fn update_block(&mut self, block_id: &str, content: Value, styles: Option<Styles>) -> MutationResult {
        self.commit(Mutation::UpdateBlock {
            block_id: block_id.to_string(),
            content,
            styles,
        })
    }

    pub fn remove_block(&mut self, block_id: &str) -> MutationResult {
        self.commit(Mutation::RemoveBlock {
            block_id: block_id.to_string(),
        })
    }

    pub fn move_block(&mut self, block_id: &str, target_path: &BlockPath, target_index: usize) -> MutationResult {
        self.commit(Mutation::MoveBlock {
            block_id: block_id.to_string(),
            target_path: target_path.clone(),
            target_index,
        })
    }

    pub fn duplicate_block(&mut self, block_id: &str) -> MutationResult {
        self.commit(Mutation::DuplicateBlock {
            block_id: block_id.to_string(),
        })
    }

    /// Put a deep copy of a block in the clipboard, replacing what was there.
    /// Returns false if the block does not exist.
    pub fn copy(&mut self, block_id: &str) -> bool {
        match find_block(self.document.tree(), block_id) {
            Some(location) => {
                self.clipboard = Some(location.block.detached());
                true
            }
            None => false,
        }
    }

    /// Insert a fresh-id copy of the clipboard. The clipboard is kept, so the
    /// same content can be pasted again.
    pub fn paste(&mut self, target: PasteTarget) -> MutationResult {
        let Some(block) = self.clipboard.clone() else {
            return MutationResult::Noop {
                reason: MutationError::ClipboardEmpty,
            };
        };

        self.commit(Mutation::Paste { block, target })
    }

    pub fn clipboard(&self) -> Option<&Block> {
        self.clipboard.as_ref()
    }

    /// Insert a new section after `after`, or first when `None`
    pub fn add_section(&mut self, after: Option<usize>) -> MutationResult {
        self.commit(Mutation::AddSection { after })
    }

    /// Remove a section and everything in it once the user confirms.
    /// Returns `None` when the user declines.
    pub fn remove_section(&mut self, section_id: &str, confirm: &mut dyn Confirm) -> Option<MutationResult> {
        if !confirm.confirm(REMOVE_SECTION_PROMPT) {
            warn!(section_id, "section removal declined");
            return None;
        }

        let result = self.commit(Mutation::RemoveSection {
            section_id: section_id.to_string(),
        });
        if result.is_applied() {
            info!(section_id, "section removed");
        }
        Some(result)
    }

    pub fn select(&mut self, block_id: &str) {
        self.selected = Some(block_id.to_string());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selected block, if it is still in the tree
    pub fn selected_block(&self) -> Option<&Block> {
        let id = self.selected.as_deref()?;
        find_block(self.document.tree(), id).map(|location| location.block.as_ref())
    }

    /// Keyboard delete: remove the selected block and clear the selection
    pub fn delete_selected(&mut self) -> Option<MutationResult> {
        let id = self.selected.take()?;
        Some(self.remove_block(&id))
    }

    pub fn open_context_menu(&mut self, context: MenuContext) {
        self.menu = ContextMenu::Open(context);
    }

    pub fn close_context_menu(&mut self) {
        self.menu = ContextMenu::Closed;
    }

    pub fn context_menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn menu_actions(&self) -> MenuActions {
        self.menu.actions(self.clipboard.is_some())
    }

    /// Copy the block the menu was opened on
    pub fn menu_copy(&mut self) -> bool {
        let copied = match self.menu_block_id() {
            Some(id) => self.copy(&id),
            None => false,
        };
        self.close_context_menu();
        copied
    }

    /// Paste after the menu's block, or into the menu's dropzone
    pub fn menu_paste(&mut self) -> Option<MutationResult> {
        let target = match self.menu.context()? {
            MenuContext::Block { id } => PasteTarget::AfterBlock { block_id: id.clone() },
            MenuContext::Dropzone { path, index } => PasteTarget::At {
                path: path.clone(),
                index: *index,
            },
        };

        let result = self.paste(target);
        self.close_context_menu();
        Some(result)
    }

    pub fn menu_duplicate(&mut self) -> Option<MutationResult> {
        let id = self.menu_block_id()?;
        let result = self.duplicate_block(&id);
        self.close_context_menu();
        Some(result)
    }

    pub fn menu_delete(&mut self) -> Option<MutationResult> {
        let id = self.menu_block_id()?;
        let result = self.remove_block(&id);
        self.close_context_menu();
        Some(result)
    }

    /// Run one action. Returns `None` for actions that do not touch the tree
    /// (copy, selection, metadata) and for declined confirmations.
    pub fn dispatch(&mut self, action: Action, confirm: &mut dyn Confirm) -> Option<MutationResult> {
        match action {
            Action::AddBlock { path, kind, index } => Some(self.add_block(&path, kind, index)),
            Action::UpdateBlock { block_id, content, styles } => Some(self.update_block(&block_id, content, styles)),
            Action::RemoveBlock { block_id } => Some(self.remove_block(&block_id)),
            Action::MoveBlock { block_id, target_path, target_index } => {
                Some(self.move_block(&block_id, &target_path, target_index))
            }
            Action::DuplicateBlock { block_id } => Some(self.duplicate_block(&block_id)),
            Action::Copy { block_id } => {
                if !self.copy(&block_id) {
                    warn!(%block_id, "copy of missing block ignored");
                }
                None
            }
            Action::Paste { target } => Some(self.paste(target)),
            Action::AddSection { after } => Some(self.add_section(after)),
            Action::RemoveSection { section_id } => self.remove_section(&section_id, confirm),
            Action::Select { block_id } => {
                self.select(&block_id);
                None
            }
            Action::ClearSelection => {
                self.clear_selection();
                None
            }
            Action::DeleteSelected => self.delete_selected(),
            Action::Rename { name } => {
                self.document.rename(name);
                None
            }
            Action::SetClientName { client_name } => {
                self.document.set_client_name(client_name);
                None
            }
        }
    }

    /// Block the menu was opened on; closes the menu when it is not on a block
    fn menu_block_id(&mut self) -> Option<String> {
        let id = match self.menu.context() {
            Some(MenuContext::Block { id }) => Some(id.clone()),
            _ => None,
        };

        if id.is_none() {
            self.close_context_menu();
        }
        id
    }

    fn commit(&mut self, mutation: Mutation) -> MutationResult {
        let result = self.document.apply(&mutation, &mut self.ids);

        if result.is_applied() {
            self.prune_selection();
        }
        result
    }

    /// Drop a selection whose block left the tree
    fn prune_selection(&mut self) {
        if let Some(id) = &self.selected {
            if find_block(self.document.tree(), id).is_none() {
                self.selected = None;
            }
        }
    }
}
