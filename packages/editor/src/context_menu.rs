//! Context menu state: `Closed → Open(context) → Closed`

use proposal_model::BlockPath;
use serde::{Deserialize, Serialize};

/// What the menu was opened on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MenuContext {
    /// A block (right-click on the block itself)
    Block { id: String },

    /// An empty drop area: position `index` of the list at `path`
    Dropzone { path: BlockPath, index: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ContextMenu {
    #[default]
    Closed,
    Open(MenuContext),
}

/// Which menu entries are enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuActions {
    pub copy: bool,
    pub paste: bool,
    pub duplicate: bool,
    pub delete: bool,
}

impl ContextMenu {
    pub fn context(&self) -> Option<&MenuContext> {
        match self {
            ContextMenu::Closed => None,
            ContextMenu::Open(context) => Some(context),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ContextMenu::Open(_))
    }

    /// Enabled entries given the current context and clipboard state
    pub fn actions(&self, clipboard_full: bool) -> MenuActions {
        let on_block = matches!(self.context(), Some(MenuContext::Block { .. }));

        MenuActions {
            copy: on_block,
            paste: self.is_open() && clipboard_full,
            duplicate: on_block,
            delete: on_block,
        }
    }
}
