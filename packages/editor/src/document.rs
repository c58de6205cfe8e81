//! # Document Handle
//!
//! A Document holds the proposal being edited: its metadata and the current
//! tree snapshot. Documents can be:
//! - **Memory-backed**: Temporary, for testing or in-memory operations
//! - **File-backed**: JSON proposal record on disk
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Migrate → Edit → Save
//!   ↓       ↓        ↓      ↓
//! File   Proposal  Snapshots File
//! ```
//!
//! Each applied mutation replaces the tree wholesale with the snapshot the
//! mutation produced and bumps the version. Mutations that cannot apply leave
//! the document, including its version, untouched.

use std::path::{Path, PathBuf};

use proposal_model::{GlobalStyles, IdGenerator, Proposal, ProposalDefaults, ProposalRecord, Tree};
use tracing::{debug, info};

use crate::{EditorError, Mutation, MutationResult};

/// Editable proposal document
#[derive(Debug)]
pub struct Document {
    /// Current version number (increments on each applied mutation)
    pub version: u64,

    proposal: Proposal,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only (for testing, temp docs)
    Memory,

    /// File-backed JSON record
    File { path: PathBuf, dirty: bool },
}

impl Document {
    /// Wrap a proposal in a memory-backed document
    pub fn new(proposal: Proposal) -> Self {
        Self {
            version: 0,
            proposal,
            storage: DocumentStorage::Memory,
        }
    }

    /// Memory-backed document for a new blank proposal
    pub fn blank(ids: &mut IdGenerator, defaults: &ProposalDefaults) -> Self {
        Self::new(Proposal::blank(ids, defaults))
    }

    /// File-backed document that does not exist on disk yet
    pub fn create(path: PathBuf, proposal: Proposal) -> Self {
        Self {
            version: 0,
            proposal,
            storage: DocumentStorage::File { path, dirty: true },
        }
    }

    /// Parse a stored proposal record (memory-backed), migrating legacy data
    pub fn from_json(source: &str, ids: &mut IdGenerator, defaults: &ProposalDefaults) -> Result<Self, EditorError> {
        let record: ProposalRecord = serde_json::from_str(source)?;
        let proposal = record.into_proposal(ids, defaults)?;
        Ok(Self::new(proposal))
    }

    /// Load document from file (file-backed)
    pub fn load(path: PathBuf, ids: &mut IdGenerator, defaults: &ProposalDefaults) -> Result<Self, EditorError> {
        let source = std::fs::read_to_string(&path)?;
        let record: ProposalRecord = serde_json::from_str(&source)?;
        let proposal = record.into_proposal(ids, defaults)?;

        info!(path = %path.display(), sections = proposal.sections.sections().len(), "loaded proposal");

        Ok(Self {
            version: 0,
            proposal,
            storage: DocumentStorage::File { path, dirty: false },
        })
    }

    pub fn proposal(&self) -> &Proposal {
        &self.proposal
    }

    /// Current tree snapshot
    pub fn tree(&self) -> &Tree {
        &self.proposal.sections
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::Memory => None,
            DocumentStorage::File { path, .. } => Some(path),
        }
    }

    /// Apply a mutation, committing the resulting snapshot
    pub fn apply(&mut self, mutation: &Mutation, ids: &mut IdGenerator) -> MutationResult {
        match mutation.apply(&self.proposal.sections, ids) {
            Ok(tree) => {
                self.proposal.sections = tree;
                self.version += 1;
                self.mark_dirty();

                MutationResult::Applied {
                    version: self.version,
                }
            }
            Err(reason) => {
                debug!(mutation = mutation.name(), %reason, "mutation had no effect");
                MutationResult::Noop { reason }
            }
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.proposal.name = name.into();
        self.mark_dirty();
    }

    pub fn set_client_name(&mut self, client_name: impl Into<String>) {
        self.proposal.client_name = client_name.into();
        self.mark_dirty();
    }

    pub fn set_global_styles(&mut self, global_styles: GlobalStyles) {
        self.proposal.global_styles = global_styles;
        self.mark_dirty();
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory => false,
        }
    }

    /// Serialized proposal record
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.proposal.to_record())?)
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let json = self.to_json()?;

        match &mut self.storage {
            DocumentStorage::File { path, dirty } => {
                std::fs::write(&*path, json)?;
                *dirty = false;
                info!(path = %path.display(), version = self.version, "saved proposal");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }

    /// Save to a new location; the document becomes backed by that file
    pub fn save_as(&mut self, path: PathBuf) -> Result<(), EditorError> {
        self.storage = DocumentStorage::File { path, dirty: true };
        self.save()
    }

    fn mark_dirty(&mut self) {
        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MutationError;
    use proposal_model::{BlockKind, BlockPath};

    fn ids() -> IdGenerator {
        IdGenerator::from_seed("d".to_string())
    }

    #[test]
    fn test_create_memory_document() {
        let doc = Document::blank(&mut ids(), &ProposalDefaults::default());

        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert!(doc.path().is_none());
        assert_eq!(doc.tree().block_count(), 1);
    }

    #[test]
    fn test_document_version_increments_only_when_applied() {
        let mut gen = ids();
        let mut doc = Document::blank(&mut gen, &ProposalDefaults::default());
        let section_id = doc.tree().sections()[0].id.clone();

        let missed = doc.apply(&Mutation::RemoveBlock { block_id: "ghost".to_string() }, &mut gen);
        assert_eq!(
            missed,
            MutationResult::Noop {
                reason: MutationError::BlockNotFound("ghost".to_string())
            }
        );
        assert_eq!(doc.version, 0);

        let added = doc.apply(
            &Mutation::AddBlock {
                path: BlockPath::section(section_id),
                kind: BlockKind::Spacer,
                index: 1,
            },
            &mut gen,
        );
        assert_eq!(added, MutationResult::Applied { version: 1 });
        assert_eq!(doc.tree().block_count(), 2);
    }

    #[test]
    fn test_save_memory_document_fails() {
        let mut doc = Document::blank(&mut ids(), &ProposalDefaults::default());
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_from_json_migrates_legacy_blocks() {
        let source = r#"{
            "id": "p1",
            "name": "Legacy",
            "blocks": [{ "id": "a", "type": "html", "content": { "html": "<b>hi</b>" } }]
        }"#;

        let doc = Document::from_json(source, &mut ids(), &ProposalDefaults::default()).unwrap();
        assert_eq!(doc.proposal().name, "Legacy");
        assert_eq!(doc.tree().sections().len(), 1);
        assert_eq!(doc.tree().sections()[0].blocks[0].id, "a");
    }
}
