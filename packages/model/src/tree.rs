//! # Proposal tree snapshot
//!
//! `Tree` is the ordered list of sections. Every node below it sits behind an
//! `Arc`, so cloning a tree is shallow and two snapshots share every section
//! and block that an edit did not touch. Writers go through `Arc::make_mut`,
//! which copies a node only while another snapshot still refers to it.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::block::{Block, Column};
use crate::error::{ModelError, ModelResult};
use crate::path::{BlockPath, PATH_SEPARATOR};
use crate::section::Section;
use crate::visitor::{walk_block, walk_column, IdCollector, Visitor};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    sections: Vec<Arc<Section>>,
}

impl Tree {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections: sections.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn sections(&self) -> &[Arc<Section>] {
        &self.sections
    }

    /// Mutable access to the section list of this snapshot
    pub fn sections_mut(&mut self) -> &mut Vec<Arc<Section>> {
        &mut self.sections
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.id == section_id)
            .map(|section| section.as_ref())
    }

    pub fn section_index(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.id == section_id)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of blocks, nested ones included
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|section| section.block_count()).sum()
    }

    /// Every block and column identifier, in document order
    pub fn ids(&self) -> Vec<String> {
        let mut collector = IdCollector::default();
        collector.visit_tree(self);
        collector.ids
    }

    /// Identifiers of sections, blocks and columns
    pub fn all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sections.iter().map(|s| s.id.clone()).collect();
        ids.extend(self.ids());
        ids
    }

    /// Check the structural invariants:
    /// - block and column identifiers are unique across the tree
    /// - section identifiers are unique among sections
    /// - no identifier contains the path separator
    /// - every columns block has one layout entry per column
    ///
    /// The editor assumes these hold; loaders call this before handing a
    /// tree to it.
    pub fn validate(&self) -> ModelResult<()> {
        let mut sections = HashSet::new();
        for section in &self.sections {
            if section.id.contains(PATH_SEPARATOR) {
                return Err(ModelError::InvalidId(section.id.clone()));
            }
            if !sections.insert(section.id.as_str()) {
                return Err(ModelError::DuplicateId(section.id.clone()));
            }
        }

        let mut validator = Validator::default();
        validator.visit_tree(self);
        match validator.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct Validator {
    seen: HashSet<String>,
    error: Option<ModelError>,
}

impl Validator {
    fn claim(&mut self, id: &str) {
        if self.error.is_some() {
            return;
        }
        if id.contains(PATH_SEPARATOR) {
            self.error = Some(ModelError::InvalidId(id.to_string()));
        } else if !self.seen.insert(id.to_string()) {
            self.error = Some(ModelError::DuplicateId(id.to_string()));
        }
    }
}

impl Visitor for Validator {
    fn visit_block(&mut self, block: &Block, path: &BlockPath, _index: usize) {
        self.claim(&block.id);

        if let Some(content) = block.columns() {
            if content.layout.len() != content.columns.len() && self.error.is_none() {
                self.error = Some(ModelError::LayoutMismatch {
                    block_id: block.id.clone(),
                    layout: content.layout.len(),
                    columns: content.columns.len(),
                });
            }
        }

        walk_block(self, block, path);
    }

    fn visit_column(&mut self, column: &Column, path: &BlockPath) {
        self.claim(&column.id);
        walk_column(self, column, path);
    }
}
