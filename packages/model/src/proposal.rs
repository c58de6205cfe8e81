//! # Proposals
//!
//! The proposal aggregate (metadata + section tree), its persisted record
//! shape, and templates.
//!
//! ## Load-time migration
//!
//! Older records stored a flat `blocks` list instead of `sections`. When a
//! record has no sections but does have blocks, the blocks are wrapped into a
//! single new section. This happens once, in [`ProposalRecord::into_proposal`];
//! the editor itself only ever sees sectioned trees.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::block::Block;
use crate::error::ModelResult;
use crate::id_generator::IdGenerator;
use crate::section::Section;
use crate::tree::Tree;

/// Document-wide style settings; opaque to the editor
pub type GlobalStyles = BTreeMap<String, Value>;

pub const DEFAULT_PROPOSAL_NAME: &str = "Untitled Proposal";
pub const DRAFT_STATUS: &str = "draft";

pub fn default_global_styles() -> GlobalStyles {
    let mut styles = GlobalStyles::new();
    styles.insert("primaryColor".to_string(), Value::from("#4A90E2"));
    styles.insert("headingFont".to_string(), Value::from("system-ui, sans-serif"));
    styles
}

/// Values used to fill in whatever a new or incomplete record leaves out
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalDefaults {
    pub name: String,
    pub global_styles: GlobalStyles,
}

impl Default for ProposalDefaults {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROPOSAL_NAME.to_string(),
            global_styles: default_global_styles(),
        }
    }
}

/// A proposal being edited
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub status: Option<String>,
    pub sections: Tree,
    pub global_styles: GlobalStyles,
}

impl Proposal {
    /// New blank proposal: one section holding one empty rich-text block
    pub fn blank(ids: &mut IdGenerator, defaults: &ProposalDefaults) -> Self {
        Self {
            id: ids.new_id(),
            name: defaults.name.clone(),
            client_name: String::new(),
            status: None,
            sections: Tree::new(vec![Section::new(ids)]),
            global_styles: defaults.global_styles.clone(),
        }
    }

    /// New draft proposal seeded with a template's content
    pub fn from_template(template: &Template, ids: &mut IdGenerator) -> Self {
        Self {
            id: ids.new_id(),
            name: format!("{} Copy", template.name),
            client_name: String::new(),
            status: Some(DRAFT_STATUS.to_string()),
            sections: template.sections.clone(),
            global_styles: template.global_styles.clone(),
        }
    }

    /// Storage representation of this proposal
    pub fn to_record(&self) -> ProposalRecord {
        ProposalRecord {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            client_name: Some(self.client_name.clone()),
            status: self.status.clone(),
            sections: Some(self.sections.clone()),
            blocks: Some(Vec::new()),
            global_styles: Some(self.global_styles.clone()),
        }
    }
}

/// Persisted proposal, as read from or written to storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub client_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub sections: Option<Tree>,

    /// Legacy flat block list
    #[serde(default)]
    pub blocks: Option<Vec<Block>>,

    #[serde(default)]
    pub global_styles: Option<GlobalStyles>,
}

impl ProposalRecord {
    /// Build the editable proposal, migrating the legacy block list and
    /// filling defaults. Fails if the resulting tree violates an invariant.
    pub fn into_proposal(self, ids: &mut IdGenerator, defaults: &ProposalDefaults) -> ModelResult<Proposal> {
        let legacy = self.blocks.unwrap_or_default();
        let migrate = !legacy.is_empty() && self.sections.as_ref().map_or(true, Tree::is_empty);
        let fresh = self.sections.is_none() && legacy.is_empty();

        let mut sections = if migrate {
            warn!(blocks = legacy.len(), "migrating flat block list into a single section");
            Tree::new(vec![Section::with_blocks(String::new(), legacy)])
        } else {
            self.sections.unwrap_or_default()
        };

        // Nothing is minted until every loaded id is reserved
        let loaded = sections.all_ids();
        ids.reserve(self.id.iter().chain(&loaded).map(String::as_str));

        if migrate {
            if let Some(section) = sections.sections_mut().first_mut() {
                Arc::make_mut(section).id = ids.new_id();
            }
        } else if fresh {
            sections = Tree::new(vec![Section::new(ids)]);
        }

        sections.validate()?;

        Ok(Proposal {
            id: self.id.unwrap_or_else(|| ids.new_id()),
            name: self
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| defaults.name.clone()),
            client_name: self.client_name.unwrap_or_default(),
            status: self.status,
            sections,
            global_styles: self
                .global_styles
                .unwrap_or_else(|| defaults.global_styles.clone()),
        })
    }
}

/// Reusable proposal content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub sections: Tree,
    #[serde(default)]
    pub global_styles: GlobalStyles,
}

impl Template {
    /// "Save as template"
    pub fn from_proposal(name: impl Into<String>, proposal: &Proposal) -> Self {
        Self {
            name: name.into(),
            sections: proposal.sections.clone(),
            global_styles: proposal.global_styles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use serde_json::json;

    fn ids() -> IdGenerator {
        IdGenerator::from_seed("p".to_string())
    }

    #[test]
    fn test_blank_proposal() {
        let proposal = Proposal::blank(&mut ids(), &ProposalDefaults::default());

        assert_eq!(proposal.name, DEFAULT_PROPOSAL_NAME);
        assert_eq!(proposal.sections.sections().len(), 1);
        assert_eq!(proposal.sections.block_count(), 1);
        assert_eq!(proposal.global_styles["primaryColor"], json!("#4A90E2"));
    }

    #[test]
    fn test_legacy_blocks_migrate_into_one_section() {
        let record: ProposalRecord = serde_json::from_value(json!({
            "id": "prop-1",
            "name": "Website redesign",
            "client_name": null,
            "sections": null,
            "blocks": [
                { "id": "a", "type": "richText", "content": { "type": "doc" } },
                { "id": "b", "type": "spacer", "content": { "height": 10 } }
            ]
        }))
        .unwrap();

        let proposal = record.into_proposal(&mut ids(), &ProposalDefaults::default()).unwrap();
        let sections = proposal.sections.sections();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "p-1");
        let order: Vec<&str> = sections[0].blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert_eq!(proposal.client_name, "");
        assert_eq!(proposal.global_styles, default_global_styles());
    }

    #[test]
    fn test_empty_sections_with_legacy_blocks_migrate() {
        let record: ProposalRecord = serde_json::from_value(json!({
            "sections": [],
            "blocks": [{ "id": "a", "type": "divider", "content": {} }]
        }))
        .unwrap();

        let proposal = record.into_proposal(&mut ids(), &ProposalDefaults::default()).unwrap();
        assert_eq!(proposal.sections.block_count(), 1);
    }

    #[test]
    fn test_sections_win_over_legacy_blocks() {
        let record: ProposalRecord = serde_json::from_value(json!({
            "sections": [{ "id": "s", "blocks": [] }],
            "blocks": [{ "id": "a", "type": "divider", "content": {} }]
        }))
        .unwrap();

        let proposal = record.into_proposal(&mut ids(), &ProposalDefaults::default()).unwrap();
        assert_eq!(proposal.sections.sections()[0].id, "s");
        assert_eq!(proposal.sections.block_count(), 0);
    }

    #[test]
    fn test_missing_sections_get_default_content() {
        let record = ProposalRecord::default();
        let proposal = record.into_proposal(&mut ids(), &ProposalDefaults::default()).unwrap();

        assert_eq!(proposal.sections.sections().len(), 1);
        assert_eq!(proposal.name, DEFAULT_PROPOSAL_NAME);
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let record: ProposalRecord = serde_json::from_value(json!({
            "sections": [
                { "id": "s1", "blocks": [{ "id": "x", "type": "divider", "content": {} }] },
                { "id": "s2", "blocks": [{ "id": "x", "type": "divider", "content": {} }] }
            ]
        }))
        .unwrap();

        let err = record.into_proposal(&mut ids(), &ProposalDefaults::default()).unwrap_err();
        assert_eq!(err, ModelError::DuplicateId("x".to_string()));
    }

    #[test]
    fn test_record_writes_empty_legacy_list() {
        let proposal = Proposal::blank(&mut ids(), &ProposalDefaults::default());
        let value = serde_json::to_value(proposal.to_record()).unwrap();

        assert_eq!(value["blocks"], json!([]));
        assert_eq!(value["sections"][0]["blocks"][0]["type"], json!("richText"));
    }

    #[test]
    fn test_template_round_trip() {
        let proposal = Proposal::blank(&mut ids(), &ProposalDefaults::default());
        let template = Template::from_proposal("Agency", &proposal);

        let mut more = IdGenerator::from_seed("q".to_string());
        let copy = Proposal::from_template(&template, &mut more);

        assert_eq!(copy.name, "Agency Copy");
        assert_eq!(copy.status.as_deref(), Some(DRAFT_STATUS));
        assert_eq!(copy.sections, proposal.sections);
        assert_ne!(copy.id, proposal.id);
    }
}
