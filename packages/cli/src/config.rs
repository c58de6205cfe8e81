use proposal_model::{default_global_styles, GlobalStyles, IdGenerator, ProposalDefaults, DEFAULT_PROPOSAL_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "proposal.config.json";

/// How new identifiers are minted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random v4 UUIDs
    #[default]
    Uuid,

    /// `<seed>-<n>`, reproducible across runs
    Sequential,
}

/// Proposal configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Seed for sequential ids (defaults to one derived from the file name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_seed: Option<String>,

    /// Global styles for new proposals
    #[serde(default = "default_global_styles")]
    pub global_styles: GlobalStyles,

    /// Name given to new proposals
    #[serde(default = "default_name")]
    pub default_name: String,
}

fn default_name() -> String {
    DEFAULT_PROPOSAL_NAME.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Identifier source for editing `file`
    pub fn id_generator(&self, file: &str) -> IdGenerator {
        match (self.id_strategy, &self.id_seed) {
            (IdStrategy::Uuid, _) => IdGenerator::random(),
            (IdStrategy::Sequential, Some(seed)) => IdGenerator::from_seed(seed.clone()),
            (IdStrategy::Sequential, None) => IdGenerator::sequential(file),
        }
    }

    pub fn proposal_defaults(&self) -> ProposalDefaults {
        ProposalDefaults {
            name: self.default_name.clone(),
            global_styles: self.global_styles.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Uuid,
            id_seed: None,
            global_styles: default_global_styles(),
            default_name: default_name(),
        }
    }
}
