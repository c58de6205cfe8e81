//! # Block paths
//!
//! A path addresses one block *list* in the tree:
//!
//! ```text
//! sectionId                          the section's own blocks
//! sectionId.columnsId.1              column 1 of block `columnsId` in that section
//! sectionId.columnsId.1.innerId.0    column 0 of a columns block inside that column
//! ```
//!
//! Paths cross the UI boundary as dotted strings; they are parsed once into a
//! [`BlockPath`] and compared structurally from then on. Section, block and
//! column ids therefore never contain [`PATH_SEPARATOR`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub const PATH_SEPARATOR: char = '.';

/// Descent from a list into one column of a columns block living in it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnStep {
    pub block_id: String,
    pub column: usize,
}

/// Parsed structural address of a block list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockPath {
    pub section_id: String,
    pub steps: Vec<ColumnStep>,
}

impl BlockPath {
    /// Path of a section's top-level block list
    pub fn section(section_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            steps: Vec::new(),
        }
    }

    /// Path of column `column` of the columns block `block_id` living in this list
    pub fn column(&self, block_id: impl Into<String>, column: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(ColumnStep {
            block_id: block_id.into(),
            column,
        });

        Self {
            section_id: self.section_id.clone(),
            steps,
        }
    }

    /// Column nesting depth (0 for a section list)
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn is_section(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromStr for BlockPath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(PATH_SEPARATOR);

        let section_id = match parts.next() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(ModelError::EmptyPath),
        };

        let mut steps = Vec::new();
        while let Some(block_id) = parts.next() {
            let index = parts
                .next()
                .ok_or_else(|| ModelError::DanglingStep(block_id.to_string()))?;
            let column = index
                .parse::<usize>()
                .map_err(|_| ModelError::InvalidColumnIndex(index.to_string()))?;

            steps.push(ColumnStep {
                block_id: block_id.to_string(),
                column,
            });
        }

        Ok(Self { section_id, steps })
    }
}

impl TryFrom<String> for BlockPath {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BlockPath> for String {
    fn from(path: BlockPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.section_id)?;
        for step in &self.steps {
            write!(f, ".{}.{}", step.block_id, step.column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_path() {
        let path: BlockPath = "sec1".parse().unwrap();
        assert_eq!(path, BlockPath::section("sec1"));
        assert!(path.is_section());
    }

    #[test]
    fn test_parse_column_path() {
        let path: BlockPath = "sec1.colBlk1.0".parse().unwrap();
        assert_eq!(path, BlockPath::section("sec1").column("colBlk1", 0));
        assert_eq!(path.depth(), 1);
        assert_eq!(path.to_string(), "sec1.colBlk1.0");
    }

    #[test]
    fn test_parse_nested_column_path() {
        let path: BlockPath = "s.a.1.b.0".parse().unwrap();
        assert_eq!(path.depth(), 2);
        assert_eq!(path.steps[1].block_id, "b");
        assert_eq!(path.to_string(), "s.a.1.b.0");
    }

    #[test]
    fn test_malformed_paths() {
        assert_eq!("".parse::<BlockPath>(), Err(ModelError::EmptyPath));
        assert_eq!(
            "sec.blk".parse::<BlockPath>(),
            Err(ModelError::DanglingStep("blk".to_string()))
        );
        assert_eq!(
            "sec.blk.x".parse::<BlockPath>(),
            Err(ModelError::InvalidColumnIndex("x".to_string()))
        );
        assert!("sec.blk.-1".parse::<BlockPath>().is_err());
    }

    #[test]
    fn test_path_serializes_as_string() {
        let path = BlockPath::section("s").column("c", 1);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"s.c.1\"");

        let back: BlockPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
