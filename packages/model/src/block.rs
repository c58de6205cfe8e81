//! # Blocks
//!
//! A block is one content unit of a proposal. Its `type` tag comes from a
//! closed set ([`BlockKind`]); its content is opaque JSON for every kind except
//! `columns`, whose content is itself a set of parallel block lists.
//!
//! Persisted form:
//!
//! ```text
//! { "id": "...", "type": "richText", "content": {...}, "styles": { "k": "v" } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::ModelError;
use crate::id_generator::IdGenerator;

/// Presentational style overrides; never interpreted by the editor
pub type Styles = BTreeMap<String, String>;

/// Closed set of block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    RichText,
    PricingTable,
    Image,
    Video,
    Button,
    Divider,
    Quote,
    Spacer,
    Html,
    Columns,
    ImageWithText,
    Testimonial,
    Signature,
    Table,
}

impl BlockKind {
    pub const ALL: [BlockKind; 14] = [
        BlockKind::RichText,
        BlockKind::PricingTable,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Button,
        BlockKind::Divider,
        BlockKind::Quote,
        BlockKind::Spacer,
        BlockKind::Html,
        BlockKind::Columns,
        BlockKind::ImageWithText,
        BlockKind::Testimonial,
        BlockKind::Signature,
        BlockKind::Table,
    ];

    /// Wire tag, as stored in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::RichText => "richText",
            BlockKind::PricingTable => "pricingTable",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Button => "button",
            BlockKind::Divider => "divider",
            BlockKind::Quote => "quote",
            BlockKind::Spacer => "spacer",
            BlockKind::Html => "html",
            BlockKind::Columns => "columns",
            BlockKind::ImageWithText => "imageWithText",
            BlockKind::Testimonial => "testimonial",
            BlockKind::Signature => "signature",
            BlockKind::Table => "table",
        }
    }

    /// Content a freshly added block of this kind starts with
    pub fn default_content(&self, ids: &mut IdGenerator) -> BlockContent {
        let value = match self {
            BlockKind::RichText => empty_document(),
            BlockKind::PricingTable => json!([]),
            BlockKind::Image | BlockKind::Video => json!({ "url": null }),
            BlockKind::Button => json!({ "text": "Click Here", "url": "" }),
            BlockKind::Divider | BlockKind::Signature => json!({}),
            BlockKind::Quote => json!({ "text": "", "author": "" }),
            BlockKind::Spacer => json!({ "height": 48 }),
            BlockKind::Html => json!({ "html": "" }),
            BlockKind::Columns => {
                return BlockContent::Columns(ColumnsContent::even(2, ids));
            }
            BlockKind::ImageWithText => json!({ "imageUrl": null, "text": empty_document() }),
            BlockKind::Testimonial => json!({ "text": "", "author": "", "company": "" }),
            BlockKind::Table => json!({ "headers": ["Header 1"], "rows": [["Cell 1"]] }),
        };

        BlockContent::Opaque(value)
    }
}

/// Rich-text document with a single empty paragraph
fn empty_document() -> Value {
    json!({ "type": "doc", "content": [{ "type": "paragraph" }] })
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownBlockKind(s.to_string()))
    }
}

/// One column of a columns block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub blocks: Vec<Arc<Block>>,

    /// Keys the editor does not know about, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Column {
    pub fn empty(ids: &mut IdGenerator) -> Self {
        Self {
            id: ids.new_id(),
            blocks: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Content of a columns block: widths (percentages) and the columns themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsContent {
    #[serde(serialize_with = "serialize_widths")]
    pub layout: Vec<f64>,
    pub columns: Vec<Column>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whole widths are written as integers, so `[50, 50]` reads back unchanged
fn serialize_widths<S: Serializer>(widths: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(widths.iter().map(|&width| {
        if width.fract() == 0.0 && width.abs() < 1e15 {
            Value::from(width as i64)
        } else {
            Value::from(width)
        }
    }))
}

impl ColumnsContent {
    /// `count` empty columns of equal width
    pub fn even(count: usize, ids: &mut IdGenerator) -> Self {
        let width = if count == 0 { 0.0 } else { 100.0 / count as f64 };

        Self {
            layout: vec![width; count],
            columns: (0..count).map(|_| Column::empty(ids)).collect(),
            extra: Map::new(),
        }
    }
}

/// Block content
///
/// Serialized untagged. There is no `Deserialize`: content is always read as
/// raw JSON and the owning block's `type` tag decides its shape (see
/// [`BlockContent::for_kind`]), so opaque content is never reinterpreted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockContent {
    Columns(ColumnsContent),
    Opaque(Value),
}

impl BlockContent {
    /// Reinterpret this content for a block of `kind`.
    ///
    /// Returns `None` when `kind` is `columns` and the content cannot be read
    /// as columns content.
    pub fn for_kind(self, kind: BlockKind) -> Option<BlockContent> {
        match (kind, self) {
            (BlockKind::Columns, BlockContent::Columns(columns)) => Some(BlockContent::Columns(columns)),
            (BlockKind::Columns, BlockContent::Opaque(value)) => {
                serde_json::from_value(value).ok().map(BlockContent::Columns)
            }
            (_, BlockContent::Opaque(value)) => Some(BlockContent::Opaque(value)),
            (_, BlockContent::Columns(columns)) => {
                serde_json::to_value(columns).ok().map(BlockContent::Opaque)
            }
        }
    }
}

impl From<Value> for BlockContent {
    fn from(value: Value) -> Self {
        BlockContent::Opaque(value)
    }
}

/// A single content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: BlockKind,

    pub content: BlockContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Styles>,
}

impl Block {
    /// Fresh block of `kind` with its default content
    pub fn new(kind: BlockKind, ids: &mut IdGenerator) -> Self {
        Self {
            id: ids.new_id(),
            kind,
            content: kind.default_content(ids),
            styles: None,
        }
    }

    pub fn with_content(id: impl Into<String>, kind: BlockKind, content: impl Into<BlockContent>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            styles: None,
        }
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn is_columns(&self) -> bool {
        matches!(self.content, BlockContent::Columns(_))
    }

    pub fn columns(&self) -> Option<&ColumnsContent> {
        match &self.content {
            BlockContent::Columns(columns) => Some(columns),
            BlockContent::Opaque(_) => None,
        }
    }

    pub fn columns_mut(&mut self) -> Option<&mut ColumnsContent> {
        match &mut self.content {
            BlockContent::Columns(columns) => Some(columns),
            BlockContent::Opaque(_) => None,
        }
    }

    /// Number of blocks in this subtree, the block itself included
    pub fn subtree_len(&self) -> usize {
        1 + self.columns().map_or(0, |content| {
            content
                .columns
                .iter()
                .flat_map(|column| column.blocks.iter())
                .map(|block| block.subtree_len())
                .sum()
        })
    }

    /// Deep copy sharing no allocation with `self`
    pub fn detached(&self) -> Block {
        let mut copy = self.clone();
        if let BlockContent::Columns(content) = &mut copy.content {
            for column in &mut content.columns {
                column.blocks = column
                    .blocks
                    .iter()
                    .map(|block| Arc::new(block.detached()))
                    .collect();
            }
        }
        copy
    }

    /// Deep copy with a fresh identifier for this block and every column and
    /// block nested beneath it
    pub fn reidentified(&self, ids: &mut IdGenerator) -> Block {
        let mut copy = self.detached();
        copy.assign_fresh_ids(ids);
        copy
    }

    fn assign_fresh_ids(&mut self, ids: &mut IdGenerator) {
        self.id = ids.new_id();

        if let BlockContent::Columns(content) = &mut self.content {
            for column in &mut content.columns {
                column.id = ids.new_id();
                for block in &mut column.blocks {
                    Arc::make_mut(block).assign_fresh_ids(ids);
                }
            }
        }
    }
}

/// Storage shape of a block; `content` is read according to `type`
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    styles: Option<Styles>,
}

impl TryFrom<RawBlock> for Block {
    type Error = ModelError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let content = BlockContent::Opaque(raw.content)
            .for_kind(raw.kind)
            .ok_or_else(|| ModelError::ContentMismatch {
                block_id: raw.id.clone(),
                kind: raw.kind.to_string(),
            })?;

        Ok(Block {
            id: raw.id,
            kind: raw.kind,
            content,
            styles: raw.styles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_tag() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
        assert!("carousel".parse::<BlockKind>().is_err());
    }

    #[test]
    fn test_default_columns_content() {
        let mut ids = IdGenerator::from_seed("t".to_string());
        let block = Block::new(BlockKind::Columns, &mut ids);

        let content = block.columns().unwrap();
        assert_eq!(content.layout, vec![50.0, 50.0]);
        assert_eq!(content.columns.len(), 2);
        assert!(content.columns.iter().all(|c| c.blocks.is_empty()));
        assert_ne!(content.columns[0].id, content.columns[1].id);
        assert_ne!(content.columns[0].id, block.id);
    }

    #[test]
    fn test_default_table_and_rich_text() {
        let mut ids = IdGenerator::from_seed("t".to_string());

        let table = Block::new(BlockKind::Table, &mut ids);
        assert_eq!(
            table.content,
            BlockContent::Opaque(json!({ "headers": ["Header 1"], "rows": [["Cell 1"]] }))
        );

        let text = Block::new(BlockKind::RichText, &mut ids);
        assert_eq!(
            text.content,
            BlockContent::Opaque(json!({ "type": "doc", "content": [{ "type": "paragraph" }] }))
        );
    }

    #[test]
    fn test_deserialize_columns_block() {
        let json = json!({
            "id": "cols",
            "type": "columns",
            "content": {
                "layout": [30, 70],
                "columns": [
                    { "id": "c0", "blocks": [{ "id": "b1", "type": "divider", "content": {} }] },
                    { "id": "c1", "blocks": [] }
                ]
            },
            "styles": { "alignItems": "center" }
        });

        let block: Block = serde_json::from_value(json).unwrap();
        let content = block.columns().unwrap();
        assert_eq!(content.layout, vec![30.0, 70.0]);
        assert_eq!(content.columns[0].blocks[0].id, "b1");
        assert_eq!(block.styles.unwrap()["alignItems"], "center");
    }

    #[test]
    fn test_columns_content_survives_a_round_trip() {
        let json = json!({
            "id": "cols",
            "type": "columns",
            "content": {
                "layout": [50, 50],
                "gap": 24,
                "columns": [
                    { "id": "c0", "blocks": [], "background": "#fff" },
                    { "id": "c1", "blocks": [] }
                ]
            }
        });

        let block: Block = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(block.columns().unwrap().extra["gap"], 24);
        assert_eq!(serde_json::to_value(&block).unwrap(), json);

        let mut thirds = ColumnsContent::even(3, &mut IdGenerator::from_seed("t".to_string()));
        thirds.layout[0] = 33.5;
        let value = serde_json::to_value(&thirds).unwrap();
        assert_eq!(value["layout"][0], json!(33.5));
    }

    #[test]
    fn test_columns_block_with_bad_content_is_rejected() {
        let json = json!({ "id": "cols", "type": "columns", "content": { "html": "" } });
        assert!(serde_json::from_value::<Block>(json).is_err());
    }

    #[test]
    fn test_opaque_content_that_looks_like_columns_stays_opaque() {
        let json = json!({
            "id": "h",
            "type": "html",
            "content": { "layout": [], "columns": [] }
        });

        let block: Block = serde_json::from_value(json).unwrap();
        assert!(!block.is_columns());
    }

    #[test]
    fn test_serialize_omits_missing_styles() {
        let block = Block::with_content("d", BlockKind::Divider, json!({}));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value, json!({ "id": "d", "type": "divider", "content": {} }));
    }

    #[test]
    fn test_reidentified_replaces_nested_ids() {
        let mut ids = IdGenerator::from_seed("t".to_string());
        let mut block = Block::new(BlockKind::Columns, &mut ids);
        let inner = Block::new(BlockKind::Quote, &mut ids);
        block.columns_mut().unwrap().columns[0].blocks.push(Arc::new(inner.clone()));

        let copy = block.reidentified(&mut ids);
        let copy_columns = copy.columns().unwrap();

        assert_ne!(copy.id, block.id);
        assert_ne!(copy_columns.columns[0].id, block.columns().unwrap().columns[0].id);
        assert_ne!(copy_columns.columns[0].blocks[0].id, inner.id);
        assert_eq!(copy_columns.columns[0].blocks[0].content, inner.content);
        assert_eq!(copy.subtree_len(), 2);
    }

    #[test]
    fn test_detached_shares_nothing() {
        let mut ids = IdGenerator::from_seed("t".to_string());
        let mut block = Block::new(BlockKind::Columns, &mut ids);
        block.columns_mut().unwrap().columns[1]
            .blocks
            .push(Arc::new(Block::new(BlockKind::Spacer, &mut ids)));

        let copy = block.detached();
        assert_eq!(copy, block);
        assert!(!Arc::ptr_eq(
            &copy.columns().unwrap().columns[1].blocks[0],
            &block.columns().unwrap().columns[1].blocks[0]
        ));
    }
}
