use crate::block::{Block, Column};
use crate::path::BlockPath;
use crate::section::Section;
use crate::tree::Tree;

/// Visitor pattern for traversing a proposal tree
///
/// Default implementations walk the entire tree, columns at every depth.
/// Blocks and columns are visited together with the path of the list that
/// holds them; override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_tree(&mut self, tree: &Tree) {
        walk_tree(self, tree);
    }

    fn visit_section(&mut self, section: &Section) {
        walk_section(self, section);
    }

    fn visit_block(&mut self, block: &Block, path: &BlockPath, _index: usize) {
        walk_block(self, block, path);
    }

    /// `path` is the path of the column's own block list
    fn visit_column(&mut self, column: &Column, path: &BlockPath) {
        walk_column(self, column, path);
    }
}

pub fn walk_tree<V: Visitor>(visitor: &mut V, tree: &Tree) {
    for section in tree.sections() {
        visitor.visit_section(section);
    }
}

pub fn walk_section<V: Visitor>(visitor: &mut V, section: &Section) {
    let path = BlockPath::section(section.id.clone());
    for (index, block) in section.blocks.iter().enumerate() {
        visitor.visit_block(block, &path, index);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block, path: &BlockPath) {
    let Some(content) = block.columns() else {
        // Leaf block, no children to walk
        return;
    };

    for (index, column) in content.columns.iter().enumerate() {
        let column_path = path.column(block.id.clone(), index);
        visitor.visit_column(column, &column_path);
    }
}

pub fn walk_column<V: Visitor>(visitor: &mut V, column: &Column, path: &BlockPath) {
    for (index, block) in column.blocks.iter().enumerate() {
        visitor.visit_block(block, path, index);
    }
}

/// Collects every block and column identifier in visit order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_block(&mut self, block: &Block, path: &BlockPath, _index: usize) {
        self.ids.push(block.id.clone());
        walk_block(self, block, path);
    }

    fn visit_column(&mut self, column: &Column, path: &BlockPath) {
        self.ids.push(column.id.clone());
        walk_column(self, column, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::id_generator::IdGenerator;
    use std::sync::Arc;

    /// Records the path of every visited block
    #[derive(Default)]
    struct PathRecorder {
        seen: Vec<(String, String, usize)>,
    }

    impl Visitor for PathRecorder {
        fn visit_block(&mut self, block: &Block, path: &BlockPath, index: usize) {
            self.seen.push((block.id.clone(), path.to_string(), index));
            walk_block(self, block, path);
        }
    }

    #[test]
    fn test_walk_reports_paths_and_indices() {
        let mut ids = IdGenerator::from_seed("v".to_string());
        let mut columns = Block::with_content(
            "cols",
            BlockKind::Columns,
            BlockKind::Columns.default_content(&mut ids),
        );
        columns.columns_mut().unwrap().columns[1]
            .blocks
            .push(Arc::new(Block::with_content("inner", BlockKind::Divider, serde_json::json!({}))));

        let tree = Tree::new(vec![Section::with_blocks(
            "s",
            vec![Block::with_content("a", BlockKind::Html, serde_json::json!({})), columns],
        )]);

        let mut recorder = PathRecorder::default();
        recorder.visit_tree(&tree);

        assert_eq!(
            recorder.seen,
            vec![
                ("a".to_string(), "s".to_string(), 0),
                ("cols".to_string(), "s".to_string(), 1),
                ("inner".to_string(), "s.cols.1".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_id_collector_includes_columns() {
        let mut ids = IdGenerator::from_seed("v".to_string());
        let columns = Block::new(BlockKind::Columns, &mut ids);
        let tree = Tree::new(vec![Section::with_blocks("s", vec![columns])]);

        let mut collector = IdCollector::default();
        collector.visit_tree(&tree);

        assert_eq!(collector.ids, vec!["v-1", "v-2", "v-3"]);
    }
}
