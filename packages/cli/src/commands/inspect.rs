use super::resolve;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use proposal_editor::Document;
use proposal_model::{walk_block, walk_column, walk_section, Block, BlockPath, Column, Section, Tree, Visitor};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Proposal file to inspect
    pub file: PathBuf,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let mut ids = config.id_generator(&args.file.display().to_string());

    let doc = Document::load(path.clone(), &mut ids, &config.proposal_defaults())
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let proposal = doc.proposal();

    println!("{} {}", proposal.name.bright_white().bold(), format!("({})", proposal.id).dimmed());
    if !proposal.client_name.is_empty() {
        println!("Client: {}", proposal.client_name);
    }
    if let Some(status) = &proposal.status {
        println!("Status: {}", status);
    }
    println!(
        "{} sections, {} blocks",
        doc.tree().sections().len(),
        doc.tree().block_count()
    );
    println!();

    for line in outline(doc.tree()) {
        println!("{}", line);
    }

    Ok(())
}

/// Indented section / column / block listing, with the path of every list
pub fn outline(tree: &Tree) -> Vec<String> {
    let mut outline = Outline::default();
    outline.visit_tree(tree);
    outline.lines
}

#[derive(Default)]
struct Outline {
    lines: Vec<String>,
}

impl Outline {
    fn push(&mut self, depth: usize, text: String) {
        self.lines.push(format!("{}{}", "  ".repeat(depth), text));
    }
}

impl Visitor for Outline {
    fn visit_section(&mut self, section: &Section) {
        self.push(0, format!("section {}", section.id.cyan()));
        if section.blocks.is_empty() {
            self.push(1, "(empty)".dimmed().to_string());
        }
        walk_section(self, section);
    }

    fn visit_block(&mut self, block: &Block, path: &BlockPath, index: usize) {
        let depth = 1 + path.depth() * 2;
        self.push(depth, format!("{} {} {}", index, block.kind.to_string().yellow(), block.id));
        walk_block(self, block, path);
    }

    fn visit_column(&mut self, column: &Column, path: &BlockPath) {
        let depth = path.depth() * 2;
        self.push(depth, format!("column {} [{}]", column.id, path.to_string().green()));
        if column.blocks.is_empty() {
            self.push(depth + 1, "(empty)".dimmed().to_string());
        }
        walk_column(self, column, path);
    }
}
