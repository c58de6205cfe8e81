use super::resolve;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use proposal_editor::Document;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Proposal file to migrate
    pub file: PathBuf,

    /// Write the migrated record here instead of rewriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Load a proposal (upgrading the legacy flat block list) and write it back
pub fn migrate(args: MigrateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let mut ids = config.id_generator(&args.file.display().to_string());

    let mut doc = Document::load(path.clone(), &mut ids, &config.proposal_defaults())
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let target = args.output.map(|output| resolve(cwd, &output)).unwrap_or(path);
    doc.save_as(target.clone())?;

    println!(
        "  {} {} → {} ({} sections, {} blocks)",
        "✓".green(),
        args.file.display(),
        target.display(),
        doc.tree().sections().len(),
        doc.tree().block_count()
    );

    Ok(())
}
