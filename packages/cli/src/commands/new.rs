use super::resolve;
use crate::config::Config;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use proposal_editor::Document;
use proposal_model::Proposal;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Proposal file to create
    pub file: PathBuf,

    /// Proposal name (defaults to the configured default name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Client name
    #[arg(short, long)]
    pub client: Option<String>,
}

/// Write a blank proposal to a new file
pub fn create(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);

    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let mut ids = config.id_generator(&args.file.display().to_string());
    let mut proposal = Proposal::blank(&mut ids, &config.proposal_defaults());
    if let Some(name) = args.name {
        proposal.name = name;
    }
    if let Some(client) = args.client {
        proposal.client_name = client;
    }

    let mut doc = Document::create(path, proposal);
    doc.save()?;

    println!(
        "  {} Created {} ({})",
        "✓".green(),
        args.file.display(),
        doc.proposal().name.bright_white()
    );

    Ok(())
}
