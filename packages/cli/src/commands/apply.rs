use super::resolve;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use proposal_editor::{Action, Confirm, Document, EditSession, MutationResult};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Proposal file to edit
    pub file: PathBuf,

    /// JSON file holding a list of actions
    pub script: PathBuf,

    /// Write the result here instead of rewriting the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Asks on the terminal; anything but "y" / "yes" declines
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Run a scripted list of edits through an edit session and save the result
pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let script_path = resolve(cwd, &args.script);
    let mut ids = config.id_generator(&args.file.display().to_string());

    let doc = Document::load(path.clone(), &mut ids, &config.proposal_defaults())
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read {}", script_path.display()))?;
    let actions: Vec<Action> = serde_json::from_str(&script)
        .with_context(|| format!("Invalid action script {}", script_path.display()))?;

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(|_: &str| true)
    } else {
        Box::new(TerminalConfirm)
    };

    info!(file = %path.display(), actions = actions.len(), "applying script");
    let mut session = EditSession::new(doc, ids);
    let mut applied = 0;
    let mut skipped = 0;

    for (step, action) in actions.into_iter().enumerate() {
        match session.dispatch(action, &mut *confirm) {
            Some(MutationResult::Applied { .. }) => applied += 1,
            Some(MutationResult::Noop { reason }) => {
                skipped += 1;
                println!("  {} step {}: {}", "-".yellow(), step + 1, reason);
            }
            None => {}
        }
    }

    let target = args.output.map(|output| resolve(cwd, &output)).unwrap_or(path);
    session.document.save_as(target.clone())?;

    println!(
        "  {} {} edits applied, {} skipped → {}",
        "✓".green(),
        applied,
        skipped,
        target.display()
    );

    Ok(())
}
