use crate::config::Config;
use crate::session::{build_editor, save_document};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use stencil_document::NodeKind;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Document file to create
    #[arg(default_value = "document.json")]
    pub path: String,

    /// Force overwrite an existing document
    #[arg(short, long)]
    pub force: bool,
}

pub fn new_document(args: NewArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.path);

    if path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), args.path.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::load(cwd)?;
    let mut editor = build_editor(&config)?;

    // Initial state from the config, or a single empty paragraph
    if !editor.bootstrap()? {
        editor.update(|tx| {
            let tree = tx.tree_mut();
            tree.append(tree.root(), NodeKind::paragraph())
        })??;
    }

    save_document(&editor, &path)?;
    println!("  {} Created {}", "✓".green(), args.path);
    Ok(())
}
