use crate::config::Config;
use crate::session::open_document;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use stencil_editor::{export_html_page, ExportView};
use stencil_html::SerializeOptions;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document to export
    pub path: String,

    /// Output format (html, page, json)
    #[arg(short, long, default_value = "html")]
    pub format: String,

    /// Use the print view for pages
    #[arg(long)]
    pub print: bool,

    /// Page title
    #[arg(long)]
    pub title: Option<String>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = PathBuf::from(cwd).join(&args.path);
    let editor = open_document(&path, &config)?;

    let content = render(&args, &config, &editor)?;

    match &args.output {
        Some(output) => {
            let output_path = PathBuf::from(cwd).join(output);
            fs::write(&output_path, &content).with_context(|| format!("Cannot write {}", output_path.display()))?;
            println!("  {} {} → {}", "✓".green(), args.path, output);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn render(args: &ExportArgs, config: &Config, editor: &stencil_editor::Editor) -> Result<String> {
    match args.format.as_str() {
        "json" => Ok(editor.to_json(args.pretty)?),
        "html" => {
            let options = if args.pretty {
                SerializeOptions::pretty()
            } else {
                SerializeOptions::default()
            };
            Ok(editor.to_html(&options))
        }
        "page" => {
            let view = if args.print {
                ExportView::print()
            } else {
                config.editor.export_view.clone()
            };
            let title = args.title.as_deref().unwrap_or(&args.path);
            Ok(export_html_page(editor, &view, title))
        }
        other => Err(anyhow!("Unknown format: {}. Use: html, page, or json", other)),
    }
}
