mod commands;
mod config;
mod session;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    catalog, export, import, insert, new_document, CatalogArgs, ExportArgs, ImportArgs, InsertArgs, NewArgs,
};
use tracing_subscriber::EnvFilter;

/// Stencil CLI - Templated documents with atomic variables
#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new document
    New(NewArgs),

    /// Insert a variable at the end of a document
    Insert(InsertArgs),

    /// Convert an HTML file into a document
    Import(ImportArgs),

    /// Export a document as HTML, a standalone page or JSON
    Export(ExportArgs),

    /// List catalog variables, or insert one into a document
    Catalog(CatalogArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::New(args) => new_document(args, &cwd),
                Command::Insert(args) => insert(args, &cwd),
                Command::Import(args) => import(args, &cwd),
                Command::Export(args) => export(args, &cwd),
                Command::Catalog(args) => catalog(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
