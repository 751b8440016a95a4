use crate::config::Config;
use crate::session::{build_editor, save_document};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use stencil_variables::VARIABLE_TYPE;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// HTML file to import
    pub input: String,

    /// Output document (defaults to the input with a .json extension)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,
}

pub fn import(args: ImportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = PathBuf::from(cwd).join(&args.input);
    let html = fs::read_to_string(&input).with_context(|| format!("Cannot read {}", input.display()))?;

    let mut editor = build_editor(&config)?;
    editor.load_html(&html)?;

    if args.stdout {
        println!("{}", editor.to_json(true)?);
        return Ok(());
    }

    let output = match &args.output {
        Some(output) => PathBuf::from(cwd).join(output),
        None => input.with_extension("json"),
    };
    save_document(&editor, &output)?;

    let variables = editor.tree().nodes_of_type(VARIABLE_TYPE).len();
    println!(
        "  {} {} → {} ({} variables)",
        "✓".green(),
        args.input,
        output.display(),
        variables
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_html() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(
            dir.path().join("letter.html"),
            r#"<html><body><p>Dear <span data-entity-type="variable"><em>name</em><strong>Name</strong></span>,</p></body></html>"#,
        )
        .unwrap();

        import(
            ImportArgs {
                input: "letter.html".to_string(),
                output: None,
                stdout: false,
            },
            &cwd,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("letter.json")).unwrap()).unwrap();
        let children = &json["root"]["children"][0]["children"];
        assert_eq!(children[0]["text"], "Dear ");
        assert_eq!(children[1]["variableName"], "name");
        assert_eq!(children[1]["displayText"], "Name");
        assert_eq!(children[2]["text"], ",");
    }
}
