use crate::config::Config;
use crate::session::{open_document, save_document};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use stencil_variables::{InsertVariable, INSERT_VARIABLE_COMMAND};

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Document to edit
    pub path: String,

    /// Variable name, e.g. "{{ customer.name }}"
    pub value: String,

    /// Human-readable label shown under the name
    #[arg(short, long, default_value = "")]
    pub display: String,

    /// Output to stdout instead of saving the document
    #[arg(long)]
    pub stdout: bool,
}

pub fn insert(args: InsertArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = PathBuf::from(cwd).join(&args.path);
    let mut editor = open_document(&path, &config)?;

    if !editor.is_editable() {
        return Err(anyhow!("{} is opened read-only (editable: false)", args.path));
    }

    let payload = InsertVariable::new(&args.value, &args.display);
    if !editor.dispatch_command(&INSERT_VARIABLE_COMMAND, &payload) {
        return Err(anyhow!("Variable {:?} was not inserted", args.value));
    }

    if args.stdout {
        println!("{}", editor.to_json(true)?);
    } else {
        save_document(&editor, &path)?;
        println!("  {} Inserted {} into {}", "✓".green(), args.value.bright_white(), args.path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new::{new_document, NewArgs};
    use stencil_editor::DEFAULT_CONFIG_NAME;

    fn setup() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        new_document(
            NewArgs {
                path: "doc.json".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();
        (dir, cwd)
    }

    fn args(value: &str) -> InsertArgs {
        InsertArgs {
            path: "doc.json".to_string(),
            value: value.to_string(),
            display: "Customer Name".to_string(),
            stdout: false,
        }
    }

    #[test]
    fn test_insert_variable() {
        let (dir, cwd) = setup();
        insert(args("{{ customer.name }}"), &cwd).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("doc.json")).unwrap()).unwrap();
        assert_eq!(
            json["root"]["children"][0]["children"][0],
            serde_json::json!({
                "variableName": "{{ customer.name }}",
                "displayText": "Customer Name",
                "type": "variable",
                "version": 1
            })
        );
    }

    #[test]
    fn test_empty_name_fails() {
        let (_dir, cwd) = setup();
        assert!(insert(args(" "), &cwd).is_err());
    }

    #[test]
    fn test_read_only_fails() {
        let (dir, cwd) = setup();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"editable": false}"#).unwrap();
        assert!(insert(args("x"), &cwd).is_err());
    }
}
