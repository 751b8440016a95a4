use crate::config::Config;
use crate::session::{open_document, save_document};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use stencil_variables::{resolve_candidates, JsonFileSource, VariableCandidate, INSERT_VARIABLE_COMMAND};

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Catalog file (overrides the config)
    pub path: Option<String>,

    /// Insert the candidate with this value into a document
    #[arg(long, requires = "document")]
    pub pick: Option<String>,

    /// Document to insert into
    #[arg(long)]
    pub document: Option<String>,
}

pub fn catalog(args: CatalogArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let catalog_path = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config
            .catalog_path(cwd)
            .ok_or_else(|| anyhow!("No catalog given and none configured"))?,
    };

    let candidates = load_candidates(catalog_path)?;

    let (Some(pick), Some(document)) = (&args.pick, &args.document) else {
        println!("{}", "📋 Variables".bright_blue().bold());
        for candidate in &candidates {
            println!("  {} → {}", candidate.value.bright_white(), candidate.display_text);
        }
        return Ok(());
    };

    let candidate = candidates
        .into_iter()
        .find(|candidate| &candidate.value == pick)
        .ok_or_else(|| anyhow!("No variable {:?} in the catalog", pick))?;

    let path = PathBuf::from(cwd).join(document);
    let mut editor = open_document(&path, &config)?;
    let value = candidate.value.clone();
    if !editor.dispatch_command(&INSERT_VARIABLE_COMMAND, &candidate.into()) {
        return Err(anyhow!("Variable {:?} was not inserted", value));
    }
    save_document(&editor, &path)?;
    println!("  {} Inserted {} into {}", "✓".green(), value.bright_white(), document);
    Ok(())
}

fn load_candidates(path: PathBuf) -> Result<Vec<VariableCandidate>> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let source = JsonFileSource::new(path);
    Ok(runtime.block_on(resolve_candidates(&source))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new::{new_document, NewArgs};
    use std::fs;
    use stencil_editor::DEFAULT_CONFIG_NAME;

    #[test]
    fn test_catalog_from_config_and_pick() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"catalog": "catalog.json"}"#).unwrap();
        fs::write(
            dir.path().join("catalog.json"),
            r#"[{"id": 1, "name": "Due Date", "brand": "Billing"}]"#,
        )
        .unwrap();
        new_document(
            NewArgs {
                path: "doc.json".to_string(),
                force: false,
            },
            &cwd,
        )
        .unwrap();

        catalog(
            CatalogArgs {
                path: None,
                pick: None,
                document: None,
            },
            &cwd,
        )
        .unwrap();

        catalog(
            CatalogArgs {
                path: None,
                pick: Some("duedate".to_string()),
                document: Some("doc.json".to_string()),
            },
            &cwd,
        )
        .unwrap();

        let content = fs::read_to_string(dir.path().join("doc.json")).unwrap();
        assert!(content.contains("\"variableName\": \"duedate\""));
        assert!(content.contains("\"displayText\": \"Billing\""));
    }

    #[test]
    fn test_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let args = CatalogArgs {
            path: None,
            pick: None,
            document: None,
        };
        assert!(catalog(args, &cwd).is_err());
    }
}
