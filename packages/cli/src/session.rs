//! Editors opened by the CLI commands

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use stencil_editor::plugins::InlineStylePlugin;
use stencil_editor::Editor;
use stencil_variables::{registration, VariablesPlugin};

/// An editor with the variable entity and all plugins registered
pub fn build_editor(config: &Config) -> Result<Editor> {
    let mut editor = Editor::new(config.editor.clone());
    editor.register_node(registration())?;
    let _variables = VariablesPlugin::register(&mut editor)?;
    let _inline_style = InlineStylePlugin::register(&mut editor);
    Ok(editor)
}

/// Open a JSON document
pub fn open_document(path: &Path, config: &Config) -> Result<Editor> {
    let mut editor = build_editor(config)?;
    let source = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    editor
        .load_json(&source)
        .with_context(|| format!("Invalid document {}", path.display()))?;
    tracing::debug!(path = %path.display(), nodes = editor.tree().len(), "opened document");
    Ok(editor)
}

pub fn save_document(editor: &Editor, path: &Path) -> Result<()> {
    let mut json = editor.to_json(true)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_variables::VARIABLE_TYPE;

    #[test]
    fn test_build_editor_registers_variables() {
        let editor = build_editor(&Config::default()).unwrap();
        assert!(editor.has_node(VARIABLE_TYPE));
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let config = Config::default();

        let editor = build_editor(&config).unwrap();
        save_document(&editor, &path).unwrap();
        let reopened = open_document(&path, &config).unwrap();
        assert_eq!(reopened.to_json_value(), editor.to_json_value());

        std::fs::write(&path, "{}").unwrap();
        assert!(open_document(&path, &config).is_err());
    }
}
