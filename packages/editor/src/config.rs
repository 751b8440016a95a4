use crate::errors::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stencil_document::Theme;

pub const DEFAULT_CONFIG_NAME: &str = "stencil.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Name used in logs and on the rendered root element
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_true")]
    pub editable: bool,

    /// The embedding context supplies the initial document; `initialState`
    /// is ignored by [`crate::Editor::bootstrap`]
    #[serde(default)]
    pub skip_bootstrap: bool,

    /// JSON document loaded on bootstrap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<serde_json::Value>,

    #[serde(default = "default_theme")]
    pub theme: Theme,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub export_view: ExportView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of undo steps (0 = unlimited)
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,
}

/// Presentation of a standalone exported page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub full_height: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub disable_resize: bool,
}

impl ExportView {
    /// The view used for printing: white, full height, frozen
    pub fn print() -> Self {
        Self {
            background_color: Some("white".to_string()),
            full_height: true,
            read_only: true,
            disable_resize: true,
        }
    }
}

fn default_namespace() -> String {
    "stencil".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_levels() -> usize {
    100
}

fn default_theme() -> Theme {
    Theme::default().with_class("variable", "variable")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_levels: default_max_levels(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            editable: true,
            skip_bootstrap: false,
            initial_state: None,
            theme: default_theme(),
            history: HistoryConfig::default(),
            export_view: ExportView::default(),
        }
    }
}

impl EditorConfig {
    /// Load `stencil.config.json` from a directory, or defaults if absent
    pub fn load(dir: &Path) -> Result<Self, EditorError> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        if config.namespace.trim().is_empty() {
            return Err(EditorError::Config("namespace must not be empty".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "namespace": "letters",
            "editable": false,
            "skipBootstrap": true,
            "theme": { "variable": "merge-field", "selected": "is-selected" },
            "history": { "maxLevels": 10 },
            "exportView": { "backgroundColor": "white", "fullHeight": true }
        }"#;

        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.namespace, "letters");
        assert!(!config.editable);
        assert!(config.skip_bootstrap);
        assert_eq!(config.theme.class("variable"), Some("merge-field"));
        assert_eq!(config.history.max_levels, 10);
        assert_eq!(config.export_view.background_color.as_deref(), Some("white"));
        assert!(config.export_view.full_height);
        assert!(!config.export_view.read_only);
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(config.editable);
        assert!(!config.skip_bootstrap);
        assert_eq!(config.history.max_levels, 100);
        assert_eq!(config.theme.class("selected"), Some("selected"));
    }

    #[test]
    fn test_empty_namespace_is_rejected() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"namespace": " "}"#),
            Err(EditorError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{"namespace": "invoices"}"#,
        )
        .unwrap();
        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config.namespace, "invoices");
    }
}
