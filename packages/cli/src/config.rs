use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stencil_editor::{EditorConfig, DEFAULT_CONFIG_NAME};

/// Stencil configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(flatten)]
    pub editor: EditorConfig,

    /// JSON variable catalog, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        if config.editor.namespace.trim().is_empty() {
            return Err(anyhow!("Invalid {}: namespace must not be empty", DEFAULT_CONFIG_NAME));
        }
        Ok(config)
    }

    /// Absolute path of the configured catalog
    pub fn catalog_path(&self, cwd: &str) -> Option<PathBuf> {
        self.catalog.as_ref().map(|catalog| PathBuf::from(cwd).join(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "namespace": "letters",
            "skipBootstrap": true,
            "history": { "maxLevels": 5 },
            "exportView": { "backgroundColor": "white" },
            "catalog": "variables.json"
        }"#;

        let config = Config::from_json(json).unwrap();
        assert_eq!(config.editor.namespace, "letters");
        assert!(config.editor.skip_bootstrap);
        assert_eq!(config.editor.history.max_levels, 5);
        assert_eq!(config.editor.export_view.background_color.as_deref(), Some("white"));
        assert_eq!(config.catalog.as_deref(), Some("variables.json"));
        assert_eq!(
            config.catalog_path("/work"),
            Some(PathBuf::from("/work/variables.json"))
        );
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.editor.namespace, "stencil");
        assert!(config.editor.editable);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        assert!(Config::load(&cwd).unwrap().catalog.is_none());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"namespace": ""}"#).unwrap();
        assert!(Config::load(&cwd).is_err());
    }
}
