//! Variable catalogs
//!
//! A [`VariableSource`] lists the variables a user can insert. Fetching is
//! async and happens outside the editor; only resolved candidates are
//! handed to [`INSERT_VARIABLE_COMMAND`](crate::INSERT_VARIABLE_COMMAND).

use crate::error::SourceError;
use crate::plugin::InsertVariable;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One catalog record. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default, alias = "brand", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A variable ready to insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCandidate {
    pub value: String,
    pub display_text: String,
}

impl VariableCandidate {
    /// `value` is the lower-cased name without spaces; the display text is
    /// the label, or the name when there is none
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        let value = entry.name.to_lowercase().replace(' ', "");
        let display_text = entry.label.clone().unwrap_or_else(|| entry.name.clone());
        Self { value, display_text }
    }
}

impl From<VariableCandidate> for InsertVariable {
    fn from(candidate: VariableCandidate) -> Self {
        InsertVariable::new(candidate.value, candidate.display_text)
    }
}

#[async_trait]
pub trait VariableSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CatalogEntry>, SourceError>;
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<CatalogEntry>,
}

impl StaticSource {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl VariableSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        Ok(self.entries.clone())
    }
}

/// Catalog stored as a JSON array of entries
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VariableSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "loaded variable catalog");
        Ok(entries)
    }
}

/// Fetch a catalog and map it to insertable candidates. Entries whose
/// value would be empty are skipped.
pub async fn resolve_candidates(source: &dyn VariableSource) -> Result<Vec<VariableCandidate>, SourceError> {
    let entries = source.fetch().await?;
    let candidates: Vec<VariableCandidate> = entries
        .iter()
        .map(VariableCandidate::from_entry)
        .filter(|candidate| {
            let keep = !candidate.value.trim().is_empty();
            if !keep {
                tracing::debug!(display = %candidate.display_text, "skipping catalog entry without a name");
            }
            keep
        })
        .collect();
    Ok(candidates)
}
