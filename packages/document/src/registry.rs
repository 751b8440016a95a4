use crate::entity::InlineEntity;
use crate::error::{DocumentError, Result};
use crate::node::{LINK_TYPE, PARAGRAPH_TYPE, ROOT_TYPE, TEXT_TYPE};
use std::collections::BTreeMap;
use stencil_html::HtmlElement;

pub type JsonImport = fn(&serde_json::Value) -> Result<Box<dyn InlineEntity>>;

/// Declines with `None` when the element is not this entity's shape
pub type HtmlImport = fn(&HtmlElement) -> Option<Box<dyn InlineEntity>>;

/// Import hooks of one entity type
#[derive(Debug, Clone)]
pub struct EntityRegistration {
    pub entity_type: &'static str,
    pub import_json: JsonImport,
    /// Tags whose elements are offered to `import_html`
    pub html_tags: &'static [&'static str],
    pub import_html: HtmlImport,
    /// Higher priority hooks are tried first for the same tag
    pub html_priority: u8,
}

/// Entity types known to a document tree
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    entities: BTreeMap<&'static str, EntityRegistration>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: EntityRegistration) -> Result<()> {
        let entity_type = registration.entity_type;
        if is_builtin(entity_type) || self.entities.contains_key(entity_type) {
            return Err(DocumentError::DuplicateNodeType(entity_type.to_string()));
        }
        tracing::debug!(entity_type, "registered entity type");
        self.entities.insert(entity_type, registration);
        Ok(())
    }

    pub fn with(mut self, registration: EntityRegistration) -> Result<Self> {
        self.register(registration)?;
        Ok(self)
    }

    /// Built-in types are always registered
    pub fn has_node(&self, node_type: &str) -> bool {
        is_builtin(node_type) || self.entities.contains_key(node_type)
    }

    pub fn entity(&self, entity_type: &str) -> Option<&EntityRegistration> {
        self.entities.get(entity_type)
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entities.keys().copied()
    }

    /// HTML hooks interested in `tag`, highest priority first
    pub fn html_importers(&self, tag: &str) -> Vec<&EntityRegistration> {
        let mut importers: Vec<_> = self
            .entities
            .values()
            .filter(|registration| registration.html_tags.contains(&tag))
            .collect();
        importers.sort_by(|a, b| b.html_priority.cmp(&a.html_priority));
        importers
    }
}

fn is_builtin(node_type: &str) -> bool {
    matches!(node_type, ROOT_TYPE | PARAGRAPH_TYPE | LINK_TYPE | TEXT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{chip_registration, Chip};

    #[test]
    fn test_builtin_types_are_known() {
        let registry = NodeRegistry::new();
        assert!(registry.has_node("paragraph"));
        assert!(registry.has_node("text"));
        assert!(!registry.has_node(Chip::TYPE));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = NodeRegistry::new();
        registry.register(chip_registration()).unwrap();
        assert!(registry.has_node(Chip::TYPE));

        let err = registry.register(chip_registration()).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateNodeType(ref t) if t == Chip::TYPE));
    }

    #[test]
    fn test_builtin_name_cannot_be_registered() {
        let mut registration = chip_registration();
        registration.entity_type = "text";
        assert!(NodeRegistry::new().register(registration).is_err());
    }

    #[test]
    fn test_html_importers_by_priority() {
        fn low(_: &HtmlElement) -> Option<Box<dyn InlineEntity>> {
            None
        }

        let mut other = chip_registration();
        other.entity_type = "other";
        other.import_html = low;
        other.html_priority = 0;

        let registry = NodeRegistry::new()
            .with(other)
            .unwrap()
            .with(chip_registration())
            .unwrap();

        let importers = registry.html_importers("span");
        let order: Vec<_> = importers.iter().map(|r| r.entity_type).collect();
        assert_eq!(order, vec![Chip::TYPE, "other"]);
        assert!(registry.html_importers("div").is_empty());
    }
}
