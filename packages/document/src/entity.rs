//! Registered atomic inline entities
//!
//! An entity is rendered and deleted as one unit. The tree never places a
//! point inside one, and character input never edits it.

use crate::key::NodeKey;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use stencil_html::HtmlElement;

/// Class names applied by node renderers, keyed by role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(BTreeMap<String, String>);

impl Default for Theme {
    fn default() -> Self {
        let mut classes = BTreeMap::new();
        classes.insert("selected".to_string(), "selected".to_string());
        Self(classes)
    }
}

impl Theme {
    pub fn class(&self, role: &str) -> Option<&str> {
        self.0.get(role).map(String::as_str)
    }

    /// Class for `role`, or `fallback` when the theme does not name one
    pub fn class_or<'a>(&'a self, role: &str, fallback: &'a str) -> &'a str {
        self.class(role).unwrap_or(fallback)
    }

    pub fn set_class(&mut self, role: impl Into<String>, class: impl Into<String>) {
        self.0.insert(role.into(), class.into());
    }

    pub fn with_class(mut self, role: impl Into<String>, class: impl Into<String>) -> Self {
        self.set_class(role, class);
        self
    }
}

/// Everything an entity needs to render itself
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub key: NodeKey,
    pub selected: bool,
    pub theme: &'a Theme,
}

pub trait InlineEntity: fmt::Debug + Any + 'static {
    /// Type tag, also the `type` field of the JSON form
    fn entity_type(&self) -> &'static str;

    fn text_content(&self) -> String;

    fn create_dom(&self, ctx: &RenderContext<'_>) -> HtmlElement;

    /// Whether a rendered view of `previous` is stale for `self`
    fn needs_dom_update(&self, previous: &dyn InlineEntity) -> bool;

    fn export_json(&self) -> serde_json::Value;

    fn export_html(&self) -> HtmlElement;

    fn clone_entity(&self) -> Box<dyn InlineEntity>;

    fn as_any(&self) -> &dyn Any;

    fn can_insert_text_before(&self) -> bool {
        false
    }

    fn can_insert_text_after(&self) -> bool {
        false
    }
}

impl Clone for Box<dyn InlineEntity> {
    fn clone(&self) -> Self {
        self.clone_entity()
    }
}

impl dyn InlineEntity {
    pub fn downcast_ref<T: InlineEntity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert_eq!(theme.class("selected"), Some("selected"));
        assert_eq!(theme.class_or("variable", "variable"), "variable");

        let theme = theme.with_class("variable", "merge-field");
        assert_eq!(theme.class_or("variable", "variable"), "merge-field");
    }

    #[test]
    fn test_theme_json() {
        let theme: Theme = serde_json::from_str(r#"{"variable": "token"}"#).unwrap();
        assert_eq!(theme.class("variable"), Some("token"));
        assert_eq!(theme.class("selected"), None);
    }
}
