//! Minimal entity used by this crate's tests

use crate::entity::{InlineEntity, RenderContext};
use crate::error::{DocumentError, Result};
use crate::registry::EntityRegistration;
use serde_json::json;
use std::any::Any;
use stencil_html::HtmlElement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
}

impl Chip {
    pub const TYPE: &'static str = "chip";

    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

impl InlineEntity for Chip {
    fn entity_type(&self) -> &'static str {
        Self::TYPE
    }

    fn text_content(&self) -> String {
        format!("[{}]", self.label)
    }

    fn create_dom(&self, ctx: &RenderContext<'_>) -> HtmlElement {
        let mut element = HtmlElement::new("span").with_text(&self.label);
        if ctx.selected {
            element.add_class(ctx.theme.class_or("selected", "selected"));
        }
        element
    }

    fn needs_dom_update(&self, previous: &dyn InlineEntity) -> bool {
        previous.downcast_ref::<Chip>() != Some(self)
    }

    fn export_json(&self) -> serde_json::Value {
        json!({ "type": Self::TYPE, "version": 1, "label": self.label })
    }

    fn export_html(&self) -> HtmlElement {
        HtmlElement::new("span").with_attr("data-chip", &self.label)
    }

    fn clone_entity(&self) -> Box<dyn InlineEntity> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn import_json(value: &serde_json::Value) -> Result<Box<dyn InlineEntity>> {
    let label = value
        .get("label")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DocumentError::invalid_node(Chip::TYPE, "missing label"))?;
    Ok(Box::new(Chip::new(label)))
}

fn import_html(element: &HtmlElement) -> Option<Box<dyn InlineEntity>> {
    let label = element.attr("data-chip")?;
    Some(Box::new(Chip::new(label)))
}

pub fn chip_registration() -> EntityRegistration {
    EntityRegistration {
        entity_type: Chip::TYPE,
        import_json,
        html_tags: &["span"],
        import_html,
        html_priority: 1,
    }
}
