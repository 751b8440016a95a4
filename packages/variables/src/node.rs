//! # Variable Node
//!
//! A named placeholder rendered as one unit: the raw variable name and,
//! when present, a human-readable display text.
//!
//! ```text
//! JSON  {"variableName": "...", "displayText": "...", "type": "variable", "version": 1}
//! HTML  <span data-entity-type="variable"><em>name</em><strong>display</strong></span>
//! ```

use crate::error::VariableError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use stencil_document::{DocumentError, EntityRegistration, InlineEntity, Node, RenderContext};
use stencil_html::{HtmlElement, HtmlNode};

pub const VARIABLE_TYPE: &str = "variable";

/// Marker attribute on the rendered and exported element
pub const ENTITY_TYPE_ATTR: &str = "data-entity-type";

const VARIABLE_STYLE: &str = "background-color: rgba(103, 58, 183, 0.2)";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNode {
    variable_name: String,
    display_text: String,
}

/// Build a variable; the name must contain something other than whitespace
pub fn create_variable(
    variable_name: impl Into<String>,
    display_text: impl Into<String>,
) -> Result<VariableNode, VariableError> {
    let variable_name = variable_name.into();
    if variable_name.trim().is_empty() {
        return Err(VariableError::EmptyName);
    }
    Ok(VariableNode {
        variable_name,
        display_text: display_text.into(),
    })
}

impl VariableNode {
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn to_serialized(&self) -> SerializedVariableNode {
        SerializedVariableNode {
            variable_name: self.variable_name.clone(),
            display_text: Some(self.display_text.clone()),
            node_type: VARIABLE_TYPE.to_string(),
            version: VERSION,
        }
    }

    pub fn from_serialized(serialized: SerializedVariableNode) -> Result<Self, DocumentError> {
        if serialized.node_type != VARIABLE_TYPE {
            return Err(DocumentError::invalid_node(
                VARIABLE_TYPE,
                format!("unexpected type {:?}", serialized.node_type),
            ));
        }
        create_variable(serialized.variable_name, serialized.display_text.unwrap_or_default())
            .map_err(|err| DocumentError::invalid_node(VARIABLE_TYPE, err.to_string()))
    }
}

/// JSON form of a variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedVariableNode {
    pub variable_name: String,
    /// Missing or `null` reads as empty
    #[serde(default)]
    pub display_text: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    VERSION
}

impl InlineEntity for VariableNode {
    fn entity_type(&self) -> &'static str {
        VARIABLE_TYPE
    }

    fn text_content(&self) -> String {
        if self.display_text.is_empty() {
            self.variable_name.clone()
        } else {
            self.display_text.clone()
        }
    }

    fn create_dom(&self, ctx: &RenderContext<'_>) -> HtmlElement {
        let mut span = HtmlElement::new("span")
            .with_attr(ENTITY_TYPE_ATTR, VARIABLE_TYPE)
            .with_attr("style", VARIABLE_STYLE);
        span.add_class(ctx.theme.class_or("variable", "variable"));
        if ctx.selected {
            span.add_class(ctx.theme.class_or("selected", "selected"));
        }

        span.children.push(HtmlElement::new("em").with_text(&self.variable_name).into());
        if !self.display_text.is_empty() {
            span.children.push(HtmlElement::new("br").into());
            span.children.push(HtmlElement::new("strong").with_text(&self.display_text).into());
        }
        span
    }

    fn needs_dom_update(&self, previous: &dyn InlineEntity) -> bool {
        match previous.downcast_ref::<VariableNode>() {
            Some(previous) => {
                previous.variable_name != self.variable_name || previous.display_text != self.display_text
            }
            None => true,
        }
    }

    fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.to_serialized()).unwrap_or(serde_json::Value::Null)
    }

    fn export_html(&self) -> HtmlElement {
        let mut span = HtmlElement::new("span")
            .with_attr(ENTITY_TYPE_ATTR, VARIABLE_TYPE)
            .with_child(HtmlElement::new("em").with_text(&self.variable_name));
        if !self.display_text.is_empty() {
            span.children.push(HtmlElement::new("strong").with_text(&self.display_text).into());
        }
        span
    }

    fn clone_entity(&self) -> Box<dyn InlineEntity> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Import a variable from its JSON form
pub fn import_json(value: &serde_json::Value) -> Result<VariableNode, DocumentError> {
    let serialized: SerializedVariableNode = serde_json::from_value(value.clone())?;
    VariableNode::from_serialized(serialized)
}

/// Import a variable from exported HTML. Declines anything that is not a
/// marked `span` with a non-empty name.
pub fn import_html(element: &HtmlElement) -> Option<VariableNode> {
    if element.tag != "span" || element.attr(ENTITY_TYPE_ATTR) != Some(VARIABLE_TYPE) {
        return None;
    }
    let name = element.find_child(&["em", "i"])?.text_content();
    let display = element
        .find_child(&["strong", "b"])
        .map(HtmlElement::text_content)
        .unwrap_or_default();
    create_variable(name, display).ok()
}

/// Parse a single exported element, e.g. from the clipboard
pub fn from_html_str(source: &str) -> Option<VariableNode> {
    stencil_html::parse_fragment(source)
        .iter()
        .filter_map(HtmlNode::as_element)
        .find_map(import_html)
}

/// Registration of the variable entity with a document registry
pub fn registration() -> EntityRegistration {
    EntityRegistration {
        entity_type: VARIABLE_TYPE,
        import_json: |value| Ok(Box::new(import_json(value)?)),
        html_tags: &["span"],
        import_html: |element| import_html(element).map(|v| Box::new(v) as Box<dyn InlineEntity>),
        html_priority: 1,
    }
}

/// The typed view of a node, when it is a variable
pub fn as_variable(node: Option<&Node>) -> Option<&VariableNode> {
    let node = node?;
    if node.type_tag() != VARIABLE_TYPE {
        return None;
    }
    node.as_entity()?.downcast_ref::<VariableNode>()
}

pub fn is_variable(node: Option<&Node>) -> bool {
    as_variable(node).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use stencil_document::{DocumentTree, NodeKey, NodeKind, Theme};

    fn render(variable: &VariableNode, selected: bool) -> HtmlElement {
        let theme = Theme::default();
        variable.create_dom(&RenderContext {
            key: "1".parse::<NodeKey>().unwrap(),
            selected,
            theme: &theme,
        })
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert_eq!(create_variable("", "x"), Err(VariableError::EmptyName));
        assert_eq!(create_variable("  \t", "x"), Err(VariableError::EmptyName));
        assert!(create_variable("x", "").is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let pairs = [
            ("{{ customer.name }}", "Customer Name"),
            ("total", ""),
            ("é ✓ 名前", "Ünïcode"),
        ];
        for (name, display) in pairs {
            let variable = create_variable(name, display).unwrap();
            let restored = import_json(&variable.export_json()).unwrap();
            assert_eq!(restored, variable);
        }
    }

    #[test]
    fn test_json_shape() {
        let variable = create_variable("{{ customer.name }}", "Customer Name").unwrap();
        assert_eq!(
            variable.export_json(),
            json!({
                "variableName": "{{ customer.name }}",
                "displayText": "Customer Name",
                "type": "variable",
                "version": 1
            })
        );
    }

    #[test]
    fn test_json_import_errors() {
        let missing_display = import_json(&json!({"variableName": "a", "type": "variable"})).unwrap();
        assert_eq!(missing_display.display_text(), "");
        let null_display =
            import_json(&json!({"variableName": "a", "displayText": null, "type": "variable", "version": 1})).unwrap();
        assert_eq!(null_display.display_text(), "");

        assert!(import_json(&json!({"variableName": "", "type": "variable"})).is_err());
        assert!(import_json(&json!({"variableName": "a", "type": "text"})).is_err());
        assert!(import_json(&json!({"name": "a", "type": "variable"})).is_err());
        assert!(import_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_html_round_trip() {
        for (name, display) in [("amount", "Total <amount>"), ("code", "")] {
            let variable = create_variable(name, display).unwrap();
            let html = stencil_html::element_to_html(&variable.export_html());
            assert_eq!(from_html_str(&html), Some(variable));
        }
    }

    #[test]
    fn test_html_export_shape() {
        let variable = create_variable("first_name", "First name").unwrap();
        assert_eq!(
            stencil_html::element_to_html(&variable.export_html()),
            r#"<span data-entity-type="variable"><em>first_name</em><strong>First name</strong></span>"#
        );
        let bare = create_variable("first_name", "").unwrap();
        assert_eq!(
            stencil_html::element_to_html(&bare.export_html()),
            r#"<span data-entity-type="variable"><em>first_name</em></span>"#
        );
    }

    #[test]
    fn test_html_import_declines() {
        assert_eq!(from_html_str("<span><em>a</em></span>"), None);
        assert_eq!(from_html_str(r#"<span data-entity-type="variable"></span>"#), None);
        assert_eq!(from_html_str(r#"<span data-entity-type="variable"><em> </em></span>"#), None);
        assert_eq!(from_html_str(r#"<div data-entity-type="variable"><em>a</em></div>"#), None);
    }

    #[test]
    fn test_html_import_accepts_i_and_b() {
        let variable = from_html_str(r#"<span data-entity-type="variable"><i>sku</i><b>SKU</b></span>"#).unwrap();
        assert_eq!(variable.variable_name(), "sku");
        assert_eq!(variable.display_text(), "SKU");
    }

    #[test]
    fn test_render() {
        let variable = create_variable("city", "City").unwrap();
        let element = render(&variable, false);
        assert_eq!(
            stencil_html::element_to_html(&element),
            r#"<span class="variable" data-entity-type="variable" style="background-color: rgba(103, 58, 183, 0.2)"><em>city</em><br><strong>City</strong></span>"#
        );
        assert!(!element.has_class("selected"));
        assert!(render(&variable, true).has_class("selected"));

        let bare = render(&create_variable("city", "").unwrap(), false);
        assert_eq!(bare.children.len(), 1);
    }

    #[test]
    fn test_needs_dom_update() {
        let a = create_variable("a", "A").unwrap();
        assert!(!a.needs_dom_update(&a.clone()));
        assert!(!a.needs_dom_update(&a.clone()));
        assert!(a.needs_dom_update(&create_variable("a", "B").unwrap()));
        assert!(a.needs_dom_update(&create_variable("b", "A").unwrap()));
    }

    #[test]
    fn test_type_discriminator() {
        let mut tree = DocumentTree::new();
        let p = tree.append(tree.root(), NodeKind::paragraph()).unwrap();
        let text = tree.append(p, NodeKind::text("plain")).unwrap();
        let constructed = tree
            .append(p, NodeKind::entity(create_variable("a", "").unwrap()))
            .unwrap();
        let from_json = tree
            .append(p, NodeKind::entity(import_json(&json!({"variableName": "b", "type": "variable"})).unwrap()))
            .unwrap();
        let from_html = tree
            .append(p, NodeKind::entity(from_html_str(r#"<span data-entity-type="variable"><em>c</em></span>"#).unwrap()))
            .unwrap();

        assert!(is_variable(tree.get(constructed)));
        assert!(is_variable(tree.get(from_json)));
        assert!(is_variable(tree.get(from_html)));
        assert!(!is_variable(tree.get(text)));
        assert!(!is_variable(tree.get(p)));
        assert!(!is_variable(None));

        assert_eq!(as_variable(tree.get(from_json)).map(VariableNode::variable_name), Some("b"));
    }
}
