//! JSON document model
//!
//! ```json
//! {"root": {"children": [...], "direction": null, "format": "", "indent": 0,
//!           "type": "root", "version": 1}}
//! ```
//!
//! Elements and text nodes use fixed shapes; entities serialize through
//! their own hooks and are imported through the [`NodeRegistry`].

use crate::error::{DocumentError, Result};
use crate::key::NodeKey;
use crate::node::{ElementKind, NodeKind, TextFormat, TextNode, LINK_TYPE, PARAGRAPH_TYPE, ROOT_TYPE, TEXT_TYPE};
use crate::registry::NodeRegistry;
use crate::tree::DocumentTree;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedDocument {
    pub root: SerializedElement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedElement {
    #[serde(default)]
    pub children: Vec<Value>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub indent: u32,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedText {
    #[serde(default)]
    pub detail: u32,
    #[serde(default)]
    pub format: u32,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub style: String,
    pub text: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    VERSION
}

fn default_mode() -> String {
    "normal".to_string()
}

impl SerializedElement {
    fn new(node_type: &str) -> Self {
        Self {
            children: Vec::new(),
            direction: None,
            format: String::new(),
            indent: 0,
            node_type: node_type.to_string(),
            version: VERSION,
            url: None,
        }
    }
}

// ---- export ----

pub fn export_document(tree: &DocumentTree) -> SerializedDocument {
    let mut root = SerializedElement::new(ROOT_TYPE);
    root.children = export_children(tree, tree.root());
    SerializedDocument { root }
}

pub fn export_json(tree: &DocumentTree) -> Value {
    serde_json::to_value(export_document(tree)).unwrap_or(Value::Null)
}

pub fn to_json_string(tree: &DocumentTree, pretty: bool) -> Result<String> {
    let document = export_document(tree);
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(json)
}

/// Serialize one node and its subtree
pub fn export_node(tree: &DocumentTree, key: NodeKey) -> Value {
    let Some(node) = tree.get(key) else {
        return Value::Null;
    };

    match node.kind() {
        NodeKind::Entity(entity) => entity.export_json(),
        NodeKind::Text(text) => to_value(SerializedText {
            detail: 0,
            format: text.format.bits(),
            mode: default_mode(),
            style: text.style.clone(),
            text: text.text.clone(),
            node_type: TEXT_TYPE.to_string(),
            version: VERSION,
        }),
        NodeKind::Element(element) => {
            let mut serialized = SerializedElement::new(node.type_tag());
            if let ElementKind::Link { url } = &element.kind {
                serialized.url = Some(url.clone());
            }
            serialized.children = export_children(tree, key);
            to_value(serialized)
        }
    }
}

fn export_children(tree: &DocumentTree, key: NodeKey) -> Vec<Value> {
    tree.children(key)
        .iter()
        .map(|child| export_node(tree, *child))
        .collect()
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ---- import ----

pub fn import_json(value: &Value, registry: &NodeRegistry) -> Result<DocumentTree> {
    let document: SerializedDocument = serde_json::from_value(value.clone())?;
    import_document(&document, registry)
}

pub fn from_json_str(json: &str, registry: &NodeRegistry) -> Result<DocumentTree> {
    let value: Value = serde_json::from_str(json)?;
    import_json(&value, registry)
}

pub fn import_document(document: &SerializedDocument, registry: &NodeRegistry) -> Result<DocumentTree> {
    if document.root.node_type != ROOT_TYPE {
        return Err(DocumentError::invalid_node(
            ROOT_TYPE,
            format!("top-level node has type {:?}", document.root.node_type),
        ));
    }

    let mut tree = DocumentTree::new();
    let root = tree.root();
    for child in &document.root.children {
        import_node(&mut tree, root, child, registry)?;
    }
    // A freshly imported document has no pending changes
    tree.take_changes();
    tracing::debug!(nodes = tree.len(), "imported JSON document");
    Ok(tree)
}

fn import_node(tree: &mut DocumentTree, parent: NodeKey, value: &Value, registry: &NodeRegistry) -> Result<()> {
    let node_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| DocumentError::invalid_node("unknown", "missing \"type\""))?;

    match node_type {
        TEXT_TYPE => {
            let text: SerializedText = serde_json::from_value(value.clone())?;
            let node = TextNode {
                text: text.text,
                format: TextFormat::from_bits_truncate(text.format),
                style: text.style,
            };
            tree.append(parent, NodeKind::Text(node))?;
        }
        PARAGRAPH_TYPE | LINK_TYPE => {
            let element: SerializedElement = serde_json::from_value(value.clone())?;
            let kind = if node_type == LINK_TYPE {
                NodeKind::link(element.url.unwrap_or_default())
            } else {
                NodeKind::paragraph()
            };
            let key = tree.append(parent, kind)?;
            for child in &element.children {
                import_node(tree, key, child, registry)?;
            }
        }
        ROOT_TYPE => {
            return Err(DocumentError::invalid_node(ROOT_TYPE, "nested root node"));
        }
        other => {
            let registration = registry
                .entity(other)
                .ok_or_else(|| DocumentError::UnknownNodeType(other.to_string()))?;
            let entity = (registration.import_json)(value)?;
            tree.append(parent, NodeKind::Entity(entity))?;
        }
    }
    Ok(())
}
