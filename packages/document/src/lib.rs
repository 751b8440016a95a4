//! # Stencil Document
//!
//! The host document model: a keyed node tree with a selection, the
//! registry of atomic inline entity types, and JSON/HTML interchange.
//!
//! ## Example
//!
//! ```
//! use stencil_document::{DocumentTree, NodeKind, Point, Selection};
//!
//! let mut tree = DocumentTree::new();
//! let paragraph = tree.append(tree.root(), NodeKind::paragraph()).unwrap();
//! let text = tree.append(paragraph, NodeKind::text("Hello")).unwrap();
//!
//! tree.set_selection(Some(Selection::caret(Point::text(text, 5))));
//! tree.insert_text(", world").unwrap();
//! assert_eq!(tree.text_content(), "Hello, world");
//! ```

pub mod editing;
pub mod entity;
pub mod error;
pub mod html;
pub mod json;
pub mod key;
pub mod node;
pub mod registry;
pub mod selection;
pub mod tree;

#[cfg(test)]
mod testing;

pub use editing::InlineTarget;
pub use entity::{InlineEntity, RenderContext, Theme};
pub use error::{DocumentError, Result};
pub use key::NodeKey;
pub use node::{
    ElementKind, ElementNode, Node, NodeKind, TextFormat, TextNode, LINK_TYPE, PARAGRAPH_TYPE,
    ROOT_TYPE, TEXT_TYPE,
};
pub use registry::{EntityRegistration, HtmlImport, JsonImport, NodeRegistry};
pub use selection::{NodeSelection, Point, PointType, RangeSelection, Selection};
pub use tree::{ChangeSet, DocumentTree};
