use crate::entity::InlineEntity;
use crate::key::NodeKey;
use bitflags::bitflags;

pub const ROOT_TYPE: &str = "root";
pub const PARAGRAPH_TYPE: &str = "paragraph";
pub const LINK_TYPE: &str = "link";
pub const TEXT_TYPE: &str = "text";

bitflags! {
    /// Inline text formatting flags (serialized as their numeric value)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextFormat: u32 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        const UNDERLINE = 1 << 3;
        const CODE = 1 << 4;
    }
}

/// Node stored in the document tree
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) key: NodeKey,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementNode),
    Text(TextNode),
    /// Registered atomic inline entity
    Entity(Box<dyn InlineEntity>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub kind: ElementKind,
    pub children: Vec<NodeKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Root,
    Paragraph,
    Link { url: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
    pub format: TextFormat,
    pub style: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Length in characters (the unit of text point offsets)
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_format(&self, format: TextFormat) -> bool {
        self.format.contains(format)
    }
}

impl NodeKind {
    pub fn paragraph() -> Self {
        NodeKind::Element(ElementNode {
            kind: ElementKind::Paragraph,
            children: Vec::new(),
        })
    }

    pub fn link(url: impl Into<String>) -> Self {
        NodeKind::Element(ElementNode {
            kind: ElementKind::Link { url: url.into() },
            children: Vec::new(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeKind::Text(TextNode::new(text))
    }

    pub fn entity(entity: impl InlineEntity) -> Self {
        NodeKind::Entity(Box::new(entity))
    }

    pub fn type_tag(&self) -> &'static str {
        match self {
            NodeKind::Element(element) => match element.kind {
                ElementKind::Root => ROOT_TYPE,
                ElementKind::Paragraph => PARAGRAPH_TYPE,
                ElementKind::Link { .. } => LINK_TYPE,
            },
            NodeKind::Text(_) => TEXT_TYPE,
            NodeKind::Entity(entity) => entity.entity_type(),
        }
    }

    /// Blocks are the only nodes allowed directly under the root
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Element(ElementNode {
                kind: ElementKind::Paragraph,
                ..
            })
        )
    }

    pub fn is_inline(&self) -> bool {
        match self {
            NodeKind::Element(element) => matches!(element.kind, ElementKind::Link { .. }),
            NodeKind::Text(_) | NodeKind::Entity(_) => true,
        }
    }
}

impl Node {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.kind, NodeKind::Entity(_))
    }

    pub fn children(&self) -> &[NodeKey] {
        match &self.kind {
            NodeKind::Element(element) => &element.children,
            _ => &[],
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&dyn InlineEntity> {
        match &self.kind {
            NodeKind::Entity(entity) => Some(entity.as_ref()),
            _ => None,
        }
    }

    /// Offset just past the last position inside this node
    pub fn content_len(&self) -> usize {
        match &self.kind {
            NodeKind::Element(element) => element.children.len(),
            NodeKind::Text(text) => text.len(),
            NodeKind::Entity(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(NodeKind::paragraph().type_tag(), PARAGRAPH_TYPE);
        assert_eq!(NodeKind::link("https://a").type_tag(), LINK_TYPE);
        assert_eq!(NodeKind::text("x").type_tag(), TEXT_TYPE);
    }

    #[test]
    fn test_block_and_inline() {
        assert!(NodeKind::paragraph().is_block());
        assert!(!NodeKind::paragraph().is_inline());
        assert!(NodeKind::link("https://a").is_inline());
        assert!(NodeKind::text("x").is_inline());
    }

    #[test]
    fn test_text_len_counts_chars() {
        let text = TextNode::new("héllo");
        assert_eq!(text.len(), 5);
        assert_eq!(text.text.len(), 6);
    }
}
