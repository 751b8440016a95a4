//! HTML interchange for whole documents
//!
//! Export writes `<p>` blocks with formatted inline content. Import is
//! lenient: registered entity hooks get the first look at every element,
//! then known tags map onto paragraphs, links and text formats, and
//! anything else is unwrapped.

use crate::key::NodeKey;
use crate::node::{ElementKind, NodeKind, TextFormat, TextNode};
use crate::registry::NodeRegistry;
use crate::tree::DocumentTree;
use stencil_html::{HtmlElement, HtmlNode, StyleDeclarations};

// ---- export ----

pub fn export_html(tree: &DocumentTree) -> Vec<HtmlNode> {
    tree.children(tree.root())
        .iter()
        .flat_map(|block| export_node(tree, *block))
        .collect()
}

/// HTML for one node; text with line breaks yields several nodes
pub fn export_node(tree: &DocumentTree, key: NodeKey) -> Vec<HtmlNode> {
    let Some(node) = tree.get(key) else {
        return Vec::new();
    };

    match node.kind() {
        NodeKind::Entity(entity) => vec![entity.export_html().into()],
        NodeKind::Text(text) => export_text(text),
        NodeKind::Element(element) => {
            let mut html = match &element.kind {
                ElementKind::Link { url } => HtmlElement::new("a").with_attr("href", url),
                ElementKind::Paragraph | ElementKind::Root => HtmlElement::new("p"),
            };
            for child in &element.children {
                html.children.extend(export_node(tree, *child));
            }
            vec![html.into()]
        }
    }
}

fn export_text(text: &TextNode) -> Vec<HtmlNode> {
    let mut out = Vec::new();
    for (i, line) in text.text.split('\n').enumerate() {
        if i > 0 {
            out.push(HtmlElement::new("br").into());
        }
        if !line.is_empty() {
            out.push(wrap_formatted(line, text));
        }
    }
    out
}

fn wrap_formatted(content: &str, text: &TextNode) -> HtmlNode {
    const WRAPPERS: [(TextFormat, &str); 5] = [
        (TextFormat::CODE, "code"),
        (TextFormat::STRIKETHROUGH, "s"),
        (TextFormat::UNDERLINE, "u"),
        (TextFormat::ITALIC, "em"),
        (TextFormat::BOLD, "strong"),
    ];

    let mut node = HtmlNode::text(content);
    for (flag, tag) in WRAPPERS {
        if text.format.contains(flag) {
            node = HtmlElement::new(tag).with_child(node).into();
        }
    }
    if !text.style.is_empty() {
        node = HtmlElement::new("span")
            .with_attr("style", &text.style)
            .with_child(node)
            .into();
    }
    node
}

// ---- import ----

pub fn import_html(nodes: &[HtmlNode], registry: &NodeRegistry) -> DocumentTree {
    let mut importer = Importer {
        tree: DocumentTree::new(),
        registry,
        open_block: None,
    };
    importer.import_blocks(nodes);

    let mut tree = importer.tree;
    tree.take_changes();
    tracing::debug!(nodes = tree.len(), "imported HTML document");
    tree
}

/// Parse and import in one step
pub fn import_html_str(source: &str, registry: &NodeRegistry) -> DocumentTree {
    import_html(&stencil_html::parse_document(source), registry)
}

/// Format and style inherited from enclosing inline elements
#[derive(Debug, Clone, Default)]
struct Inherited {
    format: TextFormat,
    style: StyleDeclarations,
}

struct Importer<'a> {
    tree: DocumentTree,
    registry: &'a NodeRegistry,
    // Paragraph collecting loose inline content at block level
    open_block: Option<NodeKey>,
}

impl Importer<'_> {
    fn import_blocks(&mut self, nodes: &[HtmlNode]) {
        for node in nodes {
            match node {
                HtmlNode::Element(element) if is_block_tag(&element.tag) => {
                    self.open_block = None;
                    if has_block_children(element) {
                        self.import_blocks(&element.children);
                    } else if let Some(paragraph) = self.new_paragraph() {
                        self.import_inline(&element.children, paragraph, &Inherited::default());
                    }
                    self.open_block = None;
                }
                HtmlNode::Element(element) if is_skipped_tag(&element.tag) => {}
                HtmlNode::Element(element) if is_transparent_block(element) => {
                    self.import_blocks(&element.children);
                }
                HtmlNode::Text { .. } if node.is_whitespace() => {}
                HtmlNode::Comment { .. } => {}
                _ => {
                    let paragraph = match self.open_block {
                        Some(paragraph) => Some(paragraph),
                        None => self.new_paragraph(),
                    };
                    if let Some(paragraph) = paragraph {
                        self.open_block = Some(paragraph);
                        self.import_inline(std::slice::from_ref(node), paragraph, &Inherited::default());
                    }
                }
            }
        }
    }

    fn new_paragraph(&mut self) -> Option<NodeKey> {
        let root = self.tree.root();
        self.tree.append(root, NodeKind::paragraph()).ok()
    }

    fn import_inline(&mut self, nodes: &[HtmlNode], parent: NodeKey, inherited: &Inherited) {
        for node in nodes {
            match node {
                HtmlNode::Text { content } => self.append_text(parent, content, inherited),
                HtmlNode::Comment { .. } => {}
                HtmlNode::Element(element) => self.import_inline_element(element, parent, inherited),
            }
        }
    }

    fn import_inline_element(&mut self, element: &HtmlElement, parent: NodeKey, inherited: &Inherited) {
        for registration in self.registry.html_importers(&element.tag) {
            if let Some(entity) = (registration.import_html)(element) {
                if let Err(err) = self.tree.append(parent, NodeKind::Entity(entity)) {
                    tracing::warn!(error = %err, "dropping imported entity");
                }
                return;
            }
        }

        let mut inner = inherited.clone();
        match element.tag.as_str() {
            "br" => {
                self.append_text(parent, "\n", inherited);
                return;
            }
            "a" => {
                let url = element.attr("href").unwrap_or_default();
                let is_inside_link = self
                    .tree
                    .get(parent)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| matches!(e.kind, ElementKind::Link { .. }));
                if !is_inside_link {
                    if let Ok(link) = self.tree.append(parent, NodeKind::link(url)) {
                        self.import_inline(&element.children, link, inherited);
                        return;
                    }
                }
            }
            "strong" | "b" => inner.format |= TextFormat::BOLD,
            "em" | "i" => inner.format |= TextFormat::ITALIC,
            "u" => inner.format |= TextFormat::UNDERLINE,
            "s" | "del" | "strike" => inner.format |= TextFormat::STRIKETHROUGH,
            "code" => inner.format |= TextFormat::CODE,
            tag if is_skipped_tag(tag) => return,
            _ => {}
        }

        if let Some(style) = element.attr("style") {
            for (property, value) in StyleDeclarations::parse(style).iter() {
                inner.style.set(property, value);
            }
        }
        self.import_inline(&element.children, parent, &inner);
    }

    fn append_text(&mut self, parent: NodeKey, content: &str, inherited: &Inherited) {
        if content.is_empty() {
            return;
        }
        let text = TextNode {
            text: content.to_string(),
            format: inherited.format,
            style: inherited.style.to_string(),
        };
        if let Err(err) = self.tree.append(parent, NodeKind::Text(text)) {
            tracing::warn!(error = %err, "dropping imported text");
        }
    }
}

fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" | "blockquote" | "pre"
    )
}

fn is_skipped_tag(tag: &str) -> bool {
    matches!(tag, "head" | "script" | "style" | "title" | "meta" | "link" | "template")
}

// Containers that only group blocks (lists, sections, page wrappers)
fn is_transparent_block(element: &HtmlElement) -> bool {
    matches!(
        element.tag.as_str(),
        "html" | "body" | "ul" | "ol" | "section" | "article" | "main" | "header" | "footer"
    )
}

fn has_block_children(element: &HtmlElement) -> bool {
    element
        .child_elements()
        .any(|child| is_block_tag(&child.tag) || is_transparent_block(child))
}
