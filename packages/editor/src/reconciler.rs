//! # Reconciler
//!
//! Renders the document tree into an [`HtmlElement`] view. Every node's
//! element carries `data-node-key`. Entity elements are cached per key and
//! reused while the entity reports no DOM update and its selected state is
//! unchanged.

use std::collections::HashMap;
use stencil_document::{
    DocumentTree, ElementKind, InlineEntity, NodeKey, NodeKind, RenderContext, TextFormat, TextNode, Theme,
};
use stencil_html::HtmlElement;

pub const NODE_KEY_ATTR: &str = "data-node-key";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub renders: usize,
    pub entities_created: usize,
    pub entities_reused: usize,
}

#[derive(Debug)]
struct CachedEntity {
    entity: Box<dyn InlineEntity>,
    selected: bool,
    element: HtmlElement,
}

#[derive(Debug, Default)]
pub struct Reconciler {
    root: Option<HtmlElement>,
    entities: HashMap<NodeKey, CachedEntity>,
    stats: RenderStats,
}

/// Per-render settings
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub theme: &'a Theme,
    pub editable: bool,
    pub namespace: &'a str,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(skip_all, fields(nodes = tree.len()))]
    pub fn reconcile(&mut self, tree: &DocumentTree, options: RenderOptions<'_>) -> &HtmlElement {
        self.stats.renders += 1;

        let mut root = keyed("div", tree.root())
            .with_attr("data-namespace", options.namespace)
            .with_attr("contenteditable", if options.editable { "true" } else { "false" });
        if let Some(class) = options.theme.class("root") {
            root.add_class(class);
        }
        for block in tree.children(tree.root()) {
            let child = self.render_node(tree, *block, options.theme);
            root.children.push(child.into());
        }

        self.entities.retain(|key, _| tree.contains(*key));
        self.root.insert(root)
    }

    pub fn root_element(&self) -> Option<&HtmlElement> {
        self.root.as_ref()
    }

    /// The rendered element of a node
    pub fn element_by_key(&self, key: NodeKey) -> Option<&HtmlElement> {
        let wanted = key.to_string();
        let wanted = wanted.as_str();
        self.root
            .as_ref()?
            .find(|element| element.attr(NODE_KEY_ATTR) == Some(wanted))
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Forget cached entity views; the next render recreates them
    pub fn invalidate(&mut self) {
        self.entities.clear();
    }

    fn render_node(&mut self, tree: &DocumentTree, key: NodeKey, theme: &Theme) -> HtmlElement {
        let Some(node) = tree.get(key) else {
            return keyed("span", key);
        };

        match node.kind() {
            NodeKind::Entity(entity) => {
                let selected = tree.is_node_selected(key);
                self.render_entity(key, entity.as_ref(), selected, theme)
            }
            NodeKind::Text(text) => render_text(key, text),
            NodeKind::Element(element) => {
                let mut html = match &element.kind {
                    ElementKind::Link { url } => keyed("a", key).with_attr("href", url),
                    ElementKind::Paragraph | ElementKind::Root => {
                        let mut p = keyed("p", key);
                        if let Some(class) = theme.class("paragraph") {
                            p.add_class(class);
                        }
                        p
                    }
                };
                for child in &element.children {
                    let rendered = self.render_node(tree, *child, theme);
                    html.children.push(rendered.into());
                }
                html
            }
        }
    }

    fn render_entity(
        &mut self,
        key: NodeKey,
        entity: &dyn InlineEntity,
        selected: bool,
        theme: &Theme,
    ) -> HtmlElement {
        if let Some(cached) = self.entities.get(&key) {
            if cached.selected == selected && !entity.needs_dom_update(cached.entity.as_ref()) {
                self.stats.entities_reused += 1;
                return cached.element.clone();
            }
        }

        let ctx = RenderContext {
            key,
            selected,
            theme,
        };
        let mut element = entity.create_dom(&ctx);
        element.set_attr(NODE_KEY_ATTR, key.to_string());
        element.set_attr("contenteditable", "false");
        self.stats.entities_created += 1;

        self.entities.insert(
            key,
            CachedEntity {
                entity: entity.clone_entity(),
                selected,
                element: element.clone(),
            },
        );
        element
    }
}

fn keyed(tag: &str, key: NodeKey) -> HtmlElement {
    HtmlElement::new(tag).with_attr(NODE_KEY_ATTR, key.to_string())
}

fn render_text(key: NodeKey, text: &TextNode) -> HtmlElement {
    const FORMAT_TAGS: [(TextFormat, &str); 5] = [
        (TextFormat::CODE, "code"),
        (TextFormat::STRIKETHROUGH, "s"),
        (TextFormat::UNDERLINE, "u"),
        (TextFormat::ITALIC, "em"),
        (TextFormat::BOLD, "strong"),
    ];

    let mut content: stencil_html::HtmlNode = stencil_html::HtmlNode::text(&text.text);
    for (flag, tag) in FORMAT_TAGS {
        if text.has_format(flag) {
            content = HtmlElement::new(tag).with_child(content).into();
        }
    }

    let mut span = keyed("span", key).with_child(content);
    if !text.style.is_empty() {
        span.set_attr("style", &text.style);
    }
    span
}
