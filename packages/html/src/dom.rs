use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HTML node (element, text or comment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HtmlNode {
    Element(HtmlElement),

    Text { content: String },

    Comment { content: String },
}

impl HtmlNode {
    pub fn element(tag: impl Into<String>) -> Self {
        HtmlNode::Element(HtmlElement::new(tag))
    }

    pub fn text(content: impl Into<String>) -> Self {
        HtmlNode::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        HtmlNode::Comment {
            content: content.into(),
        }
    }

    pub fn as_element(&self) -> Option<&HtmlElement> {
        match self {
            HtmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut HtmlElement> {
        match self {
            HtmlNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants (DOM `textContent`)
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            HtmlNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            HtmlNode::Text { content } => out.push_str(content),
            HtmlNode::Comment { .. } => {}
        }
    }

    /// True for text nodes that hold nothing but whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, HtmlNode::Text { content } if content.trim().is_empty())
    }
}

impl From<HtmlElement> for HtmlNode {
    fn from(element: HtmlElement) -> Self {
        HtmlNode::Element(element)
    }
}

/// HTML element with ordered attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<HtmlNode>,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<HtmlNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = HtmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.children.push(HtmlNode::text(content));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attr("class", joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        if remaining.is_empty() {
            self.attributes.remove("class");
        } else {
            let joined = remaining.join(" ");
            self.set_attr("class", joined);
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &HtmlElement> {
        self.children.iter().filter_map(HtmlNode::as_element)
    }

    /// First direct child element whose tag is one of `tags`
    pub fn find_child(&self, tags: &[&str]) -> Option<&HtmlElement> {
        self.child_elements()
            .find(|child| tags.contains(&child.tag.as_str()))
    }

    /// Depth-first search over descendants (self included)
    pub fn find<P>(&self, predicate: P) -> Option<&HtmlElement>
    where
        P: Fn(&HtmlElement) -> bool + Copy,
    {
        if predicate(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(predicate))
    }

    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }
}

/// Elements that never have children or a closing tag
pub fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose content is raw text up to the matching close tag
pub fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}
