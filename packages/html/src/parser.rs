//! Lenient HTML fragment parser
//!
//! Builds an [`HtmlNode`] forest from [`Tokenizer`] output. The parser never
//! fails: stray end tags are dropped, unclosed elements are closed at end of
//! input, and an end tag closes every element opened after its match.

use crate::dom::{is_void_tag, HtmlElement, HtmlNode};
use crate::error::HtmlError;
use crate::lexer::{HtmlToken, Tokenizer};

/// Parse an HTML fragment into a list of root nodes
pub fn parse_fragment(source: &str) -> Vec<HtmlNode> {
    let mut builder = TreeBuilder::default();
    for token in Tokenizer::new(source) {
        builder.push(token);
    }
    builder.finish()
}

/// Parse a full page or fragment, returning the `<body>` content when present
pub fn parse_document(source: &str) -> Vec<HtmlNode> {
    let mut nodes = parse_fragment(source);
    match take_body(&mut nodes) {
        Some(body) => body.children,
        None => nodes,
    }
}

/// Parse a fragment that must consist of exactly one element
///
/// Surrounding whitespace and comments are ignored.
pub fn parse_element(source: &str) -> Result<HtmlElement, HtmlError> {
    let mut elements = parse_fragment(source)
        .into_iter()
        .filter(|node| !node.is_whitespace() && !matches!(node, HtmlNode::Comment { .. }));

    let first = elements.next().ok_or(HtmlError::NoElement)?;
    if elements.next().is_some() {
        return Err(HtmlError::MultipleRoots);
    }

    match first {
        HtmlNode::Element(element) => Ok(element),
        HtmlNode::Text { content } => Err(HtmlError::UnexpectedText(content)),
        HtmlNode::Comment { .. } => Err(HtmlError::NoElement),
    }
}

fn take_body(nodes: &mut Vec<HtmlNode>) -> Option<HtmlElement> {
    for node in nodes.iter_mut() {
        if let HtmlNode::Element(element) = node {
            if element.tag == "body" {
                return Some(std::mem::replace(element, HtmlElement::new("body")));
            }
            if let Some(body) = take_body(&mut element.children) {
                return Some(body);
            }
        }
    }
    None
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<HtmlNode>,
    stack: Vec<HtmlElement>,
}

impl TreeBuilder {
    fn push(&mut self, token: HtmlToken<'_>) {
        match token {
            HtmlToken::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let mut element = HtmlElement::new(name);
                for (attr, value) in attributes {
                    // First occurrence wins, as in browsers
                    element.attributes.entry(attr).or_insert(value);
                }

                if self_closing || is_void_tag(&element.tag) {
                    self.append(HtmlNode::Element(element));
                } else {
                    self.stack.push(element);
                }
            }

            HtmlToken::EndTag(name) => {
                if let Some(pos) = self.stack.iter().rposition(|open| open.tag == name) {
                    while self.stack.len() > pos {
                        self.close_top();
                    }
                }
            }

            HtmlToken::Text(text) => {
                if text.is_empty() {
                    return;
                }
                // Adjacent text tokens (e.g. around a stray `<`) merge into one node
                if let Some(HtmlNode::Text { content }) = self.current_children().last_mut() {
                    content.push_str(&text);
                } else {
                    self.append(HtmlNode::text(text.into_owned()));
                }
            }

            HtmlToken::Comment(content) => self.append(HtmlNode::comment(content)),

            HtmlToken::Doctype => {}
        }
    }

    fn current_children(&mut self) -> &mut Vec<HtmlNode> {
        match self.stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut self.roots,
        }
    }

    fn append(&mut self, node: HtmlNode) {
        self.current_children().push(node);
    }

    fn close_top(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.append(HtmlNode::Element(element));
        }
    }

    fn finish(mut self) -> Vec<HtmlNode> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.roots
    }
}
