use crate::dom::{is_raw_text_tag, HtmlElement, HtmlNode};

/// Options for HTML serialization
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Put block elements on their own lines
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

impl SerializeOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Default::default()
        }
    }
}

struct Context<'a> {
    options: &'a SerializeOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a SerializeOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Serialize a list of nodes to HTML
pub fn to_html(nodes: &[HtmlNode], options: &SerializeOptions) -> String {
    let mut ctx = Context::new(options);
    for node in nodes {
        write_block(node, &mut ctx);
    }
    ctx.get_output()
}

/// Serialize a single element without any pretty printing
pub fn element_to_html(element: &HtmlElement) -> String {
    let options = SerializeOptions::default();
    let mut ctx = Context::new(&options);
    write_inline(&HtmlNode::Element(element.clone()), &mut ctx);
    ctx.get_output()
}

// Writes a node at block position: elements with only element children are
// laid out one child per line when pretty printing.
fn write_block(node: &HtmlNode, ctx: &mut Context<'_>) {
    let HtmlNode::Element(element) = node else {
        if ctx.options.pretty && node.is_whitespace() {
            return;
        }
        if ctx.options.pretty {
            ctx.add_indent();
        }
        write_inline(node, ctx);
        ctx.newline();
        return;
    };

    if !ctx.options.pretty || !is_block_container(element) {
        if ctx.options.pretty {
            ctx.add_indent();
        }
        write_inline(node, ctx);
        ctx.newline();
        return;
    }

    ctx.add_indent();
    write_open_tag(element, ctx);
    ctx.newline();
    ctx.indent();
    for child in &element.children {
        write_block(child, ctx);
    }
    ctx.dedent();
    ctx.add_indent();
    write_close_tag(element, ctx);
    ctx.newline();
}

fn write_inline(node: &HtmlNode, ctx: &mut Context<'_>) {
    match node {
        HtmlNode::Element(element) => {
            write_open_tag(element, ctx);
            if element.is_void() {
                return;
            }
            let raw = is_raw_text_tag(&element.tag);
            for child in &element.children {
                match child {
                    HtmlNode::Text { content } if raw => ctx.add(content),
                    _ => write_inline(child, ctx),
                }
            }
            write_close_tag(element, ctx);
        }
        HtmlNode::Text { content } => ctx.add(&escape_text(content)),
        HtmlNode::Comment { content } => {
            ctx.add("<!--");
            ctx.add(content);
            ctx.add("-->");
        }
    }
}

fn write_open_tag(element: &HtmlElement, ctx: &mut Context<'_>) {
    ctx.add("<");
    ctx.add(&element.tag);
    for (name, value) in &element.attributes {
        ctx.add(" ");
        ctx.add(name);
        ctx.add("=\"");
        ctx.add(&escape_attribute(value));
        ctx.add("\"");
    }
    ctx.add(">");
}

fn write_close_tag(element: &HtmlElement, ctx: &mut Context<'_>) {
    ctx.add("</");
    ctx.add(&element.tag);
    ctx.add(">");
}

fn is_block_container(element: &HtmlElement) -> bool {
    !element.children.is_empty()
        && element
            .children
            .iter()
            .all(|child| child.as_element().is_some() || child.is_whitespace())
        && matches!(
            element.tag.as_str(),
            "html" | "head" | "body" | "div" | "section" | "article" | "ul" | "ol" | "blockquote"
        )
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
