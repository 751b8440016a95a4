//! Mirrors text format flags into inline `style` declarations for text
//! inside links, so exported links keep their look without the format
//! wrapper tags.

use crate::command::Registration;
use crate::editor::Editor;
use stencil_document::{DocumentTree, NodeKey, TextFormat, LINK_TYPE};
use stencil_html::StyleDeclarations;

pub struct InlineStylePlugin;

impl InlineStylePlugin {
    pub fn register(editor: &mut Editor) -> Registration {
        editor.register_node_transform(LINK_TYPE, |key, tree| {
            apply(key, tree)?;
            Ok(())
        })
    }
}

fn apply(link: NodeKey, tree: &mut DocumentTree) -> stencil_document::Result<()> {
    let texts: Vec<NodeKey> = tree
        .descendants(link)
        .into_iter()
        .filter(|key| tree.text(*key).is_some())
        .collect();

    for key in texts {
        let Some(text) = tree.text(key) else {
            continue;
        };
        let style = merge_format_into_style(text.format, &text.style);
        if style != text.style && tree.set_text_style(key, style)? {
            tracing::trace!(%key, "merged text format into style");
        }
    }
    Ok(())
}

/// Merge `format` into an inline style string. Declarations for flags that
/// are off are removed; other declarations keep their order.
pub fn merge_format_into_style(format: TextFormat, style: &str) -> String {
    let mut declarations = StyleDeclarations::parse(style);

    toggle(&mut declarations, "font-weight", format.contains(TextFormat::BOLD).then_some("bold"));
    toggle(&mut declarations, "font-style", format.contains(TextFormat::ITALIC).then_some("italic"));

    let decoration = match (
        format.contains(TextFormat::UNDERLINE),
        format.contains(TextFormat::STRIKETHROUGH),
    ) {
        (true, true) => Some("underline line-through"),
        (true, false) => Some("underline"),
        (false, true) => Some("line-through"),
        (false, false) => None,
    };
    toggle(&mut declarations, "text-decoration", decoration);

    if StyleDeclarations::parse(style) == declarations {
        // Unchanged: keep the caller's spelling
        return style.to_string();
    }
    declarations.to_string()
}

fn toggle(declarations: &mut StyleDeclarations, property: &str, value: Option<&str>) {
    match value {
        Some(value) => declarations.set(property, value),
        None => {
            declarations.remove(property);
        }
    }
}
