//! Standalone HTML page export
//!
//! The page is rendered through the reconciler like any other view; the
//! [`ExportView`] only changes the render options and the root's style.

use crate::config::ExportView;
use crate::editor::Editor;
use crate::reconciler::{Reconciler, RenderOptions};
use stencil_html::serializer::escape_text;
use stencil_html::{element_to_html, StyleDeclarations};

/// Render the editor's document as a complete HTML page
pub fn export_html_page(editor: &Editor, view: &ExportView, title: &str) -> String {
    let config = editor.config();
    let options = RenderOptions {
        theme: &config.theme,
        editable: editor.is_editable() && !view.read_only,
        namespace: &config.namespace,
    };

    // The live selection is editing state, not document content
    let mut tree = editor.tree().clone();
    tree.set_selection(None);

    let mut reconciler = Reconciler::new();
    let mut root = reconciler.reconcile(&tree, options).clone();

    let style = view_style(view);
    if !style.is_empty() {
        root.set_attr("style", style.to_string());
    }

    let body_style = if view.full_height {
        "margin: 0; height: 100%;"
    } else {
        "margin: 0;"
    };

    format!(
        r#"<!DOCTYPE html>
<html{html_style}>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="{body_style}">
    {content}
</body>
</html>
"#,
        html_style = if view.full_height { r#" style="height: 100%;""# } else { "" },
        title = escape_text(title),
        content = element_to_html(&root),
    )
}

fn view_style(view: &ExportView) -> StyleDeclarations {
    let mut style = StyleDeclarations::default();
    if let Some(color) = &view.background_color {
        style.set("background-color", color);
    }
    if view.full_height {
        style.set("height", "100%");
    }
    if view.disable_resize {
        style.set("resize", "none");
    }
    style
}
