//! Default handlers, registered at [`CommandPriority::Editor`] so any
//! plugin handler runs first.

use crate::command::CommandPriority;
use crate::commands::{
    PointerEvent, CLICK_COMMAND, INSERT_TEXT_COMMAND, KEY_BACKSPACE_COMMAND, KEY_DELETE_COMMAND, REDO_COMMAND,
    UNDO_COMMAND,
};
use crate::editor::Editor;
use crate::transaction::Transaction;
use stencil_document::{DocumentError, NodeKind, Point, Selection};

pub(crate) fn register_default_handlers(editor: &mut Editor) {
    let _ = editor.register_command(&KEY_BACKSPACE_COMMAND, CommandPriority::Editor, |_, tx| {
        edit(tx, "delete backward", |tree| tree.delete_backward())
    });
    let _ = editor.register_command(&KEY_DELETE_COMMAND, CommandPriority::Editor, |_, tx| {
        edit(tx, "delete forward", |tree| tree.delete_forward())
    });
    let _ = editor.register_command(&INSERT_TEXT_COMMAND, CommandPriority::Editor, |text, tx| {
        edit(tx, "insert text", |tree| tree.insert_text(text))
    });
    let _ = editor.register_command(&CLICK_COMMAND, CommandPriority::Editor, click);
    let _ = editor.register_command(&UNDO_COMMAND, CommandPriority::Editor, |_, tx| {
        tx.request_undo();
        true
    });
    let _ = editor.register_command(&REDO_COMMAND, CommandPriority::Editor, |_, tx| {
        tx.request_redo();
        true
    });
}

fn edit(
    tx: &mut Transaction<'_>,
    description: &str,
    f: impl FnOnce(&mut stencil_document::DocumentTree) -> Result<bool, DocumentError>,
) -> bool {
    if !tx.is_editable() {
        return false;
    }
    match f(tx.tree_mut()) {
        Ok(changed) => {
            if changed {
                tx.set_description(description);
            }
            changed
        }
        Err(err) => {
            tracing::warn!(error = %err, "{} failed", description);
            false
        }
    }
}

// Places the caret where the pointer landed
fn click(event: &PointerEvent, tx: &mut Transaction<'_>) -> bool {
    let tree = tx.tree();
    let Some(node) = tree.get(event.target) else {
        return false;
    };

    let point = match node.kind() {
        NodeKind::Text(text) => Some(Point::text(event.target, event.offset.min(text.len()))),
        NodeKind::Element(element) => Some(Point::element(
            event.target,
            event.offset.min(element.children.len()),
        )),
        NodeKind::Entity(_) => None,
    };
    let Some(point) = point else {
        return match tx.tree_mut().select_after(event.target) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "click placement failed");
                false
            }
        };
    };
    tx.tree_mut().set_selection(Some(Selection::caret(point)));
    true
}

#[cfg(test)]
mod tests {
    use crate::commands::*;
    use crate::Editor;
    use stencil_document::{NodeKind, Point, Selection};

    fn empty_paragraph(editor: &mut Editor) {
        editor
            .update(|tx| {
                let tree = tx.tree_mut();
                let p = tree.append(tree.root(), NodeKind::paragraph())?;
                tree.set_selection(Some(Selection::caret(Point::element(p, 0))));
                Ok::<_, stencil_document::DocumentError>(())
            })
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut editor = Editor::default();
        empty_paragraph(&mut editor);
        assert!(editor.dispatch_command(&INSERT_TEXT_COMMAND, &"Hi".to_string()));
        assert_eq!(editor.read(|tree| tree.text_content()), "Hi");

        assert!(editor.dispatch_command(&KEY_BACKSPACE_COMMAND, &KeyEvent::default()));
        assert_eq!(editor.read(|tree| tree.text_content()), "H");
    }

    #[test]
    fn test_typing_without_selection_is_unhandled() {
        let mut editor = Editor::default();
        assert!(!editor.dispatch_command(&INSERT_TEXT_COMMAND, &"Hi".to_string()));
        assert!(editor.tree().is_empty());
    }

    #[test]
    fn test_click_places_caret() {
        let mut editor = Editor::default();
        let text = editor
            .update(|tx| {
                let tree = tx.tree_mut();
                let p = tree.append(tree.root(), NodeKind::paragraph())?;
                tree.append(p, NodeKind::text("abc"))
            })
            .unwrap()
            .unwrap();

        assert!(editor.dispatch_command(&CLICK_COMMAND, &PointerEvent::on(text).at(10)));
        assert_eq!(editor.selection(), Some(&Selection::caret(Point::text(text, 3))));
    }

    #[test]
    fn test_undo_redo_commands() {
        let mut editor = Editor::default();
        empty_paragraph(&mut editor);
        editor.dispatch_command(&INSERT_TEXT_COMMAND, &"a".to_string());
        editor.dispatch_command(&INSERT_TEXT_COMMAND, &"b".to_string());
        assert_eq!(editor.read(|tree| tree.text_content()), "ab");

        assert!(editor.dispatch_command(&UNDO_COMMAND, &()));
        assert_eq!(editor.read(|tree| tree.text_content()), "a");
        assert!(editor.dispatch_command(&REDO_COMMAND, &()));
        assert_eq!(editor.read(|tree| tree.text_content()), "ab");
    }
}
