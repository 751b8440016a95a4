//! # Atomicity Controller
//!
//! Makes variables behave as single units: a click selects the whole
//! variable, and backspace/delete remove it in one keystroke when it is
//! selected or right next to the caret.
//!
//! The handlers run at [`CommandPriority::Low`], below application
//! handlers and above the editor defaults. Anything they do not recognize
//! is passed on by returning `false`.

use crate::node::is_variable;
use crate::plugin::REMOVE_VARIABLE_COMMAND;
use stencil_document::{DocumentTree, NodeKey, Selection};
use stencil_editor::{
    CommandPriority, Editor, KeyEvent, PointerEvent, Registration, Transaction, CLICK_COMMAND,
    KEY_BACKSPACE_COMMAND, KEY_DELETE_COMMAND,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

pub(crate) fn register(editor: &mut Editor) -> Vec<Registration> {
    vec![
        editor.register_command(&CLICK_COMMAND, CommandPriority::Low, on_click),
        editor.register_command(&KEY_BACKSPACE_COMMAND, CommandPriority::Low, |_: &KeyEvent, tx| {
            on_delete(tx, Direction::Backward)
        }),
        editor.register_command(&KEY_DELETE_COMMAND, CommandPriority::Low, |_: &KeyEvent, tx| {
            on_delete(tx, Direction::Forward)
        }),
    ]
}

fn on_click(event: &PointerEvent, tx: &mut Transaction<'_>) -> bool {
    if !is_variable(tx.tree().get(event.target)) {
        return false;
    }
    tx.tree_mut().select_node(event.target, event.modifiers.shift);
    tracing::trace!(key = %event.target, extend = event.modifiers.shift, "variable selected");
    true
}

fn on_delete(tx: &mut Transaction<'_>, direction: Direction) -> bool {
    if !tx.is_editable() {
        return false;
    }

    match tx.tree().selection().cloned() {
        Some(Selection::Node(nodes)) => {
            let selected: Vec<NodeKey> = nodes.keys().filter(|k| is_variable(tx.tree().get(*k))).collect();
            if selected.is_empty() {
                return false;
            }
            match tx.tree_mut().remove_nodes_and_collapse(&selected) {
                Ok(()) => {
                    tx.set_description("remove variable");
                    true
                }
                Err(err) => {
                    tracing::warn!(error = %err, "removing selected variables failed");
                    false
                }
            }
        }
        Some(Selection::Range(range)) if range.is_collapsed() => match adjacent_variable(tx.tree(), direction) {
            Some(key) => tx.dispatch(&REMOVE_VARIABLE_COMMAND, &key),
            None => false,
        },
        _ => false,
    }
}

// The variable the caret touches on the given side
fn adjacent_variable(tree: &DocumentTree, direction: Direction) -> Option<NodeKey> {
    let key = match direction {
        Direction::Backward => tree.node_before_caret(),
        Direction::Forward => tree.node_after_caret(),
    }?;
    is_variable(tree.get(key)).then_some(key)
}
