//! Variable insertion and removal commands

use crate::controller;
use crate::node::{create_variable, is_variable, VARIABLE_TYPE};
use serde::{Deserialize, Serialize};
use stencil_document::{DocumentTree, InlineTarget, NodeKey, NodeKind};
use stencil_editor::{Command, CommandPriority, Editor, EditorError, Registration, Transaction};

/// Payload of [`INSERT_VARIABLE_COMMAND`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertVariable {
    pub value: String,
    #[serde(default)]
    pub display_text: String,
}

impl InsertVariable {
    pub fn new(value: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_text: display_text.into(),
        }
    }
}

pub const INSERT_VARIABLE_COMMAND: Command<InsertVariable> = Command::new("INSERT_VARIABLE");

/// Remove the variable with this key
pub const REMOVE_VARIABLE_COMMAND: Command<NodeKey> = Command::new("REMOVE_VARIABLE");

/// Everything [`VariablesPlugin::register`] put on the editor
#[derive(Debug)]
#[must_use = "keep the registrations to be able to unregister the plugin"]
pub struct PluginRegistrations {
    registrations: Vec<Registration>,
}

impl PluginRegistrations {
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn unregister(self, editor: &mut Editor) {
        for registration in self.registrations {
            editor.unregister(registration);
        }
    }
}

pub struct VariablesPlugin;

impl VariablesPlugin {
    /// Register the variable commands and the atomicity controller.
    ///
    /// The variable entity must already be registered on the editor.
    pub fn register(editor: &mut Editor) -> Result<PluginRegistrations, EditorError> {
        if !editor.has_node(VARIABLE_TYPE) {
            return Err(EditorError::NodeNotRegistered(VARIABLE_TYPE.to_string()));
        }

        let mut registrations = vec![
            editor.register_command(&INSERT_VARIABLE_COMMAND, CommandPriority::Normal, insert_variable),
            editor.register_command(&REMOVE_VARIABLE_COMMAND, CommandPriority::Normal, remove_variable),
        ];
        registrations.extend(controller::register(editor));

        tracing::debug!(handlers = registrations.len(), "variables plugin registered");
        Ok(PluginRegistrations { registrations })
    }
}

fn insert_variable(payload: &InsertVariable, tx: &mut Transaction<'_>) -> bool {
    if !tx.is_editable() {
        return false;
    }
    let variable = match create_variable(&payload.value, &payload.display_text) {
        Ok(variable) => variable,
        Err(err) => {
            tracing::warn!(value = %payload.value, error = %err, "refusing to insert variable");
            return false;
        }
    };

    let target = tx.tree().inline_target();
    let result = insert_at(tx.tree_mut(), target, NodeKind::entity(variable));
    match result {
        Ok(key) => {
            tx.set_description("insert variable");
            tracing::debug!(%key, value = %payload.value, "inserted variable");
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "variable insertion failed");
            false
        }
    }
}

// Without a usable selection the variable goes to the end of the last paragraph
fn insert_at(
    tree: &mut DocumentTree,
    target: Option<InlineTarget>,
    kind: NodeKind,
) -> stencil_document::Result<NodeKey> {
    let target = match target {
        Some(target) => target,
        None => {
            let parent = tree.last_paragraph_or_create()?;
            InlineTarget::At {
                parent,
                index: tree.children(parent).len(),
            }
        }
    };
    let key = tree.insert_inline(target, kind)?;
    tree.select_end(key)?;
    Ok(key)
}

fn remove_variable(key: &NodeKey, tx: &mut Transaction<'_>) -> bool {
    if !tx.is_editable() || !is_variable(tx.tree().get(*key)) {
        return false;
    }
    match tx.tree_mut().remove_and_collapse(*key) {
        Ok(()) => {
            tx.set_description("remove variable");
            true
        }
        Err(err) => {
            tracing::warn!(%key, error = %err, "variable removal failed");
            false
        }
    }
}
