//! Update transactions
//!
//! A [`Transaction`] is the only way handlers reach the tree for writing.
//! Resolve targets through [`Transaction::tree`] first, then apply edits
//! through [`Transaction::tree_mut`]; the editor commits once the update
//! closure or command dispatch returns.

use crate::command::{Command, CommandBus};
use stencil_document::{DocumentTree, NodeRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HistoryRequest {
    Undo,
    Redo,
}

pub struct Transaction<'a> {
    tree: &'a mut DocumentTree,
    registry: &'a NodeRegistry,
    commands: &'a CommandBus,
    editable: bool,
    pub(crate) history_request: Option<HistoryRequest>,
    pub(crate) description: Option<String>,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(
        tree: &'a mut DocumentTree,
        registry: &'a NodeRegistry,
        commands: &'a CommandBus,
        editable: bool,
    ) -> Self {
        Self {
            tree,
            registry,
            commands,
            editable,
            history_request: None,
            description: None,
        }
    }

    pub fn tree(&self) -> &DocumentTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut *self.tree
    }

    pub fn registry(&self) -> &NodeRegistry {
        self.registry
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Dispatch a command from inside a handler or update
    pub fn dispatch<P: 'static>(&mut self, command: &Command<P>, payload: &P) -> bool {
        let commands = self.commands;
        commands.dispatch(command, payload, self)
    }

    /// Label the history entry this transaction produces
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn request_undo(&mut self) {
        self.history_request = Some(HistoryRequest::Undo);
    }

    pub fn request_redo(&mut self) {
        self.history_request = Some(HistoryRequest::Redo);
    }
}
