//! # Editor
//!
//! Owns the document tree and runs every change as a transaction:
//!
//! 1. the update closure (or command handlers) edits through a [`Transaction`]
//! 2. node transforms run over dirty nodes until nothing new is dirtied
//! 3. mutation listeners hear about created, updated and destroyed nodes
//! 4. the reconciler re-renders
//! 5. history records the before/after snapshots

use crate::command::{Command, CommandBus, CommandPriority, Registration, RegistrationKind};
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::handlers;
use crate::history::UndoStack;
use crate::reconciler::{Reconciler, RenderOptions, RenderStats};
use crate::transaction::{HistoryRequest, Transaction};
use std::collections::BTreeMap;
use std::rc::Rc;
use stencil_document::{
    html, json, ChangeSet, DocumentError, DocumentTree, EntityRegistration, NodeKey, NodeRegistry, Selection, Theme,
};
use stencil_html::{HtmlElement, HtmlNode, SerializeOptions};

/// Upper bound on transform passes per commit
pub const MAX_TRANSFORM_PASSES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeMutation {
    Created,
    Updated,
    Destroyed,
}

/// Mutations of one node type in one commit
pub type NodeMutations = BTreeMap<NodeKey, NodeMutation>;

type Transform = Rc<dyn Fn(NodeKey, &mut DocumentTree) -> Result<(), DocumentError>>;
type MutationListener = Rc<dyn Fn(&NodeMutations, &DocumentTree)>;

struct TransformEntry {
    id: u64,
    node_type: &'static str,
    transform: Transform,
}

struct ListenerEntry {
    id: u64,
    node_type: &'static str,
    listener: MutationListener,
}

pub struct Editor {
    tree: DocumentTree,
    registry: NodeRegistry,
    commands: CommandBus,
    transforms: Vec<TransformEntry>,
    listeners: Vec<ListenerEntry>,
    reconciler: Reconciler,
    history: UndoStack,
    config: EditorConfig,
    editable: bool,
    next_id: u64,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("namespace", &self.config.namespace)
            .field("nodes", &self.tree.len())
            .field("editable", &self.editable)
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with the built-in handlers registered
    pub fn new(config: EditorConfig) -> Self {
        let mut editor = Self {
            tree: DocumentTree::new(),
            registry: NodeRegistry::new(),
            commands: CommandBus::new(),
            transforms: Vec::new(),
            listeners: Vec::new(),
            reconciler: Reconciler::new(),
            history: UndoStack::with_max_levels(config.history.max_levels),
            editable: config.editable,
            config,
            next_id: 0,
        };
        handlers::register_default_handlers(&mut editor);
        editor.render();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Load the configured initial document unless bootstrapping is left to
    /// the embedding context. Returns whether a document was loaded.
    pub fn bootstrap(&mut self) -> Result<bool, EditorError> {
        if self.config.skip_bootstrap {
            tracing::debug!(namespace = %self.config.namespace, "bootstrap skipped");
            return Ok(false);
        }
        let Some(state) = self.config.initial_state.clone() else {
            return Ok(false);
        };
        let tree = json::import_json(&state, &self.registry)?;
        self.set_document(tree);
        Ok(true)
    }

    // ---- registration ----

    pub fn register_node(&mut self, registration: EntityRegistration) -> Result<(), EditorError> {
        self.registry.register(registration)?;
        Ok(())
    }

    pub fn has_node(&self, node_type: &str) -> bool {
        self.registry.has_node(node_type)
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn register_command<P, F>(&mut self, command: &Command<P>, priority: CommandPriority, handler: F) -> Registration
    where
        P: 'static,
        F: Fn(&P, &mut Transaction<'_>) -> bool + 'static,
    {
        let id = self.allocate_id();
        self.commands.register(id, command, priority, handler);
        Registration {
            id,
            kind: RegistrationKind::Command,
        }
    }

    /// Run `transform` on every dirty node of `node_type` before commit
    pub fn register_node_transform<F>(&mut self, node_type: &'static str, transform: F) -> Registration
    where
        F: Fn(NodeKey, &mut DocumentTree) -> Result<(), DocumentError> + 'static,
    {
        let id = self.allocate_id();
        self.transforms.push(TransformEntry {
            id,
            node_type,
            transform: Rc::new(transform),
        });
        Registration {
            id,
            kind: RegistrationKind::Transform,
        }
    }

    /// Hear about created, updated and destroyed nodes of `node_type`
    pub fn register_mutation_listener<F>(&mut self, node_type: &'static str, listener: F) -> Registration
    where
        F: Fn(&NodeMutations, &DocumentTree) + 'static,
    {
        let id = self.allocate_id();
        self.listeners.push(ListenerEntry {
            id,
            node_type,
            listener: Rc::new(listener),
        });
        Registration {
            id,
            kind: RegistrationKind::MutationListener,
        }
    }

    pub fn unregister(&mut self, registration: Registration) -> bool {
        match registration.kind {
            RegistrationKind::Command => self.commands.unregister(registration.id),
            RegistrationKind::Transform => {
                let before = self.transforms.len();
                self.transforms.retain(|t| t.id != registration.id);
                self.transforms.len() != before
            }
            RegistrationKind::MutationListener => {
                let before = self.listeners.len();
                self.listeners.retain(|l| l.id != registration.id);
                self.listeners.len() != before
            }
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ---- reading ----

    pub fn read<R>(&self, f: impl FnOnce(&DocumentTree) -> R) -> R {
        f(&self.tree)
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.tree.selection()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        if self.editable != editable {
            self.editable = editable;
            self.render();
        }
    }

    /// Swap the theme. Cached entity views carry the old classes, so they
    /// are dropped before re-rendering.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.config.theme != theme {
            self.config.theme = theme;
            self.reconciler.invalidate();
            self.render();
        }
    }

    // ---- writing ----

    /// Run `f` as one transaction and commit it
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Transaction<'_>) -> R) -> Result<R, EditorError> {
        let before = self.tree.clone();
        let (result, request, description) = {
            let mut tx = Transaction::new(&mut self.tree, &self.registry, &self.commands, self.editable);
            let result = f(&mut tx);
            (result, tx.history_request, tx.description.take())
        };
        self.finish(before, request, description)?;
        Ok(result)
    }

    /// Dispatch a command in its own transaction. Returns whether a handler
    /// handled it.
    pub fn dispatch_command<P: 'static>(&mut self, command: &Command<P>, payload: &P) -> bool {
        let result = self.update(|tx| tx.dispatch(command, payload));
        match result {
            Ok(handled) => handled,
            Err(err) => {
                tracing::error!(command = command.name(), error = %err, "command failed to commit");
                false
            }
        }
    }

    fn finish(
        &mut self,
        before: DocumentTree,
        request: Option<HistoryRequest>,
        description: Option<String>,
    ) -> Result<(), EditorError> {
        match request {
            Some(HistoryRequest::Undo) => {
                let state = self.history.undo();
                self.restore(state);
                Ok(())
            }
            Some(HistoryRequest::Redo) => {
                let state = self.history.redo();
                self.restore(state);
                Ok(())
            }
            None => self.commit(before, description),
        }
    }

    fn commit(&mut self, before: DocumentTree, description: Option<String>) -> Result<(), EditorError> {
        let changes = self.run_transforms()?;
        let selection_changed = before.selection() != self.tree.selection();
        if changes.is_empty() && !selection_changed {
            return Ok(());
        }

        self.notify_listeners(&changes);
        self.render();

        if !changes.is_empty() {
            let mut before = before;
            before.take_changes();
            self.history.record(before, self.tree.clone(), description);
        }
        tracing::debug!(
            created = changes.created.len(),
            updated = changes.updated.len(),
            destroyed = changes.destroyed.len(),
            "committed update"
        );
        Ok(())
    }

    // Runs transforms over dirty nodes until a pass dirties nothing new
    fn run_transforms(&mut self) -> Result<ChangeSet, EditorError> {
        let mut total = self.tree.take_changes();
        if self.transforms.is_empty() {
            return Ok(total);
        }

        let transforms: Vec<(&'static str, Transform)> = self
            .transforms
            .iter()
            .map(|t| (t.node_type, Rc::clone(&t.transform)))
            .collect();

        let mut pending: Vec<NodeKey> = total.dirty().collect();
        for pass in 0..MAX_TRANSFORM_PASSES {
            if pending.is_empty() {
                return Ok(total);
            }
            for key in &pending {
                let Some(node_type) = self.tree.get(*key).map(|n| n.type_tag()) else {
                    continue;
                };
                for (_, transform) in transforms.iter().filter(|(t, _)| *t == node_type) {
                    if self.tree.contains(*key) {
                        transform(*key, &mut self.tree)?;
                    }
                }
            }

            let next = self.tree.take_changes();
            pending = next.dirty().collect();
            merge_changes(&mut total, next);
            tracing::trace!(pass, dirty = pending.len(), "transform pass");
        }

        tracing::warn!("node transforms did not settle after {} passes", MAX_TRANSFORM_PASSES);
        Ok(total)
    }

    fn notify_listeners(&self, changes: &ChangeSet) {
        if self.listeners.is_empty() {
            return;
        }

        let mut by_type: BTreeMap<&'static str, NodeMutations> = BTreeMap::new();
        for (key, node_type) in &changes.created {
            by_type.entry(node_type).or_default().insert(*key, NodeMutation::Created);
        }
        for key in &changes.updated {
            if let Some(node) = self.tree.get(*key) {
                by_type
                    .entry(node.type_tag())
                    .or_default()
                    .insert(*key, NodeMutation::Updated);
            }
        }
        for (key, node_type) in &changes.destroyed {
            by_type.entry(node_type).or_default().insert(*key, NodeMutation::Destroyed);
        }

        for entry in &self.listeners {
            if let Some(mutations) = by_type.get(entry.node_type) {
                (entry.listener)(mutations, &self.tree);
            }
        }
    }

    fn restore(&mut self, state: Option<DocumentTree>) {
        let Some(mut state) = state else {
            return;
        };
        state.adopt_keys(&self.tree);
        let changes = diff_keys(&self.tree, &state);
        self.tree = state;
        self.notify_listeners(&changes);
        self.render();
    }

    // ---- documents ----

    /// Replace the whole document; history starts over
    pub fn set_document(&mut self, mut tree: DocumentTree) {
        tree.adopt_keys(&self.tree);
        tree.take_changes();
        // Keys of the two documents are unrelated; report a full swap
        let destroyed = diff_keys(&self.tree, &DocumentTree::new());
        let created = diff_keys(&DocumentTree::new(), &tree);
        self.tree = tree;
        self.history.clear();
        self.notify_listeners(&destroyed);
        self.notify_listeners(&created);
        self.render();
    }

    pub fn load_json(&mut self, source: &str) -> Result<(), EditorError> {
        let tree = json::from_json_str(source, &self.registry)?;
        self.set_document(tree);
        Ok(())
    }

    pub fn load_html(&mut self, source: &str) -> Result<(), EditorError> {
        let tree = html::import_html_str(source, &self.registry);
        self.set_document(tree);
        Ok(())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, EditorError> {
        Ok(json::to_json_string(&self.tree, pretty)?)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        json::export_json(&self.tree)
    }

    /// Interchange HTML of the document (no editor attributes)
    pub fn to_html(&self, options: &SerializeOptions) -> String {
        stencil_html::to_html(&self.export_html(), options)
    }

    pub fn export_html(&self) -> Vec<HtmlNode> {
        html::export_html(&self.tree)
    }

    // ---- rendering ----

    fn render(&mut self) {
        let options = RenderOptions {
            theme: &self.config.theme,
            editable: self.editable,
            namespace: &self.config.namespace,
        };
        self.reconciler.reconcile(&self.tree, options);
    }

    /// The rendered view of the document
    pub fn root_element(&self) -> Option<&HtmlElement> {
        self.reconciler.root_element()
    }

    pub fn element_by_key(&self, key: NodeKey) -> Option<&HtmlElement> {
        self.reconciler.element_by_key(key)
    }

    pub fn render_stats(&self) -> RenderStats {
        self.reconciler.stats()
    }

    // ---- history ----

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn begin_history_batch(&mut self, description: Option<String>) {
        self.history.begin_batch(description);
    }

    pub fn end_history_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

fn merge_changes(total: &mut ChangeSet, next: ChangeSet) {
    for (key, node_type) in next.destroyed {
        total.updated.remove(&key);
        if total.created.remove(&key).is_none() {
            total.destroyed.insert(key, node_type);
        }
    }
    total.created.extend(next.created);
    for key in next.updated {
        if !total.created.contains_key(&key) {
            total.updated.insert(key);
        }
    }
}

// Created and destroyed keys between two versions of a document
fn diff_keys(old: &DocumentTree, new: &DocumentTree) -> ChangeSet {
    let mut changes = ChangeSet::default();
    for key in old.descendants(old.root()) {
        if !new.contains(key) {
            if let Some(node) = old.get(key) {
                changes.destroyed.insert(key, node.type_tag());
            }
        }
    }
    for key in new.descendants(new.root()) {
        if let Some(node) = new.get(key) {
            if !old.contains(key) {
                changes.created.insert(key, node.type_tag());
            }
        }
    }
    changes
}
