//! # Stencil Editor
//!
//! Editing runtime on top of the document tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ command bus: typed commands, priority tiers │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ transaction: resolve, then mutate the tree  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ commit                                      │
//! │  - node transforms until settled            │
//! │  - mutation listeners                       │
//! │  - reconcile into the rendered view         │
//! │  - snapshot history                         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is the source of truth**: the rendered view is derived
//! 2. **One write path**: every change goes through a transaction
//! 3. **Plugins are handlers**: behaviour is added by registering commands,
//!    transforms and listeners, never by subclassing nodes
//!
//! ## Usage
//!
//! ```rust
//! use stencil_editor::{Editor, EditorConfig, INSERT_TEXT_COMMAND};
//! use stencil_document::{NodeKind, Point, Selection};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! editor
//!     .update(|tx| {
//!         let tree = tx.tree_mut();
//!         let p = tree.append(tree.root(), NodeKind::paragraph())?;
//!         tree.set_selection(Some(Selection::caret(Point::element(p, 0))));
//!         Ok::<_, stencil_document::DocumentError>(())
//!     })
//!     .unwrap()
//!     .unwrap();
//!
//! assert!(editor.dispatch_command(&INSERT_TEXT_COMMAND, &"Hello".to_string()));
//! assert_eq!(editor.read(|tree| tree.text_content()), "Hello");
//! ```

mod command;
mod commands;
mod config;
mod editor;
mod errors;
mod export;
mod handlers;
mod history;
mod reconciler;
mod transaction;

pub mod plugins;

pub use command::{Command, CommandBus, CommandPriority, Registration};
pub use commands::{
    KeyEvent, Modifiers, PointerEvent, CLICK_COMMAND, INSERT_TEXT_COMMAND, KEY_BACKSPACE_COMMAND,
    KEY_DELETE_COMMAND, REDO_COMMAND, UNDO_COMMAND,
};
pub use config::{EditorConfig, ExportView, HistoryConfig, DEFAULT_CONFIG_NAME};
pub use editor::{Editor, NodeMutation, NodeMutations, MAX_TRANSFORM_PASSES};
pub use errors::EditorError;
pub use export::export_html_page;
pub use history::{HistoryEntry, UndoStack};
pub use reconciler::{Reconciler, RenderOptions, RenderStats, NODE_KEY_ATTR};
pub use transaction::Transaction;
