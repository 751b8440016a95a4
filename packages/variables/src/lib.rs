//! # Stencil Variables
//!
//! Inline variables (merge fields) for Stencil documents.
//!
//! - [`node`]: the variable entity, its JSON and HTML forms
//! - `controller`: click, backspace and delete treat a variable as one unit
//! - [`plugin`]: insert and remove commands
//! - [`source`]: async variable catalogs
//!
//! ## Usage
//!
//! ```rust
//! use stencil_editor::{Editor, EditorConfig};
//! use stencil_variables::{registration, InsertVariable, VariablesPlugin, INSERT_VARIABLE_COMMAND};
//!
//! let mut editor = Editor::new(EditorConfig::default());
//! editor.register_node(registration()).unwrap();
//! let _plugin = VariablesPlugin::register(&mut editor).unwrap();
//!
//! let payload = InsertVariable::new("{{ customer.name }}", "Customer Name");
//! assert!(editor.dispatch_command(&INSERT_VARIABLE_COMMAND, &payload));
//! ```

mod controller;
pub mod error;
pub mod node;
pub mod plugin;
pub mod source;

pub use error::{SourceError, VariableError};
pub use node::{
    as_variable, create_variable, is_variable, registration, SerializedVariableNode, VariableNode,
    ENTITY_TYPE_ATTR, VARIABLE_TYPE,
};
pub use plugin::{
    InsertVariable, PluginRegistrations, VariablesPlugin, INSERT_VARIABLE_COMMAND, REMOVE_VARIABLE_COMMAND,
};
pub use source::{resolve_candidates, CatalogEntry, JsonFileSource, StaticSource, VariableCandidate, VariableSource};
