//! Built-in commands and their event payloads

use crate::command::Command;
use serde::{Deserialize, Serialize};
use stencil_document::NodeKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub modifiers: Modifiers,
}

/// A click resolved to the node under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub target: NodeKey,
    /// Character offset for text targets, child index for elements
    pub offset: usize,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn on(target: NodeKey) -> Self {
        Self {
            target,
            offset: 0,
            modifiers: Modifiers::default(),
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

pub const KEY_BACKSPACE_COMMAND: Command<KeyEvent> = Command::new("KEY_BACKSPACE");
pub const KEY_DELETE_COMMAND: Command<KeyEvent> = Command::new("KEY_DELETE");
pub const INSERT_TEXT_COMMAND: Command<String> = Command::new("INSERT_TEXT");
pub const CLICK_COMMAND: Command<PointerEvent> = Command::new("CLICK");
pub const UNDO_COMMAND: Command<()> = Command::new("UNDO");
pub const REDO_COMMAND: Command<()> = Command::new("REDO");
