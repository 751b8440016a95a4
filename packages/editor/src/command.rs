//! # Command Bus
//!
//! Commands are typed descriptors; handlers are registered per command at
//! a priority. Dispatch visits handlers from `Critical` down to `Editor`,
//! in registration order within a tier, and stops at the first handler
//! that returns `true`.

use crate::transaction::Transaction;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// A named command carrying a payload of type `P`
pub struct Command<P: 'static> {
    name: &'static str,
    _payload: PhantomData<fn(&P)>,
}

impl<P: 'static> Command<P> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _payload: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<P: 'static> fmt::Debug for Command<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command({})", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandPriority {
    /// Framework defaults
    Editor,
    Low,
    Normal,
    High,
    Critical,
}

type ErasedHandler = Rc<dyn Fn(&dyn Any, &mut Transaction<'_>) -> bool>;

struct HandlerEntry {
    id: u64,
    command: &'static str,
    priority: CommandPriority,
    handler: ErasedHandler,
}

/// Handle returned by every `register_*` call on the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "keep the registration to be able to unregister it"]
pub struct Registration {
    pub(crate) id: u64,
    pub(crate) kind: RegistrationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RegistrationKind {
    Command,
    Transform,
    MutationListener,
}

#[derive(Default)]
pub struct CommandBus {
    entries: Vec<HandlerEntry>,
}

impl fmt::Debug for CommandBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.command, e.priority, e.id)))
            .finish()
    }
}

impl CommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register<P, F>(&mut self, id: u64, command: &Command<P>, priority: CommandPriority, handler: F)
    where
        P: 'static,
        F: Fn(&P, &mut Transaction<'_>) -> bool + 'static,
    {
        let handler: ErasedHandler = Rc::new(move |payload: &dyn Any, tx: &mut Transaction<'_>| {
            payload
                .downcast_ref::<P>()
                .is_some_and(|payload| handler(payload, tx))
        });
        self.entries.push(HandlerEntry {
            id,
            command: command.name(),
            priority,
            handler,
        });
    }

    pub(crate) fn unregister(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn handler_count(&self, command: &str) -> usize {
        self.entries.iter().filter(|e| e.command == command).count()
    }

    /// Run handlers for `command` until one reports it handled the payload
    pub fn dispatch<P: 'static>(&self, command: &Command<P>, payload: &P, tx: &mut Transaction<'_>) -> bool {
        let mut handlers: Vec<(CommandPriority, ErasedHandler)> = self
            .entries
            .iter()
            .filter(|entry| entry.command == command.name())
            .map(|entry| (entry.priority, Rc::clone(&entry.handler)))
            .collect();
        // Stable sort keeps registration order within a tier
        handlers.sort_by(|a, b| b.0.cmp(&a.0));

        for (priority, handler) in handlers {
            if handler(payload, tx) {
                tracing::trace!(command = command.name(), ?priority, "command handled");
                return true;
            }
        }
        tracing::trace!(command = command.name(), "command not handled");
        false
    }
}
