#![forbid(unsafe_code)]

//! Handle-based key bindings.
//!
//! A [`Keymap`] maps key chords to actions. Every binding returns a
//! [`BindingId`]; the owner keeps it and calls [`Keymap::unbind`] when it
//! goes away, so no binding outlives the view that installed it.
//!
//! When two bindings cover the same chord, the most recent one wins.
//!
//! ```
//! use vibe_core::{KeyCode, KeyEvent, Keymap, Modifiers};
//!
//! let mut keys = Keymap::new();
//! let id = keys.bind(KeyCode::Escape, Modifiers::NONE, "close");
//! assert_eq!(keys.resolve(&KeyEvent::new(KeyCode::Escape)), Some("close"));
//! keys.unbind(id);
//! assert_eq!(keys.resolve(&KeyEvent::new(KeyCode::Escape)), None);
//! ```

use crate::event::{KeyCode, KeyEvent, Modifiers};

/// Identifier of one installed binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

#[derive(Debug, Clone)]
struct Binding<A> {
    id: BindingId,
    code: KeyCode,
    modifiers: Modifiers,
    action: A,
}

/// Ordered set of key bindings.
#[derive(Debug, Clone)]
pub struct Keymap<A> {
    bindings: Vec<Binding<A>>,
    next_id: u64,
}

impl<A> Default for Keymap<A> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
            next_id: 1,
        }
    }
}

impl<A: Clone> Keymap<A> {
    /// Create an empty keymap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a binding for `code` with exactly `modifiers` held.
    pub fn bind(&mut self, code: KeyCode, modifiers: Modifiers, action: A) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.bindings.push(Binding {
            id,
            code,
            modifiers,
            action,
        });
        id
    }

    /// Remove a binding. Returns `false` if it was not installed.
    pub fn unbind(&mut self, id: BindingId) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| b.id != id);
        before != self.bindings.len()
    }

    /// Returns `true` if the binding is still installed.
    #[must_use]
    pub fn is_bound(&self, id: BindingId) -> bool {
        self.bindings.iter().any(|b| b.id == id)
    }

    /// Look up the action for a key event.
    ///
    /// Shift is ignored for character keys, since the character already
    /// reflects it.
    #[must_use]
    pub fn resolve(&self, key: &KeyEvent) -> Option<A> {
        let mods = match key.code {
            KeyCode::Char(_) => key.modifiers - Modifiers::SHIFT,
            _ => key.modifiers,
        };
        self.bindings
            .iter()
            .rev()
            .find(|b| b.code == key.code && b.modifiers == mods)
            .map(|b| b.action.clone())
    }

    /// Number of installed bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
