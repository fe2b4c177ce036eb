//! State cells - independently addressable mutable value slots.
//!
//! A [`State<T>`] is a cheap shared handle to one value slot owned by a
//! node's hook storage. Cloning the handle aliases the same slot, so a child
//! can write a value a sibling or parent reads. Observation is pull-based:
//! nothing is notified on write, change detection happens in effect
//! dependency trackers.
//!
//! A default-constructed handle is *unbound*. Every access through an unbound
//! handle is a programmer error and fails loudly - the engine never
//! substitutes a default value, because that would mask a construction-order
//! bug.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use thiserror::Error;

/// Error raised when a state handle is used before being bound to a slot.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The handle was default-constructed and never attached to a node slot.
    #[error("state handle is not bound to a slot")]
    Unbound,
}

/// A shared handle to one typed value slot.
///
/// Created by [`Node::state`](crate::engine::Node::state); the slot lives as
/// long as the owning node (or any outstanding handle). `Default` produces an
/// unbound handle, useful only as a placeholder to be overwritten.
///
/// # Example
///
/// ```
/// use twig_tui::engine::Node;
///
/// let node = Node::new();
/// let score = node.state(0u32);
/// let shared = score.clone();
/// shared.set(3);
/// assert_eq!(score.get(), 3);
/// ```
pub struct State<T> {
    slot: Option<Rc<RefCell<T>>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> State<T> {
    /// Create a handle bound to an existing slot.
    pub(crate) fn bound(slot: Rc<RefCell<T>>) -> Self {
        Self { slot: Some(slot) }
    }

    /// Whether this handle is attached to a slot.
    pub fn is_bound(&self) -> bool {
        self.slot.is_some()
    }

    /// Whether two handles alias the same underlying slot.
    pub fn ptr_eq(&self, other: &State<T>) -> bool {
        match (&self.slot, &other.slot) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn slot(&self) -> Result<&Rc<RefCell<T>>, StateError> {
        self.slot.as_ref().ok_or(StateError::Unbound)
    }

    /// Read a copy of the current value, or [`StateError::Unbound`].
    pub fn try_get(&self) -> Result<T, StateError>
    where
        T: Clone,
    {
        Ok(self.slot()?.borrow().clone())
    }

    /// Read a copy of the current value.
    ///
    /// # Panics
    ///
    /// Panics if the handle is unbound.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        match self.try_get() {
            Ok(v) => v,
            Err(e) => panic!("State::get: {e}"),
        }
    }

    /// Overwrite the value, or return [`StateError::Unbound`].
    pub fn try_set(&self, value: T) -> Result<(), StateError> {
        *self.slot()?.borrow_mut() = value;
        Ok(())
    }

    /// Overwrite the value.
    ///
    /// # Panics
    ///
    /// Panics if the handle is unbound.
    pub fn set(&self, value: T) {
        if let Err(e) = self.try_set(value) {
            panic!("State::set: {e}");
        }
    }

    /// Borrow the value immutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is unbound, or if the slot is already mutably
    /// borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        match self.slot() {
            Ok(slot) => slot.borrow(),
            Err(e) => panic!("State::borrow: {e}"),
        }
    }

    /// Borrow the value mutably for in-place edits.
    ///
    /// This is the accessor to reach for with large values where
    /// copy-out/copy-in would be wasteful. Do not hold the guard across a
    /// call that may walk the tree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is unbound, or if the slot is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        match self.slot() {
            Ok(slot) => slot.borrow_mut(),
            Err(e) => panic!("State::borrow_mut: {e}"),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.slot {
            Some(slot) => f.debug_tuple("State").field(&slot.borrow()).finish(),
            None => f.write_str("State(<unbound>)"),
        }
    }
}
