//! Context - ancestor-published state resolved by an upward walk.
//!
//! A node publishes a *capability token*: a shared [`State<T>`] handle,
//! keyed by the type of the carried value. Descendants resolve it by walking
//! parent links and get a handle to the very same slot, so mutations made
//! through it are live for everyone - without any raw pointer into another
//! node's storage.
//!
//! Resolution misses are ordinary `None`s, not faults: a component may be
//! built before it is mounted under its provider, and simply resolves again
//! on a later pass. A stored entry that fails the typed downcast is treated
//! exactly like a miss; the engine never reinterprets an erased value
//! unchecked.

use std::any::TypeId;
use std::rc::Rc;

use super::node::Node;
use super::state::State;

impl Node {
    /// Publish `value` on this node for this node and its descendants,
    /// keyed by `TypeId::of::<T>()`.
    ///
    /// Providing a second handle of the same type replaces the first.
    pub fn provide_context<T: 'static>(&self, value: State<T>) {
        self.contexts
            .borrow_mut()
            .insert(TypeId::of::<T>(), Rc::new(value));
    }

    /// Resolve a published handle of type `T`, checking this node first and
    /// then walking up the parent chain. Returns `None` when no ancestor
    /// provides one.
    pub fn context<T: 'static>(&self) -> Option<State<T>> {
        let found = self
            .contexts
            .borrow()
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<State<T>>().cloned());
        if found.is_some() {
            return found;
        }
        self.parent().and_then(|parent| parent.context::<T>())
    }
}
