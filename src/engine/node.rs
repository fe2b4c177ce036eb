//! Nodes and hook storage - the retained scene graph.
//!
//! A [`Node`] is a tree vertex owning its hook storage (state slots, update /
//! render / event callbacks, effects) and its children. The parent link is a
//! weak back-reference used only for upward context lookup, never for
//! ownership: dropping the last `NodePtr` to a node tears down its whole
//! subtree.
//!
//! Hooks are registered during component setup and never removed; the walkers
//! in [`tree`](super::tree) evaluate them once per pass. All interior
//! mutability is single-threaded `RefCell` - the engine has no locking and
//! no suspension points.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::effect::{Dependency, EffectHook};
use super::state::State;
use crate::renderer::FrameBuffer;

/// Shared owning pointer to a node.
pub type NodePtr = Rc<Node>;

/// The input-event handle delivered to event callbacks.
///
/// Owned by the host, read-only by convention, never retained past the walk.
pub type Event = crossterm::event::Event;

pub(crate) type UpdateFn = Rc<RefCell<dyn FnMut(f64)>>;
pub(crate) type RenderFn = Rc<RefCell<dyn FnMut(&mut FrameBuffer)>>;
pub(crate) type EventFn = Rc<RefCell<dyn FnMut(&Event)>>;

// =============================================================================
// Hook storage
// =============================================================================

/// Per-node bucket of registered hooks, in registration order.
///
/// Each callback sits behind its own `Rc<RefCell<..>>` so a walk can snapshot
/// the list and invoke entries while setup code appends new ones.
#[derive(Default)]
pub(crate) struct HookStorage {
    /// Type-erased state slots; retrieval-by-type scans linearly and
    /// returns the first match.
    state_slots: RefCell<Vec<Rc<dyn Any>>>,
    updates: RefCell<Vec<UpdateFn>>,
    renders: RefCell<Vec<RenderFn>>,
    events: RefCell<Vec<EventFn>>,
    effects: RefCell<Vec<Rc<RefCell<EffectHook>>>>,
}

// =============================================================================
// Node
// =============================================================================

/// A scene-graph vertex.
///
/// Created with [`Node::new`] (or the [`create_node`] / [`create_child`]
/// free functions) and wired into a tree with [`add_child`](Node::add_child),
/// [`remove_child`](Node::remove_child) and
/// [`set_children`](Node::set_children), which keep both sides of the
/// parent/child link consistent.
pub struct Node {
    pub(crate) parent: RefCell<Weak<Node>>,
    pub(crate) children: RefCell<Vec<NodePtr>>,
    pub(crate) contexts: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    hooks: HookStorage,
    /// Weak handle to the owning `Rc`, installed at construction so tree
    /// mutation can hand out parent back-references from an `&self` method.
    weak_self: Weak<Node>,
}

impl Node {
    /// Create a detached node.
    pub fn new() -> NodePtr {
        Rc::new_cyclic(|weak_self| Node {
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            contexts: RefCell::new(HashMap::new()),
            hooks: HookStorage::default(),
            weak_self: weak_self.clone(),
        })
    }

    // =========================================================================
    // Hook registration
    // =========================================================================

    /// Allocate a state slot in this node's hook storage and return a bound
    /// handle.
    ///
    /// Slots are kept in registration order and
    /// [`state_slot`](Node::state_slot) returns the *first* slot of a type,
    /// so a node must not register two same-typed cells that both need to be
    /// found by type.
    pub fn state<T: 'static>(&self, initial: T) -> State<T> {
        let slot = Rc::new(RefCell::new(initial));
        self.hooks
            .state_slots
            .borrow_mut()
            .push(slot.clone() as Rc<dyn Any>);
        State::bound(slot)
    }

    /// Find the first state slot of type `T` registered on this node.
    pub fn state_slot<T: 'static>(&self) -> Option<State<T>> {
        self.hooks
            .state_slots
            .borrow()
            .iter()
            .find_map(|slot| slot.clone().downcast::<RefCell<T>>().ok())
            .map(State::bound)
    }

    /// Register an update callback, run once per update pass with the frame's
    /// elapsed seconds.
    pub fn update(&self, f: impl FnMut(f64) + 'static) {
        self.hooks.updates.borrow_mut().push(Rc::new(RefCell::new(f)));
    }

    /// Register a render callback, run once per render pass with the frame
    /// being drawn.
    pub fn render(&self, f: impl FnMut(&mut FrameBuffer) + 'static) {
        self.hooks.renders.borrow_mut().push(Rc::new(RefCell::new(f)));
    }

    /// Register an input-event callback.
    pub fn on_event(&self, f: impl FnMut(&Event) + 'static) {
        self.hooks.events.borrow_mut().push(Rc::new(RefCell::new(f)));
    }

    /// Register a dependency-gated effect.
    ///
    /// Declare dependencies with the [`deps!`](crate::deps) macro. The action
    /// runs on the first update pass and thereafter whenever a tracked cell
    /// changed; with no dependencies it runs exactly once.
    pub fn effect(&self, action: impl FnMut() + 'static, dependencies: Vec<Box<dyn Dependency>>) {
        self.hooks
            .effects
            .borrow_mut()
            .push(Rc::new(RefCell::new(EffectHook::new(action, dependencies))));
    }

    /// Create a derived cell: `compute` seeds it immediately, and an effect
    /// with the given dependencies recomputes it whenever one of them
    /// changes.
    ///
    /// The returned cell is consistent with its dependencies as of the most
    /// recent update pass; because a node's effects run before its children
    /// are visited, descendants reading it in the same pass see the fresh
    /// value.
    pub fn derived<R: Clone + PartialEq + 'static>(
        &self,
        compute: impl Fn() -> R + 'static,
        dependencies: Vec<Box<dyn Dependency>>,
    ) -> State<R> {
        let cell = self.state(compute());
        let sink = cell.clone();
        self.effect(move || sink.set(compute()), dependencies);
        cell
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    /// Append a child and point its back-reference here.
    ///
    /// If the child currently belongs to a different parent it is unlinked
    /// from there first, so the parent pointer always names a node whose
    /// child list contains it.
    pub fn add_child(&self, child: &NodePtr) {
        let previous = child.parent.borrow().upgrade();
        if let Some(previous) = previous {
            if !std::ptr::eq(previous.as_ref(), self) {
                previous.remove_child(child);
            }
        }
        self.children.borrow_mut().push(child.clone());
        *child.parent.borrow_mut() = self.weak_self.clone();
    }

    /// Remove the first child matching by identity and clear its
    /// back-reference. Silent no-op if the node is not a child.
    ///
    /// Removal unparents only - the child (and its accumulated state) is
    /// destroyed when the last `NodePtr` to it is dropped.
    pub fn remove_child(&self, child: &NodePtr) {
        let removed = {
            let mut children = self.children.borrow_mut();
            children
                .iter()
                .position(|c| Rc::ptr_eq(c, child))
                .map(|index| children.remove(index))
        };
        if let Some(removed) = removed {
            *removed.parent.borrow_mut() = Weak::new();
        }
    }

    /// Replace the whole child list: unparent every current child, then
    /// adopt the new ones in order.
    ///
    /// Per-child state survives only for children whose identity is
    /// preserved across calls.
    pub fn set_children(&self, new_children: Vec<NodePtr>) {
        let old_children = std::mem::take(&mut *self.children.borrow_mut());
        for old in &old_children {
            *old.parent.borrow_mut() = Weak::new();
        }
        let mut children = self.children.borrow_mut();
        for child in new_children {
            *child.parent.borrow_mut() = self.weak_self.clone();
            children.push(child);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The parent, if this node is attached and the parent is alive.
    pub fn parent(&self) -> Option<NodePtr> {
        self.parent.borrow().upgrade()
    }

    /// Whether `candidate` is currently in the child list.
    pub fn has_child(&self, candidate: &NodePtr) -> bool {
        self.children
            .borrow()
            .iter()
            .any(|c| Rc::ptr_eq(c, candidate))
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Snapshot of the child list.
    ///
    /// Walkers iterate over this copy, so callbacks are free to mutate the
    /// tree they are being walked from.
    pub fn children(&self) -> Vec<NodePtr> {
        self.children.borrow().clone()
    }

    // =========================================================================
    // Walk support (snapshots of the hook lists)
    // =========================================================================

    pub(crate) fn update_hooks(&self) -> Vec<UpdateFn> {
        self.hooks.updates.borrow().clone()
    }

    pub(crate) fn render_hooks(&self) -> Vec<RenderFn> {
        self.hooks.renders.borrow().clone()
    }

    pub(crate) fn event_hooks(&self) -> Vec<EventFn> {
        self.hooks.events.borrow().clone()
    }

    pub(crate) fn effect_hooks(&self) -> Vec<Rc<RefCell<EffectHook>>> {
        self.hooks.effects.borrow().clone()
    }
}

/// Create a detached node. The only way a node originates.
pub fn create_node() -> NodePtr {
    Node::new()
}

/// Create a node already attached under `parent`.
pub fn create_child(parent: &NodePtr) -> NodePtr {
    let node = Node::new();
    parent.add_child(&node);
    node
}
