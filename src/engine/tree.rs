//! Tree walkers - the three fixed depth-first traversals.
//!
//! Each walker applies the current node's callbacks of its kind, then
//! recurses into the children in list order. The update walker additionally
//! evaluates the node's effects after its plain update callbacks and
//! *before* descending, so a parent's derived values are fresh when children
//! read them in the same pass.
//!
//! Hook lists and child lists are snapshotted (cheap `Rc` clones) before
//! iteration: callbacks may add or remove nodes in the tree currently being
//! walked without invalidating the traversal. A node removed mid-walk is not
//! visited twice, but one already captured in a snapshot may still see the
//! remainder of the current pass.
//!
//! One host frame is one `update_tree` call followed by one `render_tree`
//! call; `event_tree` runs whenever the host delivers input, always
//! completing before the next update or render begins. Everything is
//! synchronous and single-threaded; a panic in a callback aborts the walk
//! and propagates to the host's per-frame boundary.

use super::node::{Event, NodePtr};
use crate::renderer::FrameBuffer;

/// Run one update pass: per node, plain update callbacks, then effects,
/// then children.
pub fn update_tree(node: &NodePtr, dt: f64) {
    for callback in node.update_hooks() {
        (&mut *callback.borrow_mut())(dt);
    }
    for effect in node.effect_hooks() {
        effect.borrow_mut().run_if_changed();
    }
    for child in node.children() {
        update_tree(&child, dt);
    }
}

/// Run one render pass, threading the frame through every render callback.
///
/// The frame is owned by the host and must not be retained past the call.
pub fn render_tree(node: &NodePtr, frame: &mut FrameBuffer) {
    for callback in node.render_hooks() {
        (&mut *callback.borrow_mut())(frame);
    }
    for child in node.children() {
        render_tree(&child, frame);
    }
}

/// Dispatch one input event through every event callback, pre-order.
pub fn event_tree(node: &NodePtr, event: &Event) {
    for callback in node.event_hooks() {
        (&mut *callback.borrow_mut())(event);
    }
    for child in node.children() {
        event_tree(&child, event);
    }
}
