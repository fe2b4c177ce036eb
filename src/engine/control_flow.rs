//! Structural helpers - conditional mounting and grouping.
//!
//! [`conditional`] mounts and unmounts a child from a boolean cell without
//! destroying it: the child keeps its hook storage while unmounted, so a
//! remount resumes where it left off (pause/resume, not
//! remount-from-scratch).

use std::rc::Rc;

use super::node::{Node, NodePtr};
use super::state::State;
use crate::deps;

/// Wrap `child` in a node that mounts it while `condition` is true and
/// unmounts it while false.
///
/// The wrapper carries a single effect, dependent on the condition cell.
/// Evaluations with an unchanged condition are no-ops, and a true condition
/// never mounts the child twice. Unmounting unparents only; the child's
/// accumulated state survives for the next mount.
///
/// # Example
///
/// ```
/// use twig_tui::engine::{Node, conditional, update_tree};
///
/// let overlay = Node::new();
/// let visible = Node::new().state(false);
/// let gate = conditional(visible.clone(), overlay.clone());
///
/// update_tree(&gate, 0.0);
/// assert!(!gate.has_child(&overlay));
///
/// visible.set(true);
/// update_tree(&gate, 0.0);
/// assert!(gate.has_child(&overlay));
/// ```
pub fn conditional(condition: State<bool>, child: NodePtr) -> NodePtr {
    let node = Node::new();
    let wrapper = Rc::downgrade(&node);
    let gate = condition.clone();
    node.effect(
        move || {
            let Some(wrapper) = wrapper.upgrade() else {
                return;
            };
            let mounted = wrapper.has_child(&child);
            if gate.get() {
                if !mounted {
                    wrapper.add_child(&child);
                }
            } else if mounted {
                wrapper.remove_child(&child);
            }
        },
        deps![condition],
    );
    node
}

/// Group nodes under one parent with no behavior of its own.
pub fn fragment(children: Vec<NodePtr>) -> NodePtr {
    let node = Node::new();
    for child in &children {
        node.add_child(child);
    }
    node
}
