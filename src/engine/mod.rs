//! The retained-tree reactive engine.
//!
//! A tree of [`Node`]s is built once and walked every frame - no virtual-DOM
//! diffing, no reconciliation. Each node carries hooks registered at setup:
//!
//! - [`State<T>`] cells: shared mutable slots, read/written from anywhere
//!   that holds a handle.
//! - Update / render / event callbacks, run by the three [tree
//!   walkers](self::tree).
//! - Effects: actions gated on polled dependency change, declared with
//!   [`deps!`](crate::deps).
//! - [`Prop<T>`]: literal / cell / getter parameter values.
//! - Context: ancestor-published cell handles resolved by upward walk.
//!
//! The host drives the loop: one `update_tree` + one `render_tree` per
//! frame, `event_tree` per delivered input event. Everything is
//! single-threaded and synchronous.

pub mod context;
pub mod control_flow;
pub mod effect;
pub mod node;
pub mod prop;
pub mod state;
pub mod tree;

pub use control_flow::{conditional, fragment};
pub use effect::{Dependency, EffectHook, IntoDependency};
pub use node::{Event, Node, NodePtr, create_child, create_node};
pub use prop::Prop;
pub use state::{State, StateError};
pub use tree::{event_tree, render_tree, update_tree};
