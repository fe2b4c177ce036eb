//! # twig-tui
//!
//! A retained-tree reactive scene graph for terminal games, with a Flappy
//! Bird demo built on top of it.
//!
//! Components are plain functions that build [`engine::Node`]s, attach state
//! cells and hooks, and wire children. The tree is built once and then
//! walked every frame by three fixed traversals:
//!
//! - [`engine::update_tree`] - update callbacks and dependency-gated
//!   effects, with the frame's delta time
//! - [`engine::render_tree`] - draw into a [`renderer::FrameBuffer`]
//! - [`engine::event_tree`] - deliver one input event to every node
//!
//! There is no virtual DOM and no reconciliation: reactivity is pull-based.
//! Effects poll their declared dependencies (see [`deps!`]) and run only
//! when one changed since the last evaluation.
//!
//! ## Example
//!
//! ```
//! use twig_tui::deps;
//! use twig_tui::engine::{Node, update_tree};
//!
//! let node = Node::new();
//! let health = node.state(100u32);
//!
//! let health_for_effect = health.clone();
//! node.effect(
//!     move || println!("health is now {}", health_for_effect.get()),
//!     deps![health],
//! );
//!
//! update_tree(&node, 0.016); // first run always fires
//! update_tree(&node, 0.016); // unchanged: effect is skipped
//! health.set(90);
//! update_tree(&node, 0.016); // changed: effect fires again
//! ```

pub mod engine;
pub mod game;
pub mod renderer;
pub mod types;

pub use engine::{Node, NodePtr, Prop, State};
pub use renderer::{DiffRenderer, FrameBuffer};
