//! A text label node with fully prop-driven content.

use crate::engine::{Node, NodePtr, Prop};
use crate::types::Rgba;

/// Build a label that draws `content` horizontally centered on
/// `position.0`, at row `position.1`. Every parameter is a [`Prop`], so any
/// of them may be a literal, a live cell, or a getter; they are resolved
/// fresh on each render pass.
pub fn text(
    content: Prop<String>,
    position: Prop<(i32, i32)>,
    color: Prop<Rgba>,
    visible: Prop<bool>,
) -> NodePtr {
    let node = Node::new();

    node.render(move |frame| {
        if !visible.get() {
            return;
        }
        let line = content.get();
        if line.is_empty() {
            return;
        }
        let (center_x, y) = position.get();
        let x = center_x - line.chars().count() as i32 / 2;
        frame.draw_text(x, y, &line, color.get());
    });

    node
}
