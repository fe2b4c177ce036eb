//! Terminal rendering: a per-frame cell grid and a diff-based presenter.
//!
//! Render callbacks draw into a [`FrameBuffer`]; the host then hands the
//! finished frame to a [`DiffRenderer`], which writes only the cells that
//! changed since the previous frame.

mod buffer;
mod diff;

pub use buffer::FrameBuffer;
pub use diff::DiffRenderer;
