//! Differential presentation of a [`FrameBuffer`] to the terminal.
//!
//! The renderer compares the frame against the previously presented one and
//! emits only the cells that changed, wrapped in a synchronized update so
//! the terminal applies the whole frame atomically. Escape sequences are
//! queued into an in-memory buffer and flushed with a single write.
//!
//! Cursor moves and color/attribute changes are elided when redundant: the
//! renderer tracks where the cursor landed after the last cell and which
//! style is active, so a run of same-styled adjacent cells costs one
//! `MoveTo` and one style change.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};
use crossterm::queue;

use super::buffer::FrameBuffer;
use crate::types::{Attr, Cell, Rgba};

/// Writes frames to the terminal, outputting only changed cells.
pub struct DiffRenderer {
    out: Vec<u8>,
    previous: Option<FrameBuffer>,
    // Style and cursor state across queued cells within one frame.
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
    cursor: Option<(u16, u16)>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(8 * 1024),
            previous: None,
            fg: None,
            bg: None,
            attrs: None,
            cursor: None,
        }
    }

    /// Present a frame, emitting only cells that differ from the last
    /// presented frame. Returns whether anything was written.
    pub fn present(&mut self, frame: &FrameBuffer) -> io::Result<bool> {
        self.reset_frame_state();
        queue!(self.out, BeginSynchronizedUpdate)?;

        let diffable = self
            .previous
            .as_ref()
            .is_some_and(|prev| prev.width() == frame.width() && prev.height() == frame.height());

        let mut wrote = false;
        for (x, y, cell) in frame.iter_cells() {
            let unchanged = diffable
                && self
                    .previous
                    .as_ref()
                    .and_then(|prev| prev.get(x, y))
                    .is_some_and(|prev_cell| prev_cell == cell);
            if unchanged {
                continue;
            }
            self.queue_cell(x, y, cell)?;
            wrote = true;
        }

        queue!(self.out, EndSynchronizedUpdate)?;
        self.flush()?;
        self.previous = Some(frame.clone());
        Ok(wrote)
    }

    /// Present every cell regardless of the previous frame. Use after a
    /// resize or when the screen may be stale.
    pub fn present_full(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        self.invalidate();
        self.present(frame)?;
        Ok(())
    }

    /// Drop the previous frame so the next present is a full redraw.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    fn reset_frame_state(&mut self) {
        self.fg = None;
        self.bg = None;
        self.attrs = None;
        self.cursor = None;
    }

    fn queue_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            queue!(self.out, MoveTo(x, y))?;
        }

        if self.attrs != Some(cell.attrs) {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
            // An attribute reset also clears colors.
            self.fg = None;
            self.bg = None;
            for attribute in attributes_of(cell.attrs) {
                queue!(self.out, SetAttribute(attribute))?;
            }
            self.attrs = Some(cell.attrs);
        }

        if self.fg != Some(cell.fg) {
            queue!(self.out, SetForegroundColor(color_of(cell.fg)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(self.out, SetBackgroundColor(color_of(cell.bg)))?;
            self.bg = Some(cell.bg);
        }

        queue!(self.out, Print(cell.ch))?;
        // Print advances the cursor one column; track it so runs of adjacent
        // changed cells skip the MoveTo.
        self.cursor = Some((x + 1, y));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(&self.out)?;
        stdout.flush()?;
        self.out.clear();
        Ok(())
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn color_of(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

fn attributes_of(attrs: Attr) -> impl Iterator<Item = Attribute> {
    [
        (Attr::BOLD, Attribute::Bold),
        (Attr::DIM, Attribute::Dim),
        (Attr::ITALIC, Attribute::Italic),
        (Attr::UNDERLINE, Attribute::Underlined),
        (Attr::INVERSE, Attribute::Reverse),
    ]
    .into_iter()
    .filter_map(move |(flag, attribute)| attrs.contains(flag).then_some(attribute))
}
