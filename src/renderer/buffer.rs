//! The frame buffer - the drawing surface handed to render callbacks.
//!
//! A plain width x height grid of [`Cell`]s. Render callbacks draw into it
//! with clipped primitives; the host presents it afterwards with the
//! [`DiffRenderer`](super::DiffRenderer). The buffer has no notion of the
//! scene graph - it is created and owned by the host and passed down the
//! render walk by `&mut`.

use crate::types::{Attr, Cell, Rgba};

/// A grid of terminal cells for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer of blank cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Reset every cell to a blank with the given background.
    pub fn clear(&mut self, bg: Rgba) {
        self.cells.fill(Cell::blank(bg));
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// The cell at (x, y), or `None` outside the grid.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Overwrite the cell at (x, y); silently clipped outside the grid.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Fill a rectangle of cells, clipped to the grid. Coordinates are
    /// signed so callers can pass world positions that are partly off
    /// screen.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, cell: Cell) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for cy in y0..y1 {
            for cx in x0..x1 {
                self.set(cx as u16, cy as u16, cell);
            }
        }
    }

    /// Draw a line of text starting at (x, y), clipped to the grid,
    /// preserving the background already in each cell.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, fg: Rgba) {
        self.draw_text_attr(x, y, text, fg, Attr::NONE);
    }

    /// [`draw_text`](Self::draw_text) with attributes.
    pub fn draw_text_attr(&mut self, x: i32, y: i32, text: &str, fg: Rgba, attrs: Attr) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let cx = x + offset as i32;
            if cx < 0 {
                continue;
            }
            if cx >= self.width as i32 {
                break;
            }
            let Some(i) = self.index(cx as u16, y as u16) else {
                break;
            };
            let bg = self.cells[i].bg;
            self.cells[i] = Cell { ch, fg, bg, attrs };
        }
    }

    /// Iterate cells row-major with coordinates.
    pub(crate) fn iter_cells(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let x = (i % self.width as usize) as u16;
            let y = (i / self.width as usize) as u16;
            (x, y, cell)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_blank() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.get(0, 0), Some(&Cell::default()));
        assert_eq!(fb.get(3, 2), Some(&Cell::default()));
        assert_eq!(fb.get(4, 0), None);
        assert_eq!(fb.get(0, 3), None);
    }

    #[test]
    fn clear_sets_background_everywhere() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.clear(Rgba::RED);
        assert_eq!(fb.get(1, 1).unwrap().bg, Rgba::RED);
        assert_eq!(fb.get(1, 1).unwrap().ch, ' ');
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut fb = FrameBuffer::new(4, 4);
        let green = Cell {
            ch: '#',
            fg: Rgba::GREEN,
            bg: Rgba::GREEN,
            attrs: Attr::NONE,
        };
        fb.fill_rect(-2, -2, 4, 4, green);
        assert_eq!(fb.get(0, 0).unwrap().ch, '#');
        assert_eq!(fb.get(1, 1).unwrap().ch, '#');
        assert_eq!(fb.get(2, 2).unwrap().ch, ' ');
    }

    #[test]
    fn fill_rect_fully_outside_is_a_no_op() {
        let mut fb = FrameBuffer::new(4, 4);
        let before = fb.clone();
        fb.fill_rect(10, 10, 3, 3, Cell::blank(Rgba::RED));
        fb.fill_rect(0, 0, 0, 2, Cell::blank(Rgba::RED));
        assert_eq!(fb, before);
    }

    #[test]
    fn draw_text_preserves_cell_background() {
        let mut fb = FrameBuffer::new(8, 1);
        fb.clear(Rgba::GREEN);
        fb.draw_text(0, 0, "hi", Rgba::BLACK);
        let cell = fb.get(0, 0).unwrap();
        assert_eq!(cell.ch, 'h');
        assert_eq!(cell.fg, Rgba::BLACK);
        assert_eq!(cell.bg, Rgba::GREEN);
    }

    #[test]
    fn draw_text_clips_at_the_right_edge() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.draw_text(1, 0, "abcdef", Rgba::WHITE);
        assert_eq!(fb.get(1, 0).unwrap().ch, 'a');
        assert_eq!(fb.get(2, 0).unwrap().ch, 'b');
    }

    #[test]
    fn draw_text_off_screen_row_is_a_no_op() {
        let mut fb = FrameBuffer::new(3, 1);
        let before = fb.clone();
        fb.draw_text(0, 5, "abc", Rgba::WHITE);
        fb.draw_text(0, -1, "abc", Rgba::WHITE);
        assert_eq!(fb, before);
    }
}
