#![forbid(unsafe_code)]

//! A row-major grid of cells.
//!
//! Drawing is clipped to the buffer bounds; out-of-range writes are ignored
//! rather than reported. Text drawing keeps the existing background so that
//! labels can sit on top of the animated backdrop.

use unicode_segmentation::UnicodeSegmentation;
use vibe_core::{Rect, Size};

use crate::cell::{Cell, PackedRgba, StyleFlags};
use crate::text::display_width;

/// Cell grid the views draw into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer filled with `fill`.
    #[must_use]
    pub fn new(size: Size, fill: Cell) -> Self {
        Self {
            width: size.width,
            height: size.height,
            cells: vec![fill; size.area()],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The full buffer area.
    #[must_use]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Resize in place, resetting every cell to `fill`.
    pub fn resize(&mut self, size: Size, fill: Cell) {
        self.width = size.width;
        self.height = size.height;
        self.cells.clear();
        self.cells.resize(size.area(), fill);
    }

    /// Reset every cell to `fill`.
    pub fn clear(&mut self, fill: Cell) {
        self.cells.fill(fill);
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Blend `color` over the backdrop of every cell in `rect`, clearing any
    /// glyph. Opaque colors simply paint the area.
    pub fn fill(&mut self, rect: Rect, color: PackedRgba) {
        let rect = rect.intersection(&self.area());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    let bg = color.over(cell.backdrop());
                    *cell = Cell::blank(bg);
                }
            }
        }
    }

    /// Draw `text` starting at `(x, y)`, clipped to `max_width` columns and
    /// the buffer edge. Returns the number of columns written.
    pub fn put_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: PackedRgba,
        flags: StyleFlags,
        max_width: u16,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;
        for g in text.graphemes(true) {
            if g.chars().any(char::is_control) {
                continue;
            }
            let w = display_width(g) as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > limit {
                break;
            }
            let Some(ch) = g.chars().next() else {
                continue;
            };
            if let Some(cell) = self.get_mut(col, y) {
                let bg = cell.backdrop();
                *cell = Cell {
                    ch,
                    fg,
                    bg,
                    flags,
                };
            }
            for extra in 1..w {
                if let Some(cell) = self.get_mut(col + extra, y) {
                    *cell = Cell::continuation(cell.backdrop());
                }
            }
            col += w;
        }
        col - x
    }

    /// Draw `text` horizontally centered within `rect` on row `y`.
    pub fn put_centered(
        &mut self,
        rect: Rect,
        y: u16,
        text: &str,
        fg: PackedRgba,
        flags: StyleFlags,
    ) -> u16 {
        let w = (display_width(text) as u16).min(rect.width);
        let x = rect.x + (rect.width - w) / 2;
        self.put_str(x, y, text, fg, flags, rect.width)
    }

    /// Outline `rect` with a single-line box.
    pub fn draw_border(&mut self, rect: Rect, fg: PackedRgba) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;
        for x in rect.x + 1..right {
            self.put_glyph(x, rect.y, '─', fg);
            self.put_glyph(x, bottom, '─', fg);
        }
        for y in rect.y + 1..bottom {
            self.put_glyph(rect.x, y, '│', fg);
            self.put_glyph(right, y, '│', fg);
        }
        self.put_glyph(rect.x, rect.y, '┌', fg);
        self.put_glyph(right, rect.y, '┐', fg);
        self.put_glyph(rect.x, bottom, '└', fg);
        self.put_glyph(right, bottom, '┘', fg);
    }

    fn put_glyph(&mut self, x: u16, y: u16, ch: char, fg: PackedRgba) {
        if let Some(cell) = self.get_mut(x, y) {
            let bg = cell.backdrop();
            *cell = Cell::blank(bg).with_fg(fg);
            cell.ch = ch;
        }
    }

    /// Row `y` as plain text (wide-glyph tails skipped). Test and debug aid.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }

    /// Whether any row contains `needle`. Test and debug aid.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row_text(y).contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::UPPER_HALF;

    fn buf(w: u16, h: u16) -> Buffer {
        Buffer::new(Size::new(w, h), Cell::default())
    }

    #[test]
    fn put_str_clips_to_width_and_edge() {
        let mut b = buf(8, 2);
        let n = b.put_str(2, 0, "hello world", PackedRgba::WHITE, StyleFlags::empty(), 20);
        assert_eq!(n, 6);
        assert_eq!(b.row_text(0), "  hello ");
        let n = b.put_str(0, 1, "abcdef", PackedRgba::WHITE, StyleFlags::empty(), 3);
        assert_eq!(n, 3);
        assert_eq!(b.put_str(0, 5, "x", PackedRgba::WHITE, StyleFlags::empty(), 3), 0);
    }

    #[test]
    fn wide_glyph_occupies_two_cells() {
        let mut b = buf(4, 1);
        let n = b.put_str(0, 0, "日x", PackedRgba::WHITE, StyleFlags::empty(), 4);
        assert_eq!(n, 3);
        assert!(b.get(1, 0).is_some_and(Cell::is_continuation));
        assert_eq!(b.row_text(0), "日x ");
    }

    #[test]
    fn wide_glyph_not_split_at_limit() {
        let mut b = buf(4, 1);
        let n = b.put_str(0, 0, "a日", PackedRgba::WHITE, StyleFlags::empty(), 2);
        assert_eq!(n, 1);
    }

    #[test]
    fn text_keeps_backdrop_of_pixels() {
        let mut b = buf(2, 1);
        b.set(
            0,
            0,
            Cell::pixels(PackedRgba::rgb(200, 0, 0), PackedRgba::rgb(0, 0, 200)),
        );
        b.put_str(0, 0, "A", PackedRgba::WHITE, StyleFlags::BOLD, 2);
        let cell = b.get(0, 0).copied().unwrap_or_default();
        assert_eq!(cell.ch, 'A');
        assert_eq!(cell.bg, PackedRgba::rgb(100, 0, 100));
    }

    #[test]
    fn translucent_fill_blends_over_half_blocks() {
        let mut b = buf(1, 1);
        b.set(0, 0, Cell::pixels(PackedRgba::WHITE, PackedRgba::WHITE));
        b.fill(b.area(), PackedRgba::rgba(0, 0, 0, 128));
        let cell = b.get(0, 0).copied().unwrap_or_default();
        assert_ne!(cell.ch, UPPER_HALF);
        assert!((126..=128).contains(&cell.bg.r()), "got {}", cell.bg.r());
    }

    #[test]
    fn resize_reuses_and_resets() {
        let mut b = buf(3, 3);
        b.put_str(0, 0, "abc", PackedRgba::WHITE, StyleFlags::empty(), 3);
        b.resize(Size::new(5, 2), Cell::default());
        assert_eq!(b.cells().len(), 10);
        assert!(!b.contains_text("abc"));
    }

    #[test]
    fn border_draws_corners() {
        let mut b = buf(4, 3);
        b.draw_border(b.area(), PackedRgba::WHITE);
        assert_eq!(b.row_text(0), "┌──┐");
        assert_eq!(b.row_text(1), "│  │");
        assert_eq!(b.row_text(2), "└──┘");
    }
}
