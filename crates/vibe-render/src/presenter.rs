#![forbid(unsafe_code)]

//! State-tracked terminal output.
//!
//! The presenter keeps the last frame it wrote and, on each
//! [`Presenter::present`], emits only the cells that differ. Cursor moves
//! are skipped when the next changed cell directly follows the previous
//! one, and colors/attributes are only re-sent when they change. The whole
//! frame is wrapped in a synchronized update and flushed once.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};

use crate::buffer::Buffer;
use crate::cell::{Cell, PackedRgba, StyleFlags};

/// Counters from one [`Presenter::present`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentStats {
    /// Cells written.
    pub cells: usize,
    /// Explicit cursor moves emitted.
    pub moves: usize,
    /// Whether the whole screen was repainted.
    pub full: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pen {
    fg: PackedRgba,
    bg: PackedRgba,
    flags: StyleFlags,
}

/// Diffing presenter over any writer.
#[derive(Debug)]
pub struct Presenter<W: Write> {
    writer: W,
    prev: Option<Buffer>,
    pen: Option<Pen>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            prev: None,
            pen: None,
        }
    }

    /// Forget the last frame so the next present repaints everything.
    pub fn invalidate(&mut self) {
        self.prev = None;
        self.pen = None;
    }

    /// Mutable access to the underlying writer, for out-of-band sequences
    /// such as OSC 52.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write the differences between the last frame and `next`.
    pub fn present(&mut self, next: &Buffer) -> io::Result<PresentStats> {
        let full = self.prev.as_ref().is_none_or(|p| p.size() != next.size());
        let mut stats = PresentStats {
            full,
            ..PresentStats::default()
        };

        queue!(self.writer, terminal::BeginSynchronizedUpdate)?;
        if full {
            self.pen = None;
            queue!(
                self.writer,
                SetAttribute(Attribute::Reset),
                terminal::Clear(terminal::ClearType::All)
            )?;
        }

        let width = usize::from(next.width());
        let mut cursor_at: Option<(u16, u16)> = None;
        for (idx, cell) in next.cells().iter().enumerate() {
            if cell.is_continuation() {
                continue;
            }
            if !full
                && let Some(prev) = &self.prev
                && prev.cells().get(idx) == Some(cell)
            {
                continue;
            }
            let x = (idx % width) as u16;
            let y = (idx / width) as u16;
            if cursor_at != Some((x, y)) {
                queue!(self.writer, cursor::MoveTo(x, y))?;
                stats.moves += 1;
            }
            self.apply_pen(cell)?;
            let mut utf8 = [0u8; 4];
            self.writer.write_all(cell.ch.encode_utf8(&mut utf8).as_bytes())?;
            stats.cells += 1;
            let advance = if next.get(x + 1, y).is_some_and(Cell::is_continuation) {
                2
            } else {
                1
            };
            cursor_at = Some((x + advance, y));
        }

        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            terminal::EndSynchronizedUpdate
        )?;
        self.pen = None;
        self.writer.flush()?;

        match &mut self.prev {
            Some(prev) => prev.clone_from(next),
            None => self.prev = Some(next.clone()),
        }
        tracing::trace!(cells = stats.cells, moves = stats.moves, full, "frame presented");
        Ok(stats)
    }

    fn apply_pen(&mut self, cell: &Cell) -> io::Result<()> {
        let want = Pen {
            fg: cell.fg,
            bg: cell.bg,
            flags: cell.flags,
        };
        let have = self.pen;
        if have.is_some_and(|p| p.flags != want.flags) || (have.is_none() && !want.flags.is_empty())
        {
            // Attributes cannot be cleared one by one portably; reset and
            // re-send the colors as well.
            queue!(self.writer, SetAttribute(Attribute::Reset))?;
            for (flag, attr) in [
                (StyleFlags::BOLD, Attribute::Bold),
                (StyleFlags::DIM, Attribute::Dim),
                (StyleFlags::ITALIC, Attribute::Italic),
                (StyleFlags::UNDERLINE, Attribute::Underlined),
                (StyleFlags::REVERSE, Attribute::Reverse),
            ] {
                if want.flags.contains(flag) {
                    queue!(self.writer, SetAttribute(attr))?;
                }
            }
            self.pen = None;
        }
        let have = self.pen;
        if have.is_none_or(|p| p.fg != want.fg) {
            queue!(self.writer, SetForegroundColor(to_color(want.fg)))?;
        }
        if have.is_none_or(|p| p.bg != want.bg) {
            queue!(self.writer, SetBackgroundColor(to_color(want.bg)))?;
        }
        self.pen = Some(want);
        Ok(())
    }
}

fn to_color(c: PackedRgba) -> Color {
    Color::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    }
}
