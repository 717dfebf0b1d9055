#![forbid(unsafe_code)]

//! Drawing. Every view is a pure function of [`AppModel`] state into a
//! [`Buffer`].

pub mod boot;
pub mod detail;
pub mod gallery;

use vibe_core::{Clock, Rect, Size};
use vibe_render::{Buffer, Cell, PackedRgba, StyleFlags};

use crate::app::AppModel;
use crate::theme;

/// Rows taken by the top bar, its rule included.
pub const TOP_BAR_HEIGHT: u16 = 2;
/// Sidebar width, its right border included.
pub const SIDEBAR_WIDTH: u16 = 26;
/// Narrower screens drop the sidebar.
pub const SIDEBAR_MIN_SCREEN: u16 = 72;

/// Screen regions of the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub top: Rect,
    pub sidebar: Option<Rect>,
    pub main: Rect,
}

#[must_use]
pub fn layout(size: Size) -> ScreenLayout {
    let (top, rest) = Rect::from_size(size).split_top(TOP_BAR_HEIGHT);
    if size.width >= SIDEBAR_MIN_SCREEN {
        let (sidebar, main) = rest.split_left(SIDEBAR_WIDTH);
        ScreenLayout {
            top,
            sidebar: Some(sidebar),
            main,
        }
    } else {
        ScreenLayout {
            top,
            sidebar: None,
            main: rest,
        }
    }
}

/// Draw the whole screen.
pub fn render<C: Clock>(app: &AppModel<C>, buf: &mut Buffer) {
    if buf.size() != app.size() {
        buf.resize(app.size(), Cell::blank(theme::DEPTH));
    }
    if !app.boot_completed() {
        boot::render(app.boot(), app.blink_on(), buf);
        return;
    }
    app.background().compose(buf);
    gallery::render(app, buf);
    if let Some((view, record)) = app.open_detail() {
        detail::render(view, record, app.icons(), buf);
    }
}

/// Horizontal rule across `width` columns.
pub(crate) fn rule(buf: &mut Buffer, x: u16, y: u16, width: u16, fg: PackedRgba) {
    let line = "─".repeat(usize::from(width));
    buf.put_str(x, y, &line, fg, StyleFlags::empty(), width);
}

/// Draw consecutive segments on one row. Returns the column after the last.
pub(crate) fn put_spans(
    buf: &mut Buffer,
    x: u16,
    y: u16,
    max_width: u16,
    spans: &[(&str, PackedRgba, StyleFlags)],
) -> u16 {
    let mut col = x;
    let end = x.saturating_add(max_width);
    for (text, fg, flags) in spans {
        if col >= end {
            break;
        }
        col += buf.put_str(col, y, text, *fg, *flags, end - col);
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_screens_get_a_sidebar() {
        let l = layout(Size::new(120, 40));
        assert_eq!(l.top, Rect::new(0, 0, 120, 2));
        assert_eq!(l.sidebar, Some(Rect::new(0, 2, SIDEBAR_WIDTH, 38)));
        assert_eq!(l.main, Rect::new(SIDEBAR_WIDTH, 2, 120 - SIDEBAR_WIDTH, 38));
    }

    #[test]
    fn narrow_screens_drop_the_sidebar() {
        let l = layout(Size::new(50, 20));
        assert_eq!(l.sidebar, None);
        assert_eq!(l.main, Rect::new(0, 2, 50, 18));
    }

    #[test]
    fn tiny_screens_do_not_underflow() {
        let l = layout(Size::new(3, 1));
        assert_eq!(l.top.height, 1);
        assert!(l.main.is_empty());
    }

    #[test]
    fn spans_stop_at_width() {
        let mut buf = Buffer::new(Size::new(10, 1), Cell::default());
        let end = put_spans(
            &mut buf,
            0,
            0,
            6,
            &[
                ("abcd", theme::CREAM, StyleFlags::empty()),
                ("efgh", theme::GRAPE, StyleFlags::empty()),
            ],
        );
        assert_eq!(end, 6);
        assert_eq!(buf.row_text(0), "abcdef    ");
    }
}
