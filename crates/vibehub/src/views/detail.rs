#![forbid(unsafe_code)]

//! Prompt detail overlay, drawn as an editor window over a dimmed gallery.

use vibe_catalog::{IconMap, PromptRecord};
use vibe_core::{Rect, Size};
use vibe_render::text::{display_width, wrap};
use vibe_render::{Buffer, PackedRgba, StyleFlags};

use super::{put_spans, rule};
use crate::modal::{DetailView, STATUS_MODE};
use crate::theme;

const MAX_WIDTH: u16 = 100;
const HEIGHT_PERCENT: u32 = 85;
const CLOSE_LABEL: &str = "[x]";
const NONE: StyleFlags = StyleFlags::empty();

struct HeaderLine {
    text: String,
    fg: PackedRgba,
    flags: StyleFlags,
}

/// Regions of the overlay for one record at one screen size.
struct DetailLayout {
    frame: Rect,
    title: Rect,
    header: Rect,
    code_bar: Rect,
    body: Rect,
    status: Rect,
    header_lines: Vec<HeaderLine>,
    code_lines: Vec<String>,
}

fn frame_rect(size: Size) -> Rect {
    let screen = Rect::from_size(size);
    let width = MAX_WIDTH.min(size.width.saturating_sub(4));
    let height = (u32::from(size.height) * HEIGHT_PERCENT / 100) as u16;
    screen.centered(width, height.min(size.height.saturating_sub(2)))
}

fn header_lines(record: &PromptRecord, width: usize) -> Vec<HeaderLine> {
    let mut lines = vec![HeaderLine {
        text: record.category.label(),
        fg: theme::PEACH,
        flags: NONE,
    }];
    for text in wrap(&record.title, width) {
        lines.push(HeaderLine {
            text,
            fg: theme::WHITE,
            flags: StyleFlags::BOLD,
        });
    }
    for text in wrap(&record.description, width) {
        lines.push(HeaderLine {
            text,
            fg: theme::CREAM_MUTED,
            flags: NONE,
        });
    }
    if !record.tags.is_empty() {
        let tags = record
            .tags
            .iter()
            .map(|t| format!("#{t}"))
            .collect::<Vec<_>>()
            .join(" ");
        for text in wrap(&tags, width) {
            lines.push(HeaderLine {
                text,
                fg: theme::GRAPE,
                flags: NONE,
            });
        }
    }
    lines
}

fn compute(size: Size, record: &PromptRecord) -> DetailLayout {
    let frame = frame_rect(size);
    let inner = frame.inset(1, 1);
    // Category line is indented behind the icon.
    let text_width = usize::from(inner.width.saturating_sub(4));
    let header_lines = header_lines(record, text_width);

    let (title, rest) = inner.split_top(2);
    let (rest, status) = rest.split_bottom(2);
    let wanted = header_lines.len() as u16 + 1;
    let (header, code) = rest.split_top(wanted.min(rest.height / 2));
    let (code_bar, body) = code.split_top(1);
    let body = body.inset(2, 0);
    let code_lines = wrap(&record.code, usize::from(body.width));

    DetailLayout {
        frame,
        title,
        header,
        code_bar,
        body,
        status,
        header_lines,
        code_lines,
    }
}

fn too_small(frame: Rect) -> bool {
    frame.width < 8 || frame.height < 6
}

/// Largest scroll offset that still fills the code body.
#[must_use]
pub fn max_scroll(size: Size, record: &PromptRecord) -> usize {
    let layout = compute(size, record);
    if too_small(layout.frame) || layout.body.is_empty() {
        return 0;
    }
    layout
        .code_lines
        .len()
        .saturating_sub(usize::from(layout.body.height))
}

pub fn render(view: &DetailView, record: &PromptRecord, icons: &IconMap, buf: &mut Buffer) {
    buf.fill(buf.area(), theme::SCRIM);
    let layout = compute(buf.size(), record);
    let frame = layout.frame;
    if too_small(frame) {
        return;
    }
    buf.fill(frame, theme::DEPTH);
    buf.draw_border(frame, theme::GRAPE);

    title_bar(record, layout.title, buf);
    header(&layout, icons.get(record.category).glyph(), buf);
    code_block(view, &layout, buf);
    status_bar(view, layout.status, buf);
}

fn title_bar(record: &PromptRecord, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }
    buf.fill(Rect::new(area.x, area.y, area.width, 1), theme::PANEL);
    let title = DetailView::title(record);
    put_spans(
        buf,
        area.x + 1,
        area.y,
        area.width.saturating_sub(5),
        &[
            ("● ", theme::PEACH, NONE),
            ("● ", theme::CREAM, NONE),
            ("● ", theme::GRAPE, NONE),
            (" ", theme::WHITE, NONE),
            (title.as_str(), theme::CREAM_MUTED, NONE),
        ],
    );
    let x = area.right().saturating_sub(CLOSE_LABEL.len() as u16 + 1);
    buf.put_str(x, area.y, CLOSE_LABEL, theme::GRAPE, NONE, 3);
    if area.height > 1 {
        rule(buf, area.x, area.y + 1, area.width, theme::GRAPE_DIM);
    }
}

fn header(layout: &DetailLayout, icon: char, buf: &mut Buffer) {
    let area = layout.header.inset(1, 0);
    let mut glyph = [0; 4];
    for (i, (line, y)) in layout
        .header_lines
        .iter()
        .zip(area.y..area.bottom())
        .enumerate()
    {
        if i == 0 {
            let icon = icon.encode_utf8(&mut glyph);
            buf.put_str(area.x, y, icon, theme::PEACH, NONE, 2);
        }
        let x = area.x + 3;
        buf.put_str(x, y, &line.text, line.fg, line.flags, area.right().saturating_sub(x));
    }
}

fn code_block(view: &DetailView, layout: &DetailLayout, buf: &mut Buffer) {
    let bar = layout.code_bar;
    if bar.is_empty() {
        return;
    }
    let panel = Rect::new(bar.x, bar.y, bar.width, bar.height + layout.body.height);
    buf.fill(panel.inset(1, 0), theme::INSET);
    buf.put_str(bar.x + 2, bar.y, "// prompt.sh", theme::GRAPE, NONE, bar.width / 2);

    let label = view.copy_label();
    let color = if view.is_copied() {
        theme::PEACH
    } else {
        theme::CREAM
    };
    let width = display_width(label) as u16;
    let x = bar.right().saturating_sub(width + 2);
    buf.put_str(x, bar.y, label, color, StyleFlags::BOLD, width);

    let body = layout.body;
    let gutter = body.x.saturating_sub(1);
    for (line, y) in layout
        .code_lines
        .iter()
        .skip(view.scroll())
        .zip(body.y..body.bottom())
    {
        buf.put_str(gutter, y, "▎", theme::GRAPE_DIM, NONE, 1);
        buf.put_str(body.x, y, line, theme::CREAM, NONE, body.width);
    }
}

fn status_bar(view: &DetailView, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }
    rule(buf, area.x, area.y, area.width, theme::GRAPE_DIM);
    let y = area.bottom() - 1;
    if y == area.y {
        return;
    }
    buf.put_str(area.x + 1, y, STATUS_MODE, theme::PEACH, StyleFlags::BOLD, area.width / 2);
    let position = view.position_label();
    let width = display_width(&position) as u16;
    buf.put_str(
        area.right().saturating_sub(width + 1),
        y,
        &position,
        theme::CREAM_MUTED,
        NONE,
        width,
    );
}
