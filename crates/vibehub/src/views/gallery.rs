#![forbid(unsafe_code)]

//! Gallery screen: top bar, directory sidebar, header and card grid.

use vibe_catalog::{Category, CategoryFilter, IconMap, PromptRecord};
use vibe_core::{Clock, Rect, Size};
use vibe_render::text::{display_width, preview, truncate_with_ellipsis, wrap};
use vibe_render::{Buffer, StyleFlags};

use super::{layout, put_spans, rule};
use crate::app::{AppModel, Pane, sidebar_entry, sidebar_index};
use crate::theme;

pub const LOGO: [&str; 6] = [
    "██╗   ██╗██╗██████╗ ███████╗██████╗ ███████╗██╗   ██╗███████╗",
    "██║   ██║██║██╔══██╗██╔════╝██╔══██╗██╔════╝██║   ██║██╔════╝",
    "██║   ██║██║██████╔╝█████╗  ██║  ██║█████╗  ██║   ██║███████╗",
    "╚██╗ ██╔╝██║██╔══██╗██╔══╝  ██║  ██║██╔══╝  ╚██╗ ██╔╝╚════██║",
    " ╚████╔╝ ██║██████╔╝███████╗██████╔╝███████╗ ╚████╔╝ ███████║",
    "  ╚═══╝  ╚═╝╚═════╝ ╚══════╝╚═════╝ ╚══════╝  ╚═══╝  ╚══════╝",
];

/// The logo only shows when the main area has at least this many rows.
pub const LOGO_MIN_HEIGHT: u16 = 30;

pub const SEARCH_PLACEHOLDER: &str = "grep prompt...";
pub const CARD_HEIGHT: u16 = 12;
const CARD_GAP: u16 = 2;
const ROW_GAP: u16 = 1;
const PREVIEW_CHARS: usize = 300;
const ALL_FILES_GLYPH: char = '⌘';

const NONE: StyleFlags = StyleFlags::empty();

/// Number of card columns for a screen size.
#[must_use]
pub fn columns(size: Size) -> usize {
    let width = content_rect(layout(size).main).width;
    match width {
        w if w >= 110 => 3,
        w if w >= 70 => 2,
        _ => 1,
    }
}

fn content_rect(main: Rect) -> Rect {
    main.inset(2, 1)
}

pub fn render<C: Clock>(app: &AppModel<C>, buf: &mut Buffer) {
    let regions = layout(app.size());
    top_bar(app, regions.top, buf);
    if let Some(sidebar) = regions.sidebar {
        sidebar_panel(app, sidebar, buf);
    }
    main_panel(app, regions.main, buf);
}

fn top_bar<C: Clock>(app: &AppModel<C>, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }
    buf.fill(area, theme::PANEL);
    let y = area.y;
    let bold = StyleFlags::BOLD;
    let mut x = put_spans(
        buf,
        area.x + 1,
        y,
        area.width.saturating_sub(1),
        &[
            ("❯ ", theme::PEACH, NONE),
            ("VIBE", theme::WHITE, bold),
            ("CODERS", theme::GRAPE, bold),
            ("_HUB", theme::WHITE, bold),
        ],
    );

    let search_width = (area.width / 2).min(36);
    let search_x = area.right().saturating_sub(search_width + 1);

    if area.width >= 64 {
        let pulse = if app.blink_on() {
            theme::PEACH
        } else {
            theme::PEACH_DIM
        };
        x += 2;
        if x + 15 < search_x {
            buf.put_str(x, y, "[SYSTEM ONLINE]", pulse, NONE, 15);
        }
    }

    if search_width >= 8 {
        search_field(app, Rect::new(search_x, y, search_width, 1), buf);
    }
    if area.height > 1 {
        rule(buf, area.x, y + 1, area.width, theme::GRAPE_DIM);
    }
}

fn search_field<C: Clock>(app: &AppModel<C>, field: Rect, buf: &mut Buffer) {
    buf.fill(field, theme::INSET);
    let searching = app.is_searching();
    let prompt_color = if searching { theme::PEACH } else { theme::GRAPE };
    let x = field.x + 1;
    let used = buf.put_str(x, field.y, ">", prompt_color, NONE, 1);
    let text_x = x + used + 1;
    let room = field.right().saturating_sub(text_x + 1);

    let query = app.search_query();
    if query.is_empty() && !searching {
        buf.put_str(text_x, field.y, SEARCH_PLACEHOLDER, theme::CREAM_FAINT, NONE, room);
        return;
    }
    // Keep the end of a long query visible while typing.
    let width = display_width(query);
    let shown = if width >= usize::from(room) {
        let skip = width + 1 - usize::from(room);
        tail_from_width(query, skip)
    } else {
        query
    };
    let used = buf.put_str(text_x, field.y, shown, theme::CREAM, NONE, room);
    if searching && app.blink_on() {
        buf.put_str(text_x + used, field.y, "▏", theme::PEACH, NONE, 1);
    }
}

/// Suffix of `s` left after dropping at least `skip` columns from the front.
fn tail_from_width(s: &str, skip: usize) -> &str {
    let mut dropped = 0;
    for (idx, c) in s.char_indices() {
        if dropped >= skip {
            return &s[idx..];
        }
        dropped += display_width(c.encode_utf8(&mut [0; 4]));
    }
    ""
}

fn sidebar_panel<C: Clock>(app: &AppModel<C>, area: Rect, buf: &mut Buffer) {
    if area.width < 3 || area.height == 0 {
        return;
    }
    buf.fill(area, theme::PANEL);
    let border_x = area.right() - 1;
    for y in area.y..area.bottom() {
        buf.put_str(border_x, y, "│", theme::GRAPE_DIM, NONE, 1);
    }
    let inner = Rect::new(area.x + 1, area.y, area.width - 2, area.height);
    if inner.height < 2 {
        return;
    }
    buf.put_str(inner.x + 1, inner.y + 1, "// DIRECTORY", theme::GRAPE, NONE, inner.width);

    let list_top = inner.y + 3;
    let rows = inner.bottom().saturating_sub(list_top);
    if rows == 0 {
        return;
    }
    let entries = Category::ALL.len() + 1;
    let active = sidebar_index(app.selected_category());
    let first = (active + 1).saturating_sub(usize::from(rows));
    let focused = app.pane() == Pane::Sidebar && !app.is_searching();

    for (row, index) in (first..entries).take(usize::from(rows)).enumerate() {
        let y = list_top + row as u16;
        let filter = sidebar_entry(index);
        sidebar_entry_row(
            filter,
            app.icons(),
            index == active,
            focused,
            Rect::new(inner.x, y, inner.width, 1),
            buf,
        );
    }
}

fn sidebar_entry_row(
    filter: CategoryFilter,
    icons: &IconMap,
    active: bool,
    focused: bool,
    row: Rect,
    buf: &mut Buffer,
) {
    let glyph = match filter {
        CategoryFilter::All => ALL_FILES_GLYPH,
        CategoryFilter::Only(c) => icons.get(c).glyph(),
    };
    let (wash, text, icon) = match (active, filter) {
        (true, CategoryFilter::All) => (Some(theme::HIGHLIGHT), theme::PEACH, theme::PEACH),
        (true, CategoryFilter::Only(_)) => (Some(theme::HIGHLIGHT_GRAPE), theme::CREAM, theme::CREAM),
        (false, _) => (None, theme::CREAM_MUTED, theme::GRAPE),
    };
    if let Some(wash) = wash {
        buf.fill(row, wash);
        let marker = if filter == CategoryFilter::All {
            theme::PEACH
        } else {
            theme::GRAPE
        };
        buf.put_str(row.right() - 1, row.y, "▐", marker, NONE, 1);
    }
    let flags = if active && focused { StyleFlags::BOLD } else { NONE };
    let mut glyph_buf = [0; 4];
    let name = filter.directory_name();
    let name = truncate_with_ellipsis(&name, usize::from(row.width.saturating_sub(6)));
    put_spans(
        buf,
        row.x + 1,
        row.y,
        row.width.saturating_sub(2),
        &[
            (&*glyph.encode_utf8(&mut glyph_buf), icon, NONE),
            ("  ", text, NONE),
            (name.as_str(), text, flags),
        ],
    );
}

fn main_panel<C: Clock>(app: &AppModel<C>, area: Rect, buf: &mut Buffer) {
    let content = content_rect(area);
    if content.is_empty() {
        return;
    }
    let mut y = content.y;
    let category = app.selected_category();

    let logo_width = display_width(LOGO[0]) as u16;
    if category == CategoryFilter::All
        && area.height >= LOGO_MIN_HEIGHT
        && content.width >= logo_width
    {
        for line in LOGO {
            buf.put_str(content.x, y, line, theme::GRAPE, NONE, content.width);
            y += 1;
        }
        y += 1;
    }

    // Header: typed label followed by the pulsing suffix.
    let suffix_color = if app.blink_on() {
        theme::PEACH
    } else {
        theme::PEACH_DIM
    };
    put_spans(
        buf,
        content.x,
        y,
        content.width,
        &[
            (app.header().visible(), theme::WHITE, StyleFlags::BOLD),
            (category.header_suffix(), suffix_color, NONE),
        ],
    );
    y += 1;
    if y >= content.bottom() {
        return;
    }
    rule(buf, content.x, y, content.width, theme::GRAPE_DIM);
    y += 1;
    if y >= content.bottom() {
        return;
    }
    let found = format!("Files found: {} objects", app.result_count());
    buf.put_str(content.x, y, &found, theme::CREAM_FAINT, NONE, content.width);
    y += 2;
    if y >= content.bottom() {
        return;
    }

    let grid = Rect::new(content.x, y, content.width, content.bottom() - y);
    if app.result_count() == 0 {
        empty_state(grid, buf);
    } else {
        card_grid(app, grid, buf);
    }
}

fn empty_state(area: Rect, buf: &mut Buffer) {
    let frame = area.centered(area.width.min(60), area.height.min(9));
    if frame.height < 3 {
        buf.put_str(area.x, area.y, "ERROR 404: NULL_POINTER", theme::CREAM, NONE, area.width);
        return;
    }
    buf.fill(frame, theme::PANEL);
    buf.draw_border(frame, theme::GRAPE_DIM);
    let mid = frame.y + frame.height / 2;
    let inner = frame.inset(1, 0);
    if frame.height >= 7 {
        buf.put_centered(inner, mid - 2, "⚠", theme::GRAPE, NONE);
    }
    buf.put_centered(inner, mid, "ERROR 404: NULL_POINTER", theme::CREAM, StyleFlags::BOLD);
    if mid + 1 < frame.bottom() - 1 {
        buf.put_centered(
            inner,
            mid + 1,
            "Query returned no results. Check syntax.",
            theme::CREAM_FAINT,
            NONE,
        );
    }
}

fn card_grid<C: Clock>(app: &AppModel<C>, area: Rect, buf: &mut Buffer) {
    let cols = columns(app.size());
    let cols_u16 = cols as u16;
    let card_width = (area.width.saturating_sub(CARD_GAP * (cols_u16 - 1))) / cols_u16;
    if card_width < 4 {
        return;
    }
    let pitch = CARD_HEIGHT + ROW_GAP;
    let visible_rows = usize::from(((area.height + ROW_GAP) / pitch).max(1));
    let selected = app.selected_card();
    let first_row = (selected / cols + 1).saturating_sub(visible_rows);
    let focused = app.pane() == Pane::Grid && !app.is_searching();

    let total_rows = app.result_count().div_ceil(cols);
    for (i, record) in app.results().enumerate().skip(first_row * cols) {
        let row = (i / cols - first_row) as u16;
        let col = (i % cols) as u16;
        let y = area.y + row * pitch;
        if y >= area.bottom() {
            break;
        }
        let x = area.x + col * (card_width + CARD_GAP);
        let rect = Rect::new(x, y, card_width, CARD_HEIGHT).intersection(&area);
        card(record, app.icons(), i == selected, focused, rect, buf);
    }

    let last_visible = first_row + visible_rows;
    if last_visible < total_rows && area.height > 0 {
        let more = format!("▼ {} more", app.result_count() - last_visible * cols);
        let w = display_width(&more) as u16;
        buf.put_str(
            area.right().saturating_sub(w),
            area.bottom() - 1,
            &more,
            theme::GRAPE,
            NONE,
            w,
        );
    }
}

fn card(
    record: &PromptRecord,
    icons: &IconMap,
    selected: bool,
    focused: bool,
    rect: Rect,
    buf: &mut Buffer,
) {
    if rect.height < 3 || rect.width < 4 {
        return;
    }
    buf.fill(rect, theme::PANEL);
    let border = match (selected, focused) {
        (true, true) => theme::PEACH,
        (true, false) => theme::CREAM_MUTED,
        (false, _) => theme::GRAPE_DIM,
    };
    buf.draw_border(rect, border);

    let inner = rect.inset(2, 1);
    if inner.is_empty() {
        return;
    }
    let mut y = inner.y;
    let dot = if selected { theme::PEACH } else { theme::PEACH_DIM };
    let mut glyph = [0; 4];
    let label = record.category.label();
    put_spans(
        buf,
        inner.x,
        y,
        inner.width.saturating_sub(2),
        &[("● ", dot, NONE), (label.as_str(), theme::CREAM_MUTED, NONE)],
    );
    let icon = icons.get(record.category).glyph().encode_utf8(&mut glyph);
    buf.put_str(inner.right() - 1, y, icon, theme::GRAPE, NONE, 1);
    y += 2;

    let width = usize::from(inner.width);
    let title_color = if selected { theme::CREAM } else { theme::WHITE };
    for line in clamp_lines(&record.title, width, 2) {
        if y >= inner.bottom() {
            return;
        }
        buf.put_str(inner.x, y, &line, title_color, StyleFlags::BOLD, inner.width);
        y += 1;
    }
    for line in clamp_lines(&record.description, width, 2) {
        if y >= inner.bottom() {
            return;
        }
        buf.put_str(inner.x, y, &line, theme::CREAM_MUTED, NONE, inner.width);
        y += 1;
    }
    y += 1;
    if y >= inner.bottom() {
        return;
    }

    // Code preview with a left accent bar.
    let preview_rect = Rect::new(inner.x, y, inner.width, inner.bottom() - y);
    buf.fill(preview_rect, theme::INSET);
    let bar = if selected && focused {
        theme::PEACH
    } else {
        theme::GRAPE
    };
    let text_x = preview_rect.x + 2;
    let text_width = preview_rect.width.saturating_sub(3);
    let lines = wrap(&preview(&record.code, PREVIEW_CHARS), usize::from(text_width));
    for (i, row) in (preview_rect.y..preview_rect.bottom()).enumerate() {
        buf.put_str(preview_rect.x, row, "▎", bar, NONE, 1);
        if let Some(line) = lines.get(i) {
            buf.put_str(text_x, row, line, theme::CREAM_FAINT, NONE, text_width);
        }
    }

    if selected && focused {
        let hint = "[ENTER TO EXPAND]";
        if usize::from(rect.width) > display_width(hint) + 2 {
            buf.put_centered(rect, rect.bottom() - 1, hint, theme::GRAPE, NONE);
        }
    }
}

/// At most `max` wrapped lines, the last one marked with `…` if text was cut.
fn clamp_lines(text: &str, width: usize, max: usize) -> Vec<String> {
    let mut lines = wrap(text, width);
    if lines.len() > max {
        lines.truncate(max);
        if let Some(last) = lines.last_mut() {
            let mut marked = truncate_with_ellipsis(last, width.saturating_sub(1));
            marked.push('…');
            *last = marked;
        }
    }
    lines
}
