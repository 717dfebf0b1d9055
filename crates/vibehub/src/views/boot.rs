#![forbid(unsafe_code)]

//! Boot screen: revealed lines anchored to the bottom, each behind the shell
//! prompt, with a blinking block cursor underneath.

use vibe_fx::{BOOT_PROMPT, BootSequencer};
use vibe_render::{Buffer, Cell, StyleFlags};

use crate::theme;

const CURSOR: &str = "█";

pub fn render(boot: &BootSequencer, cursor_on: bool, buf: &mut Buffer) {
    buf.clear(Cell::blank(theme::DEPTH));
    let area = buf.area().inset(4, 2);
    if area.is_empty() {
        return;
    }

    let lines = boot.revealed_lines();
    // The cursor row always stays on screen; older lines scroll off the top.
    let rows = lines.len() + 1;
    let visible = rows.min(usize::from(area.height));
    let skip = rows - visible;
    let mut y = area.bottom() - visible as u16;

    for line in lines.iter().skip(skip) {
        let used = buf.put_str(
            area.x,
            y,
            BOOT_PROMPT,
            theme::GRAPE,
            StyleFlags::empty(),
            area.width,
        );
        let x = area.x + used + 1;
        buf.put_str(
            x,
            y,
            line,
            theme::CREAM,
            StyleFlags::empty(),
            area.right().saturating_sub(x),
        );
        y += 1;
    }

    if cursor_on {
        buf.put_str(area.x, y, CURSOR, theme::PEACH, StyleFlags::empty(), 1);
    }
}
