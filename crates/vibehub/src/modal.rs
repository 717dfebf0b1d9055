#![forbid(unsafe_code)]

//! Prompt detail view state.
//!
//! A [`DetailView`] exists exactly while the detail overlay is open. Opening
//! installs an Escape binding in the shell's keymap; closing removes it and
//! cancels a pending "copied" revert, so nothing the view scheduled or bound
//! survives it.

use std::time::Duration;

use vibe_core::{BindingId, KeyCode, Keymap, Modifiers, Scheduler, TimerHandle};
use vibe_catalog::PromptRecord;

use crate::clipboard::ClipboardSink;

/// How long the copy button reads `[COPIED]`.
pub const COPIED_HOLD: Duration = Duration::from_millis(2000);

pub const STATUS_MODE: &str = "NORMAL MODE";

/// Timer payload that ends the "copied" acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopiedRevert {
    generation: u64,
}

/// Open detail view over one prompt.
#[derive(Debug)]
pub struct DetailView {
    record: usize,
    escape: BindingId,
    copied: Option<TimerHandle>,
    copy_generation: u64,
    scroll: usize,
}

impl DetailView {
    /// Open over `records[record]`, binding Escape to `close_action`.
    pub fn open<A: Clone>(record: usize, keymap: &mut Keymap<A>, close_action: A) -> Self {
        let escape = keymap.bind(KeyCode::Escape, Modifiers::NONE, close_action);
        Self {
            record,
            escape,
            copied: None,
            copy_generation: 0,
            scroll: 0,
        }
    }

    /// Index of the shown record in the repository.
    #[must_use]
    pub const fn record(&self) -> usize {
        self.record
    }

    #[must_use]
    pub const fn escape_binding(&self) -> BindingId {
        self.escape
    }

    #[must_use]
    pub const fn is_copied(&self) -> bool {
        self.copied.is_some()
    }

    /// First visible line of the code body, zero-based.
    #[must_use]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    /// Put `record.code` on the clipboard and show the acknowledgment.
    ///
    /// The clipboard result is only logged; the acknowledgment appears
    /// either way. Copying again restarts the hold.
    pub fn copy<T: From<CopiedRevert>>(
        &mut self,
        record: &PromptRecord,
        clipboard: &mut dyn ClipboardSink,
        sched: &mut Scheduler<T>,
    ) {
        if let Err(err) = clipboard.write_text(&record.code) {
            tracing::warn!(id = %record.id, error = %err, "copy to clipboard failed");
        } else {
            tracing::info!(id = %record.id, bytes = record.code.len(), "prompt copied");
        }
        if let Some(handle) = self.copied.take() {
            sched.cancel(handle);
        }
        self.copy_generation += 1;
        let revert = CopiedRevert {
            generation: self.copy_generation,
        };
        self.copied = Some(sched.after(COPIED_HOLD, T::from(revert)));
    }

    /// Apply a delivered revert. Returns `true` if the button changed.
    pub fn on_revert(&mut self, revert: CopiedRevert) -> bool {
        if revert.generation != self.copy_generation || self.copied.is_none() {
            return false;
        }
        self.copied = None;
        true
    }

    /// Scroll the code body by `delta` lines, clamped to `0..=max`.
    /// Returns `true` if the position changed.
    pub fn scroll_by(&mut self, delta: isize, max: usize) -> bool {
        let next = self.scroll.saturating_add_signed(delta).min(max);
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }

    /// Keep the scroll position valid after the body shrank.
    pub fn clamp_scroll(&mut self, max: usize) {
        self.scroll = self.scroll.min(max);
    }

    /// Remove the Escape binding and cancel the pending revert.
    pub fn close<A: Clone, T>(self, keymap: &mut Keymap<A>, sched: &mut Scheduler<T>) {
        keymap.unbind(self.escape);
        if let Some(handle) = self.copied {
            sched.cancel(handle);
        }
        tracing::debug!(record = self.record, "detail view closed");
    }

    /// Window title: `vim <id>.sh`.
    #[must_use]
    pub fn title(record: &PromptRecord) -> String {
        format!("vim {}.sh", record.id)
    }

    #[must_use]
    pub const fn copy_label(&self) -> &'static str {
        if self.is_copied() { "[COPIED]" } else { "[COPY]" }
    }

    /// Right side of the status bar.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("Ln {}, Col 1", self.scroll + 1)
    }
}
