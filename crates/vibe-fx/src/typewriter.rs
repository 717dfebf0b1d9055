#![forbid(unsafe_code)]

//! Typewriter reveal of a label.
//!
//! The visible text grows by one grapheme per tick: the first tick fires
//! `initial_delay` after (re)start, each later one `per_char` after the
//! previous tick's deadline. A host that drains late therefore catches up on
//! every grapheme that is due. Once the whole string is visible no further
//! tick is scheduled.
//!
//! Changing the text (or the timing) cancels the pending tick, bumps the
//! generation, and starts again from the empty string. Ticks carry the
//! generation they were scheduled under, so even a tick that somehow
//! survived cancellation cannot advance a newer text.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;
use vibe_core::{Scheduler, TimerHandle};

/// Timer payload routed back to [`Typewriter::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTick {
    generation: u64,
}

/// Every prefix of `text` on grapheme boundaries, from `""` to `text`.
pub fn prefixes(text: &str) -> impl Iterator<Item = &str> + '_ {
    std::iter::once(0)
        .chain(text.grapheme_indices(true).map(|(i, g)| i + g.len()))
        .map(move |end| &text[..end])
}

/// Each prefix of `text` paired with the offset at which it becomes
/// visible.
pub fn reveal(
    text: &str,
    initial_delay: Duration,
    per_char: Duration,
) -> impl Iterator<Item = (Duration, &str)> + '_ {
    prefixes(text).enumerate().map(move |(n, prefix)| {
        let at = match n {
            0 => Duration::ZERO,
            n => initial_delay + per_char * (n as u32 - 1),
        };
        (at, prefix)
    })
}

/// Stateful, scheduler-driven typewriter.
#[derive(Debug)]
pub struct Typewriter {
    text: String,
    /// Byte offset of the end of each grapheme.
    ends: Vec<usize>,
    shown: usize,
    initial_delay: Duration,
    per_char: Duration,
    generation: u64,
    pending: Option<TimerHandle>,
    /// Deadline of the latest scheduled tick.
    due: Duration,
}

impl Typewriter {
    #[must_use]
    pub fn new(initial_delay: Duration, per_char: Duration) -> Self {
        Self {
            text: String::new(),
            ends: Vec::new(),
            shown: 0,
            initial_delay,
            per_char,
            generation: 0,
            pending: None,
            due: Duration::ZERO,
        }
    }

    /// The target text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The currently visible prefix.
    #[must_use]
    pub fn visible(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.text[..self.ends[n - 1]],
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shown == self.ends.len()
    }

    /// Whether a tick is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Start revealing `text`. Returns `false` (and does nothing) if it is
    /// already the target.
    pub fn set_text<T: From<TypewriterTick>>(
        &mut self,
        text: &str,
        sched: &mut Scheduler<T>,
    ) -> bool {
        if self.generation > 0 && self.text == text {
            return false;
        }
        self.text.clear();
        self.text.push_str(text);
        self.ends.clear();
        self.ends
            .extend(text.grapheme_indices(true).map(|(i, g)| i + g.len()));
        self.restart(sched);
        true
    }

    /// Change the delays and restart the current text.
    pub fn set_timing<T: From<TypewriterTick>>(
        &mut self,
        initial_delay: Duration,
        per_char: Duration,
        sched: &mut Scheduler<T>,
    ) {
        if self.initial_delay == initial_delay && self.per_char == per_char {
            return;
        }
        self.initial_delay = initial_delay;
        self.per_char = per_char;
        self.restart(sched);
    }

    fn restart<T: From<TypewriterTick>>(&mut self, sched: &mut Scheduler<T>) {
        self.cancel(sched);
        self.generation += 1;
        self.shown = 0;
        if !self.ends.is_empty() {
            self.due = sched.now();
            self.schedule(self.initial_delay, sched);
        }
    }

    fn schedule<T: From<TypewriterTick>>(&mut self, delay: Duration, sched: &mut Scheduler<T>) {
        let tick = TypewriterTick {
            generation: self.generation,
        };
        self.due = self.due.saturating_add(delay);
        self.pending = Some(sched.at(self.due, T::from(tick)));
    }

    fn cancel<T>(&mut self, sched: &mut Scheduler<T>) {
        if let Some(handle) = self.pending.take() {
            sched.cancel(handle);
        }
    }

    /// Apply a delivered tick. Returns `true` if the visible text changed.
    pub fn handle<T: From<TypewriterTick>>(
        &mut self,
        tick: TypewriterTick,
        sched: &mut Scheduler<T>,
    ) -> bool {
        if tick.generation != self.generation || self.is_complete() {
            tracing::trace!(
                tick = tick.generation,
                current = self.generation,
                "stale typewriter tick ignored"
            );
            return false;
        }
        self.pending = None;
        self.shown += 1;
        if !self.is_complete() {
            self.schedule(self.per_char, sched);
        }
        true
    }

    /// Cancel the outstanding tick. The visible text stays as it is.
    pub fn teardown<T>(&mut self, sched: &mut Scheduler<T>) {
        self.cancel(sched);
        self.generation += 1;
    }
}
