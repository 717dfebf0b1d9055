#![forbid(unsafe_code)]

//! Scripted boot sequence.
//!
//! A fixed list of lines is revealed one at a time at jittered, cumulative
//! offsets. After the last line a fixed settle delay elapses and the
//! sequence completes, exactly once.
//!
//! ```text
//! line i fires at  sum(jitter_k for k in 0..=i),  jitter_k ∈ [base, base + spread)
//! complete fires   settle after the last line's deadline
//! ```
//!
//! The first line also waits one jitter step, so the screen never shows a
//! line in the same frame the sequence starts. Every deadline is absolute
//! from `start`, so a late drain delivers all lines that are due along with
//! a completion that is due.
//!
//! The phase only moves forward: `Booting { revealed: 0 } → … →
//! Booting { revealed: N } → Done`. [`BootSequencer::teardown`] cancels every
//! outstanding timer, after which neither lines nor completion can arrive.

use std::time::Duration;

use vibe_core::{Scheduler, TimerHandle};

use crate::rng::XorShift64;

/// Lines shown while booting.
pub const BOOT_LINES: [&str; 7] = [
    "INITIALIZING KERNEL...",
    "LOADING SHADER MODULES [OK]",
    "MOUNTING FILE SYSTEM...",
    "CONNECTING TO VIBE_NET...",
    "ESTABLISHING SECURE UPLINK...",
    "LOADING USER PROFILE...",
    "SYSTEM READY.",
];

/// Shell prompt printed before every boot line.
pub const BOOT_PROMPT: &str = "root@vibehub:~#";

/// Timing knobs for the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootTiming {
    /// Minimum gap before each line.
    pub base: Duration,
    /// Width of the uniform jitter added to `base`.
    pub spread: Duration,
    /// Delay between the last line and completion.
    pub settle: Duration,
}

impl Default for BootTiming {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            spread: Duration::from_millis(300),
            settle: Duration::from_millis(800),
        }
    }
}

/// Timer payload routed back to [`BootSequencer::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootEvent {
    Line(usize),
    Complete,
}

/// Where the sequence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// Not started yet.
    Idle,
    Booting { revealed: usize },
    Done,
    /// Torn down before completing.
    Cancelled { revealed: usize },
}

/// What a handled event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootProgress {
    LineRevealed(usize),
    Completed,
}

/// Boot sequence state machine.
#[derive(Debug)]
pub struct BootSequencer {
    lines: Vec<String>,
    timing: BootTiming,
    rng: XorShift64,
    phase: BootPhase,
    pending: Vec<(usize, TimerHandle)>,
    completion: Option<TimerHandle>,
    offsets: Vec<Duration>,
    started_at: Duration,
}

impl BootSequencer {
    /// The stock sequence with default timing.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_lines(BOOT_LINES, BootTiming::default(), seed)
    }

    pub fn with_lines<I, S>(lines: I, timing: BootTiming, seed: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            timing,
            rng: XorShift64::new(seed),
            phase: BootPhase::Idle,
            pending: Vec::new(),
            completion: None,
            offsets: Vec::new(),
            started_at: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> BootPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.phase, BootPhase::Done)
    }

    /// Number of lines in the script.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines revealed so far, in order.
    #[must_use]
    pub fn revealed_lines(&self) -> &[String] {
        let n = match self.phase {
            BootPhase::Idle => 0,
            BootPhase::Booting { revealed } | BootPhase::Cancelled { revealed } => revealed,
            BootPhase::Done => self.lines.len(),
        };
        &self.lines[..n.min(self.lines.len())]
    }

    /// Scheduled offset of each line, relative to `start`.
    #[must_use]
    pub fn offsets(&self) -> &[Duration] {
        &self.offsets
    }

    /// Draw the jitter and schedule every line. Only the first call has an
    /// effect.
    pub fn start<T: From<BootEvent>>(&mut self, sched: &mut Scheduler<T>) {
        if self.phase != BootPhase::Idle {
            return;
        }
        let mut at = Duration::ZERO;
        self.started_at = sched.now();
        self.offsets.clear();
        for i in 0..self.lines.len() {
            at += self.rng.jitter(self.timing.base, self.timing.spread);
            self.offsets.push(at);
            let handle = sched.after(at, T::from(BootEvent::Line(i)));
            self.pending.push((i, handle));
        }
        self.phase = BootPhase::Booting { revealed: 0 };
        if self.lines.is_empty() {
            self.schedule_completion(sched);
        }
        tracing::debug!(lines = self.lines.len(), total = ?at, "boot sequence started");
    }

    fn schedule_completion<T: From<BootEvent>>(&mut self, sched: &mut Scheduler<T>) {
        let last = self.offsets.last().copied().unwrap_or_default();
        let deadline = self.started_at + last + self.timing.settle;
        self.completion = Some(sched.at(deadline, T::from(BootEvent::Complete)));
    }

    /// Apply a delivered event. Out-of-order or duplicate events are ignored.
    pub fn handle<T: From<BootEvent>>(
        &mut self,
        event: BootEvent,
        sched: &mut Scheduler<T>,
    ) -> Option<BootProgress> {
        let BootPhase::Booting { revealed } = self.phase else {
            return None;
        };
        match event {
            BootEvent::Line(i) if i == revealed && i < self.lines.len() => {
                self.pending.retain(|(idx, _)| *idx != i);
                let revealed = revealed + 1;
                self.phase = BootPhase::Booting { revealed };
                tracing::debug!(line = i, text = %self.lines[i], "boot line revealed");
                if revealed == self.lines.len() {
                    self.schedule_completion(sched);
                }
                Some(BootProgress::LineRevealed(i))
            }
            BootEvent::Complete if revealed == self.lines.len() && self.completion.is_some() => {
                self.completion = None;
                self.phase = BootPhase::Done;
                tracing::debug!("boot sequence complete");
                Some(BootProgress::Completed)
            }
            _ => None,
        }
    }

    /// Cancel everything outstanding. No line or completion is delivered
    /// afterwards.
    pub fn teardown<T>(&mut self, sched: &mut Scheduler<T>) {
        let mut cancelled = 0;
        for (_, handle) in &self.pending {
            if sched.cancel(*handle) {
                cancelled += 1;
            }
        }
        if let Some(handle) = self.completion.take()
            && sched.cancel(handle)
        {
            cancelled += 1;
        }
        if let BootPhase::Booting { revealed } = self.phase {
            tracing::debug!(revealed, cancelled, "boot sequence torn down");
            self.phase = BootPhase::Cancelled { revealed };
        }
        self.pending.clear();
    }
}
