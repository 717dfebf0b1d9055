#![forbid(unsafe_code)]

//! Host-driven timer and frame scheduling.
//!
//! The [`Scheduler`] replaces ambient timers and animation-frame callbacks
//! with explicit, cancellable entries that carry a payload instead of a
//! closure. The host advances it to the current time and drains whatever is
//! due, routing each payload back to the component that owns it.
//!
//! # Guarantees
//!
//! - Cancelling a handle removes the entry synchronously. A cancelled entry
//!   is never returned by [`Scheduler::pop_due`].
//! - Due entries are handed out one at a time, so a handler that cancels
//!   another entry due at the same instant still prevents its delivery.
//! - Timers due at the same instant fire in scheduling order.
//! - Frame requests fire together at the next frame boundary. A frame
//!   requested while a batch is firing waits for the following boundary.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use vibe_core::Scheduler;
//!
//! let mut sched: Scheduler<&str> = Scheduler::new(Duration::from_millis(16));
//! let keep = sched.after(Duration::from_millis(10), "keep");
//! let drop = sched.after(Duration::from_millis(10), "drop");
//! assert!(sched.cancel(drop));
//!
//! sched.advance_to(Duration::from_millis(10));
//! assert_eq!(sched.pop_due(), Some("keep"));
//! assert_eq!(sched.pop_due(), None);
//! # let _ = keep;
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

/// Cancellation handle for a delayed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Raw identifier, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Cancellation handle for a frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw identifier, for logging.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Cooperative, single-threaded scheduler of timer and frame payloads.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    frame_interval: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
    /// Frame requests waiting for the next boundary.
    frames: Vec<(u64, T)>,
    /// Frame requests whose boundary has been reached.
    firing: VecDeque<(u64, T)>,
    last_frame: Option<Duration>,
}

impl<T> Scheduler<T> {
    /// Create a scheduler at time zero with the given frame interval.
    #[must_use]
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval,
            next_id: 1,
            timers: BTreeMap::new(),
            deadlines: HashMap::new(),
            frames: Vec::new(),
            firing: VecDeque::new(),
            last_frame: None,
        }
    }

    /// Create a scheduler whose frame interval is `1 / fps`.
    #[must_use]
    pub fn with_fps(fps: u32) -> Self {
        let fps = fps.max(1);
        Self::new(Duration::from_secs(1) / fps)
    }

    /// The time the scheduler was last advanced to.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Interval between frame boundaries.
    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Schedule `payload` to become due `delay` after the current time.
    pub fn after(&mut self, delay: Duration, payload: T) -> TimerHandle {
        self.at(self.now.saturating_add(delay), payload)
    }

    /// Schedule `payload` at an absolute deadline. A deadline that has
    /// already passed is due on the next [`Scheduler::pop_due`], so chained
    /// timers keep their cadence when the host drains late.
    pub fn at(&mut self, deadline: Duration, payload: T) -> TimerHandle {
        let id = self.allocate_id();
        self.timers.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        tracing::trace!(timer_id = id, ?deadline, "timer scheduled");
        TimerHandle(id)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let Some(deadline) = self.deadlines.remove(&handle.0) else {
            return false;
        };
        self.timers.remove(&(deadline, handle.0));
        tracing::trace!(timer_id = handle.0, "timer cancelled");
        true
    }

    /// Request `payload` at the next frame boundary.
    pub fn request_frame(&mut self, payload: T) -> FrameHandle {
        let id = self.allocate_id();
        self.frames.push((id, payload));
        FrameHandle(id)
    }

    /// Cancel a frame request, whether still waiting or already in the
    /// firing batch. Returns `false` if it was already delivered.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        if let Some(pos) = self.frames.iter().position(|(id, _)| *id == handle.0) {
            self.frames.remove(pos);
        } else if let Some(pos) = self.firing.iter().position(|(id, _)| *id == handle.0) {
            self.firing.remove(pos);
        } else {
            return false;
        }
        tracing::trace!(frame_id = handle.0, "frame request cancelled");
        true
    }

    /// Earliest instant at which the pending frame requests may fire.
    fn next_frame_at(&self) -> Duration {
        match self.last_frame {
            Some(last) => last.saturating_add(self.frame_interval),
            None => Duration::ZERO,
        }
    }

    /// Advance to `now`. Time never moves backwards; an earlier value is
    /// ignored.
    pub fn advance_to(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
        if !self.frames.is_empty() && self.now >= self.next_frame_at() {
            self.firing.extend(self.frames.drain(..));
            self.last_frame = Some(self.now);
        }
    }

    /// Take the next due payload, if any. Timers are delivered before
    /// frame requests.
    pub fn pop_due(&mut self) -> Option<T> {
        if let Some(entry) = self.timers.first_entry()
            && entry.key().0 <= self.now
        {
            let (_, id) = *entry.key();
            let payload = entry.remove();
            self.deadlines.remove(&id);
            return Some(payload);
        }
        self.firing.pop_front().map(|(_, payload)| payload)
    }

    /// Time of the next thing that will become due, if anything is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.firing.is_empty() {
            return Some(self.now);
        }
        let timer = self.timers.keys().next().map(|(deadline, _)| *deadline);
        let frame = (!self.frames.is_empty()).then(|| self.next_frame_at().max(self.now));
        match (timer, frame) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Time remaining until [`Self::next_deadline`], measured from `now`.
    #[must_use]
    pub fn time_until_next(&self, now: Duration) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    /// Number of timers not yet delivered.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of frame requests not yet delivered.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len() + self.firing.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && self.frames.is_empty() && self.firing.is_empty()
    }

    /// Drop every pending timer and frame request.
    pub fn cancel_all(&mut self) {
        let dropped = self.pending_timers() + self.pending_frames();
        self.timers.clear();
        self.deadlines.clear();
        self.frames.clear();
        self.firing.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "scheduler cleared");
        }
    }
}
