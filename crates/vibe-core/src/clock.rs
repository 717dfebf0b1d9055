#![forbid(unsafe_code)]

//! Injected time and viewport capabilities.
//!
//! Components never read wall-clock time or the terminal size directly. The
//! host hands them a [`Clock`] and a [`Viewport`]; tests hand them a
//! [`ManualClock`] and a [`ManualViewport`] and drive both explicitly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::geometry::Size;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    /// Current monotonic time.
    fn now(&self) -> Duration;
}

/// Real clock anchored at construction time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is "now".
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock for tests and replay.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the component under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set current monotonic time.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Source of the current viewport size.
pub trait Viewport {
    /// Current viewport size in cells.
    fn size(&self) -> Size;
}

impl Viewport for Size {
    fn size(&self) -> Size {
        *self
    }
}

impl<V: Viewport + ?Sized> Viewport for &V {
    fn size(&self) -> Size {
        (**self).size()
    }
}

/// Viewport whose size a test (or host) sets explicitly. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualViewport {
    size: Rc<Cell<Size>>,
}

impl ManualViewport {
    /// Create a viewport with an initial size.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
        }
    }

    /// Update the current size.
    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }
}

impl Viewport for ManualViewport {
    fn size(&self) -> Size {
        self.size.get()
    }
}
