#![forbid(unsafe_code)]

//! Core: geometry, input events, time sources, and cooperative scheduling.
//!
//! Everything in vibehub that reacts to time goes through two injected
//! capabilities defined here:
//!
//! - [`clock::Clock`] answers "what time is it" (real or simulated).
//! - [`schedule::Scheduler`] holds delayed work and frame requests, and hands
//!   them back to the owner when the host advances time.
//!
//! Neither spawns threads. The host loop owns the pace.

pub mod clock;
pub mod event;
pub mod geometry;
pub mod keymap;
pub mod schedule;

pub use clock::{Clock, ManualClock, ManualViewport, MonotonicClock, Viewport};
pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use geometry::{Rect, Size};
pub use keymap::{BindingId, Keymap};
pub use schedule::{FrameHandle, Scheduler, TimerHandle};
