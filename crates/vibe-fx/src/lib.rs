#![forbid(unsafe_code)]

//! Time-driven effects.
//!
//! Each effect owns its own schedule on a shared [`vibe_core::Scheduler`]
//! and hands back a small payload type (`BootEvent`, `BackgroundFrame`,
//! `TypewriterTick`) that the host routes back to it. Effects never hold
//! closures over their own state, and teardown cancels every outstanding
//! handle synchronously.
//!
//! | Effect | Module | Payload |
//! |--------|--------|---------|
//! | Boot sequence | [`boot`] | [`BootEvent`] |
//! | Animated background | [`background`] | [`BackgroundFrame`] |
//! | Typewriter label | [`typewriter`] | [`TypewriterTick`] |

pub mod background;
pub mod boot;
pub mod rng;
pub mod shader;
pub mod surface;
pub mod typewriter;

pub use background::{BackgroundFrame, BackgroundRenderer, DegradeReason, RendererStatus};
pub use boot::{BOOT_LINES, BOOT_PROMPT, BootEvent, BootPhase, BootProgress, BootSequencer, BootTiming};
pub use rng::XorShift64;
pub use shader::{FluidGradientProgram, ProgramError, ShaderSource};
pub use surface::{
    CpuSurfaceProvider, Surface, SurfaceId, SurfaceProvider, UnavailableSurfaceProvider,
};
pub use typewriter::{Typewriter, TypewriterTick, prefixes, reveal};
