#![forbid(unsafe_code)]

//! Animated full-viewport background.
//!
//! # Lifecycle
//!
//! ```text
//!  Inactive ──activate──▶ Running ──deactivate──▶ Inactive
//!      │                     │
//!      │ (no surface /       │ on_frame: resize? → render → reschedule
//!      │  compile error)     ▼
//!      └──────────────▶ Degraded(reason)
//! ```
//!
//! While running there is always exactly one pending frame request on the
//! scheduler, and exactly one surface checked out of the provider. Resizes
//! reuse that surface. `deactivate` cancels the pending frame and returns
//! the surface before it returns, so no frame is ever delivered afterwards.
//!
//! A degraded renderer does nothing and holds nothing; [`BackgroundRenderer::compose`]
//! then paints the plain depth color.

use std::time::Duration;

use vibe_core::{Clock, FrameHandle, Scheduler, Size, Viewport};
use vibe_render::{Buffer, Cell, PackedRgba};

use crate::shader::{FluidGradientProgram, ProgramError, ShaderSource};
use crate::surface::{Surface, SurfaceProvider, pixel_size_for};

/// Odd pixel rows are multiplied by this to suggest scanlines.
pub const SCANLINE_DIM: f32 = 0.88;

/// Frame payload routed back to [`BackgroundRenderer::on_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundFrame;

/// Why the renderer gave up.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradeReason {
    SurfaceUnavailable,
    Program(ProgramError),
}

/// Externally visible renderer state.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererStatus {
    Inactive,
    Running,
    Degraded(DegradeReason),
}

/// Everything the renderer holds while running.
#[derive(Debug)]
pub struct RendererState {
    pub surface: Surface,
    pub program: FluidGradientProgram,
    pub start_time: Duration,
    pub last_size: Size,
    pub frame: Option<FrameHandle>,
}

/// Owner of the background animation.
#[derive(Debug)]
pub struct BackgroundRenderer<P: SurfaceProvider> {
    provider: P,
    source: ShaderSource,
    state: Option<RendererState>,
    status: RendererStatus,
    frames_rendered: u64,
    fallback: PackedRgba,
}

impl<P: SurfaceProvider> BackgroundRenderer<P> {
    /// Renderer for the shipped program.
    pub fn new(provider: P) -> Self {
        Self::with_source(provider, ShaderSource::FLUID_GRADIENT)
    }

    pub fn with_source(provider: P, source: ShaderSource) -> Self {
        let [r, g, b] = source.palette[0];
        Self {
            provider,
            source,
            state: None,
            status: RendererStatus::Inactive,
            frames_rendered: 0,
            fallback: PackedRgba::from_unit(r as f32, g as f32, b as f32),
        }
    }

    #[must_use]
    pub const fn status(&self) -> &RendererStatus {
        &self.status
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.status, RendererStatus::Running)
    }

    #[must_use]
    pub fn state(&self) -> Option<&RendererState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&Surface> {
        self.state.as_ref().map(|s| &s.surface)
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub const fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Color painted when no animation is available.
    #[must_use]
    pub const fn fallback_color(&self) -> PackedRgba {
        self.fallback
    }

    /// Acquire a surface, compile the program, and request the first frame.
    ///
    /// Calling this while already running or degraded does nothing.
    pub fn activate<T, C, V>(&mut self, clock: &C, viewport: &V, sched: &mut Scheduler<T>)
    where
        T: From<BackgroundFrame>,
        C: Clock + ?Sized,
        V: Viewport + ?Sized,
    {
        if !matches!(self.status, RendererStatus::Inactive) {
            return;
        }
        let size = viewport.size();
        let Some(surface) = self.provider.acquire(size) else {
            tracing::debug!(?size, "background degraded: no drawing surface");
            self.status = RendererStatus::Degraded(DegradeReason::SurfaceUnavailable);
            return;
        };
        let program = match self.source.compile() {
            Ok(program) => program,
            Err(err) => {
                tracing::debug!(error = %err, "background degraded: program rejected");
                self.provider.release(surface);
                self.status = RendererStatus::Degraded(DegradeReason::Program(err));
                return;
            }
        };
        let frame = sched.request_frame(T::from(BackgroundFrame));
        self.state = Some(RendererState {
            surface,
            program,
            start_time: clock.now(),
            last_size: size,
            frame: Some(frame),
        });
        self.status = RendererStatus::Running;
        tracing::info!(?size, "background renderer active");
    }

    /// Handle a delivered frame: follow resizes, render, and request the
    /// next frame. Returns `true` if a frame was rendered.
    pub fn on_frame<T, C, V>(&mut self, clock: &C, viewport: &V, sched: &mut Scheduler<T>) -> bool
    where
        T: From<BackgroundFrame>,
        C: Clock + ?Sized,
        V: Viewport + ?Sized,
    {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        state.frame = None;

        let size = viewport.size();
        if size != state.last_size {
            tracing::debug!(from = ?state.last_size, to = ?size, "background resized");
            state.surface.resize(pixel_size_for(size));
            state.last_size = size;
        }

        let elapsed = clock.now().saturating_sub(state.start_time);
        state.program.render(&mut state.surface, elapsed);
        self.frames_rendered += 1;

        state.frame = Some(sched.request_frame(T::from(BackgroundFrame)));
        true
    }

    /// Cancel the pending frame and hand back the surface. Idempotent.
    pub fn deactivate<T>(&mut self, sched: &mut Scheduler<T>) {
        if let Some(state) = self.state.take() {
            if let Some(frame) = state.frame {
                sched.cancel_frame(frame);
            }
            self.provider.release(state.surface);
            tracing::debug!(frames = self.frames_rendered, "background renderer stopped");
        }
        self.status = RendererStatus::Inactive;
    }

    /// Draw the current surface into `buf` as half-block cells, or the
    /// fallback color when there is nothing to show.
    pub fn compose(&self, buf: &mut Buffer) {
        let Some(state) = self.state.as_ref().filter(|_| self.frames_rendered > 0) else {
            buf.clear(Cell::blank(self.fallback));
            return;
        };
        let surface = &state.surface;
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                let top = surface.get(x, y * 2).unwrap_or(self.fallback);
                let bottom = surface
                    .get(x, y * 2 + 1)
                    .unwrap_or(self.fallback)
                    .scale(SCANLINE_DIM);
                buf.set(x, y, Cell::pixels(top, bottom));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CpuSurfaceProvider, UnavailableSurfaceProvider};
    use vibe_core::{ManualClock, ManualViewport};

    #[derive(Debug, PartialEq)]
    struct Frame;

    impl From<BackgroundFrame> for Frame {
        fn from(_: BackgroundFrame) -> Self {
            Frame
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn runs_one_frame_per_boundary() {
        let clock = ManualClock::new();
        let vp = ManualViewport::new(Size::new(8, 4));
        let mut sched: Scheduler<Frame> = Scheduler::new(ms(33));
        let mut bg = BackgroundRenderer::new(CpuSurfaceProvider::new());
        bg.activate(&clock, &vp, &mut sched);
        assert!(bg.is_running());
        assert_eq!(sched.pending_frames(), 1);

        for step in 0..5 {
            clock.set(ms(step * 33));
            sched.advance_to(clock.now());
            while let Some(Frame) = sched.pop_due() {
                assert!(bg.on_frame(&clock, &vp, &mut sched));
            }
        }
        assert_eq!(bg.frames_rendered(), 5);
        assert_eq!(sched.pending_frames(), 1);
    }

    #[test]
    fn unavailable_surface_degrades_silently() {
        let clock = ManualClock::new();
        let mut sched: Scheduler<Frame> = Scheduler::new(ms(33));
        let mut bg = BackgroundRenderer::new(UnavailableSurfaceProvider);
        bg.activate(&clock, &Size::new(10, 10), &mut sched);
        assert_eq!(
            bg.status(),
            &RendererStatus::Degraded(DegradeReason::SurfaceUnavailable)
        );
        assert!(sched.is_idle());

        let mut buf = Buffer::new(Size::new(3, 2), Cell::default());
        bg.compose(&mut buf);
        assert!(buf.cells().iter().all(|c| c.bg == bg.fallback_color()));
    }

    #[test]
    fn bad_program_releases_surface() {
        let clock = ManualClock::new();
        let mut sched: Scheduler<Frame> = Scheduler::new(ms(33));
        let mut src = ShaderSource::FLUID_GRADIENT;
        src.grain = 2.0;
        let mut bg = BackgroundRenderer::with_source(CpuSurfaceProvider::new(), src);
        bg.activate(&clock, &Size::new(4, 4), &mut sched);
        assert!(matches!(
            bg.status(),
            RendererStatus::Degraded(DegradeReason::Program(_))
        ));
        assert_eq!(bg.provider().live(), 0);
        assert!(sched.is_idle());
    }

    #[test]
    fn deactivate_cancels_pending_frame_and_releases() {
        let clock = ManualClock::new();
        let mut sched: Scheduler<Frame> = Scheduler::new(ms(33));
        let mut bg = BackgroundRenderer::new(CpuSurfaceProvider::new());
        bg.activate(&clock, &Size::new(4, 4), &mut sched);
        bg.deactivate(&mut sched);
        bg.deactivate(&mut sched);
        assert!(sched.is_idle());
        assert_eq!(bg.provider().live(), 0);
        sched.advance_to(ms(1_000));
        assert_eq!(sched.pop_due(), None);
        assert!(!bg.on_frame(&clock, &Size::new(4, 4), &mut sched));
        assert_eq!(bg.frames_rendered(), 0);
    }

    #[test]
    fn compose_dims_lower_pixel_rows() {
        let clock = ManualClock::new();
        let vp = Size::new(2, 1);
        let mut sched: Scheduler<Frame> = Scheduler::new(ms(33));
        let mut bg = BackgroundRenderer::new(CpuSurfaceProvider::new());
        bg.activate(&clock, &vp, &mut sched);
        sched.advance_to(ms(0));
        while sched.pop_due().is_some() {
            bg.on_frame(&clock, &vp, &mut sched);
        }
        let mut buf = Buffer::new(vp, Cell::default());
        bg.compose(&mut buf);
        let surface = bg.surface().expect("surface");
        let cell = buf.get(0, 0).copied().unwrap_or_default();
        assert_eq!(cell.ch, vibe_render::UPPER_HALF);
        assert_eq!(Some(cell.fg), surface.get(0, 0));
        assert_eq!(Some(cell.bg), surface.get(0, 1).map(|p| p.scale(SCANLINE_DIM)));
    }
}
