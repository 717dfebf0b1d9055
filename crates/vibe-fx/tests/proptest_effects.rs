//! Property tests for the time-driven effects.
//!
//! 1. Resizing the viewport any number of times leaves exactly one live
//!    surface, sized to the latest viewport.
//! 2. Tearing every effect down before anything fires yields no further
//!    observable change, for any number of scheduled frames and timers.
//! 3. Boot lines arrive in order and completion arrives once, after all of
//!    them, for any seed.
//! 4. Retargeting the typewriter any number of times converges to the last
//!    text, and every intermediate visible string is a prefix of the text
//!    that was current when it was shown.

use std::time::Duration;

use proptest::prelude::*;
use vibe_core::{Clock, ManualClock, ManualViewport, Scheduler, Size};
use vibe_fx::surface::pixel_size_for;
use vibe_fx::{
    BackgroundFrame, BackgroundRenderer, BootEvent, BootProgress, BootSequencer,
    CpuSurfaceProvider, Typewriter, TypewriterTick,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    Frame,
    Boot(BootEvent),
    Type(TypewriterTick),
}

impl From<BackgroundFrame> for Due {
    fn from(_: BackgroundFrame) -> Self {
        Self::Frame
    }
}

impl From<BootEvent> for Due {
    fn from(ev: BootEvent) -> Self {
        Self::Boot(ev)
    }
}

impl From<TypewriterTick> for Due {
    fn from(tick: TypewriterTick) -> Self {
        Self::Type(tick)
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn size_strategy() -> impl Strategy<Value = Size> {
    (0u16..60, 0u16..30).prop_map(|(w, h)| Size::new(w, h))
}

// ── 1. Resize safety ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn resizes_keep_a_single_surface(sizes in prop::collection::vec(size_strategy(), 1..20)) {
        let clock = ManualClock::new();
        let vp = ManualViewport::new(Size::new(10, 5));
        let mut sched: Scheduler<Due> = Scheduler::new(ms(20));
        let mut bg = BackgroundRenderer::new(CpuSurfaceProvider::new());
        bg.activate(&clock, &vp, &mut sched);
        let first_id = bg.surface().map(|s| s.id());

        for (i, size) in sizes.iter().enumerate() {
            vp.set_size(*size);
            clock.set(ms(20 * i as u64));
            sched.advance_to(clock.now());
            while let Some(due) = sched.pop_due() {
                prop_assert_eq!(due, Due::Frame);
                bg.on_frame(&clock, &vp, &mut sched);
            }
            prop_assert_eq!(bg.provider().live(), 1);
            prop_assert_eq!(bg.provider().acquired(), 1);
            prop_assert_eq!(bg.surface().map(|s| s.id()), first_id);
        }

        let latest = *sizes.last().expect("non-empty");
        prop_assert_eq!(bg.surface().map(|s| s.pixel_size()), Some(pixel_size_for(latest)));
        prop_assert_eq!(sched.pending_frames(), 1);

        bg.deactivate(&mut sched);
        prop_assert_eq!(bg.provider().live(), 0);
        prop_assert!(sched.is_idle());
    }
}

// ── 2. Cancellation safety ──────────────────────────────────────────────

proptest! {
    #[test]
    fn teardown_before_fire_is_silent(
        seed in any::<u64>(),
        extra_frames in 0usize..16,
        extra_timers in prop::collection::vec(0u64..2_000, 0..16),
        text in "[A-Z_ ]{0,24}",
    ) {
        let clock = ManualClock::new();
        let vp = Size::new(12, 6);
        let mut sched: Scheduler<Due> = Scheduler::new(ms(20));

        let mut boot = BootSequencer::new(seed);
        let mut bg = BackgroundRenderer::new(CpuSurfaceProvider::new());
        let mut tw = Typewriter::new(Duration::ZERO, ms(30));
        boot.start(&mut sched);
        bg.activate(&clock, &vp, &mut sched);
        tw.set_text(&text, &mut sched);
        let frames: Vec<_> = (0..extra_frames).map(|_| sched.request_frame(Due::Frame)).collect();
        let timers: Vec<_> = extra_timers
            .iter()
            .map(|d| sched.after(ms(*d), Due::Boot(BootEvent::Complete)))
            .collect();

        boot.teardown(&mut sched);
        bg.deactivate(&mut sched);
        tw.teardown(&mut sched);
        for h in frames {
            sched.cancel_frame(h);
        }
        for h in timers {
            sched.cancel(h);
        }
        prop_assert!(sched.is_idle());

        for step in 1..=40u64 {
            clock.set(ms(step * 250));
            sched.advance_to(clock.now());
            prop_assert_eq!(sched.pop_due(), None);
        }
        prop_assert_eq!(boot.revealed_lines().len(), 0);
        prop_assert!(!boot.is_done());
        prop_assert_eq!(bg.frames_rendered(), 0);
        prop_assert_eq!(tw.visible(), "");
    }
}

// ── 3. Boot monotonicity ────────────────────────────────────────────────

proptest! {
    #[test]
    fn boot_is_monotone_and_completes_once(seed in any::<u64>(), step_ms in 1u64..400) {
        let mut sched: Scheduler<BootEvent> = Scheduler::new(ms(16));
        let mut boot = BootSequencer::new(seed);
        boot.start(&mut sched);
        let n = boot.line_count();

        let mut revealed = 0;
        let mut completions = 0;
        let mut t = 0;
        while t < 10_000 {
            t += step_ms;
            sched.advance_to(ms(t));
            while let Some(ev) = sched.pop_due() {
                match boot.handle(ev, &mut sched) {
                    Some(BootProgress::LineRevealed(i)) => {
                        prop_assert_eq!(i, revealed);
                        revealed += 1;
                    }
                    Some(BootProgress::Completed) => {
                        prop_assert_eq!(revealed, n);
                        completions += 1;
                    }
                    None => {}
                }
                prop_assert_eq!(boot.revealed_lines().len(), revealed);
            }
        }
        prop_assert_eq!(revealed, n);
        prop_assert_eq!(completions, 1);
        prop_assert!(boot.is_done());
    }
}

// ── 4. Typewriter restart convergence ───────────────────────────────────

proptest! {
    #[test]
    fn typewriter_converges_to_last_text(
        texts in prop::collection::vec("[a-zA-Z ]{0,12}", 1..6),
        gaps in prop::collection::vec(0u64..200, 6),
    ) {
        let mut sched: Scheduler<TypewriterTick> = Scheduler::new(ms(16));
        let mut tw = Typewriter::new(ms(10), ms(30));
        let mut now = 0;
        for (text, gap) in texts.iter().zip(&gaps) {
            if tw.set_text(text, &mut sched) {
                prop_assert_eq!(tw.visible(), "");
            }
            let until = now + gap;
            while now < until {
                now += 5;
                sched.advance_to(ms(now));
                while let Some(tick) = sched.pop_due() {
                    tw.handle(tick, &mut sched);
                    prop_assert!(text.starts_with(tw.visible()));
                }
            }
        }
        sched.advance_to(ms(now + 10_000));
        while let Some(tick) = sched.pop_due() {
            tw.handle(tick, &mut sched);
        }
        let last = texts.last().expect("non-empty");
        prop_assert_eq!(tw.visible(), last.as_str());
        prop_assert!(sched.is_idle());
    }
}
