//! Property-based invariant tests for the scheduler.
//!
//! 1. Cancelling every handle before any fire yields zero deliveries, for any N.
//! 2. Delivered timers come out in non-decreasing deadline order.
//! 3. A subset cancelled up front is exactly the subset never delivered.
//! 4. Frame requests never fire twice, and a frame requested during a batch
//!    waits for the next boundary.

use std::time::Duration;

use proptest::prelude::*;
use vibe_core::Scheduler;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── 1. Cancellation safety ──────────────────────────────────────────────

proptest! {
    #[test]
    fn teardown_before_fire_delivers_nothing(
        delays in prop::collection::vec(0u64..5_000, 0..64),
        frames in 0usize..32,
    ) {
        let mut s = Scheduler::new(ms(16));
        let timers: Vec<_> = delays.iter().enumerate().map(|(i, d)| s.after(ms(*d), i)).collect();
        let frame_handles: Vec<_> = (0..frames).map(|i| s.request_frame(10_000 + i)).collect();

        for h in timers {
            prop_assert!(s.cancel(h));
        }
        for h in frame_handles {
            prop_assert!(s.cancel_frame(h));
        }

        for step in 0..20u64 {
            s.advance_to(ms(step * 500));
            prop_assert_eq!(s.pop_due(), None);
        }
        prop_assert!(s.is_idle());
    }
}

// ── 2. Deadline ordering ────────────────────────────────────────────────

proptest! {
    #[test]
    fn timers_fire_in_deadline_order(delays in prop::collection::vec(0u64..1_000, 1..64)) {
        let mut s = Scheduler::new(ms(16));
        for (i, d) in delays.iter().enumerate() {
            s.after(ms(*d), (*d, i));
        }
        let mut fired = Vec::new();
        for t in (0..=1_000).step_by(37) {
            s.advance_to(ms(t));
            while let Some((deadline, i)) = s.pop_due() {
                prop_assert!(deadline <= t);
                fired.push((deadline, i));
            }
        }
        s.advance_to(ms(1_000));
        while let Some(entry) = s.pop_due() {
            fired.push(entry);
        }
        prop_assert_eq!(fired.len(), delays.len());
        let mut sorted = fired.clone();
        sorted.sort();
        prop_assert_eq!(fired, sorted);
    }
}

// ── 3. Partial cancellation ─────────────────────────────────────────────

proptest! {
    #[test]
    fn cancelled_subset_is_exactly_missing(
        entries in prop::collection::vec((0u64..500, any::<bool>()), 0..48)
    ) {
        let mut s = Scheduler::new(ms(16));
        let mut expected = Vec::new();
        let handles: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, (d, _))| s.after(ms(*d), i))
            .collect();
        for (i, ((_, cancel), h)) in entries.iter().zip(handles).enumerate() {
            if *cancel {
                s.cancel(h);
            } else {
                expected.push(i);
            }
        }
        s.advance_to(ms(500));
        let mut fired: Vec<usize> = std::iter::from_fn(|| s.pop_due()).collect();
        fired.sort_unstable();
        prop_assert_eq!(fired, expected);
    }
}

// ── 4. Frames ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rerequested_frame_fires_once_per_boundary(steps in 1u64..40, interval in 1u64..50) {
        let mut s = Scheduler::new(ms(interval));
        s.request_frame(());
        let mut delivered = 0u64;
        for t in 0..steps {
            s.advance_to(ms(t * interval));
            let mut this_step = 0;
            while s.pop_due().is_some() {
                this_step += 1;
                s.request_frame(());
            }
            prop_assert!(this_step <= 1);
            delivered += this_step;
        }
        prop_assert_eq!(delivered, steps);
        prop_assert_eq!(s.pending_frames(), 1);
    }
}
