// ── Continuous-input rate limiter ──
//
// One limiter per input stream (speed slider, color picker). A sample is
// admitted when at least `min_interval` has passed since the last one
// that was sent; anything earlier is dropped, never queued. The most
// recent dropped sample is remembered so a collaborator can flush it when
// the gesture ends.

use std::time::Duration;

use tokio::time::Instant;

/// Default minimum spacing between two sends on the same stream.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Where a stream currently is in its send window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterState {
    /// Nothing sent yet, or the last send is older than the window.
    Idle,
    /// A send happened at the given instant and its window is still open.
    Armed(Instant),
}

#[derive(Debug)]
pub struct RateLimiter<T> {
    min_interval: Duration,
    last_sent: Option<Instant>,
    pending: Option<T>,
}

impl<T> RateLimiter<T> {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_sent: None,
            pending: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn state(&self, now: Instant) -> LimiterState {
        match self.last_sent {
            Some(at) if now.saturating_duration_since(at) < self.min_interval => {
                LimiterState::Armed(at)
            }
            _ => LimiterState::Idle,
        }
    }

    /// Offer a sample. Returns it back if it may be sent now (and arms
    /// the window at `now`); otherwise keeps it as the pending sample and
    /// returns `None`.
    pub fn admit(&mut self, now: Instant, sample: T) -> Option<T> {
        let open = self
            .last_sent
            .is_none_or(|at| now.saturating_duration_since(at) >= self.min_interval);

        if open {
            self.last_sent = Some(now);
            self.pending = None;
            Some(sample)
        } else {
            self.pending = Some(sample);
            None
        }
    }

    /// Take the last dropped sample, if any, arming the window at `now`
    /// as if it had just been sent.
    pub fn take_pending(&mut self, now: Instant) -> Option<T> {
        let sample = self.pending.take()?;
        self.last_sent = Some(now);
        Some(sample)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget all history; the next sample is admitted.
    pub fn reset(&mut self) {
        self.last_sent = None;
        self.pending = None;
    }
}

impl<T> Default for RateLimiter<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_inside_one_window_sends_once() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::default();

        let mut sent = Vec::new();
        for sample in 0..10u32 {
            if let Some(v) = limiter.admit(clock.now(), sample) {
                sent.push(v);
            }
            clock.advance(ms(5));
        }

        assert_eq!(sent, vec![0]);
        assert!(limiter.has_pending());
    }

    #[test]
    fn samples_exactly_one_interval_apart_both_send() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::default();

        assert_eq!(limiter.admit(clock.now(), 'a'), Some('a'));
        clock.advance(ms(100));
        assert_eq!(limiter.admit(clock.now(), 'b'), Some('b'));
    }

    #[test]
    fn sample_just_inside_window_is_dropped() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::default();

        limiter.admit(clock.now(), 1);
        clock.advance(ms(99));
        assert_eq!(limiter.admit(clock.now(), 2), None);
    }

    #[test]
    fn dropped_sample_does_not_extend_window() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::default();

        limiter.admit(clock.now(), 1);
        clock.advance(ms(60));
        assert_eq!(limiter.admit(clock.now(), 2), None);
        clock.advance(ms(40));
        assert_eq!(limiter.admit(clock.now(), 3), Some(3));
    }

    #[test]
    fn state_machine_transitions() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::<u8>::default();
        assert_eq!(limiter.state(clock.now()), LimiterState::Idle);

        let t0 = clock.now();
        limiter.admit(t0, 1);
        assert_eq!(limiter.state(clock.now()), LimiterState::Armed(t0));

        clock.advance(ms(100));
        assert_eq!(limiter.state(clock.now()), LimiterState::Idle);
    }

    #[test]
    fn pending_keeps_only_the_latest_and_flushes_once() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::default();

        limiter.admit(clock.now(), 10);
        limiter.admit(clock.now(), 11);
        limiter.admit(clock.now(), 12);

        assert_eq!(limiter.take_pending(clock.now()), Some(12));
        assert_eq!(limiter.take_pending(clock.now()), None);
    }

    #[test]
    fn admitted_sample_clears_pending() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::default();

        limiter.admit(clock.now(), 1);
        limiter.admit(clock.now(), 2);
        clock.advance(ms(150));
        limiter.admit(clock.now(), 3);

        assert!(!limiter.has_pending());
    }

    #[test]
    fn reset_reopens_the_window() {
        let clock = ManualClock::new();
        let mut limiter = RateLimiter::default();

        limiter.admit(clock.now(), 1);
        limiter.reset();
        assert_eq!(limiter.admit(clock.now(), 2), Some(2));
    }
}
