//! Per-category admission control applied before a signal is queued.

use std::time::{Duration, Instant};

use packet_striker_core::SignalCategory;

/// Rejects signals arriving within the cooldown of the last accepted signal
/// of the same category.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    cooldown: Duration,
    last_accepted: [Option<Instant>; 4],
}

impl RateLimiter {
    /// Creates a limiter that has accepted nothing yet.
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: [None; 4],
        }
    }

    /// Minimum spacing between accepted signals of one category.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Records the signal and reports whether it may proceed.
    ///
    /// A signal is admitted only once strictly more than the cooldown has
    /// elapsed since the previous admission.
    pub fn admit(&mut self, category: SignalCategory, now: Instant) -> bool {
        let slot = &mut self.last_accepted[category.index()];
        if let Some(previous) = *slot {
            if now.saturating_duration_since(previous) <= self.cooldown {
                return false;
            }
        }
        *slot = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn second_signal_within_cooldown_is_suppressed() {
        let mut limiter = RateLimiter::new(SECOND);
        let start = Instant::now();
        assert!(limiter.admit(SignalCategory::Tcp, start));
        assert!(!limiter.admit(SignalCategory::Tcp, start + Duration::from_millis(500)));
    }

    #[test]
    fn categories_cool_down_independently() {
        let mut limiter = RateLimiter::new(SECOND);
        let start = Instant::now();
        assert!(limiter.admit(SignalCategory::Tcp, start));
        assert!(limiter.admit(SignalCategory::Udp, start));
        assert!(limiter.admit(SignalCategory::Arp, start + Duration::from_millis(10)));
    }

    #[test]
    fn suppressed_signals_do_not_extend_the_cooldown() {
        let mut limiter = RateLimiter::new(SECOND);
        let start = Instant::now();
        assert!(limiter.admit(SignalCategory::Icmp, start));
        assert!(!limiter.admit(SignalCategory::Icmp, start + Duration::from_millis(900)));
        assert!(!limiter.admit(SignalCategory::Icmp, start + SECOND));
        assert!(limiter.admit(SignalCategory::Icmp, start + Duration::from_millis(1001)));
    }
}
