use std::time::{Duration, Instant};

/// Interval of the oscillator driver tick.
pub const OSCILLATOR_INTERVAL: Duration = Duration::from_millis(100);

/// Interval of the slow pulse that modulates the overlay accent.
pub const PULSE_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed-interval timer driven by the single-threaded event loop.
///
/// The loop asks for [`TickTimer::next_deadline`] to park in `WaitUntil`,
/// then calls [`TickTimer::fire_due`] when it wakes. Deadlines advance by
/// whole intervals from the previous deadline rather than from `now`, so a
/// late wakeup catches up without accumulating drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTimer {
    interval: Duration,
    next: Instant,
}

impl TickTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Returns how many intervals elapsed by `now` and schedules the next one.
    pub fn fire_due(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while self.next <= now {
            fired += 1;
            self.next += self.interval;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_fire_before_the_deadline() {
        let start = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(100), start);
        assert_eq!(timer.fire_due(start + Duration::from_millis(99)), 0);
        assert_eq!(timer.next_deadline(), start + Duration::from_millis(100));
    }

    #[test]
    fn fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(100), start);
        assert_eq!(timer.fire_due(start + Duration::from_millis(100)), 1);
        assert_eq!(timer.fire_due(start + Duration::from_millis(150)), 0);
        assert_eq!(timer.fire_due(start + Duration::from_millis(200)), 1);
    }

    #[test]
    fn late_wakeup_catches_up_without_drift() {
        let start = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(100), start);
        assert_eq!(timer.fire_due(start + Duration::from_millis(350)), 3);
        // Next deadline stays on the original grid.
        assert_eq!(timer.next_deadline(), start + Duration::from_millis(400));
    }
}
