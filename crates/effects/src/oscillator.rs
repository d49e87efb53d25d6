use crate::flags::EffectFlags;

pub const OSCILLATOR_MIN: i32 = 0;
pub const OSCILLATOR_MAX: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Bounded counter that ping-pongs between 0 and 10, one step per tick.
///
/// Feeds the emboss and pixellate shader strength. The driver is gated: a
/// tick is observed but ignored unless at least one consumer effect is
/// enabled, so idle cards see no state churn. The direction flips on the
/// same tick that reaches a boundary, never beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oscillator {
    value: i32,
    direction: Direction,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self {
            value: OSCILLATOR_MIN,
            direction: Direction::Up,
        }
    }
}

impl Oscillator {
    /// Starts at 0, counting up.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Current value as a shader parameter.
    pub fn as_param(&self) -> f32 {
        self.value as f32
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == Direction::Up
    }

    /// Advances one step if a consumer effect is enabled.
    ///
    /// Returns whether the value changed, letting callers skip redraw
    /// scheduling for ignored ticks.
    pub fn tick(&mut self, flags: &EffectFlags) -> bool {
        if !flags.drives_oscillator() {
            return false;
        }

        self.value += match self.direction {
            Direction::Up => 1,
            Direction::Down => -1,
        };

        if self.value >= OSCILLATOR_MAX {
            self.direction = Direction::Down;
        } else if self.value <= OSCILLATOR_MIN {
            self.direction = Direction::Up;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::EffectKind;

    fn driving_flags() -> EffectFlags {
        let mut flags = EffectFlags::none();
        flags.toggle(EffectKind::Emboss);
        flags
    }

    #[test]
    fn reaches_max_after_ten_ticks_and_reverses() {
        let flags = driving_flags();
        let mut osc = Oscillator::new();
        for expected in 1..=10 {
            assert!(osc.tick(&flags));
            assert_eq!(osc.value(), expected);
        }
        assert!(!osc.is_ascending(), "direction flips on the boundary tick");
        assert!(osc.tick(&flags));
        assert_eq!(osc.value(), 9);
    }

    #[test]
    fn never_leaves_bounds_over_long_runs() {
        let flags = driving_flags();
        let mut osc = Oscillator::new();
        for _ in 0..1000 {
            osc.tick(&flags);
            assert!((OSCILLATOR_MIN..=OSCILLATOR_MAX).contains(&osc.value()));
        }
    }

    #[test]
    fn reverses_again_at_zero() {
        let flags = driving_flags();
        let mut osc = Oscillator::new();
        for _ in 0..20 {
            osc.tick(&flags);
        }
        assert_eq!(osc.value(), 0);
        assert!(osc.is_ascending());
    }

    #[test]
    fn tick_is_a_noop_without_consumers() {
        let mut flags = driving_flags();
        let mut osc = Oscillator::new();
        for _ in 0..9 {
            osc.tick(&flags);
        }
        assert_eq!(osc.value(), 9);
        assert!(osc.is_ascending());

        flags.toggle(EffectKind::Emboss);
        assert!(!osc.tick(&flags));
        assert_eq!(osc.value(), 9, "ignored tick must not move the value");
        assert!(osc.is_ascending());
    }

    #[test]
    fn pixellate_alone_drives_the_counter() {
        let mut flags = EffectFlags::none();
        flags.toggle(EffectKind::Pixellate);
        let mut osc = Oscillator::new();
        assert!(osc.tick(&flags));
        assert_eq!(osc.value(), 1);
    }
}
