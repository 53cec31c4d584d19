//! Fixed-cooldown bookkeeping.

use crate::types::Tick;

/// Last successful activation and the fixed cooldown in force at that time.
///
/// Cooldown state is a timestamp delta, so an entry that outlived its
/// cooldown is harmless and never needs to be cleaned up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownEntry {
    pub activated_at: Tick,
    pub duration_ticks: u64,
}

impl CooldownEntry {
    pub const fn new(activated_at: Tick, duration_ticks: u64) -> Self {
        Self {
            activated_at,
            duration_ticks,
        }
    }

    /// Ticks until the ability can be used again; 0 when ready.
    pub const fn remaining(&self, now: Tick) -> u64 {
        self.duration_ticks
            .saturating_sub(now.since(self.activated_at))
    }

    pub const fn is_ready(&self, now: Tick) -> bool {
        self.remaining(now) == 0
    }
}

/// Shorten a base cooldown by a speed stat: `base × 100 / (100 + speed)`.
///
/// Abilities with dynamic cooldowns (e.g. scaling with shooting speed) call
/// this from their own hooks. A non-zero base never drops below one tick.
pub fn scaled_cooldown_ticks(base_ticks: u64, speed: i32) -> u64 {
    if base_ticks == 0 {
        return 0;
    }
    let divisor = 100 + u64::from(speed.max(0).unsigned_abs());
    (base_ticks.saturating_mul(100) / divisor).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_counts_down_to_zero() {
        let entry = CooldownEntry::new(Tick(0), 20);
        assert_eq!(entry.remaining(Tick(5)), 15);
        assert_eq!(entry.remaining(Tick(20)), 0);
        assert!(entry.is_ready(Tick(25)));
        assert!(!entry.is_ready(Tick(19)));
    }

    #[test]
    fn speed_shortens_but_never_zeroes() {
        assert_eq!(scaled_cooldown_ticks(40, 0), 40);
        assert_eq!(scaled_cooldown_ticks(40, 100), 20);
        assert_eq!(scaled_cooldown_ticks(40, -50), 40);
        assert_eq!(scaled_cooldown_ticks(1, 10_000), 1);
        assert_eq!(scaled_cooldown_ticks(0, 50), 0);
    }
}
