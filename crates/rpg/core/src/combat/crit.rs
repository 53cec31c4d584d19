//! Critical hit check and multiplier.

/// A roll in [0, 100) crits when it is strictly below the crit chance.
///
/// `crit_chance` 0 never crits, 100 always crits.
pub fn is_crit(roll: u32, crit_chance: i32) -> bool {
    i64::from(roll) < i64::from(crit_chance)
}

/// Multiplier applied on crit: `1 + crit_damage / 100`.
pub fn crit_multiplier(crit_damage: i32) -> f64 {
    1.0 + f64::from(crit_damage.max(0)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crit_chance_edges() {
        assert!(!is_crit(0, 0));
        assert!(is_crit(99, 100));
        assert!(is_crit(49, 50));
        assert!(!is_crit(50, 50));
    }

    #[test]
    fn multiplier_from_percent() {
        assert!((crit_multiplier(50) - 1.5).abs() < 1e-9);
        assert!((crit_multiplier(0) - 1.0).abs() < 1e-9);
        assert!((crit_multiplier(-20) - 1.0).abs() < 1e-9);
    }
}
