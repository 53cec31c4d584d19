//! Combat resolution pipeline.

use crate::config::CombatConfig;
use crate::stats::AttributeSnapshot;

use super::crit::{crit_multiplier, is_crit};
use super::damage::{DamageCause, DirectHit, finite_or, mitigate, saturate_damage};

/// Final damage plus the side-channel flags downstream visuals use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedDamage {
    /// Always finite and ≥ 0.
    pub amount: f64,
    pub is_crit: bool,
    pub is_true_damage: bool,
}

impl ResolvedDamage {
    /// Result of a hit that did not resolve (victim gone).
    pub const NONE: Self = Self {
        amount: 0.0,
        is_crit: false,
        is_true_damage: false,
    };
}

/// Resolve an attacker → victim hit.
///
/// # Pipeline
///
/// ```text
/// damage = raw × multiplier
/// damage += attacker.strength
/// if roll < attacker.crit_chance: damage ×= 1 + crit_damage/100
/// unless true damage:            damage ×= 100 / (100 + victim.defense)
/// damage = clamp(damage, 0, f64::MAX)
/// ```
///
/// `roll` is the single uniform draw in [0, 100) for this resolution.
/// An untracked attacker contributes no strength and never crits; a missing
/// victim makes the hit a no-op.
pub fn resolve_direct_hit(
    attacker: Option<&AttributeSnapshot>,
    victim: Option<&AttributeSnapshot>,
    hit: &DirectHit,
    roll: u32,
) -> ResolvedDamage {
    let Some(victim) = victim else {
        return ResolvedDamage::NONE;
    };

    let mut damage = finite_or(hit.raw_damage, 0.0) * finite_or(hit.multiplier, 1.0);

    let (strength, crit_chance, crit_damage) = attacker
        .map(|a| (a.strength(), a.crit_chance(), a.crit_damage()))
        .unwrap_or((0, 0, 0));

    damage += f64::from(strength);

    let crit = is_crit(roll, crit_chance);
    if crit {
        damage *= crit_multiplier(crit_damage);
    }

    let true_damage = hit.is_true_damage();
    if !true_damage {
        damage = mitigate(damage, victim.defense());
    }

    ResolvedDamage {
        amount: saturate_damage(damage),
        is_crit: crit,
        is_true_damage: true_damage,
    }
}

/// Resolve damage from the environment (fall, fire, ...).
///
/// Defense applies only to causes whitelisted in [`CombatConfig`]; every other
/// cause passes through untouched.
pub fn resolve_environmental_hit(
    victim: Option<&AttributeSnapshot>,
    raw_damage: f64,
    cause: DamageCause,
    config: &CombatConfig,
) -> ResolvedDamage {
    let Some(victim) = victim else {
        return ResolvedDamage::NONE;
    };

    let mut damage = finite_or(raw_damage, 0.0);
    if config.mitigates(cause) {
        damage = mitigate(damage, victim.defense());
    }

    ResolvedDamage {
        amount: saturate_damage(damage),
        is_crit: false,
        is_true_damage: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::WeaponFlags;

    const NO_CRIT: u32 = 99;

    fn attacker(strength: i32, crit_chance: i32, crit_damage: i32) -> AttributeSnapshot {
        AttributeSnapshot::builder()
            .strength(strength)
            .crit_chance(crit_chance)
            .crit_damage(crit_damage)
            .build()
    }

    fn victim(defense: i32) -> AttributeSnapshot {
        AttributeSnapshot::builder().defense(defense).max_health(100).build()
    }

    #[test]
    fn weighted_example_resolves_to_thirty() {
        let result = resolve_direct_hit(
            Some(&attacker(20, 100, 50)),
            Some(&victim(50)),
            &DirectHit::melee(10.0),
            0,
        );

        assert!(result.is_crit);
        assert!(!result.is_true_damage);
        assert!((result.amount - 30.0).abs() < 1e-9);
    }

    #[test]
    fn identical_inputs_and_roll_give_identical_output() {
        let a = attacker(13, 40, 75);
        let v = victim(27);
        let hit = DirectHit::projectile(7.5, 1.8);
        for roll in [0, 39, 40, 99] {
            let first = resolve_direct_hit(Some(&a), Some(&v), &hit, roll);
            let second = resolve_direct_hit(Some(&a), Some(&v), &hit, roll);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn more_defense_never_increases_damage() {
        let a = attacker(15, 0, 0);
        let hit = DirectHit::melee(20.0);
        let mut previous = f64::INFINITY;
        for defense in (-50..=500).step_by(25) {
            let result = resolve_direct_hit(Some(&a), Some(&victim(defense)), &hit, NO_CRIT);
            assert!(result.amount <= previous);
            previous = result.amount;
        }
    }

    #[test]
    fn true_damage_ignores_defense() {
        let a = attacker(15, 0, 0);
        let hit = DirectHit::melee(20.0).with_flags(WeaponFlags::TRUE_DAMAGE);
        let low = resolve_direct_hit(Some(&a), Some(&victim(0)), &hit, NO_CRIT);
        let high = resolve_direct_hit(Some(&a), Some(&victim(900)), &hit, NO_CRIT);
        assert_eq!(low, high);
        assert!(low.is_true_damage);
        assert!((low.amount - 35.0).abs() < 1e-9);
    }

    #[test]
    fn crit_never_deals_less_than_non_crit() {
        let v = victim(40);
        for crit_damage in [0, 1, 50, 300] {
            let a = attacker(8, 50, crit_damage);
            let hit = DirectHit::melee(12.0);
            let crit = resolve_direct_hit(Some(&a), Some(&v), &hit, 0);
            let normal = resolve_direct_hit(Some(&a), Some(&v), &hit, NO_CRIT);
            assert!(crit.is_crit && !normal.is_crit);
            assert!(crit.amount >= normal.amount);
        }
    }

    #[test]
    fn damage_is_never_negative() {
        let cases = [
            (attacker(-500, 100, 200), victim(0), DirectHit::melee(0.0)),
            (attacker(-1, 0, 0), victim(10_000), DirectHit::melee(0.0)),
            (attacker(0, 0, 0), victim(-99), DirectHit::melee(-30.0)),
            (attacker(5, 0, 0), victim(50), DirectHit::melee(f64::NAN)),
        ];
        for (a, v, hit) in cases {
            for roll in [0, 99] {
                let result = resolve_direct_hit(Some(&a), Some(&v), &hit, roll);
                assert!(result.amount >= 0.0 && result.amount.is_finite());
            }
        }
    }

    #[test]
    fn projectile_power_multiplies_before_strength() {
        let result = resolve_direct_hit(
            Some(&attacker(10, 0, 0)),
            Some(&victim(0)),
            &DirectHit::projectile(4.0, 2.5),
            NO_CRIT,
        );
        assert!((result.amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn untracked_attacker_has_no_strength_or_crit() {
        let result = resolve_direct_hit(None, Some(&victim(0)), &DirectHit::melee(6.0), 0);
        assert!(!result.is_crit);
        assert!((result.amount - 6.0).abs() < 1e-9);
    }

    #[test]
    fn missing_victim_is_a_no_op() {
        let result = resolve_direct_hit(
            Some(&attacker(100, 100, 100)),
            None,
            &DirectHit::melee(50.0),
            0,
        );
        assert_eq!(result, ResolvedDamage::NONE);
    }

    #[test]
    fn environmental_damage_mitigated_only_when_whitelisted() {
        let v = victim(100);
        let default_config = CombatConfig::default();
        let unmitigated =
            resolve_environmental_hit(Some(&v), 8.0, DamageCause::Fall, &default_config);
        assert!((unmitigated.amount - 8.0).abs() < 1e-9);

        let config = CombatConfig {
            mitigated_causes: vec![DamageCause::Fall],
        };
        let mitigated = resolve_environmental_hit(Some(&v), 8.0, DamageCause::Fall, &config);
        assert!((mitigated.amount - 4.0).abs() < 1e-9);
        assert!(!mitigated.is_crit);

        let other = resolve_environmental_hit(Some(&v), 8.0, DamageCause::Lava, &config);
        assert!((other.amount - 8.0).abs() < 1e-9);
    }

    #[test]
    fn overflowing_hits_saturate_instead_of_vanishing() {
        let fragile = victim(-99);
        let direct = resolve_direct_hit(None, Some(&fragile), &DirectHit::melee(1e307), NO_CRIT);
        assert_eq!(direct.amount, f64::MAX);

        let config = CombatConfig {
            mitigated_causes: vec![DamageCause::Fall],
        };
        let environmental =
            resolve_environmental_hit(Some(&fragile), 1e307, DamageCause::Fall, &config);
        assert_eq!(environmental.amount, f64::MAX);
    }
}
