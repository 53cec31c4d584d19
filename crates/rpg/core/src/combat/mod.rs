//! Combat resolution.
//!
//! Pure functions only: given snapshots, a hit description and a crit roll,
//! the result is fully determined. The runtime supplies snapshots and rolls.
//!
//! # Core Functions
//!
//! - `resolve_direct_hit`: attacker → victim hit (strength, crit, defense)
//! - `resolve_environmental_hit`: causeless damage, optional mitigation
//! - `mitigate`: `damage × 100 / (100 + defense)`

pub mod crit;
pub mod damage;
pub mod result;

pub use crit::{crit_multiplier, is_crit};
pub use damage::{DamageCause, DirectHit, MIN_EFFECTIVE_DEFENSE, WeaponFlags, mitigate};
pub use result::{ResolvedDamage, resolve_direct_hit, resolve_environmental_hit};
