//! Id-level wrapper around the pure combat resolver.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rpg_core::{
    ActorId, CombatConfig, DamageCause, DirectHit, ResolvedDamage, RngOracle, compute_seed,
    resolve_direct_hit, resolve_environmental_hit,
};

use crate::oracle::{ActorDirectory, DisplaySink};
use crate::stats::StatAggregator;

/// Seed context for crit rolls, keeping them apart from other random draws.
const CRIT_ROLL_CONTEXT: u32 = 0x4352_4954;

/// Resolves hits between actors.
///
/// Looks up snapshots, draws the crit roll from a seeded generator and tells
/// the display about every resolved hit. The only state is the roll sequence
/// counter.
pub struct CombatService {
    config: CombatConfig,
    stats: Arc<StatAggregator>,
    directory: Arc<dyn ActorDirectory>,
    display: Arc<dyn DisplaySink>,
    rng: Arc<dyn RngOracle>,
    game_seed: u64,
    sequence: AtomicU64,
}

impl CombatService {
    pub fn new(
        config: CombatConfig,
        stats: Arc<StatAggregator>,
        directory: Arc<dyn ActorDirectory>,
        display: Arc<dyn DisplaySink>,
        rng: Arc<dyn RngOracle>,
        game_seed: u64,
    ) -> Self {
        Self {
            config,
            stats,
            directory,
            display,
            rng,
            game_seed,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn game_seed(&self) -> u64 {
        self.game_seed
    }

    /// Resolve a melee or projectile hit.
    ///
    /// An invalid victim makes the hit a no-op. An attacker the host does not
    /// know (or no attacker at all) adds no strength and cannot crit.
    pub fn resolve_direct_hit(
        &self,
        attacker: Option<ActorId>,
        victim: ActorId,
        hit: &DirectHit,
    ) -> ResolvedDamage {
        if !self.directory.is_valid(victim) {
            tracing::debug!(target: "runtime::combat", victim = %victim, "hit on invalid victim ignored");
            return ResolvedDamage::NONE;
        }

        let attacker = attacker.filter(|actor| self.directory.is_valid(*actor));
        let attacker_snapshot = attacker.map(|actor| self.stats.snapshot(actor));
        let victim_snapshot = self.stats.snapshot(victim);
        let roll = self.next_roll(attacker.unwrap_or(victim));

        let damage = resolve_direct_hit(
            attacker_snapshot.as_ref(),
            Some(&victim_snapshot),
            hit,
            roll,
        );

        tracing::debug!(
            target: "runtime::combat",
            attacker = ?attacker,
            victim = %victim,
            raw = hit.raw_damage,
            roll,
            amount = damage.amount,
            crit = damage.is_crit,
            true_damage = damage.is_true_damage,
            "direct hit resolved"
        );
        self.display.damage_resolved(attacker, victim, &damage);
        damage
    }

    /// Resolve environmental damage (fall, fire, ...).
    pub fn resolve_environmental_hit(
        &self,
        victim: ActorId,
        raw_damage: f64,
        cause: DamageCause,
    ) -> ResolvedDamage {
        if !self.directory.is_valid(victim) {
            return ResolvedDamage::NONE;
        }

        let snapshot = self.stats.snapshot(victim);
        let damage = resolve_environmental_hit(Some(&snapshot), raw_damage, cause, &self.config);

        tracing::debug!(
            target: "runtime::combat",
            victim = %victim,
            %cause,
            raw = raw_damage,
            amount = damage.amount,
            "environmental hit resolved"
        );
        self.display.damage_resolved(None, victim, &damage);
        damage
    }

    fn next_roll(&self, actor: ActorId) -> u32 {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let seed = compute_seed(self.game_seed, sequence, actor.0, CRIT_ROLL_CONTEXT);
        self.rng.roll_percent(seed)
    }
}
