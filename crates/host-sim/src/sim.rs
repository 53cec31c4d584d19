//! Scripted encounter between a player and an AI-driven ogre.
//!
//! The simulation plays the host's part: it owns the actor roster, the
//! equipment, health bars and a tick clock, feeds scripted input to the
//! runtime and applies the damage the runtime resolves.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use rpg_content::{ConfigLoader, ContentFactory, ItemCatalog, ItemLoader};
use rpg_core::{
    ActorId, DamageCause, DirectHit, EquipmentSlot, InputAction, ItemHandle, ResolvedDamage,
    RpgConfig, Tick,
};
use rpg_runtime::{
    ActorDirectory, ActorRoster, FileProfileRepo, InMemoryProfileRepo, LoadoutOracle,
    ProfileRepository, RpgRuntime, TickSummary,
};

use crate::abilities;
use crate::config::SimConfig;
use crate::host::{Intent, SimHost};
use crate::npc;

pub const HERO: ActorId = ActorId(1);
pub const OGRE: ActorId = ActorId(2);

pub const LEAPING_SWORD: ItemHandle = ItemHandle(1001);
pub const EMBER_STAFF: ItemHandle = ItemHandle(1002);
pub const BULWARK_PLATE: ItemHandle = ItemHandle(1003);
pub const WINDRUNNER_BOOTS: ItemHandle = ItemHandle(1004);
pub const OGRE_CLUB: ItemHandle = ItemHandle(2001);

/// Multiplier applied to fireball blasts.
const BLAST_POWER: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptedEvent {
    Spawn {
        actor: ActorId,
        loadout: Vec<(EquipmentSlot, ItemHandle)>,
    },
    Equip {
        actor: ActorId,
        slot: EquipmentSlot,
        item: ItemHandle,
    },
    Use {
        actor: ActorId,
        item: ItemHandle,
        action: InputAction,
    },
    Swing {
        attacker: ActorId,
        victim: ActorId,
        raw_damage: f64,
    },
    Environment {
        victim: ActorId,
        raw_damage: f64,
        cause: DamageCause,
    },
    Train {
        actor: ActorId,
        stat: &'static str,
        amount: i32,
    },
}

/// The bundled duel, keyed by tick.
pub fn duel_script() -> BTreeMap<u64, Vec<ScriptedEvent>> {
    let mut script: BTreeMap<u64, Vec<ScriptedEvent>> = BTreeMap::new();
    let mut at = |tick: u64, event: ScriptedEvent| script.entry(tick).or_default().push(event);

    at(
        0,
        ScriptedEvent::Spawn {
            actor: HERO,
            loadout: vec![
                (EquipmentSlot::MainHand, LEAPING_SWORD),
                (EquipmentSlot::Chestplate, BULWARK_PLATE),
            ],
        },
    );
    at(
        0,
        ScriptedEvent::Spawn {
            actor: OGRE,
            loadout: vec![(EquipmentSlot::MainHand, OGRE_CLUB)],
        },
    );
    at(
        5,
        ScriptedEvent::Equip {
            actor: HERO,
            slot: EquipmentSlot::Boots,
            item: WINDRUNNER_BOOTS,
        },
    );
    for tick in [10, 12] {
        at(
            tick,
            ScriptedEvent::Use {
                actor: HERO,
                item: LEAPING_SWORD,
                action: InputAction::RightClick,
            },
        );
    }
    at(
        15,
        ScriptedEvent::Equip {
            actor: HERO,
            slot: EquipmentSlot::MainHand,
            item: EMBER_STAFF,
        },
    );
    for tick in [20, 25] {
        at(
            tick,
            ScriptedEvent::Use {
                actor: HERO,
                item: EMBER_STAFF,
                action: InputAction::RightClick,
            },
        );
    }
    at(
        30,
        ScriptedEvent::Environment {
            victim: OGRE,
            raw_damage: 6.0,
            cause: DamageCause::Lava,
        },
    );
    at(
        40,
        ScriptedEvent::Train {
            actor: HERO,
            stat: "strength",
            amount: 5,
        },
    );
    at(
        45,
        ScriptedEvent::Equip {
            actor: HERO,
            slot: EquipmentSlot::MainHand,
            item: LEAPING_SWORD,
        },
    );
    at(
        90,
        ScriptedEvent::Environment {
            victim: HERO,
            raw_damage: 4.0,
            cause: DamageCause::Fall,
        },
    );
    for tick in (8..=160).step_by(8) {
        at(
            tick,
            ScriptedEvent::Swing {
                attacker: HERO,
                victim: OGRE,
                raw_damage: 6.0,
            },
        );
    }

    script
}

pub struct Simulation {
    runtime: RpgRuntime,
    host: Arc<SimHost>,
    roster: Arc<ActorRoster>,
    loadouts: Arc<LoadoutOracle>,
    script: BTreeMap<u64, Vec<ScriptedEvent>>,
    now: Tick,
}

impl Simulation {
    /// Load content from the configured data directory and build the runtime.
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);
        let rpg_config = match &config.config_file {
            Some(path) => ConfigLoader::load(path)?,
            None => factory.load_config()?,
        };
        let catalog = match &config.items_file {
            Some(path) => ItemLoader::load(path)?,
            None => factory.load_items()?,
        };

        let repository: Arc<dyn ProfileRepository> = match &config.profile_dir {
            Some(dir) => Arc::new(
                FileProfileRepo::new(dir)
                    .with_context(|| format!("opening profile directory {}", dir.display()))?,
            ),
            None => Arc::new(InMemoryProfileRepo::new()),
        };

        tracing::info!(
            data_dir = %factory.data_dir().display(),
            items = catalog.len(),
            persistent = config.profile_dir.is_some(),
            "content loaded"
        );
        Self::new(rpg_config, catalog, repository, duel_script())
    }

    pub fn new(
        config: RpgConfig,
        catalog: ItemCatalog,
        repository: Arc<dyn ProfileRepository>,
        script: BTreeMap<u64, Vec<ScriptedEvent>>,
    ) -> Result<Self> {
        let host = Arc::new(SimHost::new());
        let roster = Arc::new(ActorRoster::new());
        let loadouts = Arc::new(LoadoutOracle::new(catalog));

        let runtime = RpgRuntime::builder()
            .config(config)
            .repository(repository)
            .equipment(loadouts.clone())
            .item_abilities(loadouts.clone())
            .directory(roster.clone())
            .host(host.clone())
            .display(host.clone())
            .abilities(abilities::registry(&host))
            .build()?;

        Ok(Self {
            runtime,
            host,
            roster,
            loadouts,
            script,
            now: Tick::ZERO,
        })
    }

    pub fn runtime(&self) -> &RpgRuntime {
        &self.runtime
    }

    pub fn host(&self) -> &SimHost {
        &self.host
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn is_alive(&self, actor: ActorId) -> bool {
        self.host.health(actor).is_some_and(|bar| !bar.is_dead())
    }

    /// Run one host tick: scripted input, runtime tick, queued intents.
    pub fn step(&mut self) -> Result<TickSummary> {
        let now = self.now;

        for event in self.script.remove(&now.0).unwrap_or_default() {
            self.apply(event, now)?;
        }

        let summary = self.runtime.tick(now);
        if summary.recomputed > 0 || summary.swept > 0 || summary.ai.transitions > 0 {
            tracing::debug!(tick = %now, ?summary, "tick");
        }

        for intent in self.host.drain_intents() {
            self.resolve(intent, now)?;
        }

        self.now = now + 1;
        Ok(summary)
    }

    /// End every live session and stop the runtime.
    pub fn finish(self) -> Result<()> {
        for actor in self.roster.active_actors() {
            self.runtime.quit(actor, self.now)?;
        }
        self.runtime.shutdown(self.now);
        Ok(())
    }

    fn apply(&self, event: ScriptedEvent, now: Tick) -> Result<()> {
        match event {
            ScriptedEvent::Spawn { actor, loadout } => {
                for (slot, item) in loadout {
                    self.loadouts.equip(actor, slot, item);
                }
                self.roster.insert(actor);
                self.runtime.join(actor)?;
                if actor == OGRE {
                    self.runtime
                        .attach_ai(actor, npc::ogre_scheduler(self.host.clone()), now);
                }
            }
            ScriptedEvent::Equip { actor, slot, item } => {
                if !self.is_alive(actor) {
                    return Ok(());
                }
                self.loadouts.equip(actor, slot, item);
                self.runtime.on_equipment_changed(actor, now);
            }
            ScriptedEvent::Use {
                actor,
                item,
                action,
            } => {
                if !self.is_alive(actor) {
                    return Ok(());
                }
                let result = self.runtime.attempt_activate(
                    actor,
                    item,
                    action,
                    EquipmentSlot::MainHand,
                    now,
                );
                tracing::info!(tick = %now, actor = %actor, item = %item, result = result.code(), "item used");
            }
            ScriptedEvent::Swing {
                attacker,
                victim,
                raw_damage,
            } => {
                if self.is_alive(attacker) {
                    let hit = DirectHit::melee(raw_damage);
                    let damage = self.runtime.resolve_direct_hit(Some(attacker), victim, &hit);
                    self.land(victim, &damage, now)?;
                }
            }
            ScriptedEvent::Environment {
                victim,
                raw_damage,
                cause,
            } => {
                let damage = self
                    .runtime
                    .resolve_environmental_hit(victim, raw_damage, cause);
                self.land(victim, &damage, now)?;
            }
            ScriptedEvent::Train {
                actor,
                stat,
                amount,
            } => {
                if let Some(value) = self
                    .runtime
                    .set_base_stat_by_name(actor, stat, amount, true)?
                {
                    tracing::info!(actor = %actor, stat, value, "trained");
                }
            }
        }
        Ok(())
    }

    fn resolve(&self, intent: Intent, now: Tick) -> Result<()> {
        match intent {
            Intent::Strike {
                attacker,
                raw_damage,
            } => {
                let victim = opponent(attacker);
                if self.is_alive(attacker) && self.is_alive(victim) {
                    let hit = DirectHit::melee(raw_damage);
                    let damage = self.runtime.resolve_direct_hit(Some(attacker), victim, &hit);
                    self.land(victim, &damage, now)?;
                }
            }
            Intent::Blast { caster, raw_damage } => {
                let victim = opponent(caster);
                if self.is_alive(victim) {
                    let damage = self.runtime.resolve_direct_hit(
                        Some(caster),
                        victim,
                        &DirectHit::projectile(raw_damage, BLAST_POWER),
                    );
                    self.land(victim, &damage, now)?;
                }
            }
            Intent::Dash { actor, distance } => {
                tracing::info!(tick = %now, actor = %actor, distance, "dash");
            }
        }
        Ok(())
    }

    fn land(&self, victim: ActorId, damage: &ResolvedDamage, now: Tick) -> Result<()> {
        match self.host.apply_damage(victim, damage) {
            Some(left) if left <= 0.0 => self.despawn(victim, now),
            _ => Ok(()),
        }
    }

    fn despawn(&self, actor: ActorId, now: Tick) -> Result<()> {
        tracing::info!(tick = %now, actor = %actor, "slain");
        self.runtime.quit(actor, now)?;
        self.roster.remove(actor);
        self.loadouts.clear(actor);
        self.host.forget(actor);
        Ok(())
    }
}

fn opponent(actor: ActorId) -> ActorId {
    if actor == HERO { OGRE } else { HERO }
}

#[cfg(test)]
mod tests {
    use rpg_content::ContentFactory;

    use super::*;

    fn bundled() -> Simulation {
        let factory = ContentFactory::new(SimConfig::default().data_dir);
        Simulation::new(
            factory.load_config().unwrap(),
            factory.load_items().unwrap(),
            Arc::new(InMemoryProfileRepo::new()),
            duel_script(),
        )
        .unwrap()
    }

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::new(SimConfig::default().data_dir);
        let config = factory.load_config().unwrap();
        assert_eq!(config.game_seed, Some(1337));
        assert!(config.combat.mitigates(DamageCause::Fall));
        assert_eq!(factory.load_items().unwrap().len(), 5);
    }

    #[test]
    fn opening_spawns_both_actors() {
        let mut sim = bundled();
        sim.step().unwrap();

        assert!(sim.is_alive(HERO));
        assert!(sim.is_alive(OGRE));
        assert_eq!(sim.runtime().snapshot(OGRE).max_health(), 100);
        assert_eq!(sim.runtime().ai().active_behavior(OGRE), Some("pummel"));
    }

    #[test]
    fn fireball_goes_on_cooldown() {
        let mut sim = bundled();
        for _ in 0..=20 {
            sim.step().unwrap();
        }

        let remaining = sim
            .runtime()
            .abilities()
            .cooldown_remaining(HERO, &"fireball".into(), sim.now());
        assert!(remaining > 0);
        assert!(sim.runtime().snapshot(HERO).max_mana() >= 100);
    }

    #[test]
    fn boots_change_movement_speed() {
        let mut sim = bundled();
        for _ in 0..10 {
            sim.step().unwrap();
        }
        let modifier = sim.host().movement_modifier(HERO).unwrap();
        assert!((modifier - 0.55).abs() < 1e-9);
    }

    #[test]
    fn finish_persists_profiles() {
        let repo = Arc::new(InMemoryProfileRepo::new());
        let factory = ContentFactory::new(SimConfig::default().data_dir);
        let mut sim = Simulation::new(
            factory.load_config().unwrap(),
            factory.load_items().unwrap(),
            repo.clone(),
            duel_script(),
        )
        .unwrap();
        for _ in 0..=40 {
            sim.step().unwrap();
        }
        sim.finish().unwrap();

        assert_eq!(repo.load(HERO).unwrap().unwrap().strength, 5);
    }

    #[test]
    fn file_overrides_replace_bundled_content() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("custom.toml");
        std::fs::write(&config_file, "[ai]\nenabled = false\n").unwrap();

        let config = SimConfig {
            config_file: Some(config_file),
            ..SimConfig::default()
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        sim.step().unwrap();

        assert!(!sim.runtime().config().ai.enabled);
        assert_eq!(sim.runtime().ai().active_behavior(OGRE), None);
        assert_eq!(sim.runtime().snapshot(OGRE).strength(), 10);
    }

    #[test]
    fn profile_dir_uses_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimConfig {
            profile_dir: Some(dir.path().to_path_buf()),
            ..SimConfig::default()
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        sim.step().unwrap();
        sim.finish().unwrap();

        let repo = FileProfileRepo::new(dir.path()).unwrap();
        assert_eq!(repo.list_actors().unwrap(), vec![HERO, OGRE]);
    }
}
