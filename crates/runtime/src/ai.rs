//! Per-actor behavior schedulers for non-player actors.
//!
//! Each scheduler is driven once per runtime tick with a fresh [`AiContext`],
//! so behaviors decide on the actor's current derived stats. Schedulers are
//! taken out of the registry while they run; behavior callbacks may attach or
//! detach other actors without deadlocking.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use behavior_scheduler::BehaviorScheduler;
use rpg_core::{ActorId, AttributeSnapshot, Tick};

use crate::oracle::ActorDirectory;
use crate::resources::{ManaState, ResourcePool};
use crate::stats::StatAggregator;

/// What a behavior sees about its actor on one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct AiContext {
    pub actor: ActorId,
    pub now: Tick,
    pub snapshot: AttributeSnapshot,
    pub mana: Option<ManaState>,
}

pub type ActorScheduler = BehaviorScheduler<AiContext>;

/// Outcome of one [`AiRegistry::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiTickSummary {
    pub ticked: usize,
    pub transitions: usize,
    pub removed: Vec<ActorId>,
}

#[derive(Default)]
pub struct AiRegistry {
    schedulers: Mutex<HashMap<ActorId, ActorScheduler>>,
}

impl AiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `actor` a scheduler, replacing (and stopping) any previous one.
    pub fn attach(&self, actor: ActorId, scheduler: ActorScheduler, now: Tick) {
        let previous = self.schedulers().insert(actor, scheduler);
        if let Some(mut previous) = previous {
            let mut ctx = AiContext {
                actor,
                now,
                snapshot: AttributeSnapshot::default(),
                mana: None,
            };
            previous.stop(&mut ctx);
        }
    }

    /// Remove `actor`'s scheduler, ending its active behavior.
    pub fn detach(&self, actor: ActorId, now: Tick) -> bool {
        let Some(mut scheduler) = self.schedulers().remove(&actor) else {
            return false;
        };
        let mut ctx = AiContext {
            actor,
            now,
            snapshot: AttributeSnapshot::default(),
            mana: None,
        };
        if let Some(behavior) = scheduler.stop(&mut ctx) {
            tracing::debug!(target: "runtime::ai", actor = %actor, behavior, "behavior stopped on detach");
        }
        true
    }

    pub fn is_attached(&self, actor: ActorId) -> bool {
        self.schedulers().contains_key(&actor)
    }

    pub fn len(&self) -> usize {
        self.schedulers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers().is_empty()
    }

    /// Name of the behavior `actor` is running.
    pub fn active_behavior(&self, actor: ActorId) -> Option<&'static str> {
        self.schedulers().get(&actor)?.active()
    }

    /// Run every scheduler once.
    ///
    /// Actors the directory no longer knows lose their scheduler; their active
    /// behavior is ended first.
    pub fn tick(
        &self,
        now: Tick,
        directory: &dyn ActorDirectory,
        stats: &StatAggregator,
        resources: &ResourcePool,
    ) -> AiTickSummary {
        let mut taken: Vec<(ActorId, ActorScheduler)> = self.schedulers().drain().collect();
        taken.sort_unstable_by_key(|(actor, _)| *actor);

        let mut summary = AiTickSummary::default();
        let mut kept = Vec::with_capacity(taken.len());

        for (actor, mut scheduler) in taken {
            if !directory.is_valid(actor) {
                let mut ctx = AiContext {
                    actor,
                    now,
                    snapshot: AttributeSnapshot::default(),
                    mana: None,
                };
                scheduler.stop(&mut ctx);
                tracing::debug!(target: "runtime::ai", actor = %actor, "scheduler removed for invalid actor");
                summary.removed.push(actor);
                continue;
            }

            let mut ctx = AiContext {
                actor,
                now,
                snapshot: stats.snapshot(actor),
                mana: resources.get(actor),
            };
            let report = scheduler.tick(&mut ctx);
            if report.transitioned() {
                summary.transitions += 1;
                tracing::debug!(
                    target: "runtime::ai",
                    actor = %actor,
                    ended = ?report.ended,
                    started = ?report.started,
                    "behavior transition"
                );
            }
            summary.ticked += 1;
            kept.push((actor, scheduler));
        }

        let mut schedulers = self.schedulers();
        for (actor, scheduler) in kept {
            // A callback may have attached a replacement meanwhile; it wins.
            schedulers.entry(actor).or_insert(scheduler);
        }
        summary
    }

    /// Stop every scheduler. Called at shutdown.
    pub fn clear(&self, now: Tick) {
        let drained: Vec<(ActorId, ActorScheduler)> = self.schedulers().drain().collect();
        for (actor, mut scheduler) in drained {
            let mut ctx = AiContext {
                actor,
                now,
                snapshot: AttributeSnapshot::default(),
                mana: None,
            };
            scheduler.stop(&mut ctx);
        }
    }

    fn schedulers(&self) -> MutexGuard<'_, HashMap<ActorId, ActorScheduler>> {
        self.schedulers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use behavior_scheduler::{FnBehavior, SchedulerBuilder};
    use rpg_content::ItemCatalog;
    use rpg_core::{BaseProfile, ResourceConfig, StatConfig, StatKind};

    use super::*;
    use crate::oracle::{ActorRoster, LoadoutOracle, NullDisplay};
    use crate::repository::{InMemoryProfileRepo, ProfileRepository};
    use crate::testing::RecordingHost;

    const GOLEM: ActorId = ActorId(5);

    fn services(roster: Arc<ActorRoster>) -> (StatAggregator, Arc<ResourcePool>) {
        let repo = InMemoryProfileRepo::new();
        repo.save(
            GOLEM,
            &BaseProfile::default()
                .with(StatKind::MaxHealth, 200)
                .with(StatKind::Strength, 40),
        )
        .unwrap();
        let resources = Arc::new(ResourcePool::new(
            ResourceConfig::default(),
            Arc::new(NullDisplay),
        ));
        let stats = StatAggregator::new(
            StatConfig::default(),
            BaseProfile::default(),
            Arc::new(repo),
            Arc::new(LoadoutOracle::new(ItemCatalog::new())),
            roster,
            Arc::new(RecordingHost::default()),
            Arc::new(NullDisplay),
            resources.clone(),
        );
        (stats, resources)
    }

    fn golem_scheduler() -> ActorScheduler {
        SchedulerBuilder::new()
            .behavior(FnBehavior::new("smash", 1, |ctx: &AiContext| {
                Ok(ctx.snapshot.strength() >= 40)
            }))
            .behavior(FnBehavior::new("idle", 10, |_: &AiContext| Ok(true)))
            .build()
    }

    #[test]
    fn behaviors_decide_on_derived_stats() {
        let roster = Arc::new(ActorRoster::with_actors([GOLEM]));
        let (stats, resources) = services(roster.clone());
        let ai = AiRegistry::new();
        ai.attach(GOLEM, golem_scheduler(), Tick(0));

        let summary = ai.tick(Tick(1), roster.as_ref(), &stats, &resources);
        assert_eq!(summary.ticked, 1);
        assert_eq!(ai.active_behavior(GOLEM), Some("smash"));
    }

    #[test]
    fn invalid_actor_loses_scheduler() {
        let roster = Arc::new(ActorRoster::with_actors([GOLEM]));
        let (stats, resources) = services(roster.clone());
        let ai = AiRegistry::new();
        ai.attach(GOLEM, golem_scheduler(), Tick(0));
        ai.tick(Tick(1), roster.as_ref(), &stats, &resources);

        roster.remove(GOLEM);
        let summary = ai.tick(Tick(2), roster.as_ref(), &stats, &resources);
        assert_eq!(summary.removed, vec![GOLEM]);
        assert!(!ai.is_attached(GOLEM));
    }

    #[test]
    fn detach_is_idempotent() {
        let ai = AiRegistry::new();
        ai.attach(GOLEM, golem_scheduler(), Tick(0));
        assert!(ai.detach(GOLEM, Tick(1)));
        assert!(!ai.detach(GOLEM, Tick(1)));
        assert!(ai.is_empty());
    }
}
