//! Behavior set for the simulated ogre.

use std::sync::Arc;

use behavior_scheduler::{FnBehavior, SchedulerBuilder};
use rpg_runtime::{ActorScheduler, AiContext};

use crate::host::{Intent, SimHost};

/// Health fraction below which the ogre runs.
const FLEE_BELOW: f64 = 0.25;
/// Ticks between two club swings.
const SWING_RATE: u32 = 10;

pub fn ogre_scheduler(host: Arc<SimHost>) -> ActorScheduler {
    let flee_host = host.clone();
    let strike_host = host;

    SchedulerBuilder::new()
        .behavior(
            FnBehavior::new("flee", 0, move |ctx: &AiContext| {
                Ok(flee_host
                    .health(ctx.actor)
                    .is_some_and(|bar| bar.fraction() < FLEE_BELOW))
            })
            .can_interrupt(true)
            .interruptible(false)
            .on_start(|ctx: &mut AiContext| {
                tracing::info!(target: "host_sim::npc", actor = %ctx.actor, "ogre flees");
                Ok(())
            }),
        )
        .behavior(
            FnBehavior::new("pummel", 5, |ctx: &AiContext| Ok(ctx.snapshot.strength() > 0))
                .tick_rate(SWING_RATE)
                .on_tick(move |ctx: &mut AiContext| {
                    strike_host.push_intent(Intent::Strike {
                        attacker: ctx.actor,
                        raw_damage: 4.0,
                    });
                    Ok(())
                }),
        )
        .behavior(FnBehavior::new("idle", 100, |_: &AiContext| Ok(true)))
        .build()
}
