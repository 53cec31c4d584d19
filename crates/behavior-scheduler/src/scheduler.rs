//! Per-actor behavior selection and lifecycle.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::{AiBehavior, BehaviorError, CallbackPhase, TickReport};

/// Owns a fixed set of behaviors for one actor and drives them tick by tick.
///
/// Behaviors are kept sorted by priority (stable for equal priorities), so
/// the first behavior whose `should_run` holds is always the best candidate.
pub struct BehaviorScheduler<C> {
    behaviors: Vec<Box<dyn AiBehavior<C>>>,
    active: Option<usize>,
    active_ticks: u64,
    ticks: u64,
}

impl<C> BehaviorScheduler<C> {
    pub fn new(mut behaviors: Vec<Box<dyn AiBehavior<C>>>) -> Self {
        behaviors.sort_by_key(|behavior| behavior.priority());
        Self {
            behaviors,
            active: None,
            active_ticks: 0,
            ticks: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Name of the running behavior, if any.
    pub fn active(&self) -> Option<&'static str> {
        self.active.map(|index| self.behaviors[index].name())
    }

    /// Total scheduler ticks processed.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one scheduling step against `ctx`.
    pub fn tick(&mut self, ctx: &mut C) -> TickReport {
        self.ticks += 1;
        let mut report = TickReport::default();

        let qualifies: Vec<bool> = (0..self.behaviors.len())
            .map(|index| self.evaluate(index, ctx, &mut report))
            .collect();

        if let Some(active) = self.active
            && !qualifies[active]
        {
            self.end_active(ctx, &mut report);
        }

        let selected = qualifies.iter().position(|&q| q);

        if let (Some(active), Some(candidate)) = (self.active, selected)
            && active != candidate
            && self.may_preempt(active, candidate)
        {
            tracing::debug!(
                target: "behavior_scheduler",
                from = self.behaviors[active].name(),
                to = self.behaviors[candidate].name(),
                "preempting behavior"
            );
            self.end_active(ctx, &mut report);
        }

        if self.active.is_none()
            && let Some(candidate) = selected
        {
            self.start(candidate, ctx, &mut report);
        }

        if let Some(active) = self.active {
            let rate = u64::from(self.behaviors[active].tick_rate().max(1));
            if self.active_ticks % rate == 0 {
                let behavior = &mut self.behaviors[active];
                let name = behavior.name();
                if guarded(name, CallbackPhase::Tick, || behavior.on_tick(ctx)).is_err() {
                    report.failures.push((name, CallbackPhase::Tick));
                }
                report.ticked = true;
            }
            self.active_ticks += 1;
        }

        report
    }

    /// Ends the running behavior, e.g. when the owning actor is invalidated.
    ///
    /// Returns the name of the behavior that was stopped.
    pub fn stop(&mut self, ctx: &mut C) -> Option<&'static str> {
        let mut report = TickReport::default();
        self.end_active(ctx, &mut report);
        report.ended
    }

    fn may_preempt(&self, active: usize, candidate: usize) -> bool {
        let current = &self.behaviors[active];
        let next = &self.behaviors[candidate];
        current.interruptible() || (next.can_interrupt() && next.priority() < current.priority())
    }

    fn evaluate(&self, index: usize, ctx: &C, report: &mut TickReport) -> bool {
        let behavior = &self.behaviors[index];
        let name = behavior.name();
        match guarded(name, CallbackPhase::ShouldRun, || behavior.should_run(ctx)) {
            Ok(qualifies) => qualifies,
            Err(_) => {
                report.failures.push((name, CallbackPhase::ShouldRun));
                false
            }
        }
    }

    fn start(&mut self, index: usize, ctx: &mut C, report: &mut TickReport) {
        let behavior = &mut self.behaviors[index];
        let name = behavior.name();
        match guarded(name, CallbackPhase::Start, || behavior.on_start(ctx)) {
            Ok(()) => {
                tracing::debug!(target: "behavior_scheduler", behavior = name, "behavior started");
                self.active = Some(index);
                self.active_ticks = 0;
                report.started = Some(name);
            }
            Err(_) => report.failures.push((name, CallbackPhase::Start)),
        }
    }

    fn end_active(&mut self, ctx: &mut C, report: &mut TickReport) {
        let Some(index) = self.active.take() else {
            return;
        };
        self.active_ticks = 0;

        let behavior = &mut self.behaviors[index];
        let name = behavior.name();
        if guarded(name, CallbackPhase::End, || behavior.on_end(ctx)).is_err() {
            report.failures.push((name, CallbackPhase::End));
        }
        tracing::debug!(target: "behavior_scheduler", behavior = name, "behavior ended");
        report.ended = Some(name);
    }
}

/// Runs a behavior callback, converting panics into errors and logging any failure.
fn guarded<T>(
    behavior: &'static str,
    phase: CallbackPhase,
    call: impl FnOnce() -> Result<T, BehaviorError>,
) -> Result<T, BehaviorError> {
    let result = match catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(BehaviorError::Panicked {
            behavior,
            phase,
            message: panic_message(payload.as_ref()),
        }),
    };

    if let Err(error) = &result {
        tracing::warn!(
            target: "behavior_scheduler",
            behavior,
            phase = phase.as_str(),
            error = %error,
            "behavior callback failed"
        );
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnBehavior;

    #[derive(Default)]
    struct World {
        hungry: bool,
        threatened: bool,
        log: Vec<String>,
    }

    fn wander() -> Box<dyn AiBehavior<World>> {
        Box::new(
            FnBehavior::new("wander", 10, |_: &World| Ok(true))
                .on_tick(|w: &mut World| {
                    w.log.push("wander:tick".into());
                    Ok(())
                })
                .on_end(|w: &mut World| {
                    w.log.push("wander:end".into());
                    Ok(())
                }),
        )
    }

    fn eat(interruptible: bool) -> Box<dyn AiBehavior<World>> {
        Box::new(
            FnBehavior::new("eat", 5, |w: &World| Ok(w.hungry))
                .interruptible(interruptible)
                .on_start(|w: &mut World| {
                    w.log.push("eat:start".into());
                    Ok(())
                })
                .on_end(|w: &mut World| {
                    w.log.push("eat:end".into());
                    Ok(())
                }),
        )
    }

    fn flee(can_interrupt: bool) -> Box<dyn AiBehavior<World>> {
        Box::new(
            FnBehavior::new("flee", 1, |w: &World| Ok(w.threatened)).can_interrupt(can_interrupt),
        )
    }

    #[test]
    fn picks_highest_precedence_runnable() {
        let mut scheduler = BehaviorScheduler::new(vec![wander(), eat(true)]);
        let mut world = World {
            hungry: true,
            ..World::default()
        };

        let report = scheduler.tick(&mut world);
        assert_eq!(report.started, Some("eat"));
        assert_eq!(scheduler.active(), Some("eat"));
    }

    #[test]
    fn ends_behavior_that_stops_qualifying_immediately() {
        let mut scheduler = BehaviorScheduler::new(vec![wander(), eat(false)]);
        let mut world = World {
            hungry: true,
            ..World::default()
        };
        scheduler.tick(&mut world);

        world.hungry = false;
        let report = scheduler.tick(&mut world);
        assert_eq!(report.ended, Some("eat"));
        assert_eq!(report.started, Some("wander"));
        assert!(world.log.contains(&"eat:end".to_string()));
    }

    #[test]
    fn interruptible_active_is_preempted() {
        let mut scheduler = BehaviorScheduler::new(vec![wander(), eat(true)]);
        let mut world = World::default();
        scheduler.tick(&mut world);
        assert_eq!(scheduler.active(), Some("wander"));

        world.hungry = true;
        let report = scheduler.tick(&mut world);
        assert_eq!(report.ended, Some("wander"));
        assert_eq!(report.started, Some("eat"));
    }

    #[test]
    fn non_interruptible_active_keeps_running() {
        let mut scheduler = BehaviorScheduler::new(vec![eat(false), flee(false)]);
        let mut world = World {
            hungry: true,
            ..World::default()
        };
        scheduler.tick(&mut world);

        world.threatened = true;
        let report = scheduler.tick(&mut world);
        assert!(!report.transitioned());
        assert_eq!(scheduler.active(), Some("eat"));
    }

    #[test]
    fn can_interrupt_overrides_non_interruptible_of_lower_precedence() {
        let mut scheduler = BehaviorScheduler::new(vec![eat(false), flee(true)]);
        let mut world = World {
            hungry: true,
            ..World::default()
        };
        scheduler.tick(&mut world);

        world.threatened = true;
        let report = scheduler.tick(&mut world);
        assert_eq!(report.ended, Some("eat"));
        assert_eq!(report.started, Some("flee"));
    }

    #[test]
    fn tick_rate_divides_on_tick_but_not_should_run() {
        let slow = FnBehavior::new("slow", 0, |_: &World| Ok(true))
            .tick_rate(3)
            .on_tick(|w: &mut World| {
                w.log.push("slow".into());
                Ok(())
            });
        let mut scheduler = BehaviorScheduler::new(vec![Box::new(slow)]);
        let mut world = World::default();

        let ticked: Vec<bool> = (0..7).map(|_| scheduler.tick(&mut world).ticked).collect();
        assert_eq!(ticked, [true, false, false, true, false, false, true]);
        assert_eq!(world.log.len(), 3);
    }

    #[test]
    fn panicking_should_run_is_contained() {
        let broken = FnBehavior::new("broken", 0, |_: &World| -> Result<bool, BehaviorError> {
            panic!("boom")
        });
        let mut scheduler = BehaviorScheduler::new(vec![Box::new(broken), wander()]);
        let mut world = World::default();

        let report = scheduler.tick(&mut world);
        assert_eq!(report.failures, vec![("broken", CallbackPhase::ShouldRun)]);
        assert_eq!(scheduler.active(), Some("wander"));
    }

    #[test]
    fn failed_start_leaves_scheduler_idle() {
        let refuses = FnBehavior::new("refuses", 0, |_: &World| Ok(true))
            .on_start(|_: &mut World| Err(BehaviorError::TargetLost("block".into())));
        let mut scheduler = BehaviorScheduler::new(vec![Box::new(refuses)]);
        let mut world = World::default();

        let report = scheduler.tick(&mut world);
        assert_eq!(report.started, None);
        assert!(!report.ticked);
        assert_eq!(scheduler.active(), None);
    }

    #[test]
    fn failing_on_tick_keeps_behavior_active() {
        let flaky = FnBehavior::new("flaky", 0, |_: &World| Ok(true))
            .on_tick(|_: &mut World| Err(BehaviorError::failed("no path")));
        let mut scheduler = BehaviorScheduler::new(vec![Box::new(flaky)]);
        let mut world = World::default();

        let report = scheduler.tick(&mut world);
        assert_eq!(report.failures, vec![("flaky", CallbackPhase::Tick)]);
        assert_eq!(scheduler.active(), Some("flaky"));
    }

    #[test]
    fn stop_ends_active_behavior() {
        let mut scheduler = BehaviorScheduler::new(vec![wander()]);
        let mut world = World::default();
        scheduler.tick(&mut world);

        assert_eq!(scheduler.stop(&mut world), Some("wander"));
        assert_eq!(scheduler.active(), None);
        assert_eq!(scheduler.stop(&mut world), None);
    }
}
