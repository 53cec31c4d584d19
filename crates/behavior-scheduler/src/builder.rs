//! Builder helpers for assembling schedulers.
//!
//! [`FnBehavior`] turns closures into a behavior so simple actors don't need
//! a dedicated type per behavior:
//!
//! ```ignore
//! let scheduler = SchedulerBuilder::new()
//!     .behavior(FnBehavior::new("flee", 1, |npc: &Npc| Ok(npc.health_low())).can_interrupt(true))
//!     .behavior(FnBehavior::new("wander", 10, |_: &Npc| Ok(true)).on_tick(Npc::step_randomly))
//!     .build();
//! ```

use crate::{AiBehavior, BehaviorError, BehaviorScheduler};

type Predicate<C> = Box<dyn Fn(&C) -> Result<bool, BehaviorError> + Send + Sync>;
type Callback<C> = Box<dyn FnMut(&mut C) -> Result<(), BehaviorError> + Send + Sync>;

/// Closure-backed behavior.
pub struct FnBehavior<C> {
    name: &'static str,
    priority: i32,
    interruptible: bool,
    can_interrupt: bool,
    tick_rate: u32,
    should_run: Predicate<C>,
    on_start: Option<Callback<C>>,
    on_tick: Option<Callback<C>>,
    on_end: Option<Callback<C>>,
}

impl<C> FnBehavior<C> {
    pub fn new(
        name: &'static str,
        priority: i32,
        should_run: impl Fn(&C) -> Result<bool, BehaviorError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            priority,
            interruptible: true,
            can_interrupt: false,
            tick_rate: 1,
            should_run: Box::new(should_run),
            on_start: None,
            on_tick: None,
            on_end: None,
        }
    }

    pub fn interruptible(mut self, interruptible: bool) -> Self {
        self.interruptible = interruptible;
        self
    }

    pub fn can_interrupt(mut self, can_interrupt: bool) -> Self {
        self.can_interrupt = can_interrupt;
        self
    }

    pub fn tick_rate(mut self, tick_rate: u32) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn on_start(
        mut self,
        callback: impl FnMut(&mut C) -> Result<(), BehaviorError> + Send + Sync + 'static,
    ) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn on_tick(
        mut self,
        callback: impl FnMut(&mut C) -> Result<(), BehaviorError> + Send + Sync + 'static,
    ) -> Self {
        self.on_tick = Some(Box::new(callback));
        self
    }

    pub fn on_end(
        mut self,
        callback: impl FnMut(&mut C) -> Result<(), BehaviorError> + Send + Sync + 'static,
    ) -> Self {
        self.on_end = Some(Box::new(callback));
        self
    }
}

fn run<C>(callback: &mut Option<Callback<C>>, ctx: &mut C) -> Result<(), BehaviorError> {
    match callback {
        Some(callback) => callback(ctx),
        None => Ok(()),
    }
}

impl<C> AiBehavior<C> for FnBehavior<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn interruptible(&self) -> bool {
        self.interruptible
    }

    fn can_interrupt(&self) -> bool {
        self.can_interrupt
    }

    fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    fn should_run(&self, ctx: &C) -> Result<bool, BehaviorError> {
        (self.should_run)(ctx)
    }

    fn on_start(&mut self, ctx: &mut C) -> Result<(), BehaviorError> {
        run(&mut self.on_start, ctx)
    }

    fn on_tick(&mut self, ctx: &mut C) -> Result<(), BehaviorError> {
        run(&mut self.on_tick, ctx)
    }

    fn on_end(&mut self, ctx: &mut C) -> Result<(), BehaviorError> {
        run(&mut self.on_end, ctx)
    }
}

/// Collects behaviors for one actor.
pub struct SchedulerBuilder<C> {
    behaviors: Vec<Box<dyn AiBehavior<C>>>,
}

impl<C> Default for SchedulerBuilder<C> {
    fn default() -> Self {
        Self {
            behaviors: Vec::new(),
        }
    }
}

impl<C> SchedulerBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn behavior(mut self, behavior: impl AiBehavior<C> + 'static) -> Self {
        self.behaviors.push(Box::new(behavior));
        self
    }

    pub fn boxed(mut self, behavior: Box<dyn AiBehavior<C>>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn build(self) -> BehaviorScheduler<C> {
        BehaviorScheduler::new(self.behaviors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sorts_by_priority() {
        let mut scheduler = SchedulerBuilder::<u32>::new()
            .behavior(FnBehavior::new("idle", 100, |_: &u32| Ok(true)))
            .behavior(FnBehavior::new("attack", 2, |target: &u32| Ok(*target > 0)))
            .build();
        assert_eq!(scheduler.len(), 2);

        let mut target = 1;
        scheduler.tick(&mut target);
        assert_eq!(scheduler.active(), Some("attack"));
    }

    #[test]
    fn fn_behavior_defaults() {
        let behavior = FnBehavior::new("noop", 3, |_: &()| Ok(false));
        assert!(AiBehavior::interruptible(&behavior));
        assert!(!AiBehavior::can_interrupt(&behavior));
        assert_eq!(AiBehavior::tick_rate(&behavior), 1);
    }

    #[test]
    fn missing_callbacks_succeed() {
        let mut behavior = FnBehavior::new("noop", 3, |_: &()| Ok(true));
        assert_eq!(AiBehavior::on_tick(&mut behavior, &mut ()), Ok(()));
        assert_eq!(AiBehavior::on_end(&mut behavior, &mut ()), Ok(()));
    }
}
