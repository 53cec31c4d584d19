//! Core behavior trait.
//!
//! This module defines the [`AiBehavior`] trait, the abstraction every
//! scheduled behavior implements. The trait is generic over a context type
//! `C`, giving behaviors access to the actor's stats and world view.

use crate::BehaviorError;

/// A behavior that can be selected, started, ticked and ended.
///
/// Behaviors are stateful (`&mut self` on lifecycle callbacks) so a long
/// running task such as mining a block can keep its progress between ticks.
pub trait AiBehavior<C>: Send + Sync {
    /// Human-readable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Lower values take precedence.
    fn priority(&self) -> i32;

    /// Whether any other behavior may take over while this one runs.
    fn interruptible(&self) -> bool {
        true
    }

    /// Whether this behavior may preempt a non-interruptible one of lower
    /// precedence.
    fn can_interrupt(&self) -> bool {
        false
    }

    /// Run `on_tick` once every `tick_rate` scheduler ticks. 0 is treated as 1.
    fn tick_rate(&self) -> u32 {
        1
    }

    /// Evaluated every scheduler tick, for idle and active behaviors alike.
    fn should_run(&self, ctx: &C) -> Result<bool, BehaviorError>;

    fn on_start(&mut self, _ctx: &mut C) -> Result<(), BehaviorError> {
        Ok(())
    }

    fn on_tick(&mut self, ctx: &mut C) -> Result<(), BehaviorError>;

    fn on_end(&mut self, _ctx: &mut C) -> Result<(), BehaviorError> {
        Ok(())
    }
}

/// Blanket implementation for boxed behaviors.
impl<C> AiBehavior<C> for Box<dyn AiBehavior<C>> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn priority(&self) -> i32 {
        (**self).priority()
    }

    fn interruptible(&self) -> bool {
        (**self).interruptible()
    }

    fn can_interrupt(&self) -> bool {
        (**self).can_interrupt()
    }

    fn tick_rate(&self) -> u32 {
        (**self).tick_rate()
    }

    fn should_run(&self, ctx: &C) -> Result<bool, BehaviorError> {
        (**self).should_run(ctx)
    }

    fn on_start(&mut self, ctx: &mut C) -> Result<(), BehaviorError> {
        (**self).on_start(ctx)
    }

    fn on_tick(&mut self, ctx: &mut C) -> Result<(), BehaviorError> {
        (**self).on_tick(ctx)
    }

    fn on_end(&mut self, ctx: &mut C) -> Result<(), BehaviorError> {
        (**self).on_end(ctx)
    }
}
