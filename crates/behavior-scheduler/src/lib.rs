//! Priority-based behavior scheduler for tick-driven non-player actors.
//!
//! Each actor owns one [`BehaviorScheduler`] holding a fixed set of
//! behaviors. Every tick the scheduler picks the highest-precedence behavior
//! that wants to run and decides whether it may take over from the one
//! currently running.
//!
//! - **Priority**: lower number = higher precedence
//! - **Interruptibility**: a running behavior may refuse to be preempted
//! - **Tick rate**: the active behavior's `on_tick` runs every N ticks, while
//!   `should_run` is evaluated every tick
//! - **Isolation**: an error or panic in one callback is logged and contained
//!
//! # Architecture
//!
//! - [`AiBehavior`]: core trait for all behaviors
//! - [`BehaviorScheduler`]: per-actor selection and lifecycle
//! - [`SchedulerBuilder`] / [`FnBehavior`]: ergonomic construction

pub mod behavior;
pub mod builder;
pub mod error;
pub mod scheduler;
pub mod status;

pub use behavior::AiBehavior;
pub use builder::{FnBehavior, SchedulerBuilder};
pub use error::BehaviorError;
pub use scheduler::BehaviorScheduler;
pub use status::{CallbackPhase, TickReport};
