//! What happened during one scheduler tick.

use std::fmt;

/// Behavior lifecycle callback, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackPhase {
    ShouldRun,
    Start,
    Tick,
    End,
}

impl CallbackPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShouldRun => "should_run",
            Self::Start => "on_start",
            Self::Tick => "on_tick",
            Self::End => "on_end",
        }
    }
}

impl fmt::Display for CallbackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transitions performed by a single [`BehaviorScheduler::tick`].
///
/// [`BehaviorScheduler::tick`]: crate::BehaviorScheduler::tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Behavior that stopped this tick (lost qualification or was preempted).
    pub ended: Option<&'static str>,
    /// Behavior that became active this tick.
    pub started: Option<&'static str>,
    /// Whether the active behavior's `on_tick` ran.
    pub ticked: bool,
    /// Callbacks that failed this tick, in call order.
    pub failures: Vec<(&'static str, CallbackPhase)>,
}

impl TickReport {
    /// Returns `true` if the active behavior changed.
    #[inline]
    pub fn transitioned(&self) -> bool {
        self.ended.is_some() || self.started.is_some()
    }
}
