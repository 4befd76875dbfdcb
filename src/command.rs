//! Process-to-core directives and the process contract.
//!
//! Every registered subsystem ("process") competes for control of pathing by
//! returning a [`PathingCommand`] from its per-tick callback. The arbiter
//! selects the winner and translates its command into core operations.

use crate::search::CalcContext;
use crate::types::Goal;

/// What a winning command asks the core to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathingCommandKind {
    /// Set the goal and start pathing toward it if idle.
    SetGoalAndPath,
    /// `SetGoalAndPath`, then request a pause.
    SetGoalAndPause,
    /// Request a pause; honored once the current segment is safe to cancel.
    RequestPause,
    /// Set the goal and cancel the current segment if safe.
    CancelAndSetGoal,
    /// Set goal and path; post-tick, soft-cancel if the current destination
    /// no longer satisfies the new goal (gated by a setting).
    RevalidateGoalAndPath,
    /// As above, but the soft-cancel is unconditional on mismatch.
    ForceRevalidateGoalAndPath,
    /// Yield to the next active process this tick.
    Defer,
}

/// A directive issued by a process. May carry a custom calculation context
/// for searches launched on its behalf.
#[derive(Clone)]
pub struct PathingCommand {
    pub kind: PathingCommandKind,
    pub goal: Option<Goal>,
    pub context: Option<CalcContext>,
}

impl PathingCommand {
    pub fn new(kind: PathingCommandKind, goal: Option<Goal>) -> Self {
        Self {
            kind,
            goal,
            context: None,
        }
    }

    pub fn defer() -> Self {
        Self::new(PathingCommandKind::Defer, None)
    }

    pub fn with_context(mut self, context: CalcContext) -> Self {
        self.context = Some(context);
        self
    }
}

impl std::fmt::Debug for PathingCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathingCommand")
            .field("kind", &self.kind)
            .field("goal", &self.goal)
            .field("context", &self.context.as_ref().map(|_| "..."))
            .finish()
    }
}

/// Stable handle to a registered process.
pub type ProcessId = usize;

/// A subsystem competing for control of the pathing core.
///
/// Contract: a process that reports `is_active()` must return a command from
/// `on_tick` (possibly `Defer`); returning `None` while active is a
/// programmer error and aborts the tick.
pub trait Process: Send {
    /// Whether this process currently wants to be consulted.
    fn is_active(&self) -> bool;

    /// Temporary processes may yield control without invalidating the
    /// current path (transient overrides).
    fn is_temporary(&self) -> bool {
        false
    }

    /// Higher priority processes are consulted first.
    fn priority(&self) -> f64;

    /// Called once per tick while active. `calc_failed_last_tick` is only
    /// true when this process was in control last tick and that tick's
    /// search failed.
    fn on_tick(
        &mut self,
        calc_failed_last_tick: bool,
        safe_to_cancel: bool,
    ) -> Option<PathingCommand>;

    /// Relinquish any claim on control and reset internal state.
    fn release(&mut self);

    fn display_name(&self) -> &str;
}
