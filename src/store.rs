//! Path state under two-lock discipline.
//!
//! Two locks guard disjoint field groups and are **always acquired in this
//! order** to prevent deadlock:
//!
//! 1. `path` — current/next executors, expected start, goal, ETA baseline.
//! 2. `calc` — the at-most-one in-flight background search.
//!
//! The search completion handler commits its result and clears the active
//! search under both locks, so observers never see a committed path with its
//! producing search still registered.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::exec::PathExecutor;
use crate::search::Searcher;
use crate::types::{BlockPos, Goal};

/// An in-flight background search and the start block it was launched from.
pub struct ActiveSearch {
    pub searcher: Arc<dyn Searcher>,
    pub start: BlockPos,
}

/// Baseline for goal-ETA estimation: where pathing began and how many ticks
/// have elapsed since.
#[derive(Default)]
pub struct EtaBaseline {
    pub origin: Option<BlockPos>,
    pub elapsed_ticks: u32,
}

/// Everything guarded by the path lock.
#[derive(Default)]
pub struct PathState {
    pub current: Option<PathExecutor>,
    pub next: Option<PathExecutor>,
    pub expected_start: Option<BlockPos>,
    pub goal: Option<Goal>,
    pub eta: EtaBaseline,
}

/// Lightweight copy of the path state for rendering and introspection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathSnapshot {
    /// `(src, dest)` of the current segment.
    pub current: Option<(BlockPos, BlockPos)>,
    /// `(src, dest)` of the planned next segment.
    pub next: Option<(BlockPos, BlockPos)>,
    pub goal: Option<Goal>,
    pub expected_start: Option<BlockPos>,
}

/// Owner of all path lifecycle state.
pub struct PathStore {
    path: Mutex<PathState>,
    calc: Mutex<Option<ActiveSearch>>,
}

impl PathStore {
    pub fn new() -> Self {
        Self {
            path: Mutex::new(PathState::default()),
            calc: Mutex::new(None),
        }
    }

    /// Acquire the path lock. Must be taken before `calc()` when both are
    /// needed.
    pub fn path(&self) -> MutexGuard<'_, PathState> {
        self.path.lock()
    }

    /// Acquire the calc lock. Never call `path()` while holding this.
    pub fn calc(&self) -> MutexGuard<'_, Option<ActiveSearch>> {
        self.calc.lock()
    }

    /// The agent paused and may resume somewhere else entirely: drop both
    /// segments, cancel any in-flight search, and re-anchor the expected
    /// start at the agent's position.
    pub fn handle_pause_resume(&self, new_position: BlockPos) {
        let mut path = self.path();
        path.current = None;
        path.next = None;
        path.expected_start = Some(new_position);

        let mut calc = self.calc();
        if let Some(active) = calc.take() {
            active.searcher.cancel();
        }
    }

    // Brief accessors; each takes one lock for the duration of the call.

    pub fn has_current(&self) -> bool {
        self.path().current.is_some()
    }

    pub fn has_active_search(&self) -> bool {
        self.calc().is_some()
    }

    pub fn goal(&self) -> Option<Goal> {
        self.path().goal.clone()
    }

    pub fn set_goal(&self, goal: Option<Goal>) {
        self.path().goal = goal;
    }

    pub fn set_expected_start(&self, start: BlockPos) {
        self.path().expected_start = Some(start);
    }

    /// Destination and goal of the current path, if one exists.
    pub fn current_dest_and_goal(&self) -> Option<(BlockPos, Goal)> {
        let path = self.path();
        path.current
            .as_ref()
            .map(|c| (c.path().dest(), c.path().goal().clone()))
    }

    pub fn snapshot(&self) -> PathSnapshot {
        let path = self.path();
        PathSnapshot {
            current: path
                .current
                .as_ref()
                .map(|c| (c.path().src(), c.path().dest())),
            next: path.next.as_ref().map(|n| (n.path().src(), n.path().dest())),
            goal: path.goal.clone(),
            expected_start: path.expected_start,
        }
    }
}

impl Default for PathStore {
    fn default() -> Self {
        Self::new()
    }
}
