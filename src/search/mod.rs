//! Asynchronous path searches.
//!
//! A [`Searcher`] runs off-thread on the [`SearchPool`], can be cancelled
//! between iterations, and exposes its best partial path while running. The
//! [`SearchProvider`] seam lets integrations (and tests) substitute their own
//! search implementation for the default voxel A*.

mod astar;
mod worker;

pub use astar::{AStarProvider, AStarSearch};
pub use worker::SearchPool;

use std::sync::Arc;

use crate::types::{BlockPos, Goal, Path};
use crate::world::{PlayerContext, WorldView};

/// Snapshot of the world handed to a search.
#[derive(Clone)]
pub struct CalcContext {
    pub world: Arc<dyn WorldView>,
    /// Only contexts with this flag may be handed to a background search.
    pub safe_for_threaded_use: bool,
}

impl CalcContext {
    /// Build a context suitable for threaded use from the player context.
    pub fn threaded(ctx: &dyn PlayerContext) -> Self {
        Self {
            world: ctx.world(),
            safe_for_threaded_use: true,
        }
    }
}

impl std::fmt::Debug for CalcContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalcContext")
            .field("safe_for_threaded_use", &self.safe_for_threaded_use)
            .finish()
    }
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// Found a path all the way into the goal.
    SuccessToGoal,
    /// Soft deadline expired; returning the best segment so far.
    SuccessSegment,
    /// No path, or the hard deadline expired.
    Failure,
    /// Cancelled by the owner.
    Cancellation,
    /// The search itself misbehaved.
    Exception,
}

/// Outcome of a completed search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub path: Option<Path>,
}

impl SearchResult {
    pub fn new(status: SearchStatus, path: Option<Path>) -> Self {
        Self { status, path }
    }
}

/// An in-flight (or about-to-run) path search.
pub trait Searcher: Send + Sync {
    /// The block the search starts from.
    fn start(&self) -> BlockPos;

    fn goal(&self) -> &Goal;

    /// Best partial path discovered so far, if any.
    fn best_so_far(&self) -> Option<Path>;

    /// Run the search to completion. `primary_ms` is the soft deadline
    /// (return best-so-far), `failure_ms` the hard one (give up).
    fn calculate(&self, primary_ms: u64, failure_ms: u64) -> SearchResult;

    /// Request cancellation. Idempotent; observed between search iterations.
    fn cancel(&self);
}

/// Factory seam for searches.
pub trait SearchProvider: Send + Sync {
    fn create(
        &self,
        start: BlockPos,
        goal: Goal,
        previous: Option<&Path>,
        context: &CalcContext,
    ) -> Arc<dyn Searcher>;
}

/// Simplify a render goal to an XZ goal when the chunk it renders in is not
/// loaded, so an unknown Y coordinate cannot poison the search.
pub fn simplify_goal_for_unloaded(goal: &Goal, world: &dyn WorldView) -> Goal {
    if let Some(pos) = goal.render_pos() {
        if !world.is_chunk_loaded(pos.x, pos.z) {
            return Goal::Xz { x: pos.x, z: pos.z };
        }
    }
    goal.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HalfLoadedWorld;

    impl WorldView for HalfLoadedWorld {
        fn can_walk_on(&self, _pos: BlockPos) -> bool {
            true
        }
        fn can_walk_through(&self, _pos: BlockPos) -> bool {
            true
        }
        fn is_chunk_loaded(&self, x: i32, _z: i32) -> bool {
            x < 100
        }
    }

    #[test]
    fn test_simplify_unloaded_render_goal() {
        let world = HalfLoadedWorld;
        let far = Goal::Block(BlockPos::new(500, 64, 9));
        assert_eq!(
            simplify_goal_for_unloaded(&far, &world),
            Goal::Xz { x: 500, z: 9 }
        );

        let near = Goal::Block(BlockPos::new(50, 64, 9));
        assert_eq!(simplify_goal_for_unloaded(&near, &world), near);

        // XZ goals have no render position and pass through untouched
        let xz = Goal::Xz { x: 500, z: 9 };
        assert_eq!(simplify_goal_for_unloaded(&xz, &world), xz);
    }
}
