//! Voxel A* search.
//!
//! Searches over standable block positions with walk, single-block ascend,
//! and single-block descend moves. Costs are in estimated game ticks and
//! shared with the goal heuristics. The search is cancellable between
//! iterations and keeps a best-so-far segment that the soft deadline can
//! return when the goal is out of reach in time.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::types::{BlockPos, Goal, Path, COST_ASCEND, COST_DESCEND, COST_WALK};

use super::{CalcContext, SearchProvider, SearchResult, SearchStatus, Searcher};

/// Cost multiplier for moves landing on the previous path. Keeps replans
/// close to the route already being executed.
const FAVORED_COST_FACTOR: f64 = 0.95;

/// Iterations between deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 64;

/// Minimum heuristic improvement before the shared best-so-far is rebuilt.
const BEST_UPDATE_THRESHOLD: f64 = COST_WALK;

/// Default [`SearchProvider`] producing [`AStarSearch`] instances.
pub struct AStarProvider;

impl SearchProvider for AStarProvider {
    fn create(
        &self,
        start: BlockPos,
        goal: Goal,
        previous: Option<&Path>,
        context: &CalcContext,
    ) -> Arc<dyn Searcher> {
        Arc::new(AStarSearch::new(start, goal, previous, context.clone()))
    }
}

/// A single cancellable A* search instance.
pub struct AStarSearch {
    start: BlockPos,
    goal: Goal,
    context: CalcContext,
    /// Positions of the previous path, favored during expansion.
    favored: HashSet<BlockPos>,
    cancelled: AtomicBool,
    best: Mutex<Option<Path>>,
}

impl AStarSearch {
    pub fn new(
        start: BlockPos,
        goal: Goal,
        previous: Option<&Path>,
        context: CalcContext,
    ) -> Self {
        let favored = previous
            .map(|p| p.positions().iter().copied().collect())
            .unwrap_or_default();
        Self {
            start,
            goal,
            context,
            favored,
            cancelled: AtomicBool::new(false),
            best: Mutex::new(None),
        }
    }

    fn can_stand(&self, pos: BlockPos) -> bool {
        let world = &self.context.world;
        world.can_walk_on(pos.below())
            && world.can_walk_through(pos)
            && world.can_walk_through(pos.above())
    }

    fn move_cost(&self, dest: BlockPos, base: f64) -> f64 {
        if self.favored.contains(&dest) {
            base * FAVORED_COST_FACTOR
        } else {
            base
        }
    }

    /// Standable neighbors of `pos` with their movement costs.
    fn neighbors(&self, pos: BlockPos, out: &mut Vec<(BlockPos, f64)>) {
        out.clear();
        let world = &self.context.world;
        for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let level = pos.offset(dx, 0, dz);
            if self.can_stand(level) {
                out.push((level, self.move_cost(level, COST_WALK)));
            }

            // Jump up one block; needs headroom above the current position
            let up = pos.offset(dx, 1, dz);
            if world.can_walk_through(pos.above().above()) && self.can_stand(up) {
                out.push((up, self.move_cost(up, COST_ASCEND)));
            }

            // Step down one block; the body crosses the edge at walking level
            let down = pos.offset(dx, -1, dz);
            if world.can_walk_through(down.above().above()) && self.can_stand(down) {
                out.push((down, self.move_cost(down, COST_DESCEND)));
            }
        }
    }

    fn reconstruct(
        &self,
        came_from: &HashMap<BlockPos, BlockPos>,
        end: BlockPos,
        nodes_considered: u64,
    ) -> Path {
        let mut positions = vec![end];
        let mut current = end;
        while let Some(&prev) = came_from.get(&current) {
            positions.push(prev);
            current = prev;
        }
        positions.reverse();
        Path::new(positions, self.goal.clone(), nodes_considered)
    }
}

impl Searcher for AStarSearch {
    fn start(&self) -> BlockPos {
        self.start
    }

    fn goal(&self) -> &Goal {
        &self.goal
    }

    fn best_so_far(&self) -> Option<Path> {
        self.best.lock().clone()
    }

    fn calculate(&self, primary_ms: u64, failure_ms: u64) -> SearchResult {
        let begun = Instant::now();
        let primary_deadline = begun + Duration::from_millis(primary_ms);
        let failure_deadline = begun + Duration::from_millis(failure_ms);

        let mut open: BinaryHeap<OpenNode> = BinaryHeap::new();
        let mut came_from: HashMap<BlockPos, BlockPos> = HashMap::new();
        let mut g_score: HashMap<BlockPos, f64> = HashMap::new();

        g_score.insert(self.start, 0.0);
        open.push(OpenNode {
            pos: self.start,
            f_score: self.goal.heuristic(self.start),
        });

        let start_h = self.goal.heuristic(self.start);
        let mut best_pos = self.start;
        let mut best_h = start_h;
        let mut published_best_h = start_h;

        let mut nodes_considered: u64 = 0;
        let mut scratch = Vec::with_capacity(12);

        while let Some(current) = open.pop() {
            if self.cancelled.load(AtomicOrdering::Relaxed) {
                return SearchResult::new(SearchStatus::Cancellation, None);
            }

            nodes_considered += 1;
            if nodes_considered % DEADLINE_CHECK_INTERVAL == 0 {
                let now = Instant::now();
                if now >= failure_deadline {
                    return SearchResult::new(SearchStatus::Failure, None);
                }
                if now >= primary_deadline && best_pos != self.start {
                    let path = self.reconstruct(&came_from, best_pos, nodes_considered);
                    return SearchResult::new(SearchStatus::SuccessSegment, Some(path));
                }
            }

            if self.goal.is_in_goal(current.pos) {
                let path = self.reconstruct(&came_from, current.pos, nodes_considered);
                return SearchResult::new(SearchStatus::SuccessToGoal, Some(path));
            }

            let h = self.goal.heuristic(current.pos);
            if h < best_h {
                best_h = h;
                best_pos = current.pos;
                if published_best_h - best_h >= BEST_UPDATE_THRESHOLD {
                    published_best_h = best_h;
                    let path = self.reconstruct(&came_from, best_pos, nodes_considered);
                    *self.best.lock() = Some(path);
                }
            }

            let current_g = g_score.get(&current.pos).copied().unwrap_or(f64::INFINITY);

            self.neighbors(current.pos, &mut scratch);
            for &(neighbor, cost) in scratch.iter() {
                let tentative = current_g + cost;
                if tentative < g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                    came_from.insert(neighbor, current.pos);
                    g_score.insert(neighbor, tentative);
                    open.push(OpenNode {
                        pos: neighbor,
                        f_score: tentative + self.goal.heuristic(neighbor),
                    });
                }
            }
        }

        SearchResult::new(SearchStatus::Failure, None)
    }

    fn cancel(&self) {
        self.cancelled.store(true, AtomicOrdering::Relaxed);
    }
}

/// Entry in the A* open set.
#[derive(Clone, Copy)]
struct OpenNode {
    pos: BlockPos,
    f_score: f64,
}

impl Eq for OpenNode {}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower f_score = higher priority)
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldView;

    /// Flat ground at y = 63; everything above is air, with optional walls.
    struct TestWorld {
        walls: HashSet<BlockPos>,
    }

    impl TestWorld {
        fn flat() -> Self {
            Self {
                walls: HashSet::new(),
            }
        }

        fn with_walls(walls: impl IntoIterator<Item = BlockPos>) -> Self {
            Self {
                walls: walls.into_iter().collect(),
            }
        }
    }

    impl WorldView for TestWorld {
        fn can_walk_on(&self, pos: BlockPos) -> bool {
            pos.y <= 63 || self.walls.contains(&pos)
        }
        fn can_walk_through(&self, pos: BlockPos) -> bool {
            pos.y >= 64 && !self.walls.contains(&pos)
        }
        fn is_chunk_loaded(&self, _x: i32, _z: i32) -> bool {
            true
        }
    }

    fn context(world: TestWorld) -> CalcContext {
        CalcContext {
            world: Arc::new(world),
            safe_for_threaded_use: true,
        }
    }

    #[test]
    fn test_straight_path_on_flat_ground() {
        let goal = Goal::Block(BlockPos::new(5, 64, 0));
        let search = AStarSearch::new(
            BlockPos::new(0, 64, 0),
            goal,
            None,
            context(TestWorld::flat()),
        );

        let result = search.calculate(500, 2000);
        assert_eq!(result.status, SearchStatus::SuccessToGoal);
        let path = result.path.unwrap();
        assert_eq!(path.src(), BlockPos::new(0, 64, 0));
        assert_eq!(path.dest(), BlockPos::new(5, 64, 0));
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_detour_around_wall() {
        // Wall across x = 2 for z in [-3, 3], two blocks tall
        let mut walls = Vec::new();
        for z in -3..=3 {
            for y in 64..=65 {
                walls.push(BlockPos::new(2, y, z));
            }
        }
        let goal = Goal::Block(BlockPos::new(5, 64, 0));
        let search = AStarSearch::new(
            BlockPos::new(0, 64, 0),
            goal,
            None,
            context(TestWorld::with_walls(walls)),
        );

        let result = search.calculate(500, 2000);
        assert_eq!(result.status, SearchStatus::SuccessToGoal);
        let path = result.path.unwrap();
        assert!(path.len() > 6, "detour should be longer than a straight run");
        for pos in path.positions() {
            assert!(!(pos.x == 2 && (-3..=3).contains(&pos.z)), "path crosses the wall");
        }
    }

    #[test]
    fn test_climb_one_block() {
        // A step up: solid block at (2, 64, 0) with ground behind it raised
        let walls = vec![BlockPos::new(2, 64, 0)];
        let goal = Goal::Block(BlockPos::new(2, 65, 0));
        let search = AStarSearch::new(
            BlockPos::new(0, 64, 0),
            goal,
            None,
            context(TestWorld::with_walls(walls)),
        );

        let result = search.calculate(500, 2000);
        assert_eq!(result.status, SearchStatus::SuccessToGoal);
        assert_eq!(result.path.unwrap().dest(), BlockPos::new(2, 65, 0));
    }

    #[test]
    fn test_cancellation() {
        let search = AStarSearch::new(
            BlockPos::new(0, 64, 0),
            Goal::Block(BlockPos::new(1000, 64, 0)),
            None,
            context(TestWorld::flat()),
        );
        search.cancel();
        let result = search.calculate(500, 2000);
        assert_eq!(result.status, SearchStatus::Cancellation);
        assert!(result.path.is_none());
    }

    #[test]
    fn test_boxed_in_start_fails() {
        // Surround the start with two-block-tall walls
        let mut walls = Vec::new();
        for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            for y in 64..=66 {
                walls.push(BlockPos::new(dx, y, dz));
            }
        }
        let search = AStarSearch::new(
            BlockPos::new(0, 64, 0),
            Goal::Block(BlockPos::new(5, 64, 0)),
            None,
            context(TestWorld::with_walls(walls)),
        );

        let result = search.calculate(500, 2000);
        assert_eq!(result.status, SearchStatus::Failure);
        assert!(result.path.is_none());
    }

    #[test]
    fn test_primary_deadline_returns_segment() {
        // Goal far enough that the zero-millisecond soft deadline fires first
        let search = AStarSearch::new(
            BlockPos::new(0, 64, 0),
            Goal::Block(BlockPos::new(100_000, 64, 0)),
            None,
            context(TestWorld::flat()),
        );

        let result = search.calculate(0, 60_000);
        assert_eq!(result.status, SearchStatus::SuccessSegment);
        let path = result.path.unwrap();
        assert_eq!(path.src(), BlockPos::new(0, 64, 0));
        assert!(path.dest().x > 0, "segment should make progress toward the goal");
    }
}
