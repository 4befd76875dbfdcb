//! Goals: position predicates with travel-time heuristics.
//!
//! A goal identifies the set of blocks a path may legally end at, plus a
//! heuristic estimating the remaining travel cost in game ticks. The
//! heuristic shares its per-block cost constants with the A* searcher so
//! estimates stay comparable across components.

use super::pos::BlockPos;

/// Ticks to walk across one block at normal speed.
pub const COST_WALK: f64 = 4.633;
/// Ticks to jump up one block.
pub const COST_ASCEND: f64 = 6.6;
/// Ticks to step or fall down one block.
pub const COST_DESCEND: f64 = 5.1;

/// A navigation goal: a predicate over block positions plus a heuristic.
#[derive(Clone, Debug, PartialEq)]
pub enum Goal {
    /// Exactly one block.
    Block(BlockPos),
    /// Any block in an XZ column, at any height. Render goals are simplified
    /// to this when their chunk is unloaded.
    Xz { x: i32, z: i32 },
    /// Any block within `radius` blocks of a center.
    Near { center: BlockPos, radius: i32 },
}

impl Goal {
    pub fn is_in_goal(&self, pos: BlockPos) -> bool {
        match *self {
            Goal::Block(target) => pos == target,
            Goal::Xz { x, z } => pos.x == x && pos.z == z,
            Goal::Near { center, radius } => {
                let dx = (pos.x - center.x) as i64;
                let dy = (pos.y - center.y) as i64;
                let dz = (pos.z - center.z) as i64;
                dx * dx + dy * dy + dz * dz <= (radius as i64) * (radius as i64)
            }
        }
    }

    /// Estimated ticks of travel from `pos` to the goal.
    pub fn heuristic(&self, pos: BlockPos) -> f64 {
        match *self {
            Goal::Block(target) => travel_cost(
                (target.x - pos.x) as f64,
                (target.y - pos.y) as f64,
                (target.z - pos.z) as f64,
            ),
            Goal::Xz { x, z } => {
                travel_cost((x - pos.x) as f64, 0.0, (z - pos.z) as f64)
            }
            Goal::Near { center, radius } => {
                let full = travel_cost(
                    (center.x - pos.x) as f64,
                    (center.y - pos.y) as f64,
                    (center.z - pos.z) as f64,
                );
                (full - radius as f64 * COST_WALK).max(0.0)
            }
        }
    }

    /// Residual heuristic cost at the goal itself.
    pub fn residual(&self) -> f64 {
        0.0
    }

    /// The block this goal is rendered at, if it has one.
    pub fn render_pos(&self) -> Option<BlockPos> {
        match *self {
            Goal::Block(target) => Some(target),
            Goal::Near { center, .. } => Some(center),
            Goal::Xz { .. } => None,
        }
    }
}

fn travel_cost(dx: f64, dy: f64, dz: f64) -> f64 {
    let horizontal = (dx * dx + dz * dz).sqrt() * COST_WALK;
    let vertical = if dy > 0.0 {
        dy * COST_ASCEND
    } else {
        -dy * COST_DESCEND
    };
    horizontal + vertical
}
