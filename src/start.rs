//! Resolves the logical start block for a new search.
//!
//! The agent's feet may hang over an edge or float mid-jump; a search seeded
//! from such a block would begin somewhere the agent cannot legally stand.
//! The resolver picks the nearest block the agent can actually occupy.

use crate::types::BlockPos;
use crate::world::{PlayerContext, WorldView};

const SEARCH_RADIUS: i32 = 1;
const MAX_EDGE_DISTANCE: f64 = 0.8;
const CLOSEST_POSITIONS_TO_CHECK: usize = 4;

/// The block from which the next search should begin.
pub fn path_start(ctx: &dyn PlayerContext) -> BlockPos {
    let world = ctx.world();
    let feet = ctx.player_feet();

    if world.can_walk_on(feet.below()) {
        return feet;
    }

    if ctx.on_ground() {
        ground_position_near(feet, ctx, world.as_ref())
    } else {
        midair_position(feet, world.as_ref())
    }
}

fn midair_position(feet: BlockPos, world: &dyn WorldView) -> BlockPos {
    if world.can_walk_on(feet.below().below()) {
        feet.below()
    } else {
        feet
    }
}

/// On ground but the block beneath is not standable: the agent overhangs an
/// edge. Probe the adjacent blocks closest to the continuous position.
fn ground_position_near(
    feet: BlockPos,
    ctx: &dyn PlayerContext,
    world: &dyn WorldView,
) -> BlockPos {
    let (px, _, pz) = ctx.position();

    let mut candidates = Vec::with_capacity(9);
    for dx in -SEARCH_RADIUS..=SEARCH_RADIUS {
        for dz in -SEARCH_RADIUS..=SEARCH_RADIUS {
            candidates.push(feet.offset(dx, 0, dz));
        }
    }
    candidates.sort_by(|a, b| {
        a.dist_sq_xz(px, pz)
            .partial_cmp(&b.dist_sq_xz(px, pz))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for candidate in candidates.iter().take(CLOSEST_POSITIONS_TO_CHECK) {
        if within_sneaking_range(*candidate, px, pz) && can_stand_at(*candidate, world) {
            return *candidate;
        }
    }

    feet
}

// Note: this is an `or` on purpose, matching long-standing behavior even
// though it accepts diagonal reaches an L-inf ball would reject.
fn within_sneaking_range(pos: BlockPos, px: f64, pz: f64) -> bool {
    let (cx, cz) = pos.center_xz();
    let x_dist = (cx - px).abs();
    let z_dist = (cz - pz).abs();
    x_dist <= MAX_EDGE_DISTANCE || z_dist <= MAX_EDGE_DISTANCE
}

fn can_stand_at(pos: BlockPos, world: &dyn WorldView) -> bool {
    world.can_walk_on(pos.below())
        && world.can_walk_through(pos)
        && world.can_walk_through(pos.above())
}
