//! Path execution: drives one geometric path tick-by-tick.
//!
//! The executor advances a node index by matching the agent's feet against
//! upcoming path positions and holds movement inputs toward the next node.
//! It reports terminal state (`failed` / `finished`) and whether the current
//! instant is a safe point to abandon the segment.

use log::{debug, warn};

use crate::types::{BlockPos, Path, COST_WALK};
use crate::world::{Input, InputSink, PlayerContext};

/// Ticks the agent may spend off the path before the segment fails.
const MAX_TICKS_OFF_PATH: u32 = 100;

/// Squared distance from the path beyond which the segment fails outright.
const MAX_DIST_SQ_FROM_PATH: f64 = 9.0;

/// Minimum straight flat run, in nodes, before sprinting engages.
const SPRINT_MIN_RUN: usize = 4;

/// Runtime wrapper over a [`Path`] being walked.
pub struct PathExecutor {
    path: Path,
    position_index: usize,
    ticks_off_path: u32,
    failed: bool,
    finished: bool,
    sprinting: bool,
}

impl PathExecutor {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            position_index: 0,
            ticks_off_path: 0,
            failed: false,
            finished: false,
            sprinting: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn sprinting(&self) -> bool {
        self.sprinting
    }

    /// Estimated ticks until this segment ends, from the current node.
    pub fn ticks_remaining_estimate(&self) -> f64 {
        let remaining = self.path.len().saturating_sub(self.position_index + 1);
        remaining as f64 * COST_WALK
    }

    /// Advance one game tick. Returns whether this is a safe point to cancel
    /// the segment.
    pub fn tick(&mut self, ctx: &dyn PlayerContext, input: &dyn InputSink) -> bool {
        if self.failed || self.finished {
            return true;
        }

        let feet = ctx.player_feet();

        // Re-anchor on the path: the agent may have skipped ahead
        match self.find_on_path(feet) {
            Some(index) => {
                self.position_index = index;
                self.ticks_off_path = 0;
            }
            None => {
                self.ticks_off_path += 1;
                let nearest_sq = self
                    .path
                    .positions()
                    .iter()
                    .map(|p| {
                        let dx = (p.x - feet.x) as f64;
                        let dy = (p.y - feet.y) as f64;
                        let dz = (p.z - feet.z) as f64;
                        dx * dx + dy * dy + dz * dz
                    })
                    .fold(f64::INFINITY, f64::min);
                if nearest_sq > MAX_DIST_SQ_FROM_PATH {
                    warn!("Too far from path ({:.1} blocks), abandoning segment", nearest_sq.sqrt());
                    self.failed = true;
                    self.sprinting = false;
                    return true;
                }
                if self.ticks_off_path > MAX_TICKS_OFF_PATH {
                    warn!("Off path for {} ticks, abandoning segment", self.ticks_off_path);
                    self.failed = true;
                    self.sprinting = false;
                    return true;
                }
            }
        }

        if self.position_index + 1 >= self.path.len() {
            debug!("Segment complete at {}", self.path.dest());
            self.finished = true;
            self.sprinting = false;
            return true;
        }

        let next = self.path.positions()[self.position_index + 1];
        input.set_input(Input::Forward, true);
        input.set_input(Input::Jump, next.y > feet.y);

        self.sprinting = self.straight_flat_run() >= SPRINT_MIN_RUN;
        input.set_input(Input::Sprint, self.sprinting);

        ctx.on_ground()
    }

    /// Whether this (planned-next) segment can be entered early from the
    /// given position.
    pub fn can_enter_early(&self, feet: BlockPos) -> bool {
        self.path.contains(feet)
    }

    /// Graft `next` onto this path when it continues from our destination.
    /// Returns self unchanged when no graft is possible.
    pub fn try_splice(self, next: Option<&PathExecutor>) -> PathExecutor {
        let next = match next {
            Some(n) if !self.failed && !self.finished => n,
            _ => return self,
        };
        if next.path.src() != self.path.dest() {
            return self;
        }

        let mut positions = self.path.positions().to_vec();
        positions.extend_from_slice(&next.path.positions()[1..]);
        let combined = Path::new(
            positions,
            next.path.goal().clone(),
            self.path.num_nodes_considered() + next.path.num_nodes_considered(),
        );
        debug!("Spliced planned next segment onto current path");

        PathExecutor {
            path: combined,
            position_index: self.position_index,
            ticks_off_path: self.ticks_off_path,
            failed: false,
            finished: false,
            sprinting: self.sprinting,
        }
    }

    /// Locate the agent's feet on the remaining path, if present.
    fn find_on_path(&self, feet: BlockPos) -> Option<usize> {
        self.path.positions()[self.position_index..]
            .iter()
            .position(|&p| p == feet)
            .map(|offset| self.position_index + offset)
    }

    /// Length of the straight, flat run ahead of the current node.
    fn straight_flat_run(&self) -> usize {
        let positions = &self.path.positions()[self.position_index..];
        if positions.len() < 2 {
            return 0;
        }
        let first = positions[0];
        let second = positions[1];
        let dir = (second.x - first.x, second.z - first.z);
        if second.y != first.y {
            return 0;
        }

        let mut run = 1;
        for pair in positions[1..].windows(2) {
            let step = (pair[1].x - pair[0].x, pair[1].z - pair[0].z);
            if step != dir || pair[1].y != pair[0].y {
                break;
            }
            run += 1;
        }
        run
    }
}
