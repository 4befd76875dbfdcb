//! Collaborator interfaces: world queries, player state, input overrides.
//!
//! The core never owns the game; it consumes these narrow contracts. Real
//! integrations implement them against the running client, the test suite
//! implements them in memory.

use std::sync::Arc;

use crate::types::BlockPos;

/// Read-only view of the voxel world. Implementations must be safe to query
/// from the search worker thread.
pub trait WorldView: Send + Sync {
    /// Whether an agent can stand on top of this block.
    fn can_walk_on(&self, pos: BlockPos) -> bool;

    /// Whether an agent's body can occupy this block.
    fn can_walk_through(&self, pos: BlockPos) -> bool;

    /// Whether the chunk containing the given block column is loaded.
    /// Coordinates are block coordinates, not chunk coordinates.
    fn is_chunk_loaded(&self, x: i32, z: i32) -> bool;
}

/// The agent's physical state and its handle on the world.
pub trait PlayerContext: Send + Sync {
    /// Block position of the player's feet.
    fn player_feet(&self) -> BlockPos;

    /// Continuous position of the player.
    fn position(&self) -> (f64, f64, f64);

    fn on_ground(&self) -> bool;

    fn world(&self) -> Arc<dyn WorldView>;

    /// Disconnect from the server. Only invoked on arrival when the
    /// corresponding setting is enabled.
    fn disconnect(&self);
}

/// Movement inputs the executor may hold down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    Forward,
    Sprint,
    Jump,
    Sneak,
}

/// Sink for low-level input overrides.
pub trait InputSink: Send + Sync {
    fn set_input(&self, input: Input, held: bool);

    /// Release every held key.
    fn clear_all_keys(&self);

    /// Abort any in-progress block breaking.
    fn stop_breaking_block(&self);
}

/// Safety view of the flight subsystem. When no current path exists, segment
/// cancellation defers to this flag.
pub trait FlightStatus: Send + Sync {
    fn is_active(&self) -> bool;

    fn is_safe_to_stop(&self) -> bool;
}
