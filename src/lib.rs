//! Marga - Pathing control core for voxel-world agents
//!
//! Marga coordinates pathing for an autonomous agent on behalf of many
//! competing subsystems ("processes"). It arbitrates which process is in
//! control each tick, owns the lifecycle of the path being executed plus an
//! optionally pre-planned next segment, and gates execution (pause, cancel,
//! splice) behind safety rules about when a segment may be abandoned.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   navigator                         │  ← Tick driver
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               arbiter / command                     │  ← Process arbitration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 core / store                        │  ← Path lifecycle
//! │        (tick state machine, two-lock store)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │            search / exec / start                    │  ← Path production
//! │      (A*, worker pool, executor, start block)       │     and execution
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │          types / world / events / settings          │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Threading
//!
//! A single tick thread drives [`Navigator::on_tick`]. Searches run on a
//! dedicated worker thread and commit their results back through the store
//! under its two-lock discipline (path lock before calc lock, always). Path
//! events produced anywhere are drained twice per tick so they reach the
//! handler within the tick that produced them.

pub mod arbiter;
pub mod command;
pub mod core;
pub mod error;
pub mod events;
pub mod exec;
pub mod navigator;
pub mod search;
pub mod settings;
pub mod start;
pub mod store;
pub mod types;
pub mod world;

pub use crate::arbiter::ControlArbiter;
pub use crate::command::{PathingCommand, PathingCommandKind, Process, ProcessId};
pub use crate::core::{PathingCore, TickPhase};
pub use crate::error::{MargaError, Result};
pub use crate::events::{EventBus, PathEvent};
pub use crate::exec::PathExecutor;
pub use crate::navigator::Navigator;
pub use crate::search::{
    AStarProvider, AStarSearch, CalcContext, SearchPool, SearchProvider, SearchResult,
    SearchStatus, Searcher,
};
pub use crate::settings::{settings_channel, Settings, SettingsHandle, SettingsUpdater};
pub use crate::start::path_start;
pub use crate::store::{ActiveSearch, PathSnapshot, PathStore};
pub use crate::types::{BlockPos, Goal, Path};
pub use crate::world::{FlightStatus, Input, InputSink, PlayerContext, WorldView};
