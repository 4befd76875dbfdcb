//! Runtime settings for the pathing core.
//!
//! Settings are consumed as an immutable snapshot: the core swaps in pending
//! updates once per tick, so a tick never observes a torn configuration and
//! worker threads only ever see the snapshot they were launched with.

use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::Deserialize;

use crate::error::{MargaError, Result};

/// All settings the pathing core consumes.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Soft deadline for an initial search (milliseconds). On expiry the
    /// searcher returns its best segment so far, if it has one.
    #[serde(default = "default_primary_timeout_ms")]
    pub primary_timeout_ms: u64,

    /// Hard deadline for an initial search (milliseconds). On expiry the
    /// searcher gives up.
    #[serde(default = "default_failure_timeout_ms")]
    pub failure_timeout_ms: u64,

    /// Soft deadline for a plan-ahead search (milliseconds).
    #[serde(default = "default_plan_ahead_primary_timeout_ms")]
    pub plan_ahead_primary_timeout_ms: u64,

    /// Hard deadline for a plan-ahead search (milliseconds).
    #[serde(default = "default_plan_ahead_failure_timeout_ms")]
    pub plan_ahead_failure_timeout_ms: u64,

    /// Start planning the next segment when the current one is estimated to
    /// end within this many ticks.
    #[serde(default = "default_planning_tick_lookahead")]
    pub planning_tick_lookahead: i32,

    /// Graft the planned next segment onto the current path when possible.
    #[serde(default = "default_splice_path")]
    pub splice_path: bool,

    /// Simplify a render goal to an XZ goal when its chunk is unloaded.
    #[serde(default = "default_simplify_unloaded_y")]
    pub simplify_unloaded_y: bool,

    /// Soft-cancel when a revalidated goal no longer accepts the current
    /// path's destination.
    #[serde(default = "default_cancel_on_goal_invalidation")]
    pub cancel_on_goal_invalidation: bool,

    /// Disconnect from the server on arrival at the goal.
    #[serde(default = "default_disconnect_on_arrival")]
    pub disconnect_on_arrival: bool,
}

// Default value functions
fn default_primary_timeout_ms() -> u64 {
    500
}
fn default_failure_timeout_ms() -> u64 {
    2000
}
fn default_plan_ahead_primary_timeout_ms() -> u64 {
    4000
}
fn default_plan_ahead_failure_timeout_ms() -> u64 {
    5000
}
fn default_planning_tick_lookahead() -> i32 {
    150
}
fn default_splice_path() -> bool {
    true
}
fn default_simplify_unloaded_y() -> bool {
    true
}
fn default_cancel_on_goal_invalidation() -> bool {
    false
}
fn default_disconnect_on_arrival() -> bool {
    false
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_timeout_ms: default_primary_timeout_ms(),
            failure_timeout_ms: default_failure_timeout_ms(),
            plan_ahead_primary_timeout_ms: default_plan_ahead_primary_timeout_ms(),
            plan_ahead_failure_timeout_ms: default_plan_ahead_failure_timeout_ms(),
            planning_tick_lookahead: default_planning_tick_lookahead(),
            splice_path: default_splice_path(),
            simplify_unloaded_y: default_simplify_unloaded_y(),
            cancel_on_goal_invalidation: default_cancel_on_goal_invalidation(),
            disconnect_on_arrival: default_disconnect_on_arrival(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MargaError::Config(format!("Failed to read settings file: {}", e)))?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }
}

/// Sender half for live settings updates.
pub type SettingsUpdater = Sender<Settings>;

/// The core's view of settings: a current snapshot plus a channel of pending
/// updates applied at tick boundaries.
pub struct SettingsHandle {
    snapshot: Mutex<Arc<Settings>>,
    updates: Receiver<Settings>,
}

/// Build a settings handle and the updater that feeds it.
pub fn settings_channel(initial: Settings) -> (SettingsUpdater, SettingsHandle) {
    let (tx, rx) = unbounded();
    let handle = SettingsHandle {
        snapshot: Mutex::new(Arc::new(initial)),
        updates: rx,
    };
    (tx, handle)
}

impl SettingsHandle {
    /// Apply any pending updates. Called once per tick by the core.
    pub fn refresh(&self) {
        let mut latest = None;
        while let Ok(settings) = self.updates.try_recv() {
            latest = Some(settings);
        }
        if let Some(settings) = latest {
            *self.snapshot.lock() = Arc::new(settings);
        }
    }

    /// The current snapshot. Cheap to call; clones an `Arc`.
    pub fn get(&self) -> Arc<Settings> {
        self.snapshot.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.primary_timeout_ms, 500);
        assert_eq!(settings.failure_timeout_ms, 2000);
        assert_eq!(settings.planning_tick_lookahead, 150);
        assert!(settings.splice_path);
        assert!(!settings.disconnect_on_arrival);
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "primary_timeout_ms = 250\nsplice_path = false").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.primary_timeout_ms, 250);
        assert!(!settings.splice_path);
        // Unspecified fields fall back to defaults
        assert_eq!(settings.failure_timeout_ms, 2000);
    }

    #[test]
    fn test_refresh_applies_latest_update() {
        let (tx, handle) = settings_channel(Settings::default());
        assert_eq!(handle.get().primary_timeout_ms, 500);

        let mut first = Settings::default();
        first.primary_timeout_ms = 100;
        let mut second = Settings::default();
        second.primary_timeout_ms = 900;
        tx.send(first).unwrap();
        tx.send(second).unwrap();

        // Snapshot unchanged until refresh
        assert_eq!(handle.get().primary_timeout_ms, 500);
        handle.refresh();
        assert_eq!(handle.get().primary_timeout_ms, 900);
    }
}
