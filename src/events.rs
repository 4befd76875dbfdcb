//! Path lifecycle events and the queue that carries them.
//!
//! Events are produced on both the tick thread and the search worker and
//! consumed only by the core's per-tick drain. The drain is non-blocking:
//! everything enqueued so far moves out in one transfer.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Everything the pathing core can report about path lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathEvent {
    CalcStarted,
    CalcFinishedNowExecuting,
    CalcFailed,
    NextSegmentCalcStarted,
    NextSegmentCalcFinished,
    NextCalcFailed,
    PathFinishedNextStillCalculating,
    AtGoal,
    Canceled,
    DiscardNext,
    ContinuingOntoPlannedNext,
    SplicingOntoNextEarly,
}

/// Unbounded multi-producer queue of [`PathEvent`]s. Clones share the same
/// underlying channel; only the core drains it.
#[derive(Clone)]
pub struct EventBus {
    tx: Sender<PathEvent>,
    rx: Receiver<PathEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Enqueue an event. Never blocks.
    pub fn queue(&self, event: PathEvent) {
        // Send can only fail if every receiver is gone, which cannot happen
        // while this bus is alive.
        let _ = self.tx.send(event);
    }

    /// Move all currently enqueued events into a local buffer.
    pub fn drain(&self) -> Vec<PathEvent> {
        self.rx.try_iter().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
