//! The per-tick pathing state machine.
//!
//! Owns the [`PathStore`] and everything that mutates it: pause and cancel
//! gating, executor advancement, plan-ahead scheduling, splicing, and the
//! search completion handler that runs on the worker thread. All tick-local
//! flags are atomics so the core can be shared as `Arc<PathingCore>` between
//! the tick thread, the arbiter, and in-flight completion closures.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use log::{debug, warn};
use parking_lot::Mutex;

use crate::command::PathingCommand;
use crate::events::{EventBus, PathEvent};
use crate::exec::PathExecutor;
use crate::search::{
    simplify_goal_for_unloaded, CalcContext, SearchPool, SearchProvider, SearchResult,
    SearchStatus,
};
use crate::settings::{Settings, SettingsHandle};
use crate::start::path_start;
use crate::store::{ActiveSearch, PathSnapshot, PathState, PathStore};
use crate::types::{BlockPos, Goal};
use crate::world::{FlightStatus, InputSink, PlayerContext};

/// Which kind of game tick is being processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPhase {
    /// A normal in-world tick.
    In,
    /// The world is going away (disconnect, dimension change): tear down.
    Out,
}

/// The pathing control core. Shared as `Arc<PathingCore>`.
pub struct PathingCore {
    store: PathStore,
    events: EventBus,
    ctx: Arc<dyn PlayerContext>,
    input: Arc<dyn InputSink>,
    flight: Option<Arc<dyn FlightStatus>>,
    provider: Arc<dyn SearchProvider>,
    pool: SearchPool,
    settings: SettingsHandle,
    calc_context: Mutex<Option<CalcContext>>,
    /// Handle completion closures use to reach back into the core; weak so
    /// a queued search never keeps a torn-down core alive.
    this: Weak<PathingCore>,

    // Tick-local flags; written by the tick thread, read from anywhere
    safe_to_cancel: AtomicBool,
    pause_requested: AtomicBool,
    paused_this_tick: AtomicBool,
    was_unpaused_last_tick: AtomicBool,
    cancel_requested: AtomicBool,
    calc_failed_last_tick: AtomicBool,
}

impl PathingCore {
    pub fn new(
        ctx: Arc<dyn PlayerContext>,
        input: Arc<dyn InputSink>,
        flight: Option<Arc<dyn FlightStatus>>,
        provider: Arc<dyn SearchProvider>,
        settings: SettingsHandle,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            store: PathStore::new(),
            events: EventBus::new(),
            ctx,
            input,
            flight,
            provider,
            pool: SearchPool::new(),
            settings,
            calc_context: Mutex::new(None),
            this: this.clone(),
            safe_to_cancel: AtomicBool::new(false),
            pause_requested: AtomicBool::new(false),
            paused_this_tick: AtomicBool::new(false),
            was_unpaused_last_tick: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            calc_failed_last_tick: AtomicBool::new(false),
        })
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> PathSnapshot {
        self.store.snapshot()
    }

    pub fn current_goal(&self) -> Option<Goal> {
        self.store.goal()
    }

    pub fn has_current_path(&self) -> bool {
        self.store.has_current()
    }

    pub fn has_active_search(&self) -> bool {
        self.store.has_active_search()
    }

    /// Actively walking a path this tick (has one and is not paused).
    pub fn is_pathing(&self) -> bool {
        self.store.has_current() && !self.paused_this_tick.load(Ordering::SeqCst)
    }

    /// Sprint state of the current executor, for the sprint hook.
    pub fn is_sprinting(&self) -> bool {
        self.store
            .path()
            .current
            .as_ref()
            .map_or(false, |c| c.sprinting())
    }

    pub fn calc_failed_last_tick(&self) -> bool {
        self.calc_failed_last_tick.load(Ordering::SeqCst)
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings.get()
    }

    /// Destination and goal of the current path, for revalidation checks.
    pub fn current_dest_and_goal(&self) -> Option<(BlockPos, Goal)> {
        self.store.current_dest_and_goal()
    }

    /// Whether the current instant is a safe point to abandon the segment.
    /// With no current path this defers to the flight subsystem.
    pub fn is_safe_to_cancel(&self) -> bool {
        let path = self.store.path();
        self.is_safe_to_cancel_inner(&path)
    }

    fn is_safe_to_cancel_inner(&self, path: &PathState) -> bool {
        if path.current.is_some() {
            self.safe_to_cancel.load(Ordering::SeqCst)
        } else {
            match &self.flight {
                Some(flight) => !flight.is_active() || flight.is_safe_to_stop(),
                None => true,
            }
        }
    }

    // ------------------------------------------------------------------
    // Tick plumbing, driven by the navigator
    // ------------------------------------------------------------------

    /// Drain queued events, recording whether a calculation failure
    /// surfaced. Runs twice per tick so events queued mid-tick are still
    /// delivered the same tick.
    pub(crate) fn process_events(&self) -> Vec<PathEvent> {
        let events = self.events.drain();
        self.calc_failed_last_tick.store(
            events.contains(&PathEvent::CalcFailed),
            Ordering::SeqCst,
        );
        events
    }

    pub(crate) fn begin_tick(&self) {
        self.settings.refresh();
        self.store.set_expected_start(path_start(self.ctx.as_ref()));
    }

    pub(crate) fn finish_tick(&self) {
        let mut path = self.store.path();
        path.eta.elapsed_ticks = path.eta.elapsed_ticks.wrapping_add(1);
    }

    /// One step of the path lifecycle state machine.
    pub(crate) fn update_path(&self) {
        self.paused_this_tick.store(false, Ordering::SeqCst);

        if self.cancel_requested.load(Ordering::SeqCst) {
            self.cancel_requested.store(false, Ordering::SeqCst);
            self.clear_input_overrides();
            return;
        }

        if self.pause_requested.load(Ordering::SeqCst) && self.safe_to_cancel.load(Ordering::SeqCst)
        {
            self.pause_requested.store(false, Ordering::SeqCst);
            self.paused_this_tick.store(true, Ordering::SeqCst);
            if self.was_unpaused_last_tick.load(Ordering::SeqCst) {
                self.clear_input_overrides();
                self.store.handle_pause_resume(self.ctx.player_feet());
            }
            self.was_unpaused_last_tick.store(false, Ordering::SeqCst);
            return;
        }
        self.was_unpaused_last_tick.store(true, Ordering::SeqCst);

        let mut path = self.store.path();
        self.validate_active_search(&path);
        let safe = match path.current.as_mut() {
            Some(current) => current.tick(self.ctx.as_ref(), self.input.as_ref()),
            None => return,
        };
        self.safe_to_cancel.store(safe, Ordering::SeqCst);
        self.dispatch_completion(&mut path);
    }

    /// Cancel the in-flight search when its result can no longer be used:
    /// it neither continues the current path nor starts anywhere the agent
    /// could begin from, and its partial result covers neither.
    fn validate_active_search(&self, path: &PathState) {
        let calc = self.store.calc();
        let active = match calc.as_ref() {
            Some(active) => active,
            None => return,
        };

        let feet = self.ctx.player_feet();
        let search_start = active.start;
        let dest_mismatch = match &path.current {
            Some(current) => current.path().dest() != search_start,
            None => true,
        };
        if !dest_mismatch {
            return;
        }
        if search_start == feet || path.expected_start == Some(search_start) {
            return;
        }
        let best_useful = match active.searcher.best_so_far() {
            Some(best) => {
                best.contains(feet)
                    || path.expected_start.map_or(false, |e| best.contains(e))
            }
            None => false,
        };
        if !best_useful {
            debug!("Cancelling active search from {}: no longer useful", search_start);
            active.searcher.cancel();
        }
    }

    /// React to the current executor's state: keep walking, arrive, advance
    /// onto the planned next segment, or replan.
    fn dispatch_completion(&self, path: &mut PathState) {
        loop {
            let (failed, finished) = match &path.current {
                Some(current) => (current.failed(), current.finished()),
                None => return,
            };
            if !failed && !finished {
                self.handle_ongoing(path);
                return;
            }

            let feet = self.ctx.player_feet();
            let at_goal = match &path.goal {
                Some(goal) => goal.is_in_goal(feet),
                None => true,
            };
            if at_goal {
                debug!("All done. At {:?}", path.goal);
                self.events.queue(PathEvent::AtGoal);
                path.next = None;
                if path.current.take().is_some() {
                    self.clear_input_overrides();
                }
                if self.settings.get().disconnect_on_arrival {
                    self.ctx.disconnect();
                }
                return;
            }

            if path.next.is_some() {
                let expected = path.expected_start;
                let next_valid = path.next.as_ref().map_or(false, |next| {
                    next.path().contains(feet)
                        || expected.map_or(false, |e| next.path().contains(e))
                });
                if !next_valid {
                    debug!("Discarding next path as it does not contain current position");
                    self.events.queue(PathEvent::DiscardNext);
                    path.next = None;
                    continue;
                }
                debug!("Continuing on to planned next path");
                self.events.queue(PathEvent::ContinuingOntoPlannedNext);
                path.current = path.next.take();
                if let Some(current) = path.current.as_mut() {
                    let _ = current.tick(self.ctx.as_ref(), self.input.as_ref());
                }
                return;
            }

            // Terminal segment with nothing planned: replan
            let mut calc = self.store.calc();
            if calc.is_some() {
                self.events
                    .queue(PathEvent::PathFinishedNextStillCalculating);
                return;
            }
            self.events.queue(PathEvent::CalcStarted);
            let start = path.expected_start.unwrap_or(feet);
            self.launch_search(path, &mut calc, start, true);
            return;
        }
    }

    fn handle_ongoing(&self, path: &mut PathState) {
        let feet = self.ctx.player_feet();

        // Early splice: hop onto the planned next path the moment it covers
        // the agent's position and the current segment is abandonable
        let can_enter_early = path
            .next
            .as_ref()
            .map_or(false, |next| next.can_enter_early(feet));
        if self.safe_to_cancel.load(Ordering::SeqCst) && can_enter_early {
            debug!("Splicing into planned next path early...");
            self.events.queue(PathEvent::SplicingOntoNextEarly);
            path.current = path.next.take();
            if let Some(current) = path.current.as_mut() {
                let _ = current.tick(self.ctx.as_ref(), self.input.as_ref());
            }
            return;
        }

        let settings = self.settings.get();
        if settings.splice_path {
            if let Some(current) = path.current.take() {
                path.current = Some(current.try_splice(path.next.as_ref()));
            }
        }

        // A next segment ending where we already end adds nothing
        let redundant = match (&path.current, &path.next) {
            (Some(current), Some(next)) => current.path().dest() == next.path().dest(),
            _ => false,
        };
        if redundant {
            path.next = None;
        }

        // Plan ahead while the current segment winds down
        let mut calc = self.store.calc();
        if calc.is_some() || path.next.is_some() {
            return;
        }
        let (dest, remaining) = match &path.current {
            Some(current) => (current.path().dest(), current.ticks_remaining_estimate()),
            None => return,
        };
        let goal_unfinished = match &path.goal {
            Some(goal) => !goal.is_in_goal(dest),
            None => false,
        };
        if goal_unfinished && remaining < settings.planning_tick_lookahead as f64 {
            debug!("Path almost over. Planning ahead...");
            self.events.queue(PathEvent::NextSegmentCalcStarted);
            self.launch_search(path, &mut calc, dest, false);
        }
    }

    /// Launch a search from `start`. Callers hold both locks and have
    /// already emitted the matching start event; launching over an existing
    /// search or with a non-threaded context is a programmer error.
    fn launch_search(
        &self,
        path: &mut PathState,
        calc: &mut Option<ActiveSearch>,
        start: BlockPos,
        log_search: bool,
    ) {
        assert!(calc.is_none(), "a background search is already in flight");

        let goal = match &path.goal {
            Some(goal) => goal.clone(),
            None => {
                debug!("No goal");
                return;
            }
        };
        let context = self
            .calc_context
            .lock()
            .clone()
            .unwrap_or_else(|| CalcContext::threaded(self.ctx.as_ref()));
        assert!(
            context.safe_for_threaded_use,
            "calculation context is not safe for threaded use"
        );

        path.expected_start = Some(start);

        let settings = self.settings.get();
        let (primary_ms, failure_ms) = if path.current.is_none() {
            (settings.primary_timeout_ms, settings.failure_timeout_ms)
        } else {
            (
                settings.plan_ahead_primary_timeout_ms,
                settings.plan_ahead_failure_timeout_ms,
            )
        };

        let mut search_goal = goal.clone();
        if settings.simplify_unloaded_y {
            search_goal = simplify_goal_for_unloaded(&goal, context.world.as_ref());
            if search_goal != goal {
                debug!("Simplifying goal to an XZ goal: its chunk is unloaded");
            }
        }

        let previous = path.current.as_ref().map(|c| c.path().clone());
        let searcher = self
            .provider
            .create(start, search_goal, previous.as_ref(), &context);
        *calc = Some(ActiveSearch {
            searcher: searcher.clone(),
            start,
        });

        let core = self.this.clone();
        self.pool.execute(move || {
            if log_search {
                debug!("Starting to search for path from {}", start);
            }
            let result = searcher.calculate(primary_ms, failure_ms);
            if let Some(core) = core.upgrade() {
                core.handle_search_result(result, start, log_search);
            }
        });
    }

    /// Completion handler; runs on the worker thread under both locks.
    fn handle_search_result(&self, result: SearchResult, start: BlockPos, log_outcome: bool) {
        let mut path = self.store.path();
        let executor = result.path.map(PathExecutor::new);

        match path.current.as_ref().map(|c| c.path().dest()) {
            None => match executor {
                Some(exec) => {
                    if Some(exec.path().src()) == path.expected_start {
                        self.events.queue(PathEvent::CalcFinishedNowExecuting);
                        path.eta.origin = Some(start);
                        path.eta.elapsed_ticks = 0;
                        path.current = Some(exec);
                    } else {
                        warn!(
                            "Discarding orphan path segment with incorrect start. Expected: {:?}, got: {}",
                            path.expected_start,
                            exec.path().src()
                        );
                    }
                }
                None => {
                    if result.status != SearchStatus::Cancellation
                        && result.status != SearchStatus::Exception
                    {
                        self.events.queue(PathEvent::CalcFailed);
                    }
                }
            },
            Some(current_dest) => {
                if path.next.is_none() {
                    match executor {
                        Some(exec) => {
                            if exec.path().src() == current_dest {
                                self.events.queue(PathEvent::NextSegmentCalcFinished);
                                path.next = Some(exec);
                            } else {
                                warn!("Discarding orphan next segment with incorrect start");
                            }
                        }
                        None => self.events.queue(PathEvent::NextCalcFailed),
                    }
                } else {
                    warn!("Illegal state: a planned next segment already exists. Discarding the new one");
                }
            }
        }

        if log_outcome {
            if let Some(current) = &path.current {
                let p = current.path();
                let message = if p.goal().is_in_goal(p.dest()) {
                    "Finished finding a path"
                } else {
                    "Found path segment"
                };
                debug!(
                    "{} from {} to {:?}. {} nodes considered",
                    message,
                    start,
                    p.goal(),
                    p.num_nodes_considered()
                );
            }
        }

        // Clear the search atomically with the commit above
        let mut calc = self.store.calc();
        *calc = None;
    }

    // ------------------------------------------------------------------
    // Operations invoked by the arbiter and the navigator
    // ------------------------------------------------------------------

    pub fn set_goal(&self, goal: Option<Goal>) {
        self.store.set_goal(goal);
    }

    /// Set the goal from a command and begin pathing toward it when idle.
    pub fn set_goal_and_path(&self, command: &PathingCommand) {
        self.store.set_goal(command.goal.clone());
        *self.calc_context.lock() = Some(
            command
                .context
                .clone()
                .unwrap_or_else(|| CalcContext::threaded(self.ctx.as_ref())),
        );

        let mut path = self.store.path();
        let goal = match &path.goal {
            Some(goal) => goal.clone(),
            None => return,
        };
        let feet = self.ctx.player_feet();
        if goal.is_in_goal(feet) || path.expected_start.map_or(false, |e| goal.is_in_goal(e)) {
            return;
        }
        if path.current.is_some() {
            return;
        }
        let mut calc = self.store.calc();
        if calc.is_some() {
            return;
        }
        self.events.queue(PathEvent::CalcStarted);
        let start = path.expected_start.unwrap_or(feet);
        self.launch_search(&mut path, &mut calc, start, true);
    }

    pub fn request_pause(&self) {
        self.pause_requested.store(true, Ordering::SeqCst);
    }

    pub fn cancel_segment_if_safe(&self) {
        if self.is_safe_to_cancel() {
            self.cancel_segment();
        }
    }

    /// Unconditionally abandon the current journey segment.
    pub fn cancel_segment(&self) {
        self.events.queue(PathEvent::Canceled);
        let mut path = self.store.path();
        {
            let calc = self.store.calc();
            if let Some(active) = calc.as_ref() {
                active.searcher.cancel();
            }
        }
        if path.current.take().is_some() {
            path.next = None;
            self.clear_input_overrides();
        }
    }

    /// Cancel our own search and, if the segment is abandonable, drop both
    /// segments; the input release happens on the next tick.
    pub fn soft_cancel_if_safe(&self) {
        {
            let mut path = self.store.path();
            {
                let calc = self.store.calc();
                if let Some(active) = calc.as_ref() {
                    // Only ever cancel the search this core owns
                    active.searcher.cancel();
                }
            }
            if !self.is_safe_to_cancel_inner(&path) {
                return;
            }
            path.current = None;
            path.next = None;
        }
        self.cancel_requested.store(true, Ordering::SeqCst);
    }

    /// Cancel the segment if safe. Tearing down processes is the
    /// navigator's responsibility.
    pub fn terminate(&self) {
        if self.is_safe_to_cancel() {
            self.cancel_segment();
        }
    }

    /// Full teardown regardless of safety.
    pub fn force_cancel(&self) {
        self.terminate();
        self.cancel_segment();
        *self.store.calc() = None;
    }

    /// ETA to the goal, extrapolated from heuristic progress since pathing
    /// began. `None` when there is no usable baseline.
    pub fn estimated_ticks_to_goal(&self) -> Option<f64> {
        let mut path = self.store.path();
        let goal = path.goal.clone()?;
        let feet = self.ctx.player_feet();
        if goal.is_in_goal(feet) {
            path.eta.origin = path.expected_start;
            path.eta.elapsed_ticks = 0;
            return Some(0.0);
        }
        let origin = path.eta.origin?;
        if path.eta.elapsed_ticks == 0 {
            return None;
        }
        let current_h = goal.heuristic(feet);
        let origin_h = goal.heuristic(origin);
        if (origin_h - current_h).abs() < f64::EPSILON {
            return None;
        }
        Some(
            (current_h - goal.residual()).abs() * path.eta.elapsed_ticks as f64
                / (origin_h - current_h).abs(),
        )
    }

    fn clear_input_overrides(&self) {
        self.input.clear_all_keys();
        self.input.stop_breaking_block();
    }
}

impl Drop for PathingCore {
    fn drop(&mut self) {
        // The worker join during field teardown must not wait on a search
        // nobody will ever cancel
        let calc = self.store.calc();
        if let Some(active) = calc.as_ref() {
            active.searcher.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Searcher;
    use crate::settings::settings_channel;
    use crate::types::Path;
    use crate::world::{Input, WorldView};
    use std::sync::atomic::AtomicUsize;

    struct FlatWorld;

    impl WorldView for FlatWorld {
        fn can_walk_on(&self, pos: BlockPos) -> bool {
            pos.y <= 63
        }
        fn can_walk_through(&self, pos: BlockPos) -> bool {
            pos.y >= 64
        }
        fn is_chunk_loaded(&self, _x: i32, _z: i32) -> bool {
            true
        }
    }

    struct TestCtx {
        feet: Mutex<BlockPos>,
    }

    impl TestCtx {
        fn at(pos: BlockPos) -> Arc<Self> {
            Arc::new(Self {
                feet: Mutex::new(pos),
            })
        }
    }

    impl PlayerContext for TestCtx {
        fn player_feet(&self) -> BlockPos {
            *self.feet.lock()
        }
        fn position(&self) -> (f64, f64, f64) {
            let feet = self.player_feet();
            (feet.x as f64 + 0.5, feet.y as f64, feet.z as f64 + 0.5)
        }
        fn on_ground(&self) -> bool {
            true
        }
        fn world(&self) -> Arc<dyn WorldView> {
            Arc::new(FlatWorld)
        }
        fn disconnect(&self) {}
    }

    #[derive(Default)]
    struct CountingInput {
        clears: AtomicUsize,
    }

    impl InputSink for CountingInput {
        fn set_input(&self, _input: Input, _held: bool) {}
        fn clear_all_keys(&self) {
            self.clears.fetch_add(1, Ordering::SeqCst);
        }
        fn stop_breaking_block(&self) {}
    }

    struct TestFlight {
        active: bool,
        safe: bool,
    }

    impl FlightStatus for TestFlight {
        fn is_active(&self) -> bool {
            self.active
        }
        fn is_safe_to_stop(&self) -> bool {
            self.safe
        }
    }

    /// Provider that must never be asked for a search.
    struct NoSearchProvider;

    impl SearchProvider for NoSearchProvider {
        fn create(
            &self,
            _start: BlockPos,
            _goal: Goal,
            _previous: Option<&Path>,
            _context: &CalcContext,
        ) -> Arc<dyn Searcher> {
            panic!("no search expected in this test");
        }
    }

    fn test_core(flight: Option<Arc<dyn FlightStatus>>) -> (Arc<PathingCore>, Arc<CountingInput>) {
        let (_tx, settings) = settings_channel(Settings::default());
        let input = Arc::new(CountingInput::default());
        let core = PathingCore::new(
            TestCtx::at(BlockPos::new(0, 64, 0)),
            input.clone(),
            flight,
            Arc::new(NoSearchProvider),
            settings,
        );
        (core, input)
    }

    fn line_executor(from_x: i32, to_x: i32) -> PathExecutor {
        let positions = (from_x..=to_x).map(|x| BlockPos::new(x, 64, 0)).collect();
        PathExecutor::new(Path::new(
            positions,
            Goal::Block(BlockPos::new(to_x, 64, 0)),
            1,
        ))
    }

    #[test]
    fn test_safe_to_cancel_defers_to_flight_when_idle() {
        let (core, _) = test_core(Some(Arc::new(TestFlight {
            active: true,
            safe: false,
        })));
        assert!(!core.is_safe_to_cancel());

        let (core, _) = test_core(Some(Arc::new(TestFlight {
            active: true,
            safe: true,
        })));
        assert!(core.is_safe_to_cancel());

        let (core, _) = test_core(Some(Arc::new(TestFlight {
            active: false,
            safe: false,
        })));
        assert!(core.is_safe_to_cancel());

        let (core, _) = test_core(None);
        assert!(core.is_safe_to_cancel());
    }

    #[test]
    fn test_cancel_segment_clears_everything() {
        let (core, input) = test_core(None);
        {
            let mut path = core.store.path();
            path.current = Some(line_executor(0, 5));
            path.next = Some(line_executor(5, 9));
        }

        core.cancel_segment();

        let snapshot = core.snapshot();
        assert!(snapshot.current.is_none());
        assert!(snapshot.next.is_none());
        assert!(input.clears.load(Ordering::SeqCst) > 0);
        assert_eq!(core.process_events(), vec![PathEvent::Canceled]);
    }

    #[test]
    fn test_eta_zero_when_in_goal() {
        let (core, _) = test_core(None);
        core.set_goal(Some(Goal::Block(BlockPos::new(0, 64, 0))));
        assert_eq!(core.estimated_ticks_to_goal(), Some(0.0));
    }

    #[test]
    fn test_eta_extrapolates_progress() {
        let (core, _) = test_core(None);
        // Pathing began 20 blocks from the goal; the agent has covered half
        core.set_goal(Some(Goal::Block(BlockPos::new(10, 64, 0))));
        {
            let mut path = core.store.path();
            path.eta.origin = Some(BlockPos::new(-10, 64, 0));
            path.eta.elapsed_ticks = 50;
        }
        // Moved half the heuristic distance in 50 ticks: 50 more to go
        let eta = core.estimated_ticks_to_goal().unwrap();
        assert!((eta - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_eta_unknown_without_baseline() {
        let (core, _) = test_core(None);
        core.set_goal(Some(Goal::Block(BlockPos::new(10, 64, 0))));
        assert_eq!(core.estimated_ticks_to_goal(), None);
    }

    #[test]
    fn test_process_events_records_calc_failure() {
        let (core, _) = test_core(None);
        core.events.queue(PathEvent::CalcFailed);
        core.process_events();
        assert!(core.calc_failed_last_tick());
        core.process_events();
        assert!(!core.calc_failed_last_tick());
    }
}
