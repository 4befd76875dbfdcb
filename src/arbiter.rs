//! Per-tick arbitration between competing processes.
//!
//! Registered processes are consulted in priority order each tick; the first
//! to return a non-deferring command takes control. A non-temporary winner
//! forces every lower-priority active process to release. Revalidating
//! commands get a post-tick pass that soft-cancels when the current path's
//! destination no longer satisfies the (possibly new) goal.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;

use crate::command::{PathingCommand, PathingCommandKind, Process, ProcessId};
use crate::core::PathingCore;
use crate::types::Goal;

pub struct ControlArbiter {
    core: Arc<PathingCore>,
    registered: Vec<Box<dyn Process>>,
    /// Ordered list of active process ids; consulted front to back after the
    /// priority sort.
    active: Vec<ProcessId>,
    previous: Option<ProcessId>,
    current: Option<ProcessId>,
    command: Option<PathingCommand>,
}

impl ControlArbiter {
    pub fn new(core: Arc<PathingCore>) -> Self {
        Self {
            core,
            registered: Vec::new(),
            active: Vec::new(),
            previous: None,
            current: None,
            command: None,
        }
    }

    /// Register a process, resetting its state first. The returned id stays
    /// valid for the arbiter's lifetime.
    pub fn register(&mut self, mut process: Box<dyn Process>) -> ProcessId {
        process.release();
        self.registered.push(process);
        self.registered.len() - 1
    }

    /// The process currently in control, if any.
    pub fn controlling(&self) -> Option<&dyn Process> {
        self.current.map(|id| self.registered[id].as_ref())
    }

    pub fn controlling_id(&self) -> Option<ProcessId> {
        self.current
    }

    /// The command accepted this tick, if any.
    pub fn last_command(&self) -> Option<&PathingCommand> {
        self.command.as_ref()
    }

    /// Release every process. A non-temporary process that still reports
    /// active afterwards is violating its contract.
    pub fn terminate_all(&mut self) {
        self.previous = None;
        self.current = None;
        self.command = None;
        self.active.clear();

        for process in &mut self.registered {
            process.release();
            if process.is_active() && !process.is_temporary() {
                panic!(
                    "{} refused to deactivate on termination",
                    process.display_name()
                );
            }
        }
    }

    /// Select the controlling process and dispatch its command.
    pub fn pre_tick(&mut self) {
        self.previous = self.current.take();
        self.command = self.select_command();

        let command = match &self.command {
            Some(command) => command.clone(),
            None => {
                // Nobody wants control: wind down
                self.core.cancel_segment_if_safe();
                self.core.set_goal(None);
                return;
            }
        };

        // Control changed hands away from a non-temporary process: its
        // segment no longer has an owner
        if self.current != self.previous && command.kind != PathingCommandKind::RequestPause {
            if let Some(prev) = self.previous {
                if !self.registered[prev].is_temporary() {
                    self.core.cancel_segment_if_safe();
                }
            }
        }

        self.dispatch(&command);
    }

    /// Revalidation pass for the tick's accepted command.
    pub fn post_tick(&mut self) {
        let command = match &self.command {
            Some(command) => command.clone(),
            None => return,
        };

        match command.kind {
            PathingCommandKind::ForceRevalidateGoalAndPath => {
                let invalid = match &command.goal {
                    None => true,
                    Some(goal) => {
                        self.requires_force_revalidation(goal)
                            || self.requires_goal_revalidation(goal)
                    }
                };
                if invalid {
                    self.core.soft_cancel_if_safe();
                }
                self.core.set_goal_and_path(&command);
            }
            PathingCommandKind::RevalidateGoalAndPath => {
                let invalid = match &command.goal {
                    None => true,
                    Some(goal) => self.requires_goal_revalidation(goal),
                };
                if self.core.settings().cancel_on_goal_invalidation && invalid {
                    self.core.soft_cancel_if_safe();
                }
                self.core.set_goal_and_path(&command);
            }
            _ => {}
        }
    }

    /// A new goal demands a forced replan when the current path ends
    /// somewhere the new goal rejects and the goals differ.
    pub fn requires_force_revalidation(&self, new_goal: &Goal) -> bool {
        match self.core.current_dest_and_goal() {
            Some((dest, path_goal)) => {
                if new_goal.is_in_goal(dest) {
                    return false;
                }
                *new_goal != path_goal
            }
            None => false,
        }
    }

    /// The current path satisfied its own goal but not the new one.
    pub fn requires_goal_revalidation(&self, new_goal: &Goal) -> bool {
        match self.core.current_dest_and_goal() {
            Some((dest, path_goal)) => {
                path_goal.is_in_goal(dest) && !new_goal.is_in_goal(dest)
            }
            None => false,
        }
    }

    fn select_command(&mut self) -> Option<PathingCommand> {
        self.update_active_list();

        let registered = &self.registered;
        self.active.sort_by(|&a, &b| {
            registered[b]
                .priority()
                .partial_cmp(&registered[a].priority())
                .unwrap_or(Ordering::Equal)
        });

        let calc_failed = self.core.calc_failed_last_tick();

        for pos in 0..self.active.len() {
            let id = self.active[pos];
            let was_in_control = self.previous == Some(id);
            let safe_to_cancel = self.core.is_safe_to_cancel();

            let command =
                self.registered[id].on_tick(was_in_control && calc_failed, safe_to_cancel);

            match command {
                None => {
                    if self.registered[id].is_active() {
                        panic!(
                            "{} actively returned no pathing command",
                            self.registered[id].display_name()
                        );
                    }
                }
                Some(command) => {
                    if command.kind == PathingCommandKind::Defer {
                        continue;
                    }
                    debug!(
                        "{} takes control with {:?}",
                        self.registered[id].display_name(),
                        command.kind
                    );
                    self.current = Some(id);
                    if !self.registered[id].is_temporary() {
                        for rest in pos + 1..self.active.len() {
                            let rest_id = self.active[rest];
                            self.registered[rest_id].release();
                        }
                    }
                    return Some(command);
                }
            }
        }
        None
    }

    /// Newly active processes join at the front; inactive ones drop out.
    fn update_active_list(&mut self) {
        for id in 0..self.registered.len() {
            if self.registered[id].is_active() {
                if !self.active.contains(&id) {
                    self.active.insert(0, id);
                }
            } else {
                self.active.retain(|&a| a != id);
            }
        }
    }

    fn dispatch(&mut self, command: &PathingCommand) {
        match command.kind {
            PathingCommandKind::SetGoalAndPause => {
                self.core.set_goal_and_path(command);
                self.core.request_pause();
            }
            PathingCommandKind::RequestPause => {
                self.core.request_pause();
            }
            PathingCommandKind::CancelAndSetGoal => {
                self.core.set_goal(command.goal.clone());
                self.core.cancel_segment_if_safe();
            }
            PathingCommandKind::ForceRevalidateGoalAndPath
            | PathingCommandKind::RevalidateGoalAndPath => {
                if !self.core.is_pathing() && !self.core.has_active_search() {
                    self.core.set_goal_and_path(command);
                }
            }
            PathingCommandKind::SetGoalAndPath => {
                if command.goal.is_some() {
                    self.core.set_goal_and_path(command);
                }
            }
            PathingCommandKind::Defer => {
                panic!("DEFER is not dispatchable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{CalcContext, SearchProvider, Searcher};
    use crate::settings::{settings_channel, Settings};
    use crate::types::{BlockPos, Path};
    use crate::world::{FlightStatus, Input, InputSink, PlayerContext, WorldView};
    use parking_lot::Mutex;

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

    struct TestCtx;

    impl PlayerContext for TestCtx {
        fn player_feet(&self) -> BlockPos {
            BlockPos::new(0, 64, 0)
        }
        fn position(&self) -> (f64, f64, f64) {
            (0.5, 64.0, 0.5)
        }
        fn on_ground(&self) -> bool {
            true
        }
        fn world(&self) -> std::sync::Arc<dyn WorldView> {
            Arc::new(FlatWorld)
        }
        fn disconnect(&self) {}
    }

    struct NullInput;

    impl InputSink for NullInput {
        fn set_input(&self, _input: Input, _held: bool) {}
        fn clear_all_keys(&self) {}
        fn stop_breaking_block(&self) {}
    }

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

    fn test_core() -> Arc<PathingCore> {
        let (_tx, settings) = settings_channel(Settings::default());
        PathingCore::new(
            Arc::new(TestCtx),
            Arc::new(NullInput),
            None::<Arc<dyn FlightStatus>>,
            Arc::new(NoSearchProvider),
            settings,
        )
    }

    #[derive(Default)]
    struct ProcState {
        active: bool,
        temporary: bool,
        priority: f64,
        /// Command kind the process returns each tick, or None to defer.
        wants: Option<PathingCommandKind>,
        released: bool,
        ticks: u32,
    }

    struct TestProcess {
        name: &'static str,
        state: Arc<Mutex<ProcState>>,
    }

    impl TestProcess {
        fn new(
            name: &'static str,
            priority: f64,
            temporary: bool,
            wants: Option<PathingCommandKind>,
        ) -> (Box<dyn Process>, Arc<Mutex<ProcState>>) {
            let state = Arc::new(Mutex::new(ProcState {
                active: true,
                temporary,
                priority,
                wants,
                released: false,
                ticks: 0,
            }));
            (
                Box::new(TestProcess {
                    name,
                    state: state.clone(),
                }),
                state,
            )
        }
    }

    impl Process for TestProcess {
        fn is_active(&self) -> bool {
            self.state.lock().active
        }
        fn is_temporary(&self) -> bool {
            self.state.lock().temporary
        }
        fn priority(&self) -> f64 {
            self.state.lock().priority
        }
        fn on_tick(
            &mut self,
            _calc_failed_last_tick: bool,
            _safe_to_cancel: bool,
        ) -> Option<PathingCommand> {
            let mut state = self.state.lock();
            state.ticks += 1;
            match state.wants {
                Some(kind) => Some(PathingCommand::new(kind, None)),
                None => Some(PathingCommand::defer()),
            }
        }
        fn release(&mut self) {
            let mut state = self.state.lock();
            state.released = true;
            state.active = false;
        }
        fn display_name(&self) -> &str {
            self.name
        }
    }

    #[test]
    fn test_priority_selection_with_defer_and_temporary() {
        let mut arbiter = ControlArbiter::new(test_core());

        let (a, a_state) =
            TestProcess::new("a", 1.0, true, Some(PathingCommandKind::RequestPause));
        let (b, b_state) =
            TestProcess::new("b", 2.0, false, Some(PathingCommandKind::RequestPause));
        let (c, c_state) = TestProcess::new("c", 3.0, false, None);

        let a_id = arbiter.register(a);
        let b_id = arbiter.register(b);
        let c_id = arbiter.register(c);
        assert_ne!(a_id, b_id);

        // register() resets everything; re-activate for the tick
        for state in [&a_state, &b_state, &c_state] {
            let mut state = state.lock();
            state.active = true;
            state.released = false;
        }

        arbiter.pre_tick();

        // c was consulted first and deferred, b won, a was released
        assert_eq!(arbiter.controlling_id(), Some(b_id));
        assert_eq!(c_state.lock().ticks, 1);
        assert_eq!(b_state.lock().ticks, 1);
        assert!(a_state.lock().released);
        assert!(!c_state.lock().released);
        assert_eq!(a_state.lock().ticks, 0);
    }

    #[test]
    fn test_no_command_clears_goal() {
        let core = test_core();
        core.set_goal(Some(Goal::Block(BlockPos::new(9, 64, 9))));
        let mut arbiter = ControlArbiter::new(core.clone());

        arbiter.pre_tick();

        assert!(arbiter.controlling_id().is_none());
        assert!(core.current_goal().is_none());
    }

    #[test]
    fn test_newly_active_processes_join_at_front() {
        let mut arbiter = ControlArbiter::new(test_core());
        let (a, a_state) = TestProcess::new("a", 1.0, false, None);
        let (b, b_state) = TestProcess::new("b", 1.0, false, None);
        arbiter.register(a);
        arbiter.register(b);
        a_state.lock().active = true;
        b_state.lock().active = true;

        arbiter.update_active_list();
        // b registered second but joins the front
        assert_eq!(arbiter.active, vec![1, 0]);

        b_state.lock().active = false;
        arbiter.update_active_list();
        assert_eq!(arbiter.active, vec![0]);
    }

    #[test]
    #[should_panic(expected = "refused to deactivate")]
    fn test_terminate_panics_on_stubborn_process() {
        struct Stubborn;
        impl Process for Stubborn {
            fn is_active(&self) -> bool {
                true
            }
            fn priority(&self) -> f64 {
                0.0
            }
            fn on_tick(&mut self, _: bool, _: bool) -> Option<PathingCommand> {
                Some(PathingCommand::defer())
            }
            fn release(&mut self) {}
            fn display_name(&self) -> &str {
                "stubborn"
            }
        }

        let mut arbiter = ControlArbiter::new(test_core());
        arbiter.register(Box::new(Stubborn));
        arbiter.terminate_all();
    }
}
