//! Top-level wiring of the pathing control stack.
//!
//! The navigator owns the arbiter and a shared handle to the core, drives
//! the per-tick flow, and forwards drained path events to the registered
//! handler. Integrations call [`Navigator::on_tick`] once per game tick.

use std::sync::Arc;

use crate::arbiter::ControlArbiter;
use crate::command::{Process, ProcessId};
use crate::core::{PathingCore, TickPhase};
use crate::events::PathEvent;
use crate::search::{AStarProvider, SearchProvider};
use crate::settings::SettingsHandle;
use crate::world::{FlightStatus, InputSink, PlayerContext};

pub struct Navigator {
    core: Arc<PathingCore>,
    arbiter: ControlArbiter,
    handler: Option<Box<dyn FnMut(PathEvent) + Send>>,
}

impl Navigator {
    /// Build a navigator with the default voxel A* searcher.
    pub fn new(
        ctx: Arc<dyn PlayerContext>,
        input: Arc<dyn InputSink>,
        settings: SettingsHandle,
    ) -> Self {
        Self::with_provider(ctx, input, None, Arc::new(AStarProvider), settings)
    }

    /// Build a navigator with a custom search provider and an optional
    /// flight subsystem.
    pub fn with_provider(
        ctx: Arc<dyn PlayerContext>,
        input: Arc<dyn InputSink>,
        flight: Option<Arc<dyn FlightStatus>>,
        provider: Arc<dyn SearchProvider>,
        settings: SettingsHandle,
    ) -> Self {
        let core = PathingCore::new(ctx, input, flight, provider, settings);
        let arbiter = ControlArbiter::new(core.clone());
        Self {
            core,
            arbiter,
            handler: None,
        }
    }

    pub fn core(&self) -> &Arc<PathingCore> {
        &self.core
    }

    pub fn arbiter(&self) -> &ControlArbiter {
        &self.arbiter
    }

    pub fn register_process(&mut self, process: Box<dyn Process>) -> ProcessId {
        self.arbiter.register(process)
    }

    /// Install the handler that receives drained path events.
    pub fn set_event_handler<F>(&mut self, handler: F)
    where
        F: FnMut(PathEvent) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Drive one game tick.
    pub fn on_tick(&mut self, phase: TickPhase) {
        self.dispatch_events();

        if phase == TickPhase::Out {
            self.core.cancel_segment();
            self.arbiter.terminate_all();
            return;
        }

        self.core.begin_tick();
        self.arbiter.pre_tick();
        self.core.update_path();
        self.core.finish_tick();
        self.dispatch_events();
        self.arbiter.post_tick();
    }

    /// Cancel the current segment if safe and tear down all processes.
    pub fn terminate(&mut self) {
        self.core.terminate();
        self.arbiter.terminate_all();
    }

    fn dispatch_events(&mut self) {
        let events = self.core.process_events();
        if let Some(handler) = &mut self.handler {
            for event in events {
                handler(event);
            }
        }
    }
}
