#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use ed_core::clock::Event;
use ed_core::runner::{run_next_event, run_until_empty_with_hook, simulation_schedule};
use ed_core::trace::EventTrace;

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule).expect("invariants hold")
    }

    /// Drain the queue, calling `hook` after every event.
    pub fn run_full_with_hook<F>(&mut self, world: &mut World, hook: F) -> usize
    where
        F: FnMut(&World, &Event),
    {
        run_until_empty_with_hook(world, &mut self.schedule, 1_000_000, hook)
            .expect("invariants hold")
    }

    pub fn run_full(&mut self, world: &mut World) -> usize {
        self.run_full_with_hook(world, |_, _| {})
    }

    /// Drain the queue while recording every event.
    pub fn run_traced(&mut self, world: &mut World) -> EventTrace {
        let mut trace = EventTrace::new();
        self.run_full_with_hook(world, |world, event| trace.record(world, event));
        trace
    }
}
