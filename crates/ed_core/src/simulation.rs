//! Simulator facade: owns the configuration, the world and the schedule.
//!
//! Configuration setters take effect at the next [Simulator::init]; a run
//! never observes a configuration change.

use bevy_ecs::prelude::{Schedule, World};
use tracing::info;

use crate::clock::{format_time_of_day, Event, SimulationClock};
use crate::error::SimulationError;
use crate::runner::{run_next_event_with_hook, run_until_empty_with_hook, simulation_schedule};
use crate::scenario::{build_scenario, SimulationParams};
use crate::telemetry::{SimTelemetry, SimulationReport};
use crate::trace::EventTrace;

/// Upper bound on events processed by one [Simulator::run].
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

pub struct Simulator {
    params: SimulationParams,
    max_steps: usize,
    world: Option<World>,
    schedule: Schedule,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulationParams::default())
    }
}

impl Simulator {
    pub fn new(params: SimulationParams) -> Self {
        Self {
            params,
            max_steps: DEFAULT_MAX_STEPS,
            world: None,
            schedule: simulation_schedule(),
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SimulationParams) {
        self.params = params;
    }

    pub fn room_count(&self) -> u32 {
        self.params.room_count
    }

    pub fn set_room_count(&mut self, rooms: u32) {
        self.params.room_count = rooms;
    }

    pub fn patient_count(&self) -> usize {
        self.params.patient_count
    }

    pub fn set_patient_count(&mut self, patients: usize) {
        self.params.patient_count = patients;
    }

    pub fn arrival_interval_ms(&self) -> u64 {
        self.params.arrival_interval_ms
    }

    pub fn set_arrival_interval_ms(&mut self, interval_ms: u64) {
        self.params.arrival_interval_ms = interval_ms;
    }

    /// Validates the configuration and builds a fresh world, discarding any
    /// previous run. Returns the number of patients generated.
    pub fn init(&mut self) -> Result<usize, SimulationError> {
        self.world = None;
        let mut world = World::new();
        let generated = build_scenario(&mut world, &self.params)?;
        // Systems are bound to the world they first ran against.
        self.schedule = simulation_schedule();
        self.world = Some(world);
        Ok(generated)
    }

    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    /// Processes a single event. `Ok(None)` once the queue is drained.
    pub fn step(&mut self) -> Result<Option<Event>, SimulationError> {
        let world = self.world.as_mut().ok_or(SimulationError::NotInitialized)?;
        let mut processed = None;
        run_next_event_with_hook(world, &mut self.schedule, |_, event| {
            processed = Some(*event)
        })?;
        Ok(processed)
    }

    /// Drains the event queue and returns the final report.
    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        self.run_with_hook(|_, _| {})
    }

    /// Like [Simulator::run], calling `hook` after every processed event.
    pub fn run_with_hook<F>(&mut self, hook: F) -> Result<SimulationReport, SimulationError>
    where
        F: FnMut(&World, &Event),
    {
        let world = self.world.as_mut().ok_or(SimulationError::NotInitialized)?;
        let steps = run_until_empty_with_hook(world, &mut self.schedule, self.max_steps, hook)?;
        let drained = world
            .get_resource::<SimulationClock>()
            .map_or(true, SimulationClock::is_empty);
        if !drained {
            return Err(SimulationError::StepLimitExceeded(self.max_steps));
        }

        let report = self.report()?;
        info!(
            steps,
            patients = report.patients_total,
            discharged = report.discharged,
            abandoned = report.abandoned,
            deceased = report.deceased,
            escalated = report.escalated,
            ended_at = %format_time_of_day(report.final_time_ms),
            "simulation finished"
        );
        Ok(report)
    }

    /// Runs to completion while recording every event.
    pub fn run_traced(&mut self) -> Result<(SimulationReport, EventTrace), SimulationError> {
        let mut trace = EventTrace::new();
        let report = self.run_with_hook(|world, event| trace.record(world, event))?;
        Ok((report, trace))
    }

    pub fn report(&self) -> Result<SimulationReport, SimulationError> {
        self.world
            .as_ref()
            .and_then(SimulationReport::from_world)
            .ok_or(SimulationError::NotInitialized)
    }

    pub fn telemetry(&self) -> Option<&SimTelemetry> {
        self.world.as_ref()?.get_resource::<SimTelemetry>()
    }

    /// Current simulation time, `None` before [Simulator::init].
    pub fn now(&self) -> Option<u64> {
        self.world
            .as_ref()?
            .get_resource::<SimulationClock>()
            .map(SimulationClock::now)
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::time_of_day;
    use crate::error::ConfigError;

    fn small_params() -> SimulationParams {
        SimulationParams::default()
            .with_room_count(1)
            .with_patient_count(2)
            .with_window(time_of_day(8, 0), time_of_day(8, 10))
    }

    #[test]
    fn run_before_init_is_rejected() {
        let mut simulator = Simulator::new(small_params());
        assert_eq!(simulator.run(), Err(SimulationError::NotInitialized));
        assert_eq!(simulator.step(), Err(SimulationError::NotInitialized));
        assert_eq!(simulator.report(), Err(SimulationError::NotInitialized));
        assert!(simulator.now().is_none());
    }

    #[test]
    fn invalid_config_fails_init() {
        let mut simulator = Simulator::new(small_params());
        simulator.set_room_count(0);
        assert_eq!(
            simulator.init(),
            Err(SimulationError::Config(ConfigError::NonPositiveRoomCount))
        );
        assert!(!simulator.is_initialized());
    }

    #[test]
    fn run_drains_and_reports() {
        let mut simulator = Simulator::new(small_params());
        assert_eq!(simulator.init(), Ok(2));
        let report = simulator.run().expect("run");
        assert_eq!(report.patients_total, 2);
        assert_eq!(report.discharged, 2);
        assert_eq!(report.events_processed, 19);
        assert_eq!(report.final_time_ms, time_of_day(9, 35));
        assert_eq!(simulator.now(), Some(time_of_day(9, 35)));
    }

    #[test]
    fn step_processes_one_event() {
        let mut simulator = Simulator::new(small_params());
        simulator.init().expect("init");
        let first = simulator.step().expect("step").expect("event");
        assert_eq!(first.timestamp, time_of_day(8, 0));
        assert_eq!(simulator.telemetry().map(|t| t.patients_total), Some(1));
    }

    #[test]
    fn setters_apply_at_next_init() {
        let mut simulator = Simulator::new(small_params());
        simulator.init().expect("init");
        simulator.set_patient_count(1);
        assert_eq!(simulator.telemetry().map(|t| t.patients_scheduled), Some(2));

        assert_eq!(simulator.init(), Ok(1));
        let report = simulator.run().expect("run");
        assert_eq!(report.patients_total, 1);
    }

    #[test]
    fn step_limit_is_reported() {
        let mut simulator = Simulator::new(small_params()).with_max_steps(5);
        simulator.init().expect("init");
        assert_eq!(simulator.run(), Err(SimulationError::StepLimitExceeded(5)));
    }
}
