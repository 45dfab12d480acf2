use bevy_ecs::prelude::World;
use tracing::info;

use crate::clock::{format_time_of_day, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientId, TreatmentRooms};
use crate::error::ConfigError;
use crate::scenario::params::SimulationParams;
use crate::telemetry::{EventMetrics, SimTelemetry};
use crate::triage::{TriagePolicy, WaitingList};

/// Populates a fresh `world` with every engine resource, one patient entity
/// per generated arrival, the arrival events and the first tick.
///
/// Validates `params` first; on error nothing is inserted. Returns the number
/// of patients generated.
pub fn build_scenario(world: &mut World, params: &SimulationParams) -> Result<usize, ConfigError> {
    params.validate()?;

    let arrivals = params.arrival_times();
    let mut clock = SimulationClock::starting_at(params.window_start_ms);
    for (index, arrival_time) in arrivals.iter().copied().enumerate() {
        let patient = world
            .spawn(Patient::new(PatientId(index as u32), arrival_time))
            .id();
        clock.schedule_at(arrival_time, EventKind::Arrival, Some(patient));
    }
    clock.schedule_at(params.window_start_ms, EventKind::Tick, None);

    world.insert_resource(clock);
    world.insert_resource(params.protocol);
    world.insert_resource(TreatmentRooms::new(params.room_count));
    world.insert_resource(WaitingList::default());
    world.insert_resource(TriagePolicy::from_kind(&params.triage_policy));
    world.insert_resource(SimTelemetry::with_scheduled(arrivals.len()));
    world.insert_resource(EventMetrics::default());

    info!(
        patients = arrivals.len(),
        rooms = params.room_count,
        window_start = %format_time_of_day(params.window_start_ms),
        window_end = %format_time_of_day(params.window_end_ms),
        "scenario built"
    );
    Ok(arrivals.len())
}
