//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! runs the schedule, then checks the resource invariants.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};
use tracing::debug;

use crate::clock::{format_time_of_day, CurrentEvent, Event, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientState, TreatmentRooms};
use crate::error::SimulationError;
use crate::systems::{
    arrival::arrival_system, free_room::free_room_system, tick::tick_system,
    timeout::timeout_system, treated::treated_system, triage::triage_system,
};
use crate::telemetry::{EventMetrics, SimTelemetry};
use crate::triage::WaitingList;

fn current_kind_is(event: Option<Res<CurrentEvent>>, kind: EventKind) -> bool {
    event.map(|e| e.0.kind == kind).unwrap_or(false)
}

fn is_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(event, EventKind::Arrival)
}

fn is_triage(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(event, EventKind::Triage)
}

fn is_treated(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(event, EventKind::Treated)
}

fn is_free_room(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(event, EventKind::FreeRoom)
}

fn is_timeout(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(event, EventKind::Timeout)
}

fn is_tick(event: Option<Res<CurrentEvent>>) -> bool {
    current_kind_is(event, EventKind::Tick)
}

/// Builds the schedule: one handler per event kind, gated on [CurrentEvent].
///
/// Runs single-threaded; exactly one handler fires per event.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((
        arrival_system.run_if(is_arrival),
        triage_system.run_if(is_triage),
        treated_system.run_if(is_treated),
        free_room_system.run_if(is_free_room),
        timeout_system.run_if(is_timeout),
        tick_system.run_if(is_tick),
    ));
    schedule
}

/// Runs one simulation step.
/// Returns `Ok(false)` when the event queue is empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Result<bool, SimulationError> {
    run_next_event_with_hook(world, schedule, |_, _| {})
}

/// Runs one simulation step and invokes `hook` after the schedule completes
/// and the invariants hold.
pub fn run_next_event_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    mut hook: F,
) -> Result<bool, SimulationError>
where
    F: FnMut(&World, &Event),
{
    let event = {
        let Some(mut clock) = world.get_resource_mut::<SimulationClock>() else {
            return Err(SimulationError::NotInitialized);
        };
        match clock.pop_next() {
            Some(event) => event,
            None => return Ok(false),
        }
    };
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }
    debug!(
        at = %format_time_of_day(event.timestamp),
        kind = %event.kind,
        "processing event"
    );

    schedule.run(world);
    check_invariants(world)?;
    hook(world, &event);
    Ok(true)
}

/// Runs simulation steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
) -> Result<usize, SimulationError> {
    run_until_empty_with_hook(world, schedule, max_steps, |_, _| {})
}

/// Runs simulation steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> Result<usize, SimulationError>
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook)? {
        steps += 1;
    }
    Ok(steps)
}

/// Checks the resource invariants that must hold between events:
/// free rooms never exceed the total, every occupied room holds exactly one
/// patient in treatment, the waiting list matches the waiting patients and
/// outcomes never exceed arrivals.
pub fn check_invariants(world: &mut World) -> Result<(), SimulationError> {
    let (in_treatment, waiting_patients) = world.query::<&Patient>().iter(world).fold(
        (0u32, 0usize),
        |(treating, waiting), patient| match patient.state {
            PatientState::InTreatment => (treating + 1, waiting),
            PatientState::Waiting => (treating, waiting + 1),
            _ => (treating, waiting),
        },
    );

    let rooms = world
        .get_resource::<TreatmentRooms>()
        .ok_or(SimulationError::NotInitialized)?;
    if rooms.free > rooms.total {
        return Err(SimulationError::InvariantViolation(format!(
            "{} free rooms out of {}",
            rooms.free, rooms.total
        )));
    }
    if rooms.occupied() != in_treatment {
        return Err(SimulationError::InvariantViolation(format!(
            "{} occupied rooms but {} patients in treatment",
            rooms.occupied(),
            in_treatment
        )));
    }

    let waiting = world
        .get_resource::<WaitingList>()
        .ok_or(SimulationError::NotInitialized)?;
    if waiting.len() != waiting_patients {
        return Err(SimulationError::InvariantViolation(format!(
            "{} waiting list entries but {} waiting patients",
            waiting.len(),
            waiting_patients
        )));
    }

    let telemetry = world
        .get_resource::<SimTelemetry>()
        .ok_or(SimulationError::NotInitialized)?;
    if telemetry.resolved() > telemetry.patients_total {
        return Err(SimulationError::InvariantViolation(format!(
            "{} resolved patients but only {} arrived",
            telemetry.resolved(),
            telemetry.patients_total
        )));
    }
    Ok(())
}
