//! Test helpers for common test setup and utilities.
//!
//! Handler systems are exercised one at a time: build a world with the engine
//! resources, spawn patients in the state a handler expects, deliver a single
//! event and run just that system.

use bevy_ecs::prelude::{Entity, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientId, PatientState, Severity, TreatmentRooms};
use crate::scenario::CareProtocol;
use crate::telemetry::{EventMetrics, SimTelemetry};
use crate::triage::{TriagePolicy, WaitingEntry, WaitingList};

/// A world with every engine resource at its default and `room_count` free rooms.
pub fn create_test_world(room_count: u32) -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(CareProtocol::default());
    world.insert_resource(TreatmentRooms::new(room_count));
    world.insert_resource(WaitingList::default());
    world.insert_resource(TriagePolicy::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(EventMetrics::default());
    world
}

pub fn spawn_patient(world: &mut World, id: u32, arrival_time: u64) -> Entity {
    world.spawn(Patient::new(PatientId(id), arrival_time)).id()
}

/// Spawns a triaged patient and puts it on the waiting list.
pub fn spawn_waiting_patient(
    world: &mut World,
    id: u32,
    arrival_time: u64,
    severity: Severity,
) -> Entity {
    let mut patient = Patient::new(PatientId(id), arrival_time);
    patient.severity = severity;
    patient.state = PatientState::Waiting;
    patient.triaged_at = Some(arrival_time);
    let entity = world.spawn(patient).id();
    world
        .resource_mut::<WaitingList>()
        .insert(WaitingEntry::new(entity, &patient));
    world.resource_mut::<SimTelemetry>().patients_total += 1;
    entity
}

/// Spawns a patient already occupying a room, and takes that room.
pub fn spawn_patient_in_treatment(
    world: &mut World,
    id: u32,
    arrival_time: u64,
    severity: Severity,
    admitted_at: u64,
) -> Entity {
    let mut patient = Patient::new(PatientId(id), arrival_time);
    patient.severity = severity;
    patient.state = PatientState::InTreatment;
    patient.triaged_at = Some(arrival_time);
    patient.admitted_at = Some(admitted_at);
    let entity = world.spawn(patient).id();
    world.resource_mut::<TreatmentRooms>().free -= 1;
    world.resource_mut::<SimTelemetry>().patients_total += 1;
    entity
}

/// Schedules the event, pops it (advancing the clock) and makes it current.
pub fn deliver_event(
    world: &mut World,
    timestamp: u64,
    kind: EventKind,
    patient: Option<Entity>,
) -> Event {
    let event = {
        let mut clock = world.resource_mut::<SimulationClock>();
        clock.schedule_at(timestamp, kind, patient);
        let event = clock.pop_next().expect("event just scheduled");
        event
    };
    world.insert_resource(CurrentEvent(event));
    event
}

/// Runs a single system once against `world`.
pub fn run_system<M>(world: &mut World, system: impl IntoSystemConfigs<M>) {
    let mut schedule = Schedule::default();
    schedule.add_systems(system);
    schedule.run(world);
}

/// Drains the clock without running any handler, returning what was pending.
pub fn drain_scheduled(world: &mut World) -> Vec<Event> {
    let mut clock = world.resource_mut::<SimulationClock>();
    let events: Vec<Event> = std::iter::from_fn(|| clock.pop_next()).collect();
    events
}

pub fn patient(world: &World, entity: Entity) -> Patient {
    *world.get::<Patient>(entity).expect("patient entity")
}
