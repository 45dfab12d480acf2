use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::warn;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientState};
use crate::scenario::CareProtocol;
use crate::telemetry::SimTelemetry;

/// ARRIVAL: counts the patient in and schedules the end of triage.
pub fn arrival_system(
    event: Res<CurrentEvent>,
    protocol: Res<CareProtocol>,
    mut clock: ResMut<SimulationClock>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::Arrival {
        return;
    }
    let Some(entity) = event.0.patient else {
        warn!("arrival event without a patient");
        return;
    };
    let Ok(mut patient) = patients.get_mut(entity) else {
        return;
    };

    patient.state = PatientState::InTriage;
    telemetry.patients_total += 1;
    clock.schedule_in(protocol.triage_ms, EventKind::Triage, Some(entity));
}
