use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::warn;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientState, TreatmentRooms};
use crate::telemetry::{DischargeRecord, SimTelemetry};

/// TREATED: discharges the patient, releases the room and immediately checks
/// it for the next waiting patient.
pub fn treated_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    mut rooms: ResMut<TreatmentRooms>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::Treated {
        return;
    }
    let Some(entity) = event.0.patient else {
        warn!("treated event without a patient");
        return;
    };
    let Ok(mut patient) = patients.get_mut(entity) else {
        return;
    };

    let now = clock.now();
    rooms.free += 1;
    telemetry.discharged += 1;
    patient.resolve(PatientState::Discharged, now);
    if let Some(record) = DischargeRecord::from_patient(&patient, now) {
        telemetry.discharges.push(record);
    }
    clock.schedule_in(0, EventKind::FreeRoom, None);
}
