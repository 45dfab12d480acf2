use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{trace, warn};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientState, TreatmentRooms};
use crate::scenario::CareProtocol;
use crate::triage::WaitingList;

/// FREE_ROOM: admits the most urgent waiting patient into a free room.
///
/// Several checks can land on the same instant (a discharge and a tick), so a
/// check that finds no free room does nothing.
pub fn free_room_system(
    event: Res<CurrentEvent>,
    protocol: Res<CareProtocol>,
    mut clock: ResMut<SimulationClock>,
    mut rooms: ResMut<TreatmentRooms>,
    mut waiting: ResMut<WaitingList>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::FreeRoom {
        return;
    }
    if rooms.free == 0 {
        trace!("room check found no free room");
        return;
    }
    let Some(entry) = waiting.pop_next() else {
        return;
    };
    let Ok(mut patient) = patients.get_mut(entry.patient) else {
        warn!(patient = %entry.id, "waiting entry without a patient");
        return;
    };
    let Some(duration) = protocol.treatment.for_severity(patient.severity) else {
        warn!(patient = %entry.id, "admitted patient has no severity");
        return;
    };

    let now = clock.now();
    rooms.free -= 1;
    patient.state = PatientState::InTreatment;
    patient.admitted_at = Some(now);
    trace!(patient = %patient.id, severity = ?patient.severity, free_rooms = rooms.free, "admitted");
    clock.schedule_in(duration, EventKind::Treated, Some(entry.patient));
}
