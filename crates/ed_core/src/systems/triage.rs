use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{trace, warn};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientState};
use crate::scenario::CareProtocol;
use crate::triage::{TriagePolicy, WaitingEntry, WaitingList};

/// TRIAGE: assigns a severity, queues the patient and arms its timeout.
pub fn triage_system(
    event: Res<CurrentEvent>,
    protocol: Res<CareProtocol>,
    mut clock: ResMut<SimulationClock>,
    mut policy: ResMut<TriagePolicy>,
    mut waiting: ResMut<WaitingList>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::Triage {
        return;
    }
    let Some(entity) = event.0.patient else {
        warn!("triage event without a patient");
        return;
    };
    let Ok(mut patient) = patients.get_mut(entity) else {
        return;
    };

    let now = clock.now();
    let severity = policy.assign();
    patient.severity = severity;
    patient.state = PatientState::Waiting;
    patient.triaged_at = Some(now);
    waiting.insert(WaitingEntry::new(entity, &patient));
    trace!(patient = %patient.id, ?severity, waiting = waiting.len(), "triaged");

    if let Some(threshold) = protocol.timeout.for_severity(severity) {
        clock.schedule_in(threshold, EventKind::Timeout, Some(entity));
    }
}
