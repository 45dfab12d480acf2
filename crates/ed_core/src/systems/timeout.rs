use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{debug, trace, warn};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientState, Severity};
use crate::scenario::CareProtocol;
use crate::telemetry::SimTelemetry;
use crate::triage::{WaitingEntry, WaitingList};

/// TIMEOUT: a patient waited past its severity's threshold.
///
/// Only patients still on the waiting list are affected; a timeout that fires
/// after admission is a no-op. WHITE leaves, YELLOW escalates to RED with a
/// fresh RED timeout, RED dies.
pub fn timeout_system(
    event: Res<CurrentEvent>,
    protocol: Res<CareProtocol>,
    mut clock: ResMut<SimulationClock>,
    mut waiting: ResMut<WaitingList>,
    mut telemetry: ResMut<SimTelemetry>,
    mut patients: Query<&mut Patient>,
) {
    if event.0.kind != EventKind::Timeout {
        return;
    }
    let Some(entity) = event.0.patient else {
        warn!("timeout event without a patient");
        return;
    };
    let Ok(mut patient) = patients.get_mut(entity) else {
        return;
    };
    if waiting.remove(entity).is_none() {
        trace!(patient = %patient.id, state = ?patient.state, "timeout after admission");
        return;
    }

    let now = clock.now();
    match patient.severity {
        Severity::White => {
            telemetry.abandoned += 1;
            patient.resolve(PatientState::Abandoned, now);
            debug!(patient = %patient.id, "left without treatment");
        }
        Severity::Yellow => {
            patient.severity = Severity::Red;
            telemetry.escalated += 1;
            waiting.insert(WaitingEntry::new(entity, &patient));
            clock.schedule_in(protocol.timeout.red_ms, EventKind::Timeout, Some(entity));
            debug!(patient = %patient.id, "escalated to red");
        }
        Severity::Red => {
            telemetry.deceased += 1;
            patient.resolve(PatientState::Deceased, now);
            debug!(patient = %patient.id, "died waiting");
        }
        Severity::Unassigned => {
            warn!(patient = %patient.id, "timeout for an untriaged patient");
        }
    }
}
