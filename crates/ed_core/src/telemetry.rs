//! Telemetry / KPIs: outcome counters and discharge records.

use std::collections::BTreeMap;
use std::fmt;

use bevy_ecs::prelude::{Resource, World};
use serde::Serialize;

use crate::clock::{format_time_of_day, EventKind, SimulationClock};
use crate::ecs::{Patient, PatientId, Severity};

/// One discharged patient, recorded when treatment ends.
/// Timestamps are simulation ms; use the helper methods for derived KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DischargeRecord {
    pub patient: PatientId,
    /// Severity at admission (after any escalation).
    pub severity: Severity,
    pub arrived_at: u64,
    pub triaged_at: u64,
    pub admitted_at: u64,
    pub discharged_at: u64,
}

impl DischargeRecord {
    /// Builds a record for a patient whose triage and admission are both known.
    pub fn from_patient(patient: &Patient, discharged_at: u64) -> Option<Self> {
        Some(Self {
            patient: patient.id,
            severity: patient.severity,
            arrived_at: patient.arrival_time,
            triaged_at: patient.triaged_at?,
            admitted_at: patient.admitted_at?,
            discharged_at,
        })
    }

    /// Time spent on the waiting list.
    pub fn waiting_time(&self) -> u64 {
        self.admitted_at.saturating_sub(self.triaged_at)
    }

    /// Time from arrival to admission, triage included.
    pub fn time_to_admission(&self) -> u64 {
        self.admitted_at.saturating_sub(self.arrived_at)
    }

    pub fn treatment_duration(&self) -> u64 {
        self.discharged_at.saturating_sub(self.admitted_at)
    }
}

/// Outcome counters for one run. Every counter only ever grows.
#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    /// Patients generated by the scenario.
    pub patients_scheduled: usize,
    /// Patients whose arrival has fired.
    pub patients_total: usize,
    pub discharged: usize,
    /// WHITE patients who timed out and left.
    pub abandoned: usize,
    /// RED patients who timed out.
    pub deceased: usize,
    /// YELLOW patients escalated to RED on timeout.
    pub escalated: usize,
    pub discharges: Vec<DischargeRecord>,
}

impl SimTelemetry {
    pub fn with_scheduled(patients_scheduled: usize) -> Self {
        Self {
            patients_scheduled,
            ..Default::default()
        }
    }

    /// Patients in a terminal state.
    pub fn resolved(&self) -> usize {
        self.discharged + self.abandoned + self.deceased
    }

    pub fn all_resolved(&self) -> bool {
        self.resolved() >= self.patients_scheduled
    }
}

/// Event processing counts, per kind.
#[derive(Debug, Default, Resource)]
pub struct EventMetrics {
    pub events_processed: u64,
    pub events_by_kind: BTreeMap<EventKind, u64>,
}

impl EventMetrics {
    pub fn record_event(&mut self, kind: EventKind) {
        self.events_processed += 1;
        *self.events_by_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn count(&self, kind: EventKind) -> u64 {
        self.events_by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Final counters of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub patients_total: usize,
    pub discharged: usize,
    pub abandoned: usize,
    pub deceased: usize,
    pub escalated: usize,
    pub events_processed: u64,
    /// Clock value after the last processed event.
    pub final_time_ms: u64,
}

impl SimulationReport {
    /// `None` if the world was not built by the scenario builder.
    pub fn from_world(world: &World) -> Option<Self> {
        let telemetry = world.get_resource::<SimTelemetry>()?;
        let clock = world.get_resource::<SimulationClock>()?;
        let events_processed = world
            .get_resource::<EventMetrics>()
            .map_or(0, |metrics| metrics.events_processed);
        Some(Self {
            patients_total: telemetry.patients_total,
            discharged: telemetry.discharged,
            abandoned: telemetry.abandoned,
            deceased: telemetry.deceased,
            escalated: telemetry.escalated,
            events_processed,
            final_time_ms: clock.now(),
        })
    }

    pub fn resolved(&self) -> usize {
        self.discharged + self.abandoned + self.deceased
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "patients={} discharged={} abandoned={} deceased={} escalated={} events={} ended_at={}",
            self.patients_total,
            self.discharged,
            self.abandoned,
            self.deceased,
            self.escalated,
            self.events_processed,
            format_time_of_day(self.final_time_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discharge_record_durations() {
        let mut patient = Patient::new(PatientId(0), 100);
        patient.severity = Severity::Yellow;
        patient.triaged_at = Some(400);
        patient.admitted_at = Some(1000);
        let record = DischargeRecord::from_patient(&patient, 1900).expect("record");
        assert_eq!(record.waiting_time(), 600);
        assert_eq!(record.time_to_admission(), 900);
        assert_eq!(record.treatment_duration(), 900);
    }

    #[test]
    fn discharge_record_requires_admission() {
        let patient = Patient::new(PatientId(0), 100);
        assert!(DischargeRecord::from_patient(&patient, 200).is_none());
    }

    #[test]
    fn resolution_counts_terminal_outcomes() {
        let mut telemetry = SimTelemetry::with_scheduled(4);
        telemetry.discharged = 2;
        telemetry.abandoned = 1;
        assert_eq!(telemetry.resolved(), 3);
        assert!(!telemetry.all_resolved());
        telemetry.deceased = 1;
        assert!(telemetry.all_resolved());
    }

    #[test]
    fn event_metrics_count_by_kind() {
        let mut metrics = EventMetrics::default();
        metrics.record_event(EventKind::Tick);
        metrics.record_event(EventKind::Tick);
        metrics.record_event(EventKind::Arrival);
        assert_eq!(metrics.events_processed, 3);
        assert_eq!(metrics.count(EventKind::Tick), 2);
        assert_eq!(metrics.count(EventKind::Timeout), 0);
    }
}
