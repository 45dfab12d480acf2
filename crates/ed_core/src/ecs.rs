use std::fmt;

use bevy_ecs::prelude::{Component, Resource};
use serde::{Deserialize, Serialize};

/// Acuity colour code assigned at triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Unassigned,
    White,
    Yellow,
    Red,
}

impl Severity {
    /// Waiting-list rank; lower is served first.
    pub fn urgency_rank(self) -> u8 {
        match self {
            Severity::Red => 0,
            Severity::Yellow => 1,
            Severity::White => 2,
            Severity::Unassigned => 3,
        }
    }

    pub fn is_assigned(self) -> bool {
        self != Severity::Unassigned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(pub u32);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patient#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientState {
    /// Generated by the scenario, arrival not yet fired.
    Scheduled,
    InTriage,
    Waiting,
    InTreatment,
    Discharged,
    Abandoned,
    Deceased,
}

impl PatientState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PatientState::Discharged | PatientState::Abandoned | PatientState::Deceased
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Patient {
    pub id: PatientId,
    pub arrival_time: u64,
    pub severity: Severity,
    pub state: PatientState,
    /// Set when triage assigns a severity.
    pub triaged_at: Option<u64>,
    /// Set when a room is assigned.
    pub admitted_at: Option<u64>,
    /// Set when the patient reaches a terminal state.
    pub resolved_at: Option<u64>,
}

impl Patient {
    pub fn new(id: PatientId, arrival_time: u64) -> Self {
        Self {
            id,
            arrival_time,
            severity: Severity::Unassigned,
            state: PatientState::Scheduled,
            triaged_at: None,
            admitted_at: None,
            resolved_at: None,
        }
    }

    pub fn resolve(&mut self, state: PatientState, at: u64) {
        debug_assert!(state.is_terminal(), "resolve expects a terminal state");
        self.state = state;
        self.resolved_at = Some(at);
    }
}

/// Treatment room availability. `free` never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource)]
pub struct TreatmentRooms {
    pub total: u32,
    pub free: u32,
}

impl TreatmentRooms {
    pub fn new(total: u32) -> Self {
        Self { total, free: total }
    }

    pub fn occupied(&self) -> u32 {
        self.total.saturating_sub(self.free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_outranks_yellow_outranks_white() {
        assert!(Severity::Red.urgency_rank() < Severity::Yellow.urgency_rank());
        assert!(Severity::Yellow.urgency_rank() < Severity::White.urgency_rank());
        assert!(!Severity::Unassigned.is_assigned());
    }

    #[test]
    fn new_patient_is_unassigned_and_scheduled() {
        let patient = Patient::new(PatientId(3), 42);
        assert_eq!(patient.severity, Severity::Unassigned);
        assert_eq!(patient.state, PatientState::Scheduled);
        assert_eq!(patient.id.to_string(), "patient#3");
    }

    #[test]
    fn rooms_track_occupancy() {
        let mut rooms = TreatmentRooms::new(3);
        rooms.free -= 2;
        assert_eq!(rooms.occupied(), 2);
    }
}
