//! Triage: severity assignment and the waiting list of triaged patients.

use std::cmp::Ordering;

use bevy_ecs::prelude::{Entity, Resource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ecs::{Patient, PatientId, Severity};
use crate::queue::PriorityQueue;

/// One step of the cyclic rotation: returns the severity to assign now and the
/// one to assign on the following call. The rotation starts at WHITE.
pub fn next_severity(current: Severity) -> (Severity, Severity) {
    match current {
        Severity::Unassigned | Severity::White => (Severity::White, Severity::Yellow),
        Severity::Yellow => (Severity::Yellow, Severity::Red),
        Severity::Red => (Severity::Red, Severity::White),
    }
}

/// How triage picks a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriagePolicyKind {
    /// WHITE, YELLOW, RED, WHITE, ...
    #[default]
    Cyclic,
    /// Uniform over the three colours from a seeded RNG.
    Random { seed: u64 },
}

#[derive(Debug, Resource)]
pub enum TriagePolicy {
    Cyclic { next: Severity },
    Random { rng: StdRng },
}

impl TriagePolicy {
    pub fn from_kind(kind: &TriagePolicyKind) -> Self {
        match kind {
            TriagePolicyKind::Cyclic => TriagePolicy::Cyclic {
                next: Severity::White,
            },
            TriagePolicyKind::Random { seed } => TriagePolicy::Random {
                rng: StdRng::seed_from_u64(*seed),
            },
        }
    }

    /// Severity for the patient being triaged now. Advances the policy state.
    pub fn assign(&mut self) -> Severity {
        match self {
            TriagePolicy::Cyclic { next } => {
                let (assigned, following) = next_severity(*next);
                *next = following;
                assigned
            }
            TriagePolicy::Random { rng } => match rng.gen_range(0..3) {
                0 => Severity::White,
                1 => Severity::Yellow,
                _ => Severity::Red,
            },
        }
    }
}

impl Default for TriagePolicy {
    fn default() -> Self {
        TriagePolicy::from_kind(&TriagePolicyKind::Cyclic)
    }
}

/// Snapshot of the fields the waiting-list order depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitingEntry {
    pub patient: Entity,
    pub id: PatientId,
    pub severity: Severity,
    pub arrival_time: u64,
}

impl WaitingEntry {
    pub fn new(entity: Entity, patient: &Patient) -> Self {
        Self {
            patient: entity,
            id: patient.id,
            severity: patient.severity,
            arrival_time: patient.arrival_time,
        }
    }
}

/// Most urgent severity first, then earliest arrival, then lowest id.
pub fn triage_order(a: &WaitingEntry, b: &WaitingEntry) -> Ordering {
    a.severity
        .urgency_rank()
        .cmp(&b.severity.urgency_rank())
        .then_with(|| a.arrival_time.cmp(&b.arrival_time))
        .then_with(|| a.id.cmp(&b.id))
}

#[derive(Debug, Clone, Resource)]
pub struct WaitingList {
    queue: PriorityQueue<WaitingEntry>,
}

impl Default for WaitingList {
    fn default() -> Self {
        Self {
            queue: PriorityQueue::new(triage_order),
        }
    }
}

impl WaitingList {
    pub fn insert(&mut self, entry: WaitingEntry) {
        debug_assert!(
            !self.contains(entry.patient),
            "patient is already on the waiting list"
        );
        self.queue.push(entry);
    }

    /// Takes the highest-priority patient off the list.
    pub fn pop_next(&mut self) -> Option<WaitingEntry> {
        self.queue.pop()
    }

    pub fn peek(&self) -> Option<&WaitingEntry> {
        self.queue.peek()
    }

    /// Removes `patient` by identity; `None` if it is not waiting.
    pub fn remove(&mut self, patient: Entity) -> Option<WaitingEntry> {
        self.queue.remove_first(|entry| entry.patient == patient)
    }

    pub fn contains(&self, patient: Entity) -> bool {
        self.queue.contains(|entry| entry.patient == patient)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
