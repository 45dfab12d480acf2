//! Event trace: an observer that records every processed event.
//!
//! Attach it through the run hook, e.g.
//! `simulator.run_with_hook(|world, event| trace.record(world, event))`.

use std::fmt;

use bevy_ecs::prelude::World;
use serde::Serialize;

use crate::clock::{format_time_of_day, Event, EventKind};
use crate::ecs::{Patient, PatientId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    pub timestamp: u64,
    pub kind: EventKind,
    pub patient: Option<PatientId>,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_time_of_day(self.timestamp), self.kind)?;
        if let Some(patient) = self.patient {
            write!(f, " {patient}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventTrace {
    records: Vec<TraceRecord>,
}

impl EventTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, world: &World, event: &Event) {
        let patient = event
            .patient
            .and_then(|entity| world.get::<Patient>(entity))
            .map(|patient| patient.id);
        self.records.push(TraceRecord {
            timestamp: event.timestamp,
            kind: event.kind,
            patient,
        });
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_time_ordered(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    /// One line per record, in processing order.
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(ToString::to_string).collect()
    }
}
