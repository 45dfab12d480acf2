//! Simulation clock: logical time plus the pending event queue.
//!
//! Time is a count of milliseconds since midnight of the simulated day. It has
//! no relation to wall-clock time and only advances when an event is popped.

use std::cmp::Ordering;
use std::fmt;

use bevy_ecs::prelude::{Entity, Resource};
use serde::Serialize;

use crate::queue::PriorityQueue;

pub const ONE_SEC_MS: u64 = 1000;
pub const ONE_MIN_MS: u64 = 60 * ONE_SEC_MS;
pub const ONE_HOUR_MS: u64 = 60 * ONE_MIN_MS;

/// Milliseconds since midnight for `hours:minutes`.
pub const fn time_of_day(hours: u64, minutes: u64) -> u64 {
    hours * ONE_HOUR_MS + minutes * ONE_MIN_MS
}

pub const fn minutes(count: u64) -> u64 {
    count * ONE_MIN_MS
}

/// Formats a timestamp as `HH:MM`; hours keep counting past midnight.
pub fn format_time_of_day(timestamp: u64) -> String {
    let hours = timestamp / ONE_HOUR_MS;
    let mins = (timestamp % ONE_HOUR_MS) / ONE_MIN_MS;
    format!("{hours:02}:{mins:02}")
}

/// Kinds of events driving the department.
///
/// Declaration order is the tie-break between events sharing a timestamp:
/// patients reach the waiting list first, finished treatments release their
/// rooms, freed rooms admit before any timeout at the same instant, and the
/// periodic tick runs last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EventKind {
    Arrival,
    Triage,
    Treated,
    FreeRoom,
    Timeout,
    Tick,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Arrival => "ARRIVAL",
            EventKind::Triage => "TRIAGE",
            EventKind::Treated => "TREATED",
            EventKind::FreeRoom => "FREE_ROOM",
            EventKind::Timeout => "TIMEOUT",
            EventKind::Tick => "TICK",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    /// Patient entity the event concerns; `None` for room checks and ticks.
    pub patient: Option<Entity>,
}

/// The event being processed by the current schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Clone, Copy)]
struct ScheduledEvent {
    seq: u64,
    event: Event,
}

/// Timestamp, then kind, then insertion order.
fn event_order(a: &ScheduledEvent, b: &ScheduledEvent) -> Ordering {
    a.event
        .timestamp
        .cmp(&b.event.timestamp)
        .then_with(|| a.event.kind.cmp(&b.event.kind))
        .then_with(|| a.seq.cmp(&b.seq))
}

#[derive(Debug, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: PriorityQueue<ScheduledEvent>,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl SimulationClock {
    pub fn starting_at(now: u64) -> Self {
        Self {
            now,
            next_seq: 0,
            events: PriorityQueue::new(event_order),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, event: Event) {
        debug_assert!(
            event.timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(ScheduledEvent { seq, event });
    }

    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, patient: Option<Entity>) {
        self.schedule(Event {
            timestamp,
            kind,
            patient,
        });
    }

    /// Schedules `delay_ms` after the current time.
    pub fn schedule_in(&mut self, delay_ms: u64, kind: EventKind, patient: Option<Entity>) {
        let timestamp = self.now.saturating_add(delay_ms);
        self.schedule_at(timestamp, kind, patient);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let scheduled = self.events.pop()?;
        self.now = scheduled.event.timestamp;
        Some(scheduled.event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|scheduled| scheduled.event.timestamp)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
