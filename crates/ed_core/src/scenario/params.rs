use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::{minutes, time_of_day};
use crate::ecs::Severity;
use crate::error::ConfigError;
use crate::triage::TriagePolicyKind;

const DEFAULT_ROOM_COUNT: u32 = 5;
const DEFAULT_PATIENT_COUNT: usize = 150;
const DEFAULT_ARRIVAL_INTERVAL_MINS: u64 = 5;

/// Arrivals are generated from 08:00 up to (not including) 20:00.
const DEFAULT_WINDOW_START_MS: u64 = time_of_day(8, 0);
const DEFAULT_WINDOW_END_MS: u64 = time_of_day(20, 0);

/// One duration per assigned severity (simulation ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityDurations {
    pub white_ms: u64,
    pub yellow_ms: u64,
    pub red_ms: u64,
}

impl SeverityDurations {
    pub const fn from_minutes(white: u64, yellow: u64, red: u64) -> Self {
        Self {
            white_ms: minutes(white),
            yellow_ms: minutes(yellow),
            red_ms: minutes(red),
        }
    }

    /// `None` for [Severity::Unassigned].
    pub fn for_severity(&self, severity: Severity) -> Option<u64> {
        match severity {
            Severity::White => Some(self.white_ms),
            Severity::Yellow => Some(self.yellow_ms),
            Severity::Red => Some(self.red_ms),
            Severity::Unassigned => None,
        }
    }

    fn any_zero(&self) -> bool {
        self.white_ms == 0 || self.yellow_ms == 0 || self.red_ms == 0
    }
}

/// Fixed care durations shared by every patient.
///
/// Treatment grows with urgency (WHITE < YELLOW < RED). Timeouts follow triage
/// urgency instead: YELLOW escalates soonest, RED is given longer, WHITE
/// patients wait longest before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct CareProtocol {
    pub triage_ms: u64,
    pub treatment: SeverityDurations,
    pub timeout: SeverityDurations,
    /// Period of the room-check tick.
    pub tick_interval_ms: u64,
}

impl Default for CareProtocol {
    fn default() -> Self {
        Self {
            triage_ms: minutes(5),
            treatment: SeverityDurations::from_minutes(10, 15, 30),
            timeout: SeverityDurations::from_minutes(90, 30, 60),
            tick_interval_ms: minutes(5),
        }
    }
}

impl CareProtocol {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.triage_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                what: "triage duration",
            });
        }
        if self.treatment.any_zero() {
            return Err(ConfigError::ZeroDuration {
                what: "treatment duration",
            });
        }
        if self.timeout.any_zero() {
            return Err(ConfigError::ZeroDuration {
                what: "timeout threshold",
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                what: "tick interval",
            });
        }
        Ok(())
    }
}

/// Parameters for one simulation run. Immutable once the run is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Number of treatment rooms.
    pub room_count: u32,
    /// Upper bound on generated arrivals.
    pub patient_count: usize,
    /// Spacing between successive arrivals (simulation ms).
    pub arrival_interval_ms: u64,
    /// Arrivals are generated while `time < window_end_ms`.
    pub window_start_ms: u64,
    pub window_end_ms: u64,
    pub protocol: CareProtocol,
    pub triage_policy: TriagePolicyKind,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            room_count: DEFAULT_ROOM_COUNT,
            patient_count: DEFAULT_PATIENT_COUNT,
            arrival_interval_ms: minutes(DEFAULT_ARRIVAL_INTERVAL_MINS),
            window_start_ms: DEFAULT_WINDOW_START_MS,
            window_end_ms: DEFAULT_WINDOW_END_MS,
            protocol: CareProtocol::default(),
            triage_policy: TriagePolicyKind::default(),
        }
    }
}

impl SimulationParams {
    pub fn with_room_count(mut self, rooms: u32) -> Self {
        self.room_count = rooms;
        self
    }

    pub fn with_patient_count(mut self, patients: usize) -> Self {
        self.patient_count = patients;
        self
    }

    pub fn with_arrival_interval_mins(mut self, mins: u64) -> Self {
        self.arrival_interval_ms = minutes(mins);
        self
    }

    /// Arrival window as `[start_ms, end_ms)`; see [time_of_day].
    pub fn with_window(mut self, start_ms: u64, end_ms: u64) -> Self {
        self.window_start_ms = start_ms;
        self.window_end_ms = end_ms;
        self
    }

    pub fn with_protocol(mut self, protocol: CareProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_triage_policy(mut self, policy: TriagePolicyKind) -> Self {
        self.triage_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_count == 0 {
            return Err(ConfigError::NonPositiveRoomCount);
        }
        if self.patient_count == 0 {
            return Err(ConfigError::NonPositivePatientCount);
        }
        if self.arrival_interval_ms == 0 {
            return Err(ConfigError::NonPositiveArrivalInterval);
        }
        if self.window_end_ms <= self.window_start_ms {
            return Err(ConfigError::EmptyWindow {
                start: self.window_start_ms,
                end: self.window_end_ms,
            });
        }
        self.protocol.validate()
    }

    /// Arrival timestamps: `start, start + interval, ...` until either
    /// `patient_count` is reached or the next arrival falls at or after the
    /// window end.
    pub fn arrival_times(&self) -> Vec<u64> {
        let mut times = Vec::new();
        if self.arrival_interval_ms == 0 {
            return times;
        }
        let mut at = self.window_start_ms;
        while times.len() < self.patient_count && at < self.window_end_ms {
            times.push(at);
            at = at.saturating_add(self.arrival_interval_ms);
        }
        times
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(SimulationParams::default().validate(), Ok(()));
    }

    #[test]
    fn arrivals_stop_at_patient_count() {
        let params = SimulationParams::default().with_patient_count(3);
        assert_eq!(
            params.arrival_times(),
            vec![time_of_day(8, 0), time_of_day(8, 5), time_of_day(8, 10)]
        );
    }

    #[test]
    fn arrivals_stop_before_window_end() {
        let params = SimulationParams::default()
            .with_patient_count(100)
            .with_window(time_of_day(8, 0), time_of_day(8, 10));
        assert_eq!(
            params.arrival_times(),
            vec![time_of_day(8, 0), time_of_day(8, 5)]
        );
    }

    #[test]
    fn default_day_is_limited_by_the_window() {
        // 12h at one arrival every 5 minutes.
        assert_eq!(SimulationParams::default().arrival_times().len(), 144);
    }

    #[test]
    fn rejects_non_positive_values() {
        let base = SimulationParams::default();
        assert_eq!(
            base.clone().with_room_count(0).validate(),
            Err(ConfigError::NonPositiveRoomCount)
        );
        assert_eq!(
            base.clone().with_patient_count(0).validate(),
            Err(ConfigError::NonPositivePatientCount)
        );
        assert_eq!(
            base.clone().with_arrival_interval_mins(0).validate(),
            Err(ConfigError::NonPositiveArrivalInterval)
        );
        assert_eq!(
            base.clone()
                .with_window(time_of_day(9, 0), time_of_day(9, 0))
                .validate(),
            Err(ConfigError::EmptyWindow {
                start: time_of_day(9, 0),
                end: time_of_day(9, 0),
            })
        );

        let protocol = CareProtocol {
            tick_interval_ms: 0,
            ..CareProtocol::default()
        };
        assert_eq!(
            base.with_protocol(protocol).validate(),
            Err(ConfigError::ZeroDuration {
                what: "tick interval"
            })
        );
    }

    #[test]
    fn durations_by_severity() {
        let protocol = CareProtocol::default();
        assert_eq!(protocol.treatment.for_severity(Severity::White), Some(minutes(10)));
        assert_eq!(protocol.timeout.for_severity(Severity::Yellow), Some(minutes(30)));
        assert_eq!(protocol.timeout.for_severity(Severity::Unassigned), None);
    }
}
