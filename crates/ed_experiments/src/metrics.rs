//! Per-run summary metrics.

use ed_core::telemetry::{SimTelemetry, SimulationReport};
use serde::Serialize;

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Patients whose arrival fired.
    pub patients_total: usize,
    pub discharged: usize,
    pub abandoned: usize,
    pub deceased: usize,
    pub escalated: usize,
    /// Discharged / arrived; 0 when nobody arrived.
    pub discharge_rate: f64,
    /// Waiting time (triage to admission) of discharged patients.
    pub avg_wait_ms: f64,
    pub median_wait_ms: f64,
    pub p90_wait_ms: f64,
    /// Arrival to admission, triage included.
    pub avg_time_to_admission_ms: f64,
    pub events_processed: u64,
    pub final_time_ms: u64,
}

impl SimulationResult {
    /// Calculate average, median and p90 of `values`.
    fn calculate_stats(values: &[u64]) -> (f64, f64, f64) {
        if values.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();

        let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
        } else {
            sorted[mid] as f64
        };
        // floor(0.9 * (n - 1))
        let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
        let p90 = sorted[p90_idx.min(sorted.len() - 1)] as f64;

        (avg, median, p90)
    }

    pub fn from_run(report: &SimulationReport, telemetry: &SimTelemetry) -> Self {
        let waits: Vec<u64> = telemetry
            .discharges
            .iter()
            .map(|record| record.waiting_time())
            .collect();
        let admissions: Vec<u64> = telemetry
            .discharges
            .iter()
            .map(|record| record.time_to_admission())
            .collect();
        let (avg_wait_ms, median_wait_ms, p90_wait_ms) = Self::calculate_stats(&waits);
        let (avg_time_to_admission_ms, _, _) = Self::calculate_stats(&admissions);

        let discharge_rate = if report.patients_total > 0 {
            report.discharged as f64 / report.patients_total as f64
        } else {
            0.0
        };

        Self {
            patients_total: report.patients_total,
            discharged: report.discharged,
            abandoned: report.abandoned,
            deceased: report.deceased,
            escalated: report.escalated,
            discharge_rate,
            avg_wait_ms,
            median_wait_ms,
            p90_wait_ms,
            avg_time_to_admission_ms,
            events_processed: report.events_processed,
            final_time_ms: report.final_time_ms,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_result(discharged: usize) -> SimulationResult {
    SimulationResult {
        patients_total: 10,
        discharged,
        abandoned: 10 - discharged,
        deceased: 0,
        escalated: 0,
        discharge_rate: discharged as f64 / 10.0,
        avg_wait_ms: 60_000.0,
        median_wait_ms: 60_000.0,
        p90_wait_ms: 120_000.0,
        avg_time_to_admission_ms: 360_000.0,
        events_processed: 100,
        final_time_ms: 0,
    }
}
