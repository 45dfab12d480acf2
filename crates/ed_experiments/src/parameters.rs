//! Parameter variation framework for exploring the simulation's configuration.
//!
//! Supports grid search (cartesian product) and random sampling. Dimensions
//! left empty take their value from the base [SimulationParams].

use std::collections::HashSet;

use ed_core::clock::{minutes, ONE_MIN_MS};
use ed_core::scenario::{SimulationParams, TriagePolicyKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// A single parameter configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    pub params: SimulationParams,
    /// Identifies the parameter combination within a sweep.
    pub experiment_id: String,
    /// Position in the generated sweep.
    pub run_id: usize,
}

impl ParameterSet {
    pub fn new(params: SimulationParams, experiment_id: String, run_id: usize) -> Self {
        Self {
            params,
            experiment_id,
            run_id,
        }
    }

    pub fn arrival_interval_mins(&self) -> u64 {
        self.params.arrival_interval_ms / ONE_MIN_MS
    }
}

/// Defines a parameter space for exploration.
#[derive(Debug, Clone, Default)]
pub struct ParameterSpace {
    base: SimulationParams,
    room_counts: Vec<u32>,
    patient_counts: Vec<usize>,
    arrival_intervals_mins: Vec<u64>,
    triage_policies: Vec<TriagePolicyKind>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new parameter space for grid search.
    pub fn grid() -> Self {
        Self::new()
    }

    pub fn room_count(mut self, counts: Vec<u32>) -> Self {
        self.room_counts = counts;
        self
    }

    pub fn patient_count(mut self, counts: Vec<usize>) -> Self {
        self.patient_counts = counts;
        self
    }

    pub fn arrival_interval_mins(mut self, intervals: Vec<u64>) -> Self {
        self.arrival_intervals_mins = intervals;
        self
    }

    pub fn triage_policy(mut self, policies: Vec<TriagePolicyKind>) -> Self {
        self.triage_policies = policies;
        self
    }

    /// Set base parameters (used for every dimension left unspecified).
    pub fn with_base(mut self, base: SimulationParams) -> Self {
        self.base = base;
        self
    }

    fn rooms(&self) -> Vec<u32> {
        or_base(&self.room_counts, self.base.room_count)
    }

    fn patients(&self) -> Vec<usize> {
        or_base(&self.patient_counts, self.base.patient_count)
    }

    fn intervals_ms(&self) -> Vec<u64> {
        if self.arrival_intervals_mins.is_empty() {
            vec![self.base.arrival_interval_ms]
        } else {
            self.arrival_intervals_mins.iter().copied().map(minutes).collect()
        }
    }

    fn policies(&self) -> Vec<TriagePolicyKind> {
        or_base(&self.triage_policies, self.base.triage_policy)
    }

    fn params_for(
        &self,
        rooms: u32,
        patients: usize,
        interval_ms: u64,
        policy: TriagePolicyKind,
    ) -> SimulationParams {
        let mut params = self.base.clone();
        params.room_count = rooms;
        params.patient_count = patients;
        params.arrival_interval_ms = interval_ms;
        params.triage_policy = policy;
        params
    }

    /// Generate all parameter sets using grid search (cartesian product).
    ///
    /// Order is rooms, then patients, then interval, then policy, with the
    /// last dimension varying fastest.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let (rooms, patients, intervals, policies) =
            (self.rooms(), self.patients(), self.intervals_ms(), self.policies());
        let (patients, intervals, policies) = (&patients, &intervals, &policies);

        rooms
            .iter()
            .flat_map(|&room_count| {
                patients.iter().flat_map(move |&patient_count| {
                    intervals.iter().flat_map(move |&interval_ms| {
                        policies
                            .iter()
                            .map(move |&policy| (room_count, patient_count, interval_ms, policy))
                    })
                })
            })
            .enumerate()
            .map(|(run_id, (room_count, patient_count, interval_ms, policy))| {
                ParameterSet::new(
                    self.params_for(room_count, patient_count, interval_ms, policy),
                    format!("grid_{run_id}"),
                    run_id,
                )
            })
            .collect()
    }

    /// Draws up to `count` distinct parameter sets uniformly from the space.
    ///
    /// Stops early once the space is exhausted.
    pub fn sample_random(&self, count: usize, seed: u64) -> Vec<ParameterSet> {
        let (rooms, patients, intervals, policies) =
            (self.rooms(), self.patients(), self.intervals_ms(), self.policies());
        let space_size = rooms.len() * patients.len() * intervals.len() * policies.len();
        let target = count.min(space_size);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut seen = HashSet::new();
        let mut parameter_sets = Vec::with_capacity(target);
        while parameter_sets.len() < target {
            let pick = (
                rng.gen_range(0..rooms.len()),
                rng.gen_range(0..patients.len()),
                rng.gen_range(0..intervals.len()),
                rng.gen_range(0..policies.len()),
            );
            if !seen.insert(pick) {
                continue;
            }
            let run_id = parameter_sets.len();
            parameter_sets.push(ParameterSet::new(
                self.params_for(
                    rooms[pick.0],
                    patients[pick.1],
                    intervals[pick.2],
                    policies[pick.3],
                ),
                format!("random_{run_id}"),
                run_id,
            ));
        }
        parameter_sets
    }
}

fn or_base<T: Copy>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}
