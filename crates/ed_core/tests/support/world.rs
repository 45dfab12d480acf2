#![allow(dead_code)]

use bevy_ecs::prelude::World;
use ed_core::clock::time_of_day;
use ed_core::scenario::{build_scenario, CareProtocol, SimulationParams, TriagePolicyKind};

/// Builder for reproducible test worlds populated by the scenario builder.
#[derive(Clone, Debug)]
pub struct TestWorldBuilder {
    params: SimulationParams,
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorldBuilder {
    /// One room, morning window starting 08:00, default protocol.
    pub fn new() -> Self {
        Self {
            params: SimulationParams::default()
                .with_room_count(1)
                .with_window(time_of_day(8, 0), time_of_day(20, 0)),
        }
    }

    pub fn with_rooms(mut self, rooms: u32) -> Self {
        self.params.room_count = rooms;
        self
    }

    pub fn with_patients(mut self, patients: usize) -> Self {
        self.params.patient_count = patients;
        self
    }

    pub fn with_interval_mins(mut self, mins: u64) -> Self {
        self.params = self.params.with_arrival_interval_mins(mins);
        self
    }

    pub fn with_window(mut self, start_ms: u64, end_ms: u64) -> Self {
        self.params = self.params.with_window(start_ms, end_ms);
        self
    }

    pub fn with_protocol(mut self, protocol: CareProtocol) -> Self {
        self.params.protocol = protocol;
        self
    }

    pub fn with_policy(mut self, policy: TriagePolicyKind) -> Self {
        self.params.triage_policy = policy;
        self
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn build(self) -> World {
        let mut world = World::new();
        build_scenario(&mut world, &self.params).expect("test params are valid");
        world
    }
}
