use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::TreatmentRooms;
use crate::scenario::CareProtocol;
use crate::telemetry::SimTelemetry;

/// TICK: periodic room check.
///
/// Schedules a FREE_ROOM check now when a room is idle and re-arms itself.
/// Once every generated patient is resolved the tick stops re-arming, which
/// is what lets the event queue drain.
pub fn tick_system(
    event: Res<CurrentEvent>,
    protocol: Res<CareProtocol>,
    rooms: Res<TreatmentRooms>,
    telemetry: Res<SimTelemetry>,
    mut clock: ResMut<SimulationClock>,
) {
    if event.0.kind != EventKind::Tick {
        return;
    }
    if telemetry.all_resolved() {
        debug!(resolved = telemetry.resolved(), "all patients resolved, tick stops");
        return;
    }

    if rooms.free > 0 {
        clock.schedule_in(0, EventKind::FreeRoom, None);
    }
    clock.schedule_in(protocol.tick_interval_ms, EventKind::Tick, None);
}
