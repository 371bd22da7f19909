//! Navigator context
//!
//! The [`Navigator`] trait is the seam between the autonomous modes and
//! the rest of the flight stack. A mode receives it on every lifecycle
//! call, reads this cycle's telemetry through it, and writes its single
//! target into the position setpoint triplet it owns.
//!
//! - `types`: telemetry snapshot types
//! - `reach`: reference "mission item reached" predicate with dwell timing
//! - `mock`: in-memory navigator for host tests

mod mock;
mod reach;
mod types;

pub use mock::MockNavigator;
pub use reach::{ReachDetector, YAW_ACCEPTANCE_RAD};
pub use types::{GlobalPosition, HomePosition, VehicleSnapshot, VehicleStatus};

use crate::mission::MissionItem;
use crate::navigation::PositionSetpointTriplet;
use crate::parameters::ParameterStore;
use crate::status::Severity;

/// Services and state a navigator mode runs against
pub trait Navigator {
    /// Current global position estimate
    fn global_position(&self) -> GlobalPosition;

    /// Home position
    fn home_position(&self) -> HomePosition;

    /// Land detector output
    fn land_detected(&self) -> bool;

    /// Airframe capabilities
    fn vehicle_status(&self) -> VehicleStatus;

    /// Default loiter radius in meters
    fn loiter_radius(&self) -> f32;

    /// Default horizontal acceptance radius in meters
    fn acceptance_radius(&self) -> f32;

    /// True if the vehicle may keep holding at the current setpoint after the
    /// mode is deselected
    fn can_loiter_at_sp(&self) -> bool;

    fn set_can_loiter_at_sp(&mut self, can_loiter: bool);

    /// Live parameter store
    fn parameters(&self) -> &ParameterStore;

    /// True once the vehicle has satisfied `item`
    fn is_mission_item_reached(&mut self, item: &MissionItem) -> bool;

    /// Restart reach detection for a new item
    fn reset_mission_item_reached(&mut self);

    /// Dispatch a pure command (no positional meaning) to the vehicle
    fn issue_command(&mut self, item: &MissionItem);

    /// Queue an operator diagnostic message
    fn send_status(&mut self, severity: Severity, text: &str);

    fn position_setpoint_triplet(&self) -> &PositionSetpointTriplet;

    fn position_setpoint_triplet_mut(&mut self) -> &mut PositionSetpointTriplet;

    /// Flag the triplet for publication to the position controller
    fn set_position_setpoint_triplet_updated(&mut self);

    /// All telemetry for this cycle in one value
    fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            global_position: self.global_position(),
            home_position: self.home_position(),
            land_detected: self.land_detected(),
            vehicle_status: self.vehicle_status(),
        }
    }
}
