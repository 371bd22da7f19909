//! In-memory navigator for host testing
//!
//! Always compiled (not `cfg(test)`) so integration tests and firmware
//! simulators can drive the RTL state machine without hardware.

use heapless::Vec;

use crate::mission::MissionItem;
use crate::navigation::PositionSetpointTriplet;
use crate::parameters::{NavigatorParams, ParamValue, ParameterError, ParameterStore, RtlParams};
use crate::status::{Severity, StatusNotifier};
use crate::traits::MockTime;

use super::reach::ReachDetector;
use super::types::{GlobalPosition, HomePosition, VehicleSnapshot, VehicleStatus};
use super::Navigator;

/// Maximum number of recorded issued commands
pub const MAX_RECORDED_COMMANDS: usize = 8;

/// Scriptable navigator
///
/// Reach detection is either scripted through `reached` or, when a
/// `detector` is installed, evaluated against `snapshot` with a manual
/// clock.
pub struct MockNavigator {
    pub snapshot: VehicleSnapshot,
    pub params: ParameterStore,
    pub triplet: PositionSetpointTriplet,
    pub can_loiter_at_sp: bool,
    /// Scripted reach result (used when `detector` is `None`)
    pub reached: bool,
    pub detector: Option<ReachDetector<MockTime>>,
    /// Number of `reset_mission_item_reached` calls
    pub reach_resets: u32,
    /// Number of `set_position_setpoint_triplet_updated` calls
    pub triplet_updates: u32,
    /// Pure commands dispatched through `issue_command`
    pub commands: Vec<MissionItem, MAX_RECORDED_COMMANDS>,
    pub status: StatusNotifier,
}

impl MockNavigator {
    /// Multicopter in flight at the origin with default parameters and an
    /// invalid home
    pub fn new() -> Self {
        let mut params = ParameterStore::new();
        RtlParams::register_defaults(&mut params).expect("RTL parameters fit an empty store");
        NavigatorParams::register_defaults(&mut params)
            .expect("navigator parameters fit an empty store");

        Self {
            snapshot: VehicleSnapshot {
                vehicle_status: VehicleStatus::multicopter(),
                ..VehicleSnapshot::default()
            },
            params,
            triplet: PositionSetpointTriplet::new(),
            can_loiter_at_sp: false,
            reached: false,
            detector: None,
            reach_resets: 0,
            triplet_updates: 0,
            commands: Vec::new(),
            status: StatusNotifier::new(),
        }
    }

    pub fn with_position(mut self, position: GlobalPosition) -> Self {
        self.snapshot.global_position = position;
        self
    }

    pub fn with_home(mut self, home: HomePosition) -> Self {
        self.snapshot.home_position = home;
        self
    }

    pub fn with_status(mut self, status: VehicleStatus) -> Self {
        self.snapshot.vehicle_status = status;
        self
    }

    pub fn landed(mut self) -> Self {
        self.snapshot.land_detected = true;
        self
    }

    /// Evaluate reach with a [`ReachDetector`] instead of the scripted flag
    pub fn with_reach_detector(mut self) -> Self {
        self.detector = Some(ReachDetector::new(MockTime::new()));
        self
    }

    /// Set a numeric parameter
    pub fn set_param(&mut self, name: &str, value: f32) -> Result<(), ParameterError> {
        self.params.set(name, ParamValue::Float(value))
    }

    /// Manual clock of the installed reach detector
    pub fn time(&self) -> Option<&MockTime> {
        self.detector.as_ref().map(ReachDetector::time)
    }

    /// Text of the most recent status message
    pub fn last_status(&self) -> Option<&str> {
        self.status.last().map(|message| message.text.as_str())
    }
}

impl Default for MockNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for MockNavigator {
    fn global_position(&self) -> GlobalPosition {
        self.snapshot.global_position
    }

    fn home_position(&self) -> HomePosition {
        self.snapshot.home_position
    }

    fn land_detected(&self) -> bool {
        self.snapshot.land_detected
    }

    fn vehicle_status(&self) -> VehicleStatus {
        self.snapshot.vehicle_status
    }

    fn loiter_radius(&self) -> f32 {
        NavigatorParams::from_store(&self.params).loiter_radius
    }

    fn acceptance_radius(&self) -> f32 {
        NavigatorParams::from_store(&self.params).acceptance_radius
    }

    fn can_loiter_at_sp(&self) -> bool {
        self.can_loiter_at_sp
    }

    fn set_can_loiter_at_sp(&mut self, can_loiter: bool) {
        self.can_loiter_at_sp = can_loiter;
    }

    fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn is_mission_item_reached(&mut self, item: &MissionItem) -> bool {
        let altitude_acceptance = NavigatorParams::from_store(&self.params).altitude_acceptance_radius;
        match self.detector.as_mut() {
            Some(detector) => detector.is_reached(item, &self.snapshot, altitude_acceptance),
            None => self.reached,
        }
    }

    fn reset_mission_item_reached(&mut self) {
        self.reach_resets += 1;
        self.reached = false;
        if let Some(detector) = self.detector.as_mut() {
            detector.reset();
        }
    }

    fn issue_command(&mut self, item: &MissionItem) {
        if self.commands.is_full() {
            self.commands.remove(0);
        }
        let _ = self.commands.push(*item);
    }

    fn send_status(&mut self, severity: Severity, text: &str) {
        self.status.enqueue(severity, text);
    }

    fn position_setpoint_triplet(&self) -> &PositionSetpointTriplet {
        &self.triplet
    }

    fn position_setpoint_triplet_mut(&mut self) -> &mut PositionSetpointTriplet {
        &mut self.triplet
    }

    fn set_position_setpoint_triplet_updated(&mut self) {
        self.triplet_updates += 1;
    }
}
