//! Mission item reach detection
//!
//! Reference implementation of the "has the vehicle reached the current
//! mission item" predicate a [`Navigator`](super::Navigator) exposes.
//!
//! - Positional items: inside the horizontal acceptance radius and the
//!   vertical acceptance band, heading aligned (rotary wing with a
//!   defined yaw only), then `time_inside` seconds of dwell
//! - `Land`: the land detector reports the vehicle on the ground
//! - `DoVtolTransition`: the vehicle flies in the requested VTOL state
//! - `Idle` and `LoiterUnlimited`: never reached

use crate::geo::{distance_to_next_waypoint, wrap_pi};
use crate::mission::{MissionItem, NavCommand, VTOL_STATE_FW, VTOL_STATE_MC};
use crate::traits::TimeSource;

use super::types::VehicleSnapshot;

/// Heading error below which the yaw is considered aligned (radians)
pub const YAW_ACCEPTANCE_RAD: f32 = 0.2;

/// Stateful reach predicate with dwell timing
#[derive(Debug)]
pub struct ReachDetector<T: TimeSource> {
    time: T,
    position_reached: bool,
    yaw_reached: bool,
    /// Time the vehicle first entered the acceptance radius
    first_inside_us: Option<u64>,
}

impl<T: TimeSource> ReachDetector<T> {
    pub fn new(time: T) -> Self {
        Self {
            time,
            position_reached: false,
            yaw_reached: false,
            first_inside_us: None,
        }
    }

    /// Clock used for dwell timing
    pub fn time(&self) -> &T {
        &self.time
    }

    /// Forget progress toward the current item (call on every new item)
    pub fn reset(&mut self) {
        self.position_reached = false;
        self.yaw_reached = false;
        self.first_inside_us = None;
    }

    /// True once the position part of the item has been satisfied
    pub fn position_reached(&self) -> bool {
        self.position_reached
    }

    /// Evaluate the predicate for `item` against this cycle's telemetry
    pub fn is_reached(
        &mut self,
        item: &MissionItem,
        snapshot: &VehicleSnapshot,
        altitude_acceptance: f32,
    ) -> bool {
        match item.nav_cmd {
            NavCommand::Idle | NavCommand::LoiterUnlimited => return false,
            NavCommand::Land => return snapshot.land_detected,
            NavCommand::DoVtolTransition => {
                let target = item.params[0];
                return if (target - VTOL_STATE_MC).abs() < f32::EPSILON {
                    snapshot.vehicle_status.is_rotary_wing
                } else if (target - VTOL_STATE_FW).abs() < f32::EPSILON {
                    !snapshot.vehicle_status.is_rotary_wing
                } else {
                    true
                };
            }
            NavCommand::Waypoint | NavCommand::LoiterTimeLimit => {}
        }

        let position = &snapshot.global_position;

        if !self.position_reached {
            let distance = distance_to_next_waypoint(position.lat, position.lon, item.lat, item.lon);
            let target_alt = item.absolute_altitude(snapshot.home_position.alt);
            let altitude_error = (position.alt - target_alt).abs();

            if distance <= item.acceptance_radius && altitude_error <= altitude_acceptance {
                self.position_reached = true;
                self.first_inside_us = Some(self.time.now_us());
                log_debug!(
                    "item {} position reached ({} m)",
                    item.nav_cmd.as_str(),
                    distance
                );
            }
        }

        if self.position_reached && !self.yaw_reached {
            self.yaw_reached = if snapshot.vehicle_status.is_rotary_wing && item.yaw.is_finite() {
                wrap_pi(position.yaw - item.yaw).abs() < YAW_ACCEPTANCE_RAD
            } else {
                true
            };
        }

        if !(self.position_reached && self.yaw_reached) {
            return false;
        }

        match self.first_inside_us {
            Some(entered) => self.time.elapsed_secs_since(entered) >= item.time_inside.max(0.0),
            None => false,
        }
    }
}
