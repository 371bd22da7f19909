//! Mission items
//!
//! A [`MissionItem`] is the single discrete target the RTL state machine
//! emits per phase. Items are built fresh by the constructors below on
//! every phase entry (never patched in place), then converted into the
//! current position setpoint.
//!
//! # Constructors
//!
//! - [`MissionItem::waypoint`]: onboard waypoint at an absolute altitude
//! - [`MissionItem::current_position`]: hold where the vehicle is now
//! - [`MissionItem::land`]: land at a position
//! - [`MissionItem::idle`]: motors idle on the ground
//! - [`MissionItem::command`]: pure command without positional meaning

pub mod command;

pub use command::{
    cmd_has_location, is_nav_command, NavCommand, MAV_CMD_NAV_LAST, VTOL_STATE_FW, VTOL_STATE_MC,
};

use crate::navigation::{PositionSetpoint, SetpointType};
use crate::navigator::GlobalPosition;

/// Who generated a mission item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Generated by the navigator itself (RTL, failsafe)
    #[default]
    Onboard,
    /// Uploaded by a ground station
    External,
}

/// Discrete navigation target or command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionItem {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude in meters (AMSL, or above home when `altitude_is_relative`)
    pub altitude: f32,
    pub altitude_is_relative: bool,
    /// Yaw in radians, `NaN` when the heading does not matter
    pub yaw: f32,
    /// Loiter radius in meters
    pub loiter_radius: f32,
    /// Loiter direction: 1 = clockwise, -1 = counter-clockwise
    pub loiter_direction: i8,
    pub nav_cmd: NavCommand,
    /// Acceptance radius in meters
    pub acceptance_radius: f32,
    /// Minimum time to stay inside the acceptance radius (seconds)
    pub time_inside: f32,
    /// Minimum pitch in radians (fixed-wing climb-out)
    pub pitch_min: f32,
    /// Advance to the next item without an explicit command
    pub autocontinue: bool,
    /// Command parameter slots (param 1..4)
    pub params: [f32; 4],
    pub origin: Origin,
}

impl Default for MissionItem {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            altitude: 0.0,
            altitude_is_relative: false,
            yaw: f32::NAN,
            loiter_radius: 0.0,
            loiter_direction: 1,
            nav_cmd: NavCommand::Idle,
            acceptance_radius: 0.0,
            time_inside: 0.0,
            pitch_min: 0.0,
            autocontinue: false,
            params: [0.0; 4],
            origin: Origin::Onboard,
        }
    }
}

impl MissionItem {
    /// Onboard waypoint at an absolute altitude, heading undefined
    pub fn waypoint(
        lat: f64,
        lon: f64,
        altitude: f32,
        loiter_radius: f32,
        acceptance_radius: f32,
    ) -> Self {
        Self {
            lat,
            lon,
            altitude,
            altitude_is_relative: false,
            yaw: f32::NAN,
            loiter_radius,
            loiter_direction: 1,
            nav_cmd: NavCommand::Waypoint,
            acceptance_radius,
            time_inside: 0.0,
            pitch_min: 0.0,
            autocontinue: true,
            params: [0.0; 4],
            origin: Origin::Onboard,
        }
    }

    /// Waypoint at the vehicle's present position and heading
    pub fn current_position(
        position: &GlobalPosition,
        loiter_radius: f32,
        acceptance_radius: f32,
    ) -> Self {
        Self {
            yaw: position.yaw,
            ..Self::waypoint(
                position.lat,
                position.lon,
                position.alt,
                loiter_radius,
                acceptance_radius,
            )
        }
    }

    /// Land at `(lat, lon)`; `altitude` is the expected ground altitude
    pub fn land(
        lat: f64,
        lon: f64,
        altitude: f32,
        yaw: f32,
        loiter_radius: f32,
        acceptance_radius: f32,
    ) -> Self {
        Self {
            yaw,
            nav_cmd: NavCommand::Land,
            ..Self::waypoint(lat, lon, altitude, loiter_radius, acceptance_radius)
        }
    }

    /// Motors idle on the ground at `(lat, lon)`, heading undefined
    pub fn idle(lat: f64, lon: f64, altitude: f32) -> Self {
        Self {
            lat,
            lon,
            altitude,
            nav_cmd: NavCommand::Idle,
            autocontinue: true,
            ..Self::default()
        }
    }

    /// Immediate command with parameter slots, no positional meaning
    pub fn command(nav_cmd: NavCommand, params: [f32; 4]) -> Self {
        Self {
            nav_cmd,
            params,
            autocontinue: true,
            ..Self::default()
        }
    }

    /// True if the item names a position (as opposed to a pure command)
    pub fn contains_position(&self) -> bool {
        self.nav_cmd.has_location()
    }

    /// Altitude AMSL, resolving a relative altitude against `home_alt`
    pub fn absolute_altitude(&self, home_alt: f32) -> f32 {
        if self.altitude_is_relative {
            self.altitude + home_alt
        } else {
            self.altitude
        }
    }

    /// Convert into a valid position setpoint
    ///
    /// Returns `None` for pure commands, which must not move the target.
    pub fn to_position_setpoint(&self, home_alt: f32) -> Option<PositionSetpoint> {
        if !self.contains_position() {
            return None;
        }

        let setpoint_type = match self.nav_cmd {
            NavCommand::Idle => SetpointType::Idle,
            NavCommand::Land => SetpointType::Land,
            NavCommand::LoiterUnlimited | NavCommand::LoiterTimeLimit => SetpointType::Loiter,
            NavCommand::Waypoint | NavCommand::DoVtolTransition => SetpointType::Position,
        };

        Some(PositionSetpoint {
            valid: true,
            setpoint_type,
            lat: self.lat,
            lon: self.lon,
            alt: self.absolute_altitude(home_alt),
            yaw: self.yaw,
            yaw_valid: self.yaw.is_finite(),
            loiter_radius: self.loiter_radius,
            loiter_direction: self.loiter_direction,
            pitch_min: self.pitch_min,
            acceptance_radius: self.acceptance_radius,
        })
    }
}
