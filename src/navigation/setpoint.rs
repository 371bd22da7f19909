//! Position setpoint types
//!
//! - `PositionSetpoint`: one target consumed by the position controller
//! - `PositionSetpointTriplet`: previous/current/next targets
//! - `SetpointType`: how the controller should treat the target

/// How the position controller treats a setpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetpointType {
    /// Fly to and through the position
    #[default]
    Position,
    /// Hold at the position (orbit for fixed-wing)
    Loiter,
    /// Descend and land at the position
    Land,
    /// Motors idle, no position control
    Idle,
}

/// Target consumed by the position controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSetpoint {
    /// Setpoint is meaningful (invalid slots are ignored downstream)
    pub valid: bool,
    pub setpoint_type: SetpointType,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude AMSL in meters
    pub alt: f32,
    /// Yaw in radians (only meaningful when `yaw_valid`)
    pub yaw: f32,
    pub yaw_valid: bool,
    /// Loiter radius in meters
    pub loiter_radius: f32,
    /// Loiter direction: 1 = clockwise, -1 = counter-clockwise
    pub loiter_direction: i8,
    /// Minimum pitch in radians (fixed-wing climb-out)
    pub pitch_min: f32,
    /// Acceptance radius in meters
    pub acceptance_radius: f32,
}

impl Default for PositionSetpoint {
    fn default() -> Self {
        Self {
            valid: false,
            setpoint_type: SetpointType::Position,
            lat: 0.0,
            lon: 0.0,
            alt: 0.0,
            yaw: f32::NAN,
            yaw_valid: false,
            loiter_radius: 0.0,
            loiter_direction: 1,
            pitch_min: 0.0,
            acceptance_radius: 0.0,
        }
    }
}

/// Previous, current and next targets for the position controller
///
/// `previous` defines the leg being flown (used for bearing and track
/// following), `current` is the active target, `next` lets the
/// controller anticipate the following turn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionSetpointTriplet {
    pub previous: PositionSetpoint,
    pub current: PositionSetpoint,
    pub next: PositionSetpoint,
}

impl PositionSetpointTriplet {
    /// Triplet with all slots invalid
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_setpoint_default_invalid() {
        let sp = PositionSetpoint::default();
        assert!(!sp.valid);
        assert!(!sp.yaw_valid);
        assert!(sp.yaw.is_nan());
        assert_eq!(sp.setpoint_type, SetpointType::Position);
    }

    #[test]
    fn test_triplet_new_all_invalid() {
        let triplet = PositionSetpointTriplet::new();
        assert!(!triplet.previous.valid);
        assert!(!triplet.current.valid);
        assert!(!triplet.next.valid);
    }
}
