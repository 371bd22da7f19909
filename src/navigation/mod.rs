//! Setpoint types shared with the downstream position controller
//!
//! The RTL state machine writes these; it never reads back anything the
//! controller produces.

mod setpoint;

pub use setpoint::{PositionSetpoint, PositionSetpointTriplet, SetpointType};
