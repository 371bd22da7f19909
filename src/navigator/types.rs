//! Vehicle telemetry snapshot types
//!
//! - `GlobalPosition`: estimated position and heading
//! - `HomePosition`: launch point the vehicle returns to
//! - `VehicleStatus`: airframe capabilities relevant to RTL
//! - `VehicleSnapshot`: everything above plus the land detector, taken once per tick

/// Estimated global position
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GlobalPosition {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude AMSL in meters
    pub alt: f32,
    /// Heading in radians (0 = north, clockwise positive)
    pub yaw: f32,
}

impl GlobalPosition {
    pub fn new(lat: f64, lon: f64, alt: f32) -> Self {
        Self {
            lat,
            lon,
            alt,
            yaw: 0.0,
        }
    }

    pub fn with_yaw(self, yaw: f32) -> Self {
        Self { yaw, ..self }
    }
}

/// Home (launch) position
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct HomePosition {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude AMSL in meters
    pub alt: f32,
    /// Heading at launch in radians
    pub yaw: f32,
    /// Home has been set (armed with a valid fix)
    pub valid: bool,
}

impl HomePosition {
    /// Valid home at the given coordinates
    pub fn new(lat: f64, lon: f64, alt: f32, yaw: f32) -> Self {
        Self {
            lat,
            lon,
            alt,
            yaw,
            valid: true,
        }
    }
}

/// Airframe capabilities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VehicleStatus {
    /// Vehicle can transition between rotary-wing and fixed-wing flight
    pub is_vtol: bool,
    /// Vehicle currently flies as a rotary wing (multicopter)
    pub is_rotary_wing: bool,
}

impl VehicleStatus {
    /// Plain multicopter
    pub fn multicopter() -> Self {
        Self {
            is_vtol: false,
            is_rotary_wing: true,
        }
    }

    /// Plain fixed-wing aircraft
    pub fn fixed_wing() -> Self {
        Self {
            is_vtol: false,
            is_rotary_wing: false,
        }
    }

    /// True for a VTOL currently flying in fixed-wing mode
    pub fn is_vtol_in_fixed_wing(&self) -> bool {
        self.is_vtol && !self.is_rotary_wing
    }
}

/// Telemetry sampled once per navigator cycle
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct VehicleSnapshot {
    pub global_position: GlobalPosition,
    pub home_position: HomePosition,
    /// Land detector reports the vehicle on the ground
    pub land_detected: bool,
    pub vehicle_status: VehicleStatus,
}
