//! Geodesy helpers
//!
//! Spherical-earth helpers shared by the RTL state machine and the path
//! tracker. Coordinates are degrees in `f64` (a 1e-7 degree step is about
//! 1 cm, below `f32` resolution at large longitudes); results are `f32`
//! meters and radians.
//!
//! - [`distance_to_next_waypoint`] / [`bearing_to_next_waypoint`]:
//!   haversine distance and forward azimuth
//! - [`MapProjection`]: azimuthal equidistant projection between
//!   geographic coordinates and a local north/east plane

use core::f64::consts::PI;

use libm::{acos, asin, atan2, cos, sin, sqrt};

/// Mean earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Great-circle distance in meters between `(lat_now, lon_now)` and
/// `(lat_next, lon_next)`.
pub fn distance_to_next_waypoint(lat_now: f64, lon_now: f64, lat_next: f64, lon_next: f64) -> f32 {
    let lat_now_rad = lat_now * DEG_TO_RAD;
    let lat_next_rad = lat_next * DEG_TO_RAD;
    let d_lat = lat_next_rad - lat_now_rad;
    let d_lon = (lon_next - lon_now) * DEG_TO_RAD;

    let sin_half_lat = sin(d_lat / 2.0);
    let sin_half_lon = sin(d_lon / 2.0);
    let a = sin_half_lat * sin_half_lat
        + sin_half_lon * sin_half_lon * cos(lat_now_rad) * cos(lat_next_rad);
    let c = atan2(sqrt(a), sqrt(1.0 - a));

    (EARTH_RADIUS_M * 2.0 * c) as f32
}

/// Initial bearing in radians (-pi..pi, 0 = north, clockwise positive)
/// from `(lat_now, lon_now)` toward `(lat_next, lon_next)`.
pub fn bearing_to_next_waypoint(lat_now: f64, lon_now: f64, lat_next: f64, lon_next: f64) -> f32 {
    let lat_now_rad = lat_now * DEG_TO_RAD;
    let lat_next_rad = lat_next * DEG_TO_RAD;
    let d_lon = (lon_next - lon_now) * DEG_TO_RAD;

    let y = sin(d_lon) * cos(lat_next_rad);
    let x = cos(lat_now_rad) * sin(lat_next_rad)
        - sin(lat_now_rad) * cos(lat_next_rad) * cos(d_lon);

    wrap_pi(atan2(y, x) as f32)
}

/// Wrap an angle in radians to (-pi, pi]
pub fn wrap_pi(angle: f32) -> f32 {
    use core::f32::consts::PI as PI_F32;

    if !angle.is_finite() {
        return angle;
    }
    let mut a = angle % (2.0 * PI_F32);
    if a > PI_F32 {
        a -= 2.0 * PI_F32;
    } else if a <= -PI_F32 {
        a += 2.0 * PI_F32;
    }
    a
}

/// Azimuthal equidistant projection anchored at a reference point.
///
/// `project` maps geographic coordinates to local (north, east) meters;
/// `reproject` is its inverse. Distances from the reference point are
/// preserved exactly, so the error over a few kilometers is negligible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    ref_lat_rad: f64,
    ref_lon_rad: f64,
    ref_sin_lat: f64,
    ref_cos_lat: f64,
}

impl MapProjection {
    /// Anchor the projection at `(lat, lon)` degrees
    pub fn new(lat: f64, lon: f64) -> Self {
        let ref_lat_rad = lat * DEG_TO_RAD;
        Self {
            ref_lat_rad,
            ref_lon_rad: lon * DEG_TO_RAD,
            ref_sin_lat: sin(ref_lat_rad),
            ref_cos_lat: cos(ref_lat_rad),
        }
    }

    /// Reference latitude in degrees
    pub fn ref_lat(&self) -> f64 {
        self.ref_lat_rad * RAD_TO_DEG
    }

    /// Reference longitude in degrees
    pub fn ref_lon(&self) -> f64 {
        self.ref_lon_rad * RAD_TO_DEG
    }

    /// Geographic degrees to local `(north, east)` meters
    pub fn project(&self, lat: f64, lon: f64) -> (f32, f32) {
        let lat_rad = lat * DEG_TO_RAD;
        let lon_rad = lon * DEG_TO_RAD;

        let sin_lat = sin(lat_rad);
        let cos_lat = cos(lat_rad);
        let cos_d_lon = cos(lon_rad - self.ref_lon_rad);

        let arg = (self.ref_sin_lat * sin_lat + self.ref_cos_lat * cos_lat * cos_d_lon)
            .clamp(-1.0, 1.0);
        let c = acos(arg);
        let k = if c.abs() < f64::EPSILON { 1.0 } else { c / sin(c) };

        let north =
            k * (self.ref_cos_lat * sin_lat - self.ref_sin_lat * cos_lat * cos_d_lon) * EARTH_RADIUS_M;
        let east = k * cos_lat * sin(lon_rad - self.ref_lon_rad) * EARTH_RADIUS_M;

        (north as f32, east as f32)
    }

    /// Local `(north, east)` meters back to geographic degrees
    pub fn reproject(&self, north: f32, east: f32) -> (f64, f64) {
        let x_rad = north as f64 / EARTH_RADIUS_M;
        let y_rad = east as f64 / EARTH_RADIUS_M;
        let c = sqrt(x_rad * x_rad + y_rad * y_rad);

        if c.abs() < f64::EPSILON {
            return (self.ref_lat(), self.ref_lon());
        }

        let sin_c = sin(c);
        let cos_c = cos(c);

        let lat_rad = asin(cos_c * self.ref_sin_lat + (x_rad * sin_c * self.ref_cos_lat) / c);
        let lon_rad = self.ref_lon_rad
            + atan2(
                y_rad * sin_c,
                c * self.ref_cos_lat * cos_c - x_rad * self.ref_sin_lat * sin_c,
            );

        (lat_rad * RAD_TO_DEG, lon_rad * RAD_TO_DEG)
    }
}
