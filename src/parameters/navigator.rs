//! Navigator Parameter Definitions
//!
//! # Parameters
//!
//! - `NAV_LOITER_RAD` - Loiter radius for fixed-wing orbits (m)
//! - `NAV_ACC_RAD` - Horizontal acceptance radius for waypoints (m)
//! - `NAV_ALT_ACC` - Vertical acceptance for waypoints (m)

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_LOITER_RADIUS: f32 = 50.0;
const MIN_LOITER_RADIUS: f32 = 25.0;
const MAX_LOITER_RADIUS: f32 = 1000.0;

const DEFAULT_ACCEPTANCE_RADIUS: f32 = 2.0;
const MIN_ACCEPTANCE_RADIUS: f32 = 0.05;
const MAX_ACCEPTANCE_RADIUS: f32 = 200.0;

const DEFAULT_ALT_ACCEPTANCE: f32 = 0.8;
const MIN_ALT_ACCEPTANCE: f32 = 0.05;
const MAX_ALT_ACCEPTANCE: f32 = 200.0;

/// Navigator-wide parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorParams {
    /// Loiter radius in meters
    pub loiter_radius: f32,
    /// Horizontal acceptance radius in meters
    pub acceptance_radius: f32,
    /// Vertical acceptance in meters
    pub altitude_acceptance_radius: f32,
}

impl Default for NavigatorParams {
    fn default() -> Self {
        Self {
            loiter_radius: DEFAULT_LOITER_RADIUS,
            acceptance_radius: DEFAULT_ACCEPTANCE_RADIUS,
            altitude_acceptance_radius: DEFAULT_ALT_ACCEPTANCE,
        }
    }
}

impl NavigatorParams {
    /// Register navigator parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "NAV_LOITER_RAD",
            ParamValue::Float(DEFAULT_LOITER_RADIUS),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_ACC_RAD",
            ParamValue::Float(DEFAULT_ACCEPTANCE_RADIUS),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_ALT_ACC",
            ParamValue::Float(DEFAULT_ALT_ACCEPTANCE),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load navigator parameters from parameter store, clamped into range
    pub fn from_store(store: &ParameterStore) -> Self {
        let loiter_radius = match store.get_float("NAV_LOITER_RAD") {
            Some(v) if v.is_finite() => v.clamp(MIN_LOITER_RADIUS, MAX_LOITER_RADIUS),
            _ => DEFAULT_LOITER_RADIUS,
        };

        let acceptance_radius = match store.get_float("NAV_ACC_RAD") {
            Some(v) if v.is_finite() => v.clamp(MIN_ACCEPTANCE_RADIUS, MAX_ACCEPTANCE_RADIUS),
            _ => DEFAULT_ACCEPTANCE_RADIUS,
        };

        let altitude_acceptance_radius = match store.get_float("NAV_ALT_ACC") {
            Some(v) if v.is_finite() => v.clamp(MIN_ALT_ACCEPTANCE, MAX_ALT_ACCEPTANCE),
            _ => DEFAULT_ALT_ACCEPTANCE,
        };

        Self {
            loiter_radius,
            acceptance_radius,
            altitude_acceptance_radius,
        }
    }

    /// Validate navigator parameters
    pub fn is_valid(&self) -> bool {
        if self.loiter_radius < MIN_LOITER_RADIUS || self.loiter_radius > MAX_LOITER_RADIUS {
            return false;
        }

        if self.acceptance_radius < MIN_ACCEPTANCE_RADIUS
            || self.acceptance_radius > MAX_ACCEPTANCE_RADIUS
        {
            return false;
        }

        self.altitude_acceptance_radius >= MIN_ALT_ACCEPTANCE
            && self.altitude_acceptance_radius <= MAX_ALT_ACCEPTANCE
    }
}
