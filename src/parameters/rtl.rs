//! Return-to-launch Parameter Definitions
//!
//! # Parameters
//!
//! - `RTLB_RETURN_ALT` - Height above home to climb to before returning (m)
//! - `RTLB_DESCEND_ALT` - Height above home to descend to before the final approach (m)
//! - `RTLB_MIN_DIST` - Home distance below which the vehicle is "close to home" (m)
//! - `RTL_LAND_DELAY` - Loiter time before landing (s): < 0 loiter forever,
//!   0 land immediately, > 0 loiter that long then land
//!
//! Values are re-read on every phase entry, so a change from the ground
//! takes effect at the next phase boundary.

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

/// Land delays within this band of zero count as "land immediately"
pub const DELAY_SIGMA: f32 = 0.01;

const DEFAULT_RETURN_ALT: f32 = 60.0;
const MIN_RETURN_ALT: f32 = 0.0;
const MAX_RETURN_ALT: f32 = 150.0;

const DEFAULT_DESCEND_ALT: f32 = 30.0;
const MIN_DESCEND_ALT: f32 = 2.0;
const MAX_DESCEND_ALT: f32 = 100.0;

const DEFAULT_MIN_DIST: f32 = 5.0;
const MIN_MIN_DIST: f32 = 0.5;
const MAX_MIN_DIST: f32 = 100.0;

const DEFAULT_LAND_DELAY: f32 = -1.0;
const MIN_LAND_DELAY: f32 = -1.0;
const MAX_LAND_DELAY: f32 = 300.0;

/// RTL parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RtlParams {
    /// Climb height above home before returning (m)
    pub return_alt: f32,
    /// Height above home at the end of the descent (m)
    pub descend_alt: f32,
    /// "Close to home" distance (m)
    pub min_dist: f32,
    /// Loiter time before landing (s), negative loiters forever
    pub land_delay: f32,
}

impl Default for RtlParams {
    fn default() -> Self {
        Self {
            return_alt: DEFAULT_RETURN_ALT,
            descend_alt: DEFAULT_DESCEND_ALT,
            min_dist: DEFAULT_MIN_DIST,
            land_delay: DEFAULT_LAND_DELAY,
        }
    }
}

impl RtlParams {
    /// Register RTL parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "RTLB_RETURN_ALT",
            ParamValue::Float(DEFAULT_RETURN_ALT),
            ParamFlags::empty(),
        )?;
        store.register(
            "RTLB_DESCEND_ALT",
            ParamValue::Float(DEFAULT_DESCEND_ALT),
            ParamFlags::empty(),
        )?;
        store.register(
            "RTLB_MIN_DIST",
            ParamValue::Float(DEFAULT_MIN_DIST),
            ParamFlags::empty(),
        )?;
        store.register(
            "RTL_LAND_DELAY",
            ParamValue::Float(DEFAULT_LAND_DELAY),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load RTL parameters from parameter store
    ///
    /// Missing entries fall back to defaults, out-of-range values are
    /// clamped into range.
    pub fn from_store(store: &ParameterStore) -> Self {
        let load = |name: &str, default: f32, min: f32, max: f32| match store.get_float(name) {
            Some(v) if v.is_finite() => v.clamp(min, max),
            _ => default,
        };

        Self {
            return_alt: load(
                "RTLB_RETURN_ALT",
                DEFAULT_RETURN_ALT,
                MIN_RETURN_ALT,
                MAX_RETURN_ALT,
            ),
            descend_alt: load(
                "RTLB_DESCEND_ALT",
                DEFAULT_DESCEND_ALT,
                MIN_DESCEND_ALT,
                MAX_DESCEND_ALT,
            ),
            min_dist: load("RTLB_MIN_DIST", DEFAULT_MIN_DIST, MIN_MIN_DIST, MAX_MIN_DIST),
            land_delay: load(
                "RTL_LAND_DELAY",
                DEFAULT_LAND_DELAY,
                MIN_LAND_DELAY,
                MAX_LAND_DELAY,
            ),
        }
    }

    /// Validate RTL parameters
    pub fn is_valid(&self) -> bool {
        (MIN_RETURN_ALT..=MAX_RETURN_ALT).contains(&self.return_alt)
            && (MIN_DESCEND_ALT..=MAX_DESCEND_ALT).contains(&self.descend_alt)
            && (MIN_MIN_DIST..=MAX_MIN_DIST).contains(&self.min_dist)
            && (MIN_LAND_DELAY..=MAX_LAND_DELAY).contains(&self.land_delay)
    }

    /// True if the vehicle loiters over home before (or instead of) landing
    pub fn loiter_before_land(&self) -> bool {
        self.land_delay.abs() > DELAY_SIGMA
    }

    /// True if the loiter over home ends in a landing (time-limited)
    pub fn autoland(&self) -> bool {
        self.land_delay > -DELAY_SIGMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtl_params_defaults() {
        let params = RtlParams::default();

        assert!((params.return_alt - 60.0).abs() < 0.001);
        assert!((params.descend_alt - 30.0).abs() < 0.001);
        assert!((params.min_dist - 5.0).abs() < 0.001);
        assert!((params.land_delay + 1.0).abs() < 0.001);
        assert!(params.is_valid());
    }

    #[test]
    fn test_rtl_params_from_store() {
        let mut store = ParameterStore::new();
        RtlParams::register_defaults(&mut store).unwrap();

        let params = RtlParams::from_store(&store);
        assert_eq!(params, RtlParams::default());
    }

    #[test]
    fn test_rtl_params_from_store_custom() {
        let mut store = ParameterStore::new();
        RtlParams::register_defaults(&mut store).unwrap();

        store.set("RTLB_RETURN_ALT", ParamValue::Float(80.0)).unwrap();
        store.set("RTLB_DESCEND_ALT", ParamValue::Int(10)).unwrap();
        store.set("RTL_LAND_DELAY", ParamValue::Float(5.0)).unwrap();

        let params = RtlParams::from_store(&store);
        assert!((params.return_alt - 80.0).abs() < 0.001);
        assert!((params.descend_alt - 10.0).abs() < 0.001);
        assert!((params.land_delay - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_rtl_params_clamped() {
        let mut store = ParameterStore::new();
        RtlParams::register_defaults(&mut store).unwrap();

        store.set("RTLB_RETURN_ALT", ParamValue::Float(500.0)).unwrap();
        store.set("RTLB_DESCEND_ALT", ParamValue::Float(0.0)).unwrap();
        store.set("RTLB_MIN_DIST", ParamValue::Float(-3.0)).unwrap();
        store.set("RTL_LAND_DELAY", ParamValue::Float(-20.0)).unwrap();

        let params = RtlParams::from_store(&store);
        assert!((params.return_alt - 150.0).abs() < 0.001);
        assert!((params.descend_alt - 2.0).abs() < 0.001);
        assert!((params.min_dist - 0.5).abs() < 0.001);
        assert!((params.land_delay + 1.0).abs() < 0.001);
        assert!(params.is_valid());
    }

    #[test]
    fn test_rtl_params_missing_use_defaults() {
        let store = ParameterStore::new();
        assert_eq!(RtlParams::from_store(&store), RtlParams::default());
    }

    #[test]
    fn test_rtl_params_validation() {
        let params = RtlParams {
            return_alt: 151.0,
            ..RtlParams::default()
        };
        assert!(!params.is_valid());

        let params = RtlParams {
            descend_alt: 1.0,
            ..RtlParams::default()
        };
        assert!(!params.is_valid());
    }

    #[test]
    fn test_land_delay_semantics() {
        let forever = RtlParams::default();
        assert!(forever.loiter_before_land());
        assert!(!forever.autoland());

        let immediate = RtlParams {
            land_delay: 0.0,
            ..RtlParams::default()
        };
        assert!(!immediate.loiter_before_land());
        assert!(immediate.autoland());

        let timed = RtlParams {
            land_delay: 5.0,
            ..RtlParams::default()
        };
        assert!(timed.loiter_before_land());
        assert!(timed.autoland());
    }
}
