//! Return-to-launch state machine
//!
//! Sequences the vehicle home through the phases in [`RtlPhase`]. Every
//! phase entry builds one fresh [`MissionItem`] from this cycle's
//! telemetry and the current RTL parameters, publishes it as the current
//! position setpoint (or dispatches it, for pure commands), and waits for
//! the navigator to report it reached before advancing.
//!
//! # Setpoint triplet handling
//!
//! - `previous` follows `current` until the return leg starts, then stays
//!   frozen on the leg origin (`start_lock`) so the controller tracks the
//!   line toward home
//! - `previous` is invalidated when the descent starts
//! - `next` is always invalidated
//!
//! # Re-entry
//!
//! `on_inactive` keeps the phase while the navigator may still hold at
//! the last setpoint (loiter over home), so a later activation resumes
//! there instead of climbing again.

mod phase;

pub use phase::RtlPhase;

use core::fmt;

use crate::geo::{bearing_to_next_waypoint, distance_to_next_waypoint};
use crate::mission::{MissionItem, NavCommand, VTOL_STATE_MC};
use crate::mode::NavigatorMode;
use crate::navigator::Navigator;
use crate::parameters::RtlParams;
use crate::status::{format_text, Severity};

/// Return-to-launch mode
#[derive(Debug, Clone)]
pub struct Rtl {
    phase: RtlPhase,
    /// Previous setpoint frozen on the return leg origin
    start_lock: bool,
    params: RtlParams,
    mission_item: MissionItem,
    /// Altitude of the last positional item, carried into phases that
    /// keep the current altitude
    leg_altitude: f32,
}

impl Rtl {
    pub fn new() -> Self {
        Self {
            phase: RtlPhase::None,
            start_lock: false,
            params: RtlParams::default(),
            mission_item: MissionItem::default(),
            leg_altitude: 0.0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> RtlPhase {
        self.phase
    }

    /// Item emitted on the last phase entry
    pub fn mission_item(&self) -> &MissionItem {
        &self.mission_item
    }

    /// Parameters as of the last phase entry
    pub fn params(&self) -> &RtlParams {
        &self.params
    }

    /// True while the previous setpoint is frozen on the return leg origin
    pub fn is_start_locked(&self) -> bool {
        self.start_lock
    }

    pub fn on_inactive(&mut self, navigator: &mut dyn Navigator) {
        // Keep the phase only while the vehicle may keep holding at the setpoint
        if !navigator.can_loiter_at_sp() {
            self.phase = RtlPhase::None;
        }
    }

    pub fn on_activation(&mut self, navigator: &mut dyn Navigator) {
        // Override whatever the triplet held for the previous mode
        self.start_lock = false;

        let position = navigator.global_position();
        let home = navigator.home_position();

        self.mission_item = MissionItem::current_position(
            &position,
            navigator.loiter_radius(),
            navigator.acceptance_radius(),
        );
        self.leg_altitude = position.alt;
        if let Some(setpoint) = self.mission_item.to_position_setpoint(home.alt) {
            navigator.position_setpoint_triplet_mut().current = setpoint;
        }

        if self.phase == RtlPhase::None {
            self.params = RtlParams::from_store(navigator.parameters());
            let home_dist = distance_to_next_waypoint(home.lat, home.lon, position.lat, position.lon);

            self.phase = if navigator.land_detected() {
                navigator.send_status(Severity::Critical, "Already landed, not executing RTL");
                RtlPhase::Landed
            } else if home_dist > self.params.min_dist
                && position.alt < home.alt + self.params.return_alt
            {
                RtlPhase::Climb
            } else {
                // Return at the altitude we are at now
                RtlPhase::Return
            };

            log_info!(
                "RTL: activated in {} ({} m from home)",
                self.phase.as_str(),
                home_dist
            );
        }

        self.set_mission_item(navigator);
    }

    pub fn on_active(&mut self, navigator: &mut dyn Navigator) {
        if !self.phase.is_terminal() && navigator.is_mission_item_reached(&self.mission_item) {
            self.advance_phase(navigator);
            self.set_mission_item(navigator);
        }
    }

    fn advance_phase(&mut self, navigator: &dyn Navigator) {
        let next = self.phase.next(navigator.vehicle_status(), &self.params);
        log_debug!("RTL: {} -> {}", self.phase.as_str(), next.as_str());
        self.phase = next;
    }

    /// Build and publish the target for the current phase
    fn set_mission_item(&mut self, navigator: &mut dyn Navigator) {
        self.params = RtlParams::from_store(navigator.parameters());

        if !self.start_lock {
            let triplet = navigator.position_setpoint_triplet_mut();
            triplet.previous = triplet.current;
        }

        navigator.set_can_loiter_at_sp(false);

        let position = navigator.global_position();
        let home = navigator.home_position();
        let loiter_radius = navigator.loiter_radius();
        let acceptance_radius = navigator.acceptance_radius();

        let item = match self.phase {
            RtlPhase::Climb => {
                let climb_alt = home.alt + self.params.return_alt;

                notify(
                    navigator,
                    format_args!(
                        "RTL: climb to {} m ({} m above home)",
                        climb_alt as i32,
                        (climb_alt - home.alt) as i32
                    ),
                );

                MissionItem::waypoint(
                    position.lat,
                    position.lon,
                    climb_alt,
                    loiter_radius,
                    acceptance_radius,
                )
            }

            RtlPhase::Return => {
                let home_dist = distance_to_next_waypoint(home.lat, home.lon, position.lat, position.lon);
                let previous = navigator.position_setpoint_triplet().previous;

                let yaw = if home_dist < self.params.min_dist {
                    home.yaw
                } else if previous.valid {
                    bearing_to_next_waypoint(previous.lat, previous.lon, home.lat, home.lon)
                } else {
                    bearing_to_next_waypoint(position.lat, position.lon, home.lat, home.lon)
                };

                let altitude = self.leg_altitude;
                notify(
                    navigator,
                    format_args!(
                        "RTL: return at {} m ({} m above home)",
                        altitude as i32,
                        (altitude - home.alt) as i32
                    ),
                );

                self.start_lock = true;

                MissionItem {
                    yaw,
                    ..MissionItem::waypoint(home.lat, home.lon, altitude, loiter_radius, acceptance_radius)
                }
            }

            RtlPhase::TransitionToMc => {
                MissionItem::command(NavCommand::DoVtolTransition, [VTOL_STATE_MC, 0.0, 0.0, 0.0])
            }

            RtlPhase::Descend => {
                // Already lower: stay at the current altitude
                let altitude = (home.alt + self.params.descend_alt).min(position.alt);

                // A VTOL may still be far off and should point at home
                let distance = distance_to_next_waypoint(position.lat, position.lon, home.lat, home.lon);
                let yaw = if navigator.vehicle_status().is_vtol && distance > acceptance_radius {
                    bearing_to_next_waypoint(position.lat, position.lon, home.lat, home.lon)
                } else {
                    home.yaw
                };

                // Stop tracking the return leg
                navigator.position_setpoint_triplet_mut().previous.valid = false;

                notify(
                    navigator,
                    format_args!(
                        "RTL: descend to {} m ({} m above home)",
                        altitude as i32,
                        (altitude - home.alt) as i32
                    ),
                );

                MissionItem {
                    yaw,
                    autocontinue: false,
                    ..MissionItem::waypoint(home.lat, home.lon, altitude, loiter_radius, acceptance_radius)
                }
            }

            RtlPhase::Loiter => {
                let autoland = self.params.autoland();
                let time_inside = self.params.land_delay.max(0.0);

                navigator.set_can_loiter_at_sp(true);

                if autoland && time_inside > f32::EPSILON {
                    notify(navigator, format_args!("RTL: loiter {:.1}s", time_inside));
                } else {
                    navigator.send_status(Severity::Info, "RTL: completed, loiter");
                }

                MissionItem {
                    yaw: home.yaw,
                    nav_cmd: if autoland {
                        NavCommand::LoiterTimeLimit
                    } else {
                        NavCommand::LoiterUnlimited
                    },
                    time_inside,
                    autocontinue: autoland,
                    ..MissionItem::waypoint(
                        home.lat,
                        home.lon,
                        self.leg_altitude,
                        loiter_radius,
                        acceptance_radius,
                    )
                }
            }

            RtlPhase::Land => {
                navigator.send_status(Severity::Info, "RTL: land at home");
                MissionItem::land(home.lat, home.lon, home.alt, home.yaw, loiter_radius, acceptance_radius)
            }

            RtlPhase::Landed => {
                navigator.send_status(Severity::Info, "RTL: completed, landed");
                MissionItem::idle(home.lat, home.lon, home.alt)
            }

            RtlPhase::None => self.mission_item,
        };

        self.mission_item = item;
        if item.contains_position() {
            self.leg_altitude = item.altitude;
        }

        navigator.reset_mission_item_reached();

        if !item.contains_position() {
            navigator.issue_command(&item);
        }

        let triplet = navigator.position_setpoint_triplet_mut();
        // Pure commands leave the current target in place
        if let Some(setpoint) = item.to_position_setpoint(home.alt) {
            triplet.current = setpoint;
        }
        triplet.next.valid = false;

        navigator.set_position_setpoint_triplet_updated();
    }
}

impl Default for Rtl {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigatorMode for Rtl {
    fn on_inactive(&mut self, navigator: &mut dyn Navigator) {
        Rtl::on_inactive(self, navigator);
    }

    fn on_activation(&mut self, navigator: &mut dyn Navigator) {
        Rtl::on_activation(self, navigator);
    }

    fn on_active(&mut self, navigator: &mut dyn Navigator) {
        Rtl::on_active(self, navigator);
    }

    fn name(&self) -> &'static str {
        "RTL"
    }
}

/// Send an info-level status line rendered from `args`
fn notify(navigator: &mut dyn Navigator, args: fmt::Arguments<'_>) {
    let text = format_text(args);
    navigator.send_status(Severity::Info, &text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::SetpointType;
    use crate::navigator::{GlobalPosition, HomePosition, MockNavigator, VehicleStatus};

    const HOME_LAT: f64 = 47.397742;
    const HOME_LON: f64 = 8.545594;
    const HOME_ALT: f32 = 488.0;

    fn home() -> HomePosition {
        HomePosition::new(HOME_LAT, HOME_LON, HOME_ALT, 0.5)
    }

    /// ~222 m north of home
    fn away(alt: f32) -> GlobalPosition {
        GlobalPosition::new(HOME_LAT + 0.002, HOME_LON, alt)
    }

    #[test]
    fn test_activation_landed_enters_landed() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT)).landed();
        let mut rtl = Rtl::new();

        rtl.on_activation(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Landed);
        assert_eq!(rtl.mission_item().nav_cmd, NavCommand::Idle);
        assert!(nav
            .status
            .iter()
            .any(|m| m.severity == Severity::Critical
                && m.text.as_str() == "Already landed, not executing RTL"));
        assert_eq!(nav.last_status(), Some("RTL: completed, landed"));
    }

    #[test]
    fn test_landed_ignores_reached() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT)).landed();
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);
        let updates = nav.triplet_updates;

        nav.reached = true;
        rtl.on_active(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Landed);
        assert_eq!(nav.triplet_updates, updates);
    }

    #[test]
    fn test_on_active_before_activation_does_nothing() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 10.0));
        let mut rtl = Rtl::new();

        nav.reached = true;
        rtl.on_active(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::None);
        assert_eq!(nav.triplet_updates, 0);
        assert_eq!(nav.reach_resets, 0);
        assert!(nav.status.is_empty());
    }

    #[test]
    fn test_activation_low_and_far_climbs() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 10.0));
        let mut rtl = Rtl::new();

        rtl.on_activation(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Climb);
        let item = rtl.mission_item();
        assert_eq!(item.nav_cmd, NavCommand::Waypoint);
        assert!((item.altitude - (HOME_ALT + 60.0)).abs() < 1e-3);
        assert!((item.lat - (HOME_LAT + 0.002)).abs() < 1e-9);
        assert!(item.yaw.is_nan());
        assert!(item.autocontinue);
        assert_eq!(nav.last_status(), Some("RTL: climb to 548 m (60 m above home)"));
    }

    #[test]
    fn test_activation_high_enough_returns_at_current_altitude() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 80.0));
        let mut rtl = Rtl::new();

        rtl.on_activation(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Return);
        let item = rtl.mission_item();
        assert!((item.lat - HOME_LAT).abs() < 1e-9);
        assert!((item.altitude - (HOME_ALT + 80.0)).abs() < 1e-3);
        assert!(!item.altitude_is_relative);
        assert!(rtl.is_start_locked());
        assert_eq!(nav.last_status(), Some("RTL: return at 568 m (80 m above home)"));
    }

    #[test]
    fn test_activation_close_to_home_returns_with_home_yaw() {
        let position = GlobalPosition::new(HOME_LAT, HOME_LON, HOME_ALT + 5.0);
        let mut nav = MockNavigator::new().with_home(home()).with_position(position);
        let mut rtl = Rtl::new();

        rtl.on_activation(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Return);
        assert!((rtl.mission_item().yaw - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_return_yaw_points_home() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 80.0));
        let mut rtl = Rtl::new();

        rtl.on_activation(&mut nav);

        // Vehicle is north of home, so the bearing home is south
        let yaw = rtl.mission_item().yaw;
        assert!((yaw.abs() - core::f32::consts::PI).abs() < 0.01);
    }

    #[test]
    fn test_current_setpoint_written() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 10.0));
        let mut rtl = Rtl::new();

        rtl.on_activation(&mut nav);

        let current = nav.triplet.current;
        assert!(current.valid);
        assert_eq!(current.setpoint_type, SetpointType::Position);
        assert!((current.alt - (HOME_ALT + 60.0)).abs() < 1e-3);
        assert!(!nav.triplet.next.valid);
        // Previous is the seeded current-position setpoint
        assert!(nav.triplet.previous.valid);
        assert!((nav.triplet.previous.alt - (HOME_ALT + 10.0)).abs() < 1e-3);
        assert_eq!(nav.reach_resets, 1);
        assert_eq!(nav.triplet_updates, 1);
    }

    #[test]
    fn test_start_lock_freezes_previous() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 10.0));
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);

        // Climb reached: previous becomes the climb setpoint, then locks
        nav.snapshot.global_position = away(HOME_ALT + 60.0);
        nav.reached = true;
        rtl.on_active(&mut nav);
        assert_eq!(rtl.phase(), RtlPhase::Return);
        let frozen = nav.triplet.previous;
        assert!((frozen.alt - (HOME_ALT + 60.0)).abs() < 1e-3);

        // Return reached: previous stays on the leg origin until descent
        // invalidates it
        nav.reached = true;
        rtl.on_active(&mut nav);
        assert_eq!(rtl.phase(), RtlPhase::Descend);
        assert!(!nav.triplet.previous.valid);
        assert!((nav.triplet.previous.lat - frozen.lat).abs() < 1e-12);
    }

    #[test]
    fn test_descend_clamped_to_current_altitude() {
        let position = GlobalPosition::new(HOME_LAT, HOME_LON, HOME_ALT + 5.0);
        let mut nav = MockNavigator::new().with_home(home()).with_position(position);
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);
        assert_eq!(rtl.phase(), RtlPhase::Return);

        nav.reached = true;
        rtl.on_active(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Descend);
        let item = rtl.mission_item();
        assert!((item.altitude - (HOME_ALT + 5.0)).abs() < 1e-3);
        assert!(!item.autocontinue);
        assert!((item.yaw - 0.5).abs() < 1e-6);
        assert_eq!(nav.last_status(), Some("RTL: descend to 493 m (5 m above home)"));
    }

    #[test]
    fn test_vtol_descend_points_at_home_when_far() {
        let status = VehicleStatus {
            is_vtol: true,
            is_rotary_wing: true,
        };
        let mut nav = MockNavigator::new()
            .with_home(home())
            .with_position(away(HOME_ALT + 80.0))
            .with_status(status);
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);

        // Still ~222 m out when the return is declared reached
        nav.reached = true;
        rtl.on_active(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Descend);
        let yaw = rtl.mission_item().yaw;
        assert!((yaw.abs() - core::f32::consts::PI).abs() < 0.01);
    }

    #[test]
    fn test_transition_command_keeps_current_setpoint() {
        let status = VehicleStatus {
            is_vtol: true,
            is_rotary_wing: false,
        };
        let mut nav = MockNavigator::new()
            .with_home(home())
            .with_position(away(HOME_ALT + 80.0))
            .with_status(status);
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);
        let return_setpoint = nav.triplet.current;

        nav.reached = true;
        rtl.on_active(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::TransitionToMc);
        assert_eq!(nav.commands.len(), 1);
        assert_eq!(nav.commands[0].nav_cmd, NavCommand::DoVtolTransition);
        assert!((nav.commands[0].params[0] - VTOL_STATE_MC).abs() < f32::EPSILON);
        assert!((nav.triplet.current.lat - return_setpoint.lat).abs() < 1e-12);
        assert!((nav.triplet.current.alt - return_setpoint.alt).abs() < 1e-6);
    }

    #[test]
    fn test_loiter_unlimited_with_negative_delay() {
        let position = GlobalPosition::new(HOME_LAT, HOME_LON, HOME_ALT + 40.0);
        let mut nav = MockNavigator::new().with_home(home()).with_position(position);
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);

        nav.reached = true;
        rtl.on_active(&mut nav); // Descend
        nav.reached = true;
        rtl.on_active(&mut nav); // Loiter

        assert_eq!(rtl.phase(), RtlPhase::Loiter);
        let item = rtl.mission_item();
        assert_eq!(item.nav_cmd, NavCommand::LoiterUnlimited);
        assert!(!item.autocontinue);
        assert!(item.time_inside.abs() < f32::EPSILON);
        assert!((item.altitude - (HOME_ALT + 30.0)).abs() < 1e-3);
        assert!(nav.can_loiter_at_sp);
        assert_eq!(nav.last_status(), Some("RTL: completed, loiter"));
    }

    #[test]
    fn test_loiter_time_limited_with_positive_delay() {
        let position = GlobalPosition::new(HOME_LAT, HOME_LON, HOME_ALT + 40.0);
        let mut nav = MockNavigator::new().with_home(home()).with_position(position);
        nav.set_param("RTL_LAND_DELAY", 5.0).unwrap();
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);

        nav.reached = true;
        rtl.on_active(&mut nav);
        nav.reached = true;
        rtl.on_active(&mut nav);

        assert_eq!(rtl.phase(), RtlPhase::Loiter);
        let item = rtl.mission_item();
        assert_eq!(item.nav_cmd, NavCommand::LoiterTimeLimit);
        assert!((item.time_inside - 5.0).abs() < 1e-6);
        assert!(item.autocontinue);
        assert_eq!(nav.last_status(), Some("RTL: loiter 5.0s"));
    }

    #[test]
    fn test_land_item_at_home() {
        let position = GlobalPosition::new(HOME_LAT, HOME_LON, HOME_ALT + 40.0);
        let mut nav = MockNavigator::new().with_home(home()).with_position(position);
        nav.set_param("RTL_LAND_DELAY", 0.0).unwrap();
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);

        nav.reached = true;
        rtl.on_active(&mut nav); // Descend
        nav.reached = true;
        rtl.on_active(&mut nav); // Land

        assert_eq!(rtl.phase(), RtlPhase::Land);
        let item = rtl.mission_item();
        assert_eq!(item.nav_cmd, NavCommand::Land);
        assert!((item.altitude - HOME_ALT).abs() < 1e-3);
        assert!((item.yaw - 0.5).abs() < 1e-6);
        assert_eq!(nav.triplet.current.setpoint_type, SetpointType::Land);
        assert!(!nav.can_loiter_at_sp);
        assert_eq!(nav.last_status(), Some("RTL: land at home"));
    }

    #[test]
    fn test_on_inactive_resets_unless_loitering() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 10.0));
        let mut rtl = Rtl::new();
        rtl.on_activation(&mut nav);
        assert_eq!(rtl.phase(), RtlPhase::Climb);

        rtl.on_inactive(&mut nav);
        assert_eq!(rtl.phase(), RtlPhase::None);

        rtl.on_activation(&mut nav);
        nav.can_loiter_at_sp = true;
        rtl.on_inactive(&mut nav);
        assert_eq!(rtl.phase(), RtlPhase::Climb);
    }

    #[test]
    fn test_mode_trait_object() {
        let mut nav = MockNavigator::new().with_home(home()).with_position(away(HOME_ALT + 10.0));
        let mut rtl = Rtl::new();
        let mode: &mut dyn NavigatorMode = &mut rtl;

        assert_eq!(mode.name(), "RTL");
        mode.on_activation(&mut nav);
        assert_eq!(rtl.phase(), RtlPhase::Climb);
    }
}
