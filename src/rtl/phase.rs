//! RTL phase sequence
//!
//! ```text
//!        activation
//! None ─────┬───────────────────────────────────────────────────► Landed  (on the ground)
//!           ├──► Climb ──┐
//!           └────────────┴──► Return ──► Descend ──► Loiter ──► Land ──► Landed
//!                              │  ▲         │                    ▲
//!                              ▼  │         └────────────────────┘
//!                         TransitionToMc        (land delay ~ 0)
//! ```
//!
//! `None` and `Landed` have no successor. Activation on the ground enters
//! `Landed` directly.

use crate::navigator::VehicleStatus;
use crate::parameters::RtlParams;

/// Phase of the return-to-launch sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RtlPhase {
    /// Not started (re-entry point is chosen on activation)
    #[default]
    None,
    /// Climbing to the return altitude above the current position
    Climb,
    /// Flying to home at the return altitude
    Return,
    /// VTOL switching from fixed-wing to rotary-wing flight
    TransitionToMc,
    /// Descending over home to the descend altitude
    Descend,
    /// Holding over home before (or instead of) landing
    Loiter,
    /// Landing at home
    Land,
    /// On the ground, motors idle
    Landed,
}

impl RtlPhase {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            RtlPhase::None => "None",
            RtlPhase::Climb => "Climb",
            RtlPhase::Return => "Return",
            RtlPhase::TransitionToMc => "TransitionToMc",
            RtlPhase::Descend => "Descend",
            RtlPhase::Loiter => "Loiter",
            RtlPhase::Land => "Land",
            RtlPhase::Landed => "Landed",
        }
    }

    /// Phase to enter once the current phase's target is reached
    pub fn next(self, status: VehicleStatus, params: &RtlParams) -> Self {
        match self {
            RtlPhase::Climb => RtlPhase::Return,
            RtlPhase::Return if status.is_vtol_in_fixed_wing() => RtlPhase::TransitionToMc,
            RtlPhase::Return => RtlPhase::Descend,
            RtlPhase::TransitionToMc => RtlPhase::Return,
            RtlPhase::Descend if params.loiter_before_land() => RtlPhase::Loiter,
            RtlPhase::Descend => RtlPhase::Land,
            RtlPhase::Loiter => RtlPhase::Land,
            RtlPhase::Land => RtlPhase::Landed,
            RtlPhase::None => RtlPhase::None,
            RtlPhase::Landed => RtlPhase::Landed,
        }
    }

    /// True if no phase follows this one
    pub fn is_terminal(self) -> bool {
        matches!(self, RtlPhase::None | RtlPhase::Landed)
    }
}
