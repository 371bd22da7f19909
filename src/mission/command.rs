//! Navigation command ids
//!
//! The subset of MAVLink `MAV_CMD` ids the RTL sequence emits, plus the
//! NAV/DO classification: ids at or below `MAV_CMD_NAV_LAST` (95) drive
//! navigation and carry a position, everything above is an immediate
//! command with no positional meaning.

/// MAV_CMD_NAV_LAST: command ids at or below this value are NAV commands.
pub const MAV_CMD_NAV_LAST: u16 = 95;

/// MAV_VTOL_STATE_MC: target state for a transition to rotary-wing flight
pub const VTOL_STATE_MC: f32 = 3.0;

/// MAV_VTOL_STATE_FW: target state for a transition to fixed-wing flight
pub const VTOL_STATE_FW: f32 = 4.0;

/// Navigation command carried by a mission item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum NavCommand {
    /// Hold still on the ground, motors idle
    #[default]
    Idle = 0,
    /// Fly to a position
    Waypoint = 16,
    /// Circle/hold at a position until commanded otherwise
    LoiterUnlimited = 17,
    /// Hold at a position for `time_inside` seconds
    LoiterTimeLimit = 19,
    /// Land at a position
    Land = 21,
    /// Switch VTOL flight mode (param 1 = target VTOL state)
    DoVtolTransition = 3000,
}

impl NavCommand {
    /// MAVLink command id
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Look up a command by MAVLink id
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            0 => Some(NavCommand::Idle),
            16 => Some(NavCommand::Waypoint),
            17 => Some(NavCommand::LoiterUnlimited),
            19 => Some(NavCommand::LoiterTimeLimit),
            21 => Some(NavCommand::Land),
            3000 => Some(NavCommand::DoVtolTransition),
            _ => None,
        }
    }

    /// True if the command carries a geographic position
    pub fn has_location(self) -> bool {
        cmd_has_location(self.id())
    }

    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            NavCommand::Idle => "IDLE",
            NavCommand::Waypoint => "WAYPOINT",
            NavCommand::LoiterUnlimited => "LOITER_UNLIM",
            NavCommand::LoiterTimeLimit => "LOITER_TIME",
            NavCommand::Land => "LAND",
            NavCommand::DoVtolTransition => "DO_VTOL_TRANSITION",
        }
    }
}

/// Classify a command id as NAV (drives navigation) or DO (immediate action).
pub fn is_nav_command(command_id: u16) -> bool {
    command_id <= MAV_CMD_NAV_LAST
}

/// Check if a command id carries a geographic location.
///
/// All NAV commands carry location data while DO commands do not.
pub fn cmd_has_location(command_id: u16) -> bool {
    is_nav_command(command_id)
}
