//! Platform service traits
//!
//! Trait definitions are pure and have no feature gates. Mock
//! implementations are always available for host testing; platform
//! implementations live in the firmware that embeds this crate.

pub mod time;

pub use time::{MockTime, TimeSource};
