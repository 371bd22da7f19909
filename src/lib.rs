//! rtl_navigator - Return-to-launch behavior for a flight navigator
//!
//! Pure no_std business logic: the RTL phase state machine and the
//! compact recent-path tracker. Platform services (telemetry, setpoint
//! publication, operator messages) are injected through the
//! [`navigator::Navigator`] trait so everything is testable on host.
//!
//! # Design Principles
//!
//! - **Pure no_std**: `std` is only linked for unit tests
//! - **No allocation**: fixed-capacity buffers (heapless, arrays)
//! - **Trait abstractions**: vehicle state and sinks injected via traits
//!
//! # Modules
//!
//! - [`geo`]: Great-circle distance/bearing and local map projection
//! - [`mission`]: Mission items and navigation command ids
//! - [`navigation`]: Position setpoint triplet consumed by the controller
//! - [`navigator`]: Navigator context trait, telemetry snapshots, reach detection
//! - [`mode`]: Navigator mode lifecycle trait
//! - [`rtl`]: Return-to-launch state machine
//! - [`tracker`]: Recent path tracker (bit-packed circular buffer)
//! - [`parameters`]: Parameter store and typed RTL/navigator parameters
//! - [`status`]: Operator status text queue
//! - [`traits`]: Time source abstraction

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod logging;

pub mod geo;
pub mod mission;
pub mod mode;
pub mod navigation;
pub mod navigator;
pub mod parameters;
pub mod rtl;
pub mod status;
pub mod tracker;
pub mod traits;

pub use mode::NavigatorMode;
pub use navigator::Navigator;
pub use rtl::{Rtl, RtlPhase};
pub use tracker::Tracker;
