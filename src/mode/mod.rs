//! Navigator mode lifecycle
//!
//! - `NavigatorMode` trait: activation/active/inactive entry points
//!   driven by the navigator scheduler

mod traits;

pub use traits::NavigatorMode;
