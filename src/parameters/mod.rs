//! Parameter management types
//!
//! A bounded in-memory [`ParameterStore`] plus typed views over the
//! entries the navigator core consumes. Persistence and the MAVLink
//! parameter protocol belong to the embedding firmware.

pub mod error;
pub mod navigator;
pub mod rtl;
pub mod storage;

pub use error::ParameterError;
pub use navigator::NavigatorParams;
pub use rtl::{RtlParams, DELAY_SIGMA};
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
