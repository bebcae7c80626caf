//! Configuration module for maml
//!
//! This module contains:
//! - `bridge`: Bridge tool location and operation defaults
//! - `timing`: Delays and polling intervals

mod bridge;
mod timing;

pub use bridge::{BridgeConfig, BRIDGE_CONFIG};
pub(crate) use timing::secs_to_duration;
pub use timing::{ActionTimingConfig, ConnectionTimingConfig, TimingConfig, TIMING_CONFIG};
