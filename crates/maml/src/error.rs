//! Error types for bridge operations

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MamlError {
    #[error("Bridge tool not found: {0}")]
    BridgeNotFound(String),

    #[error("Failed to run `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Device {0} is not connected")]
    DeviceOffline(String),

    #[error("No device is connected")]
    NoDevice,

    #[error("No device came online after {attempts} attempts ({waited:?})")]
    Timeout { attempts: u32, waited: Duration },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl MamlError {
    /// True when the bridge never ran, as opposed to a device-side failure
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::BridgeNotFound(_) | Self::Launch { .. })
    }
}

pub type Result<T> = std::result::Result<T, MamlError>;
