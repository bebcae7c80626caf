//! ADB (Android Debug Bridge) module for Android device control
//!
//! This module provides:
//! - `dispatch`: Bridge command construction and execution
//! - `connection`: Device discovery, online checks and waiting for devices
//! - `device`: Key events, directional pad, buttons and package management
//! - `input`: Text clearing and typing
//! - `keycode`: Android KeyEvent codes

mod connection;
mod device;
mod dispatch;
mod input;
pub mod keycode;

#[cfg(test)]
pub(crate) mod mock;

pub use connection::{
    connect, list_devices, parse_devices, DeviceInfo, DeviceState, WaitPolicy,
};
pub use device::Direction;
pub use dispatch::{
    sleep, Bridge, BridgeCommand, CommandOutput, CommandRunner, ProcessRunner, RawOutput,
};
