//! maml: Android blackbox UI testing through the adb command-line tool
//!
//! Every operation is one or more invocations of the bridge executable
//! (`adb` by default). This library provides:
//! - A command dispatcher that runs the bridge and captures its output
//! - Device discovery, online-state checks and connect-with-wait
//! - Key events, directional pad, buttons, text entry and random text
//! - Package install/uninstall, activity launch and file removal
//!
//! # Example
//!
//! ```no_run
//! use maml::{Bridge, WaitPolicy};
//!
//! #[tokio::main]
//! async fn main() -> maml::Result<()> {
//!     let bridge = Bridge::new();
//!     let serial = bridge.connect(None, WaitPolicy::from_secs(30)).await?;
//!
//!     bridge.type_text("hello world", true, Some(&serial), None).await?;
//!     bridge.down(2, Some(&serial), Some(0.5)).await?;
//!     bridge.press(Some(&serial), None).await?;
//!     Ok(())
//! }
//! ```

pub mod error;

pub mod config;

pub mod adb;
pub mod random;

pub use error::{MamlError, Result};

pub use config::{
    ActionTimingConfig, BridgeConfig, ConnectionTimingConfig, TimingConfig, BRIDGE_CONFIG,
    TIMING_CONFIG,
};

pub use adb::{
    connect, keycode, list_devices, parse_devices, sleep, Bridge, BridgeCommand, CommandOutput,
    CommandRunner, DeviceInfo, DeviceState, Direction, ProcessRunner, RawOutput, WaitPolicy,
};

pub use random::{alphabet, random_text, CharClass};
