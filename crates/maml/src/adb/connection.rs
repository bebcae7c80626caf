//! Device discovery, online checks and connect-with-wait

use super::dispatch::{Bridge, BridgeCommand, CommandOutput, CommandRunner};
use crate::error::{MamlError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Header printed by `adb devices` before the device rows
const LISTING_HEADER: &str = "List of devices attached";

/// State column reported by `get-state` and `devices`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// Online and fully booted
    Device,
    Offline,
    Unauthorized,
    Bootloader,
    Recovery,
    Sideload,
    /// The host user may not open the USB device
    NoPermissions,
    /// Anything else; empty when the bridge printed no state
    Other(String),
}

impl DeviceState {
    /// Parse a state column; only its first word counts, except for `no permissions`
    pub fn parse(state: &str) -> Self {
        let state = state.trim();
        if state.starts_with("no permissions") {
            return Self::NoPermissions;
        }
        match state.split_whitespace().next().unwrap_or("") {
            "device" => Self::Device,
            "offline" => Self::Offline,
            "unauthorized" => Self::Unauthorized,
            "bootloader" => Self::Bootloader,
            "recovery" => Self::Recovery,
            "sideload" => Self::Sideload,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Device => "device",
            Self::Offline => "offline",
            Self::Unauthorized => "unauthorized",
            Self::Bootloader => "bootloader",
            Self::Recovery => "recovery",
            Self::Sideload => "sideload",
            Self::NoPermissions => "no permissions",
            Self::Other(s) => s,
        }
    }

    pub fn is_online(&self) -> bool {
        *self == Self::Device
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(s) if s.is_empty() => f.write_str("unknown"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl Serialize for DeviceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the device listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub serial: String,
    pub state: DeviceState,
}

/// How long `connect` waits for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Block on the bridge's own `wait-for-device`
    Forever,
    /// Poll until the deadline passes
    Within(Duration),
}

impl WaitPolicy {
    /// Zero or negative seconds means wait forever
    pub fn from_secs(wait: i64) -> Self {
        if wait <= 0 {
            Self::Forever
        } else {
            Self::Within(Duration::from_secs(wait as u64))
        }
    }
}

/// Parse `adb devices` output into rows, skipping daemon notices and the header
///
/// Every non-empty row is kept in order. A row without a state column keeps
/// its first word as the serial and an empty `Other` state, so it is never online.
pub fn parse_devices(output: &str) -> Vec<DeviceInfo> {
    let mut lines = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('*'));

    // The first remaining line is the header slot, whatever it says
    if let Some(header) = lines.next() {
        if !header.starts_with(LISTING_HEADER) {
            debug!(header, "unexpected device listing header");
        }
    }

    lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (serial, state) = line
                .split_once(char::is_whitespace)
                .unwrap_or((line, ""));
            DeviceInfo {
                serial: serial.to_string(),
                state: DeviceState::parse(state),
            }
        })
        .collect()
}

impl<R: CommandRunner> Bridge<R> {
    /// Run `get-state` for a device
    pub async fn get_state(&self, serial: Option<&str>) -> Result<CommandOutput> {
        self.dispatch(&BridgeCommand::new("get-state").serial(serial))
            .await
    }

    /// Parsed state of a device
    pub async fn device_state(&self, serial: Option<&str>) -> Result<DeviceState> {
        let output = self.get_state(serial).await?;
        Ok(DeviceState::parse(&output.stdout))
    }

    /// List all attached devices with their states
    pub async fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        let output = self.dispatch(&BridgeCommand::new("devices")).await?;
        Ok(parse_devices(&output.stdout))
    }

    /// Serial of the first listed device, if that device is online
    ///
    /// Only the first row is considered; later rows are ignored even when
    /// the first one is offline.
    pub async fn first_device(&self) -> Result<Option<String>> {
        let devices = self.list_devices().await?;
        Ok(devices
            .into_iter()
            .next()
            .filter(|d| d.state.is_online())
            .map(|d| d.serial))
    }

    /// Resolve the serial an action should target, requiring it to be online
    pub(crate) async fn require_online(&self, serial: Option<&str>) -> Result<String> {
        let serial = match serial.filter(|s| !s.is_empty()) {
            Some(serial) => serial.to_string(),
            None => self.first_device().await?.ok_or(MamlError::NoDevice)?,
        };

        match self.device_state(Some(&serial)).await? {
            DeviceState::Device => Ok(serial),
            state => {
                debug!(serial = %serial, state = %state, "device not online");
                Err(MamlError::DeviceOffline(serial))
            }
        }
    }

    /// Check whether a device is online; with no serial, the first listed device is checked
    pub async fn is_online(&self, serial: Option<&str>) -> Result<bool> {
        match self.require_online(serial).await {
            Ok(_) => Ok(true),
            Err(MamlError::NoDevice) => {
                warn!("No device is connected...");
                Ok(false)
            }
            Err(MamlError::DeviceOffline(serial)) => {
                warn!("Device {} is not connected...", serial);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Block until the bridge reports a device
    pub async fn wait_for_device(&self, serial: Option<&str>) -> Result<CommandOutput> {
        self.dispatch(&BridgeCommand::new("wait-for-device").serial(serial))
            .await
    }

    /// Find a usable device, waiting according to `policy`
    pub async fn connect(&self, serial: Option<&str>, policy: WaitPolicy) -> Result<String> {
        let serial = serial.filter(|s| !s.is_empty());

        if let Some(serial) = serial {
            if self.is_online(Some(serial)).await? {
                return Ok(serial.to_string());
            }
        }

        match policy {
            WaitPolicy::Forever => {
                self.wait_for_device(serial).await?;
                match serial {
                    Some(serial) => {
                        if self.is_online(Some(serial)).await? {
                            Ok(serial.to_string())
                        } else {
                            Err(MamlError::DeviceOffline(serial.to_string()))
                        }
                    }
                    None => self.first_device().await?.ok_or(MamlError::NoDevice),
                }
            }
            WaitPolicy::Within(limit) => self.poll_for_device(serial, limit).await,
        }
    }

    async fn poll_for_device(&self, serial: Option<&str>, limit: Duration) -> Result<String> {
        let interval = self.poll_interval();
        let started = Instant::now();
        // A limit past the clock's range never expires
        let deadline = started.checked_add(limit);
        let mut attempts = 0u32;

        while deadline.map_or(true, |deadline| Instant::now() < deadline) {
            attempts = attempts.saturating_add(1);

            let found = match serial {
                Some(serial) => {
                    if self.is_online(Some(serial)).await? {
                        Some(serial.to_string())
                    } else {
                        None
                    }
                }
                None => self.first_device().await?,
            };

            if let Some(found) = found {
                info!(serial = %found, attempts, "device online");
                return Ok(found);
            }

            let pause = match deadline {
                Some(deadline) => interval.min(deadline.saturating_duration_since(Instant::now())),
                None => interval,
            };
            debug!(attempts, "no device yet, retrying in {:?}", pause);
            tokio::time::sleep(pause).await;
        }

        Err(MamlError::Timeout {
            attempts,
            waited: started.elapsed(),
        })
    }
}

/// Quick helper to list attached devices with the default bridge
pub async fn list_devices() -> Result<Vec<DeviceInfo>> {
    Bridge::new().list_devices().await
}

/// Quick helper to find a device with the default bridge
pub async fn connect(serial: Option<&str>, policy: WaitPolicy) -> Result<String> {
    Bridge::new().connect(serial, policy).await
}
