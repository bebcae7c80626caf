//! Timing configuration for device operations

use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

/// Seconds as a `Duration`; non-positive or NaN is zero, out of range saturates
pub(crate) fn secs_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

/// Parse a non-negative number of seconds that fits in a `Duration`
fn parse_secs(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| *v >= 0.0 && Duration::try_from_secs_f64(*v).is_ok())
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| parse_secs(&v))
        .unwrap_or(default)
}

/// Delays applied after UI actions
#[derive(Debug, Clone)]
pub struct ActionTimingConfig {
    /// Seconds to sleep after an action when the caller passes no delay
    pub default_action_delay: f64,
}

impl Default for ActionTimingConfig {
    fn default() -> Self {
        Self {
            default_action_delay: env_f64("MAML_ACTION_DELAY", 0.0),
        }
    }
}

/// Polling behaviour while waiting for a device
#[derive(Debug, Clone)]
pub struct ConnectionTimingConfig {
    pub poll_interval: f64,
}

impl ConnectionTimingConfig {
    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin the bridge tool.
        secs_to_duration(self.poll_interval.max(0.01))
    }
}

impl Default for ConnectionTimingConfig {
    fn default() -> Self {
        Self {
            poll_interval: env_f64("MAML_POLL_INTERVAL", 1.0),
        }
    }
}

/// Master timing configuration
#[derive(Debug, Clone, Default)]
pub struct TimingConfig {
    pub action: ActionTimingConfig,
    pub connection: ConnectionTimingConfig,
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}
