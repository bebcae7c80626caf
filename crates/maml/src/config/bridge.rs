//! Bridge tool location and operation defaults

use lazy_static::lazy_static;
use std::env;

/// Settings for locating and driving the bridge tool
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Executable name or path of the bridge tool
    pub adb_path: String,
    /// Number of deletes issued by `clear` when no count is given
    pub clear_count: u32,
    /// Length of generated text for `random_type`
    pub random_length: usize,
    /// Character class codes for `random_type`
    pub random_types: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            adb_path: env::var("MAML_ADB_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "adb".to_string()),
            clear_count: env::var("MAML_CLEAR_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            random_length: env::var("MAML_RANDOM_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            random_types: "a".to_string(),
        }
    }
}

lazy_static! {
    /// Global bridge configuration instance
    pub static ref BRIDGE_CONFIG: BridgeConfig = BridgeConfig::default();
}
