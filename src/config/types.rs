use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Serial device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Device path (default: `/dev/ttyUSB0`).
    #[serde(default = "default_device")]
    pub device: String,
    /// Baud rate (default: 9600).
    #[serde(default = "default_baud")]
    pub baud: u32,
}

/// Inter-line pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause after each line, in milliseconds (default: 500).
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

fn default_device() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud() -> u32 {
    9600
}

fn default_pause_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            baud: default_baud(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
        }
    }
}
