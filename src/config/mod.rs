//! Configuration: TOML file merged under CLI flags.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, PacingConfig, SerialConfig};
