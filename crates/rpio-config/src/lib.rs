//! Configuration for rpioalert
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file (`--config rpioalert.yaml`)
//! 3. command-line flags
//!
//! Repeatable lists (`--pin`, `--off`, `--on`) are appended to the file's
//! lists, switches are OR-ed, and scalar options replace the file value.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use rpio_config::{Cli, Settings};
//!
//! let settings = Settings::from_cli(&Cli::parse())?;
//! ```

mod cli;
mod error;
mod file;
mod settings;

pub use cli::Cli;
pub use error::{ConfigError, ConfigResult};
pub use file::{ConfigFile, RpcSection, SensorSection};
pub use settings::{
    RpcSettings, SensorSettings, Settings, DEFAULT_GPIO_ROOT, DEFAULT_INTERVAL_SECS,
    DEFAULT_RPC_LISTEN, DEFAULT_RPC_PORT, DEFAULT_SENSOR_ARGS, DEFAULT_SENSOR_COMMAND,
};
