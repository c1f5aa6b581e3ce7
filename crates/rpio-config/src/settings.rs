//! Resolved settings

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::cli::Cli;
use crate::error::{ConfigError, ConfigResult};
use crate::file::ConfigFile;

pub const DEFAULT_RPC_LISTEN: &str = "0.0.0.0";
pub const DEFAULT_RPC_PORT: u16 = 15555;
pub const DEFAULT_SENSOR_COMMAND: &str = "temper";
pub const DEFAULT_SENSOR_ARGS: &[&str] = &["--json"];
pub const DEFAULT_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// Query server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcSettings {
    pub enabled: bool,
    pub listen: IpAddr,
    pub port: u16,
}

/// External sensor reader invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSettings {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_SENSOR_COMMAND.to_string(),
            args: DEFAULT_SENSOR_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Fully resolved daemon settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub pins: Vec<u32>,
    pub off: Vec<String>,
    pub on: Vec<String>,
    pub off_first: bool,
    pub rpc: RpcSettings,
    pub verbose: bool,
    pub stop: bool,
    pub sensor: SensorSettings,
    pub interval: Duration,
    pub reset_on_exit: bool,
    pub gpio_root: PathBuf,
}

impl Settings {
    /// Resolve settings from the command line and the file it names
    pub fn from_cli(cli: &Cli) -> ConfigResult<Self> {
        Self::resolve(ConfigFile::for_cli(cli)?, cli)
    }

    /// Layer `cli` over `file` over the defaults
    pub fn resolve(file: ConfigFile, cli: &Cli) -> ConfigResult<Self> {
        let mut pins = Vec::with_capacity(file.pins.len() + cli.pins.len());
        for pin in file.pins.iter().chain(&cli.pins) {
            if pins.contains(pin) {
                warn!(pin, "Ignoring duplicate actuator pin");
                continue;
            }
            pins.push(*pin);
        }

        let listen = cli
            .rpc_listen
            .as_deref()
            .or(file.rpc.listen.as_deref())
            .unwrap_or(DEFAULT_RPC_LISTEN);
        let listen: IpAddr = listen.parse().map_err(|_| ConfigError::InvalidValue {
            key: "rpc.listen".to_string(),
            reason: format!("'{}' is not an IP address", listen),
        })?;

        let interval_secs = cli
            .interval
            .or(file.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "interval".to_string(),
                reason: "poll interval must be at least one second".to_string(),
            });
        }

        let mut sensor = match (&cli.sensor_command, file.sensor) {
            (Some(command), _) => SensorSettings {
                command: command.clone(),
                args: Vec::new(),
            },
            (None, Some(section)) => SensorSettings {
                command: section.command,
                args: section.args,
            },
            (None, None) => SensorSettings::default(),
        };
        if !cli.sensor_args.is_empty() {
            sensor.args = cli.sensor_args.clone();
        }
        if sensor.command.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sensor.command".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            pins,
            off: file.off.into_iter().chain(cli.off.iter().cloned()).collect(),
            on: file.on.into_iter().chain(cli.on.iter().cloned()).collect(),
            off_first: file.off_first || cli.off_first,
            rpc: RpcSettings {
                enabled: file.rpc.enabled || cli.rpc,
                listen,
                port: cli.rpc_port.or(file.rpc.port).unwrap_or(DEFAULT_RPC_PORT),
            },
            verbose: file.verbose || cli.verbose,
            stop: cli.stop,
            sensor,
            interval: Duration::from_secs(interval_secs),
            reset_on_exit: !cli.keep_on_exit && file.reset_on_exit.unwrap_or(true),
            gpio_root: cli
                .gpio_root
                .clone()
                .or(file.gpio_root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GPIO_ROOT)),
        })
    }

    /// Socket address the query server binds
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.rpc.listen, self.rpc.port)
    }
}
