//! Command-line surface

use std::path::PathBuf;

use clap::Parser;

/// Temperature/humidity alert daemon driving GPIO outputs
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "rpioalert", author, version, about, long_about = None)]
pub struct Cli {
    /// GPIO pin of an actuator output (repeatable)
    #[arg(long = "pin", value_name = "N")]
    pub pins: Vec<u32>,

    /// Condition that turns the outputs off, `subject:cmp:threshold[:joiner]` (repeatable)
    #[arg(long = "off", value_name = "SPEC")]
    pub off: Vec<String>,

    /// Condition that turns the outputs on, `subject:cmp:threshold[:joiner]` (repeatable)
    #[arg(long = "on", value_name = "SPEC")]
    pub on: Vec<String>,

    /// Check the OFF condition before the ON condition
    #[arg(long, alias = "off_first")]
    pub off_first: bool,

    /// Start the query server
    #[arg(long)]
    pub rpc: bool,

    /// Query server listen address [default: 0.0.0.0]
    #[arg(long, alias = "rpc_listen", value_name = "ADDR")]
    pub rpc_listen: Option<String>,

    /// Query server port [default: 15555]
    #[arg(long, alias = "rpc_port", value_name = "PORT")]
    pub rpc_port: Option<u16>,

    /// Log per-cycle diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Turn every configured output off, release it and exit
    #[arg(long)]
    pub stop: bool,

    /// YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Sensor reader program [default: temper]
    #[arg(long, value_name = "PROGRAM")]
    pub sensor_command: Option<String>,

    /// Argument passed to the sensor reader (repeatable) [default: --json]
    #[arg(long = "sensor-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub sensor_args: Vec<String>,

    /// Seconds between two poll cycles [default: 1]
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Leave the outputs as they are on exit
    #[arg(long)]
    pub keep_on_exit: bool,

    /// Root of the sysfs GPIO interface [default: /sys/class/gpio]
    #[arg(long, value_name = "PATH")]
    pub gpio_root: Option<PathBuf>,
}
