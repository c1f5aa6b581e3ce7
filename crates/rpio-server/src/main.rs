//! rpioalert
//!
//! Samples a TEMPer sensor, switches GPIO outputs on threshold conditions
//! and optionally answers status queries over TCP.

use anyhow::Result;
use clap::Parser;
use rpio_config::Cli;
use rpio_drivers::CommandSensor;
use rpio_server::{cleanup, init_tracing, open_pins, resolve_settings, AppContext};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli, init_tracing)?;

    if settings.stop {
        let pins = open_pins(&settings.gpio_root, &settings.pins)?;
        return cleanup(pins);
    }

    let sensor = CommandSensor::new(settings.sensor.command.clone(), settings.sensor.args.clone());

    let context = match AppContext::from_settings(settings) {
        Ok(context) => context,
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };

    let daemon = context.start(sensor).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    daemon.shutdown().await
}
