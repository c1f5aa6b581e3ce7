//! Application context and process lifecycle

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rpio_actuator::ActuatorController;
use rpio_condition::ControlRules;
use rpio_config::{Cli, ConfigFile, Settings};
use rpio_core::{OutputPin, PinError, SensorDriver};
use rpio_drivers::SysfsPin;
use rpio_poller::SensorPoller;
use rpio_query::QueryServer;
use rpio_state_store::{SharedStateStore, StateStore};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `info`.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

/// Resolve the daemon settings, installing logging on the way
///
/// `install` receives the merged verbosity once the configuration file has
/// been read and runs before the settings are resolved, so everything
/// resolution logs reaches the subscriber.
pub fn resolve_settings<F>(cli: &Cli, install: F) -> Result<Settings>
where
    F: FnOnce(bool) -> Result<()>,
{
    let file = ConfigFile::for_cli(cli)?;
    install(cli.verbose || file.verbose)?;

    if let Some(path) = &cli.config {
        debug!(path = %path.display(), "Loaded configuration file");
    }

    Ok(Settings::resolve(file, cli)?)
}

/// Open every configured pin as a sysfs GPIO output
///
/// All or nothing: when one line fails to open, the lines opened before it
/// are released again.
pub fn open_pins(root: &Path, pins: &[u32]) -> Result<Vec<Box<dyn OutputPin>>, PinError> {
    let mut opened: Vec<Box<dyn OutputPin>> = Vec::with_capacity(pins.len());

    for &number in pins {
        match SysfsPin::open_at(root, number) {
            Ok(pin) => opened.push(Box::new(pin)),
            Err(e) => {
                for pin in &mut opened {
                    if let Err(release) = pin.release() {
                        warn!(pin = pin.number(), error = %release, "Failed to release output");
                    }
                }
                return Err(e);
            }
        }
    }

    Ok(opened)
}

/// Force every output off and release it
pub fn cleanup(pins: Vec<Box<dyn OutputPin>>) -> Result<()> {
    info!("Reset actuators");
    let mut actuators = ActuatorController::new(pins);
    actuators.reset().context("failed to turn actuators off")?;
    actuators.release().context("failed to release actuators")?;
    Ok(())
}

/// Everything the running tasks share
pub struct AppContext {
    settings: Settings,
    store: SharedStateStore,
    rules: Arc<ControlRules>,
    shutdown_tx: broadcast::Sender<()>,
}

impl AppContext {
    /// Build the context around already opened outputs
    pub fn new(settings: Settings, pins: Vec<Box<dyn OutputPin>>) -> Self {
        let rules = ControlRules::parse(&settings.off, &settings.on, settings.off_first);
        debug!(
            off = %rules.off,
            on = %rules.on,
            off_first = rules.off_first,
            "Parsed control rules"
        );

        let store = Arc::new(StateStore::new(ActuatorController::new(pins)));
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            settings,
            store,
            rules: Arc::new(rules),
            shutdown_tx,
        }
    }

    /// Build the context, opening the configured pins through sysfs
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let pins = open_pins(&settings.gpio_root, &settings.pins).with_context(|| {
            format!("unable to connect to GPIO pins {:?}", settings.pins)
        })?;

        if pins.is_empty() {
            warn!("No actuator pins configured");
        }

        Ok(Self::new(settings, pins))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &SharedStateStore {
        &self.store
    }

    pub fn rules(&self) -> &Arc<ControlRules> {
        &self.rules
    }

    /// Spawn the poller and, when enabled, the query server
    ///
    /// The query socket is bound before the poller starts, so a bind
    /// failure leaves nothing running.
    pub async fn start<D: SensorDriver>(self, sensor: D) -> Result<Daemon> {
        let query = if self.settings.rpc.enabled {
            let server = QueryServer::bind(
                self.settings.listen_addr(),
                self.store.clone(),
                self.rules.clone(),
            )
            .await
            .with_context(|| format!("failed to bind query server on {}", self.settings.listen_addr()))?;
            let addr = server.local_addr()?;
            let handle = tokio::spawn(server.run(self.shutdown_tx.subscribe()));
            Some((addr, handle))
        } else {
            None
        };

        let poller = SensorPoller::new(self.store.clone(), self.rules.clone(), sensor)?
            .with_interval(self.settings.interval);
        let poller = tokio::spawn(poller.run(self.shutdown_tx.subscribe()));

        info!("Start rpioalert");

        Ok(Daemon {
            context: self,
            poller,
            query,
        })
    }
}

/// Handle on the running tasks
pub struct Daemon {
    context: AppContext,
    poller: JoinHandle<()>,
    query: Option<(SocketAddr, JoinHandle<()>)>,
}

impl Daemon {
    pub fn store(&self) -> &SharedStateStore {
        &self.context.store
    }

    /// Address the query server is bound to, if it runs
    pub fn query_addr(&self) -> Option<SocketAddr> {
        self.query.as_ref().map(|(addr, _)| *addr)
    }

    /// Stop both tasks and, unless told to keep them, reset the outputs
    pub async fn shutdown(self) -> Result<()> {
        info!("Stop rpioalert");
        let _ = self.context.shutdown_tx.send(());

        if let Some((_, handle)) = self.query {
            if let Err(e) = handle.await {
                warn!(error = %e, "Query server task failed");
            }
        }
        if let Err(e) = self.poller.await {
            warn!(error = %e, "Poller task failed");
        }

        if !self.context.settings.reset_on_exit {
            debug!("Leaving actuators as they are");
            return Ok(());
        }

        let mut state = self.context.store.lock().await;
        state
            .actuators_mut()
            .reset()
            .context("failed to turn actuators off")?;
        state
            .actuators_mut()
            .release()
            .context("failed to release actuators")?;
        info!("Reset actuators");

        Ok(())
    }
}
