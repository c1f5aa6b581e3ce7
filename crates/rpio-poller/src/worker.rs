//! Dedicated thread for blocking sensor reads

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use rpio_core::{RawReading, SensorDriver, SensorError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{CycleError, CycleResult, PollerError};

type ReadReply = oneshot::Sender<Result<Vec<RawReading>, SensorError>>;

/// Owner of the single sensor worker thread
///
/// Reads are handed to the thread over a one-slot channel and answered on a
/// oneshot, so the async side never blocks and at most one read is ever in
/// flight.
pub struct SensorWorker {
    requests: Option<mpsc::Sender<ReadReply>>,
    thread: Option<JoinHandle<()>>,
}

impl SensorWorker {
    /// Move `driver` onto a new worker thread
    pub fn spawn<D: SensorDriver>(mut driver: D) -> Result<Self, PollerError> {
        let (requests, mut rx) = mpsc::channel::<ReadReply>(1);

        let thread = thread::Builder::new()
            .name("sensor-worker".to_string())
            .spawn(move || {
                while let Some(reply) = rx.blocking_recv() {
                    let _ = reply.send(read_guarded(&mut driver));
                }
                debug!("Sensor worker thread exiting");
            })
            .map_err(PollerError::SpawnWorker)?;

        Ok(Self {
            requests: Some(requests),
            thread: Some(thread),
        })
    }

    /// Read the sensor on the worker thread
    pub async fn read(&self) -> CycleResult<Vec<RawReading>> {
        let requests = self.requests.as_ref().ok_or(CycleError::WorkerStopped)?;
        let (reply, response) = oneshot::channel();

        requests
            .send(reply)
            .await
            .map_err(|_| CycleError::WorkerStopped)?;

        let readings = response.await.map_err(|_| CycleError::WorkerStopped)??;
        Ok(readings)
    }

    /// Close the request channel and wait for the thread to finish
    pub async fn shutdown(mut self) {
        self.requests.take();

        if let Some(thread) = self.thread.take() {
            match tokio::task::spawn_blocking(move || thread.join()).await {
                Ok(Ok(())) => debug!("Sensor worker stopped"),
                Ok(Err(_)) => warn!("Sensor worker thread panicked"),
                Err(e) => warn!(error = %e, "Failed to join sensor worker"),
            }
        }
    }
}

/// A panicking driver fails the current read instead of the worker thread
fn read_guarded<D: SensorDriver>(driver: &mut D) -> Result<Vec<RawReading>, SensorError> {
    panic::catch_unwind(AssertUnwindSafe(|| driver.read())).unwrap_or_else(|_| {
        warn!("Sensor driver panicked during read");
        Err(SensorError::CommandFailed(
            "sensor driver panicked".to_string(),
        ))
    })
}
