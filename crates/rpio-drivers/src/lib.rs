//! Driver shims for rpioalert
//!
//! Thin implementations of the [`SensorDriver`](rpio_core::SensorDriver) and
//! [`OutputPin`](rpio_core::OutputPin) traits:
//!
//! - [`CommandSensor`] - runs an external reader (e.g. `temper --json`) and
//!   decodes its JSON output
//! - [`SysfsPin`] - a Linux GPIO line driven through a sysfs class directory
//! - [`memory`] - in-memory fakes for tests and dry runs

mod command;
pub mod memory;
mod sysfs;

pub use command::CommandSensor;
pub use sysfs::SysfsPin;
