//! rpioalert daemon
//!
//! Wires the components together behind one explicit [`AppContext`]:
//!
//! ```text
//! Settings ─► AppContext { store, rules, shutdown } ─► Daemon
//!                                                     ├─ SensorPoller task
//!                                                     └─ QueryServer task (optional)
//! ```

mod context;

pub use context::{cleanup, init_tracing, open_pins, resolve_settings, AppContext, Daemon};
