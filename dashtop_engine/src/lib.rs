//! dashtop_engine: periodic system sampling with rolling histories and
//! atomic snapshot publication, plus the desktop service helpers the
//! dashboard exposes (installed apps, packages, network speed test,
//! persisted preferences).
//!
//! Presentation code talks to the engine through [`Monitor`]: pull the
//! current [`MetricsSnapshot`] or subscribe for change notifications. The
//! sampling paths never error; unreadable counters degrade to bounded
//! synthetic values tagged [`Reading::Simulated`].

pub mod apps;
mod busy;
pub mod error;
pub mod history;
pub mod pkg;
pub mod prefs;
pub mod publisher;
mod sampler;
mod shell;
pub mod sources;
pub mod speedtest;
pub mod types;

pub use error::EngineError;
pub use publisher::{Monitor, MonitorConfig};
pub use types::{BatteryIcon, BatteryState, MetricsSnapshot, ProcessRow, RamReading, Reading};
