//! Core data types shared between the sampling engine and its consumers.

use chrono::{DateTime, Utc};

use crate::history::{METRIC_HISTORY_LEN, TEMP_HISTORY_LEN};

/// A scalar metric tagged with its provenance. Probes that cannot reach the
/// OS counter produce a bounded synthetic value instead of an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Real(f64),
    Simulated(f64),
}

impl Reading {
    pub fn value(self) -> f64 {
        match self {
            Reading::Real(v) | Reading::Simulated(v) => v,
        }
    }

    pub fn is_simulated(self) -> bool {
        matches!(self, Reading::Simulated(_))
    }

    /// Transform the value while keeping the provenance tag.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Reading {
        match self {
            Reading::Real(v) => Reading::Real(f(v)),
            Reading::Simulated(v) => Reading::Simulated(f(v)),
        }
    }
}

/// Memory reading. Percent and byte figures always come from the same
/// underlying query, so they stay mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RamReading {
    pub percent: Reading,
    pub used_gb: f64,
    pub total_gb: f64,
}

impl RamReading {
    /// Placeholder used when the memory counters are unavailable.
    /// GB figures are derived from the synthetic percent so the pair
    /// still agrees with itself.
    pub fn simulated(percent: f64, assumed_total_gb: f64) -> Self {
        RamReading {
            percent: Reading::Simulated(percent),
            used_gb: percent / 100.0 * assumed_total_gb,
            total_gb: assumed_total_gb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatteryState {
    pub level_pct: f64,
    pub charging: bool,
}

/// Icon bucket for a battery state. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryIcon {
    Charging,
    Full,
    High,
    Medium,
    Low,
    Critical,
}

impl BatteryIcon {
    /// Charging wins over every level bucket.
    pub fn for_state(state: BatteryState) -> Self {
        if state.charging {
            return BatteryIcon::Charging;
        }
        match state.level_pct {
            l if l >= 85.0 => BatteryIcon::Full,
            l if l >= 60.0 => BatteryIcon::High,
            l if l >= 35.0 => BatteryIcon::Medium,
            l if l >= 10.0 => BatteryIcon::Low,
            _ => BatteryIcon::Critical,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            BatteryIcon::Charging => "⚡",
            BatteryIcon::Full => "█",
            BatteryIcon::High => "▓",
            BatteryIcon::Medium => "▒",
            BatteryIcon::Low => "░",
            BatteryIcon::Critical => "!",
        }
    }
}

/// One row of the top-processes table. The whole table is replaced on each
/// process cycle; pids are unique within a snapshot but carry no identity
/// across snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    /// May exceed 100 on multi-core hosts; reported as-is.
    pub cpu_pct: f64,
    pub mem_bytes: u64,
    /// Best effort, synthetic. Per-process GPU accounting is not exposed.
    pub gpu_pct: f64,
}

/// Message from a cadence task to the publisher. Each variant is applied
/// as one atomic batch.
#[derive(Debug, Clone)]
pub enum SampleUpdate {
    Fast {
        cpu: Reading,
        ram: RamReading,
        gpu: Reading,
        temperature: Reading,
    },
    Processes(Vec<ProcessRow>),
    Battery(BatteryState),
}

/// Published aggregate. Immutable once published; consumers hold it behind
/// an `Arc` and histories are already copied out of the ring buffers.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub cpu: Reading,
    pub ram: RamReading,
    pub gpu: Reading,
    pub temperature: Reading,
    pub battery: BatteryState,
    pub processes: Vec<ProcessRow>,
    pub cpu_history: Vec<f64>,
    pub ram_history: Vec<f64>,
    pub gpu_history: Vec<f64>,
    pub temp_history: Vec<f64>,
    pub sampled_at: DateTime<Utc>,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        MetricsSnapshot {
            cpu: Reading::Simulated(0.0),
            ram: RamReading {
                percent: Reading::Simulated(0.0),
                used_gb: 0.0,
                total_gb: 0.0,
            },
            gpu: Reading::Simulated(0.0),
            temperature: Reading::Simulated(0.0),
            battery: BatteryState::default(),
            processes: Vec::new(),
            cpu_history: vec![0.0; METRIC_HISTORY_LEN],
            ram_history: vec![0.0; METRIC_HISTORY_LEN],
            gpu_history: vec![0.0; METRIC_HISTORY_LEN],
            temp_history: vec![0.0; TEMP_HISTORY_LEN],
            sampled_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_map_keeps_provenance() {
        assert_eq!(Reading::Real(10.0).map(|v| v * 2.0), Reading::Real(20.0));
        assert_eq!(
            Reading::Simulated(10.0).map(|v| v * 2.0),
            Reading::Simulated(20.0)
        );
    }

    #[test]
    fn charging_icon_wins_at_any_level() {
        for level in [0.0, 5.0, 42.0, 80.0, 100.0] {
            let icon = BatteryIcon::for_state(BatteryState {
                level_pct: level,
                charging: true,
            });
            assert_eq!(icon, BatteryIcon::Charging);
        }
    }

    #[test]
    fn discharging_icon_tracks_level() {
        let at = |level_pct| {
            BatteryIcon::for_state(BatteryState {
                level_pct,
                charging: false,
            })
        };
        assert_eq!(at(100.0), BatteryIcon::Full);
        assert_eq!(at(70.0), BatteryIcon::High);
        assert_eq!(at(50.0), BatteryIcon::Medium);
        assert_eq!(at(20.0), BatteryIcon::Low);
        assert_eq!(at(3.0), BatteryIcon::Critical);
    }

    #[test]
    fn simulated_ram_stays_self_consistent() {
        let ram = RamReading::simulated(55.0, 16.0);
        let derived = ram.used_gb / ram.total_gb * 100.0;
        assert!((derived - ram.percent.value()).abs() < 1e-9);
    }
}
