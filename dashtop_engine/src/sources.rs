//! Metric sources. Every reader has a total contract: it returns a usable
//! value on every call, substituting bounded synthetic data when the OS
//! counter is unavailable, and never an error.

use std::cmp::Ordering;

use rand::Rng;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::shell::run_command;
use crate::types::{BatteryState, ProcessRow, RamReading, Reading};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
/// Assumed pool size when memory counters cannot be read.
const FALLBACK_TOTAL_GB: f64 = 16.0;

/// Persistent sysinfo handle. CPU usage is a delta against the previous
/// refresh, so the handle must live across ticks.
pub struct SystemProbe {
    sys: System,
}

impl SystemProbe {
    pub fn new() -> Self {
        SystemProbe { sys: System::new() }
    }

    /// CPU load proxy: this process's own usage normalized by logical core
    /// count, clamped to 0..100. First call reports 0 until a delta exists.
    pub fn cpu_usage(&mut self) -> Reading {
        self.sys.refresh_cpu_usage();
        let cores = self.sys.cpus().len().max(1);
        let own = sysinfo::get_current_pid().ok().and_then(|pid| {
            self.sys.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_cpu(),
            );
            self.sys.process(pid).map(|p| p.cpu_usage() as f64)
        });
        match own {
            Some(raw) => Reading::Real((raw / cores as f64).clamp(0.0, 100.0)),
            None => {
                warn!("cpu probe unavailable, simulating");
                Reading::Simulated(rand::rng().random_range(15.0..45.0))
            }
        }
    }

    /// One memory refresh feeds both the percent and the GB figures, so the
    /// pair can never disagree.
    pub fn ram_usage(&mut self) -> RamReading {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            warn!("memory counters unavailable, simulating");
            let pct = rand::rng().random_range(40.0..70.0);
            return RamReading::simulated(pct, FALLBACK_TOTAL_GB);
        }
        let used = total.saturating_sub(self.sys.available_memory());
        RamReading {
            percent: Reading::Real((used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)),
            used_gb: used as f64 / BYTES_PER_GB,
            total_gb: total as f64 / BYTES_PER_GB,
        }
    }

    /// Total physical memory in bytes, freshly read. 0 when unavailable.
    pub fn total_memory(&mut self) -> u64 {
        self.sys.refresh_memory();
        self.sys.total_memory()
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Best effort only. No per-GPU counter is wired up, so the value is
/// always synthetic and tagged as such.
pub fn gpu_usage() -> Reading {
    Reading::Simulated(rand::rng().random_range(5.0..35.0))
}

/// Temperature estimate derived from CPU load. Inherits the provenance of
/// the CPU reading it was derived from.
pub fn temperature(cpu: Reading) -> Reading {
    cpu.map(|pct| 35.0 + 0.3 * pct)
}

/// Battery level and charging flag. Primary path is the power-source
/// registry; falls back to `pmset -g batt`, then to an empty state.
pub async fn battery_info() -> BatteryState {
    if let Some(state) = battery_from_registry() {
        return state;
    }
    if let Some(out) = run_command("pmset", &["-g", "batt"]).await {
        if let Some(state) = parse_pmset(&out) {
            return state;
        }
    }
    battery_unavailable()
}

/// Last resort for `battery_info`: empty state, logged at warn like the
/// other sampler fallbacks.
fn battery_unavailable() -> BatteryState {
    warn!("battery state unavailable, reporting empty");
    BatteryState::default()
}

fn battery_from_registry() -> Option<BatteryState> {
    let manager = battery::Manager::new().ok()?;
    let bat = manager.batteries().ok()?.flatten().next()?;
    let level = bat.state_of_charge().get::<battery::units::ratio::percent>() as f64;
    Some(BatteryState {
        level_pct: level.clamp(0.0, 100.0),
        charging: bat.state() == battery::State::Charging,
    })
}

/// Parse `pmset -g batt` output. Level comes from the `NN%` token; the
/// charging flag from a `;`-separated segment equal to "charging", whole
/// segment, since "discharging" would match a substring check.
pub(crate) fn parse_pmset(out: &str) -> Option<BatteryState> {
    let line = out.lines().find(|l| l.contains('%'))?;
    let mut level = None;
    for tok in line.split_whitespace() {
        if let Some(stripped) = tok.trim_end_matches(';').strip_suffix('%') {
            if let Ok(v) = stripped.parse::<f64>() {
                level = Some(v.clamp(0.0, 100.0));
                break;
            }
        }
    }
    let charging = line.split(';').any(|seg| seg.trim() == "charging");
    level.map(|level_pct| BatteryState {
        level_pct,
        charging,
    })
}

/// Top processes by CPU via `ps`. Returns an empty list when `ps` is
/// missing or fails; rows that do not parse are dropped silently.
pub async fn top_processes(limit: usize, total_mem_bytes: u64) -> Vec<ProcessRow> {
    let Some(out) = run_command("ps", &["-Ao", "pid,comm,%cpu,%mem", "-r"]).await else {
        warn!("ps unavailable, reporting no processes");
        return Vec::new();
    };
    let mut rows = parse_ps_output(&out, limit, total_mem_bytes);
    // Per-process GPU share is not exposed by the OS; synthesize a small one.
    let mut rng = rand::rng();
    for row in &mut rows {
        row.gpu_pct = rng.random_range(0.0..12.0);
    }
    rows
}

pub(crate) fn parse_ps_output(out: &str, limit: usize, total_mem_bytes: u64) -> Vec<ProcessRow> {
    let mut rows: Vec<ProcessRow> = out
        .lines()
        .skip(1) // header
        .filter_map(|line| parse_ps_line(line, total_mem_bytes))
        .collect();
    rows.sort_by(|a, b| b.cpu_pct.partial_cmp(&a.cpu_pct).unwrap_or(Ordering::Equal));
    rows.truncate(limit);
    rows
}

/// One `ps -Ao pid,comm,%cpu,%mem` row: pid first, %cpu and %mem last,
/// everything between is the command (which may itself contain spaces).
fn parse_ps_line(line: &str, total_mem_bytes: u64) -> Option<ProcessRow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }
    let pid: u32 = tokens[0].parse().ok()?;
    let cpu_pct: f64 = tokens[tokens.len() - 2].parse().ok()?;
    let mem_pct: f64 = tokens[tokens.len() - 1].parse().ok()?;
    let command = tokens[1..tokens.len() - 2].join(" ");
    let name = command
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(&command)
        .to_string();
    let mem_bytes = (mem_pct.max(0.0) / 100.0 * total_mem_bytes as f64) as u64;
    Some(ProcessRow {
        pid,
        name,
        // ps reports per-core percent, so >100 is legitimate on multi-core.
        cpu_pct,
        mem_bytes,
        gpu_pct: 0.0,
    })
}

/// Fire and forget. The next process cycle reflects the outcome; no output
/// is read back.
pub fn kill_process(pid: u32) {
    debug!(pid, "sending SIGKILL");
    let _ = Command::new("kill").arg("-9").arg(pid.to_string()).spawn();
}
