//! Cadence tasks. Each metric family samples on its own interval and hands
//! results to the publisher by message; the tasks share no mutable state.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

use crate::sources::{self, SystemProbe};
use crate::types::SampleUpdate;

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut t = interval(period);
    // A slow iteration skips missed ticks instead of queueing them, so at
    // most one sample per cadence is ever in flight.
    t.set_missed_tick_behavior(MissedTickBehavior::Skip);
    t
}

// 1s: cpu/ram/gpu/temperature
pub(crate) fn spawn_fast_task(
    tx: mpsc::Sender<SampleUpdate>,
    mut shutdown: broadcast::Receiver<()>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut probe = SystemProbe::new();
        let mut tick = ticker(period);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let cpu = probe.cpu_usage();
                    let ram = probe.ram_usage();
                    let gpu = sources::gpu_usage();
                    let temperature = sources::temperature(cpu);
                    trace!(cpu = cpu.value(), ram = ram.percent.value(), "fast sample");
                    let update = SampleUpdate::Fast { cpu, ram, gpu, temperature };
                    if tx.send(update).await.is_err() {
                        break;
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    })
}

// 3s: top processes
pub(crate) fn spawn_process_task(
    tx: mpsc::Sender<SampleUpdate>,
    mut shutdown: broadcast::Receiver<()>,
    period: Duration,
    limit: usize,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut probe = SystemProbe::new();
        let mut tick = ticker(period);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let total_mem = probe.total_memory();
                    let rows = sources::top_processes(limit, total_mem).await;
                    trace!(rows = rows.len(), "process sample");
                    if tx.send(SampleUpdate::Processes(rows)).await.is_err() {
                        break;
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    })
}

// 10s: battery
pub(crate) fn spawn_battery_task(
    tx: mpsc::Sender<SampleUpdate>,
    mut shutdown: broadcast::Receiver<()>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = ticker(period);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let state = sources::battery_info().await;
                    trace!(level = state.level_pct, charging = state.charging, "battery sample");
                    if tx.send(SampleUpdate::Battery(state)).await.is_err() {
                        break;
                    }
                }
                _ = shutdown.recv() => break,
            }
        }
    })
}
