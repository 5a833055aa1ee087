//! Snapshot ownership and publication. One task owns all current and
//! historical metric state, applies incoming samples as atomic batches and
//! publishes an immutable snapshot per applied update.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::history::{RollingHistory, METRIC_HISTORY_LEN, TEMP_HISTORY_LEN};
use crate::sampler;
use crate::types::{MetricsSnapshot, SampleUpdate};

const UPDATE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub fast_interval: Duration,
    pub process_interval: Duration,
    pub battery_interval: Duration,
    /// Rows kept per process cycle.
    pub process_limit: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            fast_interval: Duration::from_secs(1),
            process_interval: Duration::from_secs(3),
            battery_interval: Duration::from_secs(10),
            process_limit: 50,
        }
    }
}

/// Handle to the sampling engine. Construction is passive; nothing samples
/// until `start`. A stopped monitor keeps serving its last snapshot but
/// never publishes again.
pub struct Monitor {
    cfg: MonitorConfig,
    publish_tx: Option<watch::Sender<Arc<MetricsSnapshot>>>,
    snapshot_rx: watch::Receiver<Arc<MetricsSnapshot>>,
    shutdown_tx: Option<broadcast::Sender<()>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Monitor {
    pub fn new(cfg: MonitorConfig) -> Self {
        let (publish_tx, snapshot_rx) = watch::channel(Arc::new(MetricsSnapshot::default()));
        Monitor {
            cfg,
            publish_tx: Some(publish_tx),
            snapshot_rx,
            shutdown_tx: None,
            tasks: Vec::new(),
        }
    }

    /// Spawn the cadence tasks and the publisher. No-op if already started
    /// or already stopped.
    pub fn start(&mut self) {
        let Some(publish_tx) = self.publish_tx.take() else {
            debug!("monitor start ignored, already started");
            return;
        };
        let (shutdown_tx, _) = broadcast::channel(1);
        let (update_tx, update_rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);

        self.tasks.push(sampler::spawn_fast_task(
            update_tx.clone(),
            shutdown_tx.subscribe(),
            self.cfg.fast_interval,
        ));
        self.tasks.push(sampler::spawn_process_task(
            update_tx.clone(),
            shutdown_tx.subscribe(),
            self.cfg.process_interval,
            self.cfg.process_limit,
        ));
        self.tasks.push(sampler::spawn_battery_task(
            update_tx,
            shutdown_tx.subscribe(),
            self.cfg.battery_interval,
        ));
        self.tasks.push(tokio::spawn(publisher_task(
            update_rx,
            publish_tx,
            shutdown_tx.subscribe(),
        )));
        self.shutdown_tx = Some(shutdown_tx);
        debug!("monitor started");
    }

    /// Stop sampling. All tasks have exited by the time this returns, so
    /// the published snapshot cannot change afterwards; a sample caught in
    /// flight fails its send and is discarded.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        debug!("monitor stopped");
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }

    /// Current snapshot, pull style.
    pub fn snapshot(&self) -> Arc<MetricsSnapshot> {
        self.snapshot_rx.borrow().clone()
    }

    /// Push-style subscription; the receiver is notified once per
    /// published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MetricsSnapshot>> {
        self.snapshot_rx.clone()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// Single consumer of sample updates. Exclusive owner of the metric state;
/// shutdown is checked before draining another update so nothing publishes
/// past a stop signal.
async fn publisher_task(
    mut updates: mpsc::Receiver<SampleUpdate>,
    publish: watch::Sender<Arc<MetricsSnapshot>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut state = PublisherState::new();
    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            maybe = updates.recv() => match maybe {
                Some(update) => {
                    state.apply(update);
                    let _ = publish.send(Arc::new(state.render()));
                }
                None => break,
            },
        }
    }
    debug!("publisher exited");
}

/// Mutable metric state. Lives inside the publisher task only.
struct PublisherState {
    snapshot: MetricsSnapshot,
    cpu_history: RollingHistory,
    ram_history: RollingHistory,
    gpu_history: RollingHistory,
    temp_history: RollingHistory,
}

impl PublisherState {
    fn new() -> Self {
        PublisherState {
            snapshot: MetricsSnapshot::default(),
            cpu_history: RollingHistory::new(METRIC_HISTORY_LEN),
            ram_history: RollingHistory::new(METRIC_HISTORY_LEN),
            gpu_history: RollingHistory::new(METRIC_HISTORY_LEN),
            temp_history: RollingHistory::new(TEMP_HISTORY_LEN),
        }
    }

    /// Scalars and their history entries land together; a rendered
    /// snapshot can never show one without the other.
    fn apply(&mut self, update: SampleUpdate) {
        match update {
            SampleUpdate::Fast {
                cpu,
                ram,
                gpu,
                temperature,
            } => {
                self.snapshot.cpu = cpu;
                self.snapshot.ram = ram;
                self.snapshot.gpu = gpu;
                self.snapshot.temperature = temperature;
                self.cpu_history.push(cpu.value());
                self.ram_history.push(ram.percent.value());
                self.gpu_history.push(gpu.value());
                self.temp_history.push(temperature.value());
            }
            SampleUpdate::Processes(rows) => {
                self.snapshot.processes = rows;
            }
            SampleUpdate::Battery(state) => {
                self.snapshot.battery = state;
            }
        }
        self.snapshot.sampled_at = Utc::now();
    }

    fn render(&self) -> MetricsSnapshot {
        let mut snap = self.snapshot.clone();
        snap.cpu_history = self.cpu_history.snapshot();
        snap.ram_history = self.ram_history.snapshot();
        snap.gpu_history = self.gpu_history.snapshot();
        snap.temp_history = self.temp_history.snapshot();
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BatteryState, ProcessRow, RamReading, Reading};

    fn fast(cpu: f64) -> SampleUpdate {
        SampleUpdate::Fast {
            cpu: Reading::Real(cpu),
            ram: RamReading {
                percent: Reading::Real(50.0),
                used_gb: 8.0,
                total_gb: 16.0,
            },
            gpu: Reading::Simulated(12.0),
            temperature: Reading::Real(35.0 + 0.3 * cpu),
        }
    }

    #[test]
    fn fast_update_lands_scalars_and_histories_together() {
        let mut state = PublisherState::new();
        state.apply(fast(42.7));
        let snap = state.render();

        assert_eq!(snap.cpu.value(), 42.7);
        assert_eq!(snap.cpu_history.len(), 60);
        assert_eq!(*snap.cpu_history.last().unwrap(), 42.7);
        // One pre-fill zero evicted, the rest still in place.
        assert_eq!(snap.cpu_history.iter().filter(|v| **v == 0.0).count(), 59);
        assert_eq!(*snap.ram_history.last().unwrap(), 50.0);
        assert_eq!(*snap.gpu_history.last().unwrap(), 12.0);
        assert_eq!(snap.temp_history.len(), 50);
        assert_eq!(*snap.temp_history.last().unwrap(), snap.temperature.value());
    }

    #[test]
    fn process_update_replaces_whole_table() {
        let mut state = PublisherState::new();
        state.apply(SampleUpdate::Processes(vec![ProcessRow {
            pid: 1,
            name: "first".into(),
            cpu_pct: 9.0,
            mem_bytes: 1,
            gpu_pct: 0.0,
        }]));
        state.apply(SampleUpdate::Processes(vec![ProcessRow {
            pid: 2,
            name: "second".into(),
            cpu_pct: 1.0,
            mem_bytes: 2,
            gpu_pct: 0.0,
        }]));
        let snap = state.render();
        assert_eq!(snap.processes.len(), 1);
        assert_eq!(snap.processes[0].pid, 2);
    }

    #[test]
    fn battery_update_leaves_histories_alone() {
        let mut state = PublisherState::new();
        state.apply(fast(10.0));
        state.apply(SampleUpdate::Battery(BatteryState {
            level_pct: 77.0,
            charging: true,
        }));
        let snap = state.render();
        assert_eq!(snap.battery.level_pct, 77.0);
        assert!(snap.battery.charging);
        // Only the fast update touched the charts.
        assert_eq!(*snap.cpu_history.last().unwrap(), 10.0);
        assert_eq!(snap.cpu_history.iter().filter(|v| **v == 0.0).count(), 59);
    }
}
