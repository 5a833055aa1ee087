//! Network speed measurement: ping, then download, then upload, strictly
//! sequential behind one busy gate. A stage whose tool fails or whose
//! output does not parse scores 0.0; the run itself never aborts.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::busy::BusyFlag;
use crate::error::EngineError;
use crate::shell::run_command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTestStage {
    Ping,
    Download,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedTestResult {
    pub ping_ms: f64,
    pub download_mbps: f64,
    pub upload_mbps: f64,
}

#[derive(Debug, Clone)]
pub struct SpeedTestConfig {
    pub ping_host: String,
    pub ping_count: u32,
    pub download_url: String,
    pub upload_url: String,
    /// Zero-filled payload size for the upload stage.
    pub upload_bytes: usize,
    /// Hard cap per transfer stage, seconds.
    pub transfer_timeout_secs: u32,
    pub ping_binary: String,
    pub curl_binary: String,
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        SpeedTestConfig {
            ping_host: "1.1.1.1".to_string(),
            ping_count: 5,
            download_url: "https://speed.cloudflare.com/__down?bytes=10000000".to_string(),
            upload_url: "https://speed.cloudflare.com/__up".to_string(),
            upload_bytes: 2_000_000,
            transfer_timeout_secs: 20,
            ping_binary: "ping".to_string(),
            curl_binary: "curl".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeedTest {
    cfg: SpeedTestConfig,
    busy: BusyFlag,
}

impl Default for SpeedTest {
    fn default() -> Self {
        SpeedTest::new(SpeedTestConfig::default())
    }
}

impl SpeedTest {
    pub fn new(cfg: SpeedTestConfig) -> Self {
        SpeedTest {
            cfg,
            busy: BusyFlag::default(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Run all three stages in order. `on_stage` fires as each stage
    /// finishes, with its measured value. Only a concurrent run is an
    /// error; stage failures degrade to 0.0.
    pub async fn run(
        &self,
        mut on_stage: impl FnMut(SpeedTestStage, f64),
    ) -> Result<SpeedTestResult, EngineError> {
        let _guard = self.busy.try_begin("speed test")?;

        let ping_ms = self.measure_ping().await;
        on_stage(SpeedTestStage::Ping, ping_ms);

        let download_mbps = self.measure_download().await;
        on_stage(SpeedTestStage::Download, download_mbps);

        let upload_mbps = self.measure_upload().await;
        on_stage(SpeedTestStage::Upload, upload_mbps);

        Ok(SpeedTestResult {
            ping_ms,
            download_mbps,
            upload_mbps,
        })
    }

    async fn measure_ping(&self) -> f64 {
        let count = self.cfg.ping_count.to_string();
        let out = run_command(
            &self.cfg.ping_binary,
            &["-c", &count, &self.cfg.ping_host],
        )
        .await;
        match out.as_deref().and_then(parse_ping_avg) {
            Some(ms) => ms,
            None => {
                warn!(host = %self.cfg.ping_host, "ping stage failed");
                0.0
            }
        }
    }

    async fn measure_download(&self) -> f64 {
        let timeout = self.cfg.transfer_timeout_secs.to_string();
        let out = run_command(
            &self.cfg.curl_binary,
            &[
                "-s",
                "-o",
                "/dev/null",
                "-w",
                "%{speed_download}",
                "--max-time",
                &timeout,
                &self.cfg.download_url,
            ],
        )
        .await;
        match out.as_deref().and_then(parse_curl_speed) {
            Some(mbps) => mbps,
            None => {
                warn!("download stage failed");
                0.0
            }
        }
    }

    // Upload feeds a zero-filled payload through stdin so no temp file is
    // needed.
    async fn measure_upload(&self) -> f64 {
        let timeout = self.cfg.transfer_timeout_secs.to_string();
        let spawned = Command::new(&self.cfg.curl_binary)
            .args([
                "-s",
                "-o",
                "/dev/null",
                "-w",
                "%{speed_upload}",
                "--max-time",
                &timeout,
                "--data-binary",
                "@-",
                &self.cfg.upload_url,
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "upload stage failed to spawn");
                return 0.0;
            }
        };
        if let Some(mut stdin) = child.stdin.take() {
            let payload = vec![0u8; self.cfg.upload_bytes];
            if let Err(e) = stdin.write_all(&payload).await {
                debug!(error = %e, "upload payload cut short");
            }
        }
        let parsed = match child.wait_with_output().await {
            Ok(out) if out.status.success() => {
                parse_curl_speed(&String::from_utf8_lossy(&out.stdout))
            }
            _ => None,
        };
        match parsed {
            Some(mbps) => mbps,
            None => {
                warn!("upload stage failed");
                0.0
            }
        }
    }
}

/// Pull the average out of ping's summary line, e.g.
/// `round-trip min/avg/max/stddev = 10.1/15.4/20.7/5.1 ms` -> 15.4.
pub(crate) fn parse_ping_avg(out: &str) -> Option<f64> {
    let line = out.lines().find(|l| l.contains("min/avg/max"))?;
    let values = line.split('=').nth(1)?;
    let avg = values.trim().split('/').nth(1)?;
    avg.trim().parse().ok()
}

/// curl `%{speed_download}` / `%{speed_upload}` print bytes per second;
/// convert to megabits per second.
pub(crate) fn parse_curl_speed(out: &str) -> Option<f64> {
    let bytes_per_sec: f64 = out.trim().parse().ok()?;
    Some(bytes_per_sec * 8.0 / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_average_is_extracted() {
        let out = "PING 1.1.1.1 (1.1.1.1): 56 data bytes\n\
                   64 bytes from 1.1.1.1: icmp_seq=0 ttl=58 time=14.9 ms\n\
                   --- 1.1.1.1 ping statistics ---\n\
                   5 packets transmitted, 5 packets received, 0.0% packet loss\n\
                   round-trip min/avg/max/stddev = 10.1/15.4/20.7/5.1 ms\n";
        assert_eq!(parse_ping_avg(out), Some(15.4));
    }

    #[test]
    fn linux_style_rtt_line_also_parses() {
        let out = "rtt min/avg/max/mdev = 9.332/11.518/13.704/2.186 ms\n";
        assert_eq!(parse_ping_avg(out), Some(11.518));
    }

    #[test]
    fn ping_without_summary_yields_none() {
        assert_eq!(parse_ping_avg("request timeout for icmp_seq 0\n"), None);
        assert_eq!(parse_ping_avg(""), None);
    }

    #[test]
    fn curl_speed_converts_bytes_per_sec_to_mbps() {
        // 1,250,000 B/s is exactly 10 Mbps.
        assert_eq!(parse_curl_speed("1250000.000"), Some(10.0));
        assert_eq!(parse_curl_speed(" 0 "), Some(0.0));
        assert_eq!(parse_curl_speed("not a number"), None);
    }
}
