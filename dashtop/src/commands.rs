//! One-shot subcommands: plain stdout reports, no terminal takeover.

use anyhow::bail;

use dashtop_engine::apps;
use dashtop_engine::pkg::{PackageKind, PackageManager};
use dashtop_engine::speedtest::{SpeedTest, SpeedTestStage};

use crate::ui::util::{human, truncate_middle};

pub fn run_apps() -> anyhow::Result<()> {
    let apps = apps::installed_apps();
    if apps.is_empty() {
        println!("No applications found.");
        return Ok(());
    }
    println!("{:<42} {:>10}  {}", "NAME", "SIZE", "MODIFIED");
    for app in &apps {
        let modified = app
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<42} {:>10}  {}",
            truncate_middle(&app.name, 42),
            human(app.size_bytes),
            modified
        );
    }
    println!("{} applications", apps.len());
    Ok(())
}

pub async fn run_pkg_list() -> anyhow::Result<()> {
    let mgr = PackageManager::new();
    if !mgr.available().await {
        bail!("brew is not available on this system");
    }
    let list = mgr.list_installed().await;
    if list.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }
    for pkg in &list {
        let tag = match pkg.kind {
            PackageKind::Formula => "formula",
            PackageKind::Cask => "cask",
        };
        println!("{:<36} [{tag}]", pkg.name);
    }
    println!("{} packages", list.len());
    Ok(())
}

pub async fn run_pkg_install(name: &str, cask: bool) -> anyhow::Result<()> {
    let mgr = PackageManager::new();
    if !mgr.available().await {
        bail!("brew is not available on this system");
    }
    let kind = kind_of(cask);
    println!("Installing {name}...");
    mgr.install(name, kind).await?;
    println!("Installed {name}.");
    Ok(())
}

pub async fn run_pkg_uninstall(name: &str, cask: bool) -> anyhow::Result<()> {
    let mgr = PackageManager::new();
    if !mgr.available().await {
        bail!("brew is not available on this system");
    }
    let kind = kind_of(cask);
    println!("Uninstalling {name}...");
    mgr.uninstall(name, kind).await?;
    println!("Uninstalled {name}.");
    Ok(())
}

fn kind_of(cask: bool) -> PackageKind {
    if cask {
        PackageKind::Cask
    } else {
        PackageKind::Formula
    }
}

pub async fn run_speedtest() -> anyhow::Result<()> {
    println!("Running speed test (ping, download, upload)...");
    let result = SpeedTest::default()
        .run(|stage, value| match stage {
            SpeedTestStage::Ping => println!("  ping      {value:>8.1} ms"),
            SpeedTestStage::Download => println!("  download  {value:>8.2} Mbps"),
            SpeedTestStage::Upload => println!("  upload    {value:>8.2} Mbps"),
        })
        .await?;
    println!(
        "Done: {:.1} ms / {:.2} Mbps down / {:.2} Mbps up",
        result.ping_ms, result.download_mbps, result.upload_mbps
    );
    Ok(())
}
