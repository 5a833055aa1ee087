//! Homebrew front end. Mutating operations share one busy gate; a second
//! install or uninstall while one runs is rejected, not queued.

use tokio::process::Command;
use tracing::{info, warn};

use crate::busy::BusyFlag;
use crate::error::EngineError;
use crate::shell::{run_command, run_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Formula,
    Cask,
}

impl PackageKind {
    fn list_flag(self) -> &'static str {
        match self {
            PackageKind::Formula => "--formula",
            PackageKind::Cask => "--cask",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub kind: PackageKind,
}

#[derive(Debug, Clone)]
pub struct PackageManager {
    binary: String,
    busy: BusyFlag,
}

impl PackageManager {
    pub fn new() -> Self {
        Self::with_binary("brew")
    }

    /// Point at a non-default binary, e.g. `/opt/homebrew/bin/brew` when
    /// it is not on PATH.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        PackageManager {
            binary: binary.into(),
            busy: BusyFlag::default(),
        }
    }

    /// True when the package manager answers `--version` with exit 0.
    pub async fn available(&self) -> bool {
        run_status(&self.binary, &["--version"]).await
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Installed formulas and casks, tagged by kind. Missing package
    /// manager reads as an empty list.
    pub async fn list_installed(&self) -> Vec<InstalledPackage> {
        let mut packages = Vec::new();
        for kind in [PackageKind::Formula, PackageKind::Cask] {
            match run_command(&self.binary, &["list", kind.list_flag()]).await {
                Some(out) => packages.extend(out.lines().map(str::trim).filter(|l| !l.is_empty()).map(
                    |name| InstalledPackage {
                        name: name.to_string(),
                        kind,
                    },
                )),
                None => warn!(kind = ?kind, "package listing unavailable"),
            }
        }
        packages
    }

    pub async fn install(&self, name: &str, kind: PackageKind) -> Result<(), EngineError> {
        self.run_op("install", name, kind).await
    }

    pub async fn uninstall(&self, name: &str, kind: PackageKind) -> Result<(), EngineError> {
        self.run_op("uninstall", name, kind).await
    }

    /// Success is exit status 0, nothing else; output is not interpreted.
    async fn run_op(&self, op: &str, name: &str, kind: PackageKind) -> Result<(), EngineError> {
        let _guard = self.busy.try_begin("package operation")?;
        let mut args = vec![op];
        if kind == PackageKind::Cask {
            args.push("--cask");
        }
        args.push(name);

        info!(op, name, "running package operation");
        let output = Command::new(&self.binary).args(&args).output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(EngineError::CommandFailed {
                cmd: format!("{} {}", self.binary, args.join(" ")),
                status: output.status.code().unwrap_or(-1),
            })
        }
    }
}

impl Default for PackageManager {
    fn default() -> Self {
        Self::new()
    }
}
