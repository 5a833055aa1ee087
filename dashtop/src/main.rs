//! Entry point for the dashtop TUI. Parses args and dispatches to the
//! dashboard or one of the one-shot subcommands.

mod app;
mod commands;
mod ui;

use std::env;

/// Fastest allowed dashboard refresh.
const MIN_INTERVAL_MS: u64 = 250;
const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Dashboard { interval_ms: u64 },
    Apps,
    PkgList,
    PkgInstall { name: String, cask: bool },
    PkgUninstall { name: String, cask: bool },
    SpeedTest,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [COMMAND] [OPTIONS]

Commands:
  (none)                 run the dashboard
  apps                   list installed applications
  pkg list               list installed packages
  pkg install NAME       install a package (add --cask for casks)
  pkg uninstall NAME     uninstall a package (add --cask for casks)
  speedtest              measure ping, download and upload

Options:
  --interval-ms N        dashboard refresh interval in ms, minimum {MIN_INTERVAL_MS}
  -h, --help             show this help"
    )
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "dashtop".into());
    let mut interval_ms = DEFAULT_INTERVAL_MS;
    let mut subcommand: Option<String> = None;
    let mut rest: Vec<String> = Vec::new();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--interval-ms" => {
                let v = it.next().ok_or_else(|| usage(&prog))?;
                interval_ms = parse_interval(&v).ok_or_else(|| usage(&prog))?;
            }
            _ if arg.starts_with("--interval-ms=") => {
                let v = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                interval_ms = parse_interval(v).ok_or_else(|| usage(&prog))?;
            }
            _ => {
                if subcommand.is_none() {
                    subcommand = Some(arg);
                } else {
                    rest.push(arg);
                }
            }
        }
    }

    match subcommand.as_deref() {
        None => Ok(Command::Dashboard { interval_ms }),
        Some("apps") => Ok(Command::Apps),
        Some("speedtest") => Ok(Command::SpeedTest),
        Some("pkg") => parse_pkg(&prog, &rest),
        Some(other) => Err(format!("Unknown command '{other}'.\n{}", usage(&prog))),
    }
}

fn parse_interval(v: &str) -> Option<u64> {
    v.parse::<u64>().ok().map(|ms| ms.max(MIN_INTERVAL_MS))
}

fn parse_pkg(prog: &str, rest: &[String]) -> Result<Command, String> {
    let mut it = rest.iter();
    let op = it.next().map(String::as_str).ok_or_else(|| usage(prog))?;
    let mut name: Option<String> = None;
    let mut cask = false;
    for arg in it {
        match arg.as_str() {
            "--cask" => cask = true,
            _ if name.is_none() => name = Some(arg.clone()),
            _ => return Err(format!("Unexpected argument '{arg}'.\n{}", usage(prog))),
        }
    }
    match op {
        "list" => Ok(Command::PkgList),
        "install" => {
            let name = name.ok_or_else(|| format!("pkg install needs a name.\n{}", usage(prog)))?;
            Ok(Command::PkgInstall { name, cask })
        }
        "uninstall" => {
            let name =
                name.ok_or_else(|| format!("pkg uninstall needs a name.\n{}", usage(prog)))?;
            Ok(Command::PkgUninstall { name, cask })
        }
        other => Err(format!("Unknown pkg operation '{other}'.\n{}", usage(prog))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never land inside the alternate screen or
    // a subcommand's stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Reuse the same parsing logic for testability
    let cmd = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    match cmd {
        Command::Dashboard { interval_ms } => app::run_dashboard(interval_ms).await,
        Command::Apps => commands::run_apps(),
        Command::PkgList => commands::run_pkg_list().await,
        Command::PkgInstall { name, cask } => commands::run_pkg_install(&name, cask).await,
        Command::PkgUninstall { name, cask } => commands::run_pkg_uninstall(&name, cask).await,
        Command::SpeedTest => commands::run_speedtest().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        let mut full = vec!["dashtop".to_string()];
        full.extend(args.iter().map(|s| s.to_string()));
        parse_args(full)
    }

    #[test]
    fn bare_invocation_runs_dashboard_at_default_rate() {
        assert_eq!(
            parse(&[]),
            Ok(Command::Dashboard { interval_ms: 1000 })
        );
    }

    #[test]
    fn interval_flag_both_forms_and_floor() {
        assert_eq!(
            parse(&["--interval-ms", "2000"]),
            Ok(Command::Dashboard { interval_ms: 2000 })
        );
        assert_eq!(
            parse(&["--interval-ms=500"]),
            Ok(Command::Dashboard { interval_ms: 500 })
        );
        // Too-small values clamp up instead of erroring.
        assert_eq!(
            parse(&["--interval-ms", "10"]),
            Ok(Command::Dashboard { interval_ms: 250 })
        );
    }

    #[test]
    fn help_returns_usage() {
        let err = parse(&["--help"]).unwrap_err();
        assert!(err.contains("Usage:"));
        assert!(err.contains("speedtest"));
    }

    #[test]
    fn pkg_install_with_and_without_cask() {
        assert_eq!(
            parse(&["pkg", "install", "ripgrep"]),
            Ok(Command::PkgInstall {
                name: "ripgrep".into(),
                cask: false
            })
        );
        assert_eq!(
            parse(&["pkg", "install", "--cask", "firefox"]),
            Ok(Command::PkgInstall {
                name: "firefox".into(),
                cask: true
            })
        );
        assert_eq!(
            parse(&["pkg", "uninstall", "firefox", "--cask"]),
            Ok(Command::PkgUninstall {
                name: "firefox".into(),
                cask: true
            })
        );
    }

    #[test]
    fn pkg_install_without_name_is_an_error() {
        let err = parse(&["pkg", "install"]).unwrap_err();
        assert!(err.contains("needs a name"));
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse(&["bogus"]).is_err());
        assert!(parse(&["pkg", "upgrade"]).is_err());
    }

    #[test]
    fn bad_interval_is_an_error() {
        assert!(parse(&["--interval-ms", "fast"]).is_err());
        assert!(parse(&["--interval-ms"]).is_err());
    }
}
