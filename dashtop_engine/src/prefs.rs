//! Persisted display preferences: simple JSON file under the XDG config
//! dir, $XDG_CONFIG_HOME/dashtop/preferences.json (fallback
//! ~/.config/dashtop/preferences.json). Load never fails; a missing or
//! unreadable file yields the defaults.

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RamUnit {
    #[default]
    Percent,
    Gigabytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemeChoice,
    pub ram_unit: RamUnit,
    pub transparency_enabled: bool,
    /// 0.0 (opaque) to 1.0; only meaningful when transparency is enabled.
    pub transparency_level: f64,
    pub show_cpu_graph: bool,
    pub show_ram_graph: bool,
    pub show_gpu_graph: bool,
    pub show_temp_graph: bool,
    pub sidebar_collapsed: bool,
    #[serde(default)]
    pub version: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            theme: ThemeChoice::Dark,
            ram_unit: RamUnit::Percent,
            transparency_enabled: false,
            transparency_level: 0.85,
            show_cpu_graph: true,
            show_ram_graph: true,
            show_gpu_graph: true,
            show_temp_graph: true,
            sidebar_collapsed: false,
            version: 0,
        }
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("dashtop")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dashtop")
    }
}

pub fn preferences_path() -> PathBuf {
    config_dir().join("preferences.json")
}

pub fn load_preferences() -> Preferences {
    let path = preferences_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => Preferences::default(),
    }
}

pub fn save_preferences(p: &Preferences) -> std::io::Result<()> {
    let path = preferences_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p).expect("serialize preferences");
    fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_everything_in_percent() {
        let p = Preferences::default();
        assert_eq!(p.theme, ThemeChoice::Dark);
        assert_eq!(p.ram_unit, RamUnit::Percent);
        assert!(p.show_cpu_graph && p.show_ram_graph && p.show_gpu_graph && p.show_temp_graph);
        assert!(!p.sidebar_collapsed);
        assert!(!p.transparency_enabled);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let p: Preferences =
            serde_json::from_str(r#"{"theme":"light","sidebar_collapsed":true}"#).unwrap();
        assert_eq!(p.theme, ThemeChoice::Light);
        assert!(p.sidebar_collapsed);
        assert_eq!(p.ram_unit, RamUnit::Percent);
        assert!(p.show_gpu_graph);
    }

    #[test]
    fn garbage_json_falls_back_to_defaults_on_load_path() {
        let p: Preferences = serde_json::from_str("{not json").unwrap_or_default();
        assert_eq!(p.ram_unit, RamUnit::Percent);
    }
}
