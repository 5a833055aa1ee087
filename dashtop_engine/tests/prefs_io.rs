//! Preference persistence under an isolated config dir.

use std::fs;
use std::sync::Mutex;

use dashtop_engine::prefs::{self, Preferences, RamUnit, ThemeChoice};

// Global lock to serialize tests that mutate process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn save_then_load_round_trips() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    let p = Preferences {
        theme: ThemeChoice::Light,
        ram_unit: RamUnit::Gigabytes,
        sidebar_collapsed: true,
        transparency_enabled: true,
        transparency_level: 0.5,
        ..Preferences::default()
    };
    prefs::save_preferences(&p).unwrap();
    assert!(td.path().join("dashtop/preferences.json").exists());

    let loaded = prefs::load_preferences();
    assert_eq!(loaded.theme, ThemeChoice::Light);
    assert_eq!(loaded.ram_unit, RamUnit::Gigabytes);
    assert!(loaded.sidebar_collapsed);
    assert!(loaded.transparency_enabled);
    assert_eq!(loaded.transparency_level, 0.5);
}

#[test]
fn missing_file_loads_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    let p = prefs::load_preferences();
    assert_eq!(p.theme, ThemeChoice::Dark);
    assert_eq!(p.ram_unit, RamUnit::Percent);
    assert!(p.show_cpu_graph);
}

#[test]
fn corrupt_file_loads_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    fs::create_dir_all(td.path().join("dashtop")).unwrap();
    fs::write(td.path().join("dashtop/preferences.json"), "{not json").unwrap();

    let p = prefs::load_preferences();
    assert_eq!(p.ram_unit, RamUnit::Percent);
    assert!(!p.sidebar_collapsed);
}
