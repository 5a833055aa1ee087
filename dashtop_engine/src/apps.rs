//! Installed-application inventory. One-shot scan of the standard
//! application folders for `.app` bundles, plus trash-based removal.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::error::EngineError;

/// Bundle walk depth for the size estimate. Deep enough to cover the
/// executable and resources without crawling huge embedded frameworks.
const SIZE_SCAN_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct AppEntry {
    /// Bundle name without the `.app` suffix.
    pub name: String,
    pub path: PathBuf,
    /// Estimate from a bounded walk, not an exact disk usage figure.
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
}

fn application_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("/Applications")];
    if let Some(home) = dirs_next::home_dir() {
        dirs.push(home.join("Applications"));
    }
    dirs
}

/// Scan the application folders, non-recursive: only top-level `.app`
/// bundles count. Sorted by name.
pub fn installed_apps() -> Vec<AppEntry> {
    let mut apps: Vec<AppEntry> = application_dirs()
        .iter()
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flatten()
        .flatten()
        .filter_map(|entry| app_entry(&entry.path()))
        .collect();
    apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    apps
}

fn app_entry(path: &Path) -> Option<AppEntry> {
    if path.extension().and_then(|e| e.to_str()) != Some("app") {
        return None;
    }
    let name = path.file_stem()?.to_str()?.to_string();
    let modified = fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Local>::from);
    Some(AppEntry {
        name,
        size_bytes: dir_size(path, SIZE_SCAN_DEPTH),
        modified,
        path: path.to_path_buf(),
    })
}

fn dir_size(path: &Path, depth: usize) -> u64 {
    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };
    let mut total = 0;
    for entry in entries.flatten() {
        let Ok(meta) = entry.metadata() else { continue };
        if meta.is_file() {
            total += meta.len();
        } else if meta.is_dir() && depth > 0 {
            total += dir_size(&entry.path(), depth - 1);
        }
    }
    total
}

/// Move a bundle into `~/.Trash`, picking a fresh name on collision. This
/// is the engine's one user-facing failure path: the caller gets the error.
pub fn move_to_trash(path: &Path) -> Result<PathBuf, EngineError> {
    let trash = dirs_next::home_dir()
        .map(|h| h.join(".Trash"))
        .ok_or_else(|| EngineError::Trash {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory"),
        })?;
    move_into(path, &trash)
}

fn move_into(path: &Path, trash: &Path) -> Result<PathBuf, EngineError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| EngineError::Trash {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
        })?
        .to_os_string();

    let mut target = trash.join(&file_name);
    let mut attempt = 1;
    while target.exists() {
        attempt += 1;
        let mut renamed = file_name.clone();
        renamed.push(format!(" {attempt}"));
        target = trash.join(renamed);
    }
    debug!(from = ?path, to = ?target, "moving bundle to trash");
    fs::rename(path, &target).map_err(|source| EngineError::Trash {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn only_app_bundles_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Safari.app")).unwrap();
        fs::create_dir(dir.path().join("NotABundle")).unwrap();
        File::create(dir.path().join("loose.txt")).unwrap();

        let apps: Vec<AppEntry> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter_map(|e| app_entry(&e.path()))
            .collect();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Safari");
    }

    #[test]
    fn size_estimate_counts_nested_files_to_depth() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Thing.app");
        let deep = bundle.join("Contents/MacOS");
        fs::create_dir_all(&deep).unwrap();
        File::create(bundle.join("top"))
            .unwrap()
            .write_all(&[0; 100])
            .unwrap();
        File::create(deep.join("thing"))
            .unwrap()
            .write_all(&[0; 400])
            .unwrap();

        let entry = app_entry(&bundle).unwrap();
        assert_eq!(entry.size_bytes, 500);
    }

    #[test]
    fn trash_move_renames_on_collision() {
        // Fake trash dir so the test never touches the real one.
        let root = tempfile::tempdir().unwrap();
        let trash = root.path().join(".Trash");
        fs::create_dir(&trash).unwrap();
        fs::create_dir(trash.join("Doomed.app")).unwrap();

        let victim = root.path().join("Doomed.app");
        fs::create_dir(&victim).unwrap();

        let landed = move_into(&victim, &trash).unwrap();
        assert_eq!(landed, trash.join("Doomed.app 2"));
        assert!(landed.exists());
        assert!(!victim.exists());
    }

    #[test]
    fn trash_move_of_missing_bundle_reports_error() {
        let root = tempfile::tempdir().unwrap();
        let trash = root.path().join(".Trash");
        fs::create_dir(&trash).unwrap();

        let err = move_into(&root.path().join("Ghost.app"), &trash).unwrap_err();
        assert!(matches!(err, EngineError::Trash { .. }));
    }
}
