//! Tiny local persistence under `.cache/`.
//!
//! Holds the one-time instructional overlay flag as a small TOML file and
//! the cache directory for synthesized utterances. Read failures default to
//! "not yet shown"; write failures are logged and never crash the UI.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CACHE_DIR: &str = ".cache";

#[derive(serde::Serialize, serde::Deserialize, Default)]
struct FirstRunEntry {
    overlay_seen: bool,
}

/// Whether the instructional overlay was already shown on this machine.
pub fn load_overlay_seen() -> bool {
    load_overlay_seen_from(&first_run_path())
}

pub fn save_overlay_seen() {
    save_overlay_seen_to(&first_run_path());
}

pub fn speech_cache_dir() -> PathBuf {
    Path::new(CACHE_DIR).join("speech")
}

fn first_run_path() -> PathBuf {
    Path::new(CACHE_DIR).join("first-run.toml")
}

fn load_overlay_seen_from(path: &Path) -> bool {
    let Ok(data) = fs::read_to_string(path) else {
        return false;
    };
    match toml::from_str::<FirstRunEntry>(&data) {
        Ok(entry) => entry.overlay_seen,
        Err(err) => {
            warn!("Ignoring unreadable first-run entry: {err}");
            false
        }
    }
}

fn save_overlay_seen_to(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!("Failed to create cache directory: {err}");
            return;
        }
    }
    let entry = FirstRunEntry { overlay_seen: true };
    match toml::to_string(&entry) {
        Ok(contents) => {
            if let Err(err) = fs::write(path, contents) {
                warn!("Failed to persist first-run flag: {err}");
            }
        }
        Err(err) => warn!("Failed to serialize first-run flag: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("my-docent-test-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn missing_file_defaults_to_not_seen() {
        assert!(!load_overlay_seen_from(Path::new(
            "/nonexistent/first-run.toml"
        )));
    }

    #[test]
    fn corrupt_file_defaults_to_not_seen() {
        let path = temp_path("corrupt");
        fs::write(&path, "overlay_seen = \"maybe\"").unwrap();
        assert!(!load_overlay_seen_from(&path));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn saved_flag_reads_back_as_seen() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);
        save_overlay_seen_to(&path);
        assert!(load_overlay_seen_from(&path));
        let _ = fs::remove_file(&path);
    }
}
