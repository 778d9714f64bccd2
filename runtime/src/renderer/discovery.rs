//! Locate a Chromium executable.

use std::path::{Path, PathBuf};

/// Environment variable naming an explicit Chromium binary.
pub const CHROMIUM_PATH_ENV: &str = "ZEBULON_CHROMIUM_PATH";

const PATH_CANDIDATES: [&str; 4] = ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"];

/// Find Chromium: explicit path, then `~/.zebulon/chromium`, then `PATH`.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(installed) = dirs::home_dir().map(|home| installed_chromium(&home)) {
        if installed.exists() {
            return Some(installed);
        }
    }

    PATH_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Where a Chromium unpacked for this tool lives under `home`.
pub fn installed_chromium(home: &Path) -> PathBuf {
    home.join(".zebulon").join("chromium").join("chrome")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("chrome");
        std::fs::write(&fake, b"").unwrap();

        assert_eq!(find_chromium(Some(&fake)), Some(fake));
    }

    #[test]
    fn test_installed_location_under_home() {
        let home = Path::new("/home/listings");
        assert_eq!(
            installed_chromium(home),
            PathBuf::from("/home/listings/.zebulon/chromium/chrome")
        );
    }
}
