//! Persist the listing document.
//!
//! The file is replaced as a whole: the document is written to a sibling
//! temp file and renamed over the target, so readers never see a half-written
//! file and a failed run leaves the previous output untouched.

use crate::error::ScrapeError;
use crate::model::Listing;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Render the document as indented JSON.
pub fn render_listing(listing: &Listing) -> Result<String, ScrapeError> {
    serde_json::to_string_pretty(listing).map_err(ScrapeError::Serialize)
}

/// Write `listing` to `path`, replacing any previous file.
pub fn write_listing(path: &Path, listing: &Listing) -> Result<(), ScrapeError> {
    let json = render_listing(listing)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    replace_file(path, |file| file.write_all(json.as_bytes()))?;

    info!(
        "wrote {} events to {}",
        listing.event_count(),
        path.display()
    );
    Ok(())
}

/// Fill a sibling temp file, then rename it over `path`.
///
/// On any failure the temp file is removed and `path` is untouched.
fn replace_file<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let tmp = temp_path(path);
    let result = File::create(&tmp)
        .and_then(|mut file| {
            fill(&mut file)?;
            file.sync_all()
        })
        .and_then(|()| std::fs::rename(&tmp, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "listing.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VenueDescriptor;

    #[test]
    fn test_empty_listing_written_as_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zebulon.json");

        write_listing(&path, &Listing::Empty).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("zebulon.json");

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale contents that are much longer than the new file").unwrap();

        let graph = Listing::Graph(crate::model::ResultGraph::new(
            Vec::new(),
            VenueDescriptor::zebulon(),
        ));
        write_listing(&path, &graph).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["@graph"][0]["name"], "Zebulon");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zebulon.json");
        std::fs::write(&path, "[]").unwrap();

        let err = replace_file(&path, |file| {
            file.write_all(b"{\"@context\": ")?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "disk full");
        assert!(!temp_path(&path).exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        assert!(replace_file(&path, |file| file.write_all(b"[]")).is_err());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let p = Path::new("/var/data/zebulon.json");
        assert_eq!(temp_path(p), PathBuf::from("/var/data/zebulon.json.tmp"));
    }
}
