// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Filesystem-backed image store: pending, approved and declined directories

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::naming::{is_supported_image, validate_filename};
use crate::{Result, SwipeError};

/// Outcome of a triage decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Decline,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Decline => "decline",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three working directories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Pending,
    Approved,
    Declined,
}

impl From<Verdict> for Location {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Approve => Location::Approved,
            Verdict::Decline => Location::Declined,
        }
    }
}

/// The three working directories. Every image lives in exactly one of them.
#[derive(Debug, Clone)]
pub struct FileStore {
    pending: PathBuf,
    approved: PathBuf,
    declined: PathBuf,
}

impl FileStore {
    /// Open the store, creating any missing directories
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let store = Self {
            pending: config.pending_path(),
            approved: config.approved_path(),
            declined: config.declined_path(),
        };

        for dir in [&store.pending, &store.approved, &store.declined] {
            if !dir.is_dir() {
                std::fs::create_dir_all(dir)?;
                info!("Created directory: {:?}", dir);
            }
        }

        Ok(store)
    }

    /// Path of a working directory
    pub fn dir_for(&self, location: Location) -> &Path {
        match location {
            Location::Pending => &self.pending,
            Location::Approved => &self.approved,
            Location::Declined => &self.declined,
        }
    }

    /// List supported images waiting in the pending directory.
    ///
    /// Order is whatever the directory enumeration yields.
    pub fn list_pending(&self) -> Result<Vec<String>> {
        let mut images = Vec::new();

        for entry in std::fs::read_dir(&self.pending)? {
            let entry = entry?;
            // Follows symlinks, the same check `decide` applies to the source
            if !entry.path().is_file() {
                continue;
            }

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!("Skipping non UTF-8 filename: {:?}", raw);
                    continue;
                }
            };

            if is_supported_image(&name) {
                images.push(name);
            }
        }

        Ok(images)
    }

    /// Move a pending image into the approved or declined directory.
    ///
    /// The move is a single rename; a file that is already gone (never
    /// existed, or moved by a concurrent request) yields `NotFound`.
    pub fn decide(&self, filename: &str, verdict: Verdict) -> Result<()> {
        let filename = validate_filename(filename)?;

        let source = self.pending.join(filename);
        if !source.is_file() {
            return Err(SwipeError::NotFound(filename.to_string()));
        }

        let dest = self.dir_for(verdict.into()).join(filename);
        if dest.exists() {
            warn!("Replacing existing {:?}", dest);
        }

        match std::fs::rename(&source, &dest) {
            Ok(()) => {
                info!("{}: {} -> {:?}", verdict, filename, dest);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound && !source.exists() => {
                Err(SwipeError::NotFound(filename.to_string()))
            }
            Err(e) => Err(SwipeError::FileSystem(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::open(&StorageConfig::rooted_at(dir.path())).expect("store should open")
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"img").unwrap();
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn test_open_creates_directories() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        assert!(dir.path().join("toSort").is_dir());
        assert!(dir.path().join("approved").is_dir());
        assert!(dir.path().join("declined").is_dir());
        assert_eq!(store.dir_for(Location::Pending), dir.path().join("toSort"));
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        touch(store.dir_for(Location::Pending), "keep.jpg");

        let reopened = store_in(&dir);
        assert_eq!(reopened.list_pending().unwrap(), vec!["keep.jpg".to_string()]);
    }

    #[test]
    fn test_list_filters_to_supported_images() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        let pending = store.dir_for(Location::Pending);
        for name in ["a.jpg", "b.JPEG", "c.png", "d.webp", "notes.txt", "clip.gif", "noext"] {
            touch(pending, name);
        }
        std::fs::create_dir(pending.join("folder.jpg")).unwrap();

        let listed = sorted(store.list_pending().unwrap());
        assert_eq!(listed, vec!["a.jpg", "b.JPEG", "c.png", "d.webp"]);
    }

    #[test]
    fn test_list_empty_directory() {
        let dir = TempDir::new().expect("tempdir");
        assert!(store_in(&dir).list_pending().unwrap().is_empty());
    }

    #[test]
    fn test_list_unreadable_directory_is_storage_error() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        std::fs::remove_dir(store.dir_for(Location::Pending)).unwrap();

        assert!(matches!(store.list_pending(), Err(SwipeError::FileSystem(_))));
    }

    #[test]
    fn test_approve_moves_file() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        touch(store.dir_for(Location::Pending), "a.jpg");
        touch(store.dir_for(Location::Pending), "b.jpg");

        store.decide("a.jpg", Verdict::Approve).unwrap();

        assert_eq!(store.list_pending().unwrap(), vec!["b.jpg".to_string()]);
        assert!(store.dir_for(Location::Approved).join("a.jpg").is_file());
        assert!(!store.dir_for(Location::Declined).join("a.jpg").exists());
    }

    #[test]
    fn test_decline_moves_file() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        touch(store.dir_for(Location::Pending), "a.png");

        store.decide("a.png", Verdict::Decline).unwrap();

        assert!(store.list_pending().unwrap().is_empty());
        assert!(store.dir_for(Location::Declined).join("a.png").is_file());
    }

    #[test]
    fn test_second_decision_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        touch(store.dir_for(Location::Pending), "a.jpg");

        assert!(store.decide("a.jpg", Verdict::Approve).is_ok());
        assert!(matches!(
            store.decide("a.jpg", Verdict::Decline),
            Err(SwipeError::NotFound(_))
        ));
        assert!(store.dir_for(Location::Approved).join("a.jpg").is_file());
    }

    #[test]
    fn test_empty_filename_is_invalid() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        assert!(matches!(
            store.decide("", Verdict::Approve),
            Err(SwipeError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        touch(dir.path(), "outside.jpg");

        assert!(matches!(
            store.decide("../outside.jpg", Verdict::Approve),
            Err(SwipeError::InvalidRequest(_))
        ));
        assert!(dir.path().join("outside.jpg").is_file());
    }

    #[test]
    fn test_unknown_file_is_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        assert!(matches!(
            store.decide("ghost.jpg", Verdict::Approve),
            Err(SwipeError::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_image_is_listed_and_movable() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        touch(dir.path(), "real.jpg");
        std::os::unix::fs::symlink(
            dir.path().join("real.jpg"),
            store.dir_for(Location::Pending).join("link.jpg"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("missing.jpg"),
            store.dir_for(Location::Pending).join("dangling.jpg"),
        )
        .unwrap();

        assert_eq!(store.list_pending().unwrap(), vec!["link.jpg".to_string()]);
        store.decide("link.jpg", Verdict::Approve).unwrap();
        assert!(store.list_pending().unwrap().is_empty());
        assert!(store.dir_for(Location::Approved).join("link.jpg").is_file());
    }

    #[test]
    fn test_missing_destination_is_storage_error() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        touch(store.dir_for(Location::Pending), "a.jpg");
        std::fs::remove_dir(store.dir_for(Location::Approved)).unwrap();

        assert!(matches!(
            store.decide("a.jpg", Verdict::Approve),
            Err(SwipeError::FileSystem(_))
        ));
        assert_eq!(store.list_pending().unwrap(), vec!["a.jpg".to_string()]);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Approve.to_string(), "approve");
        assert_eq!(Verdict::Decline.to_string(), "decline");
    }
}
