use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Directory under the home root that receives relocated home directories.
/// Its contents are disposed of out of band.
pub const RECLAMATION_DIR: &str = ".fast-remove";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclamationArea {
    path: PathBuf,
}

impl ReclamationArea {
    pub fn under(home_dir_root: &Path) -> Self {
        Self {
            path: home_dir_root.join(RECLAMATION_DIR),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamped slot so an unconsumed earlier reclamation of the same
    /// username never blocks the rename.
    pub fn destination(&self, username: &str, at: DateTime<Utc>) -> PathBuf {
        self.path
            .join(format!("{username}.{}", at.format("%Y%m%dT%H%M%SZ")))
    }
}
