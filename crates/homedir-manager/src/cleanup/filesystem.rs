use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of invoking the home-directory provisioning helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionResult {
    Created,
    ExitedWith(Option<i32>),
    SpawnFailed(String),
}

impl ProvisionResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, ProvisionResult::Created)
    }
}

/// Filesystem and OS operations touched by the cleanup pipeline.
pub trait HomeFilesystem {
    fn is_dir(&self, path: &Path) -> bool;
    /// Moves a whole directory subtree in one rename. Never falls back to a copy
    /// or a recursive delete.
    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn provision_home(&self, username: &str) -> ProvisionResult;
}

impl<T: HomeFilesystem + ?Sized> HomeFilesystem for &T {
    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).relocate(from, to)
    }

    fn provision_home(&self, username: &str) -> ProvisionResult {
        (**self).provision_home(username)
    }
}

/// The host filesystem plus the external `mkhomedir_helper`-style binary.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    mkhomedir_helper: PathBuf,
}

impl LocalFilesystem {
    pub fn new(mkhomedir_helper: impl Into<PathBuf>) -> Self {
        Self {
            mkhomedir_helper: mkhomedir_helper.into(),
        }
    }
}

impl HomeFilesystem for LocalFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        // rename(2) silently replaces an empty directory at the destination
        if to.symlink_metadata().is_ok() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", to.display()),
            ));
        }
        std::fs::rename(from, to)
    }

    fn provision_home(&self, username: &str) -> ProvisionResult {
        match Command::new(&self.mkhomedir_helper).arg(username).status() {
            Ok(status) if status.success() => ProvisionResult::Created,
            Ok(status) => ProvisionResult::ExitedWith(status.code()),
            Err(err) => ProvisionResult::SpawnFailed(format!(
                "{}: {err}",
                self.mkhomedir_helper.display()
            )),
        }
    }
}
