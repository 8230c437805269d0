use std::path::{Component, Path, PathBuf};

use super::domain::EligibilityVerdict;
use super::filesystem::HomeFilesystem;
use crate::accounts::{AccountDetail, Candidate};

/// Only identities carrying this prefix are ever considered for cleanup.
pub const TRAINING_PREFIX: &str = "train";

/// `home_dir_root / username`, provided the username is a single plain path
/// component. Names such as `train/../x` or `.` yield `None`.
pub fn expected_home(home_dir_root: &Path, username: &str) -> Option<PathBuf> {
    let mut components = Path::new(username).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == username => {
            Some(home_dir_root.join(name))
        }
        _ => None,
    }
}

/// Ordered, short-circuiting safety checks. Reads the filesystem only through
/// `is_dir` and never mutates anything. Never yields `UserDeclined` or
/// `UserAborted`; those come from the confirmation gate.
///
/// Paths are compared with [`Path`] equality, which ignores repeated and
/// trailing separators and interior `.` components but never resolves `..`
/// or symlinks.
pub fn evaluate<F>(
    candidate: &Candidate,
    detail: &AccountDetail,
    home_dir_root: &Path,
    filesystem: &F,
) -> EligibilityVerdict
where
    F: HomeFilesystem + ?Sized,
{
    if !candidate.username.starts_with(TRAINING_PREFIX) {
        return EligibilityVerdict::NotTrainingAccount;
    }

    let Some(expected) = expected_home(home_dir_root, &candidate.username) else {
        return EligibilityVerdict::PathMismatch;
    };
    if detail.reported_home_directory.as_path() != expected.as_path() {
        return EligibilityVerdict::PathMismatch;
    }

    if !filesystem.is_dir(&expected) {
        return EligibilityVerdict::DirectoryMissing;
    }

    EligibilityVerdict::Eligible
}
