use std::fmt;
use std::path::PathBuf;

use super::executor::ExecutionError;
use crate::accounts::AccountsError;

/// Decision reached for one candidate. Everything except `Eligible` excludes
/// the candidate from destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityVerdict {
    Eligible,
    NotTrainingAccount,
    PathMismatch,
    DirectoryMissing,
    UserDeclined,
    UserAborted,
}

impl EligibilityVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            EligibilityVerdict::Eligible => "eligible",
            EligibilityVerdict::NotTrainingAccount => "not a training account",
            EligibilityVerdict::PathMismatch => "home directory path mismatch",
            EligibilityVerdict::DirectoryMissing => "home directory missing",
            EligibilityVerdict::UserDeclined => "skipped by operator",
            EligibilityVerdict::UserAborted => "run aborted by operator",
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityVerdict::Eligible)
    }
}

impl fmt::Display for EligibilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operator answer from the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Skip,
    Abort,
}

impl Confirmation {
    /// Accepts exactly `yes`, `skip` or `abort`, ignoring case and surrounding
    /// whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        let answer = input.trim();
        if answer.eq_ignore_ascii_case("yes") {
            Some(Self::Proceed)
        } else if answer.eq_ignore_ascii_case("skip") {
            Some(Self::Skip)
        } else if answer.eq_ignore_ascii_case("abort") {
            Some(Self::Abort)
        } else {
            None
        }
    }
}

/// One mutation performed by a real cleanup, or previewed by a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupStep {
    Relocate { from: PathBuf, to: PathBuf },
    RecreateHome { username: String },
    MarkNormal { username: String },
}

impl CleanupStep {
    pub fn preview(&self) -> String {
        format!("[DRY RUN] Would {self}")
    }
}

impl fmt::Display for CleanupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupStep::Relocate { from, to } => {
                write!(f, "move {} to {}", from.display(), to.display())
            }
            CleanupStep::RecreateHome { username } => {
                write!(f, "create empty home for {username}")
            }
            CleanupStep::MarkNormal { username } => {
                write!(f, "update {username} to NORMAL state")
            }
        }
    }
}

/// Per-candidate result accumulated by the orchestrator.
#[derive(Debug)]
pub enum Outcome {
    Cleaned {
        destination: PathBuf,
        home_recreated: bool,
    },
    Skipped(EligibilityVerdict),
    DryRun(Vec<CleanupStep>),
    Failed(CandidateError),
}

impl Outcome {
    pub fn summary(&self) -> String {
        match self {
            Outcome::Cleaned {
                destination,
                home_recreated: true,
            } => format!("cleaned (moved to {})", destination.display()),
            Outcome::Cleaned {
                destination,
                home_recreated: false,
            } => format!(
                "cleaned (moved to {}), home directory NOT recreated",
                destination.display()
            ),
            Outcome::Skipped(verdict) => format!("skipped: {verdict}"),
            Outcome::DryRun(steps) => format!("dry run ({} step(s) previewed)", steps.len()),
            Outcome::Failed(err) => format!("failed: {err}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error("could not fetch account detail: {0}")]
    Detail(AccountsError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
