use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use super::domain::{CandidateError, Confirmation, EligibilityVerdict, Outcome};
use super::eligibility::{evaluate, expected_home};
use super::executor::{CleanupExecutor, Execution};
use super::filesystem::HomeFilesystem;
use super::gate::{ConfirmationGate, Console};
use super::reclamation::ReclamationArea;
use crate::accounts::{AccountsApi, AccountsError, Candidate};

/// Mode switches for a cleanup run.
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub home_dir_root: PathBuf,
    pub dry_run: bool,
    pub careful: bool,
}

#[derive(Debug)]
pub struct CandidateReport {
    pub username: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// The operator answered `abort` while reviewing `username`.
    Aborted { username: String },
}

/// Everything decided during one run, in processing order.
#[derive(Debug)]
pub struct CleanupReport {
    pub entries: Vec<CandidateReport>,
    pub status: RunStatus,
}

impl CleanupReport {
    pub fn cleaned(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Cleaned { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped(_)))
    }

    pub fn dry_runs(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::DryRun(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.status, RunStatus::Aborted { .. })
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

/// Drives the candidate list through eligibility, confirmation and execution,
/// strictly one candidate at a time and in portal order.
///
/// At most one run may target a given home root at a time; nothing here guards
/// against concurrent runs.
pub struct CleanupOrchestrator<A, F, C> {
    accounts: A,
    filesystem: F,
    console: C,
    gate: ConfirmationGate,
    reclamation: ReclamationArea,
    home_dir_root: PathBuf,
    dry_run: bool,
}

impl<A, F, C> CleanupOrchestrator<A, F, C>
where
    A: AccountsApi,
    F: HomeFilesystem,
    C: Console,
{
    pub fn new(accounts: A, filesystem: F, console: C, options: CleanupOptions) -> Self {
        let CleanupOptions {
            home_dir_root,
            dry_run,
            careful,
        } = options;

        Self {
            accounts,
            filesystem,
            console,
            gate: ConfirmationGate::new(careful),
            reclamation: ReclamationArea::under(&home_dir_root),
            home_dir_root,
            dry_run,
        }
    }

    /// Fails only when the candidate list itself cannot be fetched. Per-candidate
    /// problems are recorded in the report and processing moves on.
    pub fn run(&self) -> Result<CleanupReport, AccountsError> {
        let candidates = self.accounts.list_candidates()?;
        info!(
            count = candidates.len(),
            dry_run = self.dry_run,
            careful = self.gate.is_careful(),
            "fetched cleanup candidates"
        );

        let mut entries = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let outcome = self.process(&candidate);
            let aborted = matches!(outcome, Outcome::Skipped(EligibilityVerdict::UserAborted));
            entries.push(CandidateReport {
                username: candidate.username.clone(),
                outcome,
            });

            if aborted {
                return Ok(CleanupReport {
                    entries,
                    status: RunStatus::Aborted {
                        username: candidate.username,
                    },
                });
            }
        }

        Ok(CleanupReport {
            entries,
            status: RunStatus::Completed,
        })
    }

    fn process(&self, candidate: &Candidate) -> Outcome {
        let username = candidate.username.as_str();

        let detail = match self.accounts.fetch_detail(candidate) {
            Ok(detail) => detail,
            Err(err) => {
                error!(username, error = %err, "failed to fetch account detail");
                return Outcome::Failed(CandidateError::Detail(err));
            }
        };

        let verdict = evaluate(candidate, &detail, &self.home_dir_root, &self.filesystem);
        let home = detail.reported_home_directory.as_path();
        self.log_verdict(username, home, verdict);
        if !verdict.is_eligible() {
            return Outcome::Skipped(verdict);
        }

        let declined = match self.gate.confirm(&self.console, candidate, home) {
            Confirmation::Proceed => None,
            Confirmation::Skip => Some(EligibilityVerdict::UserDeclined),
            Confirmation::Abort => {
                self.console.notice("Operation aborted by user");
                Some(EligibilityVerdict::UserAborted)
            }
        };
        if let Some(verdict) = declined {
            self.log_verdict(username, home, verdict);
            return Outcome::Skipped(verdict);
        }

        info!(username, home = %home.display(), "removing home directory");
        let executor = CleanupExecutor::new(
            &self.accounts,
            &self.filesystem,
            &self.console,
            &self.reclamation,
            self.dry_run,
        );

        match executor.execute(candidate, home) {
            Ok(Execution::Cleaned {
                destination,
                home_recreated,
            }) => Outcome::Cleaned {
                destination,
                home_recreated,
            },
            Ok(Execution::DryRun(steps)) => Outcome::DryRun(steps),
            Err(err) => {
                error!(username, error = %err, "cleanup failed");
                Outcome::Failed(CandidateError::Execution(err))
            }
        }
    }

    /// Evaluator verdicts and operator decisions share one severity map.
    fn log_verdict(&self, username: &str, home: &Path, verdict: EligibilityVerdict) {
        match verdict {
            EligibilityVerdict::Eligible => {
                debug!(username, home = %home.display(), "eligible for cleanup")
            }
            EligibilityVerdict::NotTrainingAccount => {
                warn!(username, "did nothing: username does not start with train")
            }
            EligibilityVerdict::PathMismatch => {
                let expected = expected_home(&self.home_dir_root, username);
                error!(
                    username,
                    reported = %home.display(),
                    expected = ?expected,
                    "home directory path check failed: directory service path does not match expected"
                );
            }
            EligibilityVerdict::DirectoryMissing => {
                warn!(username, home = %home.display(), "home directory does not exist")
            }
            EligibilityVerdict::UserDeclined => {
                info!(username, "careful mode: operator skipped candidate")
            }
            EligibilityVerdict::UserAborted => {
                warn!(username, "careful mode: operator aborted the run")
            }
        }
    }
}
