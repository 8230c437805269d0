use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::domain::CleanupStep;
use super::filesystem::HomeFilesystem;
use super::gate::Console;
use super::reclamation::ReclamationArea;
use crate::accounts::{AccountsApi, AccountsError, Candidate};

/// What a successful `execute` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    Cleaned {
        destination: PathBuf,
        home_recreated: bool,
    },
    DryRun(Vec<CleanupStep>),
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("reclamation area {} does not exist", path.display())]
    ReclamationAreaMissing { path: PathBuf },
    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to mark account NORMAL: {0}")]
    Remote(AccountsError),
}

/// Performs, or previews, the three cleanup steps for one approved candidate.
///
/// There is no rollback: a failure after the move leaves the home relocated and
/// the remote account still awaiting cleanup.
pub struct CleanupExecutor<'a, A, F, C>
where
    A: ?Sized,
    F: ?Sized,
    C: ?Sized,
{
    accounts: &'a A,
    filesystem: &'a F,
    console: &'a C,
    reclamation: &'a ReclamationArea,
    dry_run: bool,
}

impl<'a, A, F, C> CleanupExecutor<'a, A, F, C>
where
    A: AccountsApi + ?Sized,
    F: HomeFilesystem + ?Sized,
    C: Console + ?Sized,
{
    pub fn new(
        accounts: &'a A,
        filesystem: &'a F,
        console: &'a C,
        reclamation: &'a ReclamationArea,
        dry_run: bool,
    ) -> Self {
        Self {
            accounts,
            filesystem,
            console,
            reclamation,
            dry_run,
        }
    }

    /// Steps in execution order. Dry runs print exactly this list.
    pub fn plan(&self, candidate: &Candidate, home: &Path, at: DateTime<Utc>) -> Vec<CleanupStep> {
        vec![
            CleanupStep::Relocate {
                from: home.to_path_buf(),
                to: self.reclamation.destination(&candidate.username, at),
            },
            CleanupStep::RecreateHome {
                username: candidate.username.clone(),
            },
            CleanupStep::MarkNormal {
                username: candidate.username.clone(),
            },
        ]
    }

    pub fn execute(&self, candidate: &Candidate, home: &Path) -> Result<Execution, ExecutionError> {
        self.execute_at(candidate, home, Utc::now())
    }

    pub fn execute_at(
        &self,
        candidate: &Candidate,
        home: &Path,
        at: DateTime<Utc>,
    ) -> Result<Execution, ExecutionError> {
        let steps = self.plan(candidate, home, at);

        if self.dry_run {
            if !self.filesystem.is_dir(self.reclamation.path()) {
                warn!(
                    path = %self.reclamation.path().display(),
                    "reclamation area missing; a real run would fail"
                );
            }
            for step in &steps {
                self.console.notice(&step.preview());
            }
            info!(username = %candidate.username, "dry run previewed cleanup");
            return Ok(Execution::DryRun(steps));
        }

        if !self.filesystem.is_dir(self.reclamation.path()) {
            return Err(ExecutionError::ReclamationAreaMissing {
                path: self.reclamation.path().to_path_buf(),
            });
        }

        let mut destination = PathBuf::new();
        let mut home_recreated = false;
        for step in steps {
            match step {
                CleanupStep::Relocate { from, to } => {
                    self.filesystem
                        .relocate(&from, &to)
                        .map_err(|source| ExecutionError::Relocate {
                            from: from.clone(),
                            to: to.clone(),
                            source,
                        })?;
                    info!(
                        username = %candidate.username,
                        from = %from.display(),
                        destination = %to.display(),
                        "moved home directory to reclamation area"
                    );
                    destination = to;
                }
                CleanupStep::RecreateHome { username } => {
                    home_recreated = self.recreate_home(&username);
                }
                CleanupStep::MarkNormal { username } => {
                    self.accounts
                        .mark_normal(candidate)
                        .map_err(ExecutionError::Remote)?;
                    info!(username = %username, "marked account NORMAL");
                }
            }
        }

        Ok(Execution::Cleaned {
            destination,
            home_recreated,
        })
    }

    // Best effort: a failed helper is reported but never blocks the remote update.
    fn recreate_home(&self, username: &str) -> bool {
        let result = self.filesystem.provision_home(username);
        if result.succeeded() {
            info!(username = %username, "recreated empty home directory");
        } else {
            error!(
                username = %username,
                helper = ?result,
                "HOME DIRECTORY NOT RECREATED: provisioning helper failed"
            );
        }
        result.succeeded()
    }
}
