use std::collections::{BTreeSet, HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use crate::accounts::{AccountDetail, AccountsApi, AccountsError, Candidate, LifecycleState};
use crate::cleanup::domain::Confirmation;
use crate::cleanup::filesystem::{HomeFilesystem, ProvisionResult};
use crate::cleanup::gate::Console;
use crate::cleanup::orchestrator::{CleanupOptions, CleanupOrchestrator};
use crate::cleanup::reclamation::RECLAMATION_DIR;

pub(super) const HOME_ROOT: &str = "/home/users";

pub(super) fn home_root() -> PathBuf {
    PathBuf::from(HOME_ROOT)
}

pub(super) fn home_of(username: &str) -> PathBuf {
    home_root().join(username)
}

pub(super) fn reclamation_dir() -> PathBuf {
    home_root().join(RECLAMATION_DIR)
}

pub(super) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn candidate(username: &str) -> Candidate {
    Candidate {
        username: username.to_string(),
        api_url: format!("https://accounts.example.com/api/users/{username}/"),
        lifecycle_state: LifecycleState::AwaitingCleanup,
        is_active: false,
    }
}

pub(super) fn detail(username: &str, home: impl Into<PathBuf>) -> AccountDetail {
    AccountDetail {
        username: username.to_string(),
        reported_home_directory: home.into(),
    }
}

pub(super) fn matching_detail(username: &str) -> AccountDetail {
    detail(username, home_of(username))
}

/// Accounts portal double. Candidates without a registered detail answer 404.
#[derive(Default)]
pub(super) struct MemoryAccounts {
    candidates: Vec<Candidate>,
    details: HashMap<String, AccountDetail>,
    failing_patches: BTreeSet<String>,
    list_unavailable: bool,
    detail_requests: Mutex<Vec<String>>,
    patched: Mutex<Vec<String>>,
}

impl MemoryAccounts {
    pub(super) fn with(mut self, candidate: Candidate, detail: AccountDetail) -> Self {
        self.details.insert(candidate.username.clone(), detail);
        self.candidates.push(candidate);
        self
    }

    pub(super) fn with_eligible(self, username: &str) -> Self {
        self.with(candidate(username), matching_detail(username))
    }

    pub(super) fn with_missing_detail(mut self, candidate: Candidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub(super) fn failing_patch_for(mut self, username: &str) -> Self {
        self.failing_patches.insert(username.to_string());
        self
    }

    pub(super) fn unavailable(mut self) -> Self {
        self.list_unavailable = true;
        self
    }

    pub(super) fn detail_requests(&self) -> Vec<String> {
        self.detail_requests
            .lock()
            .expect("accounts mutex poisoned")
            .clone()
    }

    pub(super) fn patched(&self) -> Vec<String> {
        self.patched.lock().expect("accounts mutex poisoned").clone()
    }
}

impl AccountsApi for MemoryAccounts {
    fn list_candidates(&self) -> Result<Vec<Candidate>, AccountsError> {
        if self.list_unavailable {
            return Err(AccountsError::Status {
                status: 503,
                url: "https://accounts.example.com/api/users/".to_string(),
            });
        }
        Ok(self.candidates.clone())
    }

    fn fetch_detail(&self, candidate: &Candidate) -> Result<AccountDetail, AccountsError> {
        self.detail_requests
            .lock()
            .expect("accounts mutex poisoned")
            .push(candidate.username.clone());
        self.details
            .get(&candidate.username)
            .cloned()
            .ok_or_else(|| AccountsError::Status {
                status: 404,
                url: candidate.api_url.clone(),
            })
    }

    fn mark_normal(&self, candidate: &Candidate) -> Result<(), AccountsError> {
        if self.failing_patches.contains(&candidate.username) {
            return Err(AccountsError::Status {
                status: 500,
                url: candidate.api_url.clone(),
            });
        }
        self.patched
            .lock()
            .expect("accounts mutex poisoned")
            .push(candidate.username.clone());
        Ok(())
    }
}

/// Directory tree double. Starts with the home root and the reclamation area.
pub(super) struct MemoryFilesystem {
    dirs: Mutex<BTreeSet<PathBuf>>,
    relocations: Mutex<Vec<(PathBuf, PathBuf)>>,
    provisioned: Mutex<Vec<String>>,
    provision_result: ProvisionResult,
    relocate_fails: bool,
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        let dirs = [home_root(), reclamation_dir()].into_iter().collect();
        Self {
            dirs: Mutex::new(dirs),
            relocations: Mutex::new(Vec::new()),
            provisioned: Mutex::new(Vec::new()),
            provision_result: ProvisionResult::Created,
            relocate_fails: false,
        }
    }
}

impl MemoryFilesystem {
    pub(super) fn with_homes(usernames: &[&str]) -> Self {
        let fs = Self::default();
        for username in usernames {
            fs.add_dir(home_of(username));
        }
        fs
    }

    pub(super) fn without_reclamation_area(self) -> Self {
        self.dirs
            .lock()
            .expect("fs mutex poisoned")
            .remove(&reclamation_dir());
        self
    }

    pub(super) fn provision_result(mut self, result: ProvisionResult) -> Self {
        self.provision_result = result;
        self
    }

    pub(super) fn failing_relocate(mut self) -> Self {
        self.relocate_fails = true;
        self
    }

    pub(super) fn add_dir(&self, path: PathBuf) {
        self.dirs.lock().expect("fs mutex poisoned").insert(path);
    }

    pub(super) fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().expect("fs mutex poisoned").contains(path)
    }

    pub(super) fn relocations(&self) -> Vec<(PathBuf, PathBuf)> {
        self.relocations.lock().expect("fs mutex poisoned").clone()
    }

    pub(super) fn provisioned(&self) -> Vec<String> {
        self.provisioned.lock().expect("fs mutex poisoned").clone()
    }

    pub(super) fn untouched(&self) -> bool {
        self.relocations().is_empty() && self.provisioned().is_empty()
    }
}

impl HomeFilesystem for MemoryFilesystem {
    fn is_dir(&self, path: &Path) -> bool {
        self.exists(path)
    }

    fn relocate(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.relocate_fails {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "Invalid cross-device link",
            ));
        }
        let mut dirs = self.dirs.lock().expect("fs mutex poisoned");
        if !dirs.remove(from) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        dirs.insert(to.to_path_buf());
        self.relocations
            .lock()
            .expect("fs mutex poisoned")
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn provision_home(&self, username: &str) -> ProvisionResult {
        self.provisioned
            .lock()
            .expect("fs mutex poisoned")
            .push(username.to_string());
        self.provision_result.clone()
    }
}

/// Console double answering prompts from a script. An unscripted prompt panics.
#[derive(Default)]
pub(super) struct ScriptedConsole {
    answers: Mutex<VecDeque<Confirmation>>,
    prompts: Mutex<Vec<(String, PathBuf)>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub(super) fn answering(answers: &[Confirmation]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub(super) fn prompts(&self) -> Vec<(String, PathBuf)> {
        self.prompts.lock().expect("console mutex poisoned").clone()
    }

    pub(super) fn notices(&self) -> Vec<String> {
        self.notices.lock().expect("console mutex poisoned").clone()
    }
}

impl Console for ScriptedConsole {
    fn confirm_cleanup(&self, username: &str, home: &Path) -> Confirmation {
        self.prompts
            .lock()
            .expect("console mutex poisoned")
            .push((username.to_string(), home.to_path_buf()));
        self.answers
            .lock()
            .expect("console mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt for {username}"))
    }

    fn notice(&self, line: &str) {
        self.notices
            .lock()
            .expect("console mutex poisoned")
            .push(line.to_string());
    }
}

pub(super) fn orchestrator<'a>(
    accounts: &'a MemoryAccounts,
    filesystem: &'a MemoryFilesystem,
    console: &'a ScriptedConsole,
    dry_run: bool,
    careful: bool,
) -> CleanupOrchestrator<&'a MemoryAccounts, &'a MemoryFilesystem, &'a ScriptedConsole> {
    CleanupOrchestrator::new(
        accounts,
        filesystem,
        console,
        CleanupOptions {
            home_dir_root: home_root(),
            dry_run,
            careful,
        },
    )
}
