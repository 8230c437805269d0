use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use super::AccountsError;

/// Lifecycle marker held by the accounts portal. It is the only durable record
/// of cleanup progress.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LifecycleState {
    AwaitingCleanup,
    Normal,
    Other(String),
}

impl LifecycleState {
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::AwaitingCleanup => "AWAITING_CLEANUP",
            LifecycleState::Normal => "NORMAL",
            LifecycleState::Other(value) => value,
        }
    }
}

impl From<String> for LifecycleState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "AWAITING_CLEANUP" => Self::AwaitingCleanup,
            "NORMAL" => Self::Normal,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One account listed by the portal as awaiting home-directory cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    pub username: String,
    /// Detail and patch endpoint for this account.
    #[serde(rename = "url")]
    pub api_url: String,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub is_active: bool,
}

/// Expanded account record carrying the directory-service view of the home path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "DetailPayload")]
pub struct AccountDetail {
    pub username: String,
    pub reported_home_directory: PathBuf,
}

#[derive(Deserialize)]
struct DetailPayload {
    username: String,
    account: DirectoryAccount,
}

#[derive(Deserialize)]
struct DirectoryAccount {
    #[serde(rename = "homeDirectory")]
    home_directory: PathBuf,
}

impl From<DetailPayload> for AccountDetail {
    fn from(payload: DetailPayload) -> Self {
        Self {
            username: payload.username,
            reported_home_directory: payload.account.home_directory,
        }
    }
}

pub fn decode_candidates(body: &[u8]) -> Result<Vec<Candidate>, AccountsError> {
    serde_json::from_slice(body).map_err(|source| AccountsError::Decode {
        what: "candidate list",
        source,
    })
}

pub fn decode_detail(body: &[u8]) -> Result<AccountDetail, AccountsError> {
    serde_json::from_slice(body).map_err(|source| AccountsError::Decode {
        what: "account detail",
        source,
    })
}
