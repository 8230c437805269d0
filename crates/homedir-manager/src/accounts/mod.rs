//! Accounts portal integration: decoded records, the API seam used by the
//! cleanup pipeline, and the OAuth2-authenticated HTTP implementation.

mod client;
mod records;

pub use client::{HttpAccountsClient, CANDIDATE_QUERY};
pub use records::{decode_candidates, decode_detail, AccountDetail, Candidate, LifecycleState};

/// Operations the cleanup pipeline needs from the accounts portal.
pub trait AccountsApi {
    /// Training accounts awaiting cleanup, in portal order.
    fn list_candidates(&self) -> Result<Vec<Candidate>, AccountsError>;
    fn fetch_detail(&self, candidate: &Candidate) -> Result<AccountDetail, AccountsError>;
    /// Moves the account back to `NORMAL` once its home has been reclaimed.
    fn mark_normal(&self, candidate: &Candidate) -> Result<(), AccountsError>;
}

impl<T: AccountsApi + ?Sized> AccountsApi for &T {
    fn list_candidates(&self) -> Result<Vec<Candidate>, AccountsError> {
        (**self).list_candidates()
    }

    fn fetch_detail(&self, candidate: &Candidate) -> Result<AccountDetail, AccountsError> {
        (**self).fetch_detail(candidate)
    }

    fn mark_normal(&self, candidate: &Candidate) -> Result<(), AccountsError> {
        (**self).mark_normal(candidate)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    #[error("accounts API authentication failed: {0}")]
    Authentication(String),
    #[error("accounts API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("accounts API returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("malformed {what} payload: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },
    #[error("accounts client runtime unavailable: {0}")]
    Runtime(String),
}
