//! Training-account home-directory reclamation: eligibility checks, the
//! operator confirmation gate, the destructive executor and the orchestrator
//! tying them together.

pub mod domain;
pub mod eligibility;
pub mod executor;
pub mod filesystem;
pub mod gate;
pub mod orchestrator;
pub mod reclamation;

#[cfg(test)]
mod tests;

pub use domain::{CandidateError, CleanupStep, Confirmation, EligibilityVerdict, Outcome};
pub use eligibility::{evaluate, expected_home, TRAINING_PREFIX};
pub use executor::{CleanupExecutor, Execution, ExecutionError};
pub use filesystem::{HomeFilesystem, LocalFilesystem, ProvisionResult};
pub use gate::{prompt_until_valid, ConfirmationGate, Console, TerminalConsole, PROMPT};
pub use orchestrator::{
    CandidateReport, CleanupOptions, CleanupOrchestrator, CleanupReport, RunStatus,
};
pub use reclamation::{ReclamationArea, RECLAMATION_DIR};
