use std::io::{self, Write};
use std::path::PathBuf;

use homedir_manager::accounts::HttpAccountsClient;
use homedir_manager::cleanup::{
    CleanupOptions, CleanupOrchestrator, CleanupReport, LocalFilesystem, RunStatus,
    TerminalConsole,
};
use homedir_manager::config::Settings;
use homedir_manager::error::{AppError, EXIT_ABORTED, EXIT_FAILURE};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct CleanupArgs {
    pub settings_file: PathBuf,
    pub dry_run: bool,
    pub careful: bool,
}

/// How a command finished once it got far enough to produce a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    CompletedWithFailures,
    Aborted,
}

impl CommandStatus {
    pub fn from_report(report: &CleanupReport) -> Self {
        if report.is_aborted() {
            CommandStatus::Aborted
        } else if report.has_failures() {
            CommandStatus::CompletedWithFailures
        } else {
            CommandStatus::Completed
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Completed => 0,
            CommandStatus::CompletedWithFailures => EXIT_FAILURE,
            CommandStatus::Aborted => EXIT_ABORTED,
        }
    }
}

pub fn cleanup_training_accounts(args: &CleanupArgs) -> Result<CommandStatus, AppError> {
    let settings = Settings::from_toml_file(&args.settings_file)?;
    info!(
        settings_file = %args.settings_file.display(),
        home_dir_root = %settings.home_dir_folder.display(),
        "loaded settings"
    );

    let accounts = HttpAccountsClient::connect(&settings)?;
    let filesystem = LocalFilesystem::new(settings.mkhomedir_helper.clone());
    let orchestrator = CleanupOrchestrator::new(
        accounts,
        filesystem,
        TerminalConsole,
        CleanupOptions {
            home_dir_root: settings.home_dir_folder.clone(),
            dry_run: args.dry_run,
            careful: args.careful,
        },
    );

    let report = orchestrator.run()?;
    let status = CommandStatus::from_report(&report);
    match status {
        CommandStatus::Completed => info!(
            cleaned = report.cleaned(),
            skipped = report.skipped(),
            dry_run = report.dry_runs(),
            "cleanup run finished"
        ),
        CommandStatus::CompletedWithFailures => warn!(
            failed = report.failed(),
            "cleanup run finished with failed candidates"
        ),
        CommandStatus::Aborted => warn!("cleanup run aborted by operator"),
    }

    let stdout = io::stdout();
    render_report(&report, &mut stdout.lock())?;
    Ok(status)
}

pub fn render_report<W: Write>(report: &CleanupReport, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    if report.entries.is_empty() {
        writeln!(out, "No training accounts awaiting cleanup.")?;
    }
    for entry in &report.entries {
        writeln!(out, "{}: {}", entry.username, entry.outcome.summary())?;
    }

    writeln!(
        out,
        "Processed {} account(s): {} cleaned, {} previewed, {} skipped, {} failed",
        report.entries.len(),
        report.cleaned(),
        report.dry_runs(),
        report.skipped(),
        report.failed()
    )?;
    if let RunStatus::Aborted { username } = &report.status {
        writeln!(
            out,
            "Run aborted at {username}; remaining accounts were not processed."
        )?;
    }
    Ok(())
}
