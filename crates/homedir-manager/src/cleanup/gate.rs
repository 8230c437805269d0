use std::io::{self, BufRead, Write};
use std::path::Path;

use super::domain::Confirmation;
use crate::accounts::Candidate;

pub const PROMPT: &str = "Type 'yes' to proceed with cleanup, 'skip' to skip, or 'abort' to exit";
const BANNER_WIDTH: usize = 50;

/// Operator-facing terminal: the blocking prompt and the notice lines.
pub trait Console {
    /// Blocks until the operator picks one of the three accepted answers.
    fn confirm_cleanup(&self, username: &str, home: &Path) -> Confirmation;
    fn notice(&self, line: &str);
}

impl<T: Console + ?Sized> Console for &T {
    fn confirm_cleanup(&self, username: &str, home: &Path) -> Confirmation {
        (**self).confirm_cleanup(username, home)
    }

    fn notice(&self, line: &str) {
        (**self).notice(line)
    }
}

/// Per-candidate approval step. Performs no filesystem or network action.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationGate {
    careful: bool,
}

impl ConfirmationGate {
    pub fn new(careful: bool) -> Self {
        Self { careful }
    }

    pub fn is_careful(&self) -> bool {
        self.careful
    }

    pub fn confirm<C>(&self, console: &C, candidate: &Candidate, home: &Path) -> Confirmation
    where
        C: Console + ?Sized,
    {
        if !self.careful {
            return Confirmation::Proceed;
        }
        console.confirm_cleanup(&candidate.username, home)
    }
}

/// Console bound to the process stdin/stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn confirm_cleanup(&self, username: &str, home: &Path) -> Confirmation {
        let stdin = io::stdin();
        let stdout = io::stdout();
        prompt_until_valid(&mut stdin.lock(), &mut stdout.lock(), username, home)
    }

    fn notice(&self, line: &str) {
        println!("{line}");
    }
}

/// Re-prompts on anything other than `yes`, `skip` or `abort`. A closed or
/// unreadable input stream counts as `abort`.
pub fn prompt_until_valid<R, W>(
    input: &mut R,
    output: &mut W,
    username: &str,
    home: &Path,
) -> Confirmation
where
    R: BufRead,
    W: Write,
{
    let banner = "=".repeat(BANNER_WIDTH);
    // A broken stdout must not turn into an implicit "yes".
    if writeln!(
        output,
        "\n{banner}\nUser: {username}\nHome Directory: {}\n{banner}",
        home.display()
    )
    .is_err()
    {
        return Confirmation::Abort;
    }

    loop {
        if write!(output, "{PROMPT}: ").and_then(|_| output.flush()).is_err() {
            return Confirmation::Abort;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                let _ = writeln!(output);
                return Confirmation::Abort;
            }
            Ok(_) => {}
        }

        if let Some(choice) = Confirmation::parse(&line) {
            return choice;
        }

        let _ = writeln!(
            output,
            "Error: '{}' is not one of 'yes', 'skip', 'abort'.",
            line.trim()
        );
    }
}
