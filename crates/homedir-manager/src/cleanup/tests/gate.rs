use super::common::*;
use crate::cleanup::domain::Confirmation;
use crate::cleanup::gate::{prompt_until_valid, ConfirmationGate, PROMPT};
use std::io::Cursor;
use std::path::Path;

#[test]
fn relaxed_gate_proceeds_without_prompting() {
    let console = ScriptedConsole::default();
    let gate = ConfirmationGate::new(false);

    let decision = gate.confirm(&console, &candidate("train001"), &home_of("train001"));

    assert_eq!(decision, Confirmation::Proceed);
    assert!(console.prompts().is_empty());
    assert!(console.notices().is_empty());
}

#[test]
fn careful_gate_relays_each_answer() {
    for answer in [
        Confirmation::Proceed,
        Confirmation::Skip,
        Confirmation::Abort,
    ] {
        let console = ScriptedConsole::answering(&[answer]);
        let gate = ConfirmationGate::new(true);

        let decision = gate.confirm(&console, &candidate("train001"), &home_of("train001"));

        assert_eq!(decision, answer);
        assert_eq!(
            console.prompts(),
            vec![("train001".to_string(), home_of("train001"))]
        );
    }
}

fn run_prompt(input: &str) -> (Confirmation, String) {
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();
    let choice = prompt_until_valid(
        &mut reader,
        &mut output,
        "train001",
        Path::new("/home/users/train001"),
    );
    (choice, String::from_utf8(output).expect("utf8 output"))
}

#[test]
fn prompt_shows_account_banner() {
    let (choice, output) = run_prompt("yes\n");

    assert_eq!(choice, Confirmation::Proceed);
    assert!(output.contains(&"=".repeat(50)));
    assert!(output.contains("User: train001"));
    assert!(output.contains("Home Directory: /home/users/train001"));
    assert!(output.contains(PROMPT));
}

#[test]
fn prompt_accepts_mixed_case() {
    assert_eq!(run_prompt("YES\n").0, Confirmation::Proceed);
    assert_eq!(run_prompt("Skip\n").0, Confirmation::Skip);
    assert_eq!(run_prompt("aBoRt\n").0, Confirmation::Abort);
}

#[test]
fn prompt_repeats_until_answer_is_valid() {
    let (choice, output) = run_prompt("y\nmaybe\nskip\n");

    assert_eq!(choice, Confirmation::Skip);
    assert!(output.contains("Error: 'y' is not one of 'yes', 'skip', 'abort'."));
    assert!(output.contains("Error: 'maybe' is not one of 'yes', 'skip', 'abort'."));
    assert_eq!(output.matches(PROMPT).count(), 3);
}

#[test]
fn closed_input_aborts() {
    assert_eq!(run_prompt("").0, Confirmation::Abort);
    assert_eq!(run_prompt("nope\n").0, Confirmation::Abort);
}
