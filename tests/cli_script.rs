use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn finbar(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finbar").unwrap();
    cmd.env("FINBAR_CLI_SCRIPT", "1")
        .env("FINBAR_HOME", home.path())
        .env("FINBAR_TODAY", "2024-06-15")
        .env_remove("FINBAR_AI_KEY");
    cmd
}

#[test]
fn script_mode_records_and_reports() {
    let home = TempDir::new().unwrap();
    finbar(&home)
        .write_stdin("salary 3000\nspent 12 on lunch\nreport\nexit\n")
        .assert()
        .success()
        .stdout(contains("[ok] Income 3000.00 [Salary]"))
        .stdout(contains("[ok] Expense 12.00 [Dining] lunch on 2024-06-15"))
        .stdout(contains("=== Report for 2024-06 ==="))
        .stdout(contains("Dining"));

    let saved = home.path().join("conversations").join("default.json");
    let json = std::fs::read_to_string(saved).unwrap();
    assert!(json.contains("\"lunch\""));
}

#[test]
fn conversations_survive_restarts() {
    let home = TempDir::new().unwrap();
    finbar(&home)
        .write_stdin("conversation new Trip\nspent 300 on hotel\n")
        .assert()
        .success()
        .stdout(contains("Conversation `Trip` created and active."));

    finbar(&home)
        .write_stdin("transactions\n")
        .assert()
        .success()
        .stdout(contains("Entries for 2024-06"))
        .stdout(contains("hotel"));
}

#[test]
fn simulation_edits_are_labelled_and_discarded() {
    let home = TempDir::new().unwrap();
    finbar(&home)
        .write_stdin("simulate begin\nspent 100 on hotel\nsimulate discard\ntransactions\n")
        .assert()
        .success()
        .stdout(contains("[simulation] Expense 100.00"))
        .stdout(contains("Simulation discarded."))
        .stdout(contains("No entries in 2024-06."));
}

#[test]
fn unknown_input_gets_a_hint() {
    let home = TempDir::new().unwrap();
    finbar(&home)
        .write_stdin("helpp\n")
        .assert()
        .success()
        .stdout(contains("Could not understand `helpp`"))
        .stdout(contains("Did you mean the `help` command?"))
        .stdout(contains("[ok]").not());
}
