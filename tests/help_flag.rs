use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

#[test]
fn help_prints_usage_to_stdout() {
    cargo_bin()
        .arg("--help")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn short_help_flag_behaves_the_same() {
    cargo_bin()
        .arg("-h")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn help_wins_over_other_arguments_and_reads_no_file() {
    // If the file argument were touched we would see a file-open error on
    // stderr; help must short-circuit before that.
    cargo_bin()
        .arg("--help")
        .arg("definitely-not-a-real-file.bf")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::is_empty());
}
