use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

#[test]
fn no_arguments_is_a_usage_error() {
    cargo_bin()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing program file").and(predicate::str::contains("Usage")));
}

#[test]
fn two_program_files_is_a_usage_error() {
    cargo_bin()
        .args(["one.bf", "two.bf"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Too many arguments"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    cargo_bin()
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}
