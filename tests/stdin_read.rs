// Exercises the ',' (input) instruction by piping a byte to the binary
// running the program ",." (read one byte, then echo it).
use assert_cmd::Command;
use std::io::Write;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

fn program_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn reads_from_stdin_and_echoes_byte() {
    let tf = program_file(",.");
    cargo_bin()
        .arg(tf.path())
        .write_stdin("Z")
        .assert()
        .success()
        .stdout("Z");
}

#[test]
fn eof_on_stdin_stores_zero() {
    let tf = program_file(",.");
    cargo_bin()
        .arg(tf.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(&b"\0"[..]);
}
