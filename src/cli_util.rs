use std::io::{self, Write};

use crate::engine::RunError;

/// Pretty-print a [`RunError`] with caret positioning into the program text.
/// If `program` is `Some("bfi")`, messages are prefixed with "bfi: ...".
pub fn print_run_error(program: Option<&str>, code: &[u8], err: &RunError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        RunError::MalformedProgram { ip, kind } => {
            let msg = prefix_program(&format!("Parse error: unmatched bracket {kind}"));
            print_error_with_context(&msg, code, *ip);
        }
        RunError::Io { ip, source } => {
            let msg = prefix_program(&format!("I/O error: {source}"));
            print_error_with_context(&msg, code, *ip);
        }
    }
}

/// Print a concise error with the instruction index and a caret context
/// window. Programs are raw bytes; anything non-printable renders as a
/// space so the caret column stays true.
pub fn print_error_with_context(prefix: &str, code: &[u8], pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    const WINDOW: usize = 32;

    let start = pos.saturating_sub(WINDOW);
    let end = (pos + WINDOW + 1).min(code.len());
    let rendered: String = code[start..end]
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                ' '
            }
        })
        .collect();

    eprintln!("  {rendered}");

    let mut underline = " ".repeat(pos.saturating_sub(start));
    underline.push('^');
    eprintln!("  {underline}");
    let _ = io::stderr().flush();
}
