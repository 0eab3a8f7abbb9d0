use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use bfi::cli_util::print_run_error;
use bfi::{Headless, Session, Visual};
use clap::Parser;

const EXIT_HELP: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_FILE: i32 = 3;
const EXIT_RUN: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "bfi", disable_help_flag = true)]
struct Cli {
    /// Step through execution in the terminal debugger
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    /// Program file to run
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!(
        r#"Usage:
  {0} [--debug|-d] [file]

Options:
  --debug, -d   Step through execution in the terminal debugger
  --help,  -h   Show this help

Notes:
- The program file is read as raw bytes; any byte outside ><+-.,[] is a comment.
- Input (`,`) reads a single byte from stdin; on EOF the current cell is set to 0.

Examples:
- Run a program:
    {0} ./program.bf
- Step through it in the debugger:
    {0} --debug ./program.bf
"#,
        program
    )
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprint!("{}", usage(program));
    let _ = io::stderr().flush();
    process::exit(code);
}

fn run_headless(program: &str, bytes: Vec<u8>) -> i32 {
    // Flush whatever the program managed to print before an interrupt.
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return EXIT_RUN;
    }

    let mut session = Session::new(bytes);
    match session.run(&mut Headless::new()) {
        Ok(()) => 0,
        Err(err) => {
            print_run_error(Some(program), session.program(), &err);
            EXIT_RUN
        }
    }
}

fn run_visual(program: &str, bytes: Vec<u8>) -> i32 {
    let mut mode = match Visual::new() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{program}: failed to initialize the terminal: {e}");
            let _ = io::stderr().flush();
            return EXIT_RUN;
        }
    };

    let mut session = Session::new(bytes);
    let result = session.run(&mut mode);

    // Leave the alternate screen before writing to stderr.
    drop(mode);

    match result {
        Ok(()) => 0,
        Err(err) => {
            print_run_error(Some(program), session.program(), &err);
            EXIT_RUN
        }
    }
}

fn main() {
    let program = env::args().next().unwrap_or_else(|| String::from("bfi"));

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.kind() == clap::error::ErrorKind::UnknownArgument {
                eprintln!("{program}: Too many arguments");
            } else {
                eprintln!("{program}: {err}");
            }
            usage_and_exit(&program, EXIT_USAGE);
        }
    };

    // Help wins over everything else and runs nothing.
    if cli.help {
        print!("{}", usage(&program));
        let _ = io::stdout().flush();
        process::exit(EXIT_HELP);
    }

    let Some(path) = cli.file else {
        eprintln!("{program}: missing program file");
        usage_and_exit(&program, EXIT_USAGE);
    };

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{program}: Cannot open file: {}: {e}", path.display());
            let _ = io::stderr().flush();
            process::exit(EXIT_FILE);
        }
    };

    let code = if cli.debug {
        run_visual(&program, bytes)
    } else {
        run_headless(&program, bytes)
    };

    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_debug_flag_and_file() {
        let cli = Cli::try_parse_from(["bfi", "--debug", "hello.bf"]).unwrap();
        assert!(cli.debug);
        assert!(!cli.help);
        assert_eq!(cli.file, Some(PathBuf::from("hello.bf")));

        let cli = Cli::try_parse_from(["bfi", "-d", "hello.bf"]).unwrap();
        assert!(cli.debug);
    }

    #[test]
    fn rejects_a_second_positional_argument() {
        let err = Cli::try_parse_from(["bfi", "one.bf", "two.bf"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn usage_names_the_invoked_binary() {
        let text = usage("bfi");
        assert!(text.contains("bfi [--debug|-d] [file]"));
    }
}
