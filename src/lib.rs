//! A Brainfuck interpreter with a step-through terminal debugger.
//!
//! The interpreter runs programs over a growable tape of wrapping 8-bit
//! cells (four cells to start, no upper bound). Behaviors worth knowing:
//! - Moving left of cell 0 is a no-op; moving right grows the tape.
//! - Input `,` reads a single byte; on EOF the current cell is set to 0.
//! - Output `.` emits the active cell's byte, raw.
//! - Any byte outside `><+-.,[]` is a comment and is skipped.
//! - Unmatched brackets are reported as errors before execution starts.
//!
//! In debug mode the session renders tape, output, and code panes after
//! every instruction and waits for a key press before the next one.
//!
//! Quick start:
//!
//! ```no_run
//! use bfi::{Headless, Session};
//!
//! // Prints '@' (eight times eight).
//! let code = b"++++++++[>++++++++<-]>.".to_vec();
//! let mut session = Session::new(code);
//! session.run(&mut Headless::new()).expect("program should run");
//! ```

pub mod cli_util;
pub mod config;
pub mod engine;
pub mod session;
pub mod tui;

pub use engine::{BracketKind, Engine, RunError, Snapshot, StepOutcome};
pub use session::{ExecMode, Headless, Session};
pub use tui::Visual;
