//! The tape engine: cell memory, pointers, and single-instruction dispatch.
//!
//! The engine owns the growable tape and both pointers (cell pointer and
//! program counter) but not the program itself; the program is an immutable
//! byte slice passed into each [`Engine::step`] call. I/O never happens
//! here: `.` and `,` surface as [`StepOutcome`] events for the session
//! driver to route through whichever execution mode is active.

use std::fmt;

/// Errors that can occur while running a program.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A bracket has no counterpart; a jump scan would have left the
    /// program's byte range.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    MalformedProgram { ip: usize, kind: BracketKind },

    /// An underlying I/O error while emitting output or reading input.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Which side of a loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

/// What a single step did, from the driver's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction ran and only touched tape or pointers.
    Ran,
    /// `.` produced one output byte.
    Emit(u8),
    /// `,` wants one input byte, delivered via [`Engine::store_input`].
    AwaitInput,
    /// The byte was not an instruction; it was skipped as a comment.
    Comment,
}

/// A read-only view of execution state at one instant, handed to the debug
/// visualizer after each executed instruction and dropped right after.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub program: &'a [u8],
    /// Index of the next instruction to execute.
    pub pc: usize,
    pub cells: &'a [u8],
    pub cell_ptr: usize,
}

/// The tape machine: a growable array of wrapping 8-bit cells, the index of
/// the active cell, and the program counter.
pub struct Engine {
    cells: Vec<u8>,
    cell_ptr: usize,
    pc: usize,
}

impl Engine {
    /// Four zeroed cells to start with; the tape grows on demand.
    pub fn new() -> Self {
        Self {
            cells: vec![0; 4],
            cell_ptr: 0,
            pc: 0,
        }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn cell_ptr(&self) -> usize {
        self.cell_ptr
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    /// True once the program counter has run off the end of `program`.
    pub fn finished(&self, program: &[u8]) -> bool {
        self.pc >= program.len()
    }

    pub fn snapshot<'a>(&'a self, program: &'a [u8]) -> Snapshot<'a> {
        Snapshot {
            program,
            pc: self.pc,
            cells: &self.cells,
            cell_ptr: self.cell_ptr,
        }
    }

    /// Store the byte read for a pending `,` into the active cell.
    pub fn store_input(&mut self, byte: u8) {
        self.cells[self.cell_ptr] = byte;
    }

    /// Execute the instruction under the program counter and advance it.
    ///
    /// Every branch leaves `pc` one past the instruction it dispatched on,
    /// except the jumps: a forward jump lands one past the matching `]`, a
    /// backward jump lands one past the matching `[` so execution resumes
    /// at the loop body.
    pub fn step(&mut self, program: &[u8]) -> Result<StepOutcome, RunError> {
        let ip = self.pc;
        let outcome = match program[ip] {
            b'+' => {
                self.cells[self.cell_ptr] = self.cells[self.cell_ptr].wrapping_add(1);
                StepOutcome::Ran
            }
            b'-' => {
                self.cells[self.cell_ptr] = self.cells[self.cell_ptr].wrapping_sub(1);
                StepOutcome::Ran
            }
            b'>' => {
                self.cell_ptr += 1;
                if self.cell_ptr == self.cells.len() {
                    self.cells.push(0);
                }
                StepOutcome::Ran
            }
            b'<' => {
                // Clamped at cell 0; moving further left is a no-op.
                if self.cell_ptr > 0 {
                    self.cell_ptr -= 1;
                }
                StepOutcome::Ran
            }
            b'.' => StepOutcome::Emit(self.cells[self.cell_ptr]),
            b',' => StepOutcome::AwaitInput,
            b'[' => {
                if self.cells[self.cell_ptr] == 0 {
                    self.pc = seek_forward(program, ip)?;
                }
                StepOutcome::Ran
            }
            b']' => {
                if self.cells[self.cell_ptr] != 0 {
                    self.pc = seek_backward(program, ip)?;
                }
                StepOutcome::Ran
            }
            _ => StepOutcome::Comment,
        };
        self.pc += 1;
        Ok(outcome)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject a program whose brackets do not pair up, before running any of it.
///
/// A lone `]` over a zero cell would otherwise execute to completion without
/// ever scanning, so jump-time checks alone cannot catch every unmatched
/// bracket.
pub fn check_brackets(program: &[u8]) -> Result<(), RunError> {
    let mut stack: Vec<usize> = Vec::new();
    for (i, &b) in program.iter().enumerate() {
        match b {
            b'[' => stack.push(i),
            b']' => {
                if stack.pop().is_none() {
                    return Err(RunError::MalformedProgram {
                        ip: i,
                        kind: BracketKind::Close,
                    });
                }
            }
            _ => {}
        }
    }
    if let Some(&ip) = stack.last() {
        return Err(RunError::MalformedProgram {
            ip,
            kind: BracketKind::Open,
        });
    }
    Ok(())
}

/// Index of the `]` matching the `[` at `from`, counting nesting depth.
fn seek_forward(program: &[u8], from: usize) -> Result<usize, RunError> {
    let mut depth = 0usize;
    let mut i = from;
    loop {
        i += 1;
        match program.get(i).copied() {
            None => {
                return Err(RunError::MalformedProgram {
                    ip: from,
                    kind: BracketKind::Open,
                });
            }
            Some(b'[') => depth += 1,
            Some(b']') => {
                if depth == 0 {
                    return Ok(i);
                }
                depth -= 1;
            }
            Some(_) => {}
        }
    }
}

/// Index of the `[` matching the `]` at `from`; symmetric with the forward
/// scan.
fn seek_backward(program: &[u8], from: usize) -> Result<usize, RunError> {
    let mut depth = 0usize;
    let mut i = from;
    loop {
        if i == 0 {
            return Err(RunError::MalformedProgram {
                ip: from,
                kind: BracketKind::Close,
            });
        }
        i -= 1;
        match program[i] {
            b']' => depth += 1,
            b'[' => {
                if depth == 0 {
                    return Ok(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
}
