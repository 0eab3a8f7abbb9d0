//! The session driver: owns the loaded program and the engine, and runs the
//! fetch-execute loop against an [`ExecMode`].
//!
//! The driver is written once against the mode trait and never learns which
//! variant is active; headless stdio and the terminal visualizer both plug
//! in here.

use std::io::{self, Read, Write};

use crate::engine::{check_brackets, Engine, RunError, Snapshot, StepOutcome};

/// The capability set a running program needs from its environment: an
/// output sink, an input source, and the hooks the debugger rides on.
pub trait ExecMode {
    /// `.` routed one byte here.
    fn emit(&mut self, byte: u8) -> io::Result<()>;

    /// `,` blocks here for one byte. The snapshot lets a visual mode paint
    /// current state before it waits on the keyboard.
    fn read_byte(&mut self, snapshot: &Snapshot) -> io::Result<u8>;

    /// Called after every executed (non-comment) instruction.
    fn pause(&mut self, _snapshot: &Snapshot) -> io::Result<()> {
        Ok(())
    }

    /// Called once when the program counter reaches the end of the program.
    fn finished(&mut self, _snapshot: &Snapshot) -> io::Result<()> {
        Ok(())
    }
}

/// Plain stdio execution: raw bytes out, blocking single-byte reads in,
/// no pauses.
pub struct Headless;

impl Headless {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Headless {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecMode for Headless {
    fn emit(&mut self, byte: u8) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&[byte])?;
        stdout.flush()
    }

    fn read_byte(&mut self, _snapshot: &Snapshot) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        match io::stdin().lock().read(&mut buf)? {
            // EOF stores 0, the usual Brainfuck convention.
            0 => Ok(0),
            _ => Ok(buf[0]),
        }
    }
}

/// One full run of a loaded program, from load to natural completion.
pub struct Session {
    program: Vec<u8>,
    engine: Engine,
}

impl Session {
    pub fn new(program: Vec<u8>) -> Self {
        Self {
            program,
            engine: Engine::new(),
        }
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    /// Run to completion. Brackets are balance-checked up front so a
    /// malformed program fails before any instruction executes.
    pub fn run<M: ExecMode>(&mut self, mode: &mut M) -> Result<(), RunError> {
        check_brackets(&self.program)?;

        while !self.engine.finished(&self.program) {
            let ip = self.engine.pc();
            let outcome = self.engine.step(&self.program)?;

            match outcome {
                StepOutcome::Emit(byte) => {
                    mode.emit(byte).map_err(|source| RunError::Io { ip, source })?;
                }
                StepOutcome::AwaitInput => {
                    let byte = mode
                        .read_byte(&self.engine.snapshot(&self.program))
                        .map_err(|source| RunError::Io { ip, source })?;
                    self.engine.store_input(byte);
                }
                StepOutcome::Ran | StepOutcome::Comment => {}
            }

            // Comment bytes advance the program counter but are not
            // instructions; the debugger does not stop on them.
            if outcome != StepOutcome::Comment {
                mode.pause(&self.engine.snapshot(&self.program))
                    .map_err(|source| RunError::Io { ip, source })?;
            }
        }

        let ip = self.engine.pc();
        mode.finished(&self.engine.snapshot(&self.program))
            .map_err(|source| RunError::Io { ip, source })?;
        Ok(())
    }
}
