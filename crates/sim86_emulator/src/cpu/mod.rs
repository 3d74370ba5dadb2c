mod address;
mod executor;
mod sink;
mod state;

pub use address::{default_segment, effective_offset, physical_address, resolve};
pub use executor::{execute, ExecuteResult};
pub use sink::{Location, MemoryCell, OperandSink};
pub use state::{Flags, State};

use crate::error::{Error, Result};
use crate::memory::Memory;
use sim86_decoder::decode_instruction;
use sim86_instruction::{Address, Instruction, Register};
use tracing::{debug, info};

/// Largest program `ip` can run to the end of.  The run is over once `ip` reaches the end of the
/// code, which a 16-bit `ip` can only do for programs below 64 KiB.
pub const MAX_PROGRAM_SIZE: usize = u16::MAX as usize;

/// An 8086 that runs a program loaded at the bottom of its memory.
///
/// `ip` indexes the loaded code directly.  The run is over once the processor halts, `ip` moves
/// past the end of the code, or an instruction fails to decode or execute.
pub struct Cpu {
    pub state: State,
    pub memory: Memory,
    code_end: usize,
    halted: bool,
}

impl Cpu {
    pub fn new(memory: Memory) -> Self {
        Self {
            state: State::default(),
            memory,
            code_end: 0,
            halted: false,
        }
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                capacity: MAX_PROGRAM_SIZE,
            });
        }

        self.memory.load(program)?;

        info!("Loaded {} bytes of code", program.len());

        self.code_end = program.len();
        self.halted = false;
        self.state.set_ip(0);

        Ok(())
    }

    pub fn code_end(&self) -> usize {
        self.code_end
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_finished(&self) -> bool {
        self.halted || self.state.ip() as usize >= self.code_end
    }

    /// Decode the instruction at `ip` without executing it.
    pub fn fetch(&self) -> Result<Instruction> {
        let code = &self.memory.as_slice()[..self.code_end];
        Ok(decode_instruction(code, self.state.ip() as usize)?)
    }

    /// Execute a single instruction.  Returns `None` once the run is over.
    pub fn step(&mut self) -> Result<Option<Instruction>> {
        if self.is_finished() {
            return Ok(None);
        }

        match self.try_step() {
            Ok(instruction) => Ok(Some(instruction)),
            Err(err) => {
                self.halted = true;
                Err(err)
            }
        }
    }

    fn try_step(&mut self) -> Result<Instruction> {
        let at = self.state.ip();
        let instruction = self.fetch()?;

        debug!(
            "{} {}",
            Address::new(self.state.register(Register::CS), at),
            instruction
        );

        // Relative jumps are taken from the end of the instruction.
        self.state.set_ip(at.wrapping_add(instruction.size as u16));

        if execute(self, &instruction)? == ExecuteResult::Stop {
            info!("Halted at {:04X}", at);
            self.halted = true;
        }

        Ok(instruction)
    }

    /// Run until the program is over, returning the number of executed instructions.
    pub fn run(&mut self) -> Result<usize> {
        let mut count = 0;
        while self.step()?.is_some() {
            count += 1;
        }
        Ok(count)
    }
}
