//! Executes decoded 8086 instructions against a register file and a flat, masked memory.

mod cpu;
mod error;
mod memory;

pub use cpu::{
    default_segment, effective_offset, execute, physical_address, resolve, Cpu, ExecuteResult,
    Flags, Location, MemoryCell, OperandSink, State, MAX_PROGRAM_SIZE,
};
pub use error::{Error, Result};
pub use memory::{Memory, DEFAULT_ADDRESS_BITS, DEFAULT_MEMORY_SIZE};
