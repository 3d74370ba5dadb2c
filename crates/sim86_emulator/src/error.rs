use sim86_decoder::DecodeError;
use sim86_instruction::{Instruction, Register};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Could not decode instruction! {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid register access ({register:?}, offset {offset}, width {width})")]
    InvalidRegisterAccess {
        register: Register,
        offset: u8,
        width: u8,
    },

    #[error("Memory access out of bounds! ({address:05X})")]
    OutOfBoundsMemoryAccess { address: u32 },

    #[error("Program of {size} bytes does not fit into {capacity} bytes of memory")]
    ProgramTooLarge { size: usize, capacity: usize },

    #[error("Invalid memory configuration ({size} bytes, {address_bits} address bits)")]
    InvalidMemoryConfiguration { size: usize, address_bits: u32 },

    #[error("Illegal operands! {0:?}")]
    IllegalOperands(Instruction),
}

pub type Result<T> = std::result::Result<T, Error>;
