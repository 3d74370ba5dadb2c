use clap::Parser;
use serde::Deserialize;
use sim86_emulator::{State, DEFAULT_ADDRESS_BITS, DEFAULT_MEMORY_SIZE};
use sim86_instruction::Register;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(
    name = "sim86",
    version,
    about = "Disassemble or simulate a raw 8086 instruction stream"
)]
pub struct Args {
    /// File holding the machine code.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Execute the program instead of disassembling it.
    #[arg(long, default_value_t = false)]
    pub exec: bool,

    /// Print the register and flag changes of every executed instruction.
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Name jump targets in the disassembly.
    #[arg(long, default_value_t = false)]
    pub labels: bool,

    /// Write the memory image to this file after execution.
    #[arg(long, value_name = "PATH")]
    pub dump: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log more, can be repeated.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InitialRegisters {
    pub cs: Option<u16>,
    pub ds: Option<u16>,
    pub ss: Option<u16>,
    pub es: Option<u16>,
    pub sp: Option<u16>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub memory_size: usize,
    pub address_bits: u32,
    pub registers: InitialRegisters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            address_bits: DEFAULT_ADDRESS_BITS,
            registers: InitialRegisters::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file. ({path}) ({1})", path = .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid config file. ({path}) ({1})", path = .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),
}

impl Config {
    pub fn parse(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|err| ConfigError::Parse(path.to_path_buf(), err))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse(&source, path)
    }

    /// The file given on the command line, otherwise `sim86/config.toml` in the user's config
    /// directory if there is one, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        match dirs::config_dir().map(|dir| dir.join("sim86").join("config.toml")) {
            Some(path) if path.is_file() => {
                info!("Loading config from: {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn apply_registers(&self, state: &mut State) {
        let registers = &self.registers;
        for (register, value) in [
            (Register::CS, registers.cs),
            (Register::DS, registers.ds),
            (Register::SS, registers.ss),
            (Register::ES, registers.es),
            (Register::SP, registers.sp),
        ] {
            if let Some(value) = value {
                state.set_register(register, value);
            }
        }
    }
}
