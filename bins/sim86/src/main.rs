mod config;
mod listing;
mod trace;

use clap::Parser;
use config::{Args, Config};
use listing::Listing;
use sim86_emulator::{Cpu, Memory};
use std::process::ExitCode;
use tracing::info;

fn disassemble(data: &[u8], args: &Args) -> ExitCode {
    let listing = Listing::decode(data);
    print!("{}", listing.render(args.labels));

    match listing.error {
        Some(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

fn execute(data: &[u8], args: &Args, config: &Config) -> ExitCode {
    let memory = match Memory::new(config.memory_size, config.address_bits) {
        Ok(memory) => memory,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut cpu = Cpu::new(memory);
    if let Err(err) = cpu.load_program(data) {
        eprintln!("error: {}", err);
        return ExitCode::FAILURE;
    }
    config.apply_registers(&mut cpu.state);

    let mut status = ExitCode::SUCCESS;
    loop {
        let before = cpu.state;
        match cpu.step() {
            Ok(Some(instruction)) => {
                if args.show {
                    println!("{}", trace::trace_line(&instruction, &before, &cpu.state));
                }
            }
            Ok(None) => break,
            Err(err) => {
                eprintln!("error: {}", err);
                status = ExitCode::FAILURE;
                break;
            }
        }
    }

    println!();
    println!("Final registers:");
    println!("{}", cpu.state);

    if let Some(path) = &args.dump {
        info!("Writing memory to: {}", path.display());
        if let Err(err) = std::fs::write(path, cpu.memory.as_slice()) {
            eprintln!("error: Could not write memory dump. ({}) ({})", path.display(), err);
            status = ExitCode::FAILURE;
        }
    }

    status
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.log_level())
        .init();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let data = match std::fs::read(&args.file) {
        Ok(data) => data,
        Err(err) => {
            eprintln!(
                "error: Could not read input file. ({}) ({})",
                args.file.display(),
                err
            );
            return ExitCode::FAILURE;
        }
    };

    info!("Read {} bytes from: {}", data.len(), args.file.display());

    if args.exec {
        execute(&data, &args, &config)
    } else {
        disassemble(&data, &args)
    }
}
