//! LC-3 VM - CLI Entry Point
//!
//! `lc3-vm <image>...` loads each image in order and runs from 0x3000
//! until the program halts.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use lc3::{IoBridge, PipeIo, Registers, StdIo, Vm, VmError};

const EXIT_BOOT_FAILED: u8 = 3;
const EXIT_LOAD_FAILED: u8 = 4;
const EXIT_FAULT: u8 = 5;
const EXIT_IO: u8 = 6;
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "lc3-vm")]
#[command(version)]
#[command(about = "An emulator for the LC-3 16-bit educational computer")]
struct Cli {
    /// Program images to load, in order. Later images overwrite earlier ones.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Log every executed instruction
    #[arg(short, long)]
    trace: bool,

    /// Print the registers as JSON on stderr when execution stops
    #[arg(long)]
    dump_registers: bool,

    /// Leave the terminal in line-buffered mode
    #[arg(long)]
    no_raw: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let raw = cfg!(feature = "terminal") && !cli.no_raw && io::stdin().is_terminal();
    init_logging(cli.trace, raw);

    // Images are loaded before the console is attached, so load errors are
    // reported with the terminal still in cooked mode.
    let mut vm = Vm::new(PipeIo::new());
    if let Err(e) = vm.load_image_files(cli.images.as_slice()) {
        eprintln!("Load failed: {}", e);
        return ExitCode::from(EXIT_LOAD_FAILED);
    }

    if raw {
        return run_in_terminal(&cli, vm);
    }
    run(&cli, vm.swap_bridge(StdIo::new()).0)
}

fn init_logging(trace: bool, raw: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if trace {
        builder.filter_module("lc3", LevelFilter::Trace);
    }
    if raw {
        // Raw mode turns off output processing, so a bare \n does not return
        // the cursor.
        builder.format(|buf, record| {
            write!(buf, "[{} {}] {}\r\n", record.level(), record.target(), record.args())
        });
    }
    builder.init();
}

#[cfg(feature = "terminal")]
fn run_in_terminal(cli: &Cli, vm: Vm<PipeIo>) -> ExitCode {
    match lc3::TerminalIo::new() {
        Ok(terminal) => run(cli, vm.swap_bridge(terminal).0),
        Err(e) => {
            eprintln!("Boot failed: cannot set up terminal: {}", e);
            ExitCode::from(EXIT_BOOT_FAILED)
        }
    }
}

#[cfg(not(feature = "terminal"))]
fn run_in_terminal(cli: &Cli, vm: Vm<PipeIo>) -> ExitCode {
    run(cli, vm.swap_bridge(StdIo::new()).0)
}

fn run<B: IoBridge>(cli: &Cli, mut vm: Vm<B>) -> ExitCode {
    let result = vm.run();
    let regs = vm.regs.clone();
    // Dropping the VM drops the bridge, which restores the terminal.
    drop(vm);

    if cli.dump_registers {
        dump_registers(&regs);
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(VmError::Io(e)) if e.kind() == io::ErrorKind::Interrupted => {
            eprintln!();
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e @ VmError::UnknownOpcode { .. }) => {
            eprintln!("Fatal: {}", e);
            ExitCode::from(EXIT_FAULT)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_IO)
        }
    }
}

fn dump_registers(regs: &Registers) {
    match serde_json::to_string_pretty(regs) {
        Ok(json) => eprintln!("{}", json),
        Err(e) => eprintln!("failed to serialize registers: {}", e),
    }
}
