mod terminal;

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use log::info;
use vip8_core::{
    Chip8Interpreter, FaultPolicy, RunSummary, Runner, RunnerConfig, DEFAULT_CLOCK_HZ,
    DEFAULT_TIMER_HZ,
};

use crate::terminal::{TerminalBell, TerminalDisplay, TerminalKeyboard};

/// Run a CHIP-8 program in the terminal.
///
/// Keys 1-4, q-r, a-f and z-v form the hex keypad. Esc quits, F5 restarts.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Program image, loaded at 0x200
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_CLOCK_HZ)]
    clock_hz: u32,

    /// Delay and sound timer rate
    #[arg(long, default_value_t = DEFAULT_TIMER_HZ)]
    timer_hz: u32,

    /// Step over faulting instructions instead of stopping
    #[arg(long, default_value_t = false)]
    skip_faults: bool,

    /// Seed for the random number instruction
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Write logs here (RUST_LOG sets the level, default info)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    // raw mode owns the terminal, so logs only ever go to a file
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(args: &Args) -> vip8_core::Result<RunSummary> {
    let mut interpreter = match args.seed {
        Some(seed) => Chip8Interpreter::with_seed(seed),
        None => Chip8Interpreter::new(),
    };
    interpreter.load_file(&args.rom)?;

    let config = RunnerConfig {
        clock_hz: args.clock_hz,
        timer_hz: args.timer_hz,
        fault_policy: if args.skip_faults {
            FaultPolicy::Skip
        } else {
            FaultPolicy::Halt
        },
        max_cycles: None,
    };

    let keyboard = TerminalKeyboard::new()?;
    let display = TerminalDisplay::new()?;
    let mut runner = Runner::new(config, interpreter, display, keyboard, TerminalBell);
    runner.run()
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_logging(args.log_file.as_deref()) {
        eprintln!("vip8: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(summary) => {
            info!(
                "stopped after {} cycles ({:?}, {} faults skipped)",
                summary.cycles, summary.exit, summary.faults_skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("vip8: {err}");
            ExitCode::FAILURE
        }
    }
}
