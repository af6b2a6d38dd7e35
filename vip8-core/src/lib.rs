//! CHIP-8 virtual machine: machine state, opcode decoder, instruction
//! handlers and a fixed-rate timer clock, plus the seams a host implements
//! to put the machine on a screen.

mod beeper;
mod display;
mod error;
mod instruction;
mod interpreter;
mod keyboard;
mod ops;
mod runner;
mod state;
mod timer;

pub use beeper::{Beeper, Silent};
pub use display::{Display, Framebuffer, HEIGHT, WIDTH};
pub use error::{Error, LoadError, Result};
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, Cycle};
pub use keyboard::{HostCommand, Keyboard, Keypad, KEY_COUNT};
pub use runner::{Exit, FaultPolicy, RunSummary, Runner, RunnerConfig, DEFAULT_CLOCK_HZ};
pub use state::{
    Chip8State, FLAG_REGISTER, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, STACK_DEPTH,
};
pub use timer::{TimerClock, DEFAULT_TIMER_HZ};
