use std::{io, path::PathBuf};

use thiserror::Error;

use crate::state::MAX_PROGRAM_SIZE;

/// Everything that can stop a cycle or keep a program from starting.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("call stack overflow at {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("return with an empty call stack at {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of range at {address:#06X}")]
    MemoryOutOfRange { address: usize },

    #[error("could not load program: {0}")]
    ProgramLoad(#[from] LoadError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program image is empty")]
    Empty,

    #[error("program image is {len} bytes, at most {max} fit in memory", max = MAX_PROGRAM_SIZE)]
    TooLarge { len: usize },

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
