use std::{fs, path::Path, time::Duration};

use log::{debug, trace};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    error::{Error, LoadError, Result},
    instruction::Instruction,
    ops::{self, Next},
    state::{Chip8State, MEMORY_SIZE},
    timer::TimerClock,
};

/// Outcome of one successful fetch-decode-execute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Executed(Instruction),
    /// `Fx0A` found no key down; the program counter did not move.
    WaitingForKey,
}

#[derive(Debug)]
pub struct Chip8Interpreter {
    pub state: Chip8State,
    program: Vec<u8>,
    timers: TimerClock,
    rng: StdRng,
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Cxnn` draws from a generator seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: Chip8State::default(),
            program: vec![],
            timers: TimerClock::default(),
            rng,
        }
    }

    pub fn with_timer_hz(mut self, frequency_hz: u32) -> Self {
        self.timers = TimerClock::new(frequency_hz);
        self
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut interpreter = Self::new();
        interpreter.load_file(path)?;
        Ok(interpreter)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let program = fs::read(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_program(&program)
    }

    /// Starts a fresh machine with `program` at 0x200. On failure the
    /// current machine is left as it was.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let mut state = Chip8State::default();
        state.load_program(program)?;
        self.state = state;
        self.program = program.to_vec();
        self.timers.reset();
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Zeroes the machine, reseeds the font and reloads the program image.
    pub fn reset(&mut self) -> Result<()> {
        self.state = Chip8State::default();
        self.timers.reset();
        if !self.program.is_empty() {
            self.state.load_program(&self.program)?;
        }
        debug!("machine reset");
        Ok(())
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    /// Runs one instruction. A failing cycle leaves the machine untouched.
    pub fn step(&mut self) -> Result<Cycle> {
        let pc = self.state.program_counter;
        let opcode = self.state.fetch()?;
        let instruction =
            Instruction::decode(opcode).ok_or(Error::UnknownOpcode { opcode, pc })?;

        trace!("{pc:#05X}  {opcode:04X}  {instruction:?}");

        let next = ops::execute(&mut self.state, &mut self.rng, instruction)?;
        self.state.program_counter = match next {
            Next::Advance => pc.wrapping_add(2),
            Next::Skip => pc.wrapping_add(4),
            Next::Jump(address) => address,
            Next::Stay => return Ok(Cycle::WaitingForKey),
        };
        Ok(Cycle::Executed(instruction))
    }

    /// Moves past the instruction at the program counter without running it.
    pub fn skip_instruction(&mut self) {
        let pc = self.state.program_counter as usize;
        self.state.program_counter = ((pc + 2) % MEMORY_SIZE) as u16;
    }

    /// Advances the delay and sound timers by however many ticks fit in
    /// `elapsed`. Returns true if the tone should play.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let mut tone = false;
        for _ in 0..self.timers.advance(elapsed) {
            if self.state.delay_timer == 0 && self.state.sound_timer == 0 {
                break;
            }
            tone |= self.state.advance_timers();
        }
        tone
    }

    /// A single timer tick, for hosts that keep their own 60 Hz schedule.
    pub fn advance_timers(&mut self) -> bool {
        self.state.advance_timers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PROGRAM_START;

    #[test]
    fn load_then_step_advances_pc() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0x61, 0x2A, 0x62, 0x07])?;
        assert_eq!(
            interpreter.step()?,
            Cycle::Executed(Instruction::Load { x: 1, nn: 0x2A })
        );
        assert_eq!(interpreter.state.register(1), 0x2A);
        assert_eq!(interpreter.state.program_counter, PROGRAM_START + 2);
        Ok(())
    }

    #[test]
    fn unknown_opcode_reports_pc_and_mutates_nothing() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0x61, 0x05, 0x81, 0x28])?;
        interpreter.step()?;
        let before = interpreter.state.clone();

        let err = interpreter.step().unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownOpcode {
                opcode: 0x8128,
                pc: 0x202
            }
        ));
        assert_eq!(interpreter.state.data_registers, before.data_registers);
        assert_eq!(interpreter.state.program_counter, 0x202);
        Ok(())
    }

    #[test]
    fn skip_instruction_steps_over_fault() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0xFF, 0xFF, 0x63, 0x01])?;
        assert!(interpreter.step().is_err());
        interpreter.skip_instruction();
        interpreter.step()?;
        assert_eq!(interpreter.state.register(3), 1);
        Ok(())
    }

    #[test]
    fn skip_instruction_wraps_at_end_of_memory() {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.state.program_counter = 0xFFE;
        interpreter.skip_instruction();
        assert_eq!(interpreter.state.program_counter, 0);
    }

    #[test]
    fn waiting_for_key_keeps_pc() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0xF4, 0x0A])?;
        assert_eq!(interpreter.step()?, Cycle::WaitingForKey);
        assert_eq!(interpreter.step()?, Cycle::WaitingForKey);
        assert_eq!(interpreter.state.program_counter, PROGRAM_START);

        interpreter.state.keypad.set_key(0xC, true);
        interpreter.step()?;
        assert_eq!(interpreter.state.register(4), 0xC);
        assert_eq!(interpreter.state.program_counter, PROGRAM_START + 2);
        Ok(())
    }

    #[test]
    fn reset_reloads_program_and_clears_state() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0x6A, 0xFF, 0xA3, 0x21])?;
        interpreter.step()?;
        interpreter.step()?;
        interpreter.state.ram[0x200] = 0;

        interpreter.reset()?;
        assert_eq!(interpreter.state.register(0xA), 0);
        assert_eq!(interpreter.state.index_register, 0);
        assert_eq!(interpreter.state.program_counter, PROGRAM_START);
        assert_eq!(&interpreter.state.ram[0x200..0x204], &[0x6A, 0xFF, 0xA3, 0x21]);
        Ok(())
    }

    #[test]
    fn failed_load_keeps_running_program() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0x12, 0x00])?;
        assert!(matches!(
            interpreter.load_program(&[]),
            Err(Error::ProgramLoad(LoadError::Empty))
        ));
        assert_eq!(interpreter.program(), &[0x12, 0x00]);
        Ok(())
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = Chip8Interpreter::from_file("does/not/exist.ch8").unwrap_err();
        assert!(matches!(
            err,
            Error::ProgramLoad(LoadError::Unreadable { .. })
        ));
    }

    #[test]
    fn sound_timer_of_one_tones_on_next_tick() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0x60, 0x01, 0xF0, 0x18])?;
        interpreter.step()?;
        interpreter.step()?;
        assert_eq!(interpreter.state.sound_timer, 1);

        assert!(interpreter.advance_timers());
        assert_eq!(interpreter.state.sound_timer, 0);
        assert!(!interpreter.advance_timers());
        Ok(())
    }

    #[test]
    fn timers_decay_with_wall_time_not_cycles() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.load_program(&[0x60, 0x1E, 0xF0, 0x15, 0x12, 0x04])?;
        for _ in 0..1000 {
            interpreter.step()?;
        }
        assert_eq!(interpreter.state.delay_timer, 30);

        assert!(!interpreter.tick(Duration::from_millis(250)));
        assert_eq!(interpreter.state.delay_timer, 15);
        Ok(())
    }

    #[test]
    fn tick_reports_tone_once() -> Result<()> {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.state.sound_timer = 3;
        assert!(interpreter.tick(Duration::from_secs(1)));
        assert_eq!(interpreter.state.sound_timer, 0);
        assert!(!interpreter.tick(Duration::from_secs(1)));
        Ok(())
    }

    #[test]
    fn huge_elapsed_times_do_not_overflow() {
        let mut interpreter = Chip8Interpreter::with_seed(1);
        interpreter.state.delay_timer = 200;
        interpreter.tick(Duration::MAX);
        assert_eq!(interpreter.state.delay_timer, 0);
        interpreter.state.delay_timer = 5;
        interpreter.tick(Duration::from_secs(u64::MAX / 2));
        assert_eq!(interpreter.state.delay_timer, 0);
    }

    #[test]
    fn seeded_interpreters_agree_on_random() -> Result<()> {
        let program = [0xC0, 0xFF, 0xC1, 0xFF, 0xC2, 0xFF];
        let mut a = Chip8Interpreter::with_seed(99);
        let mut b = Chip8Interpreter::with_seed(99);
        a.load_program(&program)?;
        b.load_program(&program)?;
        for _ in 0..3 {
            a.step()?;
            b.step()?;
        }
        assert_eq!(a.state.data_registers, b.state.data_registers);
        Ok(())
    }
}
