use std::{
    thread,
    time::{Duration, Instant},
};

use log::{error, info, warn};

use crate::{
    beeper::Beeper,
    display::Display,
    error::{Error, LoadError, Result},
    interpreter::Chip8Interpreter,
    keyboard::{HostCommand, Keyboard},
    timer::DEFAULT_TIMER_HZ,
};

pub const DEFAULT_CLOCK_HZ: u32 = 700;

/// Falling more than this far behind schedule drops the backlog instead of
/// running a burst of catch-up cycles.
const MAX_LAG: Duration = Duration::from_millis(100);

/// What the run loop does with a failing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Stop and return the error.
    #[default]
    Halt,
    /// Log the error and carry on with the next instruction.
    Skip,
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Instructions per second.
    pub clock_hz: u32,
    pub timer_hz: u32,
    pub fault_policy: FaultPolicy,
    /// Stop after this many cycles. Unbounded when `None`.
    pub max_cycles: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            timer_hz: DEFAULT_TIMER_HZ,
            fault_policy: FaultPolicy::Halt,
            max_cycles: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    CycleLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub exit: Exit,
    pub cycles: u64,
    pub faults_skipped: u64,
}

/// Drives an interpreter against a display, keyboard and beeper at a fixed
/// instruction rate, with timers decaying on wall time.
pub struct Runner<D: Display, K: Keyboard, B: Beeper> {
    pub config: RunnerConfig,
    pub interpreter: Chip8Interpreter,
    pub display: D,
    pub keyboard: K,
    pub beeper: B,
}

impl<D: Display, K: Keyboard, B: Beeper> Runner<D, K, B> {
    pub fn new(
        config: RunnerConfig,
        interpreter: Chip8Interpreter,
        display: D,
        keyboard: K,
        beeper: B,
    ) -> Self {
        let interpreter = interpreter.with_timer_hz(config.timer_hz);
        Self {
            config,
            interpreter,
            display,
            keyboard,
            beeper,
        }
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        if self.interpreter.program().is_empty() {
            return Err(LoadError::Empty.into());
        }

        let cycle_time = Duration::from_secs(1) / self.config.clock_hz.max(1);
        let mut summary = RunSummary {
            exit: Exit::Quit,
            cycles: 0,
            faults_skipped: 0,
        };

        info!(
            "running {} byte program at {} Hz",
            self.interpreter.program().len(),
            self.config.clock_hz
        );
        self.display.present(&self.interpreter.state.framebuffer)?;

        let mut last_timer_update = Instant::now();
        let mut next_cycle = Instant::now() + cycle_time;

        loop {
            if let Some(max_cycles) = self.config.max_cycles {
                if summary.cycles >= max_cycles {
                    summary.exit = Exit::CycleLimit;
                    return Ok(summary);
                }
            }

            if let Err(fault) = self.interpreter.step() {
                self.handle_fault(fault)?;
                summary.faults_skipped += 1;
            }
            summary.cycles += 1;

            let now = Instant::now();
            if self.interpreter.tick(now - last_timer_update) {
                self.beeper.tone()?;
            }
            last_timer_update = now;

            if self.interpreter.state.take_draw_flag() {
                self.display.present(&self.interpreter.state.framebuffer)?;
            }

            let budget = next_cycle.saturating_duration_since(Instant::now());
            let command = self
                .keyboard
                .update_keystates(&mut self.interpreter.state.keypad, budget)?;

            match command {
                HostCommand::Continue => {}
                HostCommand::Reset => {
                    info!("reset requested");
                    self.interpreter.reset()?;
                    self.display.present(&self.interpreter.state.framebuffer)?;
                }
                HostCommand::Quit => {
                    summary.exit = Exit::Quit;
                    return Ok(summary);
                }
            }

            let now = Instant::now();
            if next_cycle > now {
                thread::sleep(next_cycle - now);
            } else if now - next_cycle > MAX_LAG {
                next_cycle = now;
            }
            next_cycle += cycle_time;
        }
    }

    fn handle_fault(&mut self, fault: Error) -> Result<()> {
        match self.config.fault_policy {
            FaultPolicy::Halt => {
                error!("halting: {fault}");
                Err(fault)
            }
            FaultPolicy::Skip => {
                warn!("skipping faulting instruction: {fault}");
                self.interpreter.skip_instruction();
                Ok(())
            }
        }
    }
}
