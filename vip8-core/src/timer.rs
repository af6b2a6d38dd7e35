use std::time::Duration;

pub const DEFAULT_TIMER_HZ: u32 = 60;
const MAX_TIMER_HZ: u32 = 1_000_000;

/// Turns elapsed wall time into whole timer ticks, carrying the remainder
/// into the next call. Keeps delay/sound timer decay independent of how many
/// instructions run per second.
#[derive(Debug, Clone)]
pub struct TimerClock {
    interval: Duration,
    pending: Duration,
}

impl Default for TimerClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMER_HZ)
    }
}

impl TimerClock {
    pub fn new(frequency_hz: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / frequency_hz.clamp(1, MAX_TIMER_HZ),
            pending: Duration::ZERO,
        }
    }

    /// Ticks due after `elapsed` more time. A backlog beyond `u32::MAX` ticks
    /// is dropped along with its remainder.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending = self.pending.saturating_add(elapsed);
        let due = self.pending.as_nanos() / self.interval.as_nanos();
        match u32::try_from(due) {
            Ok(ticks) => {
                self.pending -= self.interval * ticks;
                ticks
            }
            Err(_) => {
                self.pending = Duration::ZERO;
                u32::MAX
            }
        }
    }

    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }
}
