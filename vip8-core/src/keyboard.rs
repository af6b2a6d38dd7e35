use std::{io, time::Duration};

pub const KEY_COUNT: usize = 16;

/// Live state of the 16-key hex keypad, addressed 0x0-0xF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Only the low nibble of `key` is used.
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keys[(key & 0xF) as usize] = pressed;
    }

    /// Highest-numbered key currently held.
    pub fn last_key_pressed(&self) -> Option<u8> {
        self.keys.iter().rposition(|pressed| *pressed).map(|key| key as u8)
    }
}

/// What the host asks of the run loop after polling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Continue,
    Reset,
    Quit,
}

/// Input collaborator: maps physical keys onto the keypad.
pub trait Keyboard {
    /// Refreshes `keypad`, waiting at most `budget` for new input.
    fn update_keystates(&mut self, keypad: &mut Keypad, budget: Duration)
        -> io::Result<HostCommand>;
}
