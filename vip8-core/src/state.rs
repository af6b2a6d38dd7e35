use crate::{
    display::Framebuffer,
    error::{Error, LoadError, Result},
    keyboard::Keypad,
};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const STACK_DEPTH: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;
pub const FONT_GLYPH_SIZE: u16 = 5;

const FONT: [u8; 16 * FONT_GLYPH_SIZE as usize] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Registers, memory, stack, timers and I/O buffers of one machine.
#[derive(Debug, Clone)]
pub struct Chip8State {
    pub ram: [u8; MEMORY_SIZE],
    pub data_registers: [u8; 16],
    pub index_register: u16,
    pub program_counter: u16,
    pub stack: [u16; STACK_DEPTH],
    pub stack_pointer: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keypad: Keypad,
    pub framebuffer: Framebuffer,
    pub draw_flag: bool,
}

impl Default for Chip8State {
    fn default() -> Self {
        let mut state = Self {
            ram: [0; MEMORY_SIZE],
            data_registers: [0; 16],
            index_register: 0,
            program_counter: PROGRAM_START,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::default(),
            framebuffer: Framebuffer::default(),
            draw_flag: false,
        };
        state.load_font_data(&FONT);
        state
    }
}

impl Chip8State {
    pub fn load_font_data(&mut self, fonts: &[u8]) {
        self.ram[..fonts.len()].copy_from_slice(fonts);
    }

    /// Copies a program image to 0x200. Nothing is written if it doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.is_empty() {
            return Err(LoadError::Empty);
        }
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                len: program.len(),
            });
        }
        let start = PROGRAM_START as usize;
        self.ram[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.data_registers[register_index as usize]
    }

    pub fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        &mut self.data_registers[register_index as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        *self.register_mut(FLAG_REGISTER) = flag as u8;
    }

    /// Reads the big-endian opcode word at the program counter.
    pub fn fetch(&self) -> Result<u16> {
        let bytes = self.memory(self.program_counter, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn memory(&self, address: u16, len: usize) -> Result<&[u8]> {
        let range = Self::checked_range(address, len)?;
        Ok(&self.ram[range])
    }

    pub fn memory_mut(&mut self, address: u16, len: usize) -> Result<&mut [u8]> {
        let range = Self::checked_range(address, len)?;
        Ok(&mut self.ram[range])
    }

    fn checked_range(address: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = address as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Error::MemoryOutOfRange {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }

    pub fn push_return_address(&mut self, address: u16) -> Result<()> {
        let slot = self.stack_pointer as usize;
        if slot >= STACK_DEPTH {
            return Err(Error::StackOverflow {
                pc: self.program_counter,
            });
        }
        self.stack[slot] = address;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop_return_address(&mut self) -> Result<u16> {
        if self.stack_pointer == 0 {
            return Err(Error::StackUnderflow {
                pc: self.program_counter,
            });
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer as usize])
    }

    /// One 60 Hz timer step. Returns true when the sound timer goes from 1
    /// to 0, which is when the tone plays.
    pub fn advance_timers(&mut self) -> bool {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        match self.sound_timer {
            0 => false,
            remaining => {
                self.sound_timer = remaining - 1;
                remaining == 1
            }
        }
    }

    /// Hands the changed-since-last-read flag to the renderer and clears it.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::take(&mut self.draw_flag)
    }
}
