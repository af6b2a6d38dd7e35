use super::Next;
use crate::{
    error::Result,
    state::{Chip8State, FONT_GLYPH_SIZE},
};

const INDEX_LIMIT: u32 = 0xFFF;

pub fn read_delay_timer(state: &mut Chip8State, x: u8) -> Next {
    *state.register_mut(x) = state.delay_timer;
    Next::Advance
}

pub fn set_delay_timer(state: &mut Chip8State, x: u8) -> Next {
    state.delay_timer = state.register(x);
    Next::Advance
}

pub fn set_sound_timer(state: &mut Chip8State, x: u8) -> Next {
    state.sound_timer = state.register(x);
    Next::Advance
}

/// `Fx0A` holds the program counter until a key is down, so the host keeps
/// re-running it every cycle.
pub fn wait_for_key(state: &mut Chip8State, x: u8) -> Next {
    match state.keypad.last_key_pressed() {
        Some(key) => {
            *state.register_mut(x) = key;
            Next::Advance
        }
        None => Next::Stay,
    }
}

pub fn add_to_index(state: &mut Chip8State, x: u8) -> Next {
    let sum = state.index_register as u32 + state.register(x) as u32;
    state.index_register = sum as u16;
    state.set_flag(sum > INDEX_LIMIT);
    Next::Advance
}

pub fn font_glyph(state: &mut Chip8State, x: u8) -> Next {
    state.index_register = FONT_GLYPH_SIZE * state.register(x) as u16;
    Next::Advance
}

pub fn store_bcd(state: &mut Chip8State, x: u8) -> Result<Next> {
    let value = state.register(x);
    state
        .memory_mut(state.index_register, 3)?
        .copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
    Ok(Next::Advance)
}

/// `Fx55`: `I` is left pointing just past the stored block, as the COSMAC
/// VIP interpreter does.
pub fn store_registers(state: &mut Chip8State, x: u8) -> Result<Next> {
    let count = x as usize + 1;
    let registers = state.data_registers;
    state
        .memory_mut(state.index_register, count)?
        .copy_from_slice(&registers[..count]);
    state.index_register = state.index_register.wrapping_add(count as u16);
    Ok(Next::Advance)
}

pub fn load_registers(state: &mut Chip8State, x: u8) -> Result<Next> {
    let count = x as usize + 1;
    let mut loaded = [0u8; 16];
    loaded[..count].copy_from_slice(state.memory(state.index_register, count)?);
    state.data_registers[..count].copy_from_slice(&loaded[..count]);
    state.index_register = state.index_register.wrapping_add(count as u16);
    Ok(Next::Advance)
}
