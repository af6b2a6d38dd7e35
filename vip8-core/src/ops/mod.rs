//! Opcode handlers. Each one is a state transition over [`Chip8State`] that
//! either fails before touching anything or reports how the program counter
//! moves next.

mod alu;
mod flow;
mod graphics;
mod io;

use rand::Rng;

use crate::{error::Result, instruction::Instruction, state::Chip8State};

/// Program counter update requested by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Move on to the following instruction (+2).
    Advance,
    /// Skip the following instruction (+4).
    Skip,
    Jump(u16),
    /// Re-execute the same instruction next cycle.
    Stay,
}

impl Next {
    fn skip_if(condition: bool) -> Self {
        if condition {
            Next::Skip
        } else {
            Next::Advance
        }
    }
}

pub fn execute<R: Rng>(
    state: &mut Chip8State,
    rng: &mut R,
    instruction: Instruction,
) -> Result<Next> {
    use Instruction::*;

    match instruction {
        ClearScreen => Ok(graphics::clear_screen(state)),
        Return => flow::return_from_subroutine(state),
        Jump { nnn } => Ok(Next::Jump(nnn)),
        Call { nnn } => flow::call(state, nnn),
        SkipIfEqual { x, nn } => Ok(Next::skip_if(state.register(x) == nn)),
        SkipIfNotEqual { x, nn } => Ok(Next::skip_if(state.register(x) != nn)),
        SkipIfRegistersEqual { x, y } => {
            Ok(Next::skip_if(state.register(x) == state.register(y)))
        }
        SkipIfRegistersNotEqual { x, y } => {
            Ok(Next::skip_if(state.register(x) != state.register(y)))
        }
        JumpOffset { nnn } => flow::jump_offset(state, nnn),

        Load { x, nn } => Ok(alu::load(state, x, nn)),
        AddImmediate { x, nn } => Ok(alu::add_immediate(state, x, nn)),
        Copy { x, y } => Ok(alu::copy(state, x, y)),
        Or { x, y } => Ok(alu::or(state, x, y)),
        And { x, y } => Ok(alu::and(state, x, y)),
        Xor { x, y } => Ok(alu::xor(state, x, y)),
        Add { x, y } => Ok(alu::add(state, x, y)),
        Sub { x, y } => Ok(alu::sub(state, x, y)),
        ShiftRight { x } => Ok(alu::shift_right(state, x)),
        SubReverse { x, y } => Ok(alu::sub_reverse(state, x, y)),
        ShiftLeft { x } => Ok(alu::shift_left(state, x)),
        SetIndex { nnn } => Ok(alu::set_index(state, nnn)),
        Random { x, nn } => Ok(alu::random(state, rng, x, nn)),

        Draw { x, y, n } => graphics::draw(state, x, y, n),

        SkipIfKey { x } => Ok(Next::skip_if(state.keypad.is_key_down(state.register(x)))),
        SkipIfNotKey { x } => Ok(Next::skip_if(!state.keypad.is_key_down(state.register(x)))),
        ReadDelayTimer { x } => Ok(io::read_delay_timer(state, x)),
        WaitForKey { x } => Ok(io::wait_for_key(state, x)),
        SetDelayTimer { x } => Ok(io::set_delay_timer(state, x)),
        SetSoundTimer { x } => Ok(io::set_sound_timer(state, x)),
        AddToIndex { x } => Ok(io::add_to_index(state, x)),
        FontGlyph { x } => Ok(io::font_glyph(state, x)),
        StoreBcd { x } => io::store_bcd(state, x),
        StoreRegisters { x } => io::store_registers(state, x),
        LoadRegisters { x } => io::load_registers(state, x),
    }
}
