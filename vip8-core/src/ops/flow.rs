use super::Next;
use crate::{
    error::{Error, Result},
    state::{Chip8State, MEMORY_SIZE},
};

/// `00EE`: resume after the `2nnn` that made the call.
pub fn return_from_subroutine(state: &mut Chip8State) -> Result<Next> {
    let call_site = state.pop_return_address()?;
    Ok(Next::Jump(call_site.wrapping_add(2)))
}

/// `2nnn`: the stack holds the address of the call itself.
pub fn call(state: &mut Chip8State, nnn: u16) -> Result<Next> {
    state.push_return_address(state.program_counter)?;
    Ok(Next::Jump(nnn))
}

/// `Bnnn`
pub fn jump_offset(state: &mut Chip8State, nnn: u16) -> Result<Next> {
    let target = state.register(0) as u16 + nnn;
    if target as usize >= MEMORY_SIZE {
        return Err(Error::MemoryOutOfRange {
            address: target as usize,
        });
    }
    Ok(Next::Jump(target))
}
