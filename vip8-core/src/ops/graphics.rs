use super::Next;
use crate::{error::Result, state::Chip8State};

const MAX_SPRITE_HEIGHT: usize = 15;

pub fn clear_screen(state: &mut Chip8State) -> Next {
    state.framebuffer.clear();
    state.draw_flag = true;
    Next::Advance
}

/// `Dxyn`: XOR an 8-pixel-wide, `n`-row sprite from `I` onto the screen at
/// `(Vx, Vy)`. Pixels that fall off an edge wrap to the opposite one.
/// `VF` is cleared before the coordinates are read and ends up 1 if any lit
/// pixel was turned off.
pub fn draw(state: &mut Chip8State, x: u8, y: u8, n: u8) -> Result<Next> {
    let height = n as usize;
    let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
    sprite[..height].copy_from_slice(state.memory(state.index_register, height)?);

    state.set_flag(false);
    let origin_x = state.register(x) as usize;
    let origin_y = state.register(y) as usize;

    let mut collided = false;
    for (row, bits) in sprite[..height].iter().enumerate() {
        for column in 0..8 {
            if bits & (0x80 >> column) != 0 {
                collided |= state.framebuffer.flip(origin_x + column, origin_y + row);
            }
        }
    }

    state.set_flag(collided);
    state.draw_flag = true;
    Ok(Next::Advance)
}
