//! `6xnn`, `7xnn`, the `8xy_` family, `Annn` and `Cxnn`. All register
//! arithmetic wraps modulo 256. `8xy4` writes `VF` after the result; `8xy5`,
//! `8xy6`, `8xy7` and `8xyE` write it first and compute the result from the
//! registers as they stand after the flag.

use rand::Rng;

use super::Next;
use crate::state::Chip8State;

pub fn load(state: &mut Chip8State, x: u8, nn: u8) -> Next {
    *state.register_mut(x) = nn;
    Next::Advance
}

/// `7xnn` leaves `VF` alone.
pub fn add_immediate(state: &mut Chip8State, x: u8, nn: u8) -> Next {
    let value = state.register(x).wrapping_add(nn);
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn copy(state: &mut Chip8State, x: u8, y: u8) -> Next {
    let value = state.register(y);
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn or(state: &mut Chip8State, x: u8, y: u8) -> Next {
    let value = state.register(x) | state.register(y);
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn and(state: &mut Chip8State, x: u8, y: u8) -> Next {
    let value = state.register(x) & state.register(y);
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn xor(state: &mut Chip8State, x: u8, y: u8) -> Next {
    let value = state.register(x) ^ state.register(y);
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn add(state: &mut Chip8State, x: u8, y: u8) -> Next {
    let (result, carry) = state.register(x).overflowing_add(state.register(y));
    *state.register_mut(x) = result;
    state.set_flag(carry);
    Next::Advance
}

/// `VF` is 1 when there is no borrow.
pub fn sub(state: &mut Chip8State, x: u8, y: u8) -> Next {
    state.set_flag(state.register(x) >= state.register(y));
    let value = state.register(x).wrapping_sub(state.register(y));
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn sub_reverse(state: &mut Chip8State, x: u8, y: u8) -> Next {
    state.set_flag(state.register(y) >= state.register(x));
    let value = state.register(y).wrapping_sub(state.register(x));
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn shift_right(state: &mut Chip8State, x: u8) -> Next {
    state.set_flag(state.register(x) & 1 == 1);
    let value = state.register(x) >> 1;
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn shift_left(state: &mut Chip8State, x: u8) -> Next {
    state.set_flag(state.register(x) >> 7 == 1);
    let value = state.register(x) << 1;
    *state.register_mut(x) = value;
    Next::Advance
}

pub fn set_index(state: &mut Chip8State, nnn: u16) -> Next {
    state.index_register = nnn;
    Next::Advance
}

pub fn random<R: Rng>(state: &mut Chip8State, rng: &mut R, x: u8, nn: u8) -> Next {
    *state.register_mut(x) = rng.gen::<u8>() & nn;
    Next::Advance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::run;

    fn with_registers(vx: u8, vy: u8) -> Chip8State {
        let mut state = Chip8State::default();
        *state.register_mut(1) = vx;
        *state.register_mut(2) = vy;
        state
    }

    #[test]
    fn load_sets_register() {
        let mut state = Chip8State::default();
        for x in 0..16u16 {
            assert_eq!(run(&mut state, 0x6000 | x << 8 | 0x5A).unwrap(), Next::Advance);
            assert_eq!(state.register(x as u8), 0x5A);
        }
    }

    #[test]
    fn add_immediate_wraps_without_touching_flag() {
        let mut state = with_registers(0xF0, 0);
        state.set_flag(true);
        run(&mut state, 0x7120).unwrap();
        assert_eq!(state.register(1), 0x10);
        assert_eq!(state.register(0xF), 1);
    }

    #[test]
    fn bitwise_ops() {
        let mut state = with_registers(0b1100, 0b1010);
        run(&mut state, 0x8121).unwrap();
        assert_eq!(state.register(1), 0b1110);

        let mut state = with_registers(0b1100, 0b1010);
        run(&mut state, 0x8122).unwrap();
        assert_eq!(state.register(1), 0b1000);

        let mut state = with_registers(0b1100, 0b1010);
        run(&mut state, 0x8123).unwrap();
        assert_eq!(state.register(1), 0b0110);

        let mut state = with_registers(0b1100, 0b1010);
        run(&mut state, 0x8120).unwrap();
        assert_eq!(state.register(1), 0b1010);
    }

    #[test]
    fn add_sets_carry_only_on_overflow() {
        for (a, b) in [(0, 0), (200, 55), (200, 56), (255, 255), (1, 254)] {
            let mut state = with_registers(a, b);
            run(&mut state, 0x8124).unwrap();
            assert_eq!(state.register(1), a.wrapping_add(b));
            assert_eq!(state.register(0xF), (a as u16 + b as u16 > 255) as u8);
        }
    }

    #[test]
    fn sub_clears_flag_on_borrow() {
        let mut state = with_registers(5, 10);
        run(&mut state, 0x8125).unwrap();
        assert_eq!(state.register(0xF), 0);
        assert_eq!(state.register(1), 251);

        let mut state = with_registers(10, 10);
        run(&mut state, 0x8125).unwrap();
        assert_eq!(state.register(0xF), 1);
        assert_eq!(state.register(1), 0);
    }

    #[test]
    fn reverse_sub_subtracts_vx_from_vy() {
        let mut state = with_registers(10, 5);
        run(&mut state, 0x8127).unwrap();
        assert_eq!(state.register(0xF), 0);
        assert_eq!(state.register(1), 251);

        let mut state = with_registers(5, 10);
        run(&mut state, 0x8127).unwrap();
        assert_eq!(state.register(0xF), 1);
        assert_eq!(state.register(1), 5);
    }

    #[test]
    fn shifts_move_out_bit_into_flag() {
        let mut state = with_registers(0b1000_0011, 0);
        run(&mut state, 0x8126).unwrap();
        assert_eq!(state.register(1), 0b0100_0001);
        assert_eq!(state.register(0xF), 1);

        let mut state = with_registers(0b1000_0011, 0);
        run(&mut state, 0x812E).unwrap();
        assert_eq!(state.register(1), 0b0000_0110);
        assert_eq!(state.register(0xF), 1);

        let mut state = with_registers(0b0100_0010, 0);
        run(&mut state, 0x812E).unwrap();
        assert_eq!(state.register(1), 0b1000_0100);
        assert_eq!(state.register(0xF), 0);
    }

    #[test]
    fn result_overwrites_flag_when_vf_is_the_destination() {
        let mut state = with_registers(3, 0);
        *state.register_mut(0xF) = 10;
        run(&mut state, 0x8F15).unwrap();
        assert_eq!(state.register(0xF), 254);

        let mut state = Chip8State::default();
        *state.register_mut(0xF) = 0b11;
        run(&mut state, 0x8F06).unwrap();
        assert_eq!(state.register(0xF), 0);

        let mut state = with_registers(3, 0);
        *state.register_mut(0xF) = 10;
        run(&mut state, 0x8F17).unwrap();
        assert_eq!(state.register(0xF), 3);

        let mut state = Chip8State::default();
        *state.register_mut(0xF) = 0x81;
        run(&mut state, 0x8F0E).unwrap();
        assert_eq!(state.register(0xF), 2);
    }

    #[test]
    fn subtrahend_in_vf_is_read_after_the_flag() {
        let mut state = with_registers(10, 0);
        *state.register_mut(0xF) = 3;
        run(&mut state, 0x81F5).unwrap();
        assert_eq!(state.register(0xF), 1);
        assert_eq!(state.register(1), 9);
    }

    #[test]
    fn flag_wins_when_vf_is_the_add_destination() {
        let mut state = Chip8State::default();
        *state.register_mut(0xF) = 200;
        *state.register_mut(1) = 100;
        run(&mut state, 0x8F14).unwrap();
        assert_eq!(state.register(0xF), 1);
    }

    #[test]
    fn random_is_masked() {
        let mut state = Chip8State::default();
        for _ in 0..32 {
            run(&mut state, 0xC10F).unwrap();
            assert_eq!(state.register(1) & 0xF0, 0);
        }
        run(&mut state, 0xC100).unwrap();
        assert_eq!(state.register(1), 0);
    }

    #[test]
    fn set_index_loads_address() {
        let mut state = Chip8State::default();
        run(&mut state, 0xA123).unwrap();
        assert_eq!(state.index_register, 0x123);
    }
}
