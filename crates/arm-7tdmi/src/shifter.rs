//! Barrel shifter with carry-out.
//!
//! Every shift and rotate feeds the carry flag, so the shifter returns
//! the shifted value together with the carry-out. A shift amount of zero
//! leaves both the value and the incoming carry untouched.

/// Shift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// Logical shift left.
    Lsl,
    /// Logical shift right.
    Lsr,
    /// Arithmetic shift right (sign-extending).
    Asr,
    /// Rotate right.
    Ror,
}

/// Shift `value` by `amount`, returning the result and the carry-out.
///
/// Edge cases follow the ARM barrel shifter:
/// - amount 0: value unchanged, carry-out is `carry_in`;
/// - amount 1-31: carry-out is the last bit shifted out;
/// - amount 32: LSL carries out bit 0, LSR carries out bit 31, ASR
///   replicates the sign bit into both the value and the carry;
/// - amount over 32: LSL and LSR produce zero with a clear carry, ASR
///   keeps propagating the sign. Rotate amounts are taken modulo 32
///   first, so a rotate never sees an amount over 31.
#[must_use]
pub fn shift_with_carry(kind: Shift, value: u32, amount: u32, carry_in: bool) -> (u32, bool) {
    match kind {
        Shift::Lsl => match amount {
            0 => (value, carry_in),
            1..=31 => (value << amount, value & (1 << (32 - amount)) != 0),
            32 => (0, value & 1 != 0),
            _ => (0, false),
        },
        Shift::Lsr => match amount {
            0 => (value, carry_in),
            1..=31 => (value >> amount, value & (1 << (amount - 1)) != 0),
            32 => (0, value & 0x8000_0000 != 0),
            _ => (0, false),
        },
        Shift::Asr => match amount {
            0 => (value, carry_in),
            1..=31 => (
                ((value as i32) >> amount) as u32,
                value & (1 << (amount - 1)) != 0,
            ),
            // 32 and beyond replicate the sign bit
            _ => {
                let sign = value & 0x8000_0000 != 0;
                (if sign { u32::MAX } else { 0 }, sign)
            }
        },
        Shift::Ror => {
            let amount = amount & 31;
            if amount == 0 {
                (value, carry_in)
            } else {
                let res = value.rotate_right(amount);
                (res, res & 0x8000_0000 != 0)
            }
        }
    }
}
