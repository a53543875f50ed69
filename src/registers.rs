//! Raw register buffer and the helpers to read values from it.
//!
//! The local API reports its measurements as a flat array of 16-bit registers.
//! [`RawRegisters`] owns such an array for the lifetime of one decode and offers
//! two ways to read it: [`RawRegisters::get`] for registers that must exist and
//! [`RawRegisters::get_or_zero`] for registers that belong to hardware which may
//! not be installed.

use crate::error::{Error, Result};

/// Immutable buffer of signed 16-bit register values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRegisters(Vec<i16>);

impl RawRegisters {
    /// Creates a buffer that takes ownership of `registers`.
    pub fn new(registers: Vec<i16>) -> Self {
        Self(registers)
    }

    /// Number of registers in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the buffer holds no registers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `offset` addresses a register inside the buffer.
    pub fn contains(&self, offset: u16) -> bool {
        usize::from(offset) < self.0.len()
    }

    /// Reads the register at the zero-based `offset`.
    ///
    /// # Errors
    ///
    /// [`Error::OffsetOutOfRange`] if `offset` is not inside the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use solax_local_lib::registers::RawRegisters;
    ///
    /// let registers = RawRegisters::from(vec![2366, 2330, 2365]);
    /// assert_eq!(registers.get(1).unwrap(), 2330);
    /// assert!(registers.get(3).is_err());
    /// ```
    pub fn get(&self, offset: u16) -> Result<i16> {
        self.0
            .get(usize::from(offset))
            .copied()
            .ok_or(Error::OffsetOutOfRange {
                offset,
                len: self.0.len(),
            })
    }

    /// Reads the register at `offset`, or `0` if the buffer ends before it.
    pub fn get_or_zero(&self, offset: u16) -> i16 {
        match self.get(offset) {
            Ok(value) => value,
            Err(_) => {
                log::trace!(
                    "Register {offset} is beyond the buffer of {} registers, reading 0",
                    self.0.len()
                );
                0
            }
        }
    }

    /// Reconstructs a signed 32-bit value from the registers at `low` and `high`.
    ///
    /// Missing registers read as `0`.
    pub fn pair_or_zero(&self, low: u16, high: u16) -> i32 {
        read_32bit_signed(self.get_or_zero(low), self.get_or_zero(high))
    }
}

impl From<Vec<i16>> for RawRegisters {
    fn from(registers: Vec<i16>) -> Self {
        Self::new(registers)
    }
}

impl From<&[i16]> for RawRegisters {
    fn from(registers: &[i16]) -> Self {
        Self::new(registers.to_vec())
    }
}

/// Combines a low and a high 16-bit word into a signed 32-bit value.
///
/// The result is `(high << 16) | (low & 0xFFFF)` interpreted as two's
/// complement, so counters above `i32::MAX` wrap to negative values.
///
/// # Examples
///
/// ```
/// use solax_local_lib::registers::read_32bit_signed;
///
/// assert_eq!(read_32bit_signed(7586, 1), 73122);
/// assert_eq!(read_32bit_signed(-5, -1), -5);
/// ```
pub const fn read_32bit_signed(low: i16, high: i16) -> i32 {
    ((high as i32) << 16) | (low as i32 & 0xFFFF)
}

/// Converts a register value as transported in JSON to its 16-bit form.
///
/// The device reports unsigned words, so `0..=65535` is accepted and wrapped
/// into `i16`. Negative values down to `i16::MIN` are taken unchanged.
/// Returns `None` for anything outside `-32768..=65535`.
pub fn wrap_register_value(value: i64) -> Option<i16> {
    if (i64::from(i16::MIN)..=i64::from(u16::MAX)).contains(&value) {
        Some(value as u16 as i16)
    } else {
        None
    }
}
