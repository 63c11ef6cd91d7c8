//! Streaming decimal to fixed-point conversion.
//!
//! Values are accumulated one ASCII character at a time into an unsigned
//! 64 bit integer scaled by `2^q`, where `q` is the number of fractional bits
//! of the field being decoded. A real value is recovered as `value / 2^q`.
//! Overflow never wraps, the accumulator saturates instead.

use std::convert::TryFrom;

/// Fractional bits of a longitude, holds +-180 as Q9.55.
pub const Q_LONGITUDE: u32 = 55;
/// Fractional bits of a latitude, holds +-90 as Q8.56.
pub const Q_LATITUDE: u32 = 56;
pub const Q_ALTITUDE: u32 = 10;
pub const Q_GEOID_HEIGHT: u32 = 10;
pub const Q_DOP: u32 = 16;
pub const Q_SPEED: u32 = 16;
pub const Q_MAGNETIC_VARIATION: u32 = 24;
pub const Q_TRACK: u32 = 16;

/// Accumulator for a single fixed-point literal such as `-123.456`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fxp {
    val: u64,
    div: u64,
    dp: bool,
    neg: bool,
}

impl Fxp {
    pub fn new() -> Self {
        Fxp::default()
    }

    /// Feed one character of an unsigned literal.
    /// Characters other than digits and `.` are skipped.
    pub fn push(&mut self, c: u8, q: u32) {
        if c == b'.' {
            self.dp = true;
            self.div = 10;
            return;
        }
        if !c.is_ascii_digit() {
            return;
        }

        let inc = u64::from(c - b'0') << q;
        if !self.dp {
            self.val = self.val.saturating_mul(10).saturating_add(inc);
        } else {
            // Once the divisor saturates the remaining digits add ~0.
            self.val = self.val.saturating_add(inc / self.div);
            self.div = self.div.saturating_mul(10);
        }
    }

    /// Feed one character of a signed literal, a `-` marks it negative.
    pub fn push_signed(&mut self, c: u8, q: u32) {
        if c == b'-' {
            self.neg = true;
        } else {
            self.push(c, q);
        }
    }

    /// The magnitude decoded so far.
    #[inline]
    pub fn unsigned(&self) -> u64 {
        self.val
    }

    /// The signed value decoded so far, the magnitude is clamped to `i64::MAX`
    /// before the sign is applied.
    #[inline]
    pub fn signed(&self) -> i64 {
        let val = if self.val > i64::MAX as u64 {
            i64::MAX
        } else {
            self.val as i64
        };
        if self.neg {
            -val
        } else {
            val
        }
    }
}

/// Narrows a decoded unsigned value, saturating at the target's maximum.
#[inline]
pub(crate) fn narrow<T: TryFrom<u64> + Bounded>(val: u64) -> T {
    T::try_from(val).unwrap_or(T::MAX)
}

/// Narrows a decoded signed value into an `i32`. The magnitude saturates at
/// `i32::MAX` for either sign, so the result can always be negated.
#[inline]
pub(crate) fn narrow_signed(val: i64) -> i32 {
    if val > i64::from(i32::MAX) {
        i32::MAX
    } else if val < -i64::from(i32::MAX) {
        -i32::MAX
    } else {
        val as i32
    }
}

/// Integer types a decoded value can be narrowed into.
pub(crate) trait Bounded {
    const MAX: Self;
}

macro_rules! impl_bounded {
    ($($t:ty),*) => {
        $(impl Bounded for $t {
            const MAX: Self = <$t>::MAX;
        })*
    };
}

impl_bounded!(u8, u16, u32);
