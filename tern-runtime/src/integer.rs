//! Fixed-width integer abstraction
//!
//! Every operation the runtime exposes to generated code is parameterized by
//! one concrete integer type. The `Integer` trait gives the arithmetic engine,
//! the cast family and the C ABI layer a single vocabulary over
//! `i8..i128`, `u8..u128`, `isize` and `usize`.

use std::fmt;
use std::num::ParseIntError;
use std::ops::BitOr;
use std::str::FromStr;

use crate::{RuntimeError, RuntimeResult};

/// Lossless view of any supported integer value.
///
/// Negative values always fit in `i128`, non-negative values always fit in
/// `u128`, so the pair covers the union of every source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wide {
    Negative(i128),
    NonNegative(u128),
}

impl Wide {
    pub fn is_negative(self) -> bool {
        matches!(self, Wide::Negative(_))
    }
}

impl fmt::Display for Wide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wide::Negative(value) => write!(f, "{}", value),
            Wide::NonNegative(value) => write!(f, "{}", value),
        }
    }
}

/// A primitive fixed-width integer type.
pub trait Integer:
    Copy
    + Eq
    + Ord
    + fmt::Debug
    + fmt::Display
    + BitOr<Output = Self>
    + FromStr<Err = ParseIntError>
    + Send
    + Sync
    + 'static
{
    /// Source-level type name, used in diagnostics
    const NAME: &'static str;
    const BITS: u32;
    const SIGNED: bool;
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;
    const ONE: Self;

    /// Two's-complement result plus whether the exact result was out of range.
    fn overflowing_add(self, rhs: Self) -> (Self, bool);
    fn overflowing_sub(self, rhs: Self) -> (Self, bool);
    fn overflowing_mul(self, rhs: Self) -> (Self, bool);

    /// `None` when `rhs` is zero.
    fn overflowing_div(self, rhs: Self) -> Option<(Self, bool)>;

    /// `None` when `rhs` is zero.
    fn overflowing_rem(self, rhs: Self) -> Option<(Self, bool)>;

    fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// Native right shift. Signed types shift arithmetically; a shift of
    /// `BITS` or more yields all sign bits (signed) or zero (unsigned).
    fn shift_right(self, steps: u32) -> Self;

    /// The value with every bit cleared except the sign bit. Always zero for
    /// unsigned types.
    fn sign_bit(self) -> Self;

    fn to_wide(self) -> Wide;

    /// `None` when the value is outside `[MIN, MAX]`.
    fn from_wide(wide: Wide) -> Option<Self>;

    /// Bit pattern sign-extended to 128 bits.
    fn to_bits(self) -> u128;

    /// Keeps the low `BITS` bits.
    fn from_bits_truncating(bits: u128) -> Self;
}

macro_rules! impl_integer {
    (signed: $($ty:ident),* $(,)?) => {
        $(
            impl Integer for $ty {
                const NAME: &'static str = stringify!($ty);
                const BITS: u32 = <$ty>::BITS;
                const SIGNED: bool = true;
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
                const ZERO: Self = 0;
                const ONE: Self = 1;

                impl_integer!(@arith $ty);

                fn shift_right(self, steps: u32) -> Self {
                    self.checked_shr(steps).unwrap_or(if self < 0 { -1 } else { 0 })
                }

                fn sign_bit(self) -> Self {
                    self & <$ty>::MIN
                }

                fn to_wide(self) -> Wide {
                    if self < 0 {
                        Wide::Negative(self as i128)
                    } else {
                        Wide::NonNegative(self as u128)
                    }
                }

                fn from_wide(wide: Wide) -> Option<Self> {
                    match wide {
                        Wide::Negative(value) => <$ty>::try_from(value).ok(),
                        Wide::NonNegative(value) => <$ty>::try_from(value).ok(),
                    }
                }

                fn to_bits(self) -> u128 {
                    self as i128 as u128
                }

                fn from_bits_truncating(bits: u128) -> Self {
                    bits as $ty
                }
            }
        )*
    };
    (unsigned: $($ty:ident),* $(,)?) => {
        $(
            impl Integer for $ty {
                const NAME: &'static str = stringify!($ty);
                const BITS: u32 = <$ty>::BITS;
                const SIGNED: bool = false;
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;
                const ZERO: Self = 0;
                const ONE: Self = 1;

                impl_integer!(@arith $ty);

                fn shift_right(self, steps: u32) -> Self {
                    self.checked_shr(steps).unwrap_or(0)
                }

                fn sign_bit(self) -> Self {
                    0
                }

                fn to_wide(self) -> Wide {
                    Wide::NonNegative(self as u128)
                }

                fn from_wide(wide: Wide) -> Option<Self> {
                    match wide {
                        Wide::Negative(_) => None,
                        Wide::NonNegative(value) => <$ty>::try_from(value).ok(),
                    }
                }

                fn to_bits(self) -> u128 {
                    self as u128
                }

                fn from_bits_truncating(bits: u128) -> Self {
                    bits as $ty
                }
            }
        )*
    };
    (@arith $ty:ident) => {
        fn overflowing_add(self, rhs: Self) -> (Self, bool) {
            <$ty>::overflowing_add(self, rhs)
        }

        fn overflowing_sub(self, rhs: Self) -> (Self, bool) {
            <$ty>::overflowing_sub(self, rhs)
        }

        fn overflowing_mul(self, rhs: Self) -> (Self, bool) {
            <$ty>::overflowing_mul(self, rhs)
        }

        fn overflowing_div(self, rhs: Self) -> Option<(Self, bool)> {
            if rhs == 0 {
                return None;
            }
            Some(<$ty>::overflowing_div(self, rhs))
        }

        fn overflowing_rem(self, rhs: Self) -> Option<(Self, bool)> {
            if rhs == 0 {
                return None;
            }
            Some(<$ty>::overflowing_rem(self, rhs))
        }
    };
}

impl_integer!(signed: i8, i16, i32, i64, i128, isize);
impl_integer!(unsigned: u8, u16, u32, u64, u128, usize);

/// Parse a decimal literal as `T`.
pub fn parse_integer<T: Integer>(text: &str) -> RuntimeResult<T> {
    text.trim()
        .parse::<T>()
        .map_err(|_| RuntimeError::InvalidInteger {
            text: text.to_string(),
            target: T::NAME,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_preserves_extremes() {
        assert_eq!(u128::MAX.to_wide(), Wide::NonNegative(u128::MAX));
        assert_eq!(i128::MIN.to_wide(), Wide::Negative(i128::MIN));
        assert_eq!((-1i8).to_wide(), Wide::Negative(-1));
        assert_eq!(0i64.to_wide(), Wide::NonNegative(0));
    }

    #[test]
    fn test_from_wide_respects_range() {
        assert_eq!(u8::from_wide(Wide::NonNegative(255)), Some(255));
        assert_eq!(u8::from_wide(Wide::NonNegative(256)), None);
        assert_eq!(u8::from_wide(Wide::Negative(-1)), None);
        assert_eq!(i8::from_wide(Wide::Negative(-128)), Some(-128));
        assert_eq!(i8::from_wide(Wide::Negative(-129)), None);
    }

    #[test]
    fn test_bits_sign_extend() {
        assert_eq!((-1i16).to_bits(), u128::MAX);
        assert_eq!(u8::from_bits_truncating(300), 44);
        assert_eq!(i8::from_bits_truncating(0xff), -1);
    }

    #[test]
    fn test_shift_right_past_width() {
        assert_eq!((-8i32).shift_right(40), -1);
        assert_eq!(8i32.shift_right(40), 0);
        assert_eq!(u16::MAX.shift_right(16), 0);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer::<i16>(" -300 ").unwrap(), -300);
        let err = parse_integer::<u8>("256").unwrap_err();
        assert_eq!(err.to_string(), "Invalid u8 literal `256`");
    }
}
