//! Integer conversion family
//!
//! Four policies for moving a value between integer types:
//!
//! - [`fallible_cast`]: `None` when the value does not fit, never panics
//! - [`Runtime::infallible_cast`]: asserts the value fits; out-of-range is an
//!   invariant violation reported through the panic primitive. The
//!   [`infallible_cast!`](crate::infallible_cast) macro is the
//!   constant-evaluable form, where out-of-range fails the build.
//! - [`saturating_cast`]: clamps to the destination bounds
//! - [`truncating_cast`]: keeps the low bits, never checked
//!
//! Enums take part through [`CastSource`], which exposes their underlying
//! integer; see [`impl_cast_source!`](crate::impl_cast_source).

use crate::integer::Integer;
use crate::panic::{DiagnosticSink, Runtime};
use crate::{RuntimeError, RuntimeResult};

/// Anything with an underlying integer representation.
pub trait CastSource: Copy {
    type Repr: Integer;

    fn underlying(self) -> Self::Repr;
}

macro_rules! impl_cast_source_for_integers {
    ($($ty:ty),*) => {
        $(
            impl CastSource for $ty {
                type Repr = $ty;

                #[inline]
                fn underlying(self) -> $ty {
                    self
                }
            }
        )*
    };
}

impl_cast_source_for_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Implement [`CastSource`] for a fieldless enum with an explicit `#[repr]`.
///
/// ```ignore
/// #[repr(u8)]
/// #[derive(Clone, Copy)]
/// enum Color { Red = 1, Green = 2 }
/// tern_runtime::impl_cast_source!(Color => u8);
/// ```
#[macro_export]
macro_rules! impl_cast_source {
    ($enum_ty:ty => $repr:ty) => {
        impl $crate::cast::CastSource for $enum_ty {
            type Repr = $repr;

            #[inline]
            fn underlying(self) -> $repr {
                self as $repr
            }
        }
    };
}

/// Whether `input` lies within `[O::MIN, O::MAX]`.
pub fn is_within_range<O: Integer, I: CastSource>(input: I) -> bool {
    fallible_cast::<O, I>(input).is_some()
}

pub fn fallible_cast<O: Integer, I: CastSource>(input: I) -> Option<O> {
    O::from_wide(input.underlying().to_wide())
}

/// Fallible cast in error-result form, for callers that propagate with `?`.
pub fn try_cast<O: Integer, I: CastSource>(input: I) -> RuntimeResult<O> {
    fallible_cast(input).ok_or_else(|| RuntimeError::CastOutOfRange {
        value: input.underlying().to_string(),
        target: O::NAME,
    })
}

/// Out-of-range values clamp to `O::MIN` when negative, `O::MAX` otherwise.
pub fn saturating_cast<O: Integer, I: CastSource>(input: I) -> O {
    let wide = input.underlying().to_wide();
    match O::from_wide(wide) {
        Some(value) => value,
        None if wide.is_negative() => O::MIN,
        None => O::MAX,
    }
}

/// Reinterpret the low `O::BITS` bits of the two's-complement pattern.
pub fn truncating_cast<O: Integer, I: CastSource>(input: I) -> O {
    O::from_bits_truncating(input.underlying().to_bits())
}

/// Right shift with the sign bit re-inserted for signed operands.
///
/// Unsigned operands get a plain logical shift. Shifting by `T::BITS` or more
/// yields `-1`/`0` for signed operands and `0` for unsigned ones.
pub fn arithmetic_shift_right<T: Integer>(value: T, steps: u32) -> T {
    if T::SIGNED {
        value.shift_right(steps) | value.sign_bit()
    } else {
        value.shift_right(steps)
    }
}

impl<S: DiagnosticSink> Runtime<S> {
    /// Cast that must not lose information. An out-of-range value panics; in
    /// continue mode the truncated value is returned.
    pub fn infallible_cast<O: Integer, I: CastSource>(&self, input: I) -> O {
        match fallible_cast(input) {
            Some(cast) => cast,
            None => {
                self.panic(&format!(
                    "Integer cast out of range: {} does not fit in {}",
                    input.underlying(),
                    O::NAME
                ));
                truncating_cast(input)
            }
        }
    }
}

/// Infallible cast through the process-wide runtime
pub fn infallible_cast<O: Integer, I: CastSource>(input: I) -> O {
    crate::panic::runtime().infallible_cast(input)
}

/// Range check used by [`infallible_cast!`](crate::infallible_cast). `const`
/// so the macro can run during constant evaluation.
#[doc(hidden)]
pub const fn fits_const(
    negative: bool,
    signed: i128,
    unsigned: u128,
    min: i128,
    max: u128,
) -> bool {
    if negative {
        signed >= min
    } else {
        unsigned <= max
    }
}

/// Infallible integer cast usable in constant evaluation.
///
/// In a `const` or `static` initializer an out-of-range value is a build
/// failure. Evaluated at run time it is a Rust panic regardless of the panic
/// mode; use [`Runtime::infallible_cast`] for run-time casts. Enum sources
/// name their `#[repr]` type after `=>`.
///
/// ```
/// const LIMIT: u8 = tern_runtime::infallible_cast!(u8, 200i32);
/// assert_eq!(LIMIT, 200);
///
/// #[repr(i16)]
/// #[derive(Clone, Copy)]
/// enum Level { Deep = -300 }
/// const DEEP: i32 = tern_runtime::infallible_cast!(i32, Level::Deep => i16);
/// assert_eq!(DEEP, -300);
/// ```
#[macro_export]
macro_rules! infallible_cast {
    ($target:ty, $value:expr => $repr:ty) => {
        $crate::infallible_cast!($target, ($value) as $repr)
    };
    ($target:ty, $value:expr) => {{
        let value = $value;
        #[allow(unused_comparisons)]
        let negative = value < 0;
        if !$crate::cast::fits_const(
            negative,
            value as i128,
            value as u128,
            <$target>::MIN as i128,
            <$target>::MAX as u128,
        ) {
            #[allow(clippy::panic)]
            ::core::panic!("Integer cast out of range");
        }
        value as $target
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanicMode;
    use crate::panic::CapturedSink;

    #[repr(i16)]
    #[derive(Debug, Clone, Copy)]
    enum Level {
        Low = -300,
        High = 300,
    }

    crate::impl_cast_source!(Level => i16);

    #[test]
    fn test_fallible_boundaries() {
        assert_eq!(fallible_cast::<u8, _>(255i32), Some(255));
        assert_eq!(fallible_cast::<u8, _>(256i32), None);
        assert_eq!(fallible_cast::<u8, _>(-1i32), None);
        assert_eq!(fallible_cast::<i8, _>(-128i64), Some(-128));
        assert_eq!(fallible_cast::<i64, _>(u64::MAX), None);
        assert_eq!(fallible_cast::<u128, _>(i128::MAX), Some(i128::MAX as u128));
    }

    #[test]
    fn test_try_cast_error() {
        let err = try_cast::<u16, _>(70_000u32).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Integer cast out of range: 70000 does not fit in u16"
        );
        assert_eq!(try_cast::<u16, _>(7u32).unwrap(), 7);
    }

    #[test]
    fn test_try_cast_enum_source() {
        let err = try_cast::<u8, _>(Level::High).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Integer cast out of range: 300 does not fit in u8"
        );
        assert_eq!(try_cast::<i16, _>(Level::Low).unwrap(), -300);
    }

    #[test]
    fn test_saturating() {
        assert_eq!(saturating_cast::<u8, _>(-1i32), 0);
        assert_eq!(saturating_cast::<u8, _>(300i32), 255);
        assert_eq!(saturating_cast::<i8, _>(-200i32), -128);
        assert_eq!(saturating_cast::<i8, _>(200u8), 127);
        assert_eq!(saturating_cast::<u32, _>(i64::MIN), 0);
        assert_eq!(saturating_cast::<i64, _>(u128::MAX), i64::MAX);
    }

    #[test]
    fn test_truncating() {
        assert_eq!(truncating_cast::<u8, _>(300i32), 44);
        assert_eq!(truncating_cast::<u8, _>(-1i64), 255);
        assert_eq!(truncating_cast::<i8, _>(200u8), -56);
        assert_eq!(truncating_cast::<i64, _>(-5i8), -5);
        assert_eq!(truncating_cast::<u64, _>(-1i8), u64::MAX);
    }

    #[test]
    fn test_enum_sources_use_underlying_value() {
        assert_eq!(fallible_cast::<u8, _>(Level::Low), None);
        assert_eq!(saturating_cast::<u8, _>(Level::Low), 0);
        assert_eq!(saturating_cast::<u8, _>(Level::High), 255);
        assert_eq!(truncating_cast::<u8, _>(Level::High), 44);
        assert_eq!(fallible_cast::<i32, _>(Level::Low), Some(-300));
    }

    #[test]
    fn test_infallible_in_range() {
        let rt = Runtime::with_sink(PanicMode::Abort, CapturedSink::new());
        let value: u16 = rt.infallible_cast(65_535i64);
        assert_eq!(value, 65_535);
        assert!(rt.sink().lines().is_empty());
    }

    #[test]
    #[should_panic(expected = "Integer cast out of range: 300 does not fit in u8")]
    fn test_infallible_out_of_range_panics() {
        let rt = Runtime::with_sink(PanicMode::Abort, CapturedSink::new());
        let _: u8 = rt.infallible_cast(300i32);
    }

    #[test]
    fn test_infallible_continue_mode_truncates() {
        let rt = Runtime::with_sink(PanicMode::Continue, CapturedSink::new());
        let value: u8 = rt.infallible_cast(Level::High);
        assert_eq!(value, 44);
        assert_eq!(
            rt.sink().lines(),
            vec!["Panic: Integer cast out of range: 300 does not fit in u8"]
        );
    }

    #[test]
    fn test_infallible_macro_in_const() {
        const SMALL: u8 = crate::infallible_cast!(u8, 255i64);
        const NEGATIVE: i16 = crate::infallible_cast!(i16, -32_768i32);
        const HUGE: u128 = crate::infallible_cast!(u128, u64::MAX);
        assert_eq!(SMALL, 255);
        assert_eq!(NEGATIVE, i16::MIN);
        assert_eq!(HUGE, u64::MAX as u128);
    }

    #[test]
    fn test_infallible_macro_enum_source() {
        const LOW: i32 = crate::infallible_cast!(i32, Level::Low => i16);
        const HIGH: u16 = crate::infallible_cast!(u16, Level::High => i16);
        assert_eq!(LOW, -300);
        assert_eq!(HIGH, 300);
    }

    #[test]
    #[should_panic(expected = "Integer cast out of range")]
    fn test_infallible_macro_enum_out_of_range() {
        let level = std::hint::black_box(Level::Low);
        let _ = crate::infallible_cast!(u8, level => i16);
    }

    #[test]
    #[should_panic(expected = "Integer cast out of range")]
    fn test_infallible_macro_at_run_time() {
        let input = std::hint::black_box(-1i32);
        let _ = crate::infallible_cast!(u32, input);
    }

    #[test]
    fn test_arithmetic_shift_right() {
        assert_eq!(arithmetic_shift_right(-128i8, 1), -64);
        assert_eq!(arithmetic_shift_right(-1i16, 15), -1);
        assert_eq!(arithmetic_shift_right(i32::MIN, 31), -1);
        assert_eq!(arithmetic_shift_right(i64::MIN, 4), i64::MIN >> 4);
        assert_eq!(arithmetic_shift_right(64i64, 3), 8);
        assert_eq!(arithmetic_shift_right(0x80u8, 7), 1);
        assert_eq!(arithmetic_shift_right(u32::MAX, 31), 1);
    }

    #[test]
    fn test_arithmetic_shift_right_past_width() {
        assert_eq!(arithmetic_shift_right(-5i8, 8), -1);
        assert_eq!(arithmetic_shift_right(5i8, 100), 0);
        assert_eq!(arithmetic_shift_right(u64::MAX, 64), 0);
    }
}
