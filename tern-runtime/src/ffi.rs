//! C ABI for natively compiled Tern programs
//!
//! Generated code that links the runtime as a static library calls these
//! symbols instead of the generic Rust API. Every entry point goes through
//! the process-wide runtime, so the panic mode is the one installed at start
//! (or the build-time default). A fatal panic aborts the process.

use std::ffi::{c_char, CStr};

use crate::config::{PanicMode, RuntimeConfig};
use crate::panic::{install, runtime};

macro_rules! export_integer_ops {
    ($($ty:ty => $add:ident, $sub:ident, $mul:ident, $div:ident, $rem:ident, $shr:ident;)*) => {
        $(
            #[unsafe(no_mangle)]
            pub extern "C" fn $add(lhs: $ty, rhs: $ty) -> $ty {
                runtime().checked_add(lhs, rhs)
            }

            #[unsafe(no_mangle)]
            pub extern "C" fn $sub(lhs: $ty, rhs: $ty) -> $ty {
                runtime().checked_sub(lhs, rhs)
            }

            #[unsafe(no_mangle)]
            pub extern "C" fn $mul(lhs: $ty, rhs: $ty) -> $ty {
                runtime().checked_mul(lhs, rhs)
            }

            #[unsafe(no_mangle)]
            pub extern "C" fn $div(lhs: $ty, rhs: $ty) -> $ty {
                runtime().checked_div(lhs, rhs)
            }

            #[unsafe(no_mangle)]
            pub extern "C" fn $rem(lhs: $ty, rhs: $ty) -> $ty {
                runtime().checked_mod(lhs, rhs)
            }

            #[unsafe(no_mangle)]
            pub extern "C" fn $shr(value: $ty, steps: u32) -> $ty {
                crate::cast::arithmetic_shift_right(value, steps)
            }
        )*
    };
}

export_integer_ops! {
    i8 => tern_checked_add_i8, tern_checked_sub_i8, tern_checked_mul_i8, tern_checked_div_i8, tern_checked_mod_i8, tern_shr_i8;
    i16 => tern_checked_add_i16, tern_checked_sub_i16, tern_checked_mul_i16, tern_checked_div_i16, tern_checked_mod_i16, tern_shr_i16;
    i32 => tern_checked_add_i32, tern_checked_sub_i32, tern_checked_mul_i32, tern_checked_div_i32, tern_checked_mod_i32, tern_shr_i32;
    i64 => tern_checked_add_i64, tern_checked_sub_i64, tern_checked_mul_i64, tern_checked_div_i64, tern_checked_mod_i64, tern_shr_i64;
    u8 => tern_checked_add_u8, tern_checked_sub_u8, tern_checked_mul_u8, tern_checked_div_u8, tern_checked_mod_u8, tern_shr_u8;
    u16 => tern_checked_add_u16, tern_checked_sub_u16, tern_checked_mul_u16, tern_checked_div_u16, tern_checked_mod_u16, tern_shr_u16;
    u32 => tern_checked_add_u32, tern_checked_sub_u32, tern_checked_mul_u32, tern_checked_div_u32, tern_checked_mod_u32, tern_shr_u32;
    u64 => tern_checked_add_u64, tern_checked_sub_u64, tern_checked_mul_u64, tern_checked_div_u64, tern_checked_mod_u64, tern_shr_u64;
}

/// Install the process-wide runtime. Must run before any other runtime call
/// to take effect; returns `false` otherwise.
#[unsafe(no_mangle)]
pub extern "C" fn tern_runtime_init(continue_on_panic: bool) -> bool {
    let mode = if continue_on_panic {
        PanicMode::Continue
    } else {
        PanicMode::Abort
    };
    install(RuntimeConfig::with_panic_mode(mode))
}

/// Report a panic raised by generated code (for example an unreachable
/// state). Returns only in continue-on-panic mode.
///
/// # Safety
///
/// `message` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tern_panic(message: *const c_char) {
    if message.is_null() {
        runtime().panic("<no message>");
        return;
    }
    // SAFETY: non-null and NUL-terminated per the caller contract above.
    let text = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    runtime().panic(&text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_exports() {
        assert_eq!(tern_checked_add_i32(40, 2), 42);
        assert_eq!(tern_checked_sub_u8(10, 3), 7);
        assert_eq!(tern_checked_mul_i64(-4, 5), -20);
        assert_eq!(tern_checked_div_u16(100, 7), 14);
        assert_eq!(tern_checked_mod_i8(-7, 3), -1);
        assert_eq!(tern_shr_i16(-1024, 3), -128);
        assert_eq!(tern_shr_u32(0x8000_0000, 31), 1);
    }

    #[test]
    fn test_init_after_first_use_is_rejected() {
        let _ = runtime();
        assert!(!tern_runtime_init(true));
    }
}
