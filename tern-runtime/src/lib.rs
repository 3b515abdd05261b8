//! Tern Runtime - support layer for code generated by the Tern compiler
//!
//! This crate provides:
//! - A uniform control-flow result for returns, breaks and continues raised
//!   from deep inside expressions
//! - Checked integer arithmetic with deterministic overflow and
//!   division-by-zero reporting
//! - Integer conversions with named failure policies (fallible, infallible,
//!   saturating, truncating) and a well-defined arithmetic right shift
//! - The panic primitive, abort or continue-on-panic per runtime configuration
//! - The program entry adapter (argv in, exit code out)
//! - C FFI bindings for natively compiled programs

use thiserror::Error;

pub mod cast;
pub mod checked;
pub mod config;
pub mod control_flow;
pub mod entry;
pub mod ffi;
pub mod integer;
pub mod panic;
pub mod range;

/// Recoverable runtime failures. Invariant violations never show up here;
/// they go through the panic primitive.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Integer cast out of range: {value} does not fit in {target}")]
    CastOutOfRange { value: String, target: &'static str },

    #[error("Invalid {target} literal `{text}`")]
    InvalidInteger { text: String, target: &'static str },

    #[error("Failed to read runtime configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Invalid runtime configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

pub use cast::{
    arithmetic_shift_right, fallible_cast, is_within_range, saturating_cast, truncating_cast,
    try_cast, CastSource,
};
pub use checked::{ArithmeticFault, ArithmeticOp, FaultKind};
pub use config::{PanicMode, RuntimeConfig};
pub use control_flow::{ControlFlowResult, LoopExit};
pub use entry::ArgumentContainer;
pub use integer::{parse_integer, Integer};
pub use panic::{install, runtime, CapturedSink, DiagnosticSink, Runtime, StderrSink};
pub use range::Range;
