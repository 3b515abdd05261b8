// Checked arithmetic for generated code
//
// Each operation takes both operands and the result in one integer type, with
// no implicit widening. Overflow and zero divisors are invariant violations:
// they are reported through the panic primitive, never as recoverable errors.

use std::fmt;

use thiserror::Error;

use crate::integer::Integer;
use crate::panic::{DiagnosticSink, Runtime};

/// Checked binary operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    /// Noun used in diagnostics ("checked addition")
    pub fn noun(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "addition",
            ArithmeticOp::Sub => "subtraction",
            ArithmeticOp::Mul => "multiplication",
            ArithmeticOp::Div => "division",
            ArithmeticOp::Mod => "modulo",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Overflow,
    DivisionByZero,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Overflow => write!(f, "Overflow"),
            FaultKind::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

/// Why a checked operation had no representable result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in checked {} '{lhs} {} {rhs}'", .op.noun(), .op.symbol())]
pub struct ArithmeticFault {
    pub op: ArithmeticOp,
    pub kind: FaultKind,
    pub lhs: String,
    pub rhs: String,
}

/// A faulted operation together with the value continue mode hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faulted<T> {
    pub fallback: T,
    pub fault: ArithmeticFault,
}

/// Evaluate `lhs op rhs` exactly.
///
/// On overflow the fallback is the two's-complement wrapped result. A zero
/// divisor leaves the dividend as the fallback. `MIN / -1` and `MIN % -1`
/// are overflows, not zero divisors.
pub fn evaluate<T: Integer>(op: ArithmeticOp, lhs: T, rhs: T) -> Result<T, Faulted<T>> {
    let outcome = match op {
        ArithmeticOp::Add => Some(lhs.overflowing_add(rhs)),
        ArithmeticOp::Sub => Some(lhs.overflowing_sub(rhs)),
        ArithmeticOp::Mul => Some(lhs.overflowing_mul(rhs)),
        ArithmeticOp::Div => lhs.overflowing_div(rhs),
        ArithmeticOp::Mod => lhs.overflowing_rem(rhs),
    };

    let (fallback, kind) = match outcome {
        Some((result, false)) => return Ok(result),
        Some((wrapped, true)) => (wrapped, FaultKind::Overflow),
        None => (lhs, FaultKind::DivisionByZero),
    };

    Err(Faulted {
        fallback,
        fault: ArithmeticFault {
            op,
            kind,
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        },
    })
}

impl<S: DiagnosticSink> Runtime<S> {
    /// Apply `op`, panicking on overflow or a zero divisor.
    pub fn checked<T: Integer>(&self, op: ArithmeticOp, lhs: T, rhs: T) -> T {
        match evaluate(op, lhs, rhs) {
            Ok(result) => result,
            Err(faulted) => {
                self.panic(&faulted.fault.to_string());
                faulted.fallback
            }
        }
    }

    pub fn checked_add<T: Integer>(&self, lhs: T, rhs: T) -> T {
        self.checked(ArithmeticOp::Add, lhs, rhs)
    }

    pub fn checked_sub<T: Integer>(&self, lhs: T, rhs: T) -> T {
        self.checked(ArithmeticOp::Sub, lhs, rhs)
    }

    pub fn checked_mul<T: Integer>(&self, lhs: T, rhs: T) -> T {
        self.checked(ArithmeticOp::Mul, lhs, rhs)
    }

    pub fn checked_div<T: Integer>(&self, lhs: T, rhs: T) -> T {
        self.checked(ArithmeticOp::Div, lhs, rhs)
    }

    pub fn checked_mod<T: Integer>(&self, lhs: T, rhs: T) -> T {
        self.checked(ArithmeticOp::Mod, lhs, rhs)
    }
}

/// Checked addition through the process-wide runtime
pub fn checked_add<T: Integer>(lhs: T, rhs: T) -> T {
    crate::panic::runtime().checked_add(lhs, rhs)
}

/// Checked subtraction through the process-wide runtime
pub fn checked_sub<T: Integer>(lhs: T, rhs: T) -> T {
    crate::panic::runtime().checked_sub(lhs, rhs)
}

/// Checked multiplication through the process-wide runtime
pub fn checked_mul<T: Integer>(lhs: T, rhs: T) -> T {
    crate::panic::runtime().checked_mul(lhs, rhs)
}

/// Checked division through the process-wide runtime
pub fn checked_div<T: Integer>(lhs: T, rhs: T) -> T {
    crate::panic::runtime().checked_div(lhs, rhs)
}

/// Checked modulo through the process-wide runtime
pub fn checked_mod<T: Integer>(lhs: T, rhs: T) -> T {
    crate::panic::runtime().checked_mod(lhs, rhs)
}
