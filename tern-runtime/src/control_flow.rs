//! Control-flow propagation for generated code
//!
//! A generated expression that may short-circuit evaluates to a
//! [`ControlFlowResult`]. The nearest enclosing resolution point consumes it
//! with one of three macros, chosen by syntactic context:
//!
//! - [`resolve_return_only!`](crate::resolve_return_only): function body, no
//!   enclosing loop. `Return` returns from the function; loop signals are an
//!   upstream code generation bug.
//! - [`resolve_at_loop!`](crate::resolve_at_loop): directly inside a loop.
//!   `Return` returns, `LoopBreak` breaks, `LoopContinue` continues.
//! - [`resolve_at_loop_nested_match!`](crate::resolve_at_loop_nested_match):
//!   inside a value-producing construct (a closure wrapping a `match`) that
//!   sits in a loop. Every signal is re-wrapped and returned from the
//!   construct, so the next resolution point that really is in a loop acts on
//!   it.
//!
//! Both loop macros go through [`ControlFlowResult::into_loop_step`], so the
//! two paths cannot disagree on what a signal means.

/// Outcome of evaluating a possibly short-circuiting expression.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlFlowResult<V, R = ()> {
    /// Evaluation produced a plain value (possibly `()`)
    Value(V),
    /// The enclosing function returns this payload (`()` for void functions)
    Return(R),
    /// Exit the nearest enclosing loop
    LoopBreak,
    /// Skip to the next iteration of the nearest enclosing loop
    LoopContinue,
}

/// Non-value outcome seen by a loop-context resolution point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopExit<R> {
    Return(R),
    Break,
    Continue,
}

impl<V, R> ControlFlowResult<V, R> {
    pub fn is_value(&self) -> bool {
        matches!(self, ControlFlowResult::Value(_))
    }

    pub fn is_return(&self) -> bool {
        matches!(self, ControlFlowResult::Return(_))
    }

    pub fn is_loop_break(&self) -> bool {
        matches!(self, ControlFlowResult::LoopBreak)
    }

    pub fn is_loop_continue(&self) -> bool {
        matches!(self, ControlFlowResult::LoopContinue)
    }

    pub fn release_value(self) -> Option<V> {
        match self {
            ControlFlowResult::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn release_return(self) -> Option<R> {
        match self {
            ControlFlowResult::Return(payload) => Some(payload),
            _ => None,
        }
    }

    /// Split into the plain value or the signal a loop must act on.
    pub fn into_loop_step(self) -> Result<V, LoopExit<R>> {
        match self {
            ControlFlowResult::Value(value) => Ok(value),
            ControlFlowResult::Return(payload) => Err(LoopExit::Return(payload)),
            ControlFlowResult::LoopBreak => Err(LoopExit::Break),
            ControlFlowResult::LoopContinue => Err(LoopExit::Continue),
        }
    }

    /// Split into the plain value or the function's return payload.
    ///
    /// A loop signal here means the code generator emitted a break or
    /// continue outside of any loop. There is no value to continue with, so
    /// this terminates even in continue-on-panic mode.
    pub fn into_function_step(self) -> Result<V, R> {
        match self.into_loop_step() {
            Ok(value) => Ok(value),
            Err(LoopExit::Return(payload)) => Err(payload),
            Err(LoopExit::Break) => crate::panic::runtime()
                .panic_unrecoverable("Loop break reached a return-only resolution point"),
            Err(LoopExit::Continue) => crate::panic::runtime()
                .panic_unrecoverable("Loop continue reached a return-only resolution point"),
        }
    }
}

impl<V, R> From<LoopExit<R>> for ControlFlowResult<V, R> {
    fn from(exit: LoopExit<R>) -> Self {
        match exit {
            LoopExit::Return(payload) => ControlFlowResult::Return(payload),
            LoopExit::Break => ControlFlowResult::LoopBreak,
            LoopExit::Continue => ControlFlowResult::LoopContinue,
        }
    }
}

/// Resolve a [`ControlFlowResult`] at the top of a function body.
///
/// Evaluates to the plain value, or returns the payload from the enclosing
/// function.
#[macro_export]
macro_rules! resolve_return_only {
    ($result:expr) => {
        match $crate::control_flow::ControlFlowResult::into_function_step($result) {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(payload) => return payload,
        }
    };
}

/// Resolve a [`ControlFlowResult`] directly inside a loop body.
///
/// Accepts an optional loop label: `resolve_at_loop!('outer, expr)`.
#[macro_export]
macro_rules! resolve_at_loop {
    ($label:lifetime, $result:expr) => {
        match $crate::control_flow::ControlFlowResult::into_loop_step($result) {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err($crate::control_flow::LoopExit::Return(payload)) => {
                return payload
            }
            ::core::result::Result::Err($crate::control_flow::LoopExit::Break) => break $label,
            ::core::result::Result::Err($crate::control_flow::LoopExit::Continue) => {
                continue $label
            }
        }
    };
    ($result:expr) => {
        match $crate::control_flow::ControlFlowResult::into_loop_step($result) {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err($crate::control_flow::LoopExit::Return(payload)) => {
                return payload
            }
            ::core::result::Result::Err($crate::control_flow::LoopExit::Break) => break,
            ::core::result::Result::Err($crate::control_flow::LoopExit::Continue) => continue,
        }
    };
}

/// Resolve a [`ControlFlowResult`] inside a construct nested in a loop.
///
/// The enclosing construct must itself evaluate to a `ControlFlowResult`;
/// signals are returned from it unchanged in meaning.
#[macro_export]
macro_rules! resolve_at_loop_nested_match {
    ($result:expr) => {
        match $crate::control_flow::ControlFlowResult::into_loop_step($result) {
            ::core::result::Result::Ok(value) => value,
            ::core::result::Result::Err(exit) => {
                return $crate::control_flow::ControlFlowResult::from(exit)
            }
        }
    };
}
