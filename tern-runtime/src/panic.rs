//! Panic primitive
//!
//! The one side-effecting primitive of the runtime. A panic writes
//! `Panic: <message>` to a diagnostic sink, then either aborts the process
//! (abort mode) or returns to the caller so it can hand back its
//! otherwise-invalid result (continue mode). Nothing marks values produced
//! after a continued panic as tainted.
//!
//! The panic mode is carried by a [`Runtime`] context instead of a global
//! constant so it can be exercised in tests; [`install`] and [`runtime`]
//! provide the single process-wide instance generated code talks to.

use std::sync::{Mutex, OnceLock};

use crate::config::{PanicMode, RuntimeConfig};

/// Destination for runtime diagnostics
pub trait DiagnosticSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes diagnostics to the process's standard error stream
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn write_line(&self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct CapturedSink {
    lines: Mutex<Vec<String>>,
}

impl CapturedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for CapturedSink {
    fn write_line(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn write_line(&self, line: &str) {
        (**self).write_line(line)
    }
}

/// Runtime context: the panic mode plus where diagnostics go.
#[derive(Debug)]
pub struct Runtime<S = StderrSink> {
    mode: PanicMode,
    sink: S,
}

impl Runtime<StderrSink> {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self::with_sink(config.panic_mode, StderrSink)
    }
}

impl Default for Runtime<StderrSink> {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}

impl<S: DiagnosticSink> Runtime<S> {
    pub fn with_sink(mode: PanicMode, sink: S) -> Self {
        Self { mode, sink }
    }

    pub fn mode(&self) -> PanicMode {
        self.mode
    }

    pub fn continues_on_panic(&self) -> bool {
        self.mode == PanicMode::Continue
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Report `message`. Returns only in continue mode.
    pub fn panic(&self, message: &str) {
        self.sink.write_line(&format!("Panic: {}", message));
        if self.continues_on_panic() {
            return;
        }
        terminate(message)
    }

    /// Report a state that leaves no value to continue with. Terminates in
    /// both modes.
    pub fn panic_unrecoverable(&self, message: &str) -> ! {
        self.panic(message);
        terminate(message)
    }
}

/// Fatal path of the panic primitive. Aborts the process: no unwind, so
/// `catch_unwind` or a joining thread cannot keep running past it.
#[cfg(not(test))]
#[cold]
#[inline(never)]
fn terminate(message: &str) -> ! {
    log::debug!("aborting after fatal panic: {}", message);
    std::process::abort()
}

// Unit tests observe the fatal path with `#[should_panic]`.
#[cfg(test)]
#[allow(clippy::panic)]
fn terminate(message: &str) -> ! {
    panic!("{}", message)
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Fix the process-wide runtime. Returns `false` (and changes nothing) when a
/// runtime is already in place.
pub fn install(config: RuntimeConfig) -> bool {
    let mut installed = false;
    RUNTIME.get_or_init(|| {
        installed = true;
        Runtime::new(&config)
    });

    if installed {
        log::debug!("installed runtime with panic mode {:?}", config.panic_mode);
    } else {
        log::warn!(
            "runtime already installed, ignoring panic mode {:?}",
            config.panic_mode
        );
    }
    installed
}

/// The process-wide runtime. Installs the build-time default (plus the
/// environment override) on first use.
pub fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        let config = RuntimeConfig::from_env();
        log::debug!("installing default runtime, panic mode {:?}", config.panic_mode);
        Runtime::new(&config)
    })
}

/// Panic through the process-wide runtime.
pub fn emit(message: &str) {
    runtime().panic(message)
}
