//! Program entry adapter
//!
//! Bridges the host process and a language-level `main`: raw arguments go in
//! as an argument container (one element per argument, order preserved,
//! nothing filtered), the returned result comes out as a process exit code.
//! `Ok(v)` exits with `v` truncated to the host's 0..=255 range; `Err(e)`
//! reports `Runtime error: <e>` and exits with 1.

use std::fmt;
use std::process::ExitCode;

use crate::cast::{truncating_cast, CastSource};
use crate::panic::{DiagnosticSink, StderrSink};

/// Exit code for an entry point that returned an error
pub const ERROR_EXIT_CODE: u8 = 1;

/// Ordered, append-capable sequence handed to the language-level `main`.
pub trait ArgumentContainer: Sized {
    fn create_empty() -> Self;

    fn append(&mut self, argument: String);
}

impl ArgumentContainer for Vec<String> {
    fn create_empty() -> Self {
        Vec::new()
    }

    fn append(&mut self, argument: String) {
        self.push(argument);
    }
}

pub fn collect_arguments<C, I>(raw: I) -> C
where
    C: ArgumentContainer,
    I: IntoIterator<Item = String>,
{
    let mut arguments = C::create_empty();
    for argument in raw {
        arguments.append(argument);
    }
    arguments
}

/// Map a language-level result to an exit code, reporting errors to `sink`.
pub fn exit_code<T, E, S>(result: Result<T, E>, sink: &S) -> u8
where
    T: CastSource,
    E: fmt::Display,
    S: DiagnosticSink,
{
    match result {
        Ok(value) => truncating_cast(value),
        Err(error) => {
            sink.write_line(&format!("Runtime error: {}", error));
            ERROR_EXIT_CODE
        }
    }
}

pub fn run_with_sink<C, I, T, E, F, S>(raw: I, main: F, sink: &S) -> u8
where
    C: ArgumentContainer,
    I: IntoIterator<Item = String>,
    T: CastSource,
    E: fmt::Display,
    F: FnOnce(C) -> Result<T, E>,
    S: DiagnosticSink,
{
    let arguments = collect_arguments(raw);
    let code = exit_code(main(arguments), sink);
    log::debug!("entry point finished with exit code {}", code);
    code
}

/// Run `main` with `raw` as its arguments, reporting errors on stderr.
pub fn run<C, I, T, E, F>(raw: I, main: F) -> u8
where
    C: ArgumentContainer,
    I: IntoIterator<Item = String>,
    T: CastSource,
    E: fmt::Display,
    F: FnOnce(C) -> Result<T, E>,
{
    run_with_sink(raw, main, &StderrSink)
}

/// The process's argument vector, program name first. Arguments that are
/// not valid UTF-8 are converted lossily rather than dropped.
pub fn raw_process_arguments() -> impl Iterator<Item = String> {
    std::env::args_os().map(|argument| argument.to_string_lossy().into_owned())
}

/// Run `main` against the real process arguments.
pub fn run_process<C, T, E, F>(main: F) -> ExitCode
where
    C: ArgumentContainer,
    T: CastSource,
    E: fmt::Display,
    F: FnOnce(C) -> Result<T, E>,
{
    let raw: Vec<String> = raw_process_arguments().collect();
    log::debug!("entering program with {} argument(s)", raw.len());
    ExitCode::from(run(raw, main))
}

/// Generate the host `main` for a language-level entry point.
///
/// ```ignore
/// fn program(args: Vec<String>) -> Result<i32, String> { Ok(args.len() as i32) }
/// tern_runtime::entry_point!(program);
/// ```
#[macro_export]
macro_rules! entry_point {
    ($main:path) => {
        fn main() -> ::std::process::ExitCode {
            $crate::entry::run_process($main)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panic::CapturedSink;

    #[test]
    fn test_exit_code_success_truncates() {
        let sink = CapturedSink::new();
        assert_eq!(exit_code(Ok::<i32, String>(42), &sink), 42);
        assert_eq!(exit_code(Ok::<i32, String>(300), &sink), 44);
        assert_eq!(exit_code(Ok::<i64, String>(-1), &sink), 255);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_exit_code_error() {
        let sink = CapturedSink::new();
        let code = exit_code(Err::<i32, _>("file not found"), &sink);
        assert_eq!(code, ERROR_EXIT_CODE);
        assert_eq!(sink.lines(), vec!["Runtime error: file not found"]);
    }

    #[test]
    fn test_collect_preserves_everything() {
        let raw = vec![
            "prog".to_string(),
            String::new(),
            "--flag".to_string(),
            "prog".to_string(),
        ];
        let collected: Vec<String> = collect_arguments(raw.clone());
        assert_eq!(collected, raw);
    }
}
