// Entry adapter: arguments in, exit code out

use std::fmt;

use tern_runtime::entry::{collect_arguments, exit_code, run_with_sink, ERROR_EXIT_CODE};
use tern_runtime::{ArgumentContainer, CapturedSink};

/// Container that only supports the two operations the adapter relies on.
#[derive(Debug, Default)]
struct Args {
    items: Vec<String>,
    appends: usize,
}

impl ArgumentContainer for Args {
    fn create_empty() -> Self {
        Args::default()
    }

    fn append(&mut self, argument: String) {
        self.appends += 1;
        self.items.push(argument);
    }
}

#[derive(Debug)]
struct MissingInput(String);

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing input file '{}'", self.0)
    }
}

fn raw(arguments: &[&str]) -> Vec<String> {
    arguments.iter().map(|argument| argument.to_string()).collect()
}

#[test]
fn test_arguments_keep_length_and_order() {
    let input = raw(&["prog", "-v", "", "second", "-v"]);
    let collected: Args = collect_arguments(input.clone());
    assert_eq!(collected.items, input);
    assert_eq!(collected.appends, 5);
}

#[test]
fn test_empty_argument_vector() {
    let collected: Args = collect_arguments(Vec::new());
    assert!(collected.items.is_empty());
}

#[test]
fn test_ok_42_exits_42() {
    let sink = CapturedSink::new();
    let code = run_with_sink(
        raw(&["prog"]),
        |_: Vec<String>| Ok::<i32, MissingInput>(42),
        &sink,
    );
    assert_eq!(code, 42);
    assert!(sink.lines().is_empty());
}

#[test]
fn test_error_exits_1_with_diagnostic() {
    let sink = CapturedSink::new();
    let code = run_with_sink(
        raw(&["prog", "input.tn"]),
        |args: Args| Err::<i64, _>(MissingInput(args.items[1].clone())),
        &sink,
    );
    assert_eq!(code, ERROR_EXIT_CODE);
    assert_eq!(code, 1);
    assert_eq!(
        sink.lines(),
        vec!["Runtime error: missing input file 'input.tn'"]
    );
}

#[test]
fn test_main_sees_every_argument() {
    let sink = CapturedSink::new();
    let code = run_with_sink(
        raw(&["prog", "a", "b", "c"]),
        |args: Vec<String>| Ok::<usize, String>(args.len()),
        &sink,
    );
    assert_eq!(code, 4);
}

#[test]
fn test_exit_code_is_truncated_to_host_range() {
    let sink = CapturedSink::new();
    assert_eq!(exit_code(Ok::<i32, String>(256), &sink), 0);
    assert_eq!(exit_code(Ok::<i32, String>(511), &sink), 255);
    assert_eq!(exit_code(Ok::<u64, String>((1 << 40) | 7), &sink), 7);
}
