use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use tern_runtime::cast;
use tern_runtime::config::CONFIG_FILE_NAME;
use tern_runtime::{
    parse_integer, runtime, ArithmeticOp, CastSource, Integer, PanicMode, RuntimeConfig,
};

#[derive(Parser)]
#[command(name = "tern")]
#[command(version = "0.2.0")]
#[command(about = "Tern runtime driver", long_about = None)]
struct Cli {
    /// Report panics and keep going instead of terminating
    #[arg(long, global = true)]
    continue_on_panic: bool,

    /// Runtime configuration file (default: nearest tern-runtime.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one checked arithmetic operation
    Arith {
        #[arg(value_enum)]
        op: OpArg,

        /// Operand and result type
        #[arg(value_enum, value_name = "TYPE")]
        ty: IntType,

        #[arg(allow_hyphen_values = true)]
        lhs: String,

        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },

    /// Convert a value between integer types
    Cast {
        #[arg(value_enum)]
        policy: CastPolicy,

        #[arg(value_enum)]
        from: IntType,

        #[arg(value_enum)]
        to: IntType,

        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Arithmetic right shift (sign-extending for signed types)
    Shr {
        #[arg(value_enum, value_name = "TYPE")]
        ty: IntType,

        #[arg(allow_hyphen_values = true)]
        value: String,

        steps: u32,
    },

    /// Print the argument container the program received, one per line
    Args {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        rest: Vec<String>,
    },

    /// Finish with this result; the exit code is its low 8 bits
    Exit {
        #[arg(allow_hyphen_values = true)]
        code: i64,
    },

    /// Finish with an error result
    Fail {
        /// Error description
        message: String,
    },

    /// Print the effective runtime configuration
    Config {
        /// Write it to tern-runtime.json in the current directory
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OpArg {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl From<OpArg> for ArithmeticOp {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::Add => ArithmeticOp::Add,
            OpArg::Sub => ArithmeticOp::Sub,
            OpArg::Mul => ArithmeticOp::Mul,
            OpArg::Div => ArithmeticOp::Div,
            OpArg::Mod => ArithmeticOp::Mod,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CastPolicy {
    /// Print `none` when the value does not fit
    Fallible,
    /// Panic when the value does not fit
    Infallible,
    /// Clamp to the target bounds
    Saturating,
    /// Keep the low bits
    Truncating,
    /// Fail with a runtime error when the value does not fit
    Try,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntType {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

/// Bind `$alias` to the Rust type named by an `IntType` and evaluate `$body`.
macro_rules! with_int_type {
    ($ty:expr, $alias:ident => $body:expr) => {
        match $ty {
            IntType::I8 => {
                type $alias = i8;
                $body
            }
            IntType::I16 => {
                type $alias = i16;
                $body
            }
            IntType::I32 => {
                type $alias = i32;
                $body
            }
            IntType::I64 => {
                type $alias = i64;
                $body
            }
            IntType::I128 => {
                type $alias = i128;
                $body
            }
            IntType::Isize => {
                type $alias = isize;
                $body
            }
            IntType::U8 => {
                type $alias = u8;
                $body
            }
            IntType::U16 => {
                type $alias = u16;
                $body
            }
            IntType::U32 => {
                type $alias = u32;
                $body
            }
            IntType::U64 => {
                type $alias = u64;
                $body
            }
            IntType::U128 => {
                type $alias = u128;
                $body
            }
            IntType::Usize => {
                type $alias = usize;
                $body
            }
        }
    };
}

fn arith<T: Integer>(op: ArithmeticOp, lhs: &str, rhs: &str) -> Result<String> {
    let lhs: T = parse_integer(lhs)?;
    let rhs: T = parse_integer(rhs)?;
    Ok(runtime().checked(op, lhs, rhs).to_string())
}

fn convert<F, T>(policy: CastPolicy, value: &str) -> Result<String>
where
    F: Integer + CastSource,
    T: Integer,
{
    let value: F = parse_integer(value)?;
    let converted = match policy {
        CastPolicy::Fallible => match cast::fallible_cast::<T, F>(value) {
            Some(converted) => converted.to_string(),
            None => "none".to_string(),
        },
        CastPolicy::Infallible => runtime().infallible_cast::<T, F>(value).to_string(),
        CastPolicy::Saturating => cast::saturating_cast::<T, F>(value).to_string(),
        CastPolicy::Truncating => cast::truncating_cast::<T, F>(value).to_string(),
        CastPolicy::Try => cast::try_cast::<T, F>(value)?.to_string(),
    };
    Ok(converted)
}

fn shift<T: Integer>(value: &str, steps: u32) -> Result<String> {
    let value: T = parse_integer(value)?;
    Ok(cast::arithmetic_shift_right(value, steps).to_string())
}

/// Config file (explicit or nearest), then environment, then command line.
fn resolve_config(cli: &Cli) -> Result<RuntimeConfig> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => RuntimeConfig::from_dir(std::env::current_dir()?)?,
    };

    let mut config = config.with_env_overrides();
    if cli.continue_on_panic {
        config.panic_mode = PanicMode::Continue;
    }
    Ok(config)
}

/// Fix the process-wide runtime to `config`. Errors when a runtime with a
/// different panic mode is already in place.
fn install_runtime(config: &RuntimeConfig) -> Result<()> {
    log::info!("panic mode: {:?}", config.panic_mode);
    if !tern_runtime::install(config.clone()) && runtime().mode() != config.panic_mode {
        bail!(
            "Runtime already installed with panic mode {:?}, cannot apply {:?}",
            runtime().mode(),
            config.panic_mode
        );
    }
    Ok(())
}

fn program_main(args: Vec<String>) -> Result<i64> {
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here with exit code 0
            let code = err.exit_code();
            err.print()?;
            return Ok(i64::from(code));
        }
    };

    let config = resolve_config(&cli)?;
    install_runtime(&config)?;

    match cli.command {
        Commands::Arith { op, ty, lhs, rhs } => {
            let result = with_int_type!(ty, T => arith::<T>(op.into(), &lhs, &rhs))?;
            println!("{}", result);
            Ok(0)
        }

        Commands::Cast {
            policy,
            from,
            to,
            value,
        } => {
            let result =
                with_int_type!(from, F => with_int_type!(to, T => convert::<F, T>(policy, &value)))?;
            println!("{}", result);
            Ok(0)
        }

        Commands::Shr { ty, value, steps } => {
            let result = with_int_type!(ty, T => shift::<T>(&value, steps))?;
            println!("{}", result);
            Ok(0)
        }

        Commands::Args { rest } => {
            log::debug!("{} argument(s) after the subcommand", rest.len());
            for argument in &args {
                println!("{}", argument);
            }
            Ok(0)
        }

        Commands::Exit { code } => Ok(code),

        Commands::Fail { message } => bail!("{}", message),

        Commands::Config { init } => {
            if init {
                let path = std::env::current_dir()?.join(CONFIG_FILE_NAME);
                if path.exists() {
                    bail!("{} already exists", path.display());
                }
                config
                    .save(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Created {}", path.display());
            } else {
                println!("{}", config.to_json()?);
            }
            Ok(0)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    tern_runtime::entry::run_process(program_main)
}
