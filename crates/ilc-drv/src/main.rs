//! `ilc` - the IL compiler CLI.
//!
//! One positional source path plus a subcommand selecting one of the
//! four modes spec.md §6 names: `tokens`, `print-ast`, `compile`,
//! `compile-run`. Mirrors the teacher's `faxt` CLI shape (clap derive,
//! `tracing`/`tracing-subscriber` logging wired up the same way) rather
//! than original_source's bare `argv[1]` dispatch.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ilc_drv::Config;

/// ilc - a single-pass compiler for a minimal typed IL.
#[derive(Parser, Debug)]
#[command(name = "ilc")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles IL source to x86-64 NASM and, optionally, a native executable")]
struct Cli {
    /// Enable debug-level logging.
    #[arg(short, long, global = true, env = "ILC_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lex the source file and print its token stream.
    Tokens {
        /// Path to the IL source file.
        source: PathBuf,
    },
    /// Parse the source file and print its AST.
    PrintAst {
        /// Path to the IL source file.
        source: PathBuf,
    },
    /// Compile the source file to a native executable via nasm/gcc.
    Compile {
        /// Path to the IL source file.
        source: PathBuf,

        /// Output executable path.
        #[arg(short, long, default_value = "output.exe")]
        output: PathBuf,

        /// Keep the intermediate .obj file instead of removing it
        /// after a successful link.
        #[arg(long)]
        keep_temps: bool,

        /// Override the `nasm` binary to invoke.
        #[arg(long, env = "ILC_NASM", default_value = "nasm")]
        nasm: String,

        /// Override the `gcc` binary to invoke.
        #[arg(long, env = "ILC_GCC", default_value = "gcc")]
        gcc: String,
    },
    /// Compile the source file, then run the produced executable and
    /// forward its exit code.
    CompileRun {
        /// Path to the IL source file.
        source: PathBuf,

        #[arg(short, long, default_value = "output.exe")]
        output: PathBuf,

        #[arg(long)]
        keep_temps: bool,

        #[arg(long, env = "ILC_NASM", default_value = "nasm")]
        nasm: String,

        #[arg(long, env = "ILC_GCC", default_value = "gcc")]
        gcc: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::from_default_env() };
    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);

    // `try_init` rather than `init`: integration tests that invoke this
    // binary multiple times in-process would otherwise panic on the
    // second global-subscriber registration.
    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}

fn run(command: Commands) -> anyhow::Result<i32> {
    match command {
        Commands::Tokens { source } => {
            print!("{}", ilc_drv::run_tokens(&source)?);
            Ok(0)
        }
        Commands::PrintAst { source } => {
            print!("{}", ilc_drv::run_print_ast(&source)?);
            Ok(0)
        }
        Commands::Compile { source, output, keep_temps, nasm, gcc } => {
            let config = Config { output, keep_temps, nasm, gcc };
            ilc_drv::run_compile(&source, &config)?;
            Ok(0)
        }
        Commands::CompileRun { source, output, keep_temps, nasm, gcc } => {
            let config = Config { output, keep_temps, nasm, gcc };
            Ok(ilc_drv::run_compile_and_run(&source, &config)?)
        }
    }
}
