//! ilc-drv - the compiler driver: session plumbing, pipeline
//! sequencing, and the `nasm`/`gcc` invocation that the specified core
//! treats as an external collaborator (spec.md §1, §6).
//!
//! This crate is deliberately thin: everything typed and pipeline-
//! specific lives in `ilc-lex`/`ilc-par`/`ilc-gen`. What's here is
//! session setup (reading the source file, building the shared
//! [`Interner`]/[`Handler`]), the four dump/compile entry points the
//! CLI's subcommands map onto, and gluing the emitted assembly to the
//! external assembler and linker.

pub mod config;
pub mod error;
pub mod pipeline;

use std::path::Path;

use ilc_util::{Handler, Interner};

pub use config::Config;
pub use error::{DriverError, Result};

/// Reads `path` and lexes it, rendering each token the way
/// original_source's `print_tokens` does - the `tokens` CLI mode.
pub fn run_tokens(path: &Path) -> Result<String> {
    let source = read_source(path)?;
    let mut handler = Handler::new();
    let tokens = pipeline::lex_stream(&source, &mut handler);
    let mut out = String::new();
    for token in &tokens {
        out.push_str(&pipeline::render_token(token));
        out.push('\n');
    }
    for diag in handler.diagnostics() {
        tracing::warn!("{diag}");
    }
    Ok(out)
}

/// Reads `path`, parses it, and pretty-prints the resulting AST - the
/// `print-ast` CLI mode (original_source's `print_full_ast`).
pub fn run_print_ast(path: &Path) -> Result<String> {
    let source = read_source(path)?;
    let mut interner = Interner::new();
    let mut handler = Handler::new();
    let nodes = pipeline::parse_stream(&source, &mut interner, &mut handler);
    let mut out = String::new();
    for node in &nodes {
        out.push_str(&pipeline::render_ast_node(node, &interner, 0));
    }
    for diag in handler.diagnostics() {
        tracing::warn!("{diag}");
    }
    Ok(out)
}

/// Runs the full lex -> parse -> emit -> inject-prologue pipeline and
/// writes the finished NASM text to `asm_path`. Shared by `run_compile`
/// and tests that only want the assembly, not a linked executable.
pub fn compile_to_assembly(path: &Path, asm_path: &Path) -> Result<usize> {
    let source = read_source(path)?;
    let mut interner = Interner::new();
    let mut handler = Handler::new();

    tracing::info!(source = %path.display(), "compiling");
    let nodes = pipeline::parse_stream(&source, &mut interner, &mut handler);

    let (body, symbols) = pipeline::emit_all(&nodes, &interner, &mut handler);
    ilc_gen::write_assembly(asm_path, &body, &symbols)?;

    let error_count = handler.diagnostics().iter().filter(|d| d.level == ilc_util::Level::Error).count();
    for diag in handler.diagnostics() {
        tracing::warn!("{diag}");
    }
    Ok(error_count)
}

/// Compiles `path` to a native executable at `config.output`, via
/// `nasm -f win64` then `gcc`, matching original_source's `compile`
/// command sequence exactly (§9 "Driver").
pub fn run_compile(path: &Path, config: &Config) -> Result<()> {
    let asm_path = config.output.with_extension("asm");
    let obj_path = config.output.with_extension("obj");

    compile_to_assembly(path, &asm_path)?;

    let toolchain = config.toolchain();
    toolchain.assemble(&asm_path, &obj_path)?;
    toolchain.link(&obj_path, &config.output)?;

    if !config.keep_temps {
        if let Err(source) = std::fs::remove_file(&obj_path) {
            return Err(DriverError::TempCleanup { path: obj_path, source });
        }
    }
    Ok(())
}

/// `compile`, then execute the produced binary and forward its exit
/// code - original_source's `compile-run` branch
/// (`return system("output.exe")`).
pub fn run_compile_and_run(path: &Path, config: &Config) -> Result<i32> {
    run_compile(path, config)?;
    tracing::info!("running {}", config.output.display());
    let code = config.toolchain().run_executable(&config.output)?;
    Ok(code)
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| DriverError::SourceRead { path: path.to_path_buf(), source })
}
