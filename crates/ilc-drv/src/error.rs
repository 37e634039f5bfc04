//! Driver-level error type.
//!
//! Per spec.md §7, only I/O and external-tool failures ever reach the
//! driver as a hard `Result::Err` - lexical/syntactic/semantic problems
//! are reported through the shared [`ilc_util::Handler`] and simply
//! drop the offending statement. `DriverError` covers exactly the
//! genuine failure boundaries §6 lists: "cannot open file `nasm`
//! assembler failure, or linker failure", plus reading the source file
//! and writing the assembly output.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read source file '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compilation aborted: {0} error(s) reported")]
    CompilationFailed(usize),

    #[error(transparent)]
    Emit(#[from] ilc_gen::EmitError),

    #[error(transparent)]
    Toolchain(#[from] ilc_gen::ToolchainError),

    #[error("could not remove temporary file '{path}': {source}")]
    TempCleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DriverError>;
