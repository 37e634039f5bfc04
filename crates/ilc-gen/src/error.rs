//! Error type for the code-generation stage.
//!
//! Per §7, only I/O failures propagate out of emission as a hard error;
//! lexical/syntactic/semantic problems are reported to the shared
//! [`ilc_util::Handler`] and cause that one statement's emission to be
//! skipped (see [`crate::emit::Emitter`]). `EmitError` exists for the
//! genuine `Result`-returning boundary: writing the finished assembly
//! text to disk.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("could not write assembly output to '{path}': {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EmitError>;
