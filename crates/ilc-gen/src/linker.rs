//! `nasm`/`gcc` invocation glue (§6 "Driver surface", §9 "compile flow
//! invokes `nasm -f win64 <asm> -o <obj>` followed by `gcc <obj> -o
//! output.exe`").
//!
//! This is external-collaborator territory per spec.md §1 ("invocation
//! of the external assembler and linker" is out of core scope), but the
//! commands themselves are simple enough, and specified precisely
//! enough, to ground one real implementation here rather than leave it
//! to the driver to reinvent. `ilc-drv` calls through this module
//! rather than shelling out directly.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {status}")]
    NonZeroExit { program: String, status: i32 },
}

pub type Result<T> = std::result::Result<T, ToolchainError>;

/// Which external binaries to invoke, overridable via CLI flags or
/// `ILC_NASM`/`ILC_GCC` environment variables (ilc-drv's `Config`).
#[derive(Clone, Debug)]
pub struct Toolchain {
    pub nasm: String,
    pub gcc: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self { nasm: "nasm".to_string(), gcc: "gcc".to_string() }
    }
}

impl Toolchain {
    /// Runs `nasm -f win64 <asm> -o <obj>`, matching original_source's
    /// `compiler.c::compile` command line exactly.
    pub fn assemble(&self, asm_path: &Path, obj_path: &Path) -> Result<()> {
        run(&self.nasm, &["-f", "win64", &path_str(asm_path), "-o", &path_str(obj_path)])
    }

    /// Runs `gcc <obj> -o <output>`, linking against the C runtime for
    /// `printf`.
    pub fn link(&self, obj_path: &Path, output_path: &Path) -> Result<()> {
        run(&self.gcc, &[&path_str(obj_path), "-o", &path_str(output_path)])
    }

    /// Runs the produced executable directly, for the `compile-run`
    /// driver mode, and returns its exit code.
    pub fn run_executable(&self, exe_path: &Path) -> Result<i32> {
        let program = path_str(exe_path);
        let status = Command::new(&program)
            .status()
            .map_err(|source| ToolchainError::Spawn { program: program.clone(), source })?;
        Ok(status.code().unwrap_or(1))
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn run(program: &str, args: &[&str]) -> Result<()> {
    tracing::debug!(program, ?args, "invoking toolchain command");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| ToolchainError::Spawn { program: program.to_string(), source })?;
    if !status.success() {
        return Err(ToolchainError::NonZeroExit {
            program: program.to_string(),
            status: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toolchain_uses_plain_binary_names() {
        let tc = Toolchain::default();
        assert_eq!(tc.nasm, "nasm");
        assert_eq!(tc.gcc, "gcc");
    }

    #[test]
    fn missing_binary_reports_a_spawn_error_not_a_panic() {
        let tc = Toolchain { nasm: "ilc-nasm-does-not-exist".into(), gcc: "gcc".into() };
        let err = tc.assemble(Path::new("a.asm"), Path::new("a.obj")).unwrap_err();
        assert!(matches!(err, ToolchainError::Spawn { .. }));
    }
}
