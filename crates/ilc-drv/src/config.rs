//! Driver configuration: output path, temp-file handling, and the
//! `nasm`/`gcc` binary overrides, env-overridable the way the
//! teacher's `faxt` CLI makes its global flags `env`-backed.

use std::path::PathBuf;

use ilc_gen::Toolchain;

/// Resolved settings for one `compile`/`compile-run` invocation.
#[derive(Clone, Debug)]
pub struct Config {
    /// Output executable path. Defaults to `output.exe` next to the
    /// working directory, matching original_source's hardcoded name.
    pub output: PathBuf,
    /// Keep the intermediate `.asm`/`.obj` files instead of removing
    /// the object file after a successful link (original_source
    /// always removes it; this is an explicit, documented deviation
    /// for debugging).
    pub keep_temps: bool,
    pub nasm: String,
    pub gcc: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from("output.exe"),
            keep_temps: false,
            nasm: std::env::var("ILC_NASM").unwrap_or_else(|_| "nasm".to_string()),
            gcc: std::env::var("ILC_GCC").unwrap_or_else(|_| "gcc".to_string()),
        }
    }
}

impl Config {
    pub fn toolchain(&self) -> Toolchain {
        Toolchain { nasm: self.nasm.clone(), gcc: self.gcc.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_matches_original_source_name() {
        assert_eq!(Config::default().output, PathBuf::from("output.exe"));
    }

    #[test]
    fn default_does_not_keep_temps() {
        assert!(!Config::default().keep_temps);
    }

    #[test]
    fn toolchain_carries_the_configured_binary_names() {
        let config = Config {
            output: PathBuf::from("out.exe"),
            keep_temps: true,
            nasm: "my-nasm".to_string(),
            gcc: "my-gcc".to_string(),
        };
        let toolchain = config.toolchain();
        assert_eq!(toolchain.nasm, "my-nasm");
        assert_eq!(toolchain.gcc, "my-gcc");
    }
}
