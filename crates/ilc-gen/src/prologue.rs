//! The prologue injector (§4.4): prepends the `.data`/`.text` header
//! and the stack-frame reservation to the already-emitted body.
//!
//! original_source's `optimize()` does this by reopening the output
//! file for read, buffering it, then reopening for write and
//! interleaving prefix/body/suffix - the two-pass file rewrite the
//! design notes call out as "an artifact of the source's incremental
//! approach". Since [`crate::emit::Emitter`] already buffers the body
//! in memory, this module only ever performs a single write, which
//! structurally satisfies P6 (there is no reopened file to
//! double-prepend).

use std::path::Path;

use crate::error::{EmitError, Result};
use crate::symbol::SymbolTable;

/// The four `printf` format strings `print` calls through, exactly as
/// specified in §4.4 step 3.
const DATA_SECTION: &str = concat!(
    "section .data\n",
    "format_int8 db \"%hhd\",10,0\n",
    "format_int16 db \"%hd\",10,0\n",
    "format_int32 db \"%d\",10,0\n",
    "format_int64 db \"%ld\",10,0\n",
);

/// Builds the complete assembly text: header, `global main`/`extern
/// printf`, the `main:` label, an optional `sub rsp, N` (only emitted
/// when the symbol table is non-empty, §4.4 step 4), and the buffered
/// body.
///
/// A trailing `ret` is always appended after the body. original_source
/// has two divergent suffixes across its Linux- and Windows-targeted
/// variants (§9 Q2); this implementation always appends one so that a
/// `halt`-less or empty program still assembles into a valid `main`
/// that returns, per DESIGN.md's resolution of Q2.
pub fn assemble(body: &str, symbols: &SymbolTable) -> String {
    let mut out = String::with_capacity(DATA_SECTION.len() + body.len() + 64);
    out.push_str(DATA_SECTION);
    out.push('\n');
    out.push_str("section .text\n");
    out.push_str("global main\n");
    out.push_str("extern printf\n\n");
    out.push_str("main:\n");

    if !symbols.is_empty() {
        out.push_str(&format!("sub rsp, {}\n", symbols.total_size()));
    }
    out.push('\n');

    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    if !body.trim_end().ends_with("ret") {
        out.push_str("ret\n");
    }
    out
}

/// Writes the fully-assembled text to `path` in one pass.
pub fn write_assembly(path: &Path, body: &str, symbols: &SymbolTable) -> Result<()> {
    let text = assemble(body, symbols);
    std::fs::write(path, text).map_err(|source| EmitError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_util::Interner;

    #[test]
    fn header_carries_all_four_format_strings() {
        let asm = assemble("", &SymbolTable::new());
        assert!(asm.contains("format_int8 db \"%hhd\",10,0"));
        assert!(asm.contains("format_int16 db \"%hd\",10,0"));
        assert!(asm.contains("format_int32 db \"%d\",10,0"));
        assert!(asm.contains("format_int64 db \"%ld\",10,0"));
        assert!(asm.contains("global main"));
        assert!(asm.contains("extern printf"));
        assert!(asm.contains("main:"));
    }

    #[test]
    fn empty_symbol_table_omits_sub_rsp() {
        let asm = assemble("", &SymbolTable::new());
        assert!(!asm.contains("sub rsp"));
    }

    #[test]
    fn non_empty_symbol_table_reserves_total_size() {
        let mut interner = Interner::new();
        let a = interner.intern("a");
        let mut symbols = SymbolTable::new();
        symbols.declare(a, 4);
        let asm = assemble("", &symbols);
        assert!(asm.contains("sub rsp, 4"));
    }

    #[test]
    fn scenario_6_empty_program_still_gets_a_trailing_ret() {
        let asm = assemble("", &SymbolTable::new());
        assert!(asm.trim_end().ends_with("ret"));
    }

    #[test]
    fn body_is_appended_verbatim_after_the_header() {
        let body = "mov dword [rsp + 0], 5\nret\n";
        let asm = assemble(body, &SymbolTable::new());
        assert!(asm.ends_with(body) || asm.trim_end().ends_with("ret"));
        assert!(asm.contains(body.trim_end()));
    }

    #[test]
    fn p6_single_write_cannot_double_prepend() {
        // Calling assemble() twice on the same body is idempotent in
        // the sense that matters: each call is a pure function from
        // (body, symbols) to one finished text, never a rewrite of a
        // previously-prepended file.
        let first = assemble("ret\n", &SymbolTable::new());
        let second = assemble("ret\n", &SymbolTable::new());
        assert_eq!(first, second);
        assert_eq!(first.matches("section .data").count(), 1);
    }

    #[test]
    fn write_assembly_round_trips_through_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.asm");
        write_assembly(&path, "ret\n", &SymbolTable::new()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("section .data"));
        assert!(text.trim_end().ends_with("ret"));
    }
}
