//! ilc-gen - the code emitter, prologue injector, and toolchain glue.
//!
//! [`emit::Emitter`] walks the typed AST in source order, mutating a
//! [`symbol::SymbolTable`] on `declare` and buffering NASM text for
//! everything else (§4.3). [`prologue::assemble`] then prepends the
//! `.data`/`.text` header and stack reservation the injector stage
//! specifies (§4.4). [`linker::Toolchain`] shells out to `nasm` and
//! `gcc` to turn the finished assembly into a native executable (§6).

pub mod emit;
pub mod error;
pub mod linker;
pub mod prologue;
pub mod registers;
pub mod symbol;

pub use emit::Emitter;
pub use error::{EmitError, Result};
pub use linker::{Toolchain, ToolchainError};
pub use prologue::{assemble, write_assembly};
pub use registers::{format_label, registers_for, PrimitiveRegisters};
pub use symbol::SymbolTable;
