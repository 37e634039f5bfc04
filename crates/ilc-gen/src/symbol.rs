//! The emitter's symbol table.
//!
//! Head-inserted, per §3's `SymbolTableEntry (name, size_bytes,
//! stack_offset, next?)`: each new symbol's offset is the previous
//! head's `offset + size` (or 0 when the table is empty), and entries
//! are never removed or mutated once pushed (I3). This is the only
//! place in the pipeline the stack frame layout is computed - the
//! prologue injector only ever reads `total_size()` back out of it.

use ilc_util::Symbol;

struct Entry {
    name: Symbol,
    size: u32,
    offset: u32,
}

/// Stack-frame layout for a single compile, built lazily as `DECLARE`
/// nodes are emitted (I4: emission never introduces symbols except via
/// `DECLARE`, and never consults the identifier registry).
#[derive(Default)]
pub struct SymbolTable {
    entries: Vec<Entry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Adds a symbol with the given byte width, per the offset rule in
    /// §3: `offset := head.offset + head.size`, 0 for the first entry.
    pub fn declare(&mut self, name: Symbol, size: u32) -> u32 {
        let offset = self.entries.last().map(|e| e.offset + e.size).unwrap_or(0);
        self.entries.push(Entry { name, size, offset });
        offset
    }

    /// Looks up `name`'s stack offset. Per I3 there is at most one
    /// entry per name actually used in emission, so the most-recent
    /// match (mirroring the registry's shadowing lookup) is also the
    /// only one that matters in practice; `rev()` keeps the two tables'
    /// lookup semantics symmetric regardless.
    pub fn offset_of(&self, name: Symbol) -> Option<u32> {
        self.entries.iter().rev().find(|e| e.name == name).map(|e| e.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total stack reservation: `head.offset + head.size`, 0 if empty
    /// (§4.4 step 4).
    pub fn total_size(&self) -> u32 {
        self.entries.last().map(|e| e.offset + e.size).unwrap_or(0)
    }
}
