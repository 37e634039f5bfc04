//! String interning for identifier names.
//!
//! `Symbol` is a small `Copy` handle into an [`Interner`]'s table, so
//! the parser and emitter can compare identifier names with an integer
//! comparison instead of a string comparison. The interner is owned by
//! whoever drives the pipeline (the driver's `Session`, in tests a bare
//! local) and passed down by reference - there is no global table, since
//! the compiler never runs more than one of these at a time.

use rustc_hash::FxHashMap;
use std::fmt;

/// A handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Interns identifier strings and hands back [`Symbol`] handles.
///
/// # Examples
///
/// ```
/// use ilc_util::Interner;
///
/// let mut interner = Interner::new();
/// let a1 = interner.intern("a");
/// let a2 = interner.intern("a");
/// let b = interner.intern("b");
///
/// assert_eq!(a1, a2);
/// assert_ne!(a1, b);
/// assert_eq!(interner.resolve(a1), "a");
/// ```
#[derive(Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, u32>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    /// Interns `name`, returning the existing symbol if already seen.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&id) = self.lookup.get(name) {
            return Symbol(id);
        }
        let id = self.strings.len() as u32;
        let boxed: Box<str> = name.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        Symbol(id)
    }

    /// Resolves a symbol back to its string. Panics if `sym` was not
    /// produced by this interner - a cross-interner symbol is a bug in
    /// the caller, not a recoverable error.
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        let mut i = Interner::new();
        assert_eq!(i.intern("x"), i.intern("x"));
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        let mut i = Interner::new();
        assert_ne!(i.intern("x"), i.intern("y"));
    }

    #[test]
    fn resolve_round_trips() {
        let mut i = Interner::new();
        let sym = i.intern("counter");
        assert_eq!(i.resolve(sym), "counter");
    }

    #[test]
    #[should_panic]
    fn resolve_panics_on_foreign_symbol() {
        let mut a = Interner::new();
        let sym = a.intern("x");
        let b = Interner::new();
        b.resolve(sym);
    }
}
