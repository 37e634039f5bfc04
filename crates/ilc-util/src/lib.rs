//! ilc-util - shared foundation types for the ilc pipeline
//!
//! Every other crate in the workspace (`ilc-lex`, `ilc-par`, `ilc-gen`,
//! `ilc-drv`) depends on this one. It carries the three things that are
//! not specific to any single pipeline stage:
//!
//! - [`span`] - byte-offset source locations, for pointing a diagnostic
//!   at the statement that caused it.
//! - [`symbol`] - string interning for identifier names, so the parser
//!   and emitter compare names by integer rather than by string.
//! - [`diagnostic`] - the `Handler`/`Diagnostic` pair every stage reports
//!   errors through, so a bad statement is recorded and skipped rather
//!   than aborting the whole compile.
//!
//! The compiler this crate supports is strictly single-threaded and
//! single-pass, so nothing here reaches for `Arc`, `DashMap`, or other
//! cross-thread machinery - a single owned `Interner` and `Handler` are
//! threaded through the pipeline by reference instead.

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::Span;
pub use symbol::{Interner, Symbol};
