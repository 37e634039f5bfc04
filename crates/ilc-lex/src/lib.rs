//! ilc-lex - the IL tokenizer.
//!
//! Pulls [`Token`]s one at a time off a byte-level [`Cursor`]. See
//! [`Lexer::next_token`] for the scanning algorithm and the module docs
//! on [`token`] for the token and primitive models it produces.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{Primitive, Token, TokenKind};
