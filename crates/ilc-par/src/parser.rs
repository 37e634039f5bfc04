//! Recursive-descent parser, one token of lookahead.
//!
//! `Parser` owns the `Lexer` it pulls from and the single "current
//! token" slot the grammar is defined over (LL(1) with a single global
//! "current token" slot), plus the identifier registry that gives
//! identifier references their type. All three are fields on one
//! struct rather than module-level globals - `Parser` is its own
//! parsing context, since nothing else needs to share that state.
//!
//! Each grammar production is a method returning [`ParseOutcome`]:
//! `Matched` carries the node, `NoMatch` means the production's leading
//! token didn't fire (try the next alternative, no tokens consumed),
//! and `Error` means a diagnostic has already been reported and the
//! statement is abandoned. This is an explicit three-way split rather
//! than a single null-sentinel return value doing double duty for
//! "didn't match" and "matched but failed".

use ilc_lex::{Lexer, Primitive, Token, TokenKind};
use ilc_util::{Handler, Interner, Span, Symbol};

use crate::ast::{AstNode, BinOp};
use crate::registry::IdentifierRegistry;
use crate::resolve::resolve;

/// The result of attempting one grammar production.
pub enum ParseOutcome {
    /// The production's leading token fired and a node was built.
    Matched(AstNode),
    /// The production's leading token didn't match; no tokens consumed,
    /// no diagnostic reported - the caller should try another
    /// alternative.
    NoMatch,
    /// The production's leading token matched but parsing failed after
    /// that; a diagnostic has already been reported and the statement
    /// is abandoned.
    Error,
}

impl ParseOutcome {
    fn into_option(self) -> Option<AstNode> {
        match self {
            ParseOutcome::Matched(node) => Some(node),
            ParseOutcome::NoMatch | ParseOutcome::Error => None,
        }
    }
}

/// Parses one IL source file into a sequence of top-level instruction
/// nodes, threading the current token and identifier registry through
/// every production.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    registry: IdentifierRegistry,
    interner: &'a mut Interner,
}

impl<'a> Parser<'a> {
    /// Builds a parser and primes `current` with the first token.
    pub fn new(source: &'a [u8], interner: &'a mut Interner, handler: &mut Handler) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token(handler);
        Parser { lexer, current, registry: IdentifierRegistry::new(), interner }
    }

    /// Parses every top-level instruction until `EOF`, skipping any
    /// statement that failed to parse and resuming with whatever token
    /// is current.
    pub fn parse_program(&mut self, handler: &mut Handler) -> Vec<AstNode> {
        let mut nodes = Vec::new();
        while self.current.kind != TokenKind::Eof {
            match self.parse_instruction(handler) {
                ParseOutcome::Matched(node) => nodes.push(node),
                ParseOutcome::NoMatch => {
                    handler.error(
                        format!("unexpected token '{}'", self.current.kind.name()),
                        self.current.span,
                    );
                    self.advance(handler);
                }
                ParseOutcome::Error => {
                    // Diagnostic already reported by the failing production.
                }
            }
        }
        nodes
    }

    fn advance(&mut self, handler: &mut Handler) {
        self.current = self.lexer.next_token(handler);
    }

    /// Consumes whatever token is current without checking its kind -
    /// `declare` and `store` both "consume a comma" this way rather
    /// than validating that a comma was actually there.
    fn consume_positionally(&mut self, handler: &mut Handler) {
        self.advance(handler);
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    // ------------------------------------------------------------------
    // instruction := declare | store | add | sub | mul | div | print | halt
    // ------------------------------------------------------------------

    fn parse_instruction(&mut self, handler: &mut Handler) -> ParseOutcome {
        match self.parse_declare(handler) {
            ParseOutcome::NoMatch => {}
            other => return other,
        }
        match self.parse_store(handler) {
            ParseOutcome::NoMatch => {}
            other => return other,
        }
        match self.parse_binary_instruction(handler) {
            ParseOutcome::NoMatch => {}
            other => return other,
        }
        match self.parse_print(handler) {
            ParseOutcome::NoMatch => {}
            other => return other,
        }
        self.parse_halt(handler)
    }

    /// `declare IDENTIFIER ',' type`
    fn parse_declare(&mut self, handler: &mut Handler) -> ParseOutcome {
        if !self.at(TokenKind::Declare) {
            return ParseOutcome::NoMatch;
        }
        let start = self.current.span;
        self.advance(handler);

        let Some((name, ident_span)) = self.expect_raw_identifier(handler) else {
            handler.error("expected identifier after 'declare'", self.current.span);
            return ParseOutcome::Error;
        };
        self.consume_positionally(handler); // comma

        let Some(primitive) = self.current.kind.as_declared_type() else {
            handler.error(
                format!("expected a type name after 'declare {}, '", self.interner.resolve(name)),
                self.current.span,
            );
            return ParseOutcome::Error;
        };
        let span = start.to(self.current.span);
        self.advance(handler);

        self.registry.declare(name, primitive);
        ParseOutcome::Matched(AstNode::Declare { name, primitive, span: span.to(ident_span) })
    }

    /// `store IDENTIFIER ',' (VALUE_INT | operation)`
    fn parse_store(&mut self, handler: &mut Handler) -> ParseOutcome {
        if !self.at(TokenKind::Store) {
            return ParseOutcome::NoMatch;
        }
        let start = self.current.span;
        self.advance(handler);

        let ident = match self.parse_identifier_reference(handler) {
            ParseOutcome::Matched(node) => node,
            ParseOutcome::NoMatch => {
                handler.error("expected identifier after 'store'", self.current.span);
                return ParseOutcome::Error;
            }
            ParseOutcome::Error => return ParseOutcome::Error,
        };
        self.consume_positionally(handler); // comma

        let rhs = if self.at(TokenKind::ValueInt) {
            self.parse_value_int(handler).into_option()
        } else {
            self.parse_operation(handler).into_option()
        };
        let Some(rhs) = rhs else {
            handler.error(
                "expected an integer value or an operation after 'store ..., '",
                self.current.span,
            );
            return ParseOutcome::Error;
        };

        let span = start.to(rhs.span());
        ParseOutcome::Matched(AstNode::Store { ident: Box::new(ident), rhs: Box::new(rhs), span })
    }

    /// `operation := add | sub | mul | div` (a `store` right-hand side).
    fn parse_operation(&mut self, handler: &mut Handler) -> ParseOutcome {
        self.parse_binary_instruction(handler)
    }

    /// One of `add`/`sub`/`mul`/`div operand ',' operand`, usable either
    /// as a top-level instruction or as a `store` operand - both cases
    /// share this production since the grammar shape is identical.
    fn parse_binary_instruction(&mut self, handler: &mut Handler) -> ParseOutcome {
        let op = match self.current.kind {
            TokenKind::Add => BinOp::Add,
            TokenKind::Sub => BinOp::Sub,
            TokenKind::Mul => BinOp::Mul,
            TokenKind::Div => BinOp::Div,
            _ => return ParseOutcome::NoMatch,
        };
        let start = self.current.span;
        self.advance(handler);

        let Some(left) = self.parse_operand(handler) else {
            handler.error(format!("expected an operand after '{}'", op.mnemonic()), self.current.span);
            return ParseOutcome::Error;
        };
        self.consume_positionally(handler); // comma

        let Some(right) = self.parse_operand(handler) else {
            handler.error(
                format!("expected an operand after the comma in '{}'", op.mnemonic()),
                self.current.span,
            );
            return ParseOutcome::Error;
        };

        let primitive = resolve(&left, &right);
        if matches!(primitive, Primitive::Mismatch | Primitive::Unknown) {
            handler.error(
                format!(
                    "incompatible operand types in '{}': {} and {}",
                    op.mnemonic(),
                    left.primitive(),
                    right.primitive(),
                ),
                start.to(right.span()),
            );
            return ParseOutcome::Error;
        }

        let span = start.to(right.span());
        ParseOutcome::Matched(AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
            primitive,
            span,
        })
    }

    /// `print IDENTIFIER`
    fn parse_print(&mut self, handler: &mut Handler) -> ParseOutcome {
        if !self.at(TokenKind::Print) {
            return ParseOutcome::NoMatch;
        }
        let start = self.current.span;
        self.advance(handler);

        let ident = match self.parse_identifier_reference(handler) {
            ParseOutcome::Matched(node) => node,
            ParseOutcome::NoMatch => {
                handler.error("expected identifier after 'print'", self.current.span);
                return ParseOutcome::Error;
            }
            ParseOutcome::Error => return ParseOutcome::Error,
        };
        let span = start.to(ident.span());
        ParseOutcome::Matched(AstNode::Print { ident: Box::new(ident), span })
    }

    /// `halt`
    fn parse_halt(&mut self, handler: &mut Handler) -> ParseOutcome {
        if !self.at(TokenKind::Halt) {
            return ParseOutcome::NoMatch;
        }
        let span = self.current.span;
        self.advance(handler);
        ParseOutcome::Matched(AstNode::Halt { span })
    }

    // ------------------------------------------------------------------
    // operand := IDENTIFIER | VALUE_INT
    // ------------------------------------------------------------------

    fn parse_operand(&mut self, handler: &mut Handler) -> Option<AstNode> {
        match self.parse_identifier_reference(handler) {
            ParseOutcome::Matched(node) => return Some(node),
            ParseOutcome::Error => return None,
            ParseOutcome::NoMatch => {}
        }
        if self.at(TokenKind::ValueInt) {
            return self.parse_value_int(handler).into_option();
        }
        None
    }

    fn parse_value_int(&mut self, handler: &mut Handler) -> ParseOutcome {
        if !self.at(TokenKind::ValueInt) {
            return ParseOutcome::NoMatch;
        }
        let span = self.current.span;
        let text = self.current.text.clone().unwrap_or_default();
        self.advance(handler);
        ParseOutcome::Matched(AstNode::ValueInt { text, span })
    }

    /// A reference to a previously declared identifier: walks the
    /// registry most-recent-first and stamps the node's primitive, or
    /// `Unknown` if the name was never declared. An undeclared
    /// reference is still a `Matched` node, not an `Error` - this is a
    /// semantic failure for the emitter to reject, not a syntax error
    /// for the parser to abandon.
    fn parse_identifier_reference(&mut self, handler: &mut Handler) -> ParseOutcome {
        if !self.at(TokenKind::Identifier) {
            return ParseOutcome::NoMatch;
        }
        let span = self.current.span;
        let text = self.current.text.clone().unwrap_or_default();
        let name = self.interner.intern(&text);
        self.advance(handler);

        let primitive = self.registry.lookup(name);
        ParseOutcome::Matched(AstNode::Identifier { name, primitive, span })
    }

    /// Raw identifier lookup for `declare`'s left-hand side, which
    /// introduces the name rather than referencing it - no registry
    /// lookup, no primitive stamp yet.
    fn expect_raw_identifier(&mut self, handler: &mut Handler) -> Option<(Symbol, Span)> {
        if !self.at(TokenKind::Identifier) {
            return None;
        }
        let span = self.current.span;
        let text = self.current.text.clone().unwrap_or_default();
        let name = self.interner.intern(&text);
        self.advance(handler);
        Some((name, span))
    }
}
