//! The code emitter: walks AST nodes in source order, writing NASM
//! text for each.
//!
//! The body is buffered in memory rather than written line-by-line
//! straight to an output file, so the prologue can be prepended in a
//! single pass afterward (see [`crate::prologue`]) instead of a
//! reopen-and-rewrite.
//!
//! Emission is best-effort: a symbol-lookup miss, an
//! `Unknown`/`Mismatch`-typed operand, or a non-fixed-width operator
//! result causes that one statement to be skipped (with a diagnostic)
//! rather than panicking or writing partial/invalid NASM for it.

use ilc_lex::Primitive;
use ilc_par::{AstNode, BinOp};
use ilc_util::{Handler, Interner, Span};

use crate::registers::{format_label, registers_for};
use crate::symbol::SymbolTable;

/// Accumulates emitted NASM body text and the symbol table it grows as
/// `DECLARE` statements are walked.
#[derive(Default)]
pub struct Emitter {
    body: String,
    symbols: SymbolTable,
}

impl Emitter {
    pub fn new() -> Self {
        Self { body: String::new(), symbols: SymbolTable::new() }
    }

    /// Emits one top-level instruction node, per the shape table in §3.
    pub fn emit_statement(&mut self, node: &AstNode, interner: &Interner, handler: &mut Handler) {
        match node {
            AstNode::Declare { name, primitive, .. } => {
                let size = primitive
                    .byte_width()
                    .expect("a parsed Declare node always carries a fixed-width primitive");
                self.symbols.declare(*name, size);
            }
            AstNode::Store { .. } => self.emit_store(node, interner, handler),
            AstNode::BinaryOp { op, left, right, primitive, .. } => {
                // A bare top-level `add`/`sub`/`mul`/`div`: the result
                // lands in acc1 and is discarded, same emission as a
                // store's right-hand side minus the final `mov`.
                self.emit_binary_op(*op, left, right, *primitive, interner, handler);
            }
            AstNode::Print { .. } => self.emit_print(node, interner, handler),
            AstNode::Halt { .. } => self.push_line("ret"),
            AstNode::ValueInt { .. } | AstNode::Identifier { .. } => {
                // Only ever reachable as a child of another node; the
                // parser never hands these back as top-level
                // instructions.
            }
        }
    }

    /// Consumes the emitter, handing the buffered body text and the
    /// finished symbol table to the prologue injector.
    pub fn into_parts(self) -> (String, SymbolTable) {
        (self.body, self.symbols)
    }

    fn push_line(&mut self, line: impl AsRef<str>) {
        self.body.push_str(line.as_ref());
        self.body.push('\n');
    }

    fn emit_store(&mut self, node: &AstNode, interner: &Interner, handler: &mut Handler) {
        let AstNode::Store { ident, rhs, .. } = node else { unreachable!() };
        let AstNode::Identifier { name, primitive, span } = ident.as_ref() else {
            unreachable!("store's left-hand side is always an identifier reference")
        };
        if !self.check_typed(*primitive, interner, *name, *span, handler) {
            return;
        }
        let Some(offset) = self.symbols.offset_of(*name) else {
            handler.error(
                format!("undefined variable '{}'", interner.resolve(*name)),
                *span,
            );
            return;
        };
        let regs = registers_for(*primitive);

        if let AstNode::BinaryOp { op, left, right, primitive: op_primitive, .. } = rhs.as_ref() {
            if !self.emit_binary_op(*op, left, right, *op_primitive, interner, handler) {
                return;
            }
            let op_regs = registers_for(*op_primitive);
            self.push_line(format!(
                "mov {} [rsp + {}], {}",
                regs.directive, offset, op_regs.acc1
            ));
            return;
        }

        let Some(value) = self.render_operand(rhs, interner, handler) else { return };
        self.push_line(format!("mov {} [rsp + {}], {}", regs.directive, offset, value));
    }

    /// Emits one `add`/`sub`/`mul`/`div`, leaving its result in
    /// `acc1` of its own resolved primitive. Returns `false` (after
    /// reporting) if the operator could not be emitted at all.
    fn emit_binary_op(
        &mut self,
        op: BinOp,
        left: &AstNode,
        right: &AstNode,
        primitive: Primitive,
        interner: &Interner,
        handler: &mut Handler,
    ) -> bool {
        if primitive.byte_width().is_none() {
            handler.error(
                format!(
                    "'{}' has no fixed-width result type to emit ({})",
                    op.mnemonic(),
                    primitive
                ),
                left.span().to(right.span()),
            );
            return false;
        }
        let regs = registers_for(primitive);
        let Some(l) = self.render_operand(left, interner, handler) else { return false };
        let Some(r) = self.render_operand(right, interner, handler) else { return false };

        match op {
            BinOp::Add => {
                self.push_line(format!("mov {}, {}", regs.acc1, l));
                self.push_line(format!("add {}, {}", regs.acc1, r));
            }
            BinOp::Sub => {
                self.push_line(format!("mov {}, {}", regs.acc1, l));
                self.push_line(format!("sub {}, {}", regs.acc1, r));
            }
            BinOp::Mul if primitive == Primitive::Int8 => {
                // x86 has no two-operand `imul r8, r/m8`: widen both
                // operands into 32-bit registers and use the one-operand
                // `mul` instead.
                let regs32 = registers_for(Primitive::Int32);
                self.push_line(widen_into(regs32.acc1, &l, left.is_value_int()));
                self.push_line(widen_into(regs32.acc2, &r, right.is_value_int()));
                self.push_line(format!("mul {}", regs32.acc2));
            }
            BinOp::Mul => {
                self.push_line(format!("mov {}, {}", regs.acc1, l));
                self.push_line(format!("imul {}, {}", regs.acc1, r));
            }
            BinOp::Div => {
                if primitive == Primitive::Int8 {
                    self.push_line("xor ax, ax");
                } else {
                    self.push_line(format!("xor {0}, {0}", regs.acc4));
                }
                self.push_line(format!("mov {}, {}", regs.acc1, l));
                self.push_line(format!("div {}", r));
            }
        }
        true
    }

    fn emit_print(&mut self, node: &AstNode, interner: &Interner, handler: &mut Handler) {
        let AstNode::Print { ident, .. } = node else { unreachable!() };
        let AstNode::Identifier { name, primitive, span } = ident.as_ref() else {
            unreachable!("print's operand is always an identifier reference")
        };
        if !self.check_typed(*primitive, interner, *name, *span, handler) {
            return;
        }
        let Some(offset) = self.symbols.offset_of(*name) else {
            handler.error(
                format!("undefined variable '{}'", interner.resolve(*name)),
                *span,
            );
            return;
        };
        let regs = registers_for(*primitive);
        self.push_line(format!("lea rcx, [{}]", format_label(*primitive)));
        self.push_line(format!(
            "{} edx, {} [rsp + {}]",
            regs.print_widen, regs.directive, offset
        ));
        self.push_line("mov rax, 0");
        self.push_line("call printf");
    }

    /// Rejects an identifier stamped `Unknown`/`Mismatch` per §7 item 4
    /// ("An undeclared reference still yields an IDENTIFIER node
    /// stamped UNKNOWN, which the emitter must reject").
    fn check_typed(
        &self,
        primitive: Primitive,
        interner: &Interner,
        name: ilc_util::Symbol,
        span: Span,
        handler: &mut Handler,
    ) -> bool {
        if primitive.byte_width().is_none() {
            handler.error(
                format!(
                    "'{}' has no resolved type ({})",
                    interner.resolve(name),
                    primitive
                ),
                span,
            );
            return false;
        }
        true
    }

    /// Renders an operand per §4.3 "Operand rendering": a literal emits
    /// its decimal text verbatim; an identifier emits a sized stack
    /// reference using *its own* primitive, not the enclosing
    /// operator's.
    fn render_operand(
        &self,
        node: &AstNode,
        interner: &Interner,
        handler: &mut Handler,
    ) -> Option<String> {
        match node {
            AstNode::ValueInt { text, .. } => Some(text.clone()),
            AstNode::Identifier { name, primitive, span } => {
                if !self.check_typed(*primitive, interner, *name, *span, handler) {
                    return None;
                }
                let Some(offset) = self.symbols.offset_of(*name) else {
                    handler.error(
                        format!("undefined variable '{}'", interner.resolve(*name)),
                        *span,
                    );
                    return None;
                };
                let regs = registers_for(*primitive);
                Some(format!("{} [rsp + {}]", regs.directive, offset))
            }
            other => {
                handler.error(
                    format!("expected an integer literal or identifier, found {}", other.kind_name()),
                    other.span(),
                );
                None
            }
        }
    }
}

/// One operand of the INT8 `mul` widening path: a literal operand is a
/// plain immediate move, a memory operand needs `movzx` to widen it
/// into the 32-bit accumulator (§4.3).
fn widen_into(dst_reg: &str, rendered: &str, is_literal: bool) -> String {
    let mnemonic = if is_literal { "mov" } else { "movzx" };
    format!("{mnemonic} {dst_reg}, {rendered}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_par::Parser;

    fn emit(src: &str) -> (String, SymbolTable, Handler) {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let nodes = {
            let mut parser = Parser::new(src.as_bytes(), &mut interner, &mut handler);
            parser.parse_program(&mut handler)
        };
        let mut emitter = Emitter::new();
        for node in &nodes {
            emitter.emit_statement(node, &interner, &mut handler);
        }
        let (body, symbols) = emitter.into_parts();
        (body, symbols, handler)
    }

    #[test]
    fn scenario_1_declare_store_print_halt() {
        let (body, symbols, handler) = emit("declare a, int32 store a, 5 print a halt");
        assert!(!handler.has_errors());
        assert_eq!(symbols.total_size(), 4);
        assert!(body.contains("mov dword [rsp + 0], 5"));
        assert!(body.contains("lea rcx, [format_int32]"));
        assert!(body.contains("mov edx, dword [rsp + 0]"));
        assert!(body.contains("mov rax, 0"));
        assert!(body.contains("call printf"));
        assert!(body.trim_end().ends_with("ret"));
    }

    #[test]
    fn scenario_2_add_into_two_int32_locals() {
        let (body, symbols, handler) = emit(
            "declare a, int32 declare b, int32 store a, 3 store b, 4 store a, add a, b print a halt",
        );
        assert!(!handler.has_errors());
        assert_eq!(symbols.total_size(), 8);
        assert!(body.contains("mov dword [rsp + 0], 3"));
        assert!(body.contains("mov dword [rsp + 4], 4"));
        assert!(body.contains("mov eax, dword [rsp + 0]"));
        assert!(body.contains("add eax, dword [rsp + 4]"));
        assert!(body.contains("mov dword [rsp + 0], eax"));
    }

    #[test]
    fn scenario_3_int8_mul_uses_widening_path() {
        let (body, _symbols, handler) = emit("declare a, int8 store a, 6 store a, mul a, 7 print a halt");
        assert!(!handler.has_errors());
        assert!(body.contains("movzx eax, byte [rsp + 0]"));
        assert!(body.contains("mov ebx, 7"));
        assert!(body.contains("mul ebx"));
        assert!(body.contains("mov byte [rsp + 0], al"));
    }

    #[test]
    fn scenario_4_undeclared_operand_drops_statement_but_keeps_declare() {
        // parses to Declare + Halt only: the store is abandoned at
        // parse time because `add a, b` resolves to Unknown (b is
        // undeclared).
        let (_body, symbols, handler) = emit("declare a, int32 store a, add a, b halt");
        assert!(handler.has_errors());
        assert_eq!(symbols.total_size(), 4);
    }

    #[test]
    fn scenario_5_type_mismatch_drops_store_but_keeps_both_declares() {
        let (_body, symbols, handler) =
            emit("declare a, int8 declare b, int32 store a, add a, b halt");
        assert!(handler.has_errors());
        assert_eq!(symbols.total_size(), 5);
    }

    #[test]
    fn scenario_6_empty_source_emits_nothing() {
        let (body, symbols, handler) = emit("   ");
        assert!(!handler.has_errors());
        assert!(body.is_empty());
        assert_eq!(symbols.total_size(), 0);
    }

    #[test]
    fn div_zeroes_upper_half_before_dividing() {
        let (body, _symbols, handler) = emit("declare a, int32 declare b, int32 div a, b halt");
        assert!(!handler.has_errors());
        assert!(body.contains("xor edx, edx"));
        assert!(body.contains("div dword [rsp + 4]"));
    }

    #[test]
    fn int8_div_zeroes_ax_not_a_32_bit_register() {
        let (body, _symbols, handler) = emit("declare a, int8 declare b, int8 div a, b halt");
        assert!(!handler.has_errors());
        assert!(body.contains("xor ax, ax"));
    }

    #[test]
    fn sub_emits_mov_then_sub() {
        let (body, _symbols, handler) = emit("declare a, int64 declare b, int64 sub a, b halt");
        assert!(!handler.has_errors());
        assert!(body.contains("mov rax, qword [rsp + 0]"));
        assert!(body.contains("sub rax, qword [rsp + 8]"));
    }

    #[test]
    fn print_of_undeclared_identifier_is_skipped_not_panicked() {
        let (body, _symbols, handler) = emit("print ghost halt");
        assert!(handler.has_errors());
        assert_eq!(body.trim(), "ret");
    }

    #[test]
    fn p7_emission_is_deterministic_across_runs() {
        let src = "declare a, int16 declare b, int16 store a, 2 store b, 3 store a, mul a, b print a halt";
        let (first, _, _) = emit(src);
        let (second, _, _) = emit(src);
        assert_eq!(first, second);
    }
}
