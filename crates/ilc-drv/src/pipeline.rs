//! Pipeline sequencing: the four operations spec.md §6 names
//! (`lex_stream`, `parse_stream`, `emit_statement`, `inject_prologue`),
//! plus the `tokens`/`print-ast` dump helpers the CLI's debug modes
//! need. Grounded on original_source's `print_tokens` / `print_full_ast`
//! / `compile` (`src/compiler.c`), reshaped around the typed AST and
//! the in-memory-buffering emitter instead of printing straight to
//! `stdout`/`stderr` mid-walk.

use ilc_lex::{Lexer, Token, TokenKind};
use ilc_par::{AstNode, Parser};
use ilc_util::{Handler, Interner};

use ilc_gen::{Emitter, SymbolTable};

/// Lexes the whole source into a token list, per §6's `lex_stream`.
/// Stops at (and includes) the first `Eof`.
pub fn lex_stream(source: &[u8], handler: &mut Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token(handler);
        let done = tok.is_eof();
        tokens.push(tok);
        if done {
            break;
        }
    }
    tokens
}

/// Parses the whole source into its top-level instruction nodes, per
/// §6's `parse_stream`.
pub fn parse_stream(source: &[u8], interner: &mut Interner, handler: &mut Handler) -> Vec<AstNode> {
    let mut parser = Parser::new(source, interner, handler);
    parser.parse_program(handler)
}

/// Runs every node through the emitter in source order, per §6's
/// `emit_statement`, returning the buffered body and the finished
/// symbol table ready for `inject_prologue`.
pub fn emit_all(nodes: &[AstNode], interner: &Interner, handler: &mut Handler) -> (String, SymbolTable) {
    let mut emitter = Emitter::new();
    for node in nodes {
        emitter.emit_statement(node, interner, handler);
    }
    emitter.into_parts()
}

/// Renders a token the way original_source's `print_tokens` does
/// (`"Integer: %s"`, `"Keyword: declare"`, ...), one line per token.
pub fn render_token(token: &Token) -> String {
    match token.kind {
        TokenKind::ValueInt => format!("Integer: {}", token.text.as_deref().unwrap_or("")),
        TokenKind::Identifier => format!("Identifier: {}", token.text.as_deref().unwrap_or("")),
        TokenKind::TypeInt8 | TokenKind::TypeInt16 | TokenKind::TypeInt32 | TokenKind::TypeInt64 => {
            format!("Type: {}", token.kind.name())
        }
        TokenKind::Comma => "Symbol: ,".to_string(),
        TokenKind::Unknown => "Unknown token".to_string(),
        TokenKind::Eof => "End of file".to_string(),
        _ => format!("Keyword: {}", token.kind.name()),
    }
}

/// Pretty-prints one AST node and its children, indented by depth - the
/// Rust-sum-type analogue of original_source's `ast_to_pretty_string`,
/// which walked a universal `(kind, left, right, value, primitive)`
/// struct; here each match arm only destructures the fields that node
/// kind actually carries.
pub fn render_ast_node(node: &AstNode, interner: &Interner, depth: usize) -> String {
    let pad = "  ".repeat(depth);
    match node {
        AstNode::ValueInt { text, .. } => format!("{pad}ValueInt({text})\n"),
        AstNode::Identifier { name, primitive, .. } => {
            format!("{pad}Identifier({}: {})\n", interner.resolve(*name), primitive)
        }
        AstNode::Declare { name, primitive, .. } => {
            format!("{pad}Declare({}: {})\n", interner.resolve(*name), primitive)
        }
        AstNode::Store { ident, rhs, .. } => {
            let mut out = format!("{pad}Store\n");
            out.push_str(&render_ast_node(ident, interner, depth + 1));
            out.push_str(&render_ast_node(rhs, interner, depth + 1));
            out
        }
        AstNode::BinaryOp { op, left, right, primitive, .. } => {
            let mut out = format!("{pad}{}({})\n", op.mnemonic(), primitive);
            out.push_str(&render_ast_node(left, interner, depth + 1));
            out.push_str(&render_ast_node(right, interner, depth + 1));
            out
        }
        AstNode::Print { ident, .. } => {
            let mut out = format!("{pad}Print\n");
            out.push_str(&render_ast_node(ident, interner, depth + 1));
            out
        }
        AstNode::Halt { .. } => format!("{pad}Halt\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_token_labels_match_original_source_wording() {
        let mut handler = Handler::new();
        let tokens = lex_stream(b"declare a, int32", &mut handler);
        let rendered: Vec<_> = tokens.iter().map(render_token).collect();
        assert_eq!(rendered[0], "Keyword: declare");
        assert_eq!(rendered[1], "Identifier: a");
        assert_eq!(rendered[2], "Symbol: ,");
        assert_eq!(rendered[3], "Type: int32");
        assert_eq!(rendered.last().unwrap(), "End of file");
    }

    #[test]
    fn render_ast_node_indents_children() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let nodes = parse_stream(b"declare a, int32 print a halt", &mut interner, &mut handler);
        let rendered = render_ast_node(&nodes[1], &interner, 0);
        assert!(rendered.starts_with("Print\n"));
        assert!(rendered.contains("  Identifier(a: int32)\n"));
    }

    #[test]
    fn emit_all_runs_every_node_in_order() {
        let mut interner = Interner::new();
        let mut handler = Handler::new();
        let nodes = parse_stream(b"declare a, int32 store a, 5 halt", &mut interner, &mut handler);
        let (body, symbols) = emit_all(&nodes, &interner, &mut handler);
        assert!(!handler.has_errors());
        assert_eq!(symbols.total_size(), 4);
        assert!(body.contains("mov dword [rsp + 0], 5"));
        assert!(body.trim_end().ends_with("ret"));
    }
}
