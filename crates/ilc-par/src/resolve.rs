//! Operator type resolution lattice.
//!
//! `resolve(a, b)` decides what primitive an `add`/`sub`/`mul`/`div`
//! (or a `store`'s implicit assignment) produces from two already-typed
//! operand nodes. The lattice is symmetric: swapping `a` and `b` never
//! changes a non-`Unknown` result, though the implementation below does
//! not special-case the swap - it falls out of the table being defined
//! the same way from either side.

use ilc_lex::Primitive;

use crate::ast::AstNode;

/// Resolves the result type of a binary operator from its two operand
/// nodes.
pub fn resolve(left: &AstNode, right: &AstNode) -> Primitive {
    if left.is_identifier() {
        let t = left.primitive();
        if t == Primitive::Unknown {
            // An undeclared reference poisons the result as Unknown rather
            // than as a type clash - there is no type to clash with.
            return Primitive::Unknown;
        }
        return if right.is_identifier() {
            let u = right.primitive();
            if u == Primitive::Unknown {
                Primitive::Unknown
            } else if t == u {
                t
            } else {
                Primitive::Mismatch
            }
        } else if right.is_value_int() || right.primitive() == Primitive::UnresolvedInt {
            if t.is_int_like() {
                t
            } else {
                Primitive::Mismatch
            }
        } else {
            Primitive::Unknown
        };
    }

    if right.is_identifier() {
        let u = right.primitive();
        if u == Primitive::Unknown {
            return Primitive::Unknown;
        }
        return if left.is_value_int() || left.primitive() == Primitive::UnresolvedInt {
            if u.is_int_like() {
                u
            } else {
                Primitive::Mismatch
            }
        } else {
            Primitive::Unknown
        };
    }

    if left.is_value_int() || left.primitive() == Primitive::UnresolvedInt {
        return if right.is_value_int() || right.primitive() == Primitive::UnresolvedInt {
            Primitive::UnresolvedInt
        } else {
            Primitive::Mismatch
        };
    }

    Primitive::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilc_util::{Span, Symbol};

    fn ident(primitive: Primitive) -> AstNode {
        // Symbol's only public constructor is Interner::intern; any
        // valid handle works here since resolve() never calls resolve().
        let mut interner = ilc_util::Interner::new();
        let name: Symbol = interner.intern("x");
        AstNode::Identifier { name, primitive, span: Span::DUMMY }
    }

    fn value_int() -> AstNode {
        AstNode::ValueInt { text: "1".into(), span: Span::DUMMY }
    }

    #[test]
    fn two_identifiers_of_same_type_resolve_to_that_type() {
        assert_eq!(resolve(&ident(Primitive::Int32), &ident(Primitive::Int32)), Primitive::Int32);
    }

    #[test]
    fn two_identifiers_of_different_types_mismatch() {
        assert_eq!(resolve(&ident(Primitive::Int8), &ident(Primitive::Int32)), Primitive::Mismatch);
    }

    #[test]
    fn identifier_and_literal_resolve_to_identifier_type() {
        assert_eq!(resolve(&ident(Primitive::Int16), &value_int()), Primitive::Int16);
        assert_eq!(resolve(&value_int(), &ident(Primitive::Int16)), Primitive::Int16);
    }

    #[test]
    fn two_literals_resolve_to_unresolved_int() {
        assert_eq!(resolve(&value_int(), &value_int()), Primitive::UnresolvedInt);
    }

    #[test]
    fn undeclared_identifier_operand_is_unknown() {
        assert_eq!(resolve(&ident(Primitive::Unknown), &value_int()), Primitive::Unknown);
    }

    #[test]
    fn p4_resolution_is_symmetric_for_well_typed_operands() {
        let pairs = [
            (ident(Primitive::Int64), ident(Primitive::Int64)),
            (ident(Primitive::Int8), value_int()),
            (value_int(), value_int()),
        ];
        for (a, b) in pairs {
            assert_eq!(resolve(&a, &b), resolve(&b, &a));
        }
    }
}
