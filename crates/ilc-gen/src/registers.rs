//! Primitive-to-register dispatch table (§4.3, §9 Design Notes: "A
//! fixed table keyed by primitive ... is preferred over cascading case
//! analysis; keeps the INT8 mul special case isolated").
//!
//! Grounded on original_source's `PRIMITIVE_DATA[]` / `get_primitive_data`
//! (`generator/operators/basic.c`) and the older `get_register_type` /
//! `get_word_type` / `get_mov_type` trio in `generator-win.h` - this
//! table is their union, keyed by [`Primitive`] instead of a `switch`.

use ilc_lex::Primitive;

/// The register names and size directive a primitive emits through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveRegisters {
    pub size: u32,
    pub acc1: &'static str,
    pub acc2: &'static str,
    pub acc3: &'static str,
    pub acc4: &'static str,
    pub directive: &'static str,
    /// The mnemonic `print` widens a stack value into `edx` with:
    /// `movzx` for the two narrower widths (matching
    /// original_source's `get_mov_type`), plain `mov` for the two that
    /// are already machine-word-sized or wider.
    pub print_widen: &'static str,
}

/// Looks up the fixed register/directive table for a primitive.
///
/// Panics if `p` is not a fixed-width integer type - the emitter must
/// never call this for `Void`, `Mismatch`, `Unknown`, or
/// `UnresolvedInt`; those are rejected before emission is attempted
/// (§7: "the emitter ... must never produce structurally invalid NASM").
pub fn registers_for(p: Primitive) -> PrimitiveRegisters {
    match p {
        Primitive::Int8 => PrimitiveRegisters {
            size: 1,
            acc1: "al",
            acc2: "bl",
            acc3: "cl",
            acc4: "dl",
            directive: "byte",
            print_widen: "movzx",
        },
        Primitive::Int16 => PrimitiveRegisters {
            size: 2,
            acc1: "ax",
            acc2: "bx",
            acc3: "cx",
            acc4: "dx",
            directive: "word",
            print_widen: "movzx",
        },
        Primitive::Int32 => PrimitiveRegisters {
            size: 4,
            acc1: "eax",
            acc2: "ebx",
            acc3: "ecx",
            acc4: "edx",
            directive: "dword",
            print_widen: "mov",
        },
        Primitive::Int64 => PrimitiveRegisters {
            size: 8,
            acc1: "rax",
            acc2: "rbx",
            acc3: "rcx",
            acc4: "rdx",
            directive: "qword",
            print_widen: "mov",
        },
        other => panic!("registers_for called with non-fixed-width primitive {other:?}"),
    }
}

/// `format_<type>` label for `print`'s `printf` call, one per fixed
/// width (§4.4 step 3).
pub fn format_label(p: Primitive) -> &'static str {
    match p {
        Primitive::Int8 => "format_int8",
        Primitive::Int16 => "format_int16",
        Primitive::Int32 => "format_int32",
        Primitive::Int64 => "format_int64",
        other => panic!("format_label called with non-fixed-width primitive {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_widths_match_declared_sizes() {
        assert_eq!(registers_for(Primitive::Int8).size, 1);
        assert_eq!(registers_for(Primitive::Int16).size, 2);
        assert_eq!(registers_for(Primitive::Int32).size, 4);
        assert_eq!(registers_for(Primitive::Int64).size, 8);
    }

    #[test]
    fn int8_and_int16_widen_print_loads_with_movzx() {
        assert_eq!(registers_for(Primitive::Int8).print_widen, "movzx");
        assert_eq!(registers_for(Primitive::Int16).print_widen, "movzx");
    }

    #[test]
    fn int32_and_int64_print_loads_use_plain_mov() {
        assert_eq!(registers_for(Primitive::Int32).print_widen, "mov");
        assert_eq!(registers_for(Primitive::Int64).print_widen, "mov");
    }

    #[test]
    #[should_panic]
    fn panics_on_non_fixed_width_primitive() {
        registers_for(Primitive::Void);
    }
}
