//! The operator -> trait-name lookup table (spec.md sec 4.5 "Contract per
//! node: BinOp/Assign", sec 9 "Operator tables: ... implementers should
//! centralise it rather than open-coding it at each site"). One entry per
//! operator, table-driven, grounded on
//! `mesh-typeck::builtins::register_compiler_known_traits`'s loop over
//! `["Add", "Sub", "Mul", "Div", "Mod"]` rather than five hand-written match
//! arms.
//!
//! Names returned here are lang-item names, looked up through
//! `crate::lang_items`/`Resolver::get_lang_item_path`.

use fec_hir::hir::{BinOp, CompoundOp, UniOp};

/// What a non-comparison, non-logical `BinOp` dispatches through: a
/// lang-item trait name and the method name on it.
pub fn binop_trait(op: BinOp) -> Option<&'static str> {
    match op {
        BinOp::Add => Some("add"),
        BinOp::Sub => Some("sub"),
        BinOp::Mul => Some("mul"),
        BinOp::Div => Some("div"),
        BinOp::Rem => Some("rem"),
        BinOp::BitAnd => Some("bitand"),
        BinOp::BitOr => Some("bitor"),
        BinOp::BitXor => Some("bitxor"),
        BinOp::Shl => Some("shl"),
        BinOp::Shr => Some("shr"),
        BinOp::Eq | BinOp::Ne => Some("eq"),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => Some("ord"),
        // Short-circuit booleans have no trait: spec.md sec 4.5 "Short-circuit
        // boolean operators have no additional constraint".
        BinOp::And | BinOp::Or => None,
    }
}

pub fn uniop_trait(op: UniOp) -> &'static str {
    match op {
        UniOp::Not => "not",
        UniOp::Neg => "neg",
    }
}

/// The compound-assignment lang item for `op`. Per spec.md sec 9's resolved
/// open question, each compound op pairs with its own matching
/// `*_assign` trait -- the source's `Shl`/`Shr` swap is not reproduced.
pub fn compound_assign_trait(op: CompoundOp) -> &'static str {
    match op {
        CompoundOp::Add => "add_assign",
        CompoundOp::Sub => "sub_assign",
        CompoundOp::Mul => "mul_assign",
        CompoundOp::Div => "div_assign",
        CompoundOp::Rem => "rem_assign",
        CompoundOp::BitAnd => "bitand_assign",
        CompoundOp::BitOr => "bitor_assign",
        CompoundOp::BitXor => "bitxor_assign",
        CompoundOp::Shl => "shl_assign",
        CompoundOp::Shr => "shr_assign",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_arithmetic_and_bitwise_binop_has_a_trait() {
        for op in [BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Rem, BinOp::BitAnd, BinOp::BitOr, BinOp::BitXor, BinOp::Shl, BinOp::Shr] {
            assert!(binop_trait(op).is_some());
        }
    }

    #[test]
    fn comparisons_route_to_eq_or_ord() {
        assert_eq!(binop_trait(BinOp::Eq), Some("eq"));
        assert_eq!(binop_trait(BinOp::Ne), Some("eq"));
        assert_eq!(binop_trait(BinOp::Lt), Some("ord"));
        assert_eq!(binop_trait(BinOp::Ge), Some("ord"));
    }

    #[test]
    fn short_circuit_operators_have_no_trait() {
        assert_eq!(binop_trait(BinOp::And), None);
        assert_eq!(binop_trait(BinOp::Or), None);
    }

    #[test]
    fn shl_and_shr_assign_are_not_swapped() {
        assert_eq!(compound_assign_trait(CompoundOp::Shl), "shl_assign");
        assert_eq!(compound_assign_trait(CompoundOp::Shr), "shr_assign");
    }
}
