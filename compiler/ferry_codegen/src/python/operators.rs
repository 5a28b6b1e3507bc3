//! Operator and conversion lowering.
//!
//! Types passed in are already normalized: newtypes and subset types are
//! stripped down to their representation. Every result is parenthesized so
//! callers can splice it into any context.

use ferry_ir::{BinaryOp, Type, UnaryOp};

use super::types::bv_mask;
use super::RUNTIME;

/// Keep the low bits of a bit-vector result.
fn truncate(text: &str, ty: &Type) -> String {
    match ty.bitvector_width() {
        Some(width) => format!("({text} & {})", bv_mask(width)),
        None => format!("({text})"),
    }
}

pub fn unary(op: UnaryOp, x: &str, result: &Type) -> String {
    match op {
        UnaryOp::Not => format!("(not {x})"),
        UnaryOp::BitNot => truncate(&format!("~{x}"), result),
        UnaryOp::Neg => truncate(&format!("-{x}"), result),
        UnaryOp::Cardinality => format!("len({x})"),
    }
}

pub fn binary(op: BinaryOp, l: &str, r: &str, lhs: &Type, result: &Type) -> String {
    let infix = |sym: &str| format!("({l} {sym} {r})");
    match op {
        // Logical
        BinaryOp::And => infix("and"),
        BinaryOp::Or => infix("or"),
        BinaryOp::Imp => format!("(not {l} or {r})"),
        BinaryOp::Iff => infix("=="),

        // Comparison
        BinaryOp::Eq => infix("=="),
        BinaryOp::NotEq => infix("!="),
        BinaryOp::Lt => infix("<"),
        BinaryOp::Le => infix("<="),
        BinaryOp::Gt => infix(">"),
        BinaryOp::Ge => infix(">="),

        // Arithmetic
        BinaryOp::Add if lhs.is_char() => format!("{RUNTIME}.plus_char({l}, {r})"),
        BinaryOp::Sub if lhs.is_char() => format!("{RUNTIME}.minus_char({l}, {r})"),
        BinaryOp::Add => truncate(&format!("{l} + {r}"), result),
        BinaryOp::Sub => truncate(&format!("{l} - {r}"), result),
        BinaryOp::Mul => truncate(&format!("{l} * {r}"), result),
        BinaryOp::Div if matches!(result, Type::Real) => infix("/"),
        BinaryOp::Div => format!("{RUNTIME}.euclidian_division({l}, {r})"),
        BinaryOp::Mod => format!("{RUNTIME}.euclidian_modulus({l}, {r})"),

        // Bitwise
        BinaryOp::BitAnd => infix("&"),
        BinaryOp::BitOr => infix("|"),
        BinaryOp::BitXor => infix("^"),
        BinaryOp::LeftShift => truncate(&format!("{l} << {r}"), result),
        BinaryOp::RightShift => infix(">>"),
        BinaryOp::RotateLeft | BinaryOp::RotateRight => {
            let width = result.bitvector_width().unwrap_or(0);
            let mask = bv_mask(width);
            if op == BinaryOp::RotateLeft {
                format!("((({l} << {r}) & {mask}) | ({l} >> ({width} - {r})))")
            } else {
                format!("(({l} >> {r}) | (({l} << ({width} - {r})) & {mask}))")
            }
        }

        // Collections
        BinaryOp::Concat => infix("+"),
        BinaryOp::Union | BinaryOp::MapMerge => infix("|"),
        BinaryOp::In => infix("in"),
        BinaryOp::NotIn => infix("not in"),
        BinaryOp::Intersection => infix("&"),
        BinaryOp::Difference => infix("-"),
        BinaryOp::Subset => infix("<="),
        BinaryOp::ProperSubset => infix("<"),
        BinaryOp::Superset => infix(">="),
        BinaryOp::ProperSuperset => infix(">"),
        BinaryOp::Disjoint => format!("{l}.isdisjoint({r})"),
        BinaryOp::Prefix => format!("{RUNTIME}.is_prefix({l}, {r})"),
        BinaryOp::ProperPrefix => format!("{RUNTIME}.is_proper_prefix({l}, {r})"),
    }
}

/// Convert `x` from numeric-like type `from` to `to`.
pub fn conversion(x: &str, from: &Type, to: &Type) -> String {
    match (from, to) {
        (Type::Int | Type::Bitvector(_), Type::Real) => format!("{RUNTIME}.BigRational({x}, 1)"),
        (Type::Int | Type::Bitvector(_), Type::Char) => format!("chr({x})"),
        (Type::Int | Type::Bitvector(_), Type::Bitvector(w)) => format!("({x} & {})", bv_mask(*w)),
        (Type::Char, Type::Int | Type::Bitvector(_)) => format!("ord({x})"),
        (Type::Char, Type::Real) => format!("{RUNTIME}.BigRational(ord({x}), 1)"),
        (Type::Real, Type::Int) => format!("floor({x})"),
        (Type::Real, Type::Bitvector(w)) => format!("(floor({x}) & {})", bv_mask(*w)),
        (Type::Real, Type::Char) => format!("chr(floor({x}))"),
        _ => x.to_string(),
    }
}
