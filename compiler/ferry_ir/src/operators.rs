//! Binary and unary operators.
//!
//! Operators are already resolved: the front end picks the collection or
//! arithmetic flavor, and the operand types on the expression tree tell the
//! backend which width or representation applies.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Logical
    And,
    Or,
    Imp,
    Iff,

    // Comparison
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    RotateLeft,
    RotateRight,

    // Collections
    Concat,
    In,
    NotIn,
    Union,
    Intersection,
    Difference,
    Subset,
    ProperSubset,
    Superset,
    ProperSuperset,
    Disjoint,
    Prefix,
    ProperPrefix,
    MapMerge,
}

impl BinaryOp {
    /// Returns the source-level spelling, for diagnostics.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Imp => "==>",
            Self::Iff => "<==>",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt | Self::ProperSubset | Self::ProperPrefix => "<",
            Self::Le | Self::Subset | Self::Prefix => "<=",
            Self::Gt | Self::ProperSuperset => ">",
            Self::Ge | Self::Superset => ">=",
            Self::Add | Self::Concat | Self::Union | Self::MapMerge => "+",
            Self::Sub | Self::Difference => "-",
            Self::Mul | Self::Intersection => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::RotateLeft => "RotateLeft",
            Self::RotateRight => "RotateRight",
            Self::In => "in",
            Self::NotIn => "!in",
            Self::Disjoint => "!!",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Not,
    BitNot,
    Neg,
    /// `|c|` on a collection.
    Cardinality,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not | Self::BitNot => "!",
            Self::Neg => "-",
            Self::Cardinality => "|_|",
        }
    }
}
