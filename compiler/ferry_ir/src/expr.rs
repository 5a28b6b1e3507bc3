//! Expression trees.
//!
//! One closed sum type covers every expression form the front end can
//! produce. Each node carries its resolved type and source position.

use num_bigint::BigInt;

use crate::{BinaryOp, DeclPath, SourceLoc, Type, UnaryOp};

/// A typed expression.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: SourceLoc,
}

/// Literal values.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Bool(bool),
    Int(BigInt),
    /// `mantissa * 10^exponent`.
    Real { mantissa: BigInt, exponent: i32 },
    Char(char),
    String(String),
    Null,
}

/// A variable introduced by a binder (lambda, let, quantifier, local).
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundVar {
    pub name: String,
    pub ty: Type,
}

impl BoundVar {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        BoundVar {
            name: name.into(),
            ty,
        }
    }
}

/// Reference to a member of a class-like declaration.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberRef {
    pub owner: DeclPath,
    pub name: String,
}

impl MemberRef {
    pub fn new(owner: DeclPath, name: impl Into<String>) -> Self {
        MemberRef {
            owner,
            name: name.into(),
        }
    }
}

/// What a member-select reads from its receiver.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selector {
    /// Instance field (or constant) of a class, trait or refinement type.
    Field(String),
    /// Named field of a datatype constructor.
    Destructor(String),
    /// `d.C?`: whether the value was built by constructor `C`.
    IsCtor(String),
    /// Zero-based tuple component.
    TupleComponent(usize),
    Special(SpecialField),
}

/// Built-in fields of primitive and collection types.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialField {
    Keys,
    Values,
    Items,
    /// Integer floor of a real.
    Floor,
    /// Length of the given (zero-based) array dimension.
    Length(u32),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionKind {
    Set,
    Seq,
    MultiSet,
}

/// The search space of a bound variable.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundPool {
    Bool,
    Char,
    /// Half-open integer range; a missing end makes the pool non-finite.
    IntRange {
        lo: Option<Box<Expr>>,
        hi: Option<Box<Expr>>,
    },
    /// Elements of a set or sequence, or keys of a map.
    Elements(Box<Expr>),
    /// All values of a datatype with finitely many values.
    Datatype(DeclPath),
    /// A single candidate value.
    Exact(Box<Expr>),
    /// No finite enumeration is known.
    Unbounded,
}

impl BoundPool {
    /// Whether the pool can be enumerated by a terminating loop.
    pub fn is_finite(&self) -> bool {
        match self {
            BoundPool::IntRange { lo, hi } => lo.is_some() && hi.is_some(),
            BoundPool::Unbounded => false,
            BoundPool::Bool
            | BoundPool::Char
            | BoundPool::Elements(_)
            | BoundPool::Datatype(_)
            | BoundPool::Exact(_) => true,
        }
    }
}

/// A bound variable with the pool it ranges over.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    pub var: BoundVar,
    pub pool: BoundPool,
}

/// Expression forms.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Literal(Literal),
    Ident(String),
    This,
    Select {
        receiver: Box<Expr>,
        selector: Selector,
    },
    StaticField(MemberRef),
    /// Call of a function or method; `receiver` is `None` for static members.
    Call {
        callee: MemberRef,
        receiver: Option<Box<Expr>>,
        args: Vec<Expr>,
    },
    /// A member used as a first-class function value.
    MemberValue {
        callee: MemberRef,
        receiver: Option<Box<Expr>>,
    },
    /// Application of a function value.
    Apply {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    DatatypeValue {
        datatype: DeclPath,
        ctor: String,
        args: Vec<Expr>,
    },
    Tuple(Vec<Expr>),
    /// `s[i]` on a sequence, `m[k]` on a map, `a[i]` on a one-dimensional array.
    Index {
        collection: Box<Expr>,
        index: Box<Expr>,
    },
    ArrayIndex {
        array: Box<Expr>,
        indices: Vec<Expr>,
    },
    Slice {
        seq: Box<Expr>,
        lo: Option<Box<Expr>>,
        hi: Option<Box<Expr>>,
    },
    /// `c[i := v]` on a sequence or map.
    Update {
        collection: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
    },
    /// `seq(n, f)`.
    SeqConstruction {
        length: Box<Expr>,
        init: Box<Expr>,
    },
    Display {
        kind: CollectionKind,
        elements: Vec<Expr>,
    },
    MapDisplay(Vec<(Expr, Expr)>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Conversion of `operand` to this expression's type.
    Conversion(Box<Expr>),
    TypeTest {
        operand: Box<Expr>,
        test: Type,
    },
    Ite {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Let {
        vars: Vec<BoundVar>,
        values: Vec<Expr>,
        body: Box<Expr>,
    },
    Lambda {
        params: Vec<BoundVar>,
        body: Box<Expr>,
    },
    Quantifier {
        is_forall: bool,
        bounds: Vec<Bound>,
        range: Option<Box<Expr>>,
        term: Box<Expr>,
    },
    SetComprehension {
        bounds: Vec<Bound>,
        range: Option<Box<Expr>>,
        term: Box<Expr>,
    },
    /// `map x | range :: key := value`; without `key` the bound variable is the key.
    MapComprehension {
        bounds: Vec<Bound>,
        range: Option<Box<Expr>>,
        key: Option<Box<Expr>>,
        value: Box<Expr>,
    },
    /// `new C` or `new C.Init(args)`.
    New {
        class: DeclPath,
        ctor: Option<String>,
        args: Vec<Expr>,
    },
    /// `new T[n1, n2, ...]`, optionally with an initializer function.
    NewArray {
        dims: Vec<Expr>,
        init: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Expr {
            kind,
            ty,
            loc: SourceLoc::SYNTHETIC,
        }
    }

    #[must_use]
    pub fn at(mut self, loc: SourceLoc) -> Self {
        self.loc = loc;
        self
    }

    pub fn bool(value: bool) -> Self {
        Expr::new(ExprKind::Literal(Literal::Bool(value)), Type::Bool)
    }

    pub fn int(value: i64) -> Self {
        Expr::new(ExprKind::Literal(Literal::Int(BigInt::from(value))), Type::Int)
    }

    pub fn char(value: char) -> Self {
        Expr::new(ExprKind::Literal(Literal::Char(value)), Type::Char)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::new(ExprKind::Literal(Literal::String(value.into())), Type::string())
    }

    pub fn ident(name: impl Into<String>, ty: Type) -> Self {
        Expr::new(ExprKind::Ident(name.into()), ty)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, ty: Type) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        )
    }

    pub fn call(callee: MemberRef, receiver: Option<Expr>, args: Vec<Expr>, ty: Type) -> Self {
        Expr::new(
            ExprKind::Call {
                callee,
                receiver: receiver.map(Box::new),
                args,
            },
            ty,
        )
    }

    pub fn datatype_value(datatype: DeclPath, ctor: impl Into<String>, args: Vec<Expr>) -> Self {
        let ty = Type::UserDefined {
            decl: datatype.clone(),
            args: Vec::new(),
        };
        Expr::new(
            ExprKind::DatatypeValue {
                datatype,
                ctor: ctor.into(),
                args,
            },
            ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_range_needs_both_ends() {
        let lo = Some(Box::new(Expr::int(0)));
        let hi = Some(Box::new(Expr::int(10)));
        assert!(BoundPool::IntRange { lo: lo.clone(), hi }.is_finite());
        assert!(!BoundPool::IntRange { lo, hi: None }.is_finite());
        assert!(!BoundPool::Unbounded.is_finite());
    }

    #[test]
    fn datatype_value_carries_its_type() {
        let path = DeclPath::new("_module", "Pair");
        let e = Expr::datatype_value(path.clone(), "Make", vec![Expr::int(3), Expr::int(4)]);
        assert_eq!(e.ty.decl_path(), Some(&path));
    }
}
