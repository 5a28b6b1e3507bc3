//! Statement trees.
//!
//! Ghost statements never reach the backend; the front end strips them.

use crate::{Bound, BoundVar, Expr, MemberRef, SourceLoc};

/// A statement with its source position.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loc: SourceLoc,
}

/// One arm of a `match` statement over a datatype.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchCase {
    pub ctor: String,
    /// One entry per constructor field; `None` ignores the field.
    pub bindings: Vec<Option<BoundVar>>,
    pub body: Vec<Stmt>,
}

/// Statement forms.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    /// `var x: T;` (with `values` empty) or `var x, y := e1, e2;`.
    VarDecl {
        vars: Vec<BoundVar>,
        values: Vec<Expr>,
    },
    /// Parallel assignment; each target is an identifier, field select or index.
    Assign {
        targets: Vec<Expr>,
        values: Vec<Expr>,
    },
    /// Method call whose out-values are stored into `targets`.
    Call {
        targets: Vec<Expr>,
        callee: MemberRef,
        receiver: Option<Expr>,
        args: Vec<Expr>,
    },
    /// `x :| P(x)`: pick values from the pools satisfying `constraint`.
    AssignSuchThat {
        bounds: Vec<Bound>,
        constraint: Expr,
    },
    Print(Vec<Expr>),
    /// `return` with optional values for the out-parameters.
    Return(Vec<Expr>),
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    /// Ascending loop `for var in [0, count)`.
    ForCount {
        var: BoundVar,
        count: Expr,
        body: Vec<Stmt>,
    },
    /// Loop over an explicit index with a direction and optional end.
    For {
        var: BoundVar,
        start: Expr,
        end: Option<Expr>,
        ascending: bool,
        body: Vec<Stmt>,
    },
    /// Simultaneous assignment over all values of a bound variable.
    Forall {
        bound: Bound,
        range: Option<Expr>,
        body: Box<Stmt>,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Block(Vec<Stmt>),
    Labeled {
        label: String,
        body: Vec<Stmt>,
    },
    Match {
        source: Expr,
        cases: Vec<MatchCase>,
    },
    /// Abort the program with a message.
    Halt(Expr),
    /// Run `body`; if it halts, bind the halt message to `message_var` and run `recovery`.
    HaltRecovery {
        body: Vec<Stmt>,
        message_var: String,
        recovery: Vec<Stmt>,
    },
    /// Runtime check that halts with `message` when `cond` is false.
    Expect {
        cond: Expr,
        message: Option<Expr>,
    },
    /// Self tail call in a tail-recursive member; `args` are the new in-parameter values.
    TailCall(Vec<Expr>),
    /// A branch the front end proved unreachable.
    Absurd,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt {
            kind,
            loc: SourceLoc::SYNTHETIC,
        }
    }

    #[must_use]
    pub fn at(mut self, loc: SourceLoc) -> Self {
        self.loc = loc;
        self
    }

    pub fn print(values: Vec<Expr>) -> Self {
        Stmt::new(StmtKind::Print(values))
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::new(StmtKind::Assign {
            targets: vec![target],
            values: vec![value],
        })
    }

    pub fn var(var: BoundVar, value: Option<Expr>) -> Self {
        Stmt::new(StmtKind::VarDecl {
            vars: vec![var],
            values: value.into_iter().collect(),
        })
    }
}

