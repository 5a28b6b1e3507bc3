//! Resolved program tree for the Ferry backend.
//!
//! The front end hands the backend a fully resolved, type-checked
//! [`Program`]. Nothing here is mutated during code generation.
//!
//! Each node category is a closed sum type ([`TopLevelDecl`], [`Member`],
//! [`ExprKind`], [`StmtKind`], [`Type`]), so a backend that matches on them
//! exhaustively handles every form the front end can produce.

mod decl;
mod expr;
mod index;
mod location;
mod operators;
mod stmt;
mod types;

pub use decl::{
    ClassDecl, Ctor, DatatypeDecl, Field, Formal, Function, IteratorDecl, Member, Method, Module,
    NewtypeDecl, Program, SubsetTypeDecl, TopLevelDecl,
};
pub use expr::{
    Bound, BoundPool, BoundVar, CollectionKind, Expr, ExprKind, Literal, MemberRef, Selector,
    SpecialField,
};
pub use index::ProgramIndex;
pub use location::SourceLoc;
pub use num_bigint::BigInt;
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{MatchCase, Stmt, StmtKind};
pub use types::{DeclPath, Type};
