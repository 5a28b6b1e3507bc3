//! Code Generation for Ferry
//!
//! Lowers a resolved [`ferry_ir::Program`] into target source files.
//!
//! # Architecture
//!
//! ```text
//! Program + ProgramIndex
//!        ↓
//!   generate()         (one top-down traversal, backend hooks per construct)
//!        ↓
//!   CodeTree           (deferred text: forks for hoisting, holes for late fragments)
//!        ↓
//!   GeneratedProgram   (one file per module, the primary file, the runtime)
//! ```
//!
//! A backend declares the constructs it cannot express as a [`FeatureSet`];
//! the traversal stops with [`CodegenError::Unsupported`] at the first one.

mod backend;
pub mod base;
pub mod code_tree;
mod context;
mod error;
mod feature;
pub mod python;
mod stack;

pub use backend::{generate, Backend, GeneratedProgram, OutputFile, Toolchain};
pub use code_tree::{CodeId, CodeTree, HoleId};
pub use context::{CodegenContext, MemberFrame};
pub use error::{CodegenError, CodegenResult};
pub use feature::{Feature, FeatureSet};
pub use python::PythonBackend;
pub use stack::ensure_sufficient_stack;
