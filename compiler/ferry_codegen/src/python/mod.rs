//! Python 3 backend.
//!
//! Every module becomes one `.py` file; module-level members live in a
//! class named `default__`. Values that have no direct Python counterpart
//! (sequences, sets, maps, rationals) are implemented by the runtime module
//! `_ferry`, shipped next to the generated files.

mod comprehension;
mod decl;
mod expr;
pub mod names;
mod operators;
mod stmt;
mod types;

use ferry_ir::{
    ClassDecl, DatatypeDecl, DeclPath, IteratorDecl, Member, MemberRef, Module, NewtypeDecl,
    Program, SourceLoc, SubsetTypeDecl,
};

use crate::backend::{Backend, OutputFile, Toolchain};
use crate::code_tree::CodeId;
use crate::{CodegenContext, CodegenError, CodegenResult, Feature, FeatureSet};

/// Name of the runtime-support module.
pub const RUNTIME: &str = "_ferry";

const RUNTIME_SOURCE: &str = include_str!("../../runtime/_ferry.py");

/// Stop at a construct Python cannot express.
///
/// Every feature reaching here is in the unsupported set, so `require`
/// always fails; the trailing error only guards against a registry edit.
fn not_lowered<T>(cx: &CodegenContext<'_>, feature: Feature, loc: SourceLoc) -> CodegenResult<T> {
    cx.require(feature, loc)?;
    Err(CodegenError::internal(format!("no Python lowering for {feature}")))
}

/// The Python 3 target.
#[derive(Copy, Clone, Debug, Default)]
pub struct PythonBackend;

impl Backend for PythonBackend {
    fn name(&self) -> &'static str {
        "python"
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn unsupported_features(&self) -> FeatureSet {
        Feature::ALL.iter().copied().collect()
    }

    fn toolchain(&self) -> Toolchain {
        Toolchain {
            interpreter: "python3",
            build_args: Some(&["-m", "py_compile"]),
        }
    }

    fn runtime_file(&self) -> OutputFile {
        OutputFile {
            name: format!("{RUNTIME}.py"),
            contents: RUNTIME_SOURCE.to_string(),
        }
    }

    fn module_file_stem(&self, module: &Module) -> String {
        names::module_name(&module.name)
    }

    fn extern_marker(&self) -> &'static str {
        r#"^\s*assert\s+"([A-Za-z0-9_]+)"\s*==\s*__name__\s*$"#
    }

    fn emit_header(&self, cx: &mut CodegenContext<'_>, program: &Program, wr: CodeId) -> CodegenResult<()> {
        decl::emit_header(cx, program, wr);
        Ok(())
    }

    fn emit_module_imports(&self, cx: &mut CodegenContext<'_>, stems: &[String], wr: CodeId) -> CodegenResult<()> {
        decl::emit_module_imports(cx, stems, wr);
        Ok(())
    }

    fn begin_module(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        previous: &[String],
        wr: CodeId,
    ) -> CodegenResult<()> {
        decl::begin_module(cx, module, previous, wr);
        Ok(())
    }

    fn declare_class(&self, cx: &mut CodegenContext<'_>, module: &Module, decl: &ClassDecl, wr: CodeId) -> CodegenResult<()> {
        decl::declare_class(cx, module, decl, wr)
    }

    fn declare_trait(&self, cx: &mut CodegenContext<'_>, module: &Module, decl: &ClassDecl, wr: CodeId) -> CodegenResult<()> {
        decl::declare_trait(cx, module, decl, wr)
    }

    fn declare_datatype(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        decl: &DatatypeDecl,
        wr: CodeId,
    ) -> CodegenResult<()> {
        decl::declare_datatype(cx, module, decl, wr)
    }

    fn declare_newtype(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        decl: &NewtypeDecl,
        wr: CodeId,
    ) -> CodegenResult<()> {
        decl::declare_refinement(cx, DeclPath::new(&module.name, &decl.name), wr)
    }

    fn declare_subset_type(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        decl: &SubsetTypeDecl,
        wr: CodeId,
    ) -> CodegenResult<()> {
        decl::declare_refinement(cx, DeclPath::new(&module.name, &decl.name), wr)
    }

    fn declare_iterator(
        &self,
        cx: &mut CodegenContext<'_>,
        _module: &Module,
        decl: &IteratorDecl,
        _wr: CodeId,
    ) -> CodegenResult<()> {
        not_lowered(cx, Feature::Iterators, decl.loc)
    }

    fn declare_default_class(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        members: &[Member],
        wr: CodeId,
    ) -> CodegenResult<()> {
        decl::declare_default_class(cx, module, members, wr)
    }

    fn emit_call_to_main(&self, cx: &mut CodegenContext<'_>, main: &MemberRef, wr: CodeId) -> CodegenResult<()> {
        decl::emit_call_to_main(cx, main, wr);
        Ok(())
    }
}

#[cfg(test)]
mod test_util;
