//! The backend capability interface and the program traversal.
//!
//! A [`Backend`] has one method per declaration-level construct. The
//! traversal in [`generate`] walks the program once, top-down, and hands
//! each construct to the backend together with the node it should write
//! into. Behavior shared between targets lives in [`crate::base`] as plain
//! functions that a backend calls explicitly.

use ferry_ir::{
    ClassDecl, DatatypeDecl, IteratorDecl, Member, MemberRef, Module, NewtypeDecl, Program,
    ProgramIndex, SubsetTypeDecl, TopLevelDecl,
};
use tracing::{debug, instrument};

use crate::code_tree::CodeId;
use crate::{CodegenContext, CodegenResult, FeatureSet};

/// A rendered output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFile {
    /// File name relative to the output directory.
    pub name: String,
    pub contents: String,
}

/// Everything a run produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedProgram {
    /// Name of the primary file, the one to execute.
    pub main_file: String,
    /// The primary file, one file per non-extern module, and the runtime file.
    pub files: Vec<OutputFile>,
}

impl GeneratedProgram {
    pub fn file(&self, name: &str) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// How the driver runs or builds a target's output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    /// Default interpreter executable.
    pub interpreter: &'static str,
    /// Interpreter arguments (before the file list) for the build step, if any.
    pub build_args: Option<&'static [&'static str]>,
}

/// One target language.
pub trait Backend {
    /// Target name for diagnostics and logs.
    fn name(&self) -> &'static str;

    /// Extension of generated files, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Constructs this target cannot express.
    fn unsupported_features(&self) -> FeatureSet;

    fn toolchain(&self) -> Toolchain;

    /// The shared runtime-support file shipped with every program.
    fn runtime_file(&self) -> OutputFile;

    /// File name (without extension) that holds `module`.
    fn module_file_stem(&self, module: &Module) -> String;

    /// Pattern of the marker line an auxiliary extern file carries; capture
    /// group 1 is the name of the module the file implements.
    fn extern_marker(&self) -> &'static str;

    /// Header of the primary file.
    fn emit_header(&self, cx: &mut CodegenContext<'_>, program: &Program, wr: CodeId) -> CodegenResult<()>;

    /// Import the emitted module files from the primary file.
    fn emit_module_imports(&self, cx: &mut CodegenContext<'_>, stems: &[String], wr: CodeId) -> CodegenResult<()>;

    /// Header of a module file; `previous` are the stems of modules emitted before it.
    fn begin_module(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        previous: &[String],
        wr: CodeId,
    ) -> CodegenResult<()>;

    fn declare_class(&self, cx: &mut CodegenContext<'_>, module: &Module, decl: &ClassDecl, wr: CodeId) -> CodegenResult<()>;

    fn declare_trait(&self, cx: &mut CodegenContext<'_>, module: &Module, decl: &ClassDecl, wr: CodeId) -> CodegenResult<()>;

    fn declare_datatype(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        decl: &DatatypeDecl,
        wr: CodeId,
    ) -> CodegenResult<()>;

    fn declare_newtype(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        decl: &NewtypeDecl,
        wr: CodeId,
    ) -> CodegenResult<()>;

    fn declare_subset_type(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        decl: &SubsetTypeDecl,
        wr: CodeId,
    ) -> CodegenResult<()>;

    fn declare_iterator(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        decl: &IteratorDecl,
        wr: CodeId,
    ) -> CodegenResult<()>;

    /// The class holding a module's top-level members.
    fn declare_default_class(
        &self,
        cx: &mut CodegenContext<'_>,
        module: &Module,
        members: &[Member],
        wr: CodeId,
    ) -> CodegenResult<()>;

    /// Call the entry method, turning a program halt into a message.
    fn emit_call_to_main(&self, cx: &mut CodegenContext<'_>, main: &MemberRef, wr: CodeId) -> CodegenResult<()>;
}

/// Generate all output files for `program`.
///
/// Stops at the first unsupported construct; no partial output is returned.
#[instrument(level = "debug", skip_all, fields(program = %program.name, target = backend.name()))]
pub fn generate<B: Backend>(backend: &B, program: &Program) -> CodegenResult<GeneratedProgram> {
    let index = ProgramIndex::new(program);
    let mut cx = CodegenContext::new(&index, backend.unsupported_features());
    let ext = backend.file_extension();

    let main_file = format!("{}.{ext}", program.name);
    let main_root = cx.code.new_file(main_file.clone());
    backend.emit_header(&mut cx, program, main_root)?;
    let imports = cx.code.fork(main_root);

    let mut stems: Vec<String> = Vec::new();
    for module in &program.modules {
        let stem = backend.module_file_stem(module);
        if module.is_extern {
            debug!(module = %module.name, "extern module, supplied by an auxiliary file");
            stems.push(stem);
            continue;
        }
        let root = cx.code.new_file(format!("{stem}.{ext}"));
        emit_module(backend, &mut cx, module, &stems, root)?;
        stems.push(stem);
    }

    backend.emit_module_imports(&mut cx, &stems, imports)?;
    if let Some(main) = &program.main {
        backend.emit_call_to_main(&mut cx, main, main_root)?;
    }

    let mut files: Vec<OutputFile> = cx
        .into_code()
        .flatten_files()
        .into_iter()
        .map(|(name, contents)| OutputFile { name, contents })
        .collect();
    files.push(backend.runtime_file());
    debug!(files = files.len(), "generation finished");
    Ok(GeneratedProgram { main_file, files })
}

#[instrument(level = "debug", skip_all, fields(module = %module.name))]
fn emit_module<B: Backend>(
    backend: &B,
    cx: &mut CodegenContext<'_>,
    module: &Module,
    previous: &[String],
    root: CodeId,
) -> CodegenResult<()> {
    backend.begin_module(cx, module, previous, root)?;
    for decl in &module.decls {
        match decl {
            TopLevelDecl::Class(c) if c.is_extern => {}
            TopLevelDecl::Class(c) => backend.declare_class(cx, module, c, root)?,
            TopLevelDecl::Trait(t) => backend.declare_trait(cx, module, t, root)?,
            TopLevelDecl::Datatype(d) => backend.declare_datatype(cx, module, d, root)?,
            TopLevelDecl::Newtype(n) => backend.declare_newtype(cx, module, n, root)?,
            TopLevelDecl::SubsetType(s) => backend.declare_subset_type(cx, module, s, root)?,
            TopLevelDecl::Iterator(i) => backend.declare_iterator(cx, module, i, root)?,
        }
    }
    if module.members.iter().any(|m| !m.is_ghost()) {
        backend.declare_default_class(cx, module, &module.members, root)?;
    }
    Ok(())
}
