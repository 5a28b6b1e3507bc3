//! Fixtures shared by the backend's unit tests.

use ferry_ir::{Member, Module, Program, ProgramIndex, TopLevelDecl};

use super::PythonBackend;
use crate::code_tree::CodeId;
use crate::{Backend, CodegenContext};

pub const M: &str = "_module";

/// A program with one default module holding `decls` and `members`.
pub fn program(decls: Vec<TopLevelDecl>, members: Vec<Member>) -> Program {
    let mut module = Module::default_module();
    module.decls = decls;
    module.members = members;
    Program {
        name: "t".into(),
        source_file: "t.dfy".into(),
        modules: vec![module],
        main: None,
    }
}

/// Run `f` against a fresh Python context and return its result together
/// with the text written into the root node.
pub fn with_cx<R>(
    program: &Program,
    f: impl FnOnce(&mut CodegenContext<'_>, CodeId) -> R,
) -> (R, String) {
    let index = ProgramIndex::new(program);
    let mut cx = CodegenContext::new(&index, PythonBackend.unsupported_features());
    let root = cx.code.new_file("t.py");
    let result = f(&mut cx, root);
    let text = cx.code.flatten(root);
    (result, text)
}
