//! Run-scoped code generation state.
//!
//! One `CodegenContext` exists per compilation run and is threaded by
//! reference through the whole traversal. Nothing here is global, so
//! concurrent runs in one process do not interact.

use ferry_ir::{ProgramIndex, SourceLoc};

use crate::code_tree::CodeTree;
use crate::{CodegenError, CodegenResult, Feature, FeatureSet};

/// Names visible to statements of the member currently being emitted.
#[derive(Clone, Debug, Default)]
pub struct MemberFrame {
    /// How the body refers to the receiver (`this`).
    pub receiver: String,
    /// Sanitized in-parameter names (targets of tail-call rebinding).
    pub ins: Vec<String>,
    /// Sanitized out-parameter names (returned together).
    pub outs: Vec<String>,
}

/// Code generation context.
pub struct CodegenContext<'a> {
    /// Declaration lookup for the program being compiled.
    pub index: &'a ProgramIndex<'a>,
    /// Output under construction.
    pub code: CodeTree,
    unsupported: FeatureSet,
    /// Next suffix for generated names; never decreases.
    fresh_counter: u32,
    frame: Option<MemberFrame>,
}

impl<'a> CodegenContext<'a> {
    pub fn new(index: &'a ProgramIndex<'a>, unsupported: FeatureSet) -> Self {
        CodegenContext {
            index,
            code: CodeTree::new(),
            unsupported,
            fresh_counter: 0,
            frame: None,
        }
    }

    /// Fail with [`CodegenError::Unsupported`] if the target lacks `feature`.
    pub fn require(&self, feature: Feature, loc: SourceLoc) -> CodegenResult<()> {
        if self.unsupported.has(feature) {
            tracing::debug!(?feature, %loc, "unsupported construct");
            return Err(CodegenError::unsupported(feature, loc));
        }
        Ok(())
    }

    /// A name no user identifier and no other generated name can take.
    ///
    /// Generated names start with `_` followed by a letter; sanitized user
    /// names never do.
    pub fn fresh_name(&mut self, base: &str) -> String {
        let n = self.fresh_counter;
        self.fresh_counter += 1;
        format!("_{base}{n}")
    }

    /// Install the frame for the member about to be emitted.
    pub fn enter_member(&mut self, frame: MemberFrame) -> Option<MemberFrame> {
        self.frame.replace(frame)
    }

    /// Restore the frame saved by [`CodegenContext::enter_member`].
    pub fn leave_member(&mut self, saved: Option<MemberFrame>) {
        self.frame = saved;
    }

    pub fn frame(&self) -> Option<&MemberFrame> {
        self.frame.as_ref()
    }

    pub fn into_code(self) -> CodeTree {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_ir::Program;

    fn empty_program() -> Program {
        Program {
            name: "p".into(),
            source_file: "p.dfy".into(),
            modules: Vec::new(),
            main: None,
        }
    }

    #[test]
    fn fresh_names_never_repeat() {
        let program = empty_program();
        let index = ProgramIndex::new(&program);
        let mut cx = CodegenContext::new(&index, FeatureSet::empty());
        let a = cx.fresh_name("lambda");
        let b = cx.fresh_name("lambda");
        let c = cx.fresh_name("iife");
        assert_eq!(a, "_lambda0");
        assert_eq!(b, "_lambda1");
        assert_eq!(c, "_iife2");
    }

    #[test]
    fn require_consults_the_registry() {
        let program = empty_program();
        let index = ProgramIndex::new(&program);
        let cx = CodegenContext::new(&index, FeatureSet::MULTISETS);
        assert!(cx.require(Feature::Iterators, SourceLoc::SYNTHETIC).is_ok());
        assert_eq!(
            cx.require(Feature::Multisets, SourceLoc::new(1, 2)),
            Err(CodegenError::unsupported(Feature::Multisets, SourceLoc::new(1, 2)))
        );
    }

    #[test]
    fn member_frames_nest() {
        let program = empty_program();
        let index = ProgramIndex::new(&program);
        let mut cx = CodegenContext::new(&index, FeatureSet::empty());
        let outer = cx.enter_member(MemberFrame {
            ins: vec!["n".into()],
            ..MemberFrame::default()
        });
        assert!(outer.is_none());
        let saved = cx.enter_member(MemberFrame::default());
        assert!(cx.frame().is_some_and(|f| f.ins.is_empty()));
        cx.leave_member(saved);
        assert_eq!(cx.frame().map(|f| f.ins.clone()), Some(vec!["n".to_string()]));
    }
}
