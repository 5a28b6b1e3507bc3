//! Declaration lowering: files, classes, datatypes and members.

use ferry_ir::{
    ClassDecl, DatatypeDecl, DeclPath, Field, Formal, Function, Member, MemberRef, Method, Module,
    Program, Stmt, TopLevelDecl, Type,
};
use rustc_hash::FxHashSet;

use super::expr::{emit_expr, is_property, string_literal};
use super::names::{ctor_class, ctor_class_ref, decl_name, module_name, sanitize};
use super::stmt::{emit_stmts, emit_tail_return, return_outs};
use super::types::{default_value, out_param_default, type_name};
use super::{not_lowered, RUNTIME};
use crate::base::{has_finite_values, is_top_type, needs_custom_receiver};
use crate::code_tree::CodeId;
use crate::{CodegenContext, CodegenError, CodegenResult, Feature, MemberFrame};

/// Receiver parameter of members with a synthesized receiver.
const CUSTOM_RECEIVER: &str = "_this";

fn emit_imports(cx: &mut CodegenContext<'_>, wr: CodeId) {
    cx.code.line(wr, "from __future__ import annotations");
    cx.code.line(wr, "import sys");
    cx.code.line(wr, "from typing import Callable, Any, TypeVar, NamedTuple");
    cx.code.line(wr, "from math import floor");
    cx.code.newline(wr);
    cx.code.line(wr, format!("import {RUNTIME}"));
}

pub fn emit_header(cx: &mut CodegenContext<'_>, program: &Program, wr: CodeId) {
    cx.code
        .line(wr, format!("# Ferry program {} compiled into Python", program.name));
    emit_imports(cx, wr);
}

pub fn emit_module_imports(cx: &mut CodegenContext<'_>, stems: &[String], wr: CodeId) {
    for stem in stems {
        cx.code.line(wr, format!("import {stem}"));
    }
    cx.code.newline(wr);
}

pub fn begin_module(cx: &mut CodegenContext<'_>, module: &Module, previous: &[String], wr: CodeId) {
    let stem = module_name(&module.name);
    emit_imports(cx, wr);
    for prev in previous {
        cx.code.line(wr, format!("import {prev}"));
    }
    cx.code.newline(wr);
    cx.code.line(wr, module_marker(module));
    cx.code.line(wr, format!("{stem} = sys.modules[__name__]"));
    cx.code.newline(wr);
}

pub fn emit_call_to_main(cx: &mut CodegenContext<'_>, main: &MemberRef, wr: CodeId) {
    let attempt = cx.code.block(wr, "try:", None);
    cx.code
        .line(attempt, format!("{}.{}()", decl_name(&main.owner), sanitize(&main.name)));
    let handler = cx
        .code
        .block(wr, format!("except {RUNTIME}.HaltException as e:"), None);
    cx.code.line(
        handler,
        format!("{RUNTIME}.print(\"[Program halted] \" + str(e) + \"\\n\")"),
    );
    let located = cx.code.block(handler, "if e.location is not None:", None);
    cx.code.line(located, "print(e.location, file=sys.stderr)");
}

/// `class Name(Bases):` followed by its body node.
fn open_class(cx: &mut CodegenContext<'_>, name: &str, bases: &[String], wr: CodeId) -> CodeId {
    let header = if bases.is_empty() {
        format!("class {name}:")
    } else {
        format!("class {name}({}):", bases.join(", "))
    };
    cx.code.block(wr, header, None)
}

/// Finish a class body, keeping an empty one syntactically valid.
fn close_class(cx: &mut CodegenContext<'_>, body: CodeId, wr: CodeId) {
    if cx.code.is_empty(body) {
        cx.code.line(body, "pass");
    }
    cx.code.newline(wr);
}

/// Trait ancestors of a class, nearest first, each listed once.
fn trait_ancestors(cx: &CodegenContext<'_>, parents: &[Type]) -> Vec<DeclPath> {
    let mut seen = FxHashSet::default();
    let mut pending: Vec<DeclPath> = parents.iter().filter_map(Type::decl_path).cloned().collect();
    let mut found = Vec::new();
    while let Some(path) = pending.pop() {
        if !seen.insert(path.clone()) {
            continue;
        }
        if let Some(TopLevelDecl::Trait(t)) = cx.index.decl(&path) {
            pending.extend(t.parents.iter().filter_map(Type::decl_path).cloned());
            found.push(path);
        }
    }
    found
}

/// Instance fields stored on the object, as opposed to computed constants.
fn is_stored_field(field: &Field) -> bool {
    !field.is_ghost && !field.is_static && !(field.is_const && field.rhs.is_some())
}

pub fn declare_class(
    cx: &mut CodegenContext<'_>,
    module: &Module,
    decl: &ClassDecl,
    wr: CodeId,
) -> CodegenResult<()> {
    let path = DeclPath::new(&module.name, &decl.name);
    let mut bases = Vec::new();
    for parent in decl.parents.iter().filter(|p| !is_top_type(p)) {
        bases.push(type_name(cx, parent, decl.loc)?);
    }
    let body = open_class(cx, &sanitize(&decl.name), &bases, wr);

    let own_names: FxHashSet<&str> = decl.members.iter().map(Member::name).collect();
    let traits = trait_ancestors(cx, &decl.parents);
    let index = cx.index;
    let mut stored: Vec<&Field> = Vec::new();
    let mut delegated: Vec<(DeclPath, &Field)> = Vec::new();
    for trait_path in &traits {
        for member in index.members_of(trait_path).unwrap_or_default() {
            let Member::Field(field) = member else { continue };
            if own_names.contains(field.name.as_str()) {
                continue;
            }
            if is_stored_field(field) {
                stored.push(field);
            } else if !field.is_ghost && !field.is_static {
                delegated.push((trait_path.clone(), field));
            }
        }
    }
    stored.extend(decl.members.iter().filter_map(|m| match m {
        Member::Field(f) if is_stored_field(f) => Some(f),
        _ => None,
    }));

    let has_constructor = decl
        .members
        .iter()
        .any(|m| matches!(m, Member::Method(me) if me.is_constructor && !me.is_ghost));
    if !stored.is_empty() || has_constructor {
        let init = cx.code.block(body, "def __init__(self):", None);
        for field in &stored {
            let wst = cx.code.fork(init);
            let ty = type_name(cx, &field.ty, field.loc)?;
            let value = default_value(cx, &field.ty, field.loc, wst)?;
            cx.code
                .line(init, format!("self.{}: {ty} = {value}", sanitize(&field.name)));
        }
        if stored.is_empty() {
            cx.code.line(init, "pass");
        }
    }

    for (trait_path, field) in delegated {
        let name = sanitize(&field.name);
        cx.code.line(body, "@property");
        let def = cx.code.block(body, format!("def {name}(self):"), None);
        cx.code
            .line(def, format!("return {}.{name}(self)", decl_name(&trait_path)));
    }

    let owner = index.decl(&path);
    for member in &decl.members {
        emit_member(cx, &path, owner, member, false, body)?;
    }
    close_class(cx, body, wr);
    Ok(())
}

pub fn declare_trait(
    cx: &mut CodegenContext<'_>,
    module: &Module,
    decl: &ClassDecl,
    wr: CodeId,
) -> CodegenResult<()> {
    let path = DeclPath::new(&module.name, &decl.name);
    let body = open_class(cx, &sanitize(&decl.name), &[], wr);
    let owner = cx.index.decl(&path);
    for member in &decl.members {
        emit_member(cx, &path, owner, member, false, body)?;
    }
    close_class(cx, body, wr);
    Ok(())
}

/// Iterable over the values of one constructor field, for `AllValues`.
fn field_pool(cx: &CodegenContext<'_>, ty: &Type) -> CodegenResult<String> {
    match cx.index.normalize(ty) {
        Type::Bool => Ok("[False, True]".to_string()),
        Type::UserDefined { decl, .. } => Ok(format!("{}.AllValues", decl_name(&decl))),
        other => Err(CodegenError::internal(format!("{other:?} has no finite value list"))),
    }
}

pub fn declare_datatype(
    cx: &mut CodegenContext<'_>,
    module: &Module,
    decl: &DatatypeDecl,
    wr: CodeId,
) -> CodegenResult<()> {
    if decl.is_co {
        return not_lowered(cx, Feature::Codatatypes, decl.loc);
    }
    let path = DeclPath::new(&module.name, &decl.name);
    let name = sanitize(&decl.name);
    let body = open_class(cx, &name, &[], wr);

    if decl.ctors.iter().all(|c| c.non_ghost_fields().next().is_none()) {
        let all: Vec<String> = decl
            .ctors
            .iter()
            .map(|c| format!("{}()", ctor_class_ref(&path, &c.name)))
            .collect();
        cx.code.line(body, format!("@{RUNTIME}.classproperty"));
        let def = cx.code.block(body, "def AllSingletonConstructors(cls):", None);
        cx.code.line(def, format!("return [{}]", all.join(", ")));
    }
    if has_finite_values(cx.index, &path) {
        let mut parts = Vec::new();
        for ctor in &decl.ctors {
            let class = ctor_class_ref(&path, &ctor.name);
            let fields: Vec<_> = ctor.non_ghost_fields().collect();
            if fields.is_empty() {
                parts.push(format!("[{class}()]"));
                continue;
            }
            let vars: Vec<String> = (0..fields.len()).map(|i| format!("f{i}")).collect();
            let mut loops = String::new();
            for (var, field) in vars.iter().zip(&fields) {
                loops.push_str(&format!(" for {var} in {}", field_pool(cx, &field.ty)?));
            }
            parts.push(format!("[{class}({}){loops}]", vars.join(", ")));
        }
        cx.code.line(body, format!("@{RUNTIME}.classproperty"));
        let def = cx.code.block(body, "def AllValues(cls):", None);
        cx.code.line(def, format!("return {}", parts.join(" + ")));
    }

    let repr = cx.code.block(body, "def __repr__(self) -> str:", None);
    cx.code.line(repr, "return self.__str__()");
    let ne = cx.code.block(body, "def __ne__(self, other) -> bool:", None);
    cx.code.line(ne, "return not self.__eq__(other)");
    for ctor in &decl.ctors {
        cx.code.line(body, "@property");
        let def = cx
            .code
            .block(body, format!("def is_{}(self) -> bool:", sanitize(&ctor.name)), None);
        cx.code.line(
            def,
            format!("return isinstance(self, {})", ctor_class_ref(&path, &ctor.name)),
        );
    }
    let owner = cx.index.decl(&path);
    for member in &decl.members {
        emit_member(cx, &path, owner, member, false, body)?;
    }
    cx.code.newline(wr);

    let printed = if module.is_default {
        decl.name.clone()
    } else {
        format!("{}.{}", module.name, decl.name)
    };
    for ctor in &decl.ctors {
        let fields: Vec<_> = ctor.non_ghost_fields().collect();
        let mut tuple_fields = Vec::with_capacity(fields.len());
        for field in &fields {
            let ty = type_name(cx, &field.ty, decl.loc)?;
            tuple_fields.push(format!("('{}', '{ty}')", sanitize(&field.name)));
        }
        let tuple = format!(
            "NamedTuple('{}', [{}])",
            sanitize(&ctor.name),
            tuple_fields.join(", ")
        );
        let class = open_class(cx, &ctor_class(&decl.name, &ctor.name), &[name.clone(), tuple], wr);

        let shown: Vec<String> = fields
            .iter()
            .map(|f| format!("{{{RUNTIME}.string_of(self.{})}}", sanitize(&f.name)))
            .collect();
        let args = if shown.is_empty() {
            String::new()
        } else {
            format!("({})", shown.join(", "))
        };
        let def = cx.code.block(class, "def __str__(self) -> str:", None);
        cx.code
            .line(def, format!("return f'{printed}.{}{args}'", ctor.name));

        let mut equal = vec![format!("isinstance(other, {})", ctor_class_ref(&path, &ctor.name))];
        equal.extend(fields.iter().map(|f| {
            let f = sanitize(&f.name);
            format!("self.{f} == other.{f}")
        }));
        let def = cx.code.block(class, "def __eq__(self, other) -> bool:", None);
        cx.code.line(def, format!("return {}", equal.join(" and ")));

        let def = cx.code.block(class, "def __hash__(self) -> int:", None);
        cx.code.line(def, "return super().__hash__()");
        close_class(cx, class, wr);
    }
    Ok(())
}

/// Newtypes and subset types: a class carrying `default()` and the members.
pub fn declare_refinement(cx: &mut CodegenContext<'_>, path: DeclPath, wr: CodeId) -> CodegenResult<()> {
    let decl = cx
        .index
        .decl(&path)
        .ok_or_else(|| CodegenError::internal(format!("unknown declaration {path:?}")))?;
    let body = open_class(cx, &sanitize(decl.name()), &[], wr);
    let ty = Type::UserDefined {
        decl: path.clone(),
        args: Vec::new(),
    };
    let loc = match decl {
        TopLevelDecl::Newtype(n) => n.loc,
        TopLevelDecl::SubsetType(s) => s.loc,
        _ => return Err(CodegenError::internal("refinement class for a non-refinement declaration")),
    };
    cx.code.line(body, "@staticmethod");
    let def = cx.code.block(body, "def default():", None);
    let wst = cx.code.fork(def);
    let value = default_value(cx, &ty, loc, wst)?;
    cx.code.line(def, format!("return {value}"));
    for member in decl.members() {
        emit_member(cx, &path, Some(decl), member, false, body)?;
    }
    close_class(cx, body, wr);
    Ok(())
}

pub fn declare_default_class(
    cx: &mut CodegenContext<'_>,
    module: &Module,
    members: &[Member],
    wr: CodeId,
) -> CodegenResult<()> {
    let path = DeclPath::default_class(&module.name);
    let body = open_class(cx, &sanitize(DeclPath::DEFAULT_CLASS), &[], wr);
    for member in members {
        emit_member(cx, &path, None, member, true, body)?;
    }
    close_class(cx, body, wr);
    Ok(())
}

/// How a member's body refers to its receiver.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Receiver {
    None,
    Native,
    Custom,
}

impl Receiver {
    fn of(owner: Option<&TopLevelDecl>, member: &Member, force_static: bool) -> Self {
        if force_static || member.is_static() {
            Receiver::None
        } else if owner.is_some_and(|o| needs_custom_receiver(o, member)) {
            Receiver::Custom
        } else {
            Receiver::Native
        }
    }

    fn name(self) -> &'static str {
        match self {
            Receiver::Custom => CUSTOM_RECEIVER,
            Receiver::None | Receiver::Native => "self",
        }
    }

    /// Decorator line and leading parameter, if any.
    fn signature(self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            Receiver::None => (Some("@staticmethod"), None),
            Receiver::Native => (None, Some("self")),
            Receiver::Custom => (Some("@staticmethod"), Some(CUSTOM_RECEIVER)),
        }
    }
}

/// Open `def name(params):`, with the receiver's decorator and parameter.
fn open_def(
    cx: &mut CodegenContext<'_>,
    receiver: Receiver,
    name: &str,
    params: &[String],
    wr: CodeId,
) -> CodeId {
    let (decorator, first) = receiver.signature();
    if let Some(decorator) = decorator {
        cx.code.line(wr, decorator);
    }
    let all: Vec<&str> = first
        .into_iter()
        .chain(params.iter().map(String::as_str))
        .collect();
    cx.code.block(wr, format!("def {name}({}):", all.join(", ")), None)
}

fn emit_member(
    cx: &mut CodegenContext<'_>,
    owner_path: &DeclPath,
    owner: Option<&TopLevelDecl>,
    member: &Member,
    force_static: bool,
    wr: CodeId,
) -> CodegenResult<()> {
    if member.is_ghost() {
        return Ok(());
    }
    let receiver = Receiver::of(owner, member, force_static);
    match member {
        Member::Field(field) => emit_field(cx, field, receiver, wr),
        Member::Method(method) => emit_method(cx, owner_path, method, receiver, wr),
        Member::Function(function) => emit_function(cx, owner_path, member, function, receiver, wr),
    }
}

fn emit_field(cx: &mut CodegenContext<'_>, field: &Field, receiver: Receiver, wr: CodeId) -> CodegenResult<()> {
    let name = sanitize(&field.name);
    let def = match (receiver, field.is_const, &field.rhs) {
        (Receiver::None, true, _) => {
            cx.code.line(wr, format!("@{RUNTIME}.classproperty"));
            cx.code.block(wr, format!("def {name}(cls):"), None)
        }
        (Receiver::None, false, _) => return not_lowered(cx, Feature::StaticMutableFields, field.loc),
        (Receiver::Custom, _, Some(_)) => open_def(cx, receiver, &name, &[], wr),
        (Receiver::Native, true, Some(_)) => {
            cx.code.line(wr, "@property");
            cx.code.block(wr, format!("def {name}(self):"), None)
        }
        // Stored fields are initialized by `__init__`.
        _ => return Ok(()),
    };
    let saved = cx.enter_member(MemberFrame {
        receiver: receiver.name().to_string(),
        ..MemberFrame::default()
    });
    let wst = cx.code.fork(def);
    let value = match &field.rhs {
        Some(rhs) => emit_expr(cx, rhs, wst),
        None => default_value(cx, &field.ty, field.loc, wst),
    };
    cx.leave_member(saved);
    cx.code.line(def, format!("return {}", value?));
    Ok(())
}

fn emit_method(
    cx: &mut CodegenContext<'_>,
    owner_path: &DeclPath,
    method: &Method,
    receiver: Receiver,
    wr: CodeId,
) -> CodegenResult<()> {
    if method.is_synthesized {
        return not_lowered(cx, Feature::MethodSynthesis, method.loc);
    }
    let Some(body) = &method.body else {
        return Ok(());
    };
    let ins: Vec<String> = method
        .ins
        .iter()
        .filter(|p| !p.is_ghost)
        .map(|p| sanitize(&p.name))
        .collect();
    let outs: Vec<_> = method.outs.iter().filter(|p| !p.is_ghost).collect();
    let def = open_def(cx, receiver, &sanitize(&method.name), &ins, wr);
    let saved = cx.enter_member(MemberFrame {
        receiver: receiver.name().to_string(),
        ins,
        outs: outs.iter().map(|p| sanitize(&p.name)).collect(),
    });
    let result = emit_method_body(cx, method, &outs, body, def);
    cx.leave_member(saved);
    tracing::trace!(owner = ?owner_path, method = %method.name, "method emitted");
    result
}

fn emit_method_body(
    cx: &mut CodegenContext<'_>,
    method: &Method,
    outs: &[&Formal],
    body: &[Stmt],
    def: CodeId,
) -> CodegenResult<()> {
    for out in outs {
        let wst = cx.code.fork(def);
        let ty = type_name(cx, &out.ty, method.loc)?;
        let value = out_param_default(cx, &out.ty, method.loc, wst)?;
        cx.code
            .line(def, format!("{}: {ty} = {value}", sanitize(&out.name)));
    }
    if method.is_tail_recursive {
        let restart = cx.code.block(def, "while True:", None);
        let scope = cx
            .code
            .block(restart, format!("with {RUNTIME}.label():"), None);
        let stmts = cx.code.fork(scope);
        emit_stmts(cx, body, stmts)?;
        cx.code.line(scope, "break");
    } else {
        emit_stmts(cx, body, def)?;
    }
    if !outs.is_empty() {
        cx.code.line(def, return_outs(cx));
    }
    Ok(())
}

fn emit_function(
    cx: &mut CodegenContext<'_>,
    owner_path: &DeclPath,
    member: &Member,
    function: &Function,
    receiver: Receiver,
    wr: CodeId,
) -> CodegenResult<()> {
    let Some(body) = &function.body else {
        return Ok(());
    };
    let name = sanitize(&function.name);
    let ins: Vec<String> = function
        .ins
        .iter()
        .filter(|p| !p.is_ghost)
        .map(|p| sanitize(&p.name))
        .collect();
    let def = match receiver {
        Receiver::Native if is_property(member) => {
            cx.code.line(wr, "@property");
            cx.code.block(wr, format!("def {name}(self):"), None)
        }
        Receiver::None if is_property(member) => {
            cx.code.line(wr, format!("@{RUNTIME}.classproperty"));
            cx.code.block(wr, format!("def {name}(cls):"), None)
        }
        _ => open_def(cx, receiver, &name, &ins, wr),
    };
    let saved = cx.enter_member(MemberFrame {
        receiver: receiver.name().to_string(),
        ins: ins.clone(),
        outs: Vec::new(),
    });
    let result = if function.is_tail_recursive {
        let restart = cx.code.block(def, "while True:", None);
        let scope = cx
            .code
            .block(restart, format!("with {RUNTIME}.label():"), None);
        let me = MemberRef::new(owner_path.clone(), function.name.clone());
        emit_tail_return(cx, body, &me, &ins, scope)
    } else {
        let wst = cx.code.fork(def);
        emit_expr(cx, body, wst).map(|value| cx.code.line(def, format!("return {value}")))
    };
    cx.leave_member(saved);
    result
}

/// The line that names the module a file implements.
pub fn module_marker(module: &Module) -> String {
    format!("assert {} == __name__", string_literal(&module_name(&module.name)))
}
