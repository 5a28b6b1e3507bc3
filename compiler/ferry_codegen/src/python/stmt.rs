//! Statement Code Generation
//!
//! Each statement writes its lines into `wr`. Expressions it contains get a
//! fork placed before those lines for hoisted helpers.

use ferry_ir::{Bound, Expr, ExprKind, MatchCase, MemberRef, Selector, SourceLoc, Stmt, StmtKind};

use super::comprehension::bound_pool;
use super::expr::{call_text, emit_expr, emit_exprs, string_literal};
use super::names::sanitize;
use super::types::{default_value, type_name};
use super::{not_lowered, RUNTIME};
use crate::code_tree::CodeId;
use crate::{ensure_sufficient_stack, CodegenContext, CodegenError, CodegenResult, Feature};

/// Emit a statement list; an empty list becomes `pass`.
pub fn emit_stmts(cx: &mut CodegenContext<'_>, stmts: &[Stmt], wr: CodeId) -> CodegenResult<()> {
    if stmts.is_empty() {
        cx.code.line(wr, "pass");
    }
    for stmt in stmts {
        emit_stmt(cx, stmt, wr)?;
    }
    Ok(())
}

pub fn emit_stmt(cx: &mut CodegenContext<'_>, stmt: &Stmt, wr: CodeId) -> CodegenResult<()> {
    ensure_sufficient_stack(|| emit_stmt_inner(cx, stmt, wr))
}

/// The halt position argument: `"file(line,col)"`, or `None` for synthesized code.
pub fn location_text(cx: &CodegenContext<'_>, loc: SourceLoc) -> String {
    if loc.is_synthetic() {
        return "None".to_string();
    }
    string_literal(&format!("{}{loc}", cx.index.program().source_file))
}

/// Evaluate `e` once into a temporary unless it is already a plain name.
fn stable(cx: &mut CodegenContext<'_>, e: &Expr, wst: CodeId, hoist: bool) -> CodegenResult<String> {
    let text = emit_expr(cx, e, wst)?;
    if !hoist || matches!(e.kind, ExprKind::Ident(_) | ExprKind::This | ExprKind::Literal(_)) {
        return Ok(text);
    }
    let tmp = cx.fresh_name("lhs");
    cx.code.line(wst, format!("{tmp} = {text}"));
    Ok(tmp)
}

/// An assignment target. With `hoist`, receivers and indices are evaluated
/// into temporaries first so a parallel assignment sees them unchanged.
fn emit_lvalue(cx: &mut CodegenContext<'_>, target: &Expr, wst: CodeId, hoist: bool) -> CodegenResult<String> {
    match &target.kind {
        ExprKind::Ident(name) => Ok(sanitize(name)),
        ExprKind::Select {
            receiver,
            selector: Selector::Field(field),
        } => {
            let obj = stable(cx, receiver, wst, hoist)?;
            Ok(format!("{obj}.{}", sanitize(field)))
        }
        ExprKind::Index { collection, index } => {
            let c = stable(cx, collection, wst, hoist)?;
            let i = stable(cx, index, wst, hoist)?;
            Ok(format!("{c}[{i}]"))
        }
        ExprKind::ArrayIndex { array, indices } => {
            let mut out = stable(cx, array, wst, hoist)?;
            for i in indices {
                let i = stable(cx, i, wst, hoist)?;
                out.push_str(&format!("[{i}]"));
            }
            Ok(out)
        }
        _ => emit_expr(cx, target, wst),
    }
}

fn emit_lvalues(cx: &mut CodegenContext<'_>, targets: &[Expr], wst: CodeId) -> CodegenResult<String> {
    let hoist = targets.len() > 1;
    let mut out = Vec::with_capacity(targets.len());
    for target in targets {
        out.push(emit_lvalue(cx, target, wst, hoist)?);
    }
    Ok(out.join(", "))
}

/// The `return` that hands back every out-parameter of the current method.
pub fn return_outs(cx: &CodegenContext<'_>) -> String {
    match cx.frame() {
        Some(frame) if !frame.outs.is_empty() => format!("return {}", frame.outs.join(", ")),
        _ => "return".to_string(),
    }
}

fn emit_stmt_inner(cx: &mut CodegenContext<'_>, stmt: &Stmt, wr: CodeId) -> CodegenResult<()> {
    let wst = cx.code.fork(wr);
    let loc = stmt.loc;
    match &stmt.kind {
        StmtKind::VarDecl { vars, values } if values.is_empty() => {
            for var in vars {
                let ty = type_name(cx, &var.ty, loc)?;
                let init = default_value(cx, &var.ty, loc, wst)?;
                cx.code.line(wr, format!("{}: {ty} = {init}", sanitize(&var.name)));
            }
        }
        StmtKind::VarDecl { vars, values } => {
            let values = emit_exprs(cx, values, wst)?;
            let names: Vec<String> = vars.iter().map(|v| sanitize(&v.name)).collect();
            cx.code.line(wr, format!("{} = {}", names.join(", "), values.join(", ")));
        }
        StmtKind::Assign { targets, values } => {
            let lhs = emit_lvalues(cx, targets, wst)?;
            let rhs = emit_exprs(cx, values, wst)?;
            cx.code.line(wr, format!("{lhs} = {}", rhs.join(", ")));
        }
        StmtKind::Call {
            targets,
            callee,
            receiver,
            args,
        } => {
            let lhs = emit_lvalues(cx, targets, wst)?;
            let call = call_text(cx, callee, receiver.as_ref(), args, wst)?;
            if targets.is_empty() {
                cx.code.line(wr, call);
            } else {
                cx.code.line(wr, format!("{lhs} = {call}"));
            }
        }
        StmtKind::AssignSuchThat { bounds, constraint } => {
            let label = cx.fresh_name("assign");
            let outer = cx
                .code
                .block(wr, format!("with {RUNTIME}.label(\"{label}\"):"), None);
            let mut body = outer;
            for bound in bounds {
                let pool = bound_pool(cx, bound, loc, body)?;
                body = cx
                    .code
                    .block(body, format!("for {} in {pool}:", sanitize(&bound.var.name)), None);
            }
            let cond = emit_expr(cx, constraint, body)?;
            let found = cx.code.block(body, format!("if {cond}:"), None);
            cx.code.line(found, format!("{RUNTIME}._break(\"{label}\")"));
            cx.code.line(
                outer,
                "raise Exception(\"assign-such-that search produced no value\")",
            );
        }
        StmtKind::Print(values) => {
            for value in values {
                let value = emit_expr(cx, value, wst)?;
                cx.code.line(wr, format!("{RUNTIME}.print({value})"));
            }
        }
        StmtKind::Return(values) if values.is_empty() => cx.code.line(wr, return_outs(cx)),
        StmtKind::Return(values) => {
            let values = emit_exprs(cx, values, wst)?;
            cx.code.line(wr, format!("return {}", values.join(", ")));
        }
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let cond = emit_expr(cx, cond, wst)?;
            let then = cx.code.block(wr, format!("if {cond}:"), None);
            emit_stmts(cx, then_branch, then)?;
            if let Some(else_branch) = else_branch {
                let els = cx.code.block(wr, "else:", None);
                emit_stmts(cx, else_branch, els)?;
            }
        }
        StmtKind::While { cond, body } => {
            cx.code.write(wr, "while ");
            let header = cx.code.hole(wr);
            let inner = cx.code.block(wr, ":", None);
            let pre = cx.code.fork(inner);
            let cond = emit_expr(cx, cond, pre)?;
            if cx.code.is_empty(pre) {
                cx.code.fill(header, cond);
            } else {
                // The condition needs hoisted statements; test it inside the loop.
                cx.code.fill(header, "True");
                let exit = cx.code.block(inner, format!("if not {cond}:"), None);
                cx.code.line(exit, "break");
            }
            emit_stmts(cx, body, inner)?;
        }
        StmtKind::ForCount { var, count, body } => {
            let count = emit_expr(cx, count, wst)?;
            let inner = cx
                .code
                .block(wr, format!("for {} in range({count}):", sanitize(&var.name)), None);
            emit_stmts(cx, body, inner)?;
        }
        StmtKind::For { .. } => return not_lowered(cx, Feature::ForLoops, loc),
        StmtKind::Forall { bound, range, body } => emit_forall(cx, bound, range.as_ref(), body, loc, wr, wst)?,
        StmtKind::Break(None) => cx.code.line(wr, "break"),
        StmtKind::Break(Some(label)) => {
            cx.code.line(wr, format!("{RUNTIME}._break(\"{}\")", sanitize(label)));
        }
        StmtKind::Continue(None) => cx.code.line(wr, "continue"),
        StmtKind::Continue(Some(_)) => return not_lowered(cx, Feature::LabeledContinue, loc),
        StmtKind::Block(body) => {
            let inner = cx.code.block(wr, "if True:", None);
            emit_stmts(cx, body, inner)?;
        }
        StmtKind::Labeled { label, body } => {
            let inner = cx
                .code
                .block(wr, format!("with {RUNTIME}.label(\"{}\"):", sanitize(label)), None);
            emit_stmts(cx, body, inner)?;
        }
        StmtKind::Match { source, cases } => emit_match(cx, source, cases, wr, wst)?,
        StmtKind::Halt(message) => {
            let message = emit_expr(cx, message, wst)?;
            let at = location_text(cx, loc);
            cx.code
                .line(wr, format!("raise {RUNTIME}.HaltException({message}, {at})"));
        }
        StmtKind::HaltRecovery {
            body,
            message_var,
            recovery,
        } => {
            let attempt = cx.code.block(wr, "try:", None);
            emit_stmts(cx, body, attempt)?;
            let halt = cx.fresh_name("halt");
            let handler = cx
                .code
                .block(wr, format!("except {RUNTIME}.HaltException as {halt}:"), None);
            cx.code
                .line(handler, format!("{} = {halt}.message", sanitize(message_var)));
            for stmt in recovery {
                emit_stmt(cx, stmt, handler)?;
            }
        }
        StmtKind::Expect { cond, message } => {
            let cond = emit_expr(cx, cond, wst)?;
            let message = match message {
                Some(m) => emit_expr(cx, m, wst)?,
                None => format!("{RUNTIME}.Seq(\"expectation violation\")"),
            };
            let at = location_text(cx, loc);
            cx.code
                .line(wr, format!("{RUNTIME}.expect({cond}, {message}, {at})"));
        }
        StmtKind::TailCall(args) => {
            let params = cx.frame().map(|f| f.ins.clone()).unwrap_or_default();
            emit_tail_call(cx, &params, args, wr, wst)?;
        }
        StmtKind::Absurd => cx
            .code
            .line(wr, "raise Exception(\"unreachable alternative\")"),
    }
    Ok(())
}

/// Rebind the in-parameters to `args` and restart the enclosing body.
fn emit_tail_call(
    cx: &mut CodegenContext<'_>,
    params: &[String],
    args: &[Expr],
    wr: CodeId,
    wst: CodeId,
) -> CodegenResult<()> {
    if params.len() != args.len() {
        return Err(CodegenError::internal(format!(
            "tail call passes {} arguments for {} parameters",
            args.len(),
            params.len()
        )));
    }
    // All arguments are evaluated before any parameter changes.
    let mut rebinds = Vec::new();
    for (param, arg) in params.iter().zip(args) {
        let value = emit_expr(cx, arg, wst)?;
        if value == *param {
            continue;
        }
        let tmp = cx.fresh_name("in");
        cx.code.line(wr, format!("{tmp} = {value}"));
        rebinds.push(format!("{param} = {tmp}"));
    }
    for rebind in rebinds {
        cx.code.line(wr, rebind);
    }
    cx.code.line(wr, format!("{RUNTIME}._tail_call()"));
    Ok(())
}

/// Whether `e` calls `member` again on the same receiver.
fn is_self_call<'e>(e: &'e Expr, member: &MemberRef) -> Option<&'e [Expr]> {
    match &e.kind {
        ExprKind::Call {
            callee,
            receiver,
            args,
        } if callee == member
            && receiver
                .as_deref()
                .map_or(true, |r| matches!(r.kind, ExprKind::This)) =>
        {
            Some(args)
        }
        _ => None,
    }
}

/// Body of a tail-recursive function: every tail position either returns
/// or, for a self call, rebinds the parameters and restarts.
pub fn emit_tail_return(
    cx: &mut CodegenContext<'_>,
    body: &Expr,
    member: &MemberRef,
    params: &[String],
    wr: CodeId,
) -> CodegenResult<()> {
    ensure_sufficient_stack(|| {
        let wst = cx.code.fork(wr);
        if let Some(args) = is_self_call(body, member) {
            return emit_tail_call(cx, params, args, wr, wst);
        }
        match &body.kind {
            ExprKind::Ite {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond = emit_expr(cx, cond, wst)?;
                let then = cx.code.block(wr, format!("if {cond}:"), None);
                emit_tail_return(cx, then_expr, member, params, then)?;
                let els = cx.code.block(wr, "else:", None);
                emit_tail_return(cx, else_expr, member, params, els)
            }
            ExprKind::Let { vars, values, body } => {
                let values = emit_exprs(cx, values, wst)?;
                let names: Vec<String> = vars.iter().map(|v| sanitize(&v.name)).collect();
                cx.code.line(wr, format!("{} = {}", names.join(", "), values.join(", ")));
                emit_tail_return(cx, body, member, params, wr)
            }
            _ => {
                let value = emit_expr(cx, body, wst)?;
                cx.code.line(wr, format!("return {value}"));
                Ok(())
            }
        }
    })
}

fn emit_match(
    cx: &mut CodegenContext<'_>,
    source: &Expr,
    cases: &[MatchCase],
    wr: CodeId,
    wst: CodeId,
) -> CodegenResult<()> {
    let index = cx.index;
    let normalized = index.normalize(&source.ty);
    let dt = normalized
        .decl_path()
        .and_then(|path| index.datatype(path))
        .ok_or_else(|| CodegenError::internal("match on a value that is not a datatype"))?;
    let value = emit_expr(cx, source, wst)?;
    let tmp = cx.fresh_name("source");
    cx.code.line(wr, format!("{tmp} = {value}"));
    for (i, case) in cases.iter().enumerate() {
        let header = if cases.len() == 1 {
            "if True:".to_string()
        } else if i + 1 == cases.len() {
            "else:".to_string()
        } else {
            let keyword = if i == 0 { "if" } else { "elif" };
            format!("{keyword} {tmp}.is_{}:", sanitize(&case.ctor))
        };
        let arm = cx.code.block(wr, header, None);
        let ctor = dt
            .ctor(&case.ctor)
            .ok_or_else(|| CodegenError::internal(format!("unknown constructor {}", case.ctor)))?;
        for (field, binding) in ctor.fields.iter().zip(&case.bindings) {
            if let (false, Some(var)) = (field.is_ghost, binding) {
                cx.code
                    .line(arm, format!("{} = {tmp}.{}", sanitize(&var.name), sanitize(&field.name)));
            }
        }
        emit_stmts(cx, &case.body, arm)?;
    }
    Ok(())
}

/// A `forall` whose body assigns one array element or object field per
/// value: collect the updates first, then apply them.
fn emit_forall(
    cx: &mut CodegenContext<'_>,
    bound: &Bound,
    range: Option<&Expr>,
    body: &Stmt,
    loc: SourceLoc,
    wr: CodeId,
    wst: CodeId,
) -> CodegenResult<()> {
    let StmtKind::Assign { targets, values } = &body.kind else {
        return not_lowered(cx, Feature::NonSequentializableForall, loc);
    };
    let ([target], [value]) = (targets.as_slice(), values.as_slice()) else {
        return not_lowered(cx, Feature::NonSequentializableForall, loc);
    };
    let sequentializable = match &target.kind {
        ExprKind::Index { .. } => true,
        ExprKind::ArrayIndex { indices, .. } => !indices.is_empty(),
        ExprKind::Select {
            selector: Selector::Field(_),
            ..
        } => true,
        _ => false,
    };
    if !sequentializable {
        return not_lowered(cx, Feature::NonSequentializableForall, loc);
    }

    let updates = cx.fresh_name("forall");
    let pool = bound_pool(cx, bound, loc, wst)?;
    cx.code.line(wr, format!("{updates} = []"));
    let mut inner = cx
        .code
        .block(wr, format!("for {} in {pool}:", sanitize(&bound.var.name)), None);
    if let Some(range) = range {
        let cond = emit_expr(cx, range, inner)?;
        inner = cx.code.block(inner, format!("if {cond}:"), None);
    }

    let entry = cx.fresh_name("entry");
    let apply = match &target.kind {
        ExprKind::Select {
            receiver,
            selector: Selector::Field(field),
        } => {
            let obj = emit_expr(cx, receiver, inner)?;
            let value = emit_expr(cx, value, inner)?;
            cx.code.line(inner, format!("{updates}.append(({obj}, {value}))"));
            format!("{entry}[0].{} = {entry}[1]", sanitize(field))
        }
        ExprKind::Index { collection, index } => {
            let container = emit_expr(cx, collection, inner)?;
            let key = emit_expr(cx, index, inner)?;
            let value = emit_expr(cx, value, inner)?;
            cx.code
                .line(inner, format!("{updates}.append(({container}, {key}, {value}))"));
            format!("{entry}[0][{entry}[1]] = {entry}[2]")
        }
        ExprKind::ArrayIndex { array, indices } => {
            let mut container = emit_expr(cx, array, inner)?;
            let (last, leading) = indices
                .split_last()
                .ok_or_else(|| CodegenError::internal("array index without indices"))?;
            for i in leading {
                let i = emit_expr(cx, i, inner)?;
                container.push_str(&format!("[{i}]"));
            }
            let key = emit_expr(cx, last, inner)?;
            let value = emit_expr(cx, value, inner)?;
            cx.code
                .line(inner, format!("{updates}.append(({container}, {key}, {value}))"));
            format!("{entry}[0][{entry}[1]] = {entry}[2]")
        }
        _ => return Err(CodegenError::internal("unexpected forall target")),
    };
    let apply_loop = cx.code.block(wr, format!("for {entry} in {updates}:"), None);
    cx.code.line(apply_loop, apply);
    Ok(())
}

#[cfg(test)]
mod tests;
