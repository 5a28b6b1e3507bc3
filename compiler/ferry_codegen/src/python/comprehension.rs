//! Bound-variable pools, quantifiers and collection comprehensions.
//!
//! Quantifiers become nested predicate functions handed to the runtime;
//! comprehensions become a builder function with one loop per bound
//! variable. Both are hoisted as `def`s only, so evaluation of the
//! surrounding expression is unchanged.

use ferry_ir::{Bound, BoundPool, Expr, SourceLoc};

use super::expr::{emit_expr, py_bool};
use super::names::{decl_name, sanitize};
use super::{not_lowered, RUNTIME};
use crate::base::has_finite_values;
use crate::code_tree::CodeId;
use crate::{CodegenContext, CodegenError, CodegenResult, Feature};

/// An iterable over the candidate values of `bound`.
pub fn bound_pool(
    cx: &mut CodegenContext<'_>,
    bound: &Bound,
    loc: SourceLoc,
    wst: CodeId,
) -> CodegenResult<String> {
    Ok(match &bound.pool {
        BoundPool::Bool => "[False, True]".to_string(),
        BoundPool::Char => format!("{RUNTIME}.AllChars()"),
        BoundPool::IntRange {
            lo: Some(lo),
            hi: Some(hi),
        } => {
            let lo = emit_expr(cx, lo, wst)?;
            let hi = emit_expr(cx, hi, wst)?;
            format!("range({lo}, {hi})")
        }
        BoundPool::IntRange { .. } | BoundPool::Unbounded => {
            return not_lowered(cx, Feature::NonFiniteBounds, loc)
        }
        BoundPool::Elements(collection) => emit_expr(cx, collection, wst)?,
        BoundPool::Datatype(path) if has_finite_values(cx.index, path) => {
            format!("{}.AllValues", decl_name(path))
        }
        BoundPool::Datatype(_) => return not_lowered(cx, Feature::NonFiniteBounds, loc),
        BoundPool::Exact(value) => format!("[{}]", emit_expr(cx, value, wst)?),
    })
}

/// `forall`/`exists` over `bounds`, one nested predicate per variable.
pub fn quantifier(
    cx: &mut CodegenContext<'_>,
    is_forall: bool,
    bounds: &[Bound],
    range: Option<&Expr>,
    term: &Expr,
    loc: SourceLoc,
    wst: CodeId,
) -> CodegenResult<String> {
    let Some((first, rest)) = bounds.split_first() else {
        let term = emit_expr(cx, term, wst)?;
        let Some(range) = range else {
            return Ok(term);
        };
        let range = emit_expr(cx, range, wst)?;
        return Ok(if is_forall {
            format!("(not {range} or {term})")
        } else {
            format!("({range} and {term})")
        });
    };
    let pool = bound_pool(cx, first, loc, wst)?;
    let name = cx.fresh_name("lambda");
    let def = cx
        .code
        .block(wst, format!("def {name}({}):", sanitize(&first.var.name)), None);
    let inner = cx.code.fork(def);
    let body = quantifier(cx, is_forall, rest, range, term, loc, inner)?;
    cx.code.line(def, format!("return {body}"));
    Ok(format!("{RUNTIME}.quantifier({pool}, {}, {name})", py_bool(is_forall)))
}

/// Emit a builder function whose innermost body is produced by `add`.
fn builder(
    cx: &mut CodegenContext<'_>,
    kind: &str,
    bounds: &[Bound],
    range: Option<&Expr>,
    loc: SourceLoc,
    wst: CodeId,
    add: impl FnOnce(&mut CodegenContext<'_>, &str, CodeId) -> CodegenResult<()>,
) -> CodegenResult<String> {
    let func = cx.fresh_name(&kind.to_lowercase());
    let coll = cx.fresh_name("coll");
    let def = cx.code.block(wst, format!("def {func}():"), None);
    let empty = if kind == "Set" { "set()" } else { "dict()" };
    cx.code.line(def, format!("{coll} = {empty}"));
    let mut body = def;
    for bound in bounds {
        let pool = bound_pool(cx, bound, loc, body)?;
        body = cx
            .code
            .block(body, format!("for {} in {pool}:", sanitize(&bound.var.name)), None);
    }
    if let Some(range) = range {
        let cond = emit_expr(cx, range, body)?;
        body = cx.code.block(body, format!("if {cond}:"), None);
    }
    add(cx, &coll, body)?;
    cx.code.line(def, format!("return {RUNTIME}.{kind}({coll})"));
    Ok(format!("{func}()"))
}

pub fn set_comprehension(
    cx: &mut CodegenContext<'_>,
    bounds: &[Bound],
    range: Option<&Expr>,
    term: &Expr,
    loc: SourceLoc,
    wst: CodeId,
) -> CodegenResult<String> {
    builder(cx, "Set", bounds, range, loc, wst, |cx, coll, body| {
        let term = emit_expr(cx, term, body)?;
        cx.code.line(body, format!("{coll}.add({term})"));
        Ok(())
    })
}

/// Without an explicit `key`, the single bound variable is the key.
pub fn map_comprehension(
    cx: &mut CodegenContext<'_>,
    bounds: &[Bound],
    range: Option<&Expr>,
    key: Option<&Expr>,
    value: &Expr,
    loc: SourceLoc,
    wst: CodeId,
) -> CodegenResult<String> {
    builder(cx, "Map", bounds, range, loc, wst, |cx, coll, body| {
        let key = match key {
            Some(key) => emit_expr(cx, key, body)?,
            None => bounds
                .first()
                .map(|b| sanitize(&b.var.name))
                .ok_or_else(|| CodegenError::internal("map comprehension without a bound variable"))?,
        };
        let value = emit_expr(cx, value, body)?;
        cx.code.line(body, format!("{coll}[{key}] = {value}"));
        Ok(())
    })
}

#[cfg(test)]
mod tests;
