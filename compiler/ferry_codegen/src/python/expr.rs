//! Expression lowering.
//!
//! Every expression becomes a single Python expression string. Constructs
//! that need statements (lambdas, `let`, comprehensions, object allocation)
//! write them into `wst`, a fork positioned just before the statement that
//! uses the expression, and refer to the result by a fresh name.

use std::fmt::Write as _;

use ferry_ir::{
    CollectionKind, Expr, ExprKind, Formal, Literal, Member, MemberRef, Selector, SpecialField,
    TopLevelDecl, Type,
};

use super::comprehension::{map_comprehension, quantifier, set_comprehension};
use super::names::{ctor_class_ref, decl_name, sanitize};
use super::operators::{binary, conversion, unary};
use super::types::{default_value, type_name};
use super::{not_lowered, RUNTIME};
use crate::base::needs_custom_receiver;
use crate::code_tree::CodeId;
use crate::{ensure_sufficient_stack, CodegenContext, CodegenError, CodegenResult, Feature};

/// Lower `e`, hoisting any helper statements into `wst`.
pub fn emit_expr(cx: &mut CodegenContext<'_>, e: &Expr, wst: CodeId) -> CodegenResult<String> {
    ensure_sufficient_stack(|| emit_expr_inner(cx, e, wst))
}

pub fn emit_exprs<'e>(
    cx: &mut CodegenContext<'_>,
    exprs: impl IntoIterator<Item = &'e Expr>,
    wst: CodeId,
) -> CodegenResult<Vec<String>> {
    exprs.into_iter().map(|e| emit_expr(cx, e, wst)).collect()
}

/// How the current member body spells `this`.
pub fn this_name(cx: &CodegenContext<'_>) -> String {
    cx.frame()
        .map_or_else(|| "self".to_string(), |f| f.receiver.clone())
}

pub fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", u32::from(c));
        }
        c => out.push(c),
    }
}

/// A double-quoted Python string literal.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        push_escaped(&mut out, c, '"');
    }
    out.push('"');
    out
}

/// A single-quoted Python literal holding one character.
pub fn char_literal(c: char) -> String {
    let mut out = String::from("'");
    push_escaped(&mut out, c, '\'');
    out.push('\'');
    out
}

/// Drop arguments bound to ghost formals, when the call lists one argument per formal.
fn runtime_args<'e>(formals: &[Formal], args: &'e [Expr]) -> Vec<&'e Expr> {
    if formals.len() == args.len() {
        formals
            .iter()
            .zip(args)
            .filter(|(f, _)| !f.is_ghost)
            .map(|(_, a)| a)
            .collect()
    } else {
        args.iter().collect()
    }
}

fn member_ins(member: &Member) -> &[Formal] {
    match member {
        Member::Method(m) => &m.ins,
        Member::Function(f) => &f.ins,
        Member::Field(_) => &[],
    }
}

/// Whether `member` is rendered as a Python property rather than a method.
pub fn is_property(member: &Member) -> bool {
    matches!(member, Member::Function(f) if f.is_getter && f.ins.iter().all(|p| p.is_ghost))
}

/// Call of a function or method, as used by both call expressions and call statements.
pub fn call_text(
    cx: &mut CodegenContext<'_>,
    callee: &MemberRef,
    receiver: Option<&Expr>,
    args: &[Expr],
    wst: CodeId,
) -> CodegenResult<String> {
    let index = cx.index;
    let (owner, member) = index
        .find_member_owner(&callee.owner, &callee.name)
        .ok_or_else(|| CodegenError::internal(format!("call of unknown member {:?}.{}", callee.owner, callee.name)))?;
    let name = sanitize(&callee.name);
    let custom = index
        .decl(&owner)
        .is_some_and(|decl| needs_custom_receiver(decl, member));

    let mut rendered = Vec::new();
    let target = match receiver {
        Some(recv) if !member.is_static() => {
            let recv = emit_expr(cx, recv, wst)?;
            if custom {
                rendered.push(recv);
                format!("{}.{name}", decl_name(&owner))
            } else {
                format!("{recv}.{name}")
            }
        }
        _ => format!("{}.{name}", decl_name(&owner)),
    };
    for arg in runtime_args(member_ins(member), args) {
        rendered.push(emit_expr(cx, arg, wst)?);
    }
    if is_property(member) && !custom {
        return Ok(target);
    }
    Ok(format!("{target}({})", rendered.join(", ")))
}

fn emit_select(
    cx: &mut CodegenContext<'_>,
    receiver: &Expr,
    selector: &Selector,
    wst: CodeId,
) -> CodegenResult<String> {
    let recv = emit_expr(cx, receiver, wst)?;
    Ok(match selector {
        Selector::Field(name) => {
            let index = cx.index;
            let field = sanitize(name);
            let custom_owner = receiver
                .ty
                .decl_path()
                .and_then(|path| index.find_member_owner(path, name))
                .filter(|(owner, member)| {
                    !index.is_trait(owner)
                        && index.decl(owner).is_some_and(|d| needs_custom_receiver(d, member))
                });
            match custom_owner {
                Some((owner, _)) => format!("{}.{field}({recv})", decl_name(&owner)),
                None => format!("{recv}.{field}"),
            }
        }
        Selector::Destructor(name) => format!("{recv}.{}", sanitize(name)),
        Selector::IsCtor(ctor) => format!("{recv}.is_{}", sanitize(ctor)),
        Selector::TupleComponent(i) => format!("{recv}[{i}]"),
        Selector::Special(SpecialField::Keys) => format!("{recv}.keys"),
        Selector::Special(SpecialField::Values) => format!("{recv}.values"),
        Selector::Special(SpecialField::Items) => format!("{recv}.items"),
        Selector::Special(SpecialField::Floor) => format!("floor({recv})"),
        Selector::Special(SpecialField::Length(dim)) => {
            format!("len({recv}{})", "[0]".repeat(*dim as usize))
        }
    })
}

fn emit_literal(cx: &CodegenContext<'_>, lit: &Literal, ty: &Type) -> String {
    match lit {
        Literal::Bool(b) => py_bool(*b).to_string(),
        Literal::Int(n) if matches!(cx.index.normalize(ty), Type::Real) => {
            format!("{RUNTIME}.BigRational({n})")
        }
        Literal::Int(n) => n.to_string(),
        Literal::Real { mantissa, exponent } => {
            format!("{RUNTIME}.BigRational('{mantissa}e{exponent}')")
        }
        Literal::Char(c) => char_literal(*c),
        Literal::String(s) => format!("{RUNTIME}.Seq({})", string_literal(s)),
        Literal::Null => "None".to_string(),
    }
}

/// Emit `def <name>(<params>):` into `wst` returning the lowered `body`.
fn nested_def(
    cx: &mut CodegenContext<'_>,
    name: &str,
    params: &[String],
    body: &Expr,
    wst: CodeId,
) -> CodegenResult<()> {
    let def = cx.code.block(wst, format!("def {name}({}):", params.join(", ")), None);
    let inner = cx.code.fork(def);
    let result = emit_expr(cx, body, inner)?;
    cx.code.line(def, format!("return {result}"));
    Ok(())
}

fn is_char_seq(cx: &CodegenContext<'_>, ty: &Type) -> bool {
    matches!(cx.index.normalize(ty), Type::Seq(elem) if elem.is_char())
}

fn emit_expr_inner(cx: &mut CodegenContext<'_>, e: &Expr, wst: CodeId) -> CodegenResult<String> {
    let index = cx.index;
    Ok(match &e.kind {
        ExprKind::Literal(lit) => emit_literal(cx, lit, &e.ty),
        ExprKind::Ident(name) => sanitize(name),
        ExprKind::This => this_name(cx),
        ExprKind::Select { receiver, selector } => emit_select(cx, receiver, selector, wst)?,
        ExprKind::StaticField(field) => {
            let owner = index
                .find_member_owner(&field.owner, &field.name)
                .map_or_else(|| field.owner.clone(), |(owner, _)| owner);
            format!("{}.{}", decl_name(&owner), sanitize(&field.name))
        }
        ExprKind::Call {
            callee,
            receiver,
            args,
        } => call_text(cx, callee, receiver.as_deref(), args, wst)?,
        ExprKind::MemberValue { callee, receiver } => {
            let (owner, member) = index
                .find_member_owner(&callee.owner, &callee.name)
                .ok_or_else(|| CodegenError::internal(format!("reference to unknown member {}", callee.name)))?;
            let name = sanitize(&callee.name);
            match receiver {
                Some(recv) if !member.is_static() => {
                    let recv = emit_expr(cx, recv, wst)?;
                    if index.decl(&owner).is_some_and(|d| needs_custom_receiver(d, member)) {
                        format!("(lambda *_args, _r={recv}: {}.{name}(_r, *_args))", decl_name(&owner))
                    } else {
                        format!("{recv}.{name}")
                    }
                }
                _ => format!("{}.{name}", decl_name(&owner)),
            }
        }
        ExprKind::Apply { func, args } => {
            let func = emit_expr(cx, func, wst)?;
            let args = emit_exprs(cx, args, wst)?;
            format!("{func}({})", args.join(", "))
        }
        ExprKind::DatatypeValue {
            datatype,
            ctor,
            args,
        } => {
            let dt = index
                .datatype(datatype)
                .ok_or_else(|| CodegenError::internal(format!("unknown datatype {datatype:?}")))?;
            if dt.is_co {
                return not_lowered(cx, Feature::Codatatypes, e.loc);
            }
            let fields = dt.ctor(ctor).map_or(&[][..], |c| c.fields.as_slice());
            let args = emit_exprs(cx, runtime_args(fields, args), wst)?;
            format!("{}({})", ctor_class_ref(datatype, ctor), args.join(", "))
        }
        ExprKind::Tuple(items) => {
            let items = emit_exprs(cx, items, wst)?;
            if items.len() == 1 {
                format!("({},)", items[0])
            } else {
                format!("({})", items.join(", "))
            }
        }
        ExprKind::Index { collection, index } => {
            let collection = emit_expr(cx, collection, wst)?;
            let index = emit_expr(cx, index, wst)?;
            format!("{collection}[{index}]")
        }
        ExprKind::ArrayIndex { array, indices } => {
            let mut out = emit_expr(cx, array, wst)?;
            for i in emit_exprs(cx, indices, wst)? {
                let _ = write!(out, "[{i}]");
            }
            out
        }
        ExprKind::Slice { seq, lo, hi } => {
            let source = emit_expr(cx, seq, wst)?;
            let lo = match lo {
                Some(lo) => emit_expr(cx, lo, wst)?,
                None => String::new(),
            };
            let hi = match hi {
                Some(hi) => emit_expr(cx, hi, wst)?,
                None => String::new(),
            };
            if matches!(index.normalize(&seq.ty), Type::Array { .. }) {
                format!("{RUNTIME}.Seq({source}[{lo}:{hi}])")
            } else {
                let or_none = |s: String| if s.is_empty() { "None".to_string() } else { s };
                format!("{source}.slice({}, {})", or_none(lo), or_none(hi))
            }
        }
        ExprKind::Update {
            collection,
            index: key,
            value,
        } => match index.normalize(&collection.ty) {
            Type::Map(..) => {
                let map = emit_expr(cx, collection, wst)?;
                let key = emit_expr(cx, key, wst)?;
                let value = emit_expr(cx, value, wst)?;
                format!("{map}.set({key}, {value})")
            }
            Type::MultiSet(_) => return not_lowered(cx, Feature::Multisets, e.loc),
            _ => return not_lowered(cx, Feature::SequenceUpdate, e.loc),
        },
        ExprKind::SeqConstruction { length, init } => {
            let n = emit_expr(cx, length, wst)?;
            let f = emit_expr(cx, init, wst)?;
            let i = cx.fresh_name("i");
            let text = if is_char_seq(cx, &e.ty) { ", isStr=True" } else { "" };
            format!("{RUNTIME}.Seq([{f}({i}) for {i} in range({n})]{text})")
        }
        ExprKind::Display { kind, elements } => {
            let items = emit_exprs(cx, elements, wst)?.join(", ");
            match kind {
                CollectionKind::Seq if is_char_seq(cx, &e.ty) => {
                    format!("{RUNTIME}.Seq([{items}], isStr=True)")
                }
                CollectionKind::Seq => format!("{RUNTIME}.Seq([{items}])"),
                CollectionKind::Set if items.is_empty() => format!("{RUNTIME}.Set()"),
                CollectionKind::Set => format!("{RUNTIME}.Set({{{items}}})"),
                CollectionKind::MultiSet => return not_lowered(cx, Feature::Multisets, e.loc),
            }
        }
        ExprKind::MapDisplay(pairs) => {
            let mut items = Vec::with_capacity(pairs.len());
            for (k, v) in pairs {
                let k = emit_expr(cx, k, wst)?;
                let v = emit_expr(cx, v, wst)?;
                items.push(format!("{k}: {v}"));
            }
            format!("{RUNTIME}.Map({{{}}})", items.join(", "))
        }
        ExprKind::Unary { op, operand } => {
            if matches!(index.normalize(&operand.ty), Type::MultiSet(_)) {
                return not_lowered(cx, Feature::Multisets, e.loc);
            }
            let x = emit_expr(cx, operand, wst)?;
            unary(*op, &x, &index.normalize(&e.ty))
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs_ty = index.normalize(&lhs.ty);
            if matches!(lhs_ty, Type::MultiSet(_))
                || matches!(index.normalize(&rhs.ty), Type::MultiSet(_))
            {
                return not_lowered(cx, Feature::Multisets, e.loc);
            }
            let l = emit_expr(cx, lhs, wst)?;
            let r = emit_expr(cx, rhs, wst)?;
            binary(*op, &l, &r, &lhs_ty, &index.normalize(&e.ty))
        }
        ExprKind::Conversion(operand) => {
            let x = emit_expr(cx, operand, wst)?;
            conversion(&x, &index.normalize(&operand.ty), &index.normalize(&e.ty))
        }
        ExprKind::TypeTest { operand, test } => {
            if let Some(TopLevelDecl::SubsetType(_)) = test.decl_path().and_then(|p| index.decl(p)) {
                return not_lowered(cx, Feature::SubsetTypeTests, e.loc);
            }
            let x = emit_expr(cx, operand, wst)?;
            format!("isinstance({x}, {})", type_name(cx, test, e.loc)?)
        }
        ExprKind::Ite {
            cond,
            then_expr,
            else_expr,
        } => {
            let c = emit_expr(cx, cond, wst)?;
            let t = emit_expr(cx, then_expr, wst)?;
            let f = emit_expr(cx, else_expr, wst)?;
            format!("({t} if {c} else {f})")
        }
        ExprKind::Let { vars, values, body } => {
            let args = emit_exprs(cx, values, wst)?;
            let params: Vec<String> = vars.iter().map(|v| sanitize(&v.name)).collect();
            let name = cx.fresh_name("iife");
            nested_def(cx, &name, &params, body, wst)?;
            format!("{name}({})", args.join(", "))
        }
        ExprKind::Lambda { params, body } => {
            let params: Vec<String> = params.iter().map(|v| sanitize(&v.name)).collect();
            let name = cx.fresh_name("lambda");
            nested_def(cx, &name, &params, body, wst)?;
            name
        }
        ExprKind::Quantifier {
            is_forall,
            bounds,
            range,
            term,
        } => quantifier(cx, *is_forall, bounds, range.as_deref(), term, e.loc, wst)?,
        ExprKind::SetComprehension {
            bounds,
            range,
            term,
        } => set_comprehension(cx, bounds, range.as_deref(), term, e.loc, wst)?,
        ExprKind::MapComprehension {
            bounds,
            range,
            key,
            value,
        } => map_comprehension(cx, bounds, range.as_deref(), key.as_deref(), value, e.loc, wst)?,
        ExprKind::New { class, ctor, args } => {
            let args = match ctor {
                Some(ctor) => {
                    let formals = index
                        .find_member(class, ctor)
                        .map_or(&[][..], member_ins);
                    emit_exprs(cx, runtime_args(formals, args), wst)?
                }
                None => Vec::new(),
            };
            let obj = cx.fresh_name("nw");
            cx.code.line(wst, format!("{obj} = {}()", decl_name(class)));
            if let Some(ctor) = ctor {
                cx.code.line(wst, format!("{obj}.{}({})", sanitize(ctor), args.join(", ")));
            }
            obj
        }
        ExprKind::NewArray { dims, init } => {
            let Type::Array { elem, .. } = index.normalize(&e.ty) else {
                return Err(CodegenError::internal("array allocation without an array type"));
            };
            let dims = emit_exprs(cx, dims, wst)?;
            match init {
                Some(init) => {
                    let f = emit_expr(cx, init, wst)?;
                    let vars: Vec<String> = dims.iter().map(|_| cx.fresh_name("i")).collect();
                    let mut text = format!("{f}({})", vars.join(", "));
                    for (var, n) in vars.iter().zip(&dims).rev() {
                        text = format!("[{text} for {var} in range({n})]");
                    }
                    text
                }
                None => {
                    let init = default_value(cx, &elem, e.loc, wst)?;
                    match dims.as_slice() {
                        [n] => format!("[{init} for _ in range({n})]"),
                        _ => format!("{RUNTIME}.newArray({init}, {})", dims.join(", ")),
                    }
                }
            }
        }
    })
}
