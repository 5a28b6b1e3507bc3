//! Type lowering: annotation spellings and default values.

use ferry_ir::{DeclPath, SourceLoc, TopLevelDecl, Type};

use super::expr::emit_expr;
use super::names::{ctor_class_ref, decl_name};
use super::{not_lowered, RUNTIME};
use crate::base::{decl_type_params, grounding_ctor};
use crate::code_tree::CodeId;
use crate::{CodegenContext, CodegenError, CodegenResult, Feature};

/// Python spelling of `ty`, used in annotations, base-class lists and
/// `isinstance` tests.
pub fn type_name(cx: &CodegenContext<'_>, ty: &Type, loc: SourceLoc) -> CodegenResult<String> {
    Ok(match ty {
        Type::Object => "object".to_string(),
        Type::Bool => "bool".to_string(),
        Type::Char => "str".to_string(),
        Type::Int | Type::Bitvector(_) => "int".to_string(),
        Type::Real => format!("{RUNTIME}.BigRational"),
        Type::Set(_) => format!("{RUNTIME}.Set"),
        Type::Seq(_) => format!("{RUNTIME}.Seq"),
        Type::Map(..) => format!("{RUNTIME}.Map"),
        Type::MultiSet(_) => return not_lowered(cx, Feature::Multisets, loc),
        Type::Arrow { .. } => "Callable".to_string(),
        Type::TypeParam(_) => "Any".to_string(),
        Type::Tuple(_) => "tuple".to_string(),
        Type::Array { .. } => "list".to_string(),
        Type::UserDefined { decl, .. } => match lookup(cx, decl)? {
            TopLevelDecl::Newtype(_) | TopLevelDecl::SubsetType(_) => {
                let base = cx.index.normalize(ty);
                if base == *ty {
                    return Err(CodegenError::internal(format!("cyclic refinement type {decl:?}")));
                }
                return type_name(cx, &base, loc);
            }
            TopLevelDecl::Class(_)
            | TopLevelDecl::Trait(_)
            | TopLevelDecl::Datatype(_)
            | TopLevelDecl::Iterator(_) => decl_name(decl),
        },
    })
}

fn lookup<'p>(cx: &CodegenContext<'p>, decl: &DeclPath) -> CodegenResult<&'p TopLevelDecl> {
    cx.index
        .decl(decl)
        .ok_or_else(|| CodegenError::internal(format!("reference to unknown declaration {decl:?}")))
}

/// Mask keeping the low `width` bits.
pub fn bv_mask(width: u32) -> String {
    format!("((1 << {width}) - 1)")
}

/// The value a variable of type `ty` holds before its first assignment.
///
/// Witness expressions may hoist statements into `wst`.
pub fn default_value(
    cx: &mut CodegenContext<'_>,
    ty: &Type,
    loc: SourceLoc,
    wst: CodeId,
) -> CodegenResult<String> {
    Ok(match ty {
        Type::Object | Type::Array { .. } | Type::TypeParam(_) => "None".to_string(),
        Type::Bool => "False".to_string(),
        Type::Char => "'D'".to_string(),
        Type::Int | Type::Bitvector(_) => "int(0)".to_string(),
        Type::Real => format!("{RUNTIME}.BigRational()"),
        Type::Set(_) => format!("{RUNTIME}.Set()"),
        Type::Seq(elem) if elem.is_char() => format!("{RUNTIME}.Seq(\"\")"),
        Type::Seq(_) => format!("{RUNTIME}.Seq()"),
        Type::Map(..) => format!("{RUNTIME}.Map()"),
        Type::MultiSet(_) => return not_lowered(cx, Feature::Multisets, loc),
        Type::Arrow { result, .. } => {
            let result = default_value(cx, result, loc, wst)?;
            format!("(lambda *_: {result})")
        }
        Type::Tuple(_) => return not_lowered(cx, Feature::TupleInitialization, loc),
        Type::UserDefined { decl, args } => {
            let index = cx.index;
            match lookup(cx, decl)? {
                TopLevelDecl::Newtype(nt) => match &nt.witness {
                    Some(witness) => emit_expr(cx, witness, wst)?,
                    None => default_value(cx, &nt.base, loc, wst)?,
                },
                TopLevelDecl::SubsetType(st) => match &st.witness {
                    Some(witness) => emit_expr(cx, witness, wst)?,
                    None => default_value(cx, &st.base.substitute(&st.type_params, args), loc, wst)?,
                },
                TopLevelDecl::Datatype(dt) => {
                    if dt.is_co {
                        return not_lowered(cx, Feature::Codatatypes, loc);
                    }
                    let ctor = grounding_ctor(index, decl).ok_or_else(|| {
                        CodegenError::internal(format!("datatype {decl:?} has no grounding constructor"))
                    })?;
                    let params = decl_type_params(index, decl);
                    let mut fields = Vec::new();
                    for field in ctor.non_ghost_fields() {
                        fields.push(default_value(cx, &field.ty.substitute(params, args), loc, wst)?);
                    }
                    format!("{}({})", ctor_class_ref(decl, &ctor.name), fields.join(", "))
                }
                TopLevelDecl::Class(_) | TopLevelDecl::Trait(_) | TopLevelDecl::Iterator(_) => {
                    "None".to_string()
                }
            }
        }
    })
}

/// Default for a method out-parameter; tuple-typed outs are always assigned
/// before use, so they start as `None`.
pub fn out_param_default(
    cx: &mut CodegenContext<'_>,
    ty: &Type,
    loc: SourceLoc,
    wst: CodeId,
) -> CodegenResult<String> {
    if matches!(cx.index.normalize(ty), Type::Tuple(_)) {
        return Ok("None".to_string());
    }
    default_value(cx, ty, loc, wst)
}

#[cfg(test)]
mod tests;
