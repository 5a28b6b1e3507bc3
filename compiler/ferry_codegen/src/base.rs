//! Target-independent decisions shared by all backends.
//!
//! Backends call these explicitly; none of them writes text.

use ferry_ir::{Ctor, DeclPath, Field, Member, ProgramIndex, TopLevelDecl, Type};
use rustc_hash::FxHashSet;

/// Whether a member is emitted with a synthesized receiver parameter.
///
/// Instance members of newtypes and subset types have no object to live on,
/// and constant trait fields with an initializer are computed on the trait
/// itself. Everything else uses the target's native receiver.
pub fn needs_custom_receiver(owner: &TopLevelDecl, member: &Member) -> bool {
    if member.is_static() {
        return false;
    }
    match owner {
        TopLevelDecl::Newtype(_) | TopLevelDecl::SubsetType(_) => true,
        TopLevelDecl::Trait(_) => matches!(
            member,
            Member::Field(Field { is_const: true, rhs: Some(_), .. })
        ),
        TopLevelDecl::Class(_) | TopLevelDecl::Datatype(_) | TopLevelDecl::Iterator(_) => false,
    }
}

/// Whether `parent` is the universal top type, which emitted classes never list as a base.
pub fn is_top_type(parent: &Type) -> bool {
    matches!(parent, Type::Object)
}

/// The constructor used for default values of the datatype at `path`: the
/// first one whose non-ghost fields can all be given a finite default.
pub fn grounding_ctor<'p>(index: &ProgramIndex<'p>, path: &DeclPath) -> Option<&'p Ctor> {
    let mut visiting = FxHashSet::default();
    grounding_ctor_in(index, path, &mut visiting)
}

fn grounding_ctor_in<'p>(
    index: &ProgramIndex<'p>,
    path: &DeclPath,
    visiting: &mut FxHashSet<DeclPath>,
) -> Option<&'p Ctor> {
    let dt = index.datatype(path)?;
    visiting.insert(path.clone());
    let found = dt
        .ctors
        .iter()
        .find(|ctor| ctor.non_ghost_fields().all(|f| is_groundable(index, &f.ty, visiting)));
    visiting.remove(path);
    found
}

fn is_groundable(index: &ProgramIndex<'_>, ty: &Type, visiting: &mut FxHashSet<DeclPath>) -> bool {
    let ty = index.normalize(ty);
    let Type::UserDefined { decl, .. } = &ty else {
        return true;
    };
    if index.datatype(decl).is_none() {
        return true;
    }
    !visiting.contains(decl) && grounding_ctor_in(index, decl, visiting).is_some()
}

/// Whether every value of the datatype at `path` can be listed: all
/// non-ghost fields are booleans or themselves finite datatypes.
pub fn has_finite_values(index: &ProgramIndex<'_>, path: &DeclPath) -> bool {
    let mut visiting = FxHashSet::default();
    finite_in(index, path, &mut visiting)
}

fn finite_in(index: &ProgramIndex<'_>, path: &DeclPath, visiting: &mut FxHashSet<DeclPath>) -> bool {
    let Some(dt) = index.datatype(path) else {
        return false;
    };
    if dt.is_co || !dt.type_params.is_empty() || !visiting.insert(path.clone()) {
        return false;
    }
    let finite = dt.ctors.iter().all(|ctor| {
        ctor.non_ghost_fields().all(|f| match index.normalize(&f.ty) {
            Type::Bool => true,
            Type::UserDefined { decl, .. } => finite_in(index, &decl, visiting),
            _ => false,
        })
    });
    visiting.remove(path);
    finite
}

/// Type parameters of the declaration at `path`, for substituting actual arguments.
pub fn decl_type_params<'p>(index: &ProgramIndex<'p>, path: &DeclPath) -> &'p [String] {
    match index.decl(path) {
        Some(decl) => decl.type_params(),
        None => &[],
    }
}

#[cfg(test)]
mod tests;
