//! Declaration lookup by path.
//!
//! Built once per run over a borrowed [`Program`]; every backend query that
//! needs to chase a [`DeclPath`] goes through here.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{DatatypeDecl, DeclPath, Member, MemberRef, Module, Program, TopLevelDecl, Type};

/// Read-only index over a program's declarations.
pub struct ProgramIndex<'p> {
    program: &'p Program,
    modules: FxHashMap<&'p str, &'p Module>,
    decls: FxHashMap<DeclPath, &'p TopLevelDecl>,
}

impl<'p> ProgramIndex<'p> {
    pub fn new(program: &'p Program) -> Self {
        let mut modules = FxHashMap::default();
        let mut decls = FxHashMap::default();
        for module in &program.modules {
            modules.insert(module.name.as_str(), module);
            for decl in &module.decls {
                decls.insert(DeclPath::new(&module.name, decl.name()), decl);
            }
        }
        ProgramIndex {
            program,
            modules,
            decls,
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn module(&self, name: &str) -> Option<&'p Module> {
        self.modules.get(name).copied()
    }

    pub fn decl(&self, path: &DeclPath) -> Option<&'p TopLevelDecl> {
        self.decls.get(path).copied()
    }

    pub fn datatype(&self, path: &DeclPath) -> Option<&'p DatatypeDecl> {
        match self.decl(path)? {
            TopLevelDecl::Datatype(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_trait(&self, path: &DeclPath) -> bool {
        matches!(self.decl(path), Some(TopLevelDecl::Trait(_)))
    }

    /// Members declared directly on `path`, including module default classes.
    pub fn members_of(&self, path: &DeclPath) -> Option<&'p [Member]> {
        if path.is_default_class() {
            return self.module(&path.module).map(|m| m.members.as_slice());
        }
        self.decl(path).map(TopLevelDecl::members)
    }

    /// Find a member, searching supertypes when the owner does not declare it.
    pub fn member(&self, member: &MemberRef) -> Option<&'p Member> {
        self.find_member(&member.owner, &member.name)
    }

    /// Like [`ProgramIndex::member`], also returning the declaring owner.
    pub fn find_member_owner(&self, owner: &DeclPath, name: &str) -> Option<(DeclPath, &'p Member)> {
        let mut pending = vec![owner.clone()];
        let mut seen = FxHashSet::default();
        while let Some(path) = pending.pop() {
            if !seen.insert(path.clone()) {
                continue;
            }
            if let Some(found) = self
                .members_of(&path)
                .and_then(|ms| ms.iter().find(|m| m.name() == name))
            {
                return Some((path, found));
            }
            if let Some(TopLevelDecl::Class(c) | TopLevelDecl::Trait(c)) = self.decl(&path) {
                pending.extend(c.parents.iter().filter_map(Type::decl_path).cloned());
            }
        }
        None
    }

    pub fn find_member(&self, owner: &DeclPath, name: &str) -> Option<&'p Member> {
        self.find_member_owner(owner, name).map(|(_, m)| m)
    }

    /// Strip newtype and subset-type wrappers down to the representation type.
    pub fn normalize(&self, ty: &Type) -> Type {
        let mut current = ty.clone();
        let mut seen = FxHashSet::default();
        loop {
            let Type::UserDefined { decl, args } = &current else {
                return current;
            };
            if !seen.insert(decl.clone()) {
                return current;
            }
            current = match self.decl(decl) {
                Some(TopLevelDecl::Newtype(n)) => n.base.clone(),
                Some(TopLevelDecl::SubsetType(s)) => s.base.substitute(&s.type_params, args),
                _ => return current,
            };
        }
    }
}

#[cfg(test)]
mod tests;
