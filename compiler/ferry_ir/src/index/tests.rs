#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{ClassDecl, Ctor, Field, Formal, NewtypeDecl, SourceLoc, SubsetTypeDecl};
use pretty_assertions::assert_eq;

fn sample_program() -> Program {
    let mut module = Module::default_module();
    module.decls.push(TopLevelDecl::Trait(ClassDecl {
        name: "Shape".into(),
        members: vec![Member::Field(Field::constant("sides", Type::Int, Some(crate::Expr::int(0))))],
        ..ClassDecl::default()
    }));
    module.decls.push(TopLevelDecl::Class(ClassDecl {
        name: "Square".into(),
        parents: vec![Type::Object, Type::user("_module", "Shape")],
        members: vec![Member::Field(Field::var("side", Type::Int))],
        ..ClassDecl::default()
    }));
    module.decls.push(TopLevelDecl::Datatype(crate::DatatypeDecl {
        name: "Pair".into(),
        ctors: vec![Ctor::new(
            "Make",
            vec![Formal::new("x", Type::Int), Formal::new("y", Type::Int)],
        )],
        ..crate::DatatypeDecl::default()
    }));
    module.decls.push(TopLevelDecl::Newtype(NewtypeDecl {
        name: "Small".into(),
        base: Type::Int,
        witness: None,
        members: Vec::new(),
        loc: SourceLoc::SYNTHETIC,
    }));
    module.decls.push(TopLevelDecl::SubsetType(SubsetTypeDecl {
        name: "Tiny".into(),
        type_params: Vec::new(),
        base: Type::user("_module", "Small"),
        witness: None,
        loc: SourceLoc::SYNTHETIC,
    }));
    Program {
        name: "sample".into(),
        source_file: "sample.dfy".into(),
        modules: vec![module],
        main: None,
    }
}

#[test]
fn finds_inherited_members() {
    let program = sample_program();
    let index = ProgramIndex::new(&program);
    let square = DeclPath::new("_module", "Square");
    let (owner, member) = index.find_member_owner(&square, "sides").unwrap();
    assert_eq!(owner, DeclPath::new("_module", "Shape"));
    assert_eq!(member.name(), "sides");
    assert!(index.find_member(&square, "side").is_some());
    assert!(index.find_member(&square, "missing").is_none());
}

#[test]
fn normalize_strips_refinements() {
    let program = sample_program();
    let index = ProgramIndex::new(&program);
    assert_eq!(index.normalize(&Type::user("_module", "Tiny")), Type::Int);
    assert_eq!(index.normalize(&Type::user("_module", "Pair")), Type::user("_module", "Pair"));
}

#[test]
fn looks_up_datatypes_and_traits() {
    let program = sample_program();
    let index = ProgramIndex::new(&program);
    let pair = index.datatype(&DeclPath::new("_module", "Pair")).unwrap();
    assert_eq!(pair.ctor("Make").map(|c| c.fields.len()), Some(2));
    assert!(index.is_trait(&DeclPath::new("_module", "Shape")));
    assert!(!index.is_trait(&DeclPath::new("_module", "Square")));
}
