#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::python::test_util::{program, with_cx, M};
use ferry_ir::{Ctor, DatatypeDecl, Expr, Formal, NewtypeDecl};
use pretty_assertions::assert_eq;

const AT: SourceLoc = SourceLoc::SYNTHETIC;

fn list() -> TopLevelDecl {
    TopLevelDecl::Datatype(DatatypeDecl {
        name: "List".into(),
        ctors: vec![
            Ctor::new(
                "Cons",
                vec![Formal::new("head", Type::Int), Formal::new("tail", Type::user(M, "List"))],
            ),
            Ctor::new("Nil", Vec::new()),
        ],
        ..DatatypeDecl::default()
    })
}

fn positive() -> TopLevelDecl {
    TopLevelDecl::Newtype(NewtypeDecl {
        name: "Pos".into(),
        base: Type::Int,
        witness: Some(Expr::int(1)),
        members: Vec::new(),
        loc: AT,
    })
}

#[test]
fn primitive_and_collection_names() {
    let p = program(Vec::new(), Vec::new());
    let (names, _) = with_cx(&p, |cx, _| {
        [
            Type::Bool,
            Type::Char,
            Type::Int,
            Type::Bitvector(8),
            Type::Real,
            Type::seq(Type::Int),
            Type::map(Type::Int, Type::Bool),
        ]
        .iter()
        .map(|t| type_name(cx, t, AT).unwrap())
        .collect::<Vec<_>>()
    });
    assert_eq!(
        names,
        vec!["bool", "str", "int", "int", "_ferry.BigRational", "_ferry.Seq", "_ferry.Map"]
    );
}

#[test]
fn refinement_types_are_named_by_their_base() {
    let p = program(vec![positive(), list()], Vec::new());
    let (names, _) = with_cx(&p, |cx, _| {
        (
            type_name(cx, &Type::user(M, "Pos"), AT).unwrap(),
            type_name(cx, &Type::user(M, "List"), AT).unwrap(),
        )
    });
    assert_eq!(names, ("int".to_string(), "module_.List".to_string()));
}

#[test]
fn datatype_default_uses_the_grounding_constructor() {
    let p = program(vec![list()], Vec::new());
    let (value, text) = with_cx(&p, |cx, wr| default_value(cx, &Type::user(M, "List"), AT, wr).unwrap());
    assert_eq!(value, "module_.List_Nil()");
    assert_eq!(text, "");
}

#[test]
fn newtype_default_uses_its_witness() {
    let p = program(vec![positive()], Vec::new());
    let (value, _) = with_cx(&p, |cx, wr| default_value(cx, &Type::user(M, "Pos"), AT, wr).unwrap());
    assert_eq!(value, "1");
}

#[test]
fn scalar_and_text_defaults() {
    let p = program(Vec::new(), Vec::new());
    let (values, _) = with_cx(&p, |cx, wr| {
        [Type::Int, Type::Bool, Type::Char, Type::string(), Type::set(Type::Int)]
            .iter()
            .map(|t| default_value(cx, t, AT, wr).unwrap())
            .collect::<Vec<_>>()
    });
    assert_eq!(
        values,
        vec!["int(0)", "False", "'D'", "_ferry.Seq(\"\")", "_ferry.Set()"]
    );
}

#[test]
fn tuple_defaults_are_unsupported() {
    let p = program(Vec::new(), Vec::new());
    let loc = SourceLoc::new(2, 7);
    let (result, _) = with_cx(&p, |cx, wr| {
        default_value(cx, &Type::Tuple(vec![Type::Int, Type::Int]), loc, wr)
    });
    assert_eq!(
        result,
        Err(CodegenError::unsupported(Feature::TupleInitialization, loc))
    );
}

#[test]
fn tuple_out_parameters_start_as_none() {
    let p = program(Vec::new(), Vec::new());
    let (value, _) = with_cx(&p, |cx, wr| {
        out_param_default(cx, &Type::Tuple(vec![Type::Int, Type::Bool]), AT, wr).unwrap()
    });
    assert_eq!(value, "None");
}

#[test]
fn multisets_are_unsupported() {
    let p = program(Vec::new(), Vec::new());
    let (result, _) = with_cx(&p, |cx, _| type_name(cx, &Type::MultiSet(Box::new(Type::Int)), AT));
    assert!(matches!(
        result,
        Err(CodegenError::Unsupported {
            feature: Feature::Multisets,
            ..
        })
    ));
}

#[test]
fn bitvector_mask() {
    assert_eq!(bv_mask(8), "((1 << 8) - 1)");
}
