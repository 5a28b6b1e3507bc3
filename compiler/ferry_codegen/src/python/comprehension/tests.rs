#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::python::test_util::{program, with_cx, M};
use ferry_ir::{BinaryOp, BoundVar, Ctor, DatatypeDecl, DeclPath, Formal, TopLevelDecl, Type};
use pretty_assertions::assert_eq;

const AT: SourceLoc = SourceLoc::SYNTHETIC;

fn var(name: &str, ty: Type, pool: BoundPool) -> Bound {
    Bound {
        var: BoundVar::new(name, ty),
        pool,
    }
}

fn int_range(lo: i64, hi: i64) -> BoundPool {
    BoundPool::IntRange {
        lo: Some(Box::new(Expr::int(lo))),
        hi: Some(Box::new(Expr::int(hi))),
    }
}

fn x() -> Expr {
    Expr::ident("x", Type::Int)
}

#[test]
fn exists_over_an_integer_range() {
    let p = program(Vec::new(), Vec::new());
    let bounds = [var("x", Type::Int, int_range(0, 10))];
    let term = Expr::binary(BinaryOp::Gt, x(), Expr::int(5), Type::Bool);
    let (text, hoisted) = with_cx(&p, |cx, wr| {
        quantifier(cx, false, &bounds, None, &term, AT, wr).unwrap()
    });
    assert_eq!(text, "_ferry.quantifier(range(0, 10), False, _lambda0)");
    assert_eq!(hoisted, "def _lambda0(x):\n    return (x > 5)\n");
}

#[test]
fn forall_nests_one_predicate_per_variable() {
    let p = program(Vec::new(), Vec::new());
    let bounds = [
        var("a", Type::Bool, BoundPool::Bool),
        var("b", Type::Bool, BoundPool::Bool),
    ];
    let range = Expr::ident("a", Type::Bool);
    let term = Expr::ident("b", Type::Bool);
    let (text, hoisted) = with_cx(&p, |cx, wr| {
        quantifier(cx, true, &bounds, Some(&range), &term, AT, wr).unwrap()
    });
    assert_eq!(text, "_ferry.quantifier([False, True], True, _lambda0)");
    assert_eq!(
        hoisted,
        "def _lambda0(a):\n    def _lambda1(b):\n        return (not a or b)\n    return _ferry.quantifier([False, True], True, _lambda1)\n"
    );
}

#[test]
fn set_builder() {
    let p = program(Vec::new(), Vec::new());
    let bounds = [var(
        "x",
        Type::Int,
        BoundPool::Elements(Box::new(Expr::ident("s", Type::set(Type::Int)))),
    )];
    let range = Expr::binary(BinaryOp::Gt, x(), Expr::int(0), Type::Bool);
    let term = Expr::binary(BinaryOp::Mul, x(), Expr::int(2), Type::Int);
    let (text, hoisted) = with_cx(&p, |cx, wr| {
        set_comprehension(cx, &bounds, Some(&range), &term, AT, wr).unwrap()
    });
    assert_eq!(text, "_set0()");
    assert_eq!(
        hoisted,
        "def _set0():\n    _coll1 = set()\n    for x in s:\n        if (x > 0):\n            _coll1.add((x * 2))\n    return _ferry.Set(_coll1)\n"
    );
}

#[test]
fn map_builder_keys_by_the_bound_variable() {
    let p = program(Vec::new(), Vec::new());
    let bounds = [var("k", Type::Int, int_range(1, 4))];
    let k = Expr::ident("k", Type::Int);
    let value = Expr::binary(BinaryOp::Mul, k.clone(), k, Type::Int);
    let (text, hoisted) = with_cx(&p, |cx, wr| {
        map_comprehension(cx, &bounds, None, None, &value, AT, wr).unwrap()
    });
    assert_eq!(text, "_map0()");
    assert_eq!(
        hoisted,
        "def _map0():\n    _coll1 = dict()\n    for k in range(1, 4):\n        _coll1[k] = (k * k)\n    return _ferry.Map(_coll1)\n"
    );
}

fn color() -> TopLevelDecl {
    TopLevelDecl::Datatype(DatatypeDecl {
        name: "Color".into(),
        ctors: vec![Ctor::new("Red", Vec::new()), Ctor::new("Blue", Vec::new())],
        ..DatatypeDecl::default()
    })
}

fn boxed() -> TopLevelDecl {
    TopLevelDecl::Datatype(DatatypeDecl {
        name: "Boxed".into(),
        ctors: vec![Ctor::new("Box", vec![Formal::new("n", Type::Int)])],
        ..DatatypeDecl::default()
    })
}

#[test]
fn finite_datatypes_enumerate_their_values() {
    let p = program(vec![color(), boxed()], Vec::new());
    let finite = var(
        "c",
        Type::user(M, "Color"),
        BoundPool::Datatype(DeclPath::new(M, "Color")),
    );
    let infinite = var(
        "b",
        Type::user(M, "Boxed"),
        BoundPool::Datatype(DeclPath::new(M, "Boxed")),
    );
    let ((pool, err), _) = with_cx(&p, |cx, wr| {
        (
            bound_pool(cx, &finite, AT, wr).unwrap(),
            bound_pool(cx, &infinite, AT, wr),
        )
    });
    assert_eq!(pool, "module_.Color.AllValues");
    assert_eq!(err, Err(CodegenError::unsupported(Feature::NonFiniteBounds, AT)));
}

#[test]
fn half_open_ranges_are_unsupported() {
    let p = program(Vec::new(), Vec::new());
    let loc = SourceLoc::new(4, 9);
    let bound = var(
        "n",
        Type::Int,
        BoundPool::IntRange {
            lo: Some(Box::new(Expr::int(0))),
            hi: None,
        },
    );
    let (result, _) = with_cx(&p, |cx, wr| bound_pool(cx, &bound, loc, wr));
    assert_eq!(result, Err(CodegenError::unsupported(Feature::NonFiniteBounds, loc)));
}

#[test]
fn exact_and_char_pools() {
    let p = program(Vec::new(), Vec::new());
    let exact = var("x", Type::Int, BoundPool::Exact(Box::new(Expr::int(3))));
    let chars = var("c", Type::Char, BoundPool::Char);
    let (pools, _) = with_cx(&p, |cx, wr| {
        (
            bound_pool(cx, &exact, AT, wr).unwrap(),
            bound_pool(cx, &chars, AT, wr).unwrap(),
        )
    });
    assert_eq!(pools, ("[3]".to_string(), "_ferry.AllChars()".to_string()));
}
