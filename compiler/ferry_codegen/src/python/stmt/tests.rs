#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::python::test_util::{program, with_cx, M};
use crate::MemberFrame;
use ferry_ir::{BinaryOp, BoundPool, BoundVar, Ctor, DatatypeDecl, Formal, Program, TopLevelDecl, Type};
use pretty_assertions::assert_eq;

fn lower(p: &Program, stmts: &[Stmt]) -> String {
    with_cx(p, |cx, wr| emit_stmts(cx, stmts, wr).unwrap()).1
}

fn lower_err(p: &Program, stmt: Stmt) -> CodegenError {
    with_cx(p, |cx, wr| emit_stmt(cx, &stmt, wr).unwrap_err()).0
}

fn i() -> Expr {
    Expr::ident("i", Type::Int)
}

fn increment_i() -> Stmt {
    Stmt::assign(i(), Expr::binary(BinaryOp::Add, i(), Expr::int(1), Type::Int))
}

#[test]
fn empty_bodies_pass() {
    let p = program(Vec::new(), Vec::new());
    assert_eq!(lower(&p, &[]), "pass\n");
    let block = Stmt::new(StmtKind::Block(Vec::new()));
    assert_eq!(lower(&p, &[block]), "if True:\n    pass\n");
}

#[test]
fn variable_declarations() {
    let p = program(Vec::new(), Vec::new());
    let stmts = [
        Stmt::var(BoundVar::new("x", Type::Int), None),
        Stmt::var(BoundVar::new("s", Type::string()), Some(Expr::string("hi"))),
    ];
    assert_eq!(
        lower(&p, &stmts),
        "x: int = int(0)\ns = _ferry.Seq(\"hi\")\n"
    );
}

#[test]
fn while_with_a_plain_condition() {
    let p = program(Vec::new(), Vec::new());
    let stmt = Stmt::new(StmtKind::While {
        cond: Expr::binary(BinaryOp::Lt, i(), Expr::int(10), Type::Bool),
        body: vec![increment_i()],
    });
    assert_eq!(lower(&p, &[stmt]), "while (i < 10):\n    i = (i + 1)\n");
}

#[test]
fn while_condition_with_hoisted_helpers_is_tested_inside_the_loop() {
    let p = program(Vec::new(), Vec::new());
    let y = Expr::ident("y", Type::Int);
    let cond = Expr::new(
        ExprKind::Let {
            vars: vec![BoundVar::new("y", Type::Int)],
            values: vec![i()],
            body: Box::new(Expr::binary(BinaryOp::Lt, y, Expr::int(10), Type::Bool)),
        },
        Type::Bool,
    );
    let stmt = Stmt::new(StmtKind::While {
        cond,
        body: vec![increment_i()],
    });
    assert_eq!(
        lower(&p, &[stmt]),
        "while True:\n    def _iife0(y):\n        return (y < 10)\n    if not _iife0(i):\n        break\n    i = (i + 1)\n"
    );
}

#[test]
fn parallel_assignment_evaluates_targets_first() {
    let p = program(Vec::new(), Vec::new());
    let arr = Expr::new(
        ExprKind::Select {
            receiver: Box::new(Expr::new(ExprKind::This, Type::user(M, "C"))),
            selector: Selector::Field("arr".into()),
        },
        Type::Array {
            dims: 1,
            elem: Box::new(Type::Int),
        },
    );
    let element = Expr::new(
        ExprKind::Index {
            collection: Box::new(arr),
            index: Box::new(i()),
        },
        Type::Int,
    );
    let stmt = Stmt::new(StmtKind::Assign {
        targets: vec![element, i()],
        values: vec![i(), Expr::int(0)],
    });
    assert_eq!(lower(&p, &[stmt]), "_lhs0 = self.arr\n_lhs0[i], i = i, 0\n");
}

#[test]
fn assign_such_that_searches_the_pools() {
    let p = program(Vec::new(), Vec::new());
    let x = Expr::ident("x", Type::Int);
    let stmt = Stmt::new(StmtKind::AssignSuchThat {
        bounds: vec![Bound {
            var: BoundVar::new("x", Type::Int),
            pool: BoundPool::IntRange {
                lo: Some(Box::new(Expr::int(0))),
                hi: Some(Box::new(Expr::int(10))),
            },
        }],
        constraint: Expr::binary(BinaryOp::Gt, x, Expr::int(5), Type::Bool),
    });
    assert_eq!(
        lower(&p, &[stmt]),
        "with _ferry.label(\"_assign0\"):\n    for x in range(0, 10):\n        if (x > 5):\n            _ferry._break(\"_assign0\")\n    raise Exception(\"assign-such-that search produced no value\")\n"
    );
}

fn shape() -> TopLevelDecl {
    TopLevelDecl::Datatype(DatatypeDecl {
        name: "Shape".into(),
        ctors: vec![
            Ctor::new("Circle", vec![Formal::new("r", Type::Int)]),
            Ctor::new(
                "Square",
                vec![Formal::new("side", Type::Int), Formal::ghost("g", Type::Int)],
            ),
            Ctor::new("Dot", Vec::new()),
        ],
        ..DatatypeDecl::default()
    })
}

#[test]
fn match_tests_constructors_in_order() {
    let p = program(vec![shape()], Vec::new());
    let bind = |name: &str| Some(BoundVar::new(name, Type::Int));
    let stmt = Stmt::new(StmtKind::Match {
        source: Expr::ident("sh", Type::user(M, "Shape")),
        cases: vec![
            MatchCase {
                ctor: "Circle".into(),
                bindings: vec![bind("r")],
                body: vec![Stmt::print(vec![Expr::ident("r", Type::Int)])],
            },
            MatchCase {
                ctor: "Square".into(),
                bindings: vec![bind("s"), bind("g")],
                body: vec![Stmt::print(vec![Expr::ident("s", Type::Int)])],
            },
            MatchCase {
                ctor: "Dot".into(),
                bindings: Vec::new(),
                body: Vec::new(),
            },
        ],
    });
    assert_eq!(
        lower(&p, &[stmt]),
        "_source0 = sh\n\
         if _source0.is_Circle:\n    r = _source0.r\n    _ferry.print(r)\n\
         elif _source0.is_Square:\n    s = _source0.side\n    _ferry.print(s)\n\
         else:\n    pass\n"
    );
}

#[test]
fn halt_carries_its_location() {
    let p = program(Vec::new(), Vec::new());
    let stmt = Stmt::new(StmtKind::Halt(Expr::string("boom"))).at(SourceLoc::new(3, 5));
    assert_eq!(
        lower(&p, &[stmt]),
        "raise _ferry.HaltException(_ferry.Seq(\"boom\"), \"t.dfy(3,5)\")\n"
    );
}

#[test]
fn synthesized_expectations_have_no_location() {
    let p = program(Vec::new(), Vec::new());
    let stmt = Stmt::new(StmtKind::Expect {
        cond: Expr::binary(BinaryOp::Gt, i(), Expr::int(0), Type::Bool),
        message: None,
    });
    assert_eq!(
        lower(&p, &[stmt]),
        "_ferry.expect((i > 0), _ferry.Seq(\"expectation violation\"), None)\n"
    );
}

#[test]
fn halt_recovery_binds_the_message() {
    let p = program(Vec::new(), Vec::new());
    let stmt = Stmt::new(StmtKind::HaltRecovery {
        body: vec![Stmt::new(StmtKind::Halt(Expr::string("x")))],
        message_var: "msg".into(),
        recovery: vec![Stmt::print(vec![Expr::ident("msg", Type::string())])],
    });
    assert_eq!(
        lower(&p, &[stmt]),
        "try:\n    raise _ferry.HaltException(_ferry.Seq(\"x\"), None)\n\
         except _ferry.HaltException as _halt0:\n    msg = _halt0.message\n    _ferry.print(msg)\n"
    );
}

#[test]
fn labels_break_through_the_runtime() {
    let p = program(Vec::new(), Vec::new());
    let stmt = Stmt::new(StmtKind::Labeled {
        label: "outer".into(),
        body: vec![Stmt::new(StmtKind::Break(Some("outer".into())))],
    });
    assert_eq!(
        lower(&p, &[stmt]),
        "with _ferry.label(\"outer\"):\n    _ferry._break(\"outer\")\n"
    );
}

#[test]
fn unsupported_loops() {
    let p = program(Vec::new(), Vec::new());
    let loc = SourceLoc::new(7, 1);
    let for_loop = Stmt::new(StmtKind::For {
        var: BoundVar::new("k", Type::Int),
        start: Expr::int(10),
        end: None,
        ascending: false,
        body: Vec::new(),
    })
    .at(loc);
    assert_eq!(lower_err(&p, for_loop), CodegenError::unsupported(Feature::ForLoops, loc));

    let labeled = Stmt::new(StmtKind::Continue(Some("outer".into()))).at(loc);
    assert_eq!(
        lower_err(&p, labeled),
        CodegenError::unsupported(Feature::LabeledContinue, loc)
    );
}

#[test]
fn tail_calls_rebind_changed_parameters() {
    let p = program(Vec::new(), Vec::new());
    let n = Expr::ident("n", Type::Int);
    let stmt = Stmt::new(StmtKind::TailCall(vec![
        Expr::binary(BinaryOp::Sub, n, Expr::int(1), Type::Int),
        Expr::ident("acc", Type::Int),
    ]));
    let (text, _) = with_cx(&p, |cx, wr| {
        let saved = cx.enter_member(MemberFrame {
            receiver: "self".into(),
            ins: vec!["n".into(), "acc".into()],
            outs: Vec::new(),
        });
        emit_stmt(cx, &stmt, wr).unwrap();
        cx.leave_member(saved);
        cx.code.flatten(wr)
    });
    assert_eq!(text, "_in0 = (n - 1)\nn = _in0\n_ferry._tail_call()\n");
}

#[test]
fn bare_return_hands_back_out_parameters() {
    let p = program(Vec::new(), Vec::new());
    let (text, _) = with_cx(&p, |cx, wr| {
        let saved = cx.enter_member(MemberFrame {
            receiver: "self".into(),
            ins: Vec::new(),
            outs: vec!["q".into(), "r".into()],
        });
        emit_stmt(cx, &Stmt::new(StmtKind::Return(Vec::new())), wr).unwrap();
        cx.leave_member(saved);
        cx.code.flatten(wr)
    });
    assert_eq!(text, "return q, r\n");
}

#[test]
fn forall_collects_updates_before_applying_them() {
    let p = program(Vec::new(), Vec::new());
    let a = Expr::ident("a", Type::seq(Type::Int));
    let target = Expr::new(
        ExprKind::Index {
            collection: Box::new(a),
            index: Box::new(i()),
        },
        Type::Int,
    );
    let stmt = Stmt::new(StmtKind::Forall {
        bound: Bound {
            var: BoundVar::new("i", Type::Int),
            pool: BoundPool::IntRange {
                lo: Some(Box::new(Expr::int(0))),
                hi: Some(Box::new(Expr::ident("n", Type::Int))),
            },
        },
        range: None,
        body: Box::new(Stmt::assign(target, Expr::int(0))),
    });
    assert_eq!(
        lower(&p, &[stmt]),
        "_forall0 = []\nfor i in range(0, n):\n    _forall0.append((a, i, 0))\n\
         for _entry1 in _forall0:\n    _entry1[0][_entry1[1]] = _entry1[2]\n"
    );
}

#[test]
fn forall_over_a_call_is_not_sequentializable() {
    let p = program(Vec::new(), Vec::new());
    let stmt = Stmt::new(StmtKind::Forall {
        bound: Bound {
            var: BoundVar::new("i", Type::Int),
            pool: BoundPool::Bool,
        },
        range: None,
        body: Box::new(Stmt::print(vec![i()])),
    });
    assert_eq!(
        lower_err(&p, stmt),
        CodegenError::unsupported(Feature::NonSequentializableForall, SourceLoc::SYNTHETIC)
    );
}
