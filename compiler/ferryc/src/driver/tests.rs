#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use ferry_diagnostic::ErrorCode;
use ferry_ir::{BoundVar, DeclPath, Expr, Member, MemberRef, Method, Module, SourceLoc, Stmt, StmtKind, Type};
use pretty_assertions::assert_eq;

fn hello(body: Vec<Stmt>) -> Program {
    let main = Method {
        name: "Main".into(),
        body: Some(body),
        is_static: true,
        ..Method::default()
    };
    let mut module = Module::default_module();
    module.members = vec![Member::Method(main)];
    Program {
        name: "hello".into(),
        source_file: "hello.dfy".into(),
        modules: vec![module],
        main: Some(MemberRef::new(
            DeclPath::default_class(Program::DEFAULT_MODULE),
            "Main",
        )),
    }
}

fn greeting() -> Program {
    hello(vec![Stmt::print(vec![Expr::string("hi\n")])])
}

#[test]
fn translate_writes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("hello-py");
    let outcome = translate(&greeting(), &out);
    assert_eq!(outcome, Outcome::succeeded(None));
    for name in ["hello.py", "module_.py", "_ferry.py"] {
        assert!(out.join(name).is_file(), "{name} missing");
    }
    let primary = fs::read_to_string(out.join("hello.py")).unwrap();
    assert!(primary.contains("    module_.default__.Main()\n"));
}

#[test]
fn write_output_returns_the_primary_file() {
    let dir = tempfile::tempdir().unwrap();
    let generated = generate(&greeting()).unwrap();
    let primary = write_output(&generated, dir.path()).unwrap();
    assert_eq!(primary, dir.path().join("hello.py"));
}

#[test]
fn unsupported_programs_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let loop_stmt = Stmt::new(StmtKind::For {
        var: BoundVar::new("i", Type::Int),
        start: Expr::int(0),
        end: None,
        ascending: true,
        body: Vec::new(),
    })
    .at(SourceLoc::new(3, 7));
    let outcome = translate(&hello(vec![loop_stmt]), &out);
    assert!(!outcome.success);
    assert_eq!(outcome.diagnostics[0].code, ErrorCode::E2001);
    assert_eq!(outcome.diagnostics[0].labels[0].location_text(), "hello.dfy(3,7)");
    assert!(!out.exists());
}

#[test]
fn programs_are_read_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.json");
    fs::write(&path, serde_json::to_string(&greeting()).unwrap()).unwrap();
    assert_eq!(read_program(&path).unwrap(), greeting());
}

#[test]
fn unreadable_and_malformed_programs() {
    let dir = tempfile::tempdir().unwrap();
    let missing = read_program(&dir.path().join("none.json")).unwrap_err();
    assert_eq!(missing.code(), ErrorCode::E1001);

    let path = dir.path().join("bad.json");
    fs::write(&path, "{\"name\": 3}").unwrap();
    let malformed = read_program(&path).unwrap_err();
    assert_eq!(malformed.code(), ErrorCode::E1002);
    let diag = malformed.to_diagnostic("ignored");
    let location = diag.labels[0].location_text();
    assert!(location.contains("bad.json(1,"), "{location}");
}

#[test]
fn missing_interpreter_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let options = CompileOptions {
        python: Some("/nonexistent/ferry-python".into()),
        ..CompileOptions::default()
    };
    let outcome = run(&greeting(), &options, dir.path());
    assert!(!outcome.success);
    assert_eq!(outcome.diagnostics[0].code, ErrorCode::E3004);
    assert!(outcome
        .render()
        .starts_with("error[E3004]: unable to start /nonexistent/ferry-python ("));
}

#[test]
fn render_is_empty_without_diagnostics() {
    assert_eq!(Outcome::succeeded(Some("x".into())).render(), "");
}
