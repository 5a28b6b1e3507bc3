use super::*;
use ferry_ir::{ClassDecl, DatatypeDecl, Expr, Formal, Function, Module, NewtypeDecl, Program, SourceLoc};

const M: &str = "_module";

fn datatype(name: &str, ctors: Vec<Ctor>) -> TopLevelDecl {
    TopLevelDecl::Datatype(DatatypeDecl {
        name: name.into(),
        ctors,
        ..DatatypeDecl::default()
    })
}

fn program(decls: Vec<TopLevelDecl>) -> Program {
    let mut module = Module::default_module();
    module.decls = decls;
    Program {
        name: "p".into(),
        source_file: "p.dfy".into(),
        modules: vec![module],
        main: None,
    }
}

#[test]
fn grounding_skips_recursive_constructors() {
    let p = program(vec![datatype(
        "List",
        vec![
            Ctor::new(
                "Cons",
                vec![Formal::new("head", Type::Int), Formal::new("tail", Type::user(M, "List"))],
            ),
            Ctor::new("Nil", Vec::new()),
        ],
    )]);
    let index = ProgramIndex::new(&p);
    let ctor = grounding_ctor(&index, &DeclPath::new(M, "List")).map(|c| c.name.as_str());
    assert_eq!(ctor, Some("Nil"));
}

#[test]
fn grounding_ignores_ghost_fields() {
    let p = program(vec![datatype(
        "Node",
        vec![Ctor::new(
            "Node",
            vec![Formal::new("v", Type::Int), Formal::ghost("parent", Type::user(M, "Node"))],
        )],
    )]);
    let index = ProgramIndex::new(&p);
    assert!(grounding_ctor(&index, &DeclPath::new(M, "Node")).is_some());
}

#[test]
fn grounding_goes_through_other_datatypes() {
    let p = program(vec![
        datatype("A", vec![Ctor::new("A", vec![Formal::new("b", Type::user(M, "B"))])]),
        datatype(
            "B",
            vec![
                Ctor::new("BA", vec![Formal::new("a", Type::user(M, "A"))]),
                Ctor::new("Leaf", vec![Formal::new("n", Type::Int)]),
            ],
        ),
    ]);
    let index = ProgramIndex::new(&p);
    assert_eq!(
        grounding_ctor(&index, &DeclPath::new(M, "A")).map(|c| c.name.as_str()),
        Some("A")
    );
    assert_eq!(
        grounding_ctor(&index, &DeclPath::new(M, "B")).map(|c| c.name.as_str()),
        Some("Leaf")
    );
}

#[test]
fn finite_values_need_finite_fields() {
    let p = program(vec![
        datatype("Color", vec![Ctor::new("Red", Vec::new()), Ctor::new("Blue", Vec::new())]),
        datatype(
            "Tagged",
            vec![Ctor::new(
                "T",
                vec![Formal::new("c", Type::user(M, "Color")), Formal::new("on", Type::Bool)],
            )],
        ),
        datatype("Boxed", vec![Ctor::new("Box", vec![Formal::new("n", Type::Int)])]),
        datatype("Loop", vec![Ctor::new("L", vec![Formal::new("next", Type::user(M, "Loop"))])]),
    ]);
    let index = ProgramIndex::new(&p);
    assert!(has_finite_values(&index, &DeclPath::new(M, "Color")));
    assert!(has_finite_values(&index, &DeclPath::new(M, "Tagged")));
    assert!(!has_finite_values(&index, &DeclPath::new(M, "Boxed")));
    assert!(!has_finite_values(&index, &DeclPath::new(M, "Loop")));
}

#[test]
fn custom_receiver_table() {
    let newtype = TopLevelDecl::Newtype(NewtypeDecl {
        name: "Small".into(),
        base: Type::Int,
        witness: None,
        members: Vec::new(),
        loc: SourceLoc::SYNTHETIC,
    });
    let class = TopLevelDecl::Class(ClassDecl::default());
    let tr = TopLevelDecl::Trait(ClassDecl::default());

    let mut f = Function::new("double", Vec::new(), Type::Int, Expr::int(0));
    let instance_fn = Member::Function(f.clone());
    f.is_static = true;
    let static_fn = Member::Function(f);
    let const_with_rhs = Member::Field(Field::constant("k", Type::Int, Some(Expr::int(1))));
    let const_without_rhs = Member::Field(Field::constant("k", Type::Int, None));

    assert!(needs_custom_receiver(&newtype, &instance_fn));
    assert!(!needs_custom_receiver(&newtype, &static_fn));
    assert!(!needs_custom_receiver(&class, &instance_fn));
    assert!(needs_custom_receiver(&tr, &const_with_rhs));
    assert!(!needs_custom_receiver(&tr, &const_without_rhs));
    assert!(!needs_custom_receiver(&tr, &instance_fn));
    assert!(!needs_custom_receiver(&class, &const_with_rhs));
}
